//! Lifecycle interception dispatch.
//!
//! An [`InterceptionRecord`] binds an entity, its metadata and one
//! [`LifecycleEvent`]. Triggering it hands the pair to the metadata's
//! [`Interceptable::intercept`]. The record borrows both parts and keeps no
//! state between triggers. Errors from the interceptor chain come back
//! exactly as the metadata raised them.

use achilles_types::{LifecycleEvent, MappingError};
use std::fmt;
use tracing::debug;

/// Capability of running lifecycle interceptors for entities of type `E`.
pub trait Interceptable<E: ?Sized> {
    /// Failure raised by the interceptor chain
    type Error;

    /// Run every interceptor registered for `event` against `entity`.
    fn intercept(&self, entity: &mut E, event: LifecycleEvent) -> Result<(), Self::Error>;
}

/// One pending lifecycle trigger for a single entity.
pub struct InterceptionRecord<'a, M: ?Sized, E: ?Sized> {
    metadata: &'a M,
    entity: &'a mut E,
    event: LifecycleEvent,
}

impl<'a, M: ?Sized, E: ?Sized> InterceptionRecord<'a, M, E> {
    pub fn new(metadata: &'a M, entity: &'a mut E, event: LifecycleEvent) -> Self {
        Self {
            metadata,
            entity,
            event,
        }
    }

    /// Builder for call sites where parts may be absent
    pub fn builder() -> InterceptionRecordBuilder<'a, M, E> {
        InterceptionRecordBuilder {
            metadata: None,
            entity: None,
            event: None,
        }
    }

    pub fn metadata(&self) -> &M {
        self.metadata
    }

    pub fn entity(&self) -> &E {
        self.entity
    }

    pub fn event(&self) -> LifecycleEvent {
        self.event
    }

    /// Deliver the event to the metadata's interceptor chain.
    ///
    /// Every call invokes `intercept` once; nothing tracks earlier triggers.
    pub fn trigger_interception(&mut self) -> Result<(), M::Error>
    where
        M: Interceptable<E>,
    {
        debug!(
            event = %self.event,
            pre = self.event.is_pre(),
            entity = std::any::type_name::<E>(),
            "Triggering interception"
        );
        self.metadata.intercept(&mut *self.entity, self.event)
    }
}

impl<M: ?Sized, E: ?Sized> fmt::Debug for InterceptionRecord<'_, M, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptionRecord")
            .field("entity", &std::any::type_name::<E>())
            .field("event", &self.event)
            .finish()
    }
}

/// Collects the parts of an [`InterceptionRecord`], rejecting incomplete ones.
pub struct InterceptionRecordBuilder<'a, M: ?Sized, E: ?Sized> {
    metadata: Option<&'a M>,
    entity: Option<&'a mut E>,
    event: Option<LifecycleEvent>,
}

impl<'a, M: ?Sized, E: ?Sized> InterceptionRecordBuilder<'a, M, E> {
    pub fn metadata(mut self, metadata: &'a M) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn entity(mut self, entity: &'a mut E) -> Self {
        self.entity = Some(entity);
        self
    }

    pub fn event(mut self, event: LifecycleEvent) -> Self {
        self.event = Some(event);
        self
    }

    /// Fails with [`MappingError::InvalidRecord`] naming the first missing part.
    pub fn build(self) -> Result<InterceptionRecord<'a, M, E>, MappingError> {
        let metadata = self.metadata.ok_or(MappingError::InvalidRecord("metadata"))?;
        let entity = self.entity.ok_or(MappingError::InvalidRecord("entity"))?;
        let event = self.event.ok_or(MappingError::InvalidRecord("event"))?;
        Ok(InterceptionRecord::new(metadata, entity, event))
    }
}

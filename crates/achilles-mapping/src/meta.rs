//! Entity metadata: owner type, primary key, counter properties and the
//! interceptor chain.

use achilles_storage::CounterKey;
use achilles_types::{LifecycleEvent, MappingError};
use std::collections::BTreeSet;
use std::fmt;

use crate::interception::Interceptable;

/// A lifecycle hook for entities of type `E`.
pub trait Interceptor<E>: Send + Sync {
    /// Events this interceptor listens to
    fn events(&self) -> &[LifecycleEvent];

    fn accept(&self, event: LifecycleEvent) -> bool {
        self.events().contains(&event)
    }

    fn on_event(&self, entity: &mut E, event: LifecycleEvent) -> anyhow::Result<()>;
}

/// Interceptor backed by a closure.
pub struct FnInterceptor<F> {
    events: Vec<LifecycleEvent>,
    handler: F,
}

impl<F> FnInterceptor<F> {
    pub fn new(events: impl IntoIterator<Item = LifecycleEvent>, handler: F) -> Self {
        Self {
            events: events.into_iter().collect(),
            handler,
        }
    }
}

impl<E, F> Interceptor<E> for FnInterceptor<F>
where
    F: Fn(&mut E, LifecycleEvent) -> anyhow::Result<()> + Send + Sync,
{
    fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    fn on_event(&self, entity: &mut E, event: LifecycleEvent) -> anyhow::Result<()> {
        (self.handler)(entity, event)
    }
}

type PrimaryKeyFn<E> = Box<dyn Fn(&E) -> String + Send + Sync>;

/// Mapping metadata for one entity type.
pub struct EntityMeta<E> {
    fqcn: String,
    primary_key: PrimaryKeyFn<E>,
    counter_properties: BTreeSet<String>,
    interceptors: Vec<Box<dyn Interceptor<E>>>,
}

impl<E> EntityMeta<E> {
    /// `primary_key` renders an entity's primary key as stored in the counter table.
    pub fn new<P>(fqcn: impl Into<String>, primary_key: P) -> Self
    where
        P: Fn(&E) -> String + Send + Sync + 'static,
    {
        Self {
            fqcn: fqcn.into(),
            primary_key: Box::new(primary_key),
            counter_properties: BTreeSet::new(),
            interceptors: Vec::new(),
        }
    }

    /// Declare a counter property
    pub fn with_counter(mut self, property: impl Into<String>) -> Self {
        self.counter_properties.insert(property.into());
        self
    }

    pub fn with_interceptor(mut self, interceptor: impl Interceptor<E> + 'static) -> Self {
        self.add_interceptor(interceptor);
        self
    }

    pub fn with_interceptor_fn<F>(
        self,
        events: impl IntoIterator<Item = LifecycleEvent>,
        handler: F,
    ) -> Self
    where
        F: Fn(&mut E, LifecycleEvent) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.with_interceptor(FnInterceptor::new(events, handler))
    }

    /// Append an interceptor; the chain runs in registration order
    pub fn add_interceptor(&mut self, interceptor: impl Interceptor<E> + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    pub fn fqcn(&self) -> &str {
        &self.fqcn
    }

    pub fn primary_key_of(&self, entity: &E) -> String {
        (self.primary_key)(entity)
    }

    pub fn counter_properties(&self) -> impl Iterator<Item = &str> {
        self.counter_properties.iter().map(String::as_str)
    }

    pub fn is_counter(&self, property: &str) -> bool {
        self.counter_properties.contains(property)
    }

    /// Events with at least one listening interceptor
    pub fn intercepted_events(&self) -> Vec<LifecycleEvent> {
        LifecycleEvent::ALL
            .into_iter()
            .filter(|event| self.interceptors.iter().any(|i| i.accept(*event)))
            .collect()
    }

    /// Counter table address of `property` on `entity`.
    pub fn counter_key(&self, entity: &E, property: &str) -> Result<CounterKey, MappingError> {
        if !self.is_counter(property) {
            return Err(MappingError::NotACounter {
                fqcn: self.fqcn.clone(),
                property: property.to_string(),
            });
        }
        CounterKey::new(self.fqcn.as_str(), self.primary_key_of(entity), property)
    }
}

impl<E> Interceptable<E> for EntityMeta<E> {
    type Error = anyhow::Error;

    /// Stops at the first failing interceptor and returns its error as is.
    fn intercept(&self, entity: &mut E, event: LifecycleEvent) -> anyhow::Result<()> {
        for interceptor in self.interceptors.iter().filter(|i| i.accept(event)) {
            interceptor.on_event(entity, event)?;
        }
        Ok(())
    }
}

impl<E> fmt::Debug for EntityMeta<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityMeta")
            .field("fqcn", &self.fqcn)
            .field("counter_properties", &self.counter_properties)
            .field("interceptors", &self.interceptors.len())
            .finish()
    }
}

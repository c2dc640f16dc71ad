//! Entity-aware counter operations with lifecycle hooks.
//!
//! Writes (INCR, DECR and the single-counter DELETE) fire PRE_UPDATE before
//! and POST_UPDATE after the counter change. Reads fire POST_LOAD. Removal
//! fires PRE_REMOVE and POST_REMOVE around the deletion of every counter the
//! entity owns. A failing pre-hook aborts the storage operation and its error
//! is returned unchanged.
//!
//! The counter key is resolved before any hook runs, so an invalid key fires
//! nothing, and a pre-hook that changes primary-key fields does not redirect
//! the write.

use achilles_storage::{CounterKey, CounterStore};
use achilles_types::{CounterOperationKind, CounterRegistry, LifecycleEvent};
use tracing::debug;

use crate::interception::InterceptionRecord;
use crate::meta::EntityMeta;

/// Counter access for mapped entities, backed by a [`CounterStore`].
pub struct CounterSession<'s> {
    store: &'s CounterStore,
    registry: CounterRegistry,
}

impl<'s> CounterSession<'s> {
    pub fn new(store: &'s CounterStore) -> Self {
        Self {
            store,
            registry: CounterRegistry::new(store.profile()),
        }
    }

    pub fn registry(&self) -> &CounterRegistry {
        &self.registry
    }

    fn fire<E>(meta: &EntityMeta<E>, entity: &mut E, event: LifecycleEvent) -> anyhow::Result<()> {
        InterceptionRecord::new(meta, entity, event).trigger_interception()
    }

    /// Add `delta` to a counter property
    pub fn incr<E>(
        &self,
        meta: &EntityMeta<E>,
        entity: &mut E,
        property: &str,
        delta: i64,
    ) -> anyhow::Result<()> {
        self.update(meta, entity, property, CounterOperationKind::Increment, delta)
    }

    /// Subtract `delta` from a counter property
    pub fn decr<E>(
        &self,
        meta: &EntityMeta<E>,
        entity: &mut E,
        property: &str,
        delta: i64,
    ) -> anyhow::Result<()> {
        self.update(meta, entity, property, CounterOperationKind::Decrement, delta)
    }

    /// Read a counter property, None if it has no value yet
    pub fn load<E>(
        &self,
        meta: &EntityMeta<E>,
        entity: &mut E,
        property: &str,
    ) -> anyhow::Result<Option<i64>> {
        let key = meta.counter_key(entity, property)?;
        let value = self.store.get(&key)?;
        Self::fire(meta, entity, LifecycleEvent::PostLoad)?;
        Ok(value)
    }

    /// Remove every counter of the entity. Returns number of counters removed.
    pub fn remove<E>(&self, meta: &EntityMeta<E>, entity: &mut E) -> anyhow::Result<usize> {
        let primary_key = meta.primary_key_of(entity);
        CounterKey::entity_prefix(meta.fqcn(), &primary_key)?;
        Self::fire(meta, entity, LifecycleEvent::PreRemove)?;
        let removed = self.store.delete_entity(meta.fqcn(), &primary_key)?;
        Self::fire(meta, entity, LifecycleEvent::PostRemove)?;
        debug!(fqcn = meta.fqcn(), removed, "Removed entity counters");
        Ok(removed)
    }

    /// Run a counter operation given by name (INCR, DECR, SELECT, DELETE).
    ///
    /// Only SELECT returns a value.
    pub fn execute<E>(
        &self,
        operation_name: &str,
        meta: &EntityMeta<E>,
        entity: &mut E,
        property: &str,
        delta: i64,
    ) -> anyhow::Result<Option<i64>> {
        let kind = self.registry.classify(operation_name)?;
        match kind {
            CounterOperationKind::Select => self.load(meta, entity, property),
            _ => self
                .update(meta, entity, property, kind, delta)
                .map(|_| None),
        }
    }

    fn update<E>(
        &self,
        meta: &EntityMeta<E>,
        entity: &mut E,
        property: &str,
        kind: CounterOperationKind,
        delta: i64,
    ) -> anyhow::Result<()> {
        let key = meta.counter_key(entity, property)?;
        Self::fire(meta, entity, LifecycleEvent::PreUpdate)?;
        self.store.execute(kind, &key, delta)?;
        Self::fire(meta, entity, LifecycleEvent::PostUpdate)?;
        Ok(())
    }
}

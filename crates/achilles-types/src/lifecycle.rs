//! Entity lifecycle events.
//!
//! Interceptors registered on an entity's metadata fire at these points.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Point in an entity's life at which interceptors may run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleEvent {
    /// Before the entity is first written
    PrePersist,
    /// After the entity is first written
    PostPersist,
    /// Before an existing entity is modified
    PreUpdate,
    /// After an existing entity is modified
    PostUpdate,
    /// Before the entity is removed
    PreRemove,
    /// After the entity is removed
    PostRemove,
    /// After the entity is read back
    PostLoad,
}

impl LifecycleEvent {
    pub const ALL: [LifecycleEvent; 7] = [
        LifecycleEvent::PrePersist,
        LifecycleEvent::PostPersist,
        LifecycleEvent::PreUpdate,
        LifecycleEvent::PostUpdate,
        LifecycleEvent::PreRemove,
        LifecycleEvent::PostRemove,
        LifecycleEvent::PostLoad,
    ];

    /// Whether the event fires before the storage operation
    pub fn is_pre(self) -> bool {
        matches!(
            self,
            LifecycleEvent::PrePersist | LifecycleEvent::PreUpdate | LifecycleEvent::PreRemove
        )
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LifecycleEvent::PrePersist => "PRE_PERSIST",
            LifecycleEvent::PostPersist => "POST_PERSIST",
            LifecycleEvent::PreUpdate => "PRE_UPDATE",
            LifecycleEvent::PostUpdate => "POST_UPDATE",
            LifecycleEvent::PreRemove => "PRE_REMOVE",
            LifecycleEvent::PostRemove => "POST_REMOVE",
            LifecycleEvent::PostLoad => "POST_LOAD",
        };
        f.write_str(name)
    }
}

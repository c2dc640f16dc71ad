//! Entity mapping for achilles: lifecycle interception and counter access.
//!
//! - [`InterceptionRecord`] binds an entity, its metadata and a lifecycle
//!   event, and triggers the metadata's interceptor chain
//! - [`EntityMeta`] describes an entity type: owner name, primary key,
//!   counter properties and interceptors
//! - [`CounterSession`] runs counter operations on entities with hooks

pub mod interception;
pub mod meta;
pub mod session;

pub use interception::{Interceptable, InterceptionRecord, InterceptionRecordBuilder};
pub use meta::{EntityMeta, FnInterceptor, Interceptor};
pub use session::CounterSession;

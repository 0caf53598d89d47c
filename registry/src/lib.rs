//! Typed observer registries.
//!
//! A subject owns one registry and calls [`ObserverRegistry::notify`] after each
//! committed change of its observed state. Observers are designated either by
//! an equatable value ([`ValueKey`]) or by identity without being owned
//! ([`IdentityKey`]); registering a key twice replaces its callback.

mod dispatch;
mod error;
mod key;
mod observer_registry;
mod registrar;
mod shared_registry;

pub use dispatch::{FailurePolicy, NotifyReport};
pub use error::{CallbackError, CallbackResult};
pub use key::{IdentityKey, ObserverKey, SyncIdentityKey, ValueKey};
pub use observer_registry::{Callback, IdentityRegistry, ObserverRegistry, Snapshot, ValueRegistry};
pub use registrar::Registration;
pub use shared_registry::{
    SharedCallback, SharedIdentityRegistry, SharedRegistry, SharedValueRegistry,
};

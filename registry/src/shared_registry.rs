use std::{
    fmt::{self, Debug},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use log::debug;

use crate::{
    dispatch::{deliver, FailurePolicy, NotifyReport},
    error::CallbackResult,
    key::{ObserverKey, SyncIdentityKey, ValueKey},
    registrar::Registrar,
};

pub type SharedCallback<S> = Arc<dyn Fn(&S) -> CallbackResult + Send + Sync>;

/// Registry that can be shared across threads.
///
/// Registrations are serialized by a mutex; a notify pass works on a copy of
/// the registrations taken under the lock and runs the callbacks without it.
pub struct SharedRegistry<S: ?Sized, K> {
    registrar: Mutex<Registrar<K, SharedCallback<S>>>,
    policy: FailurePolicy,
}

pub type SharedValueRegistry<S, K> = SharedRegistry<S, ValueKey<K>>;

pub type SharedIdentityRegistry<S, O> = SharedRegistry<S, SyncIdentityKey<O>>;

impl<S: ?Sized, K> Default for SharedRegistry<S, K> {
    fn default() -> Self {
        Self::with_policy(FailurePolicy::default())
    }
}

impl<S: ?Sized, K> Debug for SharedRegistry<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedRegistry")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: ?Sized, K> SharedRegistry<S, K> {
    pub fn with_policy(policy: FailurePolicy) -> Self {
        SharedRegistry {
            registrar: Mutex::new(Registrar::default()),
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    // Callbacks never run under the lock, so a poisoned registrar is still consistent.
    fn lock(&self) -> MutexGuard<'_, Registrar<K, SharedCallback<S>>> {
        self.registrar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: ?Sized, K: ObserverKey + Clone> SharedRegistry<S, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_key<F>(&self, key: K, callback: F) -> bool
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.register_key_fallible(key, move |subject| {
            callback(subject);
            Ok(())
        })
    }

    pub fn register_key_fallible<F>(&self, key: K, callback: F) -> bool
    where
        F: Fn(&S) -> CallbackResult + Send + Sync + 'static,
    {
        let mut registrar = self.lock();
        let replaced = registrar.upsert(key, Arc::new(callback));
        debug!(
            "{} shared observer ({} registered)",
            if replaced { "Replaced" } else { "Registered" },
            registrar.live_len()
        );
        replaced
    }

    pub fn unregister_key(&self, key: &K) -> bool {
        let mut registrar = self.lock();
        let removed = registrar.remove(key);
        if removed {
            debug!(
                "Unregistered shared observer ({} registered)",
                registrar.live_len()
            );
        }
        removed
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.lock().live_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn compact(&self) -> usize {
        self.lock().prune()
    }

    pub fn notify(&self, subject: &S) -> NotifyReport {
        let entries = self.lock().entries().to_vec();
        deliver(
            entries.iter().map(|entry| {
                entry
                    .key()
                    .is_live()
                    .then(|| &**entry.callback() as &dyn Fn(&S) -> CallbackResult)
            }),
            subject,
            self.policy,
        )
    }
}

impl<S: ?Sized, K: Eq + Clone> SharedRegistry<S, ValueKey<K>> {
    pub fn register<F>(&self, key: K, callback: F) -> bool
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        self.register_key(ValueKey(key), callback)
    }

    pub fn register_fallible<F>(&self, key: K, callback: F) -> bool
    where
        F: Fn(&S) -> CallbackResult + Send + Sync + 'static,
    {
        self.register_key_fallible(ValueKey(key), callback)
    }

    pub fn unregister(&self, key: &K) -> bool {
        self.unregister_key(&ValueKey(key.clone()))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.contains_key(&ValueKey(key.clone()))
    }
}

impl<S, O> SharedRegistry<S, SyncIdentityKey<O>>
where
    S: ?Sized + 'static,
    O: ?Sized + Send + Sync + 'static,
{
    /// Registers `callback` on behalf of `observer`, which is only held weakly.
    pub fn register<F>(&self, observer: &Arc<O>, callback: F) -> bool
    where
        F: Fn(&O, &S) + Send + Sync + 'static,
    {
        let key = SyncIdentityKey::of(observer);
        let target = key.clone();
        self.register_key(key, move |subject| {
            if let Some(observer) = target.upgrade() {
                callback(&*observer, subject);
            }
        })
    }

    pub fn unregister(&self, observer: &Arc<O>) -> bool {
        self.unregister_key(&SyncIdentityKey::of(observer))
    }

    pub fn contains(&self, observer: &Arc<O>) -> bool {
        self.contains_key(&SyncIdentityKey::of(observer))
    }
}

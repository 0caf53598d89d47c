use std::{
    fmt::{self, Debug},
    rc::Rc,
};

use common::subject_observer::Observer;
use log::debug;

use crate::{
    dispatch::{deliver, FailurePolicy, NotifyReport},
    error::CallbackResult,
    key::{IdentityKey, ObserverKey, ValueKey},
    registrar::{Registrar, Registration},
};

pub type Callback<S> = Rc<dyn Fn(&S) -> CallbackResult>;

/// Observers of a single subject, notified synchronously in registration order.
pub struct ObserverRegistry<S: ?Sized, K> {
    registrar: Registrar<K, Callback<S>>,
    policy: FailurePolicy,
}

/// Registry whose observers are designated by equatable values.
pub type ValueRegistry<S, K> = ObserverRegistry<S, ValueKey<K>>;

/// Registry whose observers are designated by identity, without being owned.
pub type IdentityRegistry<S, O> = ObserverRegistry<S, IdentityKey<O>>;

impl<S: ?Sized, K> Default for ObserverRegistry<S, K> {
    fn default() -> Self {
        ObserverRegistry {
            registrar: Registrar::default(),
            policy: FailurePolicy::default(),
        }
    }
}

impl<S: ?Sized, K> Debug for ObserverRegistry<S, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("registrations", &self.registrar.entries().len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl<S: ?Sized, K: ObserverKey + Clone> ObserverRegistry<S, K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: FailurePolicy) -> Self {
        ObserverRegistry {
            registrar: Registrar::default(),
            policy,
        }
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: FailurePolicy) {
        self.policy = policy;
    }

    pub fn register_key<F>(&mut self, key: K, callback: F) -> bool
    where
        F: Fn(&S) + 'static,
    {
        self.register_key_fallible(key, move |subject| {
            callback(subject);
            Ok(())
        })
    }

    /// Installs `callback` for `key`, replacing the previous one if any.
    pub fn register_key_fallible<F>(&mut self, key: K, callback: F) -> bool
    where
        F: Fn(&S) -> CallbackResult + 'static,
    {
        let replaced = self.registrar.upsert(key, Rc::new(callback));
        debug!(
            "{} observer ({} registered)",
            if replaced { "Replaced" } else { "Registered" },
            self.registrar.live_len()
        );
        replaced
    }

    /// Removes the registration of `key`; unknown keys are ignored.
    pub fn unregister_key(&mut self, key: &K) -> bool {
        let removed = self.registrar.remove(key);
        if removed {
            debug!(
                "Unregistered observer ({} registered)",
                self.registrar.live_len()
            );
        }
        removed
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.registrar.contains(key)
    }

    /// Number of registrations whose observer is still around.
    pub fn len(&self) -> usize {
        self.registrar.live_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Forgets registrations of observers that are gone.
    pub fn compact(&mut self) -> usize {
        self.registrar.prune()
    }

    /// Freezes the current registrations for a later [`Snapshot::deliver`].
    pub fn snapshot(&self) -> Snapshot<S, K> {
        Snapshot {
            entries: self.registrar.entries().to_vec(),
            policy: self.policy,
        }
    }

    /// Invokes every live callback once with `subject`.
    pub fn notify(&self, subject: &S) -> NotifyReport {
        self.snapshot().deliver(subject)
    }
}

impl<S: ?Sized, K: Eq + Clone> ObserverRegistry<S, ValueKey<K>> {
    pub fn register<F>(&mut self, key: K, callback: F) -> bool
    where
        F: Fn(&S) + 'static,
    {
        self.register_key(ValueKey(key), callback)
    }

    pub fn register_fallible<F>(&mut self, key: K, callback: F) -> bool
    where
        F: Fn(&S) -> CallbackResult + 'static,
    {
        self.register_key_fallible(ValueKey(key), callback)
    }

    pub fn unregister(&mut self, key: &K) -> bool {
        self.unregister_key(&ValueKey(key.clone()))
    }

    pub fn contains(&self, key: &K) -> bool {
        self.contains_key(&ValueKey(key.clone()))
    }
}

impl<S: ?Sized + 'static, O: ?Sized + 'static> ObserverRegistry<S, IdentityKey<O>> {
    /// Registers `callback` on behalf of `observer`, which is only held weakly.
    ///
    /// The callback receives the observer back; once the observer is dropped the
    /// registration is skipped.
    pub fn register<F>(&mut self, observer: &Rc<O>, callback: F) -> bool
    where
        F: Fn(&O, &S) + 'static,
    {
        self.register_fallible(observer, move |observer, subject| {
            callback(observer, subject);
            Ok(())
        })
    }

    pub fn register_fallible<F>(&mut self, observer: &Rc<O>, callback: F) -> bool
    where
        F: Fn(&O, &S) -> CallbackResult + 'static,
    {
        let key = IdentityKey::of(observer);
        let target = key.clone();
        self.register_key_fallible(key, move |subject| match target.upgrade() {
            Some(observer) => callback(&*observer, subject),
            None => Ok(()),
        })
    }

    /// Registers an observer object; its [`Observer::update`] answers every notification.
    pub fn register_observer(&mut self, observer: &Rc<O>) -> bool
    where
        O: Observer<S>,
    {
        self.register(observer, |observer, subject| observer.update(subject))
    }

    pub fn unregister(&mut self, observer: &Rc<O>) -> bool {
        self.unregister_key(&IdentityKey::of(observer))
    }

    pub fn contains(&self, observer: &Rc<O>) -> bool {
        self.contains_key(&IdentityKey::of(observer))
    }
}

/// Registrations frozen at some point, detached from their registry.
///
/// Delivering a snapshot does not touch the registry, so callbacks are free to
/// register or unregister observers; those changes apply to the next pass.
pub struct Snapshot<S: ?Sized, K> {
    entries: Vec<Registration<K, Callback<S>>>,
    policy: FailurePolicy,
}

impl<S: ?Sized, K: ObserverKey> Snapshot<S, K> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn deliver(&self, subject: &S) -> NotifyReport {
        deliver(
            self.entries.iter().map(|entry| {
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

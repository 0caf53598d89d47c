use std::{
    fmt::{self, Debug},
    rc::{self, Rc},
    sync::{self, Arc},
};

/// Designates one observer inside a registry.
pub trait ObserverKey {
    /// Whether both keys designate the same observer.
    fn same_observer(&self, other: &Self) -> bool;

    /// Whether the designated observer can still be notified.
    fn is_live(&self) -> bool {
        true
    }
}

/// Observer designated by an equatable value (a name, a numeric id...).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueKey<K>(pub K);

impl<K: Eq> ObserverKey for ValueKey<K> {
    fn same_observer(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K> From<K> for ValueKey<K> {
    fn from(key: K) -> Self {
        ValueKey(key)
    }
}

/// Observer designated by its allocation, held without ownership.
pub struct IdentityKey<O: ?Sized>(rc::Weak<O>);

impl<O: ?Sized> IdentityKey<O> {
    pub fn of(observer: &Rc<O>) -> Self {
        IdentityKey(Rc::downgrade(observer))
    }

    pub fn upgrade(&self) -> Option<Rc<O>> {
        self.0.upgrade()
    }
}

impl<O: ?Sized> ObserverKey for IdentityKey<O> {
    fn same_observer(&self, other: &Self) -> bool {
        rc::Weak::ptr_eq(&self.0, &other.0)
    }

    fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl<O: ?Sized> Clone for IdentityKey<O> {
    fn clone(&self) -> Self {
        IdentityKey(self.0.clone())
    }
}

impl<O: ?Sized> Debug for IdentityKey<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IdentityKey")
            .field(&self.0.as_ptr().cast::<()>())
            .finish()
    }
}

impl<O: ?Sized> From<&Rc<O>> for IdentityKey<O> {
    fn from(observer: &Rc<O>) -> Self {
        IdentityKey::of(observer)
    }
}

/// Thread-safe counterpart of [`IdentityKey`].
pub struct SyncIdentityKey<O: ?Sized>(sync::Weak<O>);

impl<O: ?Sized> SyncIdentityKey<O> {
    pub fn of(observer: &Arc<O>) -> Self {
        SyncIdentityKey(Arc::downgrade(observer))
    }

    pub fn upgrade(&self) -> Option<Arc<O>> {
        self.0.upgrade()
    }
}

impl<O: ?Sized> ObserverKey for SyncIdentityKey<O> {
    fn same_observer(&self, other: &Self) -> bool {
        sync::Weak::ptr_eq(&self.0, &other.0)
    }

    fn is_live(&self) -> bool {
        self.0.strong_count() > 0
    }
}

impl<O: ?Sized> Clone for SyncIdentityKey<O> {
    fn clone(&self) -> Self {
        SyncIdentityKey(self.0.clone())
    }
}

impl<O: ?Sized> Debug for SyncIdentityKey<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SyncIdentityKey")
            .field(&self.0.as_ptr().cast::<()>())
            .finish()
    }
}

impl<O: ?Sized> From<&Arc<O>> for SyncIdentityKey<O> {
    fn from(observer: &Arc<O>) -> Self {
        SyncIdentityKey::of(observer)
    }
}

#[cfg(test)]
mod tests {
    use std::{rc::Rc, sync::Arc};

    use super::{IdentityKey, ObserverKey, SyncIdentityKey, ValueKey};

    #[test]
    fn test_value_key_compares_by_value() {
        // Given
        let alice = ValueKey("alice".to_string());

        // Then
        assert!(alice.same_observer(&ValueKey("alice".to_string())));
        assert!(!alice.same_observer(&ValueKey("bob".to_string())));
        assert!(alice.is_live(), "Value keys never expire");
    }

    #[test]
    fn test_identity_key_compares_by_allocation() {
        // Given
        let first = Rc::new("manager".to_string());
        let second = Rc::new("manager".to_string());

        // When
        let key = IdentityKey::of(&first);

        // Then
        assert!(key.same_observer(&IdentityKey::of(&first)));
        assert!(
            !key.same_observer(&IdentityKey::of(&second)),
            "Equal values in distinct allocations are distinct observers"
        );
    }

    #[test]
    fn test_identity_key_does_not_own_observer() {
        // Given
        let observer = Rc::new(42u32);
        let key = IdentityKey::of(&observer);
        assert!(key.is_live());

        // When
        drop(observer);

        // Then
        assert!(!key.is_live());
        assert!(key.upgrade().is_none());
    }

    #[test]
    fn test_sync_identity_key_does_not_own_observer() {
        // Given
        let observer = Arc::new(42u32);
        let key = SyncIdentityKey::of(&observer);
        assert!(key.same_observer(&SyncIdentityKey::from(&observer)));

        // When
        drop(observer);

        // Then
        assert!(!key.is_live());
    }
}

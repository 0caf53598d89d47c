use crate::key::ObserverKey;

/// One observer key and the callback answering for it.
#[derive(Debug, Clone)]
pub struct Registration<K, C> {
    key: K,
    callback: C,
}

impl<K, C> Registration<K, C> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn callback(&self) -> &C {
        &self.callback
    }
}

/// Insertion-ordered registrations, at most one per live observer.
#[derive(Debug, Clone)]
pub(crate) struct Registrar<K, C> {
    entries: Vec<Registration<K, C>>,
}

impl<K, C> Default for Registrar<K, C> {
    fn default() -> Self {
        Registrar { entries: vec![] }
    }
}

impl<K, C> Registrar<K, C> {
    pub fn entries(&self) -> &[Registration<K, C>] {
        &self.entries
    }
}

impl<K: ObserverKey, C> Registrar<K, C> {
    /// Installs `callback` for `key`; returns `true` when an earlier one got replaced.
    ///
    /// A replaced registration keeps its position in the notification order.
    pub fn upsert(&mut self, key: K, callback: C) -> bool {
        self.prune();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.key.same_observer(&key))
        {
            Some(entry) => {
                entry.callback = callback;
                true
            }
            None => {
                self.entries.push(Registration { key, callback });
                false
            }
        }
    }

    pub fn remove(&mut self, key: &K) -> bool {
        self.prune();
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.key.same_observer(key));
        before != self.entries.len()
    }

    /// Drops registrations whose observer is gone; returns how many were dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.key.is_live());
        before - self.entries.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.key.is_live() && entry.key.same_observer(key))
    }

    pub fn live_len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.key.is_live())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use common_test::{get_seeded_rng, random_operations, Operation, ReferenceRegistrar};

    use crate::key::{IdentityKey, ValueKey};

    use super::Registrar;

    fn replay(operations: &[Operation]) -> Registrar<ValueKey<u8>, u32> {
        let mut registrar = Registrar::default();
        for operation in operations {
            match *operation {
                Operation::Register { key, tag } => {
                    registrar.upsert(ValueKey(key), tag);
                }
                Operation::Unregister { key } => {
                    registrar.remove(&ValueKey(key));
                }
            }
        }
        registrar
    }

    #[test]
    fn test_registrar_matches_reference_mapping() {
        let mut rng = get_seeded_rng().unwrap();
        for _ in 0..50 {
            // Given
            let operations = random_operations(&mut rng, 40, 6);
            let reference = ReferenceRegistrar::replay(&operations);

            // When
            let registrar = replay(&operations);

            // Then
            let mut keys = registrar
                .entries()
                .iter()
                .map(|entry| entry.key().0)
                .collect::<Vec<_>>();
            keys.sort_unstable();
            assert_eq!(reference.keys(), keys, "Operations: {operations:?}");
            for entry in registrar.entries() {
                assert_eq!(reference.tag(entry.key().0), Some(*entry.callback()));
            }
        }
    }

    #[test]
    fn test_registrar_upsert_replaces_in_place() {
        // Given
        let mut registrar = Registrar::default();
        registrar.upsert(ValueKey("alice"), 1);
        registrar.upsert(ValueKey("bob"), 2);

        // When
        let replaced = registrar.upsert(ValueKey("alice"), 3);

        // Then
        assert!(replaced);
        let entries = registrar
            .entries()
            .iter()
            .map(|entry| (entry.key().0, *entry.callback()))
            .collect::<Vec<_>>();
        assert_eq!(vec![("alice", 3), ("bob", 2)], entries);
    }

    #[test]
    fn test_registrar_remove_absent_key_is_noop() {
        // Given
        let mut registrar = Registrar::default();
        registrar.upsert(ValueKey(1u8), ());

        // When
        let removed = registrar.remove(&ValueKey(2));

        // Then
        assert!(!removed);
        assert_eq!(1, registrar.live_len());
    }

    #[test]
    fn test_registrar_prunes_dead_identity_keys() {
        // Given
        let kept = Rc::new(1u8);
        let dropped = Rc::new(2u8);
        let mut registrar = Registrar::default();
        registrar.upsert(IdentityKey::of(&kept), "kept");
        registrar.upsert(IdentityKey::of(&dropped), "dropped");
        let dropped_key = IdentityKey::of(&dropped);

        // When
        drop(dropped);

        // Then
        assert_eq!(1, registrar.live_len());
        assert!(!registrar.contains(&dropped_key));
        assert_eq!(2, registrar.entries().len(), "Reads never prune");
        assert_eq!(1, registrar.prune());
        assert_eq!(1, registrar.entries().len());
    }
}

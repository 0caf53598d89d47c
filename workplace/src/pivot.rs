use common::subject_observer::Subject;
use registry::{FailurePolicy, NotifyReport, ValueRegistry};

use crate::employee::Employee;

/// Employee watched by observers designated through any equatable id.
pub struct Pivot<O> {
    name: String,
    activity: String,
    observers: ValueRegistry<Pivot<O>, O>,
}

impl<O: Eq + Clone> Pivot<O> {
    pub fn new(name: impl Into<String>, activity: impl Into<String>) -> Self {
        Pivot {
            name: name.into(),
            activity: activity.into(),
            observers: ValueRegistry::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.observers.set_policy(policy);
        self
    }

    pub fn is_observed_by(&self, observer: &O) -> bool {
        self.observers.contains(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    pub fn notify(&self) -> NotifyReport {
        self.observers.notify(self)
    }
}

impl<O: Eq + Clone> Employee for Pivot<O> {
    fn name(&self) -> &str {
        &self.name
    }

    fn activity(&self) -> &str {
        &self.activity
    }

    fn set_activity(&mut self, activity: impl Into<String>) -> NotifyReport {
        self.activity = activity.into();
        self.notify()
    }
}

impl<O: Eq + Clone> Subject for Pivot<O> {
    type ObserverKey = O;
    type Message = Self;

    fn register_observer<F>(&mut self, observer: &Self::ObserverKey, callback: F)
    where
        F: Fn(&Self::Message) + 'static,
    {
        self.observers.register(observer.clone(), callback);
    }

    fn unregister_observer(&mut self, observer: &Self::ObserverKey) {
        self.observers.unregister(observer);
    }

    // Failures are logged by the registry; callers wanting the report use `notify`.
    fn notify_observers(&self) {
        self.notify();
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use common::subject_observer::Subject;
    use common_test::{get_seeded_rng, random_operations, Operation, Recorder, ReferenceRegistrar};
    use registry::{CallbackError, FailurePolicy};

    use crate::{
        employee::Employee,
        manager::{CheckIn, Manager},
    };

    use super::Pivot;

    #[test]
    fn test_pivot_notifies_every_change() {
        // Given
        let alice = Rc::new(Manager::new("Alice"));
        let manager = Rc::clone(&alice);
        let mut caroline: Pivot<u32> = Pivot::new("Caroline", "refactoring tickets");
        caroline.register_observer(&7, move |pivot| manager.check_in_on_employee(pivot));

        // When
        for activity in ["billing hours", "on a call", "billing hours"] {
            caroline.set_activity(activity);
        }

        // Then
        assert_eq!(
            vec![
                CheckIn::new("Caroline", "billing hours"),
                CheckIn::new("Caroline", "on a call"),
                CheckIn::new("Caroline", "billing hours")
            ],
            alice.check_ins(),
            "Changes should never be coalesced"
        );
    }

    #[test]
    fn test_pivot_observers_match_reference_mapping() {
        let mut rng = get_seeded_rng().unwrap();
        for _ in 0..20 {
            // Given
            let operations = random_operations(&mut rng, 25, 4);
            let reference = ReferenceRegistrar::replay(&operations);
            let calls = Recorder::new();
            let mut pivot: Pivot<u8> = Pivot::new("Dana", "idle");

            // When
            for operation in &operations {
                match *operation {
                    Operation::Register { key, tag } => {
                        let calls = calls.clone();
                        pivot.register_observer(&key, move |_| calls.record(key));
                        assert!(pivot.is_observed_by(&key), "tag {tag}");
                    }
                    Operation::Unregister { key } => pivot.unregister_observer(&key),
                }
            }
            pivot.set_activity("busy");

            // Then
            let mut notified = calls.calls();
            notified.sort_unstable();
            assert_eq!(reference.keys(), notified, "Operations: {operations:?}");
            assert_eq!(reference.keys().len(), pivot.observer_count());
        }
    }

    #[test]
    fn test_pivot_abort_policy_stops_on_failure() {
        // Given
        let calls = Recorder::new();
        let mut pivot: Pivot<&str> = Pivot::new("Erin", "idle").with_policy(FailurePolicy::Abort);
        pivot.register_observer(&"first", |_| panic!("boom"));
        let recorder = calls.clone();
        pivot.register_observer(&"second", move |_| recorder.record(()));

        // When
        let report = pivot.set_activity("busy");

        // Then
        assert!(report.aborted);
        assert_eq!(
            vec![(0, CallbackError::Panicked("boom".to_string()))],
            report.failures
        );
        assert!(calls.is_empty());
    }
}

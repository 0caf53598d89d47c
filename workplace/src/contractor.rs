use common::subject_observer::Subject;
use registry::{FailurePolicy, NotifyReport, ValueRegistry};

use crate::employee::{ActivityUpdate, Employee};

/// Employee broadcasting [`ActivityUpdate`] messages to observers registered by name.
#[derive(Debug)]
pub struct Contractor {
    name: String,
    activity: String,
    observers: ValueRegistry<ActivityUpdate, String>,
}

impl Contractor {
    pub fn new(name: impl Into<String>, activity: impl Into<String>) -> Self {
        Contractor {
            name: name.into(),
            activity: activity.into(),
            observers: ValueRegistry::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.observers.set_policy(policy);
        self
    }

    pub fn is_observed_by(&self, observer: &str) -> bool {
        self.observers.contains(&observer.to_string())
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Posts the current activity to every observer.
    pub fn notify(&self) -> NotifyReport {
        self.observers.notify(&ActivityUpdate::from(self))
    }
}

impl Employee for Contractor {
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

impl Subject for Contractor {
    type ObserverKey = str;
    type Message = ActivityUpdate;

    fn register_observer<F>(&mut self, observer: &Self::ObserverKey, callback: F)
    where
        F: Fn(&Self::Message) + 'static,
    {
        self.observers.register(observer.to_string(), callback);
    }

    fn unregister_observer(&mut self, observer: &Self::ObserverKey) {
        self.observers.unregister(&observer.to_string());
    }

    // Failures are logged by the registry; callers wanting the report use `notify`.
    fn notify_observers(&self) {
        self.notify();
    }
}

use std::rc::Rc;

use common::subject_observer::{Observer, Subject};
use registry::{FailurePolicy, IdentityRegistry, NotifyReport};

use crate::employee::Employee;

/// Shared handle under which observers watch a [`Developer`].
pub type DeveloperObserver = Rc<dyn Observer<Developer>>;

/// Employee whose observers are tracked by identity and held weakly.
#[derive(Debug)]
pub struct Developer {
    name: String,
    activity: String,
    observers: IdentityRegistry<Developer, dyn Observer<Developer>>,
}

impl Developer {
    pub fn new(name: impl Into<String>, activity: impl Into<String>) -> Self {
        Developer {
            name: name.into(),
            activity: activity.into(),
            observers: IdentityRegistry::new(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.observers.set_policy(policy);
        self
    }

    /// Notifies `observer` through its [`Observer::update`] on every change.
    pub fn watch(&mut self, observer: &DeveloperObserver) -> bool {
        self.observers.register_observer(observer)
    }

    pub fn unwatch(&mut self, observer: &DeveloperObserver) -> bool {
        self.observers.unregister(observer)
    }

    pub fn is_watched_by(&self, observer: &DeveloperObserver) -> bool {
        self.observers.contains(observer)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Runs one notify pass with the current state.
    pub fn notify(&self) -> NotifyReport {
        self.observers.notify(self)
    }
}

impl Employee for Developer {
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

impl Subject for Developer {
    type ObserverKey = DeveloperObserver;
    type Message = Developer;

    fn register_observer<F>(&mut self, observer: &Self::ObserverKey, callback: F)
    where
        F: Fn(&Self::Message) + 'static,
    {
        self.observers
            .register(observer, move |_, developer| callback(developer));
    }

    fn unregister_observer(&mut self, observer: &Self::ObserverKey) {
        self.observers.unregister(observer);
    }

    // Failures are logged by the registry; callers wanting the report use `notify`.
    fn notify_observers(&self) {
        self.notify();
    }
}

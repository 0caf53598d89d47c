use std::cell::RefCell;

use common::subject_observer::Observer;
use log::info;

use crate::employee::{ActivityUpdate, Employee};

/// What a manager saw when checking in on an employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckIn {
    pub employee: String,
    pub activity: String,
}

impl CheckIn {
    pub fn new(employee: impl Into<String>, activity: impl Into<String>) -> Self {
        CheckIn {
            employee: employee.into(),
            activity: activity.into(),
        }
    }
}

#[derive(Debug)]
pub struct Manager {
    name: String,
    check_ins: RefCell<Vec<CheckIn>>,
}

impl Manager {
    pub fn new(name: impl Into<String>) -> Self {
        Manager {
            name: name.into(),
            check_ins: RefCell::new(vec![]),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn check_in_on_employee<E: Employee>(&self, employee: &E) {
        info!(
            "{} is checking in on {}, who's {}.",
            self.name,
            employee.name(),
            employee.activity()
        );
        self.record(employee.name(), employee.activity());
    }

    pub fn micromanage(&self, update: &ActivityUpdate) {
        info!(
            "{} is checking in on {}, who is {}.",
            self.name, update.name, update.activity
        );
        self.record(&update.name, &update.activity);
    }

    /// Every check-in so far, oldest first.
    pub fn check_ins(&self) -> Vec<CheckIn> {
        self.check_ins.borrow().clone()
    }

    fn record(&self, employee: &str, activity: &str) {
        self.check_ins
            .borrow_mut()
            .push(CheckIn::new(employee, activity));
    }
}

impl<E: Employee> Observer<E> for Manager {
    fn update(&self, employee: &E) {
        self.check_in_on_employee(employee);
    }
}

impl Observer<ActivityUpdate> for Manager {
    fn update(&self, update: &ActivityUpdate) {
        self.micromanage(update);
    }
}

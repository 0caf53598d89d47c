use std::{cell::Cell, fmt::Debug, io::Error, net::ToSocketAddrs};

use common::subject_observer::Observer;
use dipstick::{Input, InputScope, Statsd};
use log::trace;
use workplace::employee::Employee;

use super::{employee_counter_name, ACTIVITY_CHANGES, WORKPLACE_PROXY};

/// Publishes activity changes to a statsd daemon.
pub struct StatsdGateway {
    changes: Cell<u64>,
}

impl StatsdGateway {
    pub fn new<A>(address: A) -> Result<Self, Error>
    where
        A: ToSocketAddrs + Debug + Clone,
    {
        let statsd_scope = Statsd::send_to(address)?.metrics();
        WORKPLACE_PROXY.target(statsd_scope);

        Ok(StatsdGateway {
            changes: Cell::new(0),
        })
    }

    /// Activity changes seen since creation.
    pub fn changes_seen(&self) -> u64 {
        self.changes.get()
    }
}

impl<E: Employee> Observer<E> for StatsdGateway {
    fn update(&self, employee: &E) {
        trace!(
            "Sending activity change of {}: {}",
            employee.name(),
            employee.activity()
        );
        ACTIVITY_CHANGES.count(1);
        WORKPLACE_PROXY
            .counter(&employee_counter_name(employee.name()))
            .count(1);
        self.changes.set(self.changes.get() + 1);
    }
}

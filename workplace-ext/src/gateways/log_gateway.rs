use std::cell::Cell;

use common::subject_observer::Observer;
use dipstick::{Input, InputScope, Log};
use workplace::employee::Employee;

use super::{employee_counter_name, ACTIVITY_CHANGES, WORKPLACE_PROXY};

/// Publishes activity changes through the `log` facade.
pub struct LogGateway {
    changes: Cell<u64>,
}

impl LogGateway {
    pub fn new() -> Self {
        WORKPLACE_PROXY.target(Log::to_log().level(log::Level::Trace).metrics());
        LogGateway {
            changes: Cell::new(0),
        }
    }

    pub fn changes_seen(&self) -> u64 {
        self.changes.get()
    }
}

impl Default for LogGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Employee> Observer<E> for LogGateway {
    fn update(&self, employee: &E) {
        ACTIVITY_CHANGES.count(1);
        WORKPLACE_PROXY
            .counter(&employee_counter_name(employee.name()))
            .count(1);
        self.changes.set(self.changes.get() + 1);
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use workplace::{employee::Employee, pivot::Pivot, Observer, Subject};

    use super::LogGateway;

    #[test]
    fn test_log_gateway_counts_changes() {
        // Given
        let gateway = Rc::new(LogGateway::new());
        let relay = Rc::clone(&gateway);
        let mut dana: Pivot<&str> = Pivot::new("Dana", "refactoring tickets");
        dana.register_observer(&"metrics", move |pivot| relay.update(pivot));

        // When
        dana.set_activity("billing hours");
        dana.set_activity("invoicing");

        // Then
        assert_eq!(2, gateway.changes_seen());
    }
}

mod log_gateway;
mod statsd_gateway;

pub use log_gateway::LogGateway;
pub use statsd_gateway::StatsdGateway;

use dipstick::*;

metrics! {
    WORKPLACE_PROXY: Proxy = "workplace" => {
        ACTIVITY_CHANGES: Counter = "activity-changes";
    }
}

/// Name of the counter tracking the changes of one employee.
fn employee_counter_name(employee: &str) -> String {
    format!(
        "{}.activity-changes",
        employee.trim().to_lowercase().replace(char::is_whitespace, "-")
    )
}

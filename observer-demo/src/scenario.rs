use std::rc::Rc;

use common::subject_observer::Subject;
use log::{debug, info};
use registry::NotifyReport;
use workplace::{
    contractor::Contractor,
    developer::{Developer, DeveloperObserver},
    employee::Employee,
    manager::{CheckIn, Manager},
};
use workplace_ext::gateways::{LogGateway, StatsdGateway};

use crate::{config::app::AppConfig, AppError};

/// Outcome of one office scenario run.
#[derive(Debug)]
pub struct Transcript {
    pub check_ins: Vec<CheckIn>,
    pub passes: usize,
    pub failures: usize,
}

/// Runs the office scenario described by `config`.
///
/// The manager watches the developer through each configured activity, stops
/// watching before the final one, then follows the contractor's updates by name.
/// Activity changes also reach statsd when enabled, the log otherwise.
pub fn run(config: &AppConfig) -> Result<Transcript, AppError> {
    let manager = Rc::new(Manager::new(&config.manager_name));
    let manager_observer: DeveloperObserver = manager.clone();

    let metrics_observer: DeveloperObserver = if config.statsd_enabled {
        Rc::new(StatsdGateway::new((
            config.statsd_host.as_str(),
            config.statsd_port,
        ))?)
    } else {
        Rc::new(LogGateway::new())
    };

    let mut developer = Developer::new(&config.employee_name, &config.initial_activity)
        .with_policy(config.failure_policy);
    developer.watch(&manager_observer);
    developer.watch(&metrics_observer);
    info!(
        "{} is watching {} ({} observers)",
        manager.name(),
        developer.name(),
        developer.observer_count()
    );

    let mut reports = Vec::new();
    for activity in &config.activities {
        reports.push(developer.set_activity(activity.as_str()));
    }
    developer.unwatch(&manager_observer);
    reports.push(developer.set_activity(config.final_activity.as_str()));

    let mut contractor = Contractor::new(
        &config.contractor_name,
        &config.contractor_initial_activity,
    )
    .with_policy(config.failure_policy);
    let relay = Rc::clone(&manager);
    contractor.register_observer(manager.name(), move |update| relay.micromanage(update));
    for activity in &config.contractor_activities {
        reports.push(contractor.set_activity(activity.as_str()));
    }
    contractor.unregister_observer(manager.name());

    Ok(summarize(manager.check_ins(), &reports))
}

fn summarize(check_ins: Vec<CheckIn>, reports: &[NotifyReport]) -> Transcript {
    let failures = reports.iter().map(|report| report.failures.len()).sum();
    debug!("{} passes, {} failures", reports.len(), failures);
    Transcript {
        check_ins,
        passes: reports.len(),
        failures,
    }
}

use registry::NotifyReport;

/// Someone whose current activity is watched.
pub trait Employee {
    fn name(&self) -> &str;

    fn activity(&self) -> &str;

    /// Commits the new activity, then notifies every registered observer once.
    fn set_activity(&mut self, activity: impl Into<String>) -> NotifyReport;
}

/// What a message-based employee broadcasts on each change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityUpdate {
    pub name: String,
    pub activity: String,
}

impl<E: Employee> From<&E> for ActivityUpdate {
    fn from(employee: &E) -> Self {
        ActivityUpdate {
            name: employee.name().to_string(),
            activity: employee.activity().to_string(),
        }
    }
}

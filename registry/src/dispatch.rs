use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
};

use log::{trace, warn};
use serde::Deserialize;
use strum::{Display, EnumString};

use crate::error::{CallbackError, CallbackResult};

/// What a notify pass does once a callback fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailurePolicy {
    /// Record the failure and keep notifying the remaining observers.
    #[default]
    Isolate,
    /// Record the failure and end the pass.
    Abort,
}

/// Outcome of one notify pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotifyReport {
    /// Callbacks that returned normally.
    pub delivered: usize,
    /// Registrations whose observer was already gone.
    pub skipped: usize,
    /// Failed callbacks, by position in the pass.
    pub failures: Vec<(usize, CallbackError)>,
    pub aborted: bool,
}

impl NotifyReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Runs `callback`, turning a panic into [`CallbackError::Panicked`].
pub(crate) fn invoke<S: ?Sized>(
    callback: &dyn Fn(&S) -> CallbackResult,
    subject: &S,
) -> CallbackResult {
    panic::catch_unwind(AssertUnwindSafe(|| callback(subject)))
        .unwrap_or_else(|payload| Err(CallbackError::Panicked(panic_message(payload.as_ref()))))
}

/// Calls every callback in order; `None` stands for a registration whose observer is gone.
pub(crate) fn deliver<'a, S, I>(callbacks: I, subject: &S, policy: FailurePolicy) -> NotifyReport
where
    S: ?Sized + 'a,
    I: IntoIterator<Item = Option<&'a dyn Fn(&S) -> CallbackResult>>,
{
    let mut report = NotifyReport::default();
    for (position, callback) in callbacks.into_iter().enumerate() {
        let Some(callback) = callback else {
            report.skipped += 1;
            continue;
        };
        match invoke(callback, subject) {
            Ok(()) => report.delivered += 1,
            Err(error) => {
                warn!("Observer #{position} failed: {error}");
                report.failures.push((position, error));
                if policy == FailurePolicy::Abort {
                    report.aborted = true;
                    break;
                }
            }
        }
    }
    trace!(
        "Notify pass done: {} delivered, {} skipped, {} failed",
        report.delivered,
        report.skipped,
        report.failures.len()
    );
    report
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| message.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, str::FromStr};

    use crate::error::{CallbackError, CallbackResult};

    use super::{deliver, invoke, FailurePolicy};

    #[test]
    fn test_invoke_catches_panics() {
        // Given
        let callback = |_: &u8| -> CallbackResult { panic!("coffee machine broke") };

        // When
        let result = invoke::<u8>(&callback, &1);

        // Then
        assert_eq!(
            Err(CallbackError::Panicked("coffee machine broke".to_string())),
            result
        );
    }

    #[test]
    fn test_invoke_relays_errors() {
        // Given
        let callback = |value: &u8| -> CallbackResult { Err(CallbackError::failed(value)) };

        // When
        let result = invoke::<u8>(&callback, &7);

        // Then
        assert_eq!(Err(CallbackError::Failed("7".to_string())), result);
    }

    #[test]
    fn test_deliver_isolates_failures() {
        // Given
        let calls = Cell::new(0);
        let ok: &dyn Fn(&u8) -> CallbackResult = &|_| {
            calls.set(calls.get() + 1);
            Ok(())
        };
        let failing: &dyn Fn(&u8) -> CallbackResult = &|_| Err(CallbackError::failed("busy"));
        let callbacks = vec![Some(ok), Some(failing), None, Some(ok)];

        // When
        let report = deliver(callbacks, &0, FailurePolicy::Isolate);

        // Then
        assert_eq!(2, calls.get(), "Should keep notifying after a failure");
        assert_eq!(2, report.delivered);
        assert_eq!(1, report.skipped);
        assert_eq!(vec![(1, CallbackError::failed("busy"))], report.failures);
        assert!(!report.aborted);
    }

    #[test]
    fn test_deliver_aborts_on_first_failure() {
        // Given
        let calls = Cell::new(0);
        let ok: &dyn Fn(&u8) -> CallbackResult = &|_| {
            calls.set(calls.get() + 1);
            Ok(())
        };
        let failing: &dyn Fn(&u8) -> CallbackResult = &|_| Err(CallbackError::failed("busy"));
        let callbacks = vec![Some(ok), Some(failing), Some(ok)];

        // When
        let report = deliver(callbacks, &0, FailurePolicy::Abort);

        // Then
        assert_eq!(1, calls.get());
        assert!(report.aborted);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_deliver_without_callbacks_is_noop() {
        // When
        let report = deliver(
            Vec::<Option<&dyn Fn(&u8) -> CallbackResult>>::new(),
            &0,
            FailurePolicy::default(),
        );

        // Then
        assert_eq!(0, report.delivered);
        assert!(report.is_clean());
    }

    #[test]
    fn test_failure_policy_parsing() {
        assert_eq!(Ok(FailurePolicy::Abort), FailurePolicy::from_str("abort"));
        assert_eq!("isolate", FailurePolicy::Isolate.to_string());
        assert!(FailurePolicy::from_str("ignore").is_err());
    }
}

//! # Dispatch Outcome
//!
//! Folds a dispatch result into the three-way outcome protocol layers render.
//!
//! Scan the failures in order: the first code that is not
//! `PartiallyFailed` short-circuits to `Failed`. All-partial (or an empty
//! aggregate) is `PartiallySucceeded`. No aggregate at all is `Succeeded`.

use crate::listener::ListenerErrorCode;
use crate::registry::{DispatchError, ListenerFailure};

/// Aggregate outcome of one ticket operation's listener dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Succeeded,
    PartiallySucceeded,
    Failed,
}

impl DispatchOutcome {
    /// Classify a dispatch result.
    pub fn classify(result: &Result<(), DispatchError>) -> Self {
        match result {
            Ok(()) => DispatchOutcome::Succeeded,
            Err(err) => Self::from_failures(&err.failures),
        }
    }

    /// Classify an aggregate failure list.
    pub fn from_failures(failures: &[ListenerFailure]) -> Self {
        if failures
            .iter()
            .any(|f| f.error.code != ListenerErrorCode::PartiallyFailed)
        {
            DispatchOutcome::Failed
        } else {
            DispatchOutcome::PartiallySucceeded
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TicketEventKind;
    use crate::listener::ListenerError;
    use proptest::prelude::*;

    const CODES: [ListenerErrorCode; 3] = [
        ListenerErrorCode::PartiallyFailed,
        ListenerErrorCode::InProgress,
        ListenerErrorCode::Failed,
    ];

    fn failure(code: ListenerErrorCode) -> ListenerFailure {
        ListenerFailure {
            listener: "l".to_string(),
            event: TicketEventKind::Remove,
            ticket_id: None,
            error: ListenerError::new(code, "x"),
        }
    }

    #[test]
    fn test_no_error_is_success() {
        assert_eq!(DispatchOutcome::classify(&Ok(())), DispatchOutcome::Succeeded);
    }

    #[test]
    fn test_empty_aggregate_is_partial() {
        let result = Err(DispatchError {
            failures: Vec::new(),
        });
        assert_eq!(
            DispatchOutcome::classify(&result),
            DispatchOutcome::PartiallySucceeded
        );
    }

    proptest! {
        #[test]
        fn test_classification_over_failure_mixes(
            codes in prop::collection::vec(prop::sample::select(CODES.to_vec()), 0..8)
        ) {
            let failures: Vec<_> = codes.iter().copied().map(failure).collect();
            let result = if failures.is_empty() {
                Ok(())
            } else {
                Err(DispatchError { failures })
            };

            let any_hard = codes
                .iter()
                .any(|c| *c != ListenerErrorCode::PartiallyFailed);
            let expected = if any_hard {
                DispatchOutcome::Failed
            } else if !codes.is_empty() {
                DispatchOutcome::PartiallySucceeded
            } else {
                DispatchOutcome::Succeeded
            };

            prop_assert_eq!(DispatchOutcome::classify(&result), expected);
        }
    }
}

//! Classification of raw status responses.

use crate::error::RemoteError;

use super::{NotFoundPolicy, PollFailure, PollSpec, RefreshOutcome, StatusReport};

/// Maps one status query response onto a [`RefreshOutcome`].
///
/// Rules, first match wins:
///
/// 1. 404 under [`NotFoundPolicy::AsDeleted`] ⇒ `NotFoundAsDeleted`
/// 2. any other remote error ⇒ `Failure` (never retried)
/// 3. status in the pending set ⇒ `Ongoing`
/// 4. status in the target set ⇒ `Terminal`
/// 5. any other status ⇒ `Failure(UnexpectedStatus)`
pub fn classify<T: StatusReport>(
    spec: &PollSpec,
    response: Result<T, RemoteError>,
) -> RefreshOutcome<T> {
    let payload = match response {
        Ok(payload) => payload,
        Err(err) if err.is_not_found() && spec.not_found_policy() == NotFoundPolicy::AsDeleted => {
            return RefreshOutcome::NotFoundAsDeleted;
        }
        Err(err) => return RefreshOutcome::Failure(PollFailure::Remote(err)),
    };

    let status = payload.status().to_owned();
    if spec.pending().contains(&status) {
        RefreshOutcome::Ongoing { status, payload }
    } else if spec.target().contains(&status) {
        RefreshOutcome::Terminal { status, payload }
    } else {
        RefreshOutcome::Failure(PollFailure::UnexpectedStatus {
            status,
            expected: spec.expected_statuses(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Status(&'static str);

    impl StatusReport for Status {
        fn status(&self) -> &str {
            self.0
        }
    }

    fn spec(delete_wait: bool) -> PollSpec {
        let builder = PollSpec::builder()
            .pending(["DELETING"])
            .target(["DELETED"])
            .timeout(Duration::from_secs(60))
            .min_interval(Duration::from_secs(1));
        if delete_wait {
            builder.not_found_as_deleted().build().unwrap()
        } else {
            builder.build().unwrap()
        }
    }

    #[test]
    fn not_found_is_deleted_for_delete_waits() {
        let outcome = classify::<Status>(&spec(true), Err(RemoteError::not_found("gone")));
        assert_eq!(outcome, RefreshOutcome::NotFoundAsDeleted);
    }

    #[test]
    fn not_found_is_failure_outside_delete_waits() {
        let outcome = classify::<Status>(&spec(false), Err(RemoteError::not_found("gone")));
        assert!(matches!(
            outcome,
            RefreshOutcome::Failure(PollFailure::Remote(ref e)) if e.is_not_found()
        ));
    }

    #[test]
    fn other_remote_errors_are_failures() {
        for err in [
            RemoteError::http(500, "internal"),
            RemoteError::http(401, "unauthorized"),
            RemoteError::transport("connection refused"),
            RemoteError::decode("expected value at line 1"),
        ] {
            let outcome = classify::<Status>(&spec(true), Err(err.clone()));
            assert_eq!(outcome, RefreshOutcome::Failure(PollFailure::Remote(err)));
        }
    }

    #[test]
    fn pending_status_is_ongoing() {
        let outcome = classify(&spec(true), Ok(Status("DELETING")));
        assert_eq!(
            outcome,
            RefreshOutcome::Ongoing {
                status: "DELETING".into(),
                payload: Status("DELETING"),
            }
        );
    }

    #[test]
    fn target_status_is_terminal() {
        let outcome = classify(&spec(true), Ok(Status("DELETED")));
        assert!(matches!(outcome, RefreshOutcome::Terminal { ref status, .. } if status == "DELETED"));
    }

    #[test]
    fn unknown_status_is_unexpected_failure() {
        let outcome = classify(&spec(true), Ok(Status("FAILED")));
        assert_eq!(
            outcome,
            RefreshOutcome::Failure(PollFailure::UnexpectedStatus {
                status: "FAILED".into(),
                expected: vec!["DELETING".into(), "DELETED".into()],
            })
        );
    }

    #[test]
    fn classification_is_idempotent() {
        let s = spec(true);
        let a = classify(&s, Ok(Status("DELETING")));
        let b = classify(&s, Ok(Status("DELETING")));
        assert_eq!(a, b);
    }
}

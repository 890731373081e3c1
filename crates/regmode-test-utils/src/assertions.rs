//! Custom assertion helpers for regmode tests.

use regmode_core::PollOutcome;

use crate::client::{RecordedCall, ScriptedClient};

/// Asserts that exactly `expected` status queries were issued.
///
/// # Panics
///
/// Panics if the count differs.
pub fn assert_get_calls(client: &ScriptedClient, expected: usize) {
    assert_eq!(
        client.get_count(),
        expected,
        "Expected {expected} status queries, calls were {:?}",
        client.calls()
    );
}

/// Asserts that no mutation followed the first status query.
///
/// # Panics
///
/// Panics if a `Set` call was recorded after a `Get` call.
pub fn assert_mutation_precedes_polling(client: &ScriptedClient) {
    let calls = client.calls();
    if let Some(first_get) = calls.iter().position(|c| matches!(c, RecordedCall::Get(_))) {
        assert!(
            !calls[first_get..]
                .iter()
                .any(|c| matches!(c, RecordedCall::Set(..))),
            "Mutation issued after polling started: {calls:?}"
        );
    }
}

/// Asserts that a poll converged.
///
/// # Panics
///
/// Panics if the outcome is not `Succeeded`.
pub fn assert_succeeded<T: std::fmt::Debug>(outcome: &PollOutcome<T>) {
    assert!(
        outcome.is_succeeded(),
        "Expected poll to succeed, but outcome was {outcome:?}"
    );
}

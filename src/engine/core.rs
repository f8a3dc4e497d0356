// src/engine/core.rs

//! Pure retry/health policy.
//!
//! Nothing here touches processes, clocks or Tokio, so the whole policy is
//! unit tested directly.

use std::time::Duration;

use crate::config::RunPolicy;

/// Where the retry loop is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryState {
    /// About to run attempt `attempt` (1-based).
    Attempting { attempt: u32 },
    /// An attempt exited with a healthy code.
    Succeeded,
    /// The last permitted attempt was unhealthy.
    ExhaustedRetries,
}

impl RetryState {
    pub fn initial() -> Self {
        RetryState::Attempting { attempt: 1 }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, RetryState::Attempting { .. })
    }
}

/// Advance the state machine after an attempt finished.
///
/// Terminal states are absorbing.
pub fn transition(state: RetryState, healthy: bool, max_attempts: u32) -> RetryState {
    match state {
        RetryState::Attempting { .. } if healthy => RetryState::Succeeded,
        RetryState::Attempting { attempt } if attempt >= max_attempts => {
            RetryState::ExhaustedRetries
        }
        RetryState::Attempting { attempt } => RetryState::Attempting {
            attempt: attempt + 1,
        },
        terminal => terminal,
    }
}

/// Whether the terminal attempt's output should be printed and delivered.
///
/// Unhealthy runs always surface. For healthy runs only `last_output` (the
/// final attempt, not the accumulated output) is checked.
pub fn should_surface(policy: &RunPolicy, healthy: bool, last_output: &str) -> bool {
    if !healthy || policy.always_print {
        return true;
    }
    policy
        .print_if_match
        .iter()
        .any(|needle| last_output.contains(needle.as_str()))
        || policy
            .print_if_not_match
            .iter()
            .any(|needle| !last_output.contains(needle.as_str()))
}

/// Separator appended to the accumulated output before a retry.
pub fn retry_marker(delay: Duration) -> String {
    if delay.is_zero() {
        "\n- Retrying -\n\n".to_string()
    } else {
        format!("\n- Retrying in {delay:?} -\n\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RunPolicy {
        RunPolicy::new("job", vec![])
    }

    #[test]
    fn healthy_attempt_succeeds_even_with_budget_left() {
        let next = transition(RetryState::Attempting { attempt: 1 }, true, 5);
        assert_eq!(next, RetryState::Succeeded);
    }

    #[test]
    fn unhealthy_attempt_with_budget_moves_to_next_attempt() {
        let next = transition(RetryState::Attempting { attempt: 2 }, false, 3);
        assert_eq!(next, RetryState::Attempting { attempt: 3 });
    }

    #[test]
    fn unhealthy_last_attempt_exhausts() {
        let next = transition(RetryState::Attempting { attempt: 3 }, false, 3);
        assert_eq!(next, RetryState::ExhaustedRetries);
        assert!(next.is_terminal());
    }

    #[test]
    fn single_attempt_policy_exhausts_immediately() {
        let next = transition(RetryState::initial(), false, 1);
        assert_eq!(next, RetryState::ExhaustedRetries);
    }

    #[test]
    fn terminal_states_are_absorbing() {
        assert_eq!(
            transition(RetryState::Succeeded, false, 3),
            RetryState::Succeeded
        );
        assert_eq!(
            transition(RetryState::ExhaustedRetries, true, 3),
            RetryState::ExhaustedRetries
        );
    }

    #[test]
    fn failed_run_always_surfaces() {
        let mut p = policy();
        p.print_if_not_match = vec!["anything".into()];
        assert!(should_surface(&p, false, "anything"));
        assert!(should_surface(&policy(), false, ""));
    }

    #[test]
    fn healthy_run_is_quiet_by_default() {
        assert!(!should_surface(&policy(), true, "all good"));
    }

    #[test]
    fn always_print_surfaces_healthy_run() {
        let mut p = policy();
        p.always_print = true;
        assert!(should_surface(&p, true, ""));
    }

    #[test]
    fn print_if_match_is_case_sensitive_substring() {
        let mut p = policy();
        p.print_if_match = vec!["WARN".into()];
        assert!(should_surface(&p, true, "2 WARNINGS"));
        assert!(!should_surface(&p, true, "2 warnings"));
    }

    #[test]
    fn print_if_not_match_fires_when_any_needle_is_absent() {
        let mut p = policy();
        p.print_if_not_match = vec!["backup complete".into(), "verified".into()];
        assert!(!should_surface(&p, true, "backup complete; verified"));
        assert!(should_surface(&p, true, "backup complete"));
    }

    #[test]
    fn retry_marker_names_the_delay() {
        assert_eq!(retry_marker(Duration::ZERO), "\n- Retrying -\n\n");
        assert_eq!(
            retry_marker(Duration::from_secs(5)),
            "\n- Retrying in 5s -\n\n"
        );
    }
}

// src/engine/runtime.rs

use std::fmt;

use chrono::Local;
use tracing::{debug, info, warn};

use crate::config::RunPolicy;
use crate::errors::{Result, RunnerError};
use crate::exec::{LaunchSpec, ProcessLauncher};

use super::core::{RetryState, retry_marker, should_surface, transition};
use super::{Attempt, RunOutcome};

/// Runs the child up to `1 + retries` times and produces a [`RunOutcome`].
///
/// This is the IO shell around the pure policy in [`super::core`]: it owns
/// the launcher, the clock and the inter-attempt sleep.
pub struct Engine<L: ProcessLauncher> {
    launcher: L,
}

impl<L: ProcessLauncher> fmt::Debug for Engine<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine").finish_non_exhaustive()
    }
}

impl<L: ProcessLauncher> Engine<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    /// Execute the retry loop.
    ///
    /// `warnings` are the setup warnings collected while resolving the policy;
    /// they are carried through unchanged into the outcome.
    ///
    /// A launch failure on any attempt aborts the whole run with
    /// [`RunnerError::LaunchError`].
    pub async fn run(&mut self, policy: &RunPolicy, warnings: Vec<String>) -> Result<RunOutcome> {
        let spec = LaunchSpec::from_policy(policy);
        let max_attempts = policy.max_attempts();

        let mut number = 1;
        let mut output = String::new();
        let mut first_start = None;

        loop {
            if number > 1 {
                if !policy.retry_delay.is_zero() {
                    debug!(delay = ?policy.retry_delay, "sleeping before retry");
                    tokio::time::sleep(policy.retry_delay).await;
                }
                output.push_str(&retry_marker(policy.retry_delay));
            }

            let attempt = self.attempt(number, &spec, policy).await?;
            let started = *first_start.get_or_insert(attempt.started);
            output.push_str(&attempt.output);

            let healthy = policy.healthy_exit_codes.contains(attempt.exit_code);
            let state = transition(RetryState::Attempting { attempt: number }, healthy, max_attempts);

            info!(
                job = %policy.job_name,
                attempt = attempt.number,
                max_attempts,
                exit_code = attempt.exit_code,
                healthy,
                "attempt finished"
            );

            match state {
                RetryState::Attempting { attempt: next } => number = next,
                RetryState::Succeeded | RetryState::ExhaustedRetries => {
                    let success = state == RetryState::Succeeded;
                    if !success {
                        warn!(job = %policy.job_name, attempts = number, "run failed; retries exhausted");
                    }
                    return Ok(RunOutcome {
                        job_name: policy.job_name.clone(),
                        output,
                        exit_code: attempt.exit_code,
                        success,
                        should_surface: should_surface(policy, healthy, &attempt.output),
                        started,
                        ended: attempt.ended,
                        attempts: number,
                        warnings,
                    });
                }
            }
        }
    }

    async fn attempt(&mut self, number: u32, spec: &LaunchSpec, policy: &RunPolicy) -> Result<Attempt> {
        let started = Local::now().fixed_offset();
        let exit = self
            .launcher
            .launch(spec.clone())
            .await
            .map_err(|source| RunnerError::LaunchError {
                command: policy.command_line(),
                source,
            })?;
        let ended = Local::now().fixed_offset();

        Ok(Attempt {
            number,
            started,
            ended,
            output: exit.output,
            exit_code: exit.exit_code,
        })
    }
}

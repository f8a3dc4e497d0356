#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use runner::config::RunPolicy;
use runner::types::HealthyExitCodes;

/// Builder for `RunPolicy` to simplify test setup.
pub struct RunPolicyBuilder {
    policy: RunPolicy,
}

impl RunPolicyBuilder {
    pub fn new(program: &str) -> Self {
        Self {
            policy: RunPolicy::new(program, Vec::new()),
        }
    }

    pub fn arg(mut self, arg: &str) -> Self {
        self.policy.args.push(arg.to_string());
        self
    }

    pub fn job_name(mut self, name: &str) -> Self {
        self.policy.job_name = name.to_string();
        self
    }

    pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.policy.work_dir = Some(dir.into());
        self
    }

    pub fn healthy(mut self, codes: &[i32]) -> Self {
        self.policy.healthy_exit_codes = HealthyExitCodes::new(codes.iter().copied());
        self
    }

    pub fn retries(mut self, retries: u32) -> Self {
        self.policy.retries = retries;
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.policy.retry_delay = delay;
        self
    }

    pub fn print_if_match(mut self, needle: &str) -> Self {
        self.policy.print_if_match.push(needle.to_string());
        self
    }

    pub fn print_if_not_match(mut self, needle: &str) -> Self {
        self.policy.print_if_not_match.push(needle.to_string());
        self
    }

    pub fn always_print(mut self) -> Self {
        self.policy.always_print = true;
        self
    }

    pub fn hide_env(mut self) -> Self {
        self.policy.hide_env = true;
        self
    }

    pub fn build(self) -> RunPolicy {
        self.policy
    }
}

#![allow(dead_code)]

pub use runner_test_utils::{FakeLauncher, RunPolicyBuilder, init_tracing, with_timeout};

use runner::report::{EnvSnapshot, Report};
use runner::types::Status;

/// Deterministic environment for report assertions.
pub fn env_snapshot() -> EnvSnapshot {
    EnvSnapshot {
        hostname: "testhost".into(),
        current_dir: "/tmp".into(),
        vars: vec![
            ("PATH".into(), "/usr/bin:/bin".into()),
            ("RUNNER_SMTP_PASS".into(), "correct horse".into()),
        ],
    }
}

pub fn failed_report() -> Report {
    Report {
        text: "[testhost] Failed running backup\nExit code: 1\n".into(),
        summary_line: "[testhost] Failed running backup".into(),
        status: Status::Failed,
        log_file_name: "backup.2024-01-01T00-00-00.000+0000.log".into(),
    }
}

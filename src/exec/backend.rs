// src/exec/backend.rs

//! Pluggable launcher abstraction.
//!
//! The engine asks a `ProcessLauncher` to run the child once per attempt and
//! gets back the combined output and exit code. A launch failure is an
//! `Err`, which the engine treats as fatal; a non-zero exit is an `Ok`.

use std::future::Future;
use std::io;
use std::path::PathBuf;
use std::pin::Pin;

use crate::config::RunPolicy;
use crate::types::RunAsUser;

use super::child::run_combined;

/// Everything needed to start the child once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub work_dir: Option<PathBuf>,
    pub run_as: Option<RunAsUser>,
}

impl LaunchSpec {
    pub fn from_policy(policy: &RunPolicy) -> Self {
        Self {
            program: policy.program.clone(),
            args: policy.args.clone(),
            work_dir: policy.work_dir.clone(),
            run_as: policy.run_as.clone(),
        }
    }
}

/// Result of a child that was started and ran to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildExit {
    /// stdout and stderr, interleaved in write order.
    pub output: String,
    /// `-1` when the child was killed by a signal.
    pub exit_code: i32,
}

/// Trait abstracting how the child program is started.
///
/// Production code uses [`RealLauncher`]; tests provide scripted outcomes
/// without spawning processes.
pub trait ProcessLauncher: Send {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = io::Result<ChildExit>> + Send + '_>>;
}

/// Launcher that spawns real OS processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealLauncher;

impl ProcessLauncher for RealLauncher {
    fn launch(
        &mut self,
        spec: LaunchSpec,
    ) -> Pin<Box<dyn Future<Output = io::Result<ChildExit>> + Send + '_>> {
        Box::pin(async move { run_combined(&spec).await })
    }
}

// src/engine/mod.rs

//! Run-evaluate-retry engine.
//!
//! The pure retry state machine and surfacing policy live in [`core`]; the
//! async shell that launches attempts, sleeps between them and accumulates
//! output lives in [`runtime`].

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::types::Status;

pub mod core;
pub mod runtime;

pub use self::core::{RetryState, retry_marker, should_surface, transition};
pub use runtime::Engine;

/// One execution of the child program.
#[derive(Debug, Clone)]
pub struct Attempt {
    pub number: u32,
    pub started: DateTime<FixedOffset>,
    pub ended: DateTime<FixedOffset>,
    pub output: String,
    pub exit_code: i32,
}

/// Terminal result of the engine.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub job_name: String,
    /// Output of every attempt, separated by retry markers.
    pub output: String,
    pub exit_code: i32,
    pub success: bool,
    pub should_surface: bool,
    /// Start of the first attempt.
    pub started: DateTime<FixedOffset>,
    /// End of the last attempt.
    pub ended: DateTime<FixedOffset>,
    pub attempts: u32,
    pub warnings: Vec<String>,
}

impl RunOutcome {
    pub fn status(&self) -> Status {
        Status::from_success(self.success)
    }

    pub fn duration(&self) -> TimeDelta {
        self.ended - self.started
    }
}

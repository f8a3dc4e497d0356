// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] provides the `ProcessLauncher` trait the engine talks to and
//!   the production `RealLauncher`. Tests swap in a scripted fake.
//! - [`child`] spawns one child process with stdout and stderr sharing a
//!   single pipe, applies the optional run-as identity, and waits for it.

pub mod backend;
pub mod child;

pub use backend::{ChildExit, LaunchSpec, ProcessLauncher, RealLauncher};

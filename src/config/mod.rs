// src/config/mod.rs

//! Configuration and policy model for runner.
//!
//! Responsibilities:
//! - Define the optional TOML defaults file (`model.rs`).
//! - Load it from disk (`loader.rs`).
//! - Define the resolved, immutable policy types handed to the engine,
//!   formatter and delivery layers (`policy.rs`).
//! - Merge CLI/env/file values, validate them and collect setup warnings
//!   (`resolve.rs`, `identity.rs`).

pub mod identity;
pub mod loader;
pub mod model;
pub mod policy;
pub mod resolve;

pub use loader::load_from_path;
pub use model::RawConfigFile;
pub use policy::{
    DeliveryConfig, DiscordConfig, LogConfig, LogOwner, MailConfig, NtfyConfig, ResolvedConfig,
    RunPolicy, SlackConfig,
};
pub use resolve::resolve;

//! Step runner module - runs one install step to a terminal status.
//!
//! This module provides:
//! - StepRunner for turning an InstallStep into commands and running them
//! - StepRunnerConfig for elevation, staging paths, and dry-run settings

mod step_runner;

pub use step_runner::{StepRunner, StepRunnerConfig};

//! Domain types for aitools-install
//!
//! - InstallStep: one row of the tool table (what to run, how to verify it)
//! - StepOutcome / InstallReport: what happened when the steps ran

pub mod outcome;
pub mod step;

pub use outcome::{InstallReport, StepOutcome, StepStatus, Verification};
pub use step::{Arch, InstallAction, InstallStep, host_machine};

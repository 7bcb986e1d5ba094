//! aitools-install - installs AI coding CLIs on a Linux host
//!
//! A fixed table of install steps (vendor shell installers, npm global
//! packages, prebuilt binaries) is run in order after a preflight check for
//! the executables those steps shell out to. A failing step is reported and
//! the next one still runs.

pub mod config;
pub mod domain;
pub mod error;
pub mod exec;
pub mod installer;
pub mod preflight;
pub mod report;
pub mod runner;
pub mod signal;
pub mod steps;

pub use error::{InstallerError, Result};

//! Error types for aitools-install
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur while installing tools
#[derive(Debug, Error)]
pub enum InstallerError {
    /// Required executables are not on the search path
    #[error("Missing prerequisites: {}", .0.join(", "))]
    MissingPrerequisite(Vec<String>),

    /// An external command exited non-zero or could not be spawned
    #[error("Failed to install {step}: {reason}")]
    StepFailed { step: String, reason: String },

    /// No binary is published for this host architecture
    #[error("Unsupported architecture: {0}")]
    UnsupportedArch(String),

    /// Interrupted by the operator
    #[error("Cancelled by user")]
    Cancelled,

    /// --only/--skip named a step that is not in the catalog
    #[error("Unknown step: {0}")]
    UnknownStep(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl InstallerError {
    /// Process exit status for this error when it reaches main
    pub fn exit_code(&self) -> i32 {
        match self {
            InstallerError::Cancelled => 0,
            _ => 1,
        }
    }
}

/// Result type alias for installer operations
pub type Result<T> = std::result::Result<T, InstallerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_prerequisite_error() {
        let err = InstallerError::MissingPrerequisite(vec!["curl".to_string(), "npm".to_string()]);
        assert_eq!(err.to_string(), "Missing prerequisites: curl, npm");
    }

    #[test]
    fn test_step_failed_error() {
        let err = InstallerError::StepFailed {
            step: "Qwen Code CLI".to_string(),
            reason: "exit status 1".to_string(),
        };
        assert_eq!(err.to_string(), "Failed to install Qwen Code CLI: exit status 1");
    }

    #[test]
    fn test_unsupported_arch_error() {
        let err = InstallerError::UnsupportedArch("riscv64".to_string());
        assert_eq!(err.to_string(), "Unsupported architecture: riscv64");
    }

    #[test]
    fn test_unknown_step_error() {
        let err = InstallerError::UnknownStep("cursor".to_string());
        assert_eq!(err.to_string(), "Unknown step: cursor");
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(InstallerError::Cancelled.exit_code(), 0);
        assert_eq!(InstallerError::MissingPrerequisite(vec![]).exit_code(), 1);
        assert_eq!(InstallerError::UnknownStep("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: InstallerError = io_err.into();
        assert!(matches!(err, InstallerError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }
}

//! The tool table
//!
//! Every tool the installer knows about, in the order it is installed and
//! listed in the summary.

use crate::domain::{Arch, InstallAction, InstallStep};
use crate::error::{InstallerError, Result};

const AMP_INSTALL_URL: &str = "https://ampcode.com/install.sh";
const ACLI_BASE_URL: &str = "https://acli.atlassian.com/linux/latest";

/// The fixed list of install steps
pub fn catalog() -> Vec<InstallStep> {
    vec![
        InstallStep::new(
            "amp",
            "Amp Code CLI",
            InstallAction::Script {
                url: AMP_INSTALL_URL.to_string(),
                interpreter: "bash".to_string(),
            },
        )
        .prerequisite("curl"),
        InstallStep::new(
            "acli",
            "Atlassian CLI (Rovo Dev)",
            InstallAction::Binary {
                binary_name: "acli".to_string(),
                urls: vec![
                    (Arch::Amd64, format!("{}/acli_linux_amd64/acli", ACLI_BASE_URL)),
                    (Arch::Arm64, format!("{}/acli_linux_arm64/acli", ACLI_BASE_URL)),
                ],
            },
        )
        .prerequisite("curl")
        .verify("acli version")
        .usage("acli rovodev")
        .usage_note("Requires login: acli login"),
        InstallStep::new(
            "gemini",
            "Google Gemini CLI",
            InstallAction::NpmGlobal {
                package: "@google/gemini-cli".to_string(),
            },
        )
        .prerequisite("npm"),
        InstallStep::new(
            "qwen",
            "Qwen Code CLI",
            InstallAction::NpmGlobal {
                package: "@qwen-code/qwen-code".to_string(),
            },
        )
        .prerequisite("npm"),
    ]
}

/// Apply --only/--skip filters, preserving table order.
///
/// Every id in either list must exist in `steps`.
pub fn select(steps: Vec<InstallStep>, only: &[String], skip: &[String]) -> Result<Vec<InstallStep>> {
    for id in only.iter().chain(skip) {
        if !steps.iter().any(|s| &s.id == id) {
            return Err(InstallerError::UnknownStep(id.clone()));
        }
    }

    Ok(steps
        .into_iter()
        .filter(|s| only.is_empty() || only.contains(&s.id))
        .filter(|s| !skip.contains(&s.id))
        .collect())
}

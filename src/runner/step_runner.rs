//! Step runner implementation - executes one install step.
//!
//! The StepRunner turns an InstallStep into shell command lines, runs them
//! through a CommandExecutor, and records the outcome. Failures never
//! escape as errors: they are printed and stored on the StepOutcome so the
//! next step can still run. Only output (IO) errors propagate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::InstallConfig;
use crate::domain::{Arch, InstallAction, InstallStep, StepOutcome, Verification, host_machine};
use crate::error::{InstallerError, Result};
use crate::exec::{CommandExecutor, ShellCommand};
use crate::report::Reporter;

/// Configuration for the StepRunner.
#[derive(Debug, Clone)]
pub struct StepRunnerConfig {
    /// Privilege escalation prefix for system-wide writes
    pub elevate_with: Option<String>,
    /// Where binaries end up
    pub bin_dir: PathBuf,
    /// Where binary downloads are staged
    pub temp_dir: PathBuf,
    /// Run each step's verify command after a successful install
    pub verify: bool,
    /// Print commands instead of running them
    pub dry_run: bool,
    /// Echo commands before running them
    pub verbose: bool,
    /// Host machine name used to pick binary downloads
    pub machine: String,
}

impl Default for StepRunnerConfig {
    fn default() -> Self {
        Self::from_install(&InstallConfig::default())
    }
}

impl StepRunnerConfig {
    pub fn from_install(install: &InstallConfig) -> Self {
        Self {
            elevate_with: install.elevation().map(str::to_string),
            bin_dir: install.bin_dir.clone(),
            temp_dir: install.temp_dir.clone(),
            verify: install.verify,
            dry_run: false,
            verbose: false,
            machine: host_machine().to_string(),
        }
    }
}

/// Quote a value for bash
fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

pub struct StepRunner<E: CommandExecutor> {
    executor: Arc<E>,
    config: StepRunnerConfig,
}

impl<E: CommandExecutor> StepRunner<E> {
    pub fn new(executor: Arc<E>, config: StepRunnerConfig) -> Self {
        Self { executor, config }
    }

    pub fn config(&self) -> &StepRunnerConfig {
        &self.config
    }

    /// Escalation program this step needs on PATH, if any
    pub fn elevation_program(&self, step: &InstallStep) -> Option<String> {
        if !step.action.needs_elevation() {
            return None;
        }
        self.config
            .elevate_with
            .as_deref()
            .and_then(|p| p.split_whitespace().next())
            .map(str::to_string)
    }

    fn elevated(&self, line: String) -> String {
        match &self.config.elevate_with {
            Some(prefix) => format!("{} {}", prefix, line),
            None => line,
        }
    }

    /// Command line for a script or npm action
    pub fn command_line(&self, action: &InstallAction) -> Option<String> {
        match action {
            InstallAction::Script { url, interpreter } => {
                Some(format!("set -o pipefail; curl -fsSL {} | {}", url, interpreter))
            }
            InstallAction::NpmGlobal { package } => {
                Some(self.elevated(format!("npm install -g {}", package)))
            }
            InstallAction::Binary { .. } => None,
        }
    }

    /// Run one step to a terminal status
    pub async fn run<W: std::io::Write>(
        &self,
        step: &InstallStep,
        reporter: &mut Reporter<W>,
    ) -> Result<StepOutcome> {
        let mut outcome = StepOutcome::pending(step);
        reporter.step_started(&step.display_name)?;
        outcome.start();
        log::info!("Installing {} ({})", step.display_name, step.id);

        match self.install(step, reporter).await {
            Ok(()) => {
                let verification = self.verify(step).await;
                match &verification {
                    Verification::Unconfirmed => {
                        reporter.error(&format!(
                            "Installed {}, but could not verify the version.",
                            step.display_name
                        ))?;
                    }
                    Verification::Confirmed(version) if !version.is_empty() => {
                        reporter.success(&format!(
                            "{} installed successfully ({}).",
                            step.display_name, version
                        ))?;
                    }
                    _ => {
                        reporter.success(&format!("{} installed successfully.", step.display_name))?;
                    }
                }
                outcome.succeed(verification);
            }
            Err(InstallerError::StepFailed { step: name, reason }) => {
                log::warn!("{} failed: {}", name, reason);
                reporter.error(&format!("Failed to install {}.", name))?;
                reporter.error_details(&reason)?;
                outcome.fail(reason);
            }
            Err(e @ InstallerError::UnsupportedArch(_)) => {
                log::warn!("Skipping {}: {}", step.id, e);
                reporter.error(&e.to_string())?;
                outcome.skip(e.to_string());
            }
            Err(e) => return Err(e),
        }

        Ok(outcome)
    }

    async fn install<W: std::io::Write>(&self, step: &InstallStep, reporter: &mut Reporter<W>) -> Result<()> {
        match &step.action {
            InstallAction::Binary { binary_name, .. } => {
                let machine = self.config.machine.as_str();
                let target = Arch::from_machine(machine)
                    .and_then(|arch| step.action.url_for(arch).map(|url| (arch, url)))
                    .ok_or_else(|| InstallerError::UnsupportedArch(machine.to_string()))?;

                let temp = self.config.temp_dir.join(format!("{}_temp", binary_name));
                let dest = self.config.bin_dir.join(binary_name);

                let result = self.install_binary(step, target, &temp, &dest, reporter).await;
                if result.is_err() && temp.exists() {
                    match std::fs::remove_file(&temp) {
                        Ok(()) => log::info!("Removed {}", temp.display()),
                        Err(e) => log::warn!("Failed to remove {}: {}", temp.display(), e),
                    }
                }
                result
            }
            action => match self.command_line(action) {
                Some(line) => self.exec(step, line, reporter).await,
                None => Ok(()),
            },
        }
    }

    async fn install_binary<W: std::io::Write>(
        &self,
        step: &InstallStep,
        (arch, url): (Arch, &str),
        temp: &Path,
        dest: &Path,
        reporter: &mut Reporter<W>,
    ) -> Result<()> {
        reporter.detail(&format!("⬇️  Downloading binary for {}...", arch.as_str()))?;
        let temp_arg = shell_quote(&temp.to_string_lossy());
        self.exec(step, format!("curl -fL -o {} {}", temp_arg, shell_quote(url)), reporter)
            .await?;

        if !self.config.dry_run {
            make_executable(temp).map_err(|e| InstallerError::StepFailed {
                step: step.display_name.clone(),
                reason: format!("chmod {}: {}", temp.display(), e),
            })?;
        }

        reporter.detail(&format!("📦 Moving to {}...", dest.display()))?;
        let line = self.elevated(format!("mv {} {}", temp_arg, shell_quote(&dest.to_string_lossy())));
        self.exec(step, line, reporter).await
    }

    /// Run a command line, mapping any failure to StepFailed
    async fn exec<W: std::io::Write>(&self, step: &InstallStep, line: String, reporter: &mut Reporter<W>) -> Result<()> {
        if self.config.dry_run || self.config.verbose {
            reporter.command(&line)?;
        }
        if self.config.dry_run {
            return Ok(());
        }

        let failed = |reason: String| InstallerError::StepFailed {
            step: step.display_name.clone(),
            reason,
        };

        match self.executor.run(&ShellCommand::new(line.as_str())).await {
            Ok(output) if output.is_success() => Ok(()),
            Ok(output) => Err(failed(format!("`{}` failed with {}", line, output.error_text()))),
            Err(e) => Err(failed(format!("`{}` could not be started: {}", line, e))),
        }
    }

    async fn verify(&self, step: &InstallStep) -> Verification {
        let Some(command) = step.verify.as_deref() else {
            return Verification::NotRequested;
        };
        if !self.config.verify || self.config.dry_run {
            return Verification::NotRequested;
        }

        match self.executor.run(&ShellCommand::captured(command)).await {
            Ok(output) if output.is_success() => {
                let version = output.stdout.lines().next().unwrap_or("").trim().to_string();
                log::info!("{} verified: {}", step.id, version);
                Verification::Confirmed(version)
            }
            Ok(output) => {
                log::warn!("{} verify failed: {}", step.id, output.error_text());
                Verification::Unconfirmed
            }
            Err(e) => {
                log::warn!("{} verify could not start: {}", step.id, e);
                Verification::Unconfirmed
            }
        }
    }
}

#[cfg(unix)]
fn make_executable(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(path: &Path) -> std::io::Result<()> {
    std::fs::metadata(path).map(|_| ())
}

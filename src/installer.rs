//! Install orchestration
//!
//! Banner, preflight, grace delay, every selected step in order, summary.
//! Steps filtered out by --only/--skip still appear in the summary, as skipped.
//! A cancel future races each await point; when it resolves the remaining
//! steps are abandoned.

use std::future::Future;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use crate::domain::{InstallAction, InstallReport, InstallStep, StepOutcome};
use crate::error::{InstallerError, Result};
use crate::exec::CommandExecutor;
use crate::preflight::{self, PathResolver, PreflightReport};
use crate::report::Reporter;
use crate::runner::{StepRunner, StepRunnerConfig};
use crate::steps;

/// Top-level command to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    List { json: bool },
    Check,
}

/// Per-invocation switches from the command line
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    pub dry_run: bool,
    pub verbose: bool,
    pub only: Vec<String>,
    pub skip: Vec<String>,
}

pub struct Installer<E, R, W>
where
    E: CommandExecutor,
    R: PathResolver,
    W: Write,
{
    config: Config,
    options: InstallOptions,
    steps: Vec<InstallStep>,
    executor: Arc<E>,
    resolver: R,
    reporter: Reporter<W>,
    machine: Option<String>,
}

impl<E, R, W> Installer<E, R, W>
where
    E: CommandExecutor,
    R: PathResolver,
    W: Write,
{
    /// Installer over the built-in tool table
    pub fn new(config: Config, executor: Arc<E>, resolver: R, reporter: Reporter<W>) -> Self {
        Self {
            config,
            options: InstallOptions::default(),
            steps: steps::catalog(),
            executor,
            resolver,
            reporter,
            machine: None,
        }
    }

    pub fn with_options(mut self, options: InstallOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the tool table
    pub fn with_steps(mut self, steps: Vec<InstallStep>) -> Self {
        self.steps = steps;
        self
    }

    /// Pretend to run on another machine type
    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    pub fn into_reporter(self) -> Reporter<W> {
        self.reporter
    }

    fn runner(&self) -> StepRunner<E> {
        let mut config = StepRunnerConfig::from_install(&self.config.install);
        config.dry_run = self.options.dry_run;
        config.verbose = self.options.verbose;
        if let Some(machine) = &self.machine {
            config.machine = machine.clone();
        }
        StepRunner::new(Arc::clone(&self.executor), config)
    }

    fn selected_steps(&self) -> Result<Vec<InstallStep>> {
        steps::select(self.steps.clone(), &self.options.only, &self.options.skip)
    }

    /// Configured requirements, the executor's shell, and what the selected
    /// steps need
    pub fn required_programs(&self, steps: &[InstallStep]) -> Vec<String> {
        let runner = self.runner();
        let mut required = self.config.preflight.required.clone();
        required.extend(self.executor.shell().map(str::to_string));
        for step in steps {
            required.extend(step.prerequisites.iter().cloned());
            if let InstallAction::Script { interpreter, .. } = &step.action {
                required.push(interpreter.clone());
            }
            required.extend(runner.elevation_program(step));
        }

        let mut unique: Vec<String> = Vec::with_capacity(required.len());
        for program in required {
            if !unique.contains(&program) {
                unique.push(program);
            }
        }
        unique
    }

    /// Run one top-level command and map the result to a process exit status.
    ///
    /// Missing prerequisites exit 1 and a cancelled run exits 0; any other
    /// error is returned to the caller.
    pub async fn execute<F>(&mut self, action: Action, cancel: F) -> Result<i32>
    where
        F: Future<Output = ()>,
    {
        let result = match action {
            Action::Install => self.run(cancel).await.map(|_| 0),
            Action::List { json } => self.list(json).map(|_| 0),
            Action::Check => self
                .check()
                .map(|report| if report.is_ready() { 0 } else { 1 }),
        };

        match result {
            Ok(code) => Ok(code),
            Err(e @ (InstallerError::MissingPrerequisite(_) | InstallerError::Cancelled)) => {
                log::info!("Stopped: {}", e);
                Ok(e.exit_code())
            }
            Err(e) => Err(e),
        }
    }

    /// Run preflight only and print the results
    pub fn check(&mut self) -> Result<PreflightReport> {
        let steps = self.selected_steps()?;
        let required = self.required_programs(&steps);
        let report = preflight::check(&required, &self.resolver);

        self.reporter.preflight_table(&report)?;
        if !report.is_ready() {
            self.reporter
                .preflight_failed(&report, &self.config.preflight.remediation)?;
        }
        Ok(report)
    }

    /// Print the selected steps as a table, or as JSON
    pub fn list(&mut self, json: bool) -> Result<()> {
        let steps = self.selected_steps()?;
        if json {
            self.reporter.list_json(&steps)?;
        } else {
            self.reporter.list(&steps)?;
        }
        Ok(())
    }

    /// Install every selected step, stopping early only if `cancel` resolves.
    ///
    /// Steps removed by --only/--skip are reported as skipped, and the
    /// summary covers the whole table.
    pub async fn run<F>(&mut self, cancel: F) -> Result<InstallReport>
    where
        F: Future<Output = ()>,
    {
        let selected = self.selected_steps()?;
        self.reporter.banner(&selected)?;

        let required = self.required_programs(&selected);
        let preflight = preflight::check(&required, &self.resolver);
        if !preflight.is_ready() {
            self.reporter
                .preflight_failed(&preflight, &self.config.preflight.remediation)?;
            return Err(InstallerError::MissingPrerequisite(preflight.missing));
        }

        tokio::pin!(cancel);

        // Last chance to back out before anything is touched
        let delay = Duration::from_millis(self.config.install.start_delay_ms);
        let interrupted = tokio::select! {
            biased;
            _ = &mut cancel => true,
            _ = tokio::time::sleep(delay) => false,
        };
        if interrupted {
            return self.cancelled(0);
        }

        let runner = self.runner();
        let catalog = self.steps.clone();
        let mut report = InstallReport::default();
        let mut completed = 0;

        for step in &catalog {
            if !selected.iter().any(|s| s.id == step.id) {
                let mut outcome = StepOutcome::pending(step);
                outcome.skip("not selected");
                report.push(outcome);
                continue;
            }

            let result = tokio::select! {
                biased;
                _ = &mut cancel => None,
                outcome = runner.run(step, &mut self.reporter) => Some(outcome),
            };
            match result {
                Some(outcome) => report.push(outcome?),
                None => return self.cancelled(completed),
            }
            completed += 1;
        }

        log::info!(
            "Finished: {} succeeded, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped()
        );
        self.reporter.summary(&catalog, &report)?;
        Ok(report)
    }

    fn cancelled(&mut self, completed: usize) -> Result<InstallReport> {
        log::warn!("Cancelled by user after {} step(s)", completed);
        self.reporter.cancelled()?;
        Err(InstallerError::Cancelled)
    }
}

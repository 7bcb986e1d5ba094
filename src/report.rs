//! Terminal output for an install run
//!
//! Everything the user sees goes through Reporter so the orchestrator can be
//! driven against an in-memory buffer in tests.

use colored::*;
use std::io::{self, Write};

use crate::domain::{InstallReport, InstallStep};
use crate::preflight::PreflightReport;

const RULE_WIDTH: usize = 50;

pub struct Reporter<W: Write> {
    out: W,
}

impl Reporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH).magenta())
    }

    /// Header and the numbered list of what will be installed
    pub fn banner(&mut self, steps: &[InstallStep]) -> io::Result<()> {
        self.rule()?;
        writeln!(self.out, "{}", "   🚀 AI Developer Tools Installer (Linux)".magenta().bold())?;
        self.rule()?;
        writeln!(self.out, "The following tools will be installed:")?;
        for (i, step) in steps.iter().enumerate() {
            writeln!(self.out, " {}. {}", i + 1, step.display_name)?;
        }
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;
        self.out.flush()
    }

    pub fn step_started(&mut self, display_name: &str) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{}", format!("🔵 Installing {}...", display_name).blue())?;
        self.out.flush()
    }

    /// Indented progress line within a step
    pub fn detail(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "   {}", message)
    }

    /// Echo of a command about to run (or that would run, in a dry run)
    pub fn command(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "   {} {}", "$".dimmed(), line.cyan())?;
        self.out.flush()
    }

    pub fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", format!("✅ {}", message).green())
    }

    pub fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", format!("❌ {}", message).red())
    }

    pub fn error_details(&mut self, details: &str) -> io::Result<()> {
        writeln!(self.out, "   Error Details: {}", details)
    }

    pub fn warning(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", format!("⚠️  {}", message).yellow())
    }

    /// Missing-prerequisite report with a remediation hint
    pub fn preflight_failed(&mut self, report: &PreflightReport, remediation: &str) -> io::Result<()> {
        self.warning("The following tools are missing and must be installed first:")?;
        writeln!(self.out, "   Missing: {}", report.missing.join(", "))?;
        writeln!(self.out, "   {}", format!("Try: {}", remediation).cyan())?;
        self.out.flush()
    }

    /// Preflight results for the `check` subcommand
    pub fn preflight_table(&mut self, report: &PreflightReport) -> io::Result<()> {
        for (program, path) in &report.found {
            writeln!(self.out, "   {} {:<8} {}", "✔".green(), program, path.display())?;
        }
        for program in &report.missing {
            writeln!(self.out, "   {} {:<8} {}", "✘".red(), program, "not found".red())?;
        }
        self.out.flush()
    }

    /// Closing banner, invocation commands, and the outcome tally
    pub fn summary(&mut self, steps: &[InstallStep], report: &InstallReport) -> io::Result<()> {
        writeln!(self.out)?;
        self.rule()?;
        writeln!(self.out, "{}", "🎉 Installation Complete".magenta().bold())?;
        self.rule()?;
        writeln!(self.out, "{}", "📌 How to use:".bold())?;

        let width = steps.iter().map(|s| s.display_name.len()).max().unwrap_or(0);
        for (i, step) in steps.iter().enumerate() {
            write!(
                self.out,
                "   {}. {:<width$} -> {}",
                i + 1,
                step.display_name,
                step.usage.cyan(),
                width = width
            )?;
            match &step.usage_note {
                Some(note) => writeln!(self.out, " ({})", note)?,
                None => writeln!(self.out)?,
            }
        }

        writeln!(
            self.out,
            "\n{} succeeded, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped()
        )?;
        writeln!(
            self.out,
            "{}",
            "Note: Please restart your terminal if commands are not found.".yellow()
        )?;
        self.out.flush()
    }

    pub fn cancelled(&mut self) -> io::Result<()> {
        writeln!(self.out, "\n\n{}", "❌ Cancelled by user.".red())?;
        self.out.flush()
    }

    /// Step table for the `list` subcommand
    pub fn list(&mut self, steps: &[InstallStep]) -> io::Result<()> {
        for step in steps {
            writeln!(
                self.out,
                "{:<8} {:<28} {}",
                step.id.bold(),
                step.display_name,
                step.usage.cyan()
            )?;
        }
        self.out.flush()
    }

    /// Step table as pretty JSON, for `list --json`
    pub fn list_json(&mut self, steps: &[InstallStep]) -> io::Result<()> {
        serde_json::to_writer_pretty(&mut self.out, steps)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

// Shell command execution
// Runs install command lines under bash and reports how they exited

use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// A command line to run under `bash -c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    /// The full command line
    pub line: String,
    /// Capture stdout/stderr instead of streaming them to the terminal
    pub capture: bool,
}

impl ShellCommand {
    /// A command whose output streams straight to the terminal
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            capture: false,
        }
    }

    /// A command whose output is captured for inspection
    pub fn captured(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            capture: true,
        }
    }
}

/// How a command exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; None when killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Default::default()
        }
    }

    pub fn success_with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    /// Human-readable failure text: exit status plus the tail of stderr
    pub fn error_text(&self) -> String {
        let status = match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            status
        } else {
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            format!("{}: {}", status, tail.join("\n"))
        }
    }
}

/// Runs shell commands. The seam tests mock.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn run(&self, command: &ShellCommand) -> std::io::Result<CommandOutput>;

    /// Interpreter every command line is handed to, if any
    fn shell(&self) -> Option<&str> {
        None
    }
}

/// Executor that spawns `bash -c <line>`
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    shell: String,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self {
            shell: "bash".to_string(),
        }
    }
}

impl ShellExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different interpreter, e.g. `sh`
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self { shell: shell.into() }
    }
}

#[async_trait]
impl CommandExecutor for ShellExecutor {
    fn shell(&self) -> Option<&str> {
        Some(&self.shell)
    }

    async fn run(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        log::info!("Running: {}", command.line);

        let mut cmd = Command::new(&self.shell);
        cmd.arg("-c").arg(&command.line);
        // Dropping the future on Ctrl-C must not leave the child behind
        cmd.kill_on_drop(true);

        if command.capture {
            cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            let output = cmd.output().await?;
            let result = CommandOutput {
                code: output.status.code(),
                stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            };
            log::debug!("Exit {:?}: {}", result.code, command.line);
            Ok(result)
        } else {
            cmd.stdin(Stdio::inherit()).stdout(Stdio::inherit()).stderr(Stdio::inherit());
            let status = cmd.status().await?;
            log::debug!("Exit {:?}: {}", status.code(), command.line);
            Ok(CommandOutput {
                code: status.code(),
                ..Default::default()
            })
        }
    }
}

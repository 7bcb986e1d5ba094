//! Scripted executor for tests
//!
//! Commands are matched by substring against registered rules, first match
//! wins. Anything unmatched succeeds with empty output. Every command line
//! is recorded in order. Like the real executor it claims to run through
//! bash, so preflight sees the same requirements.

use async_trait::async_trait;
use std::sync::Mutex;

use super::command::{CommandExecutor, CommandOutput, ShellCommand};

/// What a mocked command does
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Exit with this output
    Output(CommandOutput),
    /// Fail to spawn with this message
    SpawnError(String),
    /// Never complete
    Hang,
}

#[derive(Debug)]
pub struct MockExecutor {
    rules: Vec<(String, MockResponse)>,
    calls: Mutex<Vec<String>>,
    shell: Option<String>,
}

impl Default for MockExecutor {
    fn default() -> Self {
        Self {
            rules: Vec::new(),
            calls: Mutex::new(Vec::new()),
            shell: Some("bash".to_string()),
        }
    }
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a different interpreter; None claims none
    pub fn with_shell(mut self, shell: Option<&str>) -> Self {
        self.shell = shell.map(str::to_string);
        self
    }

    /// Respond to commands containing `pattern`
    pub fn on(mut self, pattern: impl Into<String>, response: MockResponse) -> Self {
        self.rules.push((pattern.into(), response));
        self
    }

    /// Commands containing `pattern` exit with `code`
    pub fn fail_on(self, pattern: impl Into<String>, code: i32, stderr: impl Into<String>) -> Self {
        self.on(pattern, MockResponse::Output(CommandOutput::failure(code, stderr)))
    }

    /// Commands containing `pattern` succeed and print `stdout`
    pub fn stdout_on(self, pattern: impl Into<String>, stdout: impl Into<String>) -> Self {
        self.on(pattern, MockResponse::Output(CommandOutput::success_with_stdout(stdout)))
    }

    /// Commands containing `pattern` never finish
    pub fn hang_on(self, pattern: impl Into<String>) -> Self {
        self.on(pattern, MockResponse::Hang)
    }

    /// Every command line run so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of recorded commands containing `pattern`
    pub fn count_matching(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|c| c.contains(pattern)).count()
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    fn shell(&self) -> Option<&str> {
        self.shell.as_deref()
    }

    async fn run(&self, command: &ShellCommand) -> std::io::Result<CommandOutput> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.line.clone());
        }

        let response = self
            .rules
            .iter()
            .find(|(pattern, _)| command.line.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        match response {
            None => Ok(CommandOutput::success()),
            Some(MockResponse::Output(output)) => Ok(output),
            Some(MockResponse::SpawnError(msg)) => Err(std::io::Error::other(msg)),
            Some(MockResponse::Hang) => std::future::pending().await,
        }
    }
}

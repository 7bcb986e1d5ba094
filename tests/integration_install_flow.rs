//! End-to-end install flow integration tests
//!
//! Drives the Installer with a scripted executor and a fixed PATH so no real
//! command is ever run.

use std::sync::Arc;
use std::time::Duration;

use aitools_install::InstallerError;
use aitools_install::config::Config;
use aitools_install::domain::{StepStatus, Verification};
use aitools_install::exec::MockExecutor;
use aitools_install::installer::{InstallOptions, Installer};
use aitools_install::preflight::StaticResolver;
use aitools_install::report::Reporter;
use tempfile::TempDir;

type TestInstaller = Installer<MockExecutor, StaticResolver, Vec<u8>>;

fn test_config(temp: &TempDir) -> Config {
    let mut config = Config::default();
    config.install.start_delay_ms = 0;
    config.install.temp_dir = temp.path().to_path_buf();
    config
}

fn all_present() -> StaticResolver {
    StaticResolver::new().with_all(["curl", "npm", "sudo", "bash"])
}

fn build(temp: &TempDir, exec: MockExecutor, resolver: StaticResolver) -> (Arc<MockExecutor>, TestInstaller) {
    let exec = Arc::new(exec);
    let installer = Installer::new(test_config(temp), Arc::clone(&exec), resolver, Reporter::new(Vec::new()))
        .with_machine("x86_64");
    (exec, installer)
}

fn output(installer: TestInstaller) -> String {
    String::from_utf8(installer.into_reporter().into_inner()).unwrap()
}

/// Stage the acli download the mocked curl never writes
fn stage_acli(temp: &TempDir) {
    std::fs::write(temp.path().join("acli_temp"), b"#!/bin/sh\necho acli\n").unwrap();
}

/// Missing prerequisites stop the run before any step
#[tokio::test]
async fn test_missing_prerequisites_attempt_nothing() {
    let temp = TempDir::new().unwrap();
    let (exec, mut installer) = build(&temp, MockExecutor::new(), StaticResolver::new());

    let err = installer.run(std::future::pending()).await.unwrap_err();

    match &err {
        InstallerError::MissingPrerequisite(missing) => {
            assert_eq!(missing, &vec!["curl", "npm", "sudo", "bash"]);
        }
        other => panic!("Expected MissingPrerequisite, got {:?}", other),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(exec.calls().is_empty());

    let out = output(installer);
    assert!(out.contains("Missing: curl, npm, sudo, bash"));
    assert!(out.contains("sudo apt update && sudo apt install -y curl nodejs npm"));
    assert!(!out.contains("Installing"));
}

/// A single missing program is enough to halt
#[tokio::test]
async fn test_one_missing_prerequisite_halts() {
    let temp = TempDir::new().unwrap();
    let resolver = StaticResolver::new().with_all(["curl", "sudo", "bash"]);
    let (exec, mut installer) = build(&temp, MockExecutor::new(), resolver);

    let err = installer.run(std::future::pending()).await.unwrap_err();
    assert!(matches!(err, InstallerError::MissingPrerequisite(ref m) if m == &vec!["npm".to_string()]));
    assert!(exec.calls().is_empty());
}

/// Every step runs exactly once and reports success
#[tokio::test]
async fn test_all_steps_succeed() {
    let temp = TempDir::new().unwrap();
    stage_acli(&temp);
    let exec = MockExecutor::new().stdout_on("acli version", "acli version 1.3.0");
    let (exec, mut installer) = build(&temp, exec, all_present());

    let report = installer.run(std::future::pending()).await.unwrap();

    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.succeeded(), 4);
    assert!(report.outcomes.iter().all(|o| o.status == StepStatus::Succeeded));
    assert_eq!(
        report.get("acli").unwrap().verification,
        Verification::Confirmed("acli version 1.3.0".into())
    );

    let calls = exec.calls();
    assert_eq!(calls.len(), 6);
    assert!(calls[0].contains("curl -fsSL https://ampcode.com/install.sh | bash"));
    assert!(calls[1].contains("acli_linux_amd64"));
    assert!(calls[2].starts_with("sudo mv"));
    assert_eq!(calls[3], "acli version");
    assert_eq!(calls[4], "sudo npm install -g @google/gemini-cli");
    assert_eq!(calls[5], "sudo npm install -g @qwen-code/qwen-code");

    let out = output(installer);
    assert_eq!(out.matches("installed successfully").count(), 4);
    assert!(out.contains("4 succeeded, 0 failed, 0 skipped"));
}

/// A failing step does not stop the ones after it
#[tokio::test]
async fn test_failure_does_not_block_later_steps() {
    let temp = TempDir::new().unwrap();
    stage_acli(&temp);
    let exec = MockExecutor::new().fail_on("ampcode.com", 22, "curl: (22) The requested URL returned error: 404");
    let (exec, mut installer) = build(&temp, exec, all_present());

    let report = installer.run(std::future::pending()).await.unwrap();

    assert_eq!(report.get("amp").unwrap().status, StepStatus::Failed);
    assert_eq!(report.get("acli").unwrap().status, StepStatus::Succeeded);
    assert_eq!(report.get("gemini").unwrap().status, StepStatus::Succeeded);
    assert_eq!(report.get("qwen").unwrap().status, StepStatus::Succeeded);
    assert_eq!(exec.count_matching("@qwen-code/qwen-code"), 1);

    let out = output(installer);
    assert!(out.contains("Failed to install Amp Code CLI."));
    assert!(out.contains("404"));
    assert!(out.contains("3 succeeded, 1 failed, 0 skipped"));
}

/// A middle step failing still lets the last step run
#[tokio::test]
async fn test_middle_failure_independence() {
    let temp = TempDir::new().unwrap();
    stage_acli(&temp);
    let exec = MockExecutor::new().fail_on("@google/gemini-cli", 1, "npm ERR!");
    let (exec, mut installer) = build(&temp, exec, all_present());

    let report = installer.run(std::future::pending()).await.unwrap();
    assert_eq!(report.failed(), 1);
    assert_eq!(report.get("qwen").unwrap().status, StepStatus::Succeeded);
    assert_eq!(exec.count_matching("npm install"), 2);
}

/// Cancelling while a step is running abandons the rest
#[tokio::test]
async fn test_cancel_during_step_aborts_remaining() {
    let temp = TempDir::new().unwrap();
    stage_acli(&temp);
    let exec = MockExecutor::new().hang_on("@google/gemini-cli");
    let (exec, mut installer) = build(&temp, exec, all_present());

    let cancel = tokio::time::sleep(Duration::from_millis(50));
    let err = installer.run(cancel).await.unwrap_err();

    assert!(matches!(err, InstallerError::Cancelled));
    assert_eq!(err.exit_code(), 0);
    assert_eq!(exec.count_matching("@google/gemini-cli"), 1);
    assert_eq!(exec.count_matching("@qwen-code/qwen-code"), 0);

    let out = output(installer);
    assert!(out.contains("Cancelled by user"));
    assert!(!out.contains("Installation Complete"));
}

/// The usage summary is the same no matter how the steps went
#[tokio::test]
async fn test_summary_independent_of_outcomes() {
    let temp = TempDir::new().unwrap();
    let exec = MockExecutor::new()
        .fail_on("ampcode.com", 1, "")
        .fail_on("curl -fL", 6, "Could not resolve host")
        .fail_on("npm install", 1, "");
    let (_, mut installer) = build(&temp, exec, all_present());

    let report = installer.run(std::future::pending()).await.unwrap();
    assert_eq!(report.failed(), 4);

    let out = output(installer);
    let summary = out.split("How to use:").nth(1).unwrap();
    let usages: Vec<&str> = summary
        .lines()
        .filter_map(|l| l.split("-> ").nth(1))
        .collect();
    assert_eq!(usages.len(), 4);
    for (line, usage) in usages.iter().zip(["amp", "acli rovodev", "gemini", "qwen"]) {
        assert!(line.contains(usage), "{} should contain {}", line, usage);
    }
}

/// Unsupported hardware skips the binary step but nothing else
#[tokio::test]
async fn test_unsupported_arch_skips_binary_only() {
    let temp = TempDir::new().unwrap();
    let (exec, installer) = build(&temp, MockExecutor::new(), all_present());
    let mut installer = installer.with_machine("ppc64le");

    let report = installer.run(std::future::pending()).await.unwrap();
    assert_eq!(report.get("acli").unwrap().status, StepStatus::Skipped);
    assert_eq!(report.succeeded(), 3);
    assert_eq!(exec.count_matching("acli"), 0);
}

/// Dry run walks every step without executing anything
#[tokio::test]
async fn test_dry_run_executes_nothing() {
    let temp = TempDir::new().unwrap();
    let (exec, installer) = build(&temp, MockExecutor::new(), all_present());
    let mut installer = installer.with_options(InstallOptions {
        dry_run: true,
        ..Default::default()
    });

    let report = installer.run(std::future::pending()).await.unwrap();
    assert_eq!(report.succeeded(), 4);
    assert!(exec.calls().is_empty());

    let out = output(installer);
    assert!(out.contains("sudo npm install -g @qwen-code/qwen-code"));
}

/// Skipped tools are neither installed nor listed
#[tokio::test]
async fn test_skip_filters_steps_and_summary() {
    let temp = TempDir::new().unwrap();
    let (exec, installer) = build(&temp, MockExecutor::new(), all_present());
    let mut installer = installer.with_options(InstallOptions {
        skip: vec!["acli".into(), "amp".into()],
        ..Default::default()
    });

    let report = installer.run(std::future::pending()).await.unwrap();
    assert_eq!(report.outcomes.len(), 4);
    assert_eq!(report.get("amp").unwrap().status, StepStatus::Skipped);
    assert_eq!(report.get("acli").unwrap().status, StepStatus::Skipped);
    assert_eq!(report.get("gemini").unwrap().status, StepStatus::Succeeded);
    assert_eq!(exec.calls().len(), 2);
    assert_eq!(exec.count_matching("ampcode.com"), 0);

    // Every tool's usage line is printed, installed or not
    let out = output(installer);
    let summary = out.split_once("Installation Complete").unwrap().1;
    for name in ["Amp Code CLI", "Atlassian CLI (Rovo Dev)", "Google Gemini CLI", "Qwen Code CLI"] {
        assert!(summary.contains(name), "missing usage line for {}", name);
    }
    assert!(summary.contains("acli rovodev"));
    assert!(summary.contains("Requires login: acli login"));
    assert!(summary.contains("2 succeeded, 0 failed, 2 skipped"));
}

/// Selecting a single tool still summarizes the whole table
#[tokio::test]
async fn test_only_one_step_reports_the_rest_skipped() {
    let temp = TempDir::new().unwrap();
    let (exec, installer) = build(&temp, MockExecutor::new(), all_present());
    let mut installer = installer.with_options(InstallOptions {
        only: vec!["gemini".into()],
        ..Default::default()
    });

    let report = installer.run(std::future::pending()).await.unwrap();
    assert_eq!(report.skipped(), 3);
    assert_eq!(exec.calls(), vec!["sudo npm install -g @google/gemini-cli"]);

    let out = output(installer);
    let summary = out.split_once("Installation Complete").unwrap().1;
    assert!(summary.contains("qwen"));
    assert!(summary.contains("1 succeeded, 0 failed, 3 skipped"));
}

/// Commands run through bash, so bash is required even without the script step
#[tokio::test]
async fn test_missing_shell_halts_npm_only_run() {
    let temp = TempDir::new().unwrap();
    let resolver = StaticResolver::new().with_all(["curl", "npm", "sudo"]);
    let (exec, installer) = build(&temp, MockExecutor::new(), resolver);
    let mut installer = installer.with_options(InstallOptions {
        only: vec!["gemini".into(), "qwen".into()],
        ..Default::default()
    });

    let err = installer.run(std::future::pending()).await.unwrap_err();
    assert!(matches!(err, InstallerError::MissingPrerequisite(ref m) if m == &vec!["bash".to_string()]));
    assert!(exec.calls().is_empty());
}

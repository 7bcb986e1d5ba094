//! Step execution outcome types.
//!
//! Each step moves Pending -> Running -> Succeeded | Failed | Skipped and
//! stays there; nothing is retried or rolled back.

use serde::Serialize;

use super::step::InstallStep;

/// Status of a single install step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl StepStatus {
    /// Returns true if the step is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Succeeded | StepStatus::Failed | StepStatus::Skipped)
    }

    /// Whether `next` is a legal successor of this status
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        match (self, next) {
            (StepStatus::Pending, StepStatus::Running) => true,
            (StepStatus::Pending, StepStatus::Skipped) => true,
            (StepStatus::Running, s) => s.is_terminal(),
            _ => false,
        }
    }
}

/// Result of the post-install version check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verification {
    /// Verify command succeeded; holds the first line it printed
    Confirmed(String),
    /// Installed, but the verify command failed
    Unconfirmed,
    /// No verify command, verification disabled, or dry run
    NotRequested,
}

/// Outcome of one step
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step_id: String,
    pub display_name: String,
    pub status: StepStatus,
    pub verification: Verification,
    /// Error text for failed or skipped steps
    pub error: Option<String>,
}

impl StepOutcome {
    /// A fresh, pending outcome for the given step
    pub fn pending(step: &InstallStep) -> Self {
        Self {
            step_id: step.id.clone(),
            display_name: step.display_name.clone(),
            status: StepStatus::Pending,
            verification: Verification::NotRequested,
            error: None,
        }
    }

    fn transition(&mut self, next: StepStatus) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal step transition {:?} -> {:?}",
            self.status,
            next
        );
        log::debug!("{}: {:?} -> {:?}", self.step_id, self.status, next);
        self.status = next;
    }

    pub fn start(&mut self) {
        self.transition(StepStatus::Running);
    }

    pub fn succeed(&mut self, verification: Verification) {
        self.transition(StepStatus::Succeeded);
        self.verification = verification;
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.transition(StepStatus::Failed);
        self.error = Some(error.into());
    }

    pub fn skip(&mut self, reason: impl Into<String>) {
        self.transition(StepStatus::Skipped);
        self.error = Some(reason.into());
    }
}

/// Ordered outcomes of a whole run
#[derive(Debug, Clone, Default, Serialize)]
pub struct InstallReport {
    pub outcomes: Vec<StepOutcome>,
}

impl InstallReport {
    pub fn push(&mut self, outcome: StepOutcome) {
        self.outcomes.push(outcome);
    }

    fn count(&self, status: StepStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn succeeded(&self) -> usize {
        self.count(StepStatus::Succeeded)
    }

    pub fn failed(&self) -> usize {
        self.count(StepStatus::Failed)
    }

    pub fn skipped(&self) -> usize {
        self.count(StepStatus::Skipped)
    }

    /// Outcome for a step id, if that step ran
    pub fn get(&self, step_id: &str) -> Option<&StepOutcome> {
        self.outcomes.iter().find(|o| o.step_id == step_id)
    }
}

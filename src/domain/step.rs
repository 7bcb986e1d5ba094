//! Install step definitions
//!
//! An InstallStep is one row of the tool table: what to check, what to run,
//! how to confirm it worked, and how the user invokes the tool afterwards.

use serde::Serialize;

/// CPU architectures that vendors publish binaries for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Amd64,
    Arm64,
}

impl Arch {
    /// Map a machine name (`uname -m` style) to a known architecture
    pub fn from_machine(machine: &str) -> Option<Self> {
        match machine.trim().to_ascii_lowercase().as_str() {
            "x86_64" | "amd64" => Some(Arch::Amd64),
            "aarch64" | "arm64" => Some(Arch::Arm64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Amd64 => "amd64",
            Arch::Arm64 => "arm64",
        }
    }
}

/// Machine name of the running host
pub fn host_machine() -> &'static str {
    std::env::consts::ARCH
}

/// What a step actually runs
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InstallAction {
    /// Vendor installer fetched with curl and piped into an interpreter
    Script { url: String, interpreter: String },

    /// Global package-manager install
    NpmGlobal { package: String },

    /// Prebuilt binary staged in a temp file, then moved into the bin dir
    Binary {
        binary_name: String,
        urls: Vec<(Arch, String)>,
    },
}

impl InstallAction {
    /// Whether the action writes to system-wide locations
    pub fn needs_elevation(&self) -> bool {
        !matches!(self, InstallAction::Script { .. })
    }

    /// Download URL for a binary action on the given architecture
    pub fn url_for(&self, arch: Arch) -> Option<&str> {
        match self {
            InstallAction::Binary { urls, .. } => urls
                .iter()
                .find(|(a, _)| *a == arch)
                .map(|(_, url)| url.as_str()),
            _ => None,
        }
    }
}

/// One row of the install table
#[derive(Debug, Clone, Serialize)]
pub struct InstallStep {
    /// Short id used by --only/--skip
    pub id: String,
    pub display_name: String,
    /// Executables this step needs on PATH
    pub prerequisites: Vec<String>,
    pub action: InstallAction,
    /// Command that confirms the tool is usable, e.g. `acli version`
    pub verify: Option<String>,
    /// How the user invokes the tool once installed
    pub usage: String,
    pub usage_note: Option<String>,
}

impl InstallStep {
    /// Create a step; usage defaults to the id
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, action: InstallAction) -> Self {
        let id = id.into();
        Self {
            usage: id.clone(),
            id,
            display_name: display_name.into(),
            prerequisites: Vec::new(),
            action,
            verify: None,
            usage_note: None,
        }
    }

    /// Add a required executable
    pub fn prerequisite(mut self, program: impl Into<String>) -> Self {
        self.prerequisites.push(program.into());
        self
    }

    /// Set the verification command
    pub fn verify(mut self, command: impl Into<String>) -> Self {
        self.verify = Some(command.into());
        self
    }

    /// Set the invocation shown in the summary
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Set the note shown after the invocation
    pub fn usage_note(mut self, note: impl Into<String>) -> Self {
        self.usage_note = Some(note.into());
        self
    }
}

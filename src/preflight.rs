//! Preflight checks - ensure required executables are on PATH before installing.

use std::collections::HashMap;
use std::path::PathBuf;

/// Resolves program names to paths
pub trait PathResolver {
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// Searches PATH via the `which` crate
#[derive(Debug, Default, Clone, Copy)]
pub struct WhichResolver;

impl PathResolver for WhichResolver {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// Fixed set of known programs, for tests and dry runs
#[derive(Debug, Default, Clone)]
pub struct StaticResolver {
    known: HashMap<String, PathBuf>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `program` at `/usr/bin/<program>`
    pub fn with(mut self, program: &str) -> Self {
        self.known
            .insert(program.to_string(), PathBuf::from("/usr/bin").join(program));
        self
    }

    pub fn with_all<'a>(self, programs: impl IntoIterator<Item = &'a str>) -> Self {
        programs.into_iter().fold(self, |r, p| r.with(p))
    }
}

impl PathResolver for StaticResolver {
    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.known.get(program).cloned()
    }
}

/// Which required programs were found and which were not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightReport {
    pub found: Vec<(String, PathBuf)>,
    pub missing: Vec<String>,
}

impl PreflightReport {
    pub fn is_ready(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Resolve each required program once, in order
pub fn check<R: PathResolver + ?Sized>(required: &[String], resolver: &R) -> PreflightReport {
    let mut report = PreflightReport::default();
    let mut seen: Vec<&str> = Vec::new();

    for program in required {
        if seen.contains(&program.as_str()) {
            continue;
        }
        seen.push(program);

        match resolver.resolve(program) {
            Some(path) => {
                log::debug!("Found {} at {}", program, path.display());
                report.found.push((program.clone(), path));
            }
            None => {
                log::warn!("Missing prerequisite: {}", program);
                report.missing.push(program.clone());
            }
        }
    }

    report
}

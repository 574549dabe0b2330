//! # System Probe
//!
//! The probe is the seam between the launcher and the host system: it answers
//! "is this binary on PATH?" and "what does this binary report as its
//! version?". Everything above it ([`crate::inventory`], [`crate::terminal`],
//! the command layer) is generic over [`SystemProbe`], so tests run against
//! [`FakeProbe`] without touching the real PATH.

use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Longest version line we keep; some tools print paragraphs.
const VERSION_LINE_MAX: usize = 100;

pub trait SystemProbe {
    /// Resolve a binary name against PATH.
    fn which(&self, binary: &str) -> Option<PathBuf>;

    /// Run a short probe command and return the first non-empty output line.
    /// Tools that print their version to stderr are accommodated.
    fn probe_version(&self, argv: &[String]) -> Option<String>;
}

/// Probe backed by the real PATH and real child processes.
#[derive(Debug, Clone, Default)]
pub struct HostProbe;

impl HostProbe {
    pub fn new() -> Self {
        Self
    }
}

impl SystemProbe for HostProbe {
    fn which(&self, binary: &str) -> Option<PathBuf> {
        which::which(binary).ok()
    }

    fn probe_version(&self, argv: &[String]) -> Option<String> {
        let (program, args) = argv.split_first()?;
        let output = match Command::new(program).args(args).output() {
            Ok(output) => output,
            Err(e) => {
                debug!(program, error = %e, "version probe failed");
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        first_line(&stdout).or_else(|| first_line(&stderr))
    }
}

fn first_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(|line| line.chars().take(VERSION_LINE_MAX).collect())
}

/// In-memory probe for tests: answers from a fixed set of "installed"
/// binaries and canned version strings.
#[cfg(any(test, feature = "test_utils"))]
#[derive(Debug, Clone, Default)]
pub struct FakeProbe {
    binaries: std::collections::HashMap<String, PathBuf>,
    versions: std::collections::HashMap<String, String>,
}

#[cfg(any(test, feature = "test_utils"))]
impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_binary(mut self, name: &str) -> Self {
        self.binaries
            .insert(name.to_string(), PathBuf::from(format!("/usr/bin/{}", name)));
        self
    }

    pub fn with_version(mut self, binary: &str, version: &str) -> Self {
        self.versions
            .insert(binary.to_string(), version.to_string());
        self
    }

    pub fn remove_binary(&mut self, name: &str) {
        self.binaries.remove(name);
    }

    pub fn add_binary(&mut self, name: &str) {
        self.binaries
            .insert(name.to_string(), PathBuf::from(format!("/usr/bin/{}", name)));
    }
}

#[cfg(any(test, feature = "test_utils"))]
impl SystemProbe for FakeProbe {
    fn which(&self, binary: &str) -> Option<PathBuf> {
        self.binaries.get(binary).cloned()
    }

    fn probe_version(&self, argv: &[String]) -> Option<String> {
        let program = argv.first()?;
        self.binaries.get(program)?;
        self.versions.get(program).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_line_skips_blank_lines() {
        assert_eq!(first_line("\n\n  nmap 7.94  \nmore"), Some("nmap 7.94".into()));
        assert_eq!(first_line("   \n"), None);
    }

    #[test]
    fn first_line_truncates_long_output() {
        let long = "x".repeat(500);
        assert_eq!(first_line(&long).unwrap().len(), VERSION_LINE_MAX);
    }

    #[test]
    fn fake_probe_answers_from_its_set() {
        let probe = FakeProbe::new()
            .with_binary("nmap")
            .with_version("nmap", "nmap 7.94");
        assert!(probe.which("nmap").is_some());
        assert!(probe.which("sqlmap").is_none());
        assert_eq!(
            probe.probe_version(&["nmap".to_string(), "--version".to_string()]),
            Some("nmap 7.94".into())
        );
    }
}

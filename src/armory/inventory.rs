//! Installation status for cataloged tools.
//!
//! Lookups go through an in-memory cache keyed by executable name. The cache
//! is deliberately stale-tolerant: once a tool has been probed, the answer
//! sticks for the whole session until an explicit [`Inventory::refresh`].

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

use crate::catalog::ToolRef;
use crate::probe::SystemProbe;

/// Tools that ship under a different (or several) binary names.
static ALIASES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("radare2", &["r2", "radare2"][..]),
        ("r2", &["r2", "radare2"][..]),
        ("john", &["john", "john-the-ripper"][..]),
        ("ghidra", &["ghidra", "ghidraRun"][..]),
        ("volatility3", &["vol", "volatility3", "volatility"][..]),
        ("metasploit", &["msfconsole", "msfvenom"][..]),
        ("burpsuite", &["burpsuite", "burp"][..]),
        ("wireshark", &["wireshark", "tshark"][..]),
        ("sqlmap", &["sqlmap", "sqlmap.py"][..]),
    ])
});

/// Per-tool version probe invocations. Tools not listed here get a plain
/// `--version`. A bare binary name means the tool prints its version banner
/// when run without arguments.
static VERSION_PROBES: Lazy<HashMap<&'static str, &'static [&'static str]>> = Lazy::new(|| {
    HashMap::from([
        ("nmap", &["nmap", "--version"][..]),
        ("gobuster", &["gobuster", "version"][..]),
        ("sqlmap", &["sqlmap", "--version"][..]),
        ("nikto", &["nikto", "-Version"][..]),
        ("masscan", &["masscan", "--version"][..]),
        ("john", &["john", "--version"][..]),
        ("hashcat", &["hashcat", "--version"][..]),
        ("r2", &["r2", "-version"][..]),
        ("binwalk", &["binwalk", "--help"][..]),
        ("exiftool", &["exiftool", "-ver"][..]),
        ("strings", &["strings", "--version"][..]),
        ("ffuf", &["ffuf", "-V"][..]),
        ("dirb", &["dirb"][..]),
        ("whatweb", &["whatweb", "--version"][..]),
        ("enum4linux", &["enum4linux"][..]),
        ("dnsrecon", &["dnsrecon", "--version"][..]),
    ])
});

static INSTALL_HINTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("nmap", "sudo apt install nmap"),
        ("gobuster", "sudo apt install gobuster"),
        ("sqlmap", "sudo apt install sqlmap"),
        ("nikto", "sudo apt install nikto"),
        ("masscan", "sudo apt install masscan"),
        ("john", "sudo apt install john"),
        ("hashcat", "sudo apt install hashcat"),
        ("r2", "sudo apt install radare2"),
        ("binwalk", "sudo apt install binwalk"),
        ("exiftool", "sudo apt install exiftool"),
        ("strings", "sudo apt install binutils"),
        ("ffuf", "go install github.com/ffuf/ffuf@latest"),
        ("dirb", "sudo apt install dirb"),
        ("whatweb", "sudo apt install whatweb"),
        ("enum4linux", "sudo apt install enum4linux"),
        ("dnsrecon", "sudo apt install dnsrecon"),
        ("rustscan", "cargo install rustscan"),
        ("gdb", "sudo apt install gdb"),
        ("steghide", "sudo apt install steghide"),
        ("foremost", "sudo apt install foremost"),
        ("hydra", "sudo apt install hydra"),
        ("amass", "sudo apt install amass"),
    ])
});

/// Suggested installation command for a missing binary.
pub fn install_hint(command: &str) -> String {
    INSTALL_HINTS
        .get(command)
        .map(|hint| hint.to_string())
        .unwrap_or_else(|| format!("search for '{}' installation instructions", command))
}

/// Full status of one cataloged tool.
#[derive(Debug, Clone)]
pub struct ToolStatus {
    pub tool_id: String,
    pub name: String,
    pub description: String,
    pub command: String,
    pub installed: bool,
    pub version: Option<String>,
    pub path: Option<PathBuf>,
    pub install_hint: Option<String>,
}

pub struct Inventory<P: SystemProbe> {
    probe: P,
    cache: HashMap<String, bool>,
}

impl<P: SystemProbe> Inventory<P> {
    pub fn new(probe: P) -> Self {
        Self {
            probe,
            cache: HashMap::new(),
        }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    #[cfg(any(test, feature = "test_utils"))]
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }

    /// Whether the tool's executable (or one of its aliases) is on PATH.
    /// Cached per command name for the session.
    pub fn is_installed(&mut self, command: &str) -> bool {
        if let Some(&cached) = self.cache.get(command) {
            return cached;
        }
        let installed = self.resolve_path(command).is_some();
        self.cache.insert(command.to_string(), installed);
        installed
    }

    /// PATH of the tool's executable, trying aliases in order. Uncached.
    pub fn resolve_path(&self, command: &str) -> Option<PathBuf> {
        if let Some(variants) = ALIASES.get(command) {
            for variant in *variants {
                if let Some(path) = self.probe.which(variant) {
                    return Some(path);
                }
            }
            return None;
        }
        self.probe.which(command)
    }

    /// First line of the tool's version output, if it is installed and
    /// answers a known probe.
    pub fn version(&mut self, command: &str) -> Option<String> {
        if !self.is_installed(command) {
            return None;
        }
        let argv: Vec<String> = match VERSION_PROBES.get(command) {
            Some(probe) => probe.iter().map(|s| s.to_string()).collect(),
            None => vec![command.to_string(), "--version".to_string()],
        };
        self.probe.probe_version(&argv)
    }

    /// Full status for one catalog entry.
    pub fn status(&mut self, tool: ToolRef<'_>) -> ToolStatus {
        let command = tool.spec.command.clone();
        let installed = self.is_installed(&command);
        ToolStatus {
            tool_id: tool.tool_id.to_string(),
            name: tool.spec.name.clone(),
            description: tool.spec.description.clone(),
            installed,
            version: if installed { self.version(&command) } else { None },
            path: if installed { self.resolve_path(&command) } else { None },
            install_hint: if installed { None } else { Some(install_hint(&command)) },
            command,
        }
    }

    /// Drop one cached entry, or the whole cache.
    pub fn refresh(&mut self, command: Option<&str>) {
        match command {
            Some(command) => {
                self.cache.remove(command);
            }
            None => self.cache.clear(),
        }
        debug!(tool = command.unwrap_or("all"), "tool status cache refreshed");
    }
}

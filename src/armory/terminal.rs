//! # Terminal Dispatcher
//!
//! Maps a terminal-emulator identifier to the concrete argv that opens a
//! titled window running a wrapper script, and owns the wrapper script's
//! lifecycle: write to a unique temp file, spawn the emulator detached,
//! sweep leftovers on request.
//!
//! Launch success means the emulator process started. The wrapped tool runs
//! interactively in its own window; its exit status is only visible there.

use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::error::{ArmoryError, Result};
use crate::probe::SystemProbe;

/// Known emulators, in descending selection priority.
pub const TERMINAL_PRIORITY: &[&str] = &[
    "gnome-terminal",
    "konsole",
    "xfce4-terminal",
    "mate-terminal",
    "terminator",
    "kitty",
    "alacritty",
    "tilix",
    "xterm",
    "urxvt",
    "rxvt",
];

const SCRIPT_PREFIX: &str = "armory_";
const SCRIPT_SUFFIX: &str = ".sh";

/// Argv to open `terminal` with a titled window running `bash <script>`.
/// Every emulator has its own spelling for "title" and "run this"; the
/// mapping is a fixed table, with a bare `xterm -e` shape for strangers.
pub fn invocation(terminal: &str, title: &str, script: &Path) -> Vec<String> {
    let script = script.display().to_string();
    let argv: Vec<&str> = match terminal {
        "gnome-terminal" => vec!["gnome-terminal", "--title", title, "--", "bash", &script],
        "konsole" => vec!["konsole", "--title", title, "-e", "bash", &script],
        "xfce4-terminal" | "mate-terminal" => {
            let command = format!("bash {}", script);
            return vec![
                terminal.to_string(),
                "--title".to_string(),
                title.to_string(),
                "--command".to_string(),
                command,
            ];
        }
        "terminator" => vec!["terminator", "--title", title, "-x", "bash", &script],
        "kitty" => vec!["kitty", "--title", title, "bash", &script],
        "alacritty" => vec!["alacritty", "--title", title, "-e", "bash", &script],
        "tilix" => vec!["tilix", "--title", title, "-e", "bash", &script],
        "xterm" => vec!["xterm", "-title", title, "-e", "bash", &script],
        "urxvt" => vec!["urxvt", "-title", title, "-e", "bash", &script],
        "rxvt" => vec!["rxvt", "-title", title, "-e", "bash", &script],
        _ => vec!["xterm", "-e", "bash", &script],
    };
    argv.into_iter().map(|s| s.to_string()).collect()
}

/// Emulators from [`TERMINAL_PRIORITY`] present on this system.
pub fn detect<P: SystemProbe>(probe: &P) -> Vec<String> {
    TERMINAL_PRIORITY
        .iter()
        .filter(|t| probe.which(t).is_some())
        .map(|t| t.to_string())
        .collect()
}

/// Pick the emulator to use: the configured one when it is actually
/// installed, else the highest-priority detected one, else anything
/// detected at all.
pub fn select(preferred: Option<&str>, available: &[String]) -> Option<String> {
    if let Some(preferred) = preferred {
        if available.iter().any(|t| t == preferred) {
            return Some(preferred.to_string());
        }
    }
    for candidate in TERMINAL_PRIORITY {
        if available.iter().any(|t| t == candidate) {
            return Some(candidate.to_string());
        }
    }
    available.first().cloned()
}

/// A launch that made it as far as starting the emulator.
#[derive(Debug)]
pub struct Launched {
    pub terminal: String,
    pub script: PathBuf,
    pub pid: u32,
}

pub struct TerminalDispatcher {
    chosen: Option<String>,
    available: Vec<String>,
    working_dir: PathBuf,
}

impl TerminalDispatcher {
    pub fn new<P: SystemProbe>(probe: &P, settings: &Settings) -> Self {
        let available = detect(probe);
        let chosen = select(settings.terminal_preference(), &available);
        Self {
            chosen,
            available,
            working_dir: settings.resolved_working_dir(),
        }
    }

    pub fn chosen(&self) -> Option<&str> {
        self.chosen.as_deref()
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    /// Write the wrapper script and start the emulator, detached.
    pub fn launch(&self, tool_name: &str, command: &str) -> Result<Launched> {
        let terminal = self.chosen.clone().ok_or(ArmoryError::TerminalUnavailable)?;

        let script = write_wrapper_script(tool_name, command, &self.working_dir)?;
        let title = format!("armory - {}", tool_name);
        let argv = invocation(&terminal, &title, &script);
        debug!(?argv, "terminal invocation");

        let pid = spawn_detached(&argv)
            .map_err(|e| ArmoryError::Launch(format!("failed to start {}: {}", terminal, e)))?;

        info!(tool = tool_name, terminal = %terminal, pid, "launched tool");
        Ok(Launched {
            terminal,
            script,
            pid,
        })
    }

    /// Open a short self-identifying script in the selected (or named)
    /// emulator, to verify the invocation shape actually works.
    pub fn test_terminal(&self, terminal: Option<&str>) -> Result<Launched> {
        let terminal = terminal
            .map(|t| t.to_string())
            .or_else(|| self.chosen.clone())
            .ok_or(ArmoryError::TerminalUnavailable)?;

        let body = format!("echo \"armory terminal test: {} OK\"\nsleep 2\n", terminal);
        let script = write_script_file(&format!("#!/bin/bash\n{}", body))?;
        let argv = invocation(&terminal, "armory terminal test", &script);

        let pid = spawn_detached(&argv)
            .map_err(|e| ArmoryError::Launch(format!("failed to start {}: {}", terminal, e)))?;
        Ok(Launched {
            terminal,
            script,
            pid,
        })
    }
}

/// Write the disposable wrapper script: banner, cd to the working directory,
/// the rendered command, exit-code report, pause before the window closes.
pub fn write_wrapper_script(tool_name: &str, command: &str, working_dir: &Path) -> Result<PathBuf> {
    let content = format!(
        r#"#!/bin/bash
# armory launch script
# Tool: {tool}
# Generated: {utc}

echo "armory :: launching {tool}"
cd "{workdir}" || echo "warning: could not change to {workdir}"
echo "working directory: $(pwd)"
echo "command: {command}"
echo "----------------------------------------"

{command}

exit_code=$?
echo ""
echo "----------------------------------------"
echo "{tool} finished with exit code: $exit_code"
echo "Press Enter to close this window..."
read -r
"#,
        tool = tool_name,
        utc = Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
        workdir = working_dir.display(),
        command = command,
    );
    write_script_file(&content)
}

fn write_script_file(content: &str) -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix(SCRIPT_PREFIX)
        .suffix(SCRIPT_SUFFIX)
        .tempfile()
        .map_err(|e| ArmoryError::Launch(format!("failed to create launch script: {}", e)))?;

    fs::write(file.path(), content).map_err(ArmoryError::Io)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(file.path(), fs::Permissions::from_mode(0o755))
            .map_err(ArmoryError::Io)?;
    }

    // Scripts must outlive this process; they are reaped by cleanup_scripts.
    let (_, path) = file
        .keep()
        .map_err(|e| ArmoryError::Launch(format!("failed to persist launch script: {}", e)))?;
    Ok(path)
}

fn spawn_detached(argv: &[String]) -> std::io::Result<u32> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| std::io::Error::other("empty argv"))?;

    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    // New process group so the emulator survives us and never ties up our
    // controlling terminal.
    #[cfg(unix)]
    {
        use std::os::unix::process::CommandExt;
        command.process_group(0);
    }

    let child = command.spawn()?;
    Ok(child.id())
}

/// Best-effort sweep of leftover `armory_*.sh` scripts in the temp dir.
/// Returns how many were removed.
pub fn cleanup_scripts() -> usize {
    let temp_dir = std::env::temp_dir();
    let entries = match fs::read_dir(&temp_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %temp_dir.display(), error = %e, "could not read temp dir");
            return 0;
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if name.starts_with(SCRIPT_PREFIX) && name.ends_with(SCRIPT_SUFFIX) {
            if fs::remove_file(entry.path()).is_ok() {
                removed += 1;
            }
        }
    }
    removed
}

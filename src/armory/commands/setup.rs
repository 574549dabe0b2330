use std::path::Path;

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult};
use crate::config::Settings;
use crate::error::Result;
use crate::inventory::{install_hint, Inventory};
use crate::probe::SystemProbe;
use crate::terminal;

/// Tools shown individually before the report switches to a summary line.
const MISSING_TOOLS_SHOWN: usize = 20;

/// First-run walkthrough: make sure both config files exist on disk, then
/// report terminal availability and what is left to install.
pub fn run<P: SystemProbe>(
    catalog: &Catalog,
    inventory: &mut Inventory<P>,
    settings: &Settings,
    config_dir: &Path,
) -> Result<CmdResult> {
    catalog.save(config_dir)?;
    settings.save(config_dir)?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::info(format!(
        "Configuration written to {}",
        config_dir.display()
    )));

    let terminals = terminal::detect(inventory.probe());
    if terminals.is_empty() {
        result.add_message(CmdMessage::warning(
            "No compatible terminal emulators found. Install one of: gnome-terminal, konsole, xfce4-terminal, xterm",
        ));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Found {} compatible terminal emulator(s)",
            terminals.len()
        )));
    }

    let missing: Vec<_> = catalog
        .tools()
        .filter(|t| !inventory.is_installed(&t.spec.command))
        .collect();

    if missing.is_empty() {
        result.add_message(CmdMessage::success("All cataloged tools are installed."));
    } else {
        result.add_message(CmdMessage::warning(format!(
            "{} tool(s) missing:",
            missing.len()
        )));
        for tool in missing.iter().take(MISSING_TOOLS_SHOWN) {
            result.add_message(CmdMessage::info(format!(
                "  {} ({}) - {}",
                tool.spec.name,
                tool.spec.command,
                install_hint(&tool.spec.command)
            )));
        }
        if missing.len() > MISSING_TOOLS_SHOWN {
            result.add_message(CmdMessage::info(format!(
                "  ... and {} more",
                missing.len() - MISSING_TOOLS_SHOWN
            )));
        }
    }

    result.add_message(CmdMessage::success("Setup complete."));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FakeProbe;

    #[test]
    fn setup_writes_config_files_and_reports() {
        let temp_dir = tempfile::tempdir().unwrap();
        let catalog = Catalog::builtin();
        let settings = Settings::default();
        let mut inventory = Inventory::new(FakeProbe::new().with_binary("xterm"));

        let result = run(&catalog, &mut inventory, &settings, temp_dir.path()).unwrap();

        assert!(temp_dir.path().join("tools.json").exists());
        assert!(temp_dir.path().join("settings.json").exists());
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("compatible terminal")));
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("tool(s) missing")));
    }
}

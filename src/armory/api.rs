//! # API Facade
//!
//! Single entry point for launcher operations, regardless of the UI driving
//! them. The facade dispatches to the command layer and returns structured
//! `Result<CmdResult>` values; it never prints, prompts, or exits.
//!
//! `ArmoryApi<P: SystemProbe>` is generic over the system probe:
//! - Production: `ArmoryApi<HostProbe>`
//! - Testing: `ArmoryApi<FakeProbe>` (no PATH, no child processes)

use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::commands;
use crate::commands::config::ConfigAction;
use crate::config::Settings;
use crate::error::Result;
use crate::inventory::Inventory;
use crate::model::ParameterValues;
use crate::probe::SystemProbe;
use crate::terminal::TerminalDispatcher;

pub struct ArmoryApi<P: SystemProbe> {
    catalog: Catalog,
    settings: Settings,
    config_dir: PathBuf,
    inventory: Inventory<P>,
}

impl<P: SystemProbe> ArmoryApi<P> {
    /// Load catalog and settings from `config_dir` (creating defaults on
    /// first run) and wire up the inventory.
    pub fn open(probe: P, config_dir: impl AsRef<Path>) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();
        let catalog = Catalog::load(&config_dir)?;
        let settings = Settings::load(&config_dir)?;
        Ok(Self {
            catalog,
            settings,
            config_dir,
            inventory: Inventory::new(probe),
        })
    }

    /// Assemble from parts, bypassing the filesystem. Intended for tests.
    pub fn from_parts(
        catalog: Catalog,
        settings: Settings,
        probe: P,
        config_dir: impl AsRef<Path>,
    ) -> Self {
        Self {
            catalog,
            settings,
            config_dir: config_dir.as_ref().to_path_buf(),
            inventory: Inventory::new(probe),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Terminal dispatcher for the current settings and system state.
    pub fn dispatcher(&self) -> TerminalDispatcher {
        TerminalDispatcher::new(self.inventory.probe(), &self.settings)
    }

    pub fn list_tools(&mut self) -> Result<commands::CmdResult> {
        commands::list::run(&self.catalog, &mut self.inventory)
    }

    pub fn health(&mut self) -> Result<commands::CmdResult> {
        commands::health::run(&self.catalog, &mut self.inventory)
    }

    /// Validate parameters and render the command for a launch. Spawning is
    /// the caller's move, via [`Self::dispatcher`].
    pub fn plan_launch(
        &mut self,
        tool_name: &str,
        values: &ParameterValues,
    ) -> Result<commands::CmdResult> {
        commands::launch::run(&self.catalog, &mut self.inventory, tool_name, values)
    }

    pub fn setup(&mut self) -> Result<commands::CmdResult> {
        commands::setup::run(
            &self.catalog,
            &mut self.inventory,
            &self.settings,
            &self.config_dir,
        )
    }

    pub fn config(&mut self, action: ConfigAction) -> Result<commands::CmdResult> {
        let result = commands::config::run(&self.config_dir, action)?;
        // Keep the in-memory settings in step with what was persisted.
        if let Some(settings) = &result.settings {
            self.settings = settings.clone();
        }
        Ok(result)
    }

    pub fn cleanup(&self) -> Result<commands::CmdResult> {
        commands::cleanup::run()
    }

    /// Drop cached install status for one tool, or for all of them.
    pub fn refresh(&mut self, tool: Option<&str>) {
        let command = tool
            .and_then(|t| self.catalog.find_tool(t))
            .map(|t| t.spec.command.clone());
        self.inventory.refresh(command.as_deref().or(tool));
    }

    /// Install status for one cataloged tool (cached).
    pub fn tool_installed(&mut self, command: &str) -> bool {
        self.inventory.is_installed(command)
    }

    pub fn inventory(&mut self) -> &mut Inventory<P> {
        &mut self.inventory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FakeProbe;

    fn api(probe: FakeProbe) -> ArmoryApi<FakeProbe> {
        ArmoryApi::from_parts(Catalog::builtin(), Settings::default(), probe, "/tmp/none")
    }

    #[test]
    fn plan_launch_dispatches_to_the_launch_command() {
        let mut api = api(FakeProbe::new().with_binary("nikto"));
        let mut values = ParameterValues::new();
        values.insert("host".into(), "target.com".into());
        values.insert("ssl".into(), "yes".into());

        let result = api.plan_launch("nikto", &values).unwrap();
        assert_eq!(
            result.plan.unwrap().rendered,
            "nikto -h target.com -p 80 --ssl"
        );
    }

    #[test]
    fn refresh_translates_tool_ids_to_commands() {
        let mut api = api(FakeProbe::new().with_binary("r2"));
        assert!(api.tool_installed("r2"));

        api.inventory().probe_mut().remove_binary("r2");
        // Stale until refreshed, then re-probed via the catalog id.
        assert!(api.tool_installed("r2"));
        api.refresh(Some("radare2"));
        assert!(!api.tool_installed("r2"));
    }
}

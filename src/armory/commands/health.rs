use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult, HealthReport, HealthStatus, MissingTool};
use crate::error::Result;
use crate::inventory::{install_hint, Inventory};
use crate::probe::SystemProbe;
use crate::terminal;

pub fn run<P: SystemProbe>(catalog: &Catalog, inventory: &mut Inventory<P>) -> Result<CmdResult> {
    let mut total = 0;
    let mut installed = 0;
    let mut missing = Vec::new();

    for tool in catalog.tools() {
        total += 1;
        if inventory.is_installed(&tool.spec.command) {
            installed += 1;
        } else {
            missing.push(MissingTool {
                category: tool.category_name.to_string(),
                name: tool.spec.name.clone(),
                command: tool.spec.command.clone(),
                install_hint: install_hint(&tool.spec.command),
            });
        }
    }

    let terminals = terminal::detect(inventory.probe());
    // More than half the catalog installed counts as healthy.
    let status = if total > 0 && installed * 2 > total {
        HealthStatus::Healthy
    } else {
        HealthStatus::NeedsAttention
    };

    let report = HealthReport {
        total_tools: total,
        installed_tools: installed,
        missing,
        user: std::env::var("USER").unwrap_or_else(|_| "unknown".to_string()),
        is_root: is_root(),
        terminals,
        status,
    };

    let mut result = CmdResult::default();
    if report.is_root {
        result.add_message(CmdMessage::warning(
            "Running as root is not recommended; use a regular user.",
        ));
    }
    if !report.has_terminal() {
        result.add_message(CmdMessage::error(
            "No compatible terminal emulators found. Install one of: gnome-terminal, konsole, xfce4-terminal, xterm",
        ));
    }
    Ok(result.with_health(report))
}

#[cfg(unix)]
fn is_root() -> bool {
    // Effective uid, not real uid: what matters is what we can do.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(unix))]
fn is_root() -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::FakeProbe;

    #[test]
    fn health_counts_installed_and_missing() {
        let catalog = Catalog::builtin();
        let probe = FakeProbe::new()
            .with_binary("nmap")
            .with_binary("sqlmap")
            .with_binary("xterm");
        let mut inventory = Inventory::new(probe);

        let result = run(&catalog, &mut inventory).unwrap();
        let report = result.health.unwrap();

        assert_eq!(report.total_tools, catalog.tool_count());
        assert_eq!(report.installed_tools, 2);
        assert_eq!(report.missing.len(), report.total_tools - 2);
        assert_eq!(report.terminals, vec!["xterm".to_string()]);
        assert_eq!(report.status, HealthStatus::NeedsAttention);

        let nikto = report.missing.iter().find(|m| m.command == "nikto").unwrap();
        assert_eq!(nikto.install_hint, "sudo apt install nikto");
    }

    #[test]
    fn health_without_terminals_raises_an_error_message() {
        let catalog = Catalog::builtin();
        let mut inventory = Inventory::new(FakeProbe::new());

        let result = run(&catalog, &mut inventory).unwrap();
        assert!(result
            .messages
            .iter()
            .any(|m| m.content.contains("No compatible terminal")));
    }

    #[test]
    fn mostly_installed_catalog_is_healthy() {
        let catalog = Catalog::builtin();
        let mut probe = FakeProbe::new();
        for tool in catalog.tools() {
            probe.add_binary(&tool.spec.command);
        }
        let mut inventory = Inventory::new(probe);

        let report = run(&catalog, &mut inventory).unwrap().health.unwrap();
        assert_eq!(report.status, HealthStatus::Healthy);
        assert!((report.coverage_percent() - 100.0).abs() < f64::EPSILON);
    }
}

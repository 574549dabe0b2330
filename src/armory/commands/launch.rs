use tracing::warn;

use crate::catalog::Catalog;
use crate::commands::{CmdMessage, CmdResult, LaunchPlan};
use crate::error::{ArmoryError, Result};
use crate::inventory::{install_hint, Inventory};
use crate::model::ParameterValues;
use crate::probe::SystemProbe;
use crate::template::{hazard_scan, CommandTemplate};

/// Validate and render a launch for the named tool. The returned plan is
/// what the terminal dispatcher executes; nothing is spawned here.
pub fn run<P: SystemProbe>(
    catalog: &Catalog,
    inventory: &mut Inventory<P>,
    tool_name: &str,
    values: &ParameterValues,
) -> Result<CmdResult> {
    let tool = catalog
        .find_tool(tool_name)
        .ok_or_else(|| ArmoryError::ToolNotFound(tool_name.to_string()))?;

    if !inventory.is_installed(&tool.spec.command) {
        return Err(ArmoryError::ToolNotFound(format!(
            "'{}' is not installed (try: {})",
            tool.spec.name,
            install_hint(&tool.spec.command)
        )));
    }

    let resolved = tool.spec.resolve_values(values)?;
    let template = CommandTemplate::parse(&tool.spec.command_template)?;
    let rendered = template.render(&resolved);

    let mut result = CmdResult::default();
    // Permissive by policy: suspicious commands are reported, not blocked.
    for pattern in hazard_scan(&rendered) {
        warn!(tool = tool.tool_id, pattern, command = %rendered, "suspicious pattern in command");
        result.add_message(CmdMessage::warning(format!(
            "Command contains '{}'; review before running.",
            pattern
        )));
    }

    Ok(result.with_plan(LaunchPlan {
        tool_id: tool.tool_id.to_string(),
        tool_name: tool.spec.name.clone(),
        rendered,
    }))
}

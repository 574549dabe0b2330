use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::terminal;

/// Sweep leftover wrapper scripts from previous launches.
pub fn run() -> Result<CmdResult> {
    let removed = terminal::cleanup_scripts();
    let mut result = CmdResult::default();
    result.cleaned = Some(removed);
    if removed == 0 {
        result.add_message(CmdMessage::info("No leftover launch scripts found."));
    } else {
        result.add_message(CmdMessage::success(format!(
            "Removed {} leftover launch script(s).",
            removed
        )));
    }
    Ok(result)
}

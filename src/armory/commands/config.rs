use std::path::Path;

use crate::commands::{CmdMessage, CmdResult};
use crate::config::Settings;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

pub fn run(config_dir: &Path, action: ConfigAction) -> Result<CmdResult> {
    match action {
        ConfigAction::ShowAll => {
            let settings = Settings::load(config_dir)?;
            Ok(CmdResult::default().with_settings(settings))
        }
        ConfigAction::ShowKey(key) => {
            let settings = Settings::load(config_dir)?;
            let mut result = CmdResult::default();
            match settings.get(&key) {
                Some(value) => result.add_message(CmdMessage::info(value)),
                None => result.add_message(CmdMessage::error(format!(
                    "Unknown config key: {} (known: {})",
                    key,
                    Settings::keys().join(", ")
                ))),
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            let mut settings = Settings::load(config_dir)?;
            if let Err(e) = settings.set(&key, &value) {
                let mut result = CmdResult::default();
                result.add_message(CmdMessage::error(e));
                return Ok(result);
            }
            settings.save(config_dir)?;
            let mut result = CmdResult::default().with_settings(settings);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, value)));
            Ok(result)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;

    #[test]
    fn set_then_show_roundtrips() {
        let temp_dir = tempfile::tempdir().unwrap();

        let result = run(
            temp_dir.path(),
            ConfigAction::Set("terminal".into(), "kitty".into()),
        )
        .unwrap();
        assert_eq!(result.settings.unwrap().preferred_terminal, "kitty");

        let result = run(temp_dir.path(), ConfigAction::ShowKey("terminal".into())).unwrap();
        assert_eq!(result.messages[0].content, "kitty");
    }

    #[test]
    fn failed_set_leaves_settings_on_disk_untouched() {
        let temp_dir = tempfile::tempdir().unwrap();
        Settings::default().save(temp_dir.path()).unwrap();

        let result = run(
            temp_dir.path(),
            ConfigAction::Set("colors".into(), "maybe".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);

        let reloaded = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(reloaded, Settings::default());
    }

    #[test]
    fn unknown_key_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = run(temp_dir.path(), ConfigAction::ShowKey("bogus".into())).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(result.messages[0].content.contains("Unknown config key"));
    }
}

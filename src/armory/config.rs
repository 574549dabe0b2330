use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ArmoryError, Result};

const SETTINGS_FILENAME: &str = "settings.json";
const DEFAULT_TERMINAL: &str = "auto";
const DEFAULT_WORKING_DIR: &str = "~";

/// Launcher settings, stored in settings.json next to the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Terminal emulator binary to prefer, or "auto" to pick from whatever
    /// is installed.
    #[serde(default = "default_terminal")]
    pub preferred_terminal: String,

    /// Directory tools are started in ("~" expands to the home directory).
    #[serde(default = "default_working_dir")]
    pub working_directory: String,

    /// Colored output toggle.
    #[serde(default = "default_use_colors")]
    pub use_colors: bool,
}

fn default_terminal() -> String {
    DEFAULT_TERMINAL.to_string()
}

fn default_working_dir() -> String {
    DEFAULT_WORKING_DIR.to_string()
}

fn default_use_colors() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preferred_terminal: DEFAULT_TERMINAL.to_string(),
            working_directory: DEFAULT_WORKING_DIR.to_string(),
            use_colors: true,
        }
    }
}

impl Settings {
    /// Load settings from the given directory, or return defaults if the
    /// file does not exist yet. A present-but-corrupt file is an error, not
    /// a silent reset.
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let path = config_dir.as_ref().join(SETTINGS_FILENAME);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(ArmoryError::Io)?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| ArmoryError::Config(format!("invalid settings.json: {}", e)))?;
        Ok(settings)
    }

    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ArmoryError::Io)?;
        }
        let path = config_dir.join(SETTINGS_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ArmoryError::Serialization)?;
        fs::write(path, content).map_err(ArmoryError::Io)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["terminal", "working-dir", "colors"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "terminal" => Some(self.preferred_terminal.clone()),
            "working-dir" => Some(self.working_directory.clone()),
            "colors" => Some(self.use_colors.to_string()),
            _ => None,
        }
    }

    /// Set a single setting. Unknown keys and unparsable values leave the
    /// settings untouched.
    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "terminal" => {
                if value.is_empty() {
                    return Err("terminal cannot be empty (use \"auto\")".to_string());
                }
                self.preferred_terminal = value.to_string();
            }
            "working-dir" => {
                if value.is_empty() {
                    return Err("working-dir cannot be empty".to_string());
                }
                self.working_directory = value.to_string();
            }
            "colors" => match value.to_lowercase().as_str() {
                "true" | "yes" | "1" => self.use_colors = true,
                "false" | "no" | "0" => self.use_colors = false,
                other => return Err(format!("colors must be true or false, got '{}'", other)),
            },
            other => return Err(format!("unknown config key: {}", other)),
        }
        Ok(())
    }

    /// Preferred terminal, with "auto" mapped to None.
    pub fn terminal_preference(&self) -> Option<&str> {
        if self.preferred_terminal == DEFAULT_TERMINAL {
            None
        } else {
            Some(&self.preferred_terminal)
        }
    }

    /// Working directory with `~` expanded.
    pub fn resolved_working_dir(&self) -> std::path::PathBuf {
        if let Some(rest) = self.working_directory.strip_prefix('~') {
            if let Some(home) = std::env::var_os("HOME") {
                let rest = rest.trim_start_matches('/');
                let mut path = std::path::PathBuf::from(home);
                if !rest.is_empty() {
                    path.push(rest);
                }
                return path;
            }
        }
        std::path::PathBuf::from(&self.working_directory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.preferred_terminal, "auto");
        assert_eq!(settings.working_directory, "~");
        assert!(settings.use_colors);
    }

    #[test]
    fn test_load_missing_settings() {
        let temp_dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(temp_dir.path().join("nope")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();

        let mut settings = Settings::default();
        settings.set("terminal", "kitty").unwrap();
        settings.save(temp_dir.path()).unwrap();

        let loaded = Settings::load(temp_dir.path()).unwrap();
        assert_eq!(loaded.preferred_terminal, "kitty");
    }

    #[test]
    fn test_corrupt_settings_is_config_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(SETTINGS_FILENAME), "{not json").unwrap();
        assert!(matches!(
            Settings::load(temp_dir.path()),
            Err(ArmoryError::Config(_))
        ));
    }

    #[test]
    fn test_set_unknown_key_leaves_settings_untouched() {
        let mut settings = Settings::default();
        let before = settings.clone();
        assert!(settings.set("bogus", "x").is_err());
        assert_eq!(settings, before);
    }

    #[test]
    fn test_set_bad_colors_value() {
        let mut settings = Settings::default();
        assert!(settings.set("colors", "maybe").is_err());
        assert!(settings.use_colors);
        settings.set("colors", "no").unwrap();
        assert!(!settings.use_colors);
    }

    #[test]
    fn test_terminal_preference_auto_is_none() {
        let mut settings = Settings::default();
        assert!(settings.terminal_preference().is_none());
        settings.set("terminal", "alacritty").unwrap();
        assert_eq!(settings.terminal_preference(), Some("alacritty"));
    }
}

use std::path::PathBuf;
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub report_nonzero_exit: bool,
    #[serde(default)]
    pub log_level: String,
    #[serde(default)]
    pub log_file: String,
    #[serde(default)]
    pub prompt_suffix: String,
}

impl Settings {
    /// Parsed `log_level`; unknown values fall back to `warn`.
    pub fn log_level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(self.log_level.trim()).unwrap_or(LevelFilter::Warn)
    }

    /// `log_file` with a leading `~` expanded.
    pub fn log_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_file).into_owned())
    }
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    report_nonzero_exit: Option<bool>,
    log_level: Option<String>,
    log_file: Option<String>,
    prompt_suffix: Option<String>,
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/ubash/config.toml (if exists)
    ///
    /// Keys present in the overlay override the defaults; omitted keys keep them.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    /// Try to load user overlay from ~/.config/ubash/config.toml.
    fn load_overlay() -> Option<ConfigOverlay> {
        let home = std::env::var_os("HOME")?;
        let path = std::path::Path::new(&home).join(".config/ubash/config.toml");
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("ubash: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (scalar overrides).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.report_nonzero_exit {
            self.settings.report_nonzero_exit = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.log_file {
            self.settings.log_file = v;
        }
        if let Some(v) = s.prompt_suffix {
            self.settings.prompt_suffix = v;
        }
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let config = Config::default_config();
        assert!(config.settings.report_nonzero_exit);
        assert_eq!(config.settings.log_level, "warn");
        assert_eq!(config.settings.prompt_suffix, "$ ");
        assert!(!config.settings.log_file.is_empty());
    }

    #[test]
    fn default_log_level_is_warn() {
        let config = Config::default_config();
        assert_eq!(config.settings.log_level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn log_path_expands_tilde() {
        let config = Config::default_config();
        let path = config.settings.log_path();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with(".local/share/ubash/ubash.log"));
    }

    #[test]
    fn unknown_log_level_falls_back() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            log_level = "chatty"
        "#,
        );
        assert_eq!(config.settings.log_level_filter(), LevelFilter::Warn);
    }

    // ── Merge semantics ──

    #[test]
    fn overlay_overrides_scalars() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            report_nonzero_exit = false
            log_level = "debug"
        "#,
        );
        assert!(!config.settings.report_nonzero_exit);
        assert_eq!(config.settings.log_level_filter(), LevelFilter::Debug);
    }

    #[test]
    fn overlay_omitted_settings_unchanged() {
        let mut config = Config::default_config();
        config.apply_overlay_str(
            r#"
            [settings]
            prompt_suffix = "> "
        "#,
        );
        assert_eq!(config.settings.prompt_suffix, "> ");
        assert!(config.settings.report_nonzero_exit);
        assert_eq!(config.settings.log_level, "warn");
    }

    #[test]
    fn empty_overlay_changes_nothing() {
        let mut config = Config::default_config();
        config.apply_overlay_str("");
        assert!(config.settings.report_nonzero_exit);
        assert_eq!(config.settings.prompt_suffix, "$ ");
    }
}

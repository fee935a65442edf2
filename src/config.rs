use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::internal::ui::app::Action;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Path to the page content file (RON). Looked up relative to the
    /// working directory, then next to the executable.
    #[serde(default = "default_content_file")]
    pub content_file: String,
    /// Optional palette file overriding the built-in colors.
    pub theme_file: Option<String>,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
    pub accessibility: AccessibilityConfig,
    /// Custom keybindings merged over the defaults.
    pub keybindings: Option<KeyBindingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Base level for the log filter when RUST_LOG is unset.
    pub level: String,
    /// Per-module level overrides appended to the filter.
    pub module_levels: HashMap<String, String>,
    /// Directory for rolling log files. Defaults to "logs".
    pub log_directory: Option<String>,
    /// Emit per-frame render timings (debug builds only).
    pub enable_performance_metrics: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    pub padding: PaddingConfig,
    /// Custom status bar template; empty means the built-in layout.
    /// Supports {section}, {theme}, {filter}, {query}, {shown}, {total},
    /// {year}, {version} and {shortcuts}.
    pub status_bar_format: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy)]
#[serde(default)]
pub struct PaddingConfig {
    pub horizontal: u16,
    pub vertical: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default)]
#[serde(default)]
pub struct AccessibilityConfig {
    /// Describe state in full sentences instead of key hints.
    pub verbose_status: bool,
}

/// Key-string to action tables, one per binding context.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct KeyBindingConfig {
    pub global: HashMap<String, Action>,
    pub page: HashMap<String, Action>,
}

fn default_content_file() -> String {
    "portfolio.ron".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_padding() -> PaddingConfig {
    PaddingConfig {
        horizontal: 2,
        vertical: 0,
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            module_levels: HashMap::new(),
            log_directory: None,
            enable_performance_metrics: false,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            status_bar_format: String::new(),
        }
    }
}

impl Default for PaddingConfig {
    fn default() -> Self {
        default_padding()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            content_file: default_content_file(),
            theme_file: None,
            logging: LoggingConfig::default(),
            ui: UiConfig::default(),
            accessibility: AccessibilityConfig::default(),
            keybindings: None,
        }
    }
}

impl LoggingConfig {
    /// Filter directive string for tracing, e.g.
    /// `info,tui_portfolio::internal::nav=trace`.
    pub fn filter_string(&self) -> String {
        let mut filter = self.level.clone();
        for (module, level) in &self.module_levels {
            filter.push_str(&format!(",{}={}", module, level));
        }
        filter
    }
}

impl AppConfig {
    pub fn load() -> Self {
        // Look for config.ron in current directory or next to executable
        let mut candidates = Vec::new();
        candidates.push(PathBuf::from("config.ron"));
        if let Ok(exe) = std::env::current_exe()
            && let Some(dir) = exe.parent()
        {
            candidates.push(dir.join("config.ron"));
        }

        for path in candidates {
            if path.exists()
                && let Ok(content) = fs::read_to_string(&path)
            {
                match ron::from_str::<AppConfig>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return config;
                    }
                    Err(e) => {
                        tracing::error!("Failed to parse config at {}: {}", path.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Self::default()
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.content_file, "portfolio.ron");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.padding.horizontal, 2);
        assert!(!config.accessibility.verbose_status);
        assert!(config.keybindings.is_none());
    }

    #[test]
    fn partial_ron_fills_in_defaults() {
        let config: AppConfig = ron::from_str(
            r#"(
                content_file: "my-page.ron",
                logging: (level: "debug"),
            )"#,
        )
        .unwrap();

        assert_eq!(config.content_file, "my-page.ron");
        // A file that omits content_file entirely keeps the default.
        let minimal: AppConfig = ron::from_str("()").unwrap();
        assert_eq!(minimal.content_file, "portfolio.ron");
        assert_eq!(config.logging.level, "debug");
        // Everything unspecified keeps its default.
        assert_eq!(config.ui.padding.horizontal, 2);
        assert!(config.ui.status_bar_format.is_empty());
    }

    #[test]
    fn filter_string_appends_module_levels() {
        let mut logging = LoggingConfig::default();
        assert_eq!(logging.filter_string(), "info");

        logging
            .module_levels
            .insert("tui_portfolio::internal::nav".to_string(), "trace".to_string());
        let filter = logging.filter_string();
        assert!(filter.starts_with("info,"));
        assert!(filter.contains("tui_portfolio::internal::nav=trace"));
    }

    #[test]
    fn keybindings_parse_from_ron() {
        // Actions are written as a name string, or a single-entry map for
        // the variants that carry a value.
        let config: AppConfig = ron::from_str(
            r#"(
                keybindings: Some((
                    global: {"x": "Quit"},
                    page: {"s": {"JumpToSection": 2}},
                )),
            )"#,
        )
        .unwrap();

        let bindings = config.keybindings.unwrap();
        assert!(matches!(bindings.global.get("x"), Some(Action::Quit)));
        assert!(matches!(
            bindings.page.get("s"),
            Some(Action::JumpToSection(2))
        ));
    }
}

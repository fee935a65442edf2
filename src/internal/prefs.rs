use jiff::Zoned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::utils::theme::Theme;

/// Fixed key under which the theme preference is persisted.
pub const THEME_KEY: &str = "pref-theme";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PrefFile {
    #[serde(rename = "pref-theme")]
    theme: Option<String>,
    updated_at: Option<Zoned>,
}

/// Durable store for the single theme preference.
///
/// Reads never fail from the caller's point of view: any storage problem
/// (missing directory, unreadable file, bad JSON, unknown token) is treated
/// as "unset" and the caller falls back to the system default. Writes are
/// applied immediately and failures are only logged.
#[derive(Debug, Clone)]
pub struct PrefStore {
    path: Option<PathBuf>,
}

impl PrefStore {
    /// Resolve the preference file under the OS config directory. A missing
    /// config directory degrades to an in-memory-only store.
    pub fn open() -> Self {
        let path = dirs::config_dir().map(|dir| {
            let app_dir = dir.join("tui-portfolio");
            if !app_dir.exists()
                && let Err(e) = fs::create_dir_all(&app_dir)
            {
                warn!(
                    "Failed to create config directory {}: {}",
                    app_dir.display(),
                    e
                );
            }
            app_dir.join("prefs.json")
        });

        match &path {
            Some(p) => debug!(prefs_file = %p.display(), "Resolved preference store"),
            None => warn!("No config directory available; theme preference will not persist"),
        }

        Self { path }
    }

    /// Store backed by an explicit file, used by tests.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// The persisted theme, or `None` when unset or unreadable.
    pub fn theme(&self) -> Option<Theme> {
        let path = self.path.as_ref()?;
        let content = fs::read_to_string(path).ok()?;
        let file: PrefFile = match serde_json::from_str(&content) {
            Ok(f) => f,
            Err(e) => {
                debug!("Ignoring unparseable preference file: {}", e);
                return None;
            }
        };

        if let Some(stamp) = &file.updated_at {
            debug!(
                "Theme preference last written {}",
                crate::utils::datetime::format_relative(stamp)
            );
        }

        file.theme.as_deref().and_then(|token| {
            token
                .parse::<Theme>()
                .map_err(|_| {
                    debug!("Ignoring unknown theme token '{}'", token);
                })
                .ok()
        })
    }

    /// The persisted theme, falling back to the system default when unset.
    pub fn theme_or_default(&self) -> Theme {
        self.theme().unwrap_or_else(Theme::detect_system)
    }

    /// Persist the theme immediately. Never surfaces an error; the next
    /// read simply sees the old (or no) value if the write failed.
    pub fn set_theme(&self, theme: Theme) {
        let Some(path) = self.path.as_ref() else {
            return;
        };

        let file = PrefFile {
            theme: Some(theme.to_string()),
            updated_at: Some(Zoned::now()),
        };

        match serde_json::to_string_pretty(&file) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!("Failed to write {} to {}: {}", THEME_KEY, path.display(), e);
                } else {
                    debug!(theme = %theme, "Persisted theme preference");
                }
            }
            Err(e) => warn!("Failed to serialize preference file: {}", e),
        }
    }
}

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::host::Host;
use crate::model::FolderGroup;

/// Configuration section holding [`PanelSettings`].
pub const SETTINGS_SECTION: &str = "favoritesPage";

/// Get the config directory using platform-appropriate location.
///
/// - macOS: `~/Library/Application Support/favorites-page/`
/// - Linux: `~/.config/favorites-page/` (or `$XDG_CONFIG_HOME`)
/// - Windows: `%APPDATA%/favorites-page/`
///
/// Falls back to `~/.favorites-page/` if the platform dir is unavailable.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("favorites-page"))
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".favorites-page")
        })
}

/// Read the [`SETTINGS_SECTION`] out of a host-style `settings.json`.
///
/// Returns `None` if the file or the section is missing. Unreadable or
/// corrupt files are logged and treated as missing so a bad file never
/// blocks the page.
pub fn load_settings_file(path: &Path) -> Option<serde_json::Value> {
    if !path.exists() {
        return None;
    }
    let content = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(path = %path.display(), "Could not read settings: {e}");
            return None;
        }
    };
    match serde_json::from_str::<serde_json::Value>(&content) {
        Ok(mut root) => root
            .as_object_mut()
            .and_then(|obj| obj.remove(SETTINGS_SECTION)),
        Err(e) => {
            tracing::error!(path = %path.display(), "Corrupt settings: {e}. Using defaults.");
            None
        }
    }
}

// ---------------------------------------------------------------------------
// PanelSettings
// ---------------------------------------------------------------------------

/// Title and icon of the host panel itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelOptions {
    #[serde(default = "default_panel_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<PathBuf>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            title: default_panel_title(),
            icon_path: None,
        }
    }
}

/// Remote project listing used to auto-populate folder groups.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteSourceConfig {
    #[serde(rename = "url")]
    pub endpoint_url: String,
    /// Sent as the `PRIVATE-TOKEN` header
    #[serde(default)]
    pub private_token: String,
    /// Prepended to every renamed project path
    #[serde(default)]
    pub local_root_path: String,
    /// Literal replacements for namespace names, applied in order
    #[serde(default)]
    pub rename_groups: IndexMap<String, String>,
    /// Literal replacements for `path_with_namespace`, applied in order
    #[serde(default)]
    pub rename_paths: IndexMap<String, String>,
}

impl fmt::Debug for RemoteSourceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteSourceConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("private_token", &"<redacted>")
            .field("local_root_path", &self.local_root_path)
            .field("rename_groups", &self.rename_groups)
            .field("rename_paths", &self.rename_paths)
            .finish()
    }
}

/// Root configuration of the favorites page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelSettings {
    #[serde(default)]
    pub panel: PanelOptions,
    /// Header branding
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Base directory for relative group icon paths
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_directory: Option<PathBuf>,
    #[serde(default)]
    pub folder_groups: Vec<FolderGroup>,
    #[serde(default, rename = "gitLab", skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteSourceConfig>,
}

fn default_panel_title() -> String {
    "Favorites".to_string()
}

fn default_title() -> String {
    "Visual Studio Code".to_string()
}

fn default_subtitle() -> String {
    "Editing evolved".to_string()
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            panel: PanelOptions::default(),
            title: default_title(),
            subtitle: default_subtitle(),
            resource_directory: None,
            folder_groups: Vec::new(),
            remote: None,
        }
    }
}

impl PanelSettings {
    /// Decode a configuration section, falling back to defaults when it is
    /// absent or cannot be decoded.
    pub fn from_section(section: Option<serde_json::Value>) -> Self {
        let Some(value) = section else {
            return Self::default();
        };
        match serde_json::from_value(value) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Invalid {SETTINGS_SECTION} settings: {e}. Using defaults.");
                Self::default()
            }
        }
    }

    /// Snapshot the current settings from the host configuration store.
    pub fn load(host: &dyn Host) -> Self {
        Self::from_section(host.configuration(SETTINGS_SECTION))
    }
}

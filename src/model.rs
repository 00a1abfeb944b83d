//! Render model: the ordered folder groups shown on the page.

use serde::{Deserialize, Serialize};

use crate::config::PanelSettings;

/// One clickable folder shortcut.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FolderItem {
    #[serde(default)]
    pub id: String,
    /// Visible label
    #[serde(default, rename = "description")]
    pub label: String,
    /// Folder location; may start with `~/`
    #[serde(default)]
    pub location: String,
}

/// A titled section of folder shortcuts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderGroup {
    /// Unique within one render pass
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_path: Option<String>,
    #[serde(default, rename = "folders")]
    pub items: Vec<FolderItem>,
}

impl FolderGroup {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon_path: None,
            items: Vec::new(),
        }
    }
}

/// Build the render model: configured groups first, then `extra_groups`
/// (remote favorites) in their given order.
///
/// Entries are passed through unvalidated; the renderer omits whatever is
/// empty. The result owns fresh copies and never aliases `settings`.
pub fn build(settings: &PanelSettings, extra_groups: Vec<FolderGroup>) -> Vec<FolderGroup> {
    let mut groups = settings.folder_groups.clone();
    groups.extend(extra_groups);
    groups
}

//! The seam between the extension and the editor that loads it.
//!
//! The extension cannot open windows, read settings, or run commands itself.
//! Everything goes through a [`Host`] implementation supplied by the embedding
//! editor runtime (or by the preview binary and the test fake).

use std::fmt;
use std::path::{Path, PathBuf};

/// Editor column a panel is shown in. `One` is the leftmost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewColumn {
    #[default]
    One,
    Two,
    Three,
}

/// Options applied when the host creates a webview panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WebviewOptions {
    pub enable_scripts: bool,
    /// Directories the webview may load local resources from.
    pub local_resource_roots: Vec<PathBuf>,
}

/// Lifecycle and message events a panel can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelEventKind {
    ViewStateChanged,
    Message,
    Disposed,
}

/// An event delivered by the host to the panel registry.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    /// The panel was shown, hidden, or moved.
    ViewStateChanged,
    /// A message posted by the page script.
    Message(serde_json::Value),
    /// The user (or the host) closed the panel.
    Disposed,
}

impl PanelEvent {
    pub fn kind(&self) -> PanelEventKind {
        match self {
            PanelEvent::ViewStateChanged => PanelEventKind::ViewStateChanged,
            PanelEvent::Message(_) => PanelEventKind::Message,
            PanelEvent::Disposed => PanelEventKind::Disposed,
        }
    }
}

/// An action the host performs on the extension's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    /// Open the location as a workspace root.
    OpenFolder(PathBuf),
    /// Show the "new file" picker.
    NewFile,
    /// Show the generic "open file" dialog.
    OpenFile,
    /// A routing key the host understands natively (clone, walkthroughs).
    Native(String),
}

impl HostAction {
    /// The editor command id this action corresponds to.
    pub fn command_id(&self) -> &str {
        match self {
            HostAction::OpenFolder(_) => "vscode.openFolder",
            HostAction::NewFile => "favorites.showNewFileEntries",
            HostAction::OpenFile => "workbench.action.files.openFile",
            HostAction::Native(key) => key,
        }
    }
}

/// Release handle for anything registered with the host.
///
/// Releasing runs the host's cleanup exactly once; dropping an unreleased
/// subscription releases it.
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to clean up.
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn dispose(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.release.is_none()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// A host-managed display surface embedding one HTML document.
///
/// Handles are shared: any call may synchronously deliver a [`PanelEvent`]
/// back to the extension.
pub trait WebviewPanel: Send + Sync {
    fn set_title(&self, title: &str);
    fn set_icon_path(&self, path: Option<&Path>);
    fn set_html(&self, html: String);
    fn reveal(&self, column: Option<ViewColumn>);
    fn is_visible(&self) -> bool;
    /// URI the page must use to load a local file.
    fn as_webview_uri(&self, path: &Path) -> String;
    /// Origin expression for the page's content security policy.
    fn csp_source(&self) -> String;
    fn subscribe(&self, kind: PanelEventKind) -> Subscription;
    /// Close the panel. Must tolerate being called more than once.
    fn dispose(&self);
}

/// The editor runtime hosting the extension.
pub trait Host: Send + Sync {
    /// Read one section of the host's configuration store.
    fn configuration(&self, section: &str) -> Option<serde_json::Value>;
    fn workspace_folders(&self) -> Vec<PathBuf>;
    fn active_column(&self) -> Option<ViewColumn>;
    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        column: ViewColumn,
        options: WebviewOptions,
    ) -> Box<dyn WebviewPanel>;
    fn register_command(&self, id: &str) -> Subscription;
    /// Fire-and-forget host action.
    fn dispatch(&self, action: HostAction);
    fn show_error_message(&self, text: &str);
}

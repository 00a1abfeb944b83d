//! Favorites panel lifecycle.
//!
//! The [`PanelRegistry`] owns one slot per view type. Creating a panel while
//! one is open reveals the existing panel instead. Each panel keeps the
//! settings and render model it was created with; becoming visible again
//! re-renders from that snapshot without fetching.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PanelSettings;
use crate::host::{
    Host, PanelEvent, PanelEventKind, Subscription, ViewColumn, WebviewOptions, WebviewPanel,
};
use crate::model::{self, FolderGroup};
use crate::relay::WebviewMessage;
use crate::render::{self, Header, ResourceLinks};
use crate::{remote, router};

/// View type of the favorites page panel.
pub const VIEW_TYPE: &str = "customFavoritesPage";

/// Title used until the panel's settings are applied.
const INITIAL_TITLE: &str = "Favorites Page";

/// Bundled assets, relative to the extension root.
pub const MEDIA_DIR: &str = "media";
const RELAY_SCRIPT: &str = "main.js";
const STYLESHEETS: [&str; 2] = ["reset.css", "favorites.css"];

const SUBSCRIBED_EVENTS: [PanelEventKind; 3] = [
    PanelEventKind::Disposed,
    PanelEventKind::ViewStateChanged,
    PanelEventKind::Message,
];

/// Snapshot a panel renders from. Shared so host calls can be made without
/// holding the registry lock.
struct PanelView {
    handle: Box<dyn WebviewPanel>,
    settings: PanelSettings,
    groups: Vec<FolderGroup>,
    media_dir: PathBuf,
}

impl PanelView {
    /// Re-render the page from the held snapshot.
    fn update(&self) {
        self.handle.set_title(&self.settings.panel.title);
        self.handle.set_icon_path(self.settings.panel.icon_path.as_deref());

        let header = Header {
            title: self.settings.title.clone(),
            subtitle: self.settings.subtitle.clone(),
        };
        let html = render::render(&self.groups, &header, &self.resource_links());
        self.handle.set_html(html);
    }

    fn resource_links(&self) -> ResourceLinks {
        ResourceLinks {
            csp_source: self.handle.csp_source(),
            script: self.handle.as_webview_uri(&self.media_dir.join(RELAY_SCRIPT)),
            stylesheets: STYLESHEETS
                .iter()
                .map(|name| self.handle.as_webview_uri(&self.media_dir.join(name)))
                .collect(),
            group_icons: self
                .groups
                .iter()
                .filter_map(|group| {
                    let icon = group.icon_path.as_deref().filter(|p| !p.is_empty())?;
                    Some((group.id.clone(), self.icon_src(icon)))
                })
                .collect(),
        }
    }

    /// Remote icons pass through; local ones are resolved against the
    /// resource directory when relative.
    fn icon_src(&self, icon: &str) -> String {
        if icon.starts_with("https://") || icon.starts_with("http://") {
            return icon.to_string();
        }
        let path = Path::new(icon);
        match &self.settings.resource_directory {
            Some(dir) if path.is_relative() => self.handle.as_webview_uri(&dir.join(path)),
            _ => self.handle.as_webview_uri(path),
        }
    }
}

/// An open panel: its view plus the event subscriptions it holds.
struct FavoritesPanel {
    view: Arc<PanelView>,
    subscriptions: Vec<Subscription>,
}

impl FavoritesPanel {
    fn new(view: PanelView) -> Self {
        let subscriptions = SUBSCRIBED_EVENTS
            .into_iter()
            .map(|kind| view.handle.subscribe(kind))
            .collect();
        Self {
            view: Arc::new(view),
            subscriptions,
        }
    }

    fn release_subscriptions(&mut self) {
        for mut subscription in self.subscriptions.drain(..) {
            subscription.dispose();
        }
    }
}

fn webview_options(media_dir: &Path, settings: &PanelSettings) -> WebviewOptions {
    let mut local_resource_roots = vec![media_dir.to_path_buf()];
    if let Some(dir) = &settings.resource_directory {
        local_resource_roots.push(dir.clone());
    }
    WebviewOptions {
        enable_scripts: true,
        local_resource_roots,
    }
}

/// Open panels, one slot per view type.
pub struct PanelRegistry {
    host: Arc<dyn Host>,
    http: reqwest::Client,
    media_dir: PathBuf,
    slots: Mutex<HashMap<String, FavoritesPanel>>,
}

impl PanelRegistry {
    pub fn new(host: Arc<dyn Host>, extension_root: &Path) -> Self {
        Self::with_client(host, extension_root, reqwest::Client::new())
    }

    pub fn with_client(host: Arc<dyn Host>, extension_root: &Path, http: reqwest::Client) -> Self {
        Self {
            host,
            http,
            media_dir: extension_root.join(MEDIA_DIR),
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_open(&self, view_type: &str) -> bool {
        self.slots.lock().contains_key(view_type)
    }

    /// Reveal the favorites panel, creating it first if needed.
    ///
    /// Creation snapshots the settings and waits for the remote favorites
    /// (if configured) before anything is shown.
    pub async fn create_or_show(&self) {
        let column = self.host.active_column();
        if self.reveal(VIEW_TYPE, column) {
            return;
        }

        let settings = PanelSettings::load(self.host.as_ref());
        let remote_groups = match &settings.remote {
            Some(remote) => remote::fetch_groups(&self.http, remote).await,
            None => Vec::new(),
        };
        let groups = model::build(&settings, remote_groups);

        let handle = self.host.create_webview_panel(
            VIEW_TYPE,
            INITIAL_TITLE,
            column.unwrap_or_default(),
            webview_options(&self.media_dir, &settings),
        );
        let panel = FavoritesPanel::new(PanelView {
            handle,
            settings,
            groups,
            media_dir: self.media_dir.clone(),
        });
        let view = panel.view.clone();

        // Another caller may have opened the panel while we were fetching.
        let duplicate = {
            let mut slots = self.slots.lock();
            match slots.get(VIEW_TYPE) {
                Some(existing) => Some((existing.view.clone(), panel)),
                None => {
                    tracing::info!(view_type = VIEW_TYPE, groups = view.groups.len(), "Opened panel");
                    slots.insert(VIEW_TYPE.to_string(), panel);
                    None
                }
            }
        };
        match duplicate {
            Some((existing, mut panel)) => {
                panel.release_subscriptions();
                panel.view.handle.dispose();
                existing.handle.reveal(column);
            }
            None => view.update(),
        }
    }

    fn view(&self, view_type: &str) -> Option<Arc<PanelView>> {
        self.slots.lock().get(view_type).map(|panel| panel.view.clone())
    }

    /// Reveal an open panel. Returns `false` if none is open.
    fn reveal(&self, view_type: &str, column: Option<ViewColumn>) -> bool {
        match self.view(view_type) {
            Some(view) => {
                view.handle.reveal(column);
                true
            }
            None => false,
        }
    }

    /// Deliver a host event to the panel of `view_type`.
    pub fn handle_event(&self, view_type: &str, event: PanelEvent) {
        match event {
            PanelEvent::ViewStateChanged => {
                if let Some(view) = self.view(view_type)
                    && view.handle.is_visible()
                {
                    view.update();
                }
            }
            PanelEvent::Message(value) => {
                if self.is_open(view_type) {
                    self.handle_message(value);
                }
            }
            PanelEvent::Disposed => self.dispose(view_type),
        }
    }

    fn handle_message(&self, value: serde_json::Value) {
        match serde_json::from_value::<WebviewMessage>(value) {
            Ok(WebviewMessage::Dispatch { routing_key, data }) => {
                if let Err(e) = router::route(self.host.as_ref(), &routing_key, data.as_deref()) {
                    tracing::error!("Dropped page command: {e}");
                }
            }
            Ok(WebviewMessage::Alert { text }) => self.host.show_error_message(&text),
            Err(e) => tracing::debug!("Ignoring unrecognised page message: {e}"),
        }
    }

    /// Close the panel of `view_type`. Subscriptions are released before
    /// the slot is cleared; the host panel is disposed after the lock is
    /// dropped, so a host that reports the disposal back re-enters safely.
    pub fn dispose(&self, view_type: &str) {
        let panel = {
            let mut slots = self.slots.lock();
            let Some(panel) = slots.get_mut(view_type) else {
                return;
            };
            panel.release_subscriptions();
            slots.remove(view_type)
        };
        if let Some(panel) = panel {
            panel.view.handle.dispose();
            tracing::info!(view_type, "Disposed panel");
        }
    }

    /// Dispose every open panel.
    pub fn reset(&self) {
        let view_types: Vec<String> = self.slots.lock().keys().cloned().collect();
        for view_type in view_types {
            self.dispose(&view_type);
        }
    }
}

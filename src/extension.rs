use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use crate::host::{Host, PanelEvent, Subscription};
use crate::panel::PanelRegistry;

/// Command that opens (or reveals) the favorites page.
pub const START_COMMAND: &str = "favorites-page.start";

/// Entry point the host drives: activation, commands, panel events.
pub struct FavoritesExtension {
    host: Arc<dyn Host>,
    panels: PanelRegistry,
    registrations: Mutex<Vec<Subscription>>,
}

impl FavoritesExtension {
    pub fn new(host: Arc<dyn Host>, extension_root: &Path) -> Self {
        Self {
            panels: PanelRegistry::new(host.clone(), extension_root),
            host,
            registrations: Mutex::new(Vec::new()),
        }
    }

    /// Register the start command. With no folder open the page replaces
    /// the editor's own landing page straight away.
    pub async fn activate(&self) {
        let registration = self.host.register_command(START_COMMAND);
        self.registrations.lock().push(registration);

        if self.host.workspace_folders().is_empty() {
            self.panels.create_or_show().await;
        }
    }

    /// Run one of the extension's commands. Returns `false` for ids it does
    /// not own.
    pub async fn execute_command(&self, id: &str) -> bool {
        if id != START_COMMAND {
            return false;
        }
        self.panels.create_or_show().await;
        true
    }

    pub fn handle_panel_event(&self, view_type: &str, event: PanelEvent) {
        self.panels.handle_event(view_type, event);
    }

    pub fn panels(&self) -> &PanelRegistry {
        &self.panels
    }

    pub fn deactivate(&self) {
        let registrations: Vec<Subscription> = self.registrations.lock().drain(..).collect();
        for mut registration in registrations {
            registration.dispose();
        }
        self.panels.reset();
    }
}

//! Recording host used by unit tests.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::host::{
    Host, HostAction, PanelEventKind, Subscription, ViewColumn, WebviewOptions, WebviewPanel,
};

type Hook = Arc<dyn Fn() + Send + Sync>;

/// What the fake host remembers about one created panel.
#[derive(Debug, Clone, Default)]
pub(crate) struct PanelRecord {
    pub view_type: String,
    pub title: String,
    pub icon: Option<PathBuf>,
    pub options: WebviewOptions,
    /// Every document set, oldest first
    pub html: Vec<String>,
    pub reveals: usize,
    pub dispose_calls: usize,
    pub visible: bool,
    pub subscribed: Vec<PanelEventKind>,
}

#[derive(Default)]
struct FakeState {
    configuration: Option<serde_json::Value>,
    workspace_folders: Vec<PathBuf>,
    actions: Vec<HostAction>,
    errors: Vec<String>,
    panels: Vec<PanelRecord>,
    active_subscriptions: usize,
    commands: Vec<String>,
    dispose_hook: Option<Hook>,
    reveal_hook: Option<Hook>,
}

#[derive(Clone, Default)]
pub(crate) struct FakeHost {
    state: Arc<Mutex<FakeState>>,
}

impl FakeHost {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_configuration(value: serde_json::Value) -> Self {
        let host = Self::new();
        host.set_configuration(Some(value));
        host
    }

    pub(crate) fn set_configuration(&self, value: Option<serde_json::Value>) {
        self.state.lock().configuration = value;
    }

    pub(crate) fn set_workspace_folders(&self, folders: Vec<PathBuf>) {
        self.state.lock().workspace_folders = folders;
    }

    /// Run `hook` every time a panel is disposed through its handle.
    pub(crate) fn set_dispose_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.state.lock().dispose_hook = Some(Arc::new(hook));
    }

    /// Run `hook` every time a panel is revealed, after the reveal is recorded.
    pub(crate) fn set_reveal_hook(&self, hook: impl Fn() + Send + Sync + 'static) {
        self.state.lock().reveal_hook = Some(Arc::new(hook));
    }

    pub(crate) fn set_visible(&self, index: usize, visible: bool) {
        self.state.lock().panels[index].visible = visible;
    }

    pub(crate) fn actions(&self) -> Vec<HostAction> {
        self.state.lock().actions.clone()
    }

    pub(crate) fn errors(&self) -> Vec<String> {
        self.state.lock().errors.clone()
    }

    pub(crate) fn panels(&self) -> Vec<PanelRecord> {
        self.state.lock().panels.clone()
    }

    pub(crate) fn last_html(&self, index: usize) -> String {
        self.state.lock().panels[index]
            .html
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub(crate) fn active_subscriptions(&self) -> usize {
        self.state.lock().active_subscriptions
    }

    pub(crate) fn registered_commands(&self) -> Vec<String> {
        self.state.lock().commands.clone()
    }
}

impl Host for FakeHost {
    fn configuration(&self, _section: &str) -> Option<serde_json::Value> {
        self.state.lock().configuration.clone()
    }

    fn workspace_folders(&self) -> Vec<PathBuf> {
        self.state.lock().workspace_folders.clone()
    }

    fn active_column(&self) -> Option<ViewColumn> {
        None
    }

    fn create_webview_panel(
        &self,
        view_type: &str,
        title: &str,
        _column: ViewColumn,
        options: WebviewOptions,
    ) -> Box<dyn WebviewPanel> {
        let mut state = self.state.lock();
        state.panels.push(PanelRecord {
            view_type: view_type.to_string(),
            title: title.to_string(),
            options,
            visible: true,
            ..PanelRecord::default()
        });
        Box::new(FakePanel {
            index: state.panels.len() - 1,
            state: self.state.clone(),
        })
    }

    fn register_command(&self, id: &str) -> Subscription {
        self.state.lock().commands.push(id.to_string());
        let state = self.state.clone();
        let id = id.to_string();
        Subscription::new(move || state.lock().commands.retain(|c| *c != id))
    }

    fn dispatch(&self, action: HostAction) {
        self.state.lock().actions.push(action);
    }

    fn show_error_message(&self, text: &str) {
        self.state.lock().errors.push(text.to_string());
    }
}

struct FakePanel {
    index: usize,
    state: Arc<Mutex<FakeState>>,
}

impl FakePanel {
    fn with_record<R>(&self, f: impl FnOnce(&mut PanelRecord) -> R) -> R {
        f(&mut self.state.lock().panels[self.index])
    }
}

impl WebviewPanel for FakePanel {
    fn set_title(&self, title: &str) {
        self.with_record(|r| r.title = title.to_string());
    }

    fn set_icon_path(&self, path: Option<&Path>) {
        self.with_record(|r| r.icon = path.map(Path::to_path_buf));
    }

    fn set_html(&self, html: String) {
        self.with_record(|r| r.html.push(html));
    }

    fn reveal(&self, _column: Option<ViewColumn>) {
        let hook = {
            let mut state = self.state.lock();
            let record = &mut state.panels[self.index];
            record.reveals += 1;
            record.visible = true;
            state.reveal_hook.clone()
        };
        if let Some(hook) = hook {
            hook();
        }
    }

    fn is_visible(&self) -> bool {
        self.with_record(|r| r.visible)
    }

    fn as_webview_uri(&self, path: &Path) -> String {
        format!("webview-resource:{}", path.display())
    }

    fn csp_source(&self) -> String {
        "webview-resource:".to_string()
    }

    fn subscribe(&self, kind: PanelEventKind) -> Subscription {
        {
            let mut state = self.state.lock();
            state.active_subscriptions += 1;
            state.panels[self.index].subscribed.push(kind);
        }
        let state = self.state.clone();
        Subscription::new(move || state.lock().active_subscriptions -= 1)
    }

    fn dispose(&self) {
        let hook = {
            let mut state = self.state.lock();
            let record = &mut state.panels[self.index];
            record.dispose_calls += 1;
            record.visible = false;
            state.dispose_hook.clone()
        };
        if let Some(hook) = hook {
            hook();
        }
    }
}

//! Preview the favorites page outside an editor.
//!
//! Runs the extension against a file-backed host: settings come from a
//! `settings.json`, the rendered page is written to disk, and host actions
//! are logged instead of performed.

use anyhow::Context;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing_subscriber::EnvFilter;

use favorites_page_lib::config::{config_dir, load_settings_file, SETTINGS_SECTION};
use favorites_page_lib::host::PanelEventKind;
use favorites_page_lib::{
    FavoritesExtension, Host, HostAction, PanelEvent, Subscription, ViewColumn, WebviewOptions,
    WebviewPanel, START_COMMAND, VIEW_TYPE,
};

#[derive(Parser)]
#[command(name = "favorites-page", version, about = "Favorites start page tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render the page to an HTML file
    Preview {
        /// Host settings file holding a `favoritesPage` section
        #[arg(long, env = "FAVORITES_PAGE_SETTINGS")]
        settings: Option<PathBuf>,
        /// Directory containing the bundled `media/` assets
        #[arg(long, default_value = env!("CARGO_MANIFEST_DIR"))]
        extension_root: PathBuf,
        #[arg(long, short, default_value = "favorites-page.html")]
        output: PathBuf,
        /// Simulate a click on an element with this routing key
        #[arg(long)]
        dispatch: Option<String>,
        /// Payload sent with `--dispatch`
        #[arg(long, requires = "dispatch")]
        data: Option<String>,
    },
}

/// Host backed by a settings file and an output file.
struct PreviewHost {
    settings: Option<serde_json::Value>,
    output: PathBuf,
    subscriptions: Arc<Mutex<usize>>,
}

impl Host for PreviewHost {
    fn configuration(&self, section: &str) -> Option<serde_json::Value> {
        if section == SETTINGS_SECTION {
            self.settings.clone()
        } else {
            None
        }
    }

    fn workspace_folders(&self) -> Vec<PathBuf> {
        Vec::new()
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
        tracing::info!(view_type, title, roots = ?options.local_resource_roots, "Creating panel");
        Box::new(PreviewPanel {
            output: self.output.clone(),
            disposed: AtomicBool::new(false),
            subscriptions: self.subscriptions.clone(),
        })
    }

    fn register_command(&self, id: &str) -> Subscription {
        tracing::debug!(id, "Registered command");
        Subscription::noop()
    }

    fn dispatch(&self, action: HostAction) {
        tracing::info!(command = action.command_id(), ?action, "Host action");
    }

    fn show_error_message(&self, text: &str) {
        tracing::error!("{text}");
    }
}

struct PreviewPanel {
    output: PathBuf,
    disposed: AtomicBool,
    subscriptions: Arc<Mutex<usize>>,
}

impl WebviewPanel for PreviewPanel {
    fn set_title(&self, title: &str) {
        tracing::debug!(title, "Panel title");
    }

    fn set_icon_path(&self, _path: Option<&Path>) {}

    fn set_html(&self, html: String) {
        match std::fs::write(&self.output, html) {
            Ok(()) => tracing::info!(path = %self.output.display(), "Wrote page"),
            Err(e) => tracing::error!(path = %self.output.display(), "Failed to write page: {e}"),
        }
    }

    fn reveal(&self, _column: Option<ViewColumn>) {}

    fn is_visible(&self) -> bool {
        !self.disposed.load(Ordering::Relaxed)
    }

    fn as_webview_uri(&self, path: &Path) -> String {
        url::Url::from_file_path(path)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| path.display().to_string())
    }

    fn csp_source(&self) -> String {
        "file:".to_string()
    }

    fn subscribe(&self, _kind: PanelEventKind) -> Subscription {
        *self.subscriptions.lock() += 1;
        let subscriptions = self.subscriptions.clone();
        Subscription::new(move || *subscriptions.lock() -= 1)
    }

    fn dispose(&self) {
        self.disposed.store(true, Ordering::Relaxed);
    }
}

async fn preview(
    settings: Option<PathBuf>,
    extension_root: PathBuf,
    output: PathBuf,
    dispatch: Option<String>,
    data: Option<String>,
) -> anyhow::Result<()> {
    let settings_path = settings.unwrap_or_else(|| config_dir().join("settings.json"));
    if !extension_root.join("media").is_dir() {
        anyhow::bail!("no media directory under {}", extension_root.display());
    }

    let subscriptions = Arc::new(Mutex::new(0));
    let host = Arc::new(PreviewHost {
        settings: load_settings_file(&settings_path),
        output: output.clone(),
        subscriptions: subscriptions.clone(),
    });
    let extension = FavoritesExtension::new(host, &extension_root);

    if !extension.execute_command(START_COMMAND).await {
        anyhow::bail!("{START_COMMAND} was not handled");
    }

    if let Some(routing_key) = dispatch {
        let message = serde_json::json!({
            "command": "x-dispatch",
            "xDispatch": routing_key,
            "xData": data,
        });
        extension.handle_panel_event(VIEW_TYPE, PanelEvent::Message(message));
    }

    extension.deactivate();
    tracing::debug!(open_subscriptions = *subscriptions.lock(), "Preview finished");

    let output = output
        .canonicalize()
        .with_context(|| format!("page was not written to {}", output.display()))?;
    println!("{}", output.display());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Preview {
            settings,
            extension_root,
            output,
            dispatch,
            data,
        } => preview(settings, extension_root, output, dispatch, data).await,
    }
}

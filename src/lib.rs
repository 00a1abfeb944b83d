pub mod collate;
pub mod config;
pub mod extension;
pub mod host;
pub mod model;
pub mod panel;
pub mod relay;
pub mod remote;
pub mod render;
pub mod router;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{PanelSettings, RemoteSourceConfig};
pub use extension::{FavoritesExtension, START_COMMAND};
pub use host::{Host, HostAction, PanelEvent, Subscription, ViewColumn, WebviewOptions, WebviewPanel};
pub use model::{FolderGroup, FolderItem};
pub use panel::{PanelRegistry, VIEW_TYPE};

//! Host-side routing of `x-dispatch` keys to host actions.
//!
//! Key grammar:
//!
//! ```text
//! key    := category ":" target
//! target := namespace "." name    routed through the command table
//!         | name                  host-native, passed through unchanged
//! ```
//!
//! The category is informational. Parts may not be empty; the category and
//! namespace may not contain `:`, and the namespace may not contain `.`.

use std::path::PathBuf;

use crate::host::{Host, HostAction};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("malformed routing key {0:?}")]
    MalformedKey(String),
    #[error("routing key {0:?} requires a payload")]
    MissingPayload(String),
}

/// A parsed routing key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingKey<'a> {
    Routed {
        category: &'a str,
        namespace: &'a str,
        name: &'a str,
    },
    Native {
        category: &'a str,
        name: &'a str,
    },
}

impl<'a> RoutingKey<'a> {
    pub fn parse(raw: &'a str) -> Result<Self, RouteError> {
        let malformed = || RouteError::MalformedKey(raw.to_string());

        let (category, target) = raw.split_once(':').ok_or_else(malformed)?;
        if category.is_empty() || target.is_empty() {
            return Err(malformed());
        }

        match target.split_once('.') {
            Some((namespace, name)) => {
                if namespace.is_empty() || name.is_empty() || namespace.contains(':') {
                    return Err(malformed());
                }
                Ok(RoutingKey::Routed {
                    category,
                    namespace,
                    name,
                })
            }
            None if target.contains(':') => Err(malformed()),
            None => Ok(RoutingKey::Native {
                category,
                name: target,
            }),
        }
    }
}

/// Resolve a key and payload to the host action it triggers.
///
/// `Ok(None)` means the command is not one this router handles.
pub fn resolve(raw_key: &str, payload: Option<&str>) -> Result<Option<HostAction>, RouteError> {
    match RoutingKey::parse(raw_key)? {
        RoutingKey::Native { .. } => Ok(Some(HostAction::Native(raw_key.to_string()))),
        RoutingKey::Routed { name, .. } => match name {
            "openFolder" => {
                let payload = payload
                    .filter(|p| !p.is_empty())
                    .ok_or_else(|| RouteError::MissingPayload(raw_key.to_string()))?;
                Ok(Some(HostAction::OpenFolder(folder_location(payload))))
            }
            "showNewFileEntries" => Ok(Some(HostAction::NewFile)),
            "topLevelOpenMac" => Ok(Some(HostAction::OpenFile)),
            _ => Ok(None),
        },
    }
}

/// Resolve and dispatch. Unknown command names are a no-op.
pub fn route(host: &dyn Host, raw_key: &str, payload: Option<&str>) -> Result<(), RouteError> {
    match resolve(raw_key, payload)? {
        Some(action) => {
            tracing::debug!(key = raw_key, command = action.command_id(), "Dispatching");
            host.dispatch(action);
        }
        None => tracing::debug!(key = raw_key, "No handler for routing key"),
    }
    Ok(())
}

/// Turn an `openFolder` payload into a path: `file:` URLs are converted,
/// a leading `~/` becomes the home directory, anything else is a path.
///
/// This is the only place locations are expanded.
pub fn folder_location(payload: &str) -> PathBuf {
    if payload.starts_with("file:")
        && let Ok(url) = url::Url::parse(payload)
        && let Ok(path) = url.to_file_path()
    {
        return path;
    }
    expand_home(payload)
}

/// Expand a leading `~` or `~/` to the home directory. Only the prefix is
/// touched; later `~/` segments stay literal.
pub fn expand_home(location: &str) -> PathBuf {
    let Some(home) = dirs::home_dir() else {
        return PathBuf::from(location);
    };
    if location == "~" {
        return home;
    }
    match location.strip_prefix("~/") {
        Some(rest) => home.join(rest),
        None => PathBuf::from(location),
    }
}

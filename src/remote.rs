//! Remote favorites: turn a GitLab-style project listing into folder groups.
//!
//! One group per namespace, sorted by name, with one folder per project.
//! Fetching is best effort: any failure contributes no groups.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::collate::locale_compare;
use crate::config::RemoteSourceConfig;
use crate::model::{FolderGroup, FolderItem};

/// Header carrying the access token.
const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

/// Namespace a remote project belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteNamespace {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub full_path: String,
}

/// One record of the remote project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProject {
    pub id: u64,
    #[serde(default)]
    pub path: String,
    pub name: String,
    pub path_with_namespace: String,
    pub namespace: RemoteNamespace,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not decode project list from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Fetch and reshape the remote favorites. Never fails: errors are logged
/// and yield an empty list.
///
/// No timeout is set; a hung endpoint delays the page until the transport
/// gives up.
pub async fn fetch_groups(client: &reqwest::Client, config: &RemoteSourceConfig) -> Vec<FolderGroup> {
    match fetch_projects(client, config).await {
        Ok(projects) => {
            let groups = group_projects(&projects, config);
            tracing::debug!(
                projects = projects.len(),
                groups = groups.len(),
                "Loaded remote favorites"
            );
            groups
        }
        Err(e) => {
            tracing::error!("Remote favorites unavailable: {e}");
            Vec::new()
        }
    }
}

/// One authenticated GET against the configured endpoint.
pub async fn fetch_projects(
    client: &reqwest::Client,
    config: &RemoteSourceConfig,
) -> Result<Vec<RemoteProject>, FetchError> {
    let url = config.endpoint_url.as_str();
    let response = client
        .get(url)
        .header(TOKEN_HEADER, config.private_token.as_str())
        .send()
        .await
        .map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    response
        .json::<Vec<RemoteProject>>()
        .await
        .map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
}

/// Group projects by namespace.
///
/// The first project seen for a namespace decides its name. Groups are
/// sorted by that name; items keep the listing order.
pub fn group_projects(projects: &[RemoteProject], config: &RemoteSourceConfig) -> Vec<FolderGroup> {
    let mut namespaces: Vec<&RemoteNamespace> = Vec::new();
    for project in projects {
        if !namespaces.iter().any(|ns| ns.id == project.namespace.id) {
            namespaces.push(&project.namespace);
        }
    }
    namespaces.sort_by(|a, b| locale_compare(&a.name, &b.name));

    let mut groups: Vec<FolderGroup> = namespaces
        .into_iter()
        .map(|ns| {
            FolderGroup::new(
                ns.id.to_string(),
                apply_renames(&ns.name, &config.rename_groups),
            )
        })
        .collect();

    for project in projects {
        let group_id = project.namespace.id.to_string();
        if let Some(group) = groups.iter_mut().find(|g| g.id == group_id) {
            let path = apply_renames(&project.path_with_namespace, &config.rename_paths);
            group.items.push(FolderItem {
                id: project.id.to_string(),
                label: project.name.clone(),
                location: format!("{}{path}", config.local_root_path),
            });
        }
    }

    groups
}

/// Apply each rule in order, replacing only the first literal occurrence.
pub(crate) fn apply_renames(text: &str, rules: &IndexMap<String, String>) -> String {
    rules
        .iter()
        .fold(text.to_string(), |acc, (from, to)| acc.replacen(from.as_str(), to, 1))
}

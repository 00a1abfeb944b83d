//! HTML document for the favorites page.
//!
//! Pure string construction: every URI the page needs is resolved by the
//! caller and passed in through [`ResourceLinks`].

use std::collections::HashMap;

use maud::{DOCTYPE, Markup, html};

use crate::model::{FolderGroup, FolderItem};

/// Routing key attached to every folder shortcut.
pub const OPEN_FOLDER_KEY: &str = "customFavoritesPage:repository.openFolder";

const NONCE_LEN: usize = 32;
const NONCE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// One entry of the fixed "Start" menu.
struct StartEntry {
    routing_key: &'static str,
    title: &'static str,
    /// Outline drawn in a 16x16 box
    icon: &'static str,
    label: &'static str,
}

const START_ENTRIES: [StartEntry; 4] = [
    StartEntry {
        routing_key: "selectStartEntry:favorites.showNewFileEntries",
        title: "Open a new untitled file, notebook, or custom editor. (⌃⌥⌘N)",
        icon: "M4 1.5h5l3 3v10H4zM9 1.5v3h3M8 8v4M6 10h4",
        label: "New File...",
    },
    StartEntry {
        routing_key: "selectStartEntry:favorites.topLevelOpenMac",
        title: "Open a file or folder to start working (⌘O)",
        icon: "M1.5 3.5h4.5l1.5 1.5h7v8.5h-13z",
        label: "Open...",
    },
    StartEntry {
        routing_key: "selectStartEntry:topLevelGitClone",
        title: "Clone a remote repository to a local folder",
        icon: "M2.5 3.5a1.5 1.5 0 1 0 3 0a1.5 1.5 0 1 0 -3 0M2.5 12.5a1.5 1.5 0 1 0 3 0a1.5 1.5 0 1 0 -3 0M10.5 4.5a1.5 1.5 0 1 0 3 0a1.5 1.5 0 1 0 -3 0M4 5v6M12 6c0 3-8 2-8 5",
        label: "Clone Git Repository...",
    },
    StartEntry {
        routing_key: "selectStartEntry:topLevelShowWalkthroughs",
        title: "View a walkthrough on the editor or an extension",
        icon: "M2 4l1.5 1.5L6 3M2 11l1.5 1.5L6 10M8 4.5h6M8 11.5h6",
        label: "Open a Walkthrough...",
    },
];

/// Branding shown at the top of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub title: String,
    pub subtitle: String,
}

/// Everything the page loads, already converted to webview URIs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceLinks {
    /// Origin allowed by the content security policy
    pub csp_source: String,
    /// The event relay script
    pub script: String,
    pub stylesheets: Vec<String>,
    /// Icon `src` per group id; groups without an entry get no icon
    pub group_icons: HashMap<String, String>,
}

/// Render the page with a fresh script nonce.
pub fn render(groups: &[FolderGroup], header: &Header, links: &ResourceLinks) -> String {
    render_with_nonce(groups, header, links, &generate_nonce())
}

pub(crate) fn render_with_nonce(
    groups: &[FolderGroup],
    header: &Header,
    links: &ResourceLinks,
    nonce: &str,
) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta http-equiv="Content-Security-Policy" content=(content_security_policy(&links.csp_source, nonce));
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @for href in &links.stylesheets {
                    link href=(href) rel="stylesheet";
                }
            }
            body {
                div class="favorites-page" {
                    div class="favorites-page-container" {
                        div class="favorites-page-slide" {
                            div class="favorites-page-categories-container" {
                                (header_section(header))
                                (start_section())
                                (folders_section(groups, &links.group_icons))
                                div class="footer" {}
                            }
                        }
                    }
                }
                script nonce=(nonce) src=(links.script) {}
            }
        }
    };
    markup.into_string()
}

/// 32 alphanumeric characters, new for every render.
pub fn generate_nonce() -> String {
    (0..NONCE_LEN)
        .map(|_| NONCE_ALPHABET[rand::random::<u32>() as usize % NONCE_ALPHABET.len()] as char)
        .collect()
}

fn content_security_policy(csp_source: &str, nonce: &str) -> String {
    format!(
        "default-src 'none'; style-src {csp_source}; font-src {csp_source}; \
         img-src {csp_source} https:; script-src 'nonce-{nonce}';"
    )
}

fn header_section(header: &Header) -> Markup {
    html! {
        div class="header" {
            h1 class="product-name caption" { (header.title) }
            p class="subtitle description" { (header.subtitle) }
        }
    }
}

fn start_section() -> Markup {
    html! {
        div class="categories-column categories-column-left" {
            div class="index-list start-container" {
                h2 { "Start" }
                ul style="overflow: hidden;" {
                    @for entry in &START_ENTRIES {
                        li {
                            button class="button-link" x-dispatch=(entry.routing_key) title=(entry.title) {
                                (start_icon(entry.icon))
                                span { (entry.label) }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn start_icon(outline: &str) -> Markup {
    html! {
        svg class="icon-widget" viewBox="0 0 16 16" width="16" height="16" aria-hidden="true" {
            path d=(outline)
                fill="none"
                stroke="currentColor"
                stroke-width="1.2"
                stroke-linecap="round"
                stroke-linejoin="round" {}
        }
    }
}

fn folders_section(groups: &[FolderGroup], icons: &HashMap<String, String>) -> Markup {
    html! {
        div class="categories-column categories-column-right" {
            div class="index-list start-container" {
                h2 { "Folders" }
                @for group in groups {
                    (folder_group(group, icons.get(&group.id)))
                }
            }
        }
    }
}

fn folder_group(group: &FolderGroup, icon: Option<&String>) -> Markup {
    html! {
        details class="folder-group" open {
            summary {
                @if let Some(src) = icon.filter(|s| !s.is_empty()) {
                    img src=(src);
                }
                @if !group.title.is_empty() {
                    h3 { (group.title) }
                }
            }
            ul {
                @for item in &group.items {
                    (folder_item(item))
                }
            }
        }
    }
}

fn folder_item(item: &FolderItem) -> Markup {
    let location = Some(item.location.as_str()).filter(|l| !l.is_empty());
    let aria_label = location.map(|l| format!("Open folder {l}"));
    html! {
        li {
            button class="button-link"
                x-dispatch=(OPEN_FOLDER_KEY)
                x-data=[location]
                title=[location]
                aria-label=[aria_label] {
                (item.label)
            }
        }
    }
}

//! Page-to-host click relay.
//!
//! The page registers one capturing click listener (`media/main.js`). On a
//! click it looks for the nearest element, starting at the target, that
//! carries an `x-dispatch` attribute and posts one [`WebviewMessage`] to the
//! host. This module holds the same search as a pure function over any
//! DOM-like tree, plus the serde model of the messages.

use serde::{Deserialize, Serialize};

pub const DISPATCH_ATTR: &str = "x-dispatch";
pub const DATA_ATTR: &str = "x-data";
/// Fallback for the payload when `x-data` is absent.
pub const TOOLTIP_ATTR: &str = "title";

/// Messages posted by the page script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command")]
pub enum WebviewMessage {
    #[serde(rename = "x-dispatch")]
    Dispatch {
        #[serde(rename = "xDispatch")]
        routing_key: String,
        #[serde(
            rename = "xData",
            alias = "data",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        data: Option<String>,
    },
    /// Ask the host to show an error dialog.
    #[serde(rename = "alert")]
    Alert { text: String },
}

/// Minimal view of a DOM element.
pub trait DomNode: Sized {
    fn attribute(&self, name: &str) -> Option<String>;
    fn parent(&self) -> Option<Self>;
}

/// Nearest element, the start included, with a non-empty `x-dispatch`.
pub fn find_dispatch_target<N: DomNode>(start: N) -> Option<N> {
    let mut node = Some(start);
    while let Some(current) = node {
        if current
            .attribute(DISPATCH_ATTR)
            .is_some_and(|key| !key.is_empty())
        {
            return Some(current);
        }
        node = current.parent();
    }
    None
}

/// The message a click on `target` posts, or `None` when no ancestor is a
/// dispatch element and the browser default should proceed.
pub fn relay_click<N: DomNode>(target: Option<N>) -> Option<WebviewMessage> {
    let element = find_dispatch_target(target?)?;
    let routing_key = element.attribute(DISPATCH_ATTR)?;
    let data = element
        .attribute(DATA_ATTR)
        .or_else(|| element.attribute(TOOLTIP_ATTR));
    Some(WebviewMessage::Dispatch { routing_key, data })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Element {
        parent: Option<usize>,
        attrs: Vec<(&'static str, &'static str)>,
    }

    #[derive(Clone, Copy)]
    struct Node<'a> {
        tree: &'a [Element],
        index: usize,
    }

    impl DomNode for Node<'_> {
        fn attribute(&self, name: &str) -> Option<String> {
            self.tree[self.index]
                .attrs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }

        fn parent(&self) -> Option<Self> {
            self.tree[self.index].parent.map(|index| Node {
                tree: self.tree,
                index,
            })
        }
    }

    // 0 body > 1 li > 2 button[x-dispatch] > 3 span > 4 text-ish leaf
    fn page(button_attrs: Vec<(&'static str, &'static str)>) -> Vec<Element> {
        vec![
            Element { parent: None, attrs: vec![("class", "favorites-page")] },
            Element { parent: Some(0), attrs: vec![] },
            Element { parent: Some(1), attrs: button_attrs },
            Element { parent: Some(2), attrs: vec![] },
            Element { parent: Some(3), attrs: vec![("class", "icon-widget")] },
        ]
    }

    #[test]
    fn walks_up_to_dispatch_element() {
        let tree = page(vec![(DISPATCH_ATTR, "k:a.b")]);
        let found = find_dispatch_target(Node { tree: &tree, index: 4 }).unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn target_itself_matches() {
        let tree = page(vec![(DISPATCH_ATTR, "k:a.b")]);
        let found = find_dispatch_target(Node { tree: &tree, index: 2 }).unwrap();
        assert_eq!(found.index, 2);
    }

    #[test]
    fn no_dispatch_ancestor_is_ignored() {
        let tree = page(vec![("title", "plain")]);
        assert!(find_dispatch_target(Node { tree: &tree, index: 4 }).is_none());
        assert!(relay_click(Some(Node { tree: &tree, index: 3 })).is_none());
        assert!(relay_click::<Node>(None).is_none());
    }

    #[test]
    fn empty_dispatch_attribute_is_skipped() {
        let mut tree = page(vec![(DISPATCH_ATTR, "")]);
        tree[1].attrs.push((DISPATCH_ATTR, "outer:a.b"));
        let found = find_dispatch_target(Node { tree: &tree, index: 3 }).unwrap();
        assert_eq!(found.index, 1);
    }

    #[test]
    fn explicit_data_wins_over_tooltip() {
        let tree = page(vec![
            (DISPATCH_ATTR, "customFavoritesPage:repository.openFolder"),
            (TOOLTIP_ATTR, "tooltip"),
            (DATA_ATTR, "/abs/path"),
        ]);
        let message = relay_click(Some(Node { tree: &tree, index: 3 })).unwrap();
        assert_eq!(
            message,
            WebviewMessage::Dispatch {
                routing_key: "customFavoritesPage:repository.openFolder".to_string(),
                data: Some("/abs/path".to_string()),
            }
        );
    }

    #[test]
    fn tooltip_used_when_data_missing() {
        let tree = page(vec![(DISPATCH_ATTR, "k:a.b"), (TOOLTIP_ATTR, "~/code")]);
        let message = relay_click(Some(Node { tree: &tree, index: 4 })).unwrap();
        assert_eq!(
            message,
            WebviewMessage::Dispatch {
                routing_key: "k:a.b".to_string(),
                data: Some("~/code".to_string()),
            }
        );
    }

    #[test]
    fn dispatch_message_wire_format() {
        let message = WebviewMessage::Dispatch {
            routing_key: "k:a.b".to_string(),
            data: Some("/p".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({ "command": "x-dispatch", "xDispatch": "k:a.b", "xData": "/p" })
        );
    }

    #[test]
    fn accepts_both_payload_field_names() {
        let from_data: WebviewMessage = serde_json::from_value(
            json!({ "command": "x-dispatch", "xDispatch": "k:a.b", "data": "/one" }),
        )
        .unwrap();
        let from_xdata: WebviewMessage = serde_json::from_value(
            json!({ "command": "x-dispatch", "xDispatch": "k:a.b", "xData": null }),
        )
        .unwrap();

        assert_eq!(
            from_data,
            WebviewMessage::Dispatch { routing_key: "k:a.b".to_string(), data: Some("/one".to_string()) }
        );
        assert_eq!(
            from_xdata,
            WebviewMessage::Dispatch { routing_key: "k:a.b".to_string(), data: None }
        );
    }

    #[test]
    fn alert_message_decodes() {
        let message: WebviewMessage =
            serde_json::from_value(json!({ "command": "alert", "text": "boom" })).unwrap();
        assert_eq!(message, WebviewMessage::Alert { text: "boom".to_string() });
    }

    #[test]
    fn unknown_command_is_an_error() {
        let result: Result<WebviewMessage, _> =
            serde_json::from_value(json!({ "command": "refresh" }));
        assert!(result.is_err());
    }
}

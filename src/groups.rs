//! Group-list tree: typed nodes decoded from the group payload, and a
//! separate renderer that turns the tree into nested `<ol>` markup.

use std::fmt::Write;

use serde::Deserialize;

use crate::error::WatchError;

const COLLECTION_LABEL_STYLE: &str = "font-weight:normal;margin-top:2px;margin-left:5px;";
const GROUP_LABEL_STYLE: &str = "font-weight:normal;line-height:100%;";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Collection,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupNode {
    pub id: Option<String>,
    pub label: String,
    pub kind: NodeKind,
    pub children: Vec<GroupNode>,
}

/// Top-level collections, in payload order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupTree {
    pub roots: Vec<GroupNode>,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    standard: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    name: String,
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    children: Vec<RawNode>,
}

impl RawNode {
    fn into_node(self, kind: NodeKind) -> GroupNode {
        let children = self
            .children
            .into_iter()
            .filter_map(|child| {
                let kind = match child.kind.as_deref() {
                    Some("collection") => NodeKind::Collection,
                    Some("group") => NodeKind::Group,
                    _ => return None,
                };
                Some(child.into_node(kind))
            })
            .collect();

        GroupNode {
            id: self.id.map(|id| match id {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            }),
            label: self.name,
            kind,
            children,
        }
    }
}

impl GroupTree {
    /// Decode `{"standard": {<key>: {"name", "children"}}}`. Children of
    /// unknown type are skipped.
    pub fn from_json(input: &str) -> Result<Self, WatchError> {
        let payload: RawPayload = serde_json::from_str(input)?;
        let roots = payload
            .standard
            .into_iter()
            .map(|(_, value)| {
                serde_json::from_value::<RawNode>(value)
                    .map(|raw| raw.into_node(NodeKind::Collection))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { roots })
    }
}

/// Render the tree as the group-list markup.
pub fn render(tree: &GroupTree) -> String {
    let mut out = String::from(r#"<ol class="group-list" genome_list="public">"#);
    for root in &tree.roots {
        render_node(&mut out, root, None);
    }
    out.push_str("</ol>");
    out
}

fn render_node(out: &mut String, node: &GroupNode, parent: Option<&str>) {
    let label = escape(&node.label);
    match node.kind {
        NodeKind::Collection => {
            let _ = write!(
                out,
                r#"<li id="{label}" data-value="false"><label style="{COLLECTION_LABEL_STYLE}">{label}</label><ol>"#
            );
            for child in &node.children {
                render_node(out, child, Some(node.label.as_str()));
            }
            out.push_str("</ol></li>");
        }
        NodeKind::Group => {
            let id = escape(node.id.as_deref().unwrap_or_default());
            let parent = escape(parent.unwrap_or_default());
            let _ = write!(
                out,
                r#"<li id="bonsai{id}" data-value="{id}" data-collection_name="{parent}" data-group_name="{label}"><label style="{GROUP_LABEL_STYLE}">{label}</label></li>"#
            );
        }
    }
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "standard": {
            "serotype": {
                "name": "Serotype",
                "children": [
                    {"type": "group", "name": "O157", "id": 12},
                    {"type": "collection", "name": "H types", "children": [
                        {"type": "group", "name": "H7", "id": "31"},
                        {"type": "collection", "name": "Rare", "children": [
                            {"type": "group", "name": "H99", "id": 77}
                        ]}
                    ]}
                ]
            },
            "host": {"name": "Host", "children": [{"type": "widget", "name": "skip me"}]}
        }
    }"#;

    #[test]
    fn decode_builds_typed_tree_in_payload_order() {
        let tree = GroupTree::from_json(PAYLOAD).unwrap();
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].label, "Serotype");
        assert_eq!(tree.roots[1].label, "Host");
        assert!(tree.roots[1].children.is_empty());

        let serotype = &tree.roots[0];
        assert_eq!(serotype.kind, NodeKind::Collection);
        assert_eq!(serotype.children[0].kind, NodeKind::Group);
        assert_eq!(serotype.children[0].id.as_deref(), Some("12"));
        assert_eq!(serotype.children[1].children[1].children[0].label, "H99");
    }

    #[test]
    fn render_group_carries_enclosing_collection() {
        let tree = GroupTree::from_json(PAYLOAD).unwrap();
        let html = render(&tree);

        assert!(html.starts_with(r#"<ol class="group-list" genome_list="public">"#));
        assert!(html.ends_with("</ol>"));
        assert!(html.contains(
            r#"<li id="bonsai12" data-value="12" data-collection_name="Serotype" data-group_name="O157">"#
        ));
        assert!(html.contains(r#"data-collection_name="H types" data-group_name="H7""#));
        // Three collections deep.
        assert!(html.contains(r#"data-collection_name="Rare" data-group_name="H99""#));
    }

    #[test]
    fn render_collection_wraps_children() {
        let tree = GroupTree {
            roots: vec![GroupNode {
                id: None,
                label: "Empty".into(),
                kind: NodeKind::Collection,
                children: vec![],
            }],
        };
        assert_eq!(
            render(&tree),
            format!(
                r#"<ol class="group-list" genome_list="public"><li id="Empty" data-value="false"><label style="{COLLECTION_LABEL_STYLE}">Empty</label><ol></ol></li></ol>"#
            )
        );
    }

    #[test]
    fn render_escapes_markup_in_names() {
        let tree = GroupTree {
            roots: vec![GroupNode {
                id: None,
                label: r#"<b>"x"</b>"#.into(),
                kind: NodeKind::Collection,
                children: vec![],
            }],
        };
        let html = render(&tree);
        assert!(html.contains("&lt;b&gt;&quot;x&quot;&lt;/b&gt;"));
        assert!(!html.contains("<b>"));
    }

    #[test]
    fn decode_rejects_missing_standard() {
        assert!(matches!(
            GroupTree::from_json(r#"{"custom": {}}"#),
            Err(WatchError::Decode(_))
        ));
    }
}

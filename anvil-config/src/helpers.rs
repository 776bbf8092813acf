use anvil_common::{Node, NodeKind, NodeRef};
use tracing::warn;

/// Value under `key` when it has the expected kind.
///
/// A present value of another kind is logged and treated as absent.
pub(crate) fn get_kind<'a>(node: &'a Node, key: &str, kind: NodeKind) -> Option<&'a NodeRef> {
    let value = node.get(key)?;
    if value.kind() == kind {
        Some(value)
    } else {
        warn!(key, expected = %kind, found = %value.kind(), "ignoring value of the wrong kind");
        None
    }
}

pub(crate) fn get_string(node: &Node, key: &str) -> Option<String> {
    get_kind(node, key, NodeKind::String)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

/// String items of a list, other items are skipped.
pub(crate) fn string_items(list: &Node) -> Vec<String> {
    list.as_list()
        .unwrap_or_default()
        .iter()
        .filter_map(|item| item.as_str().map(str::to_string))
        .collect()
}

pub(crate) fn get_string_list(node: &Node, key: &str) -> Vec<String> {
    get_kind(node, key, NodeKind::List)
        .map(|list| string_items(list))
        .unwrap_or_default()
}

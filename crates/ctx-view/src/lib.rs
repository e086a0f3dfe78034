//! Display-tree building over entry sets
//!
//! Front ends that show entries as a tree consume this instead of
//! walking names themselves: [`TreeBuilder`] implements the
//! [`EntryVisitor`] traversal contract and groups entries into
//! [`DisplayNode`]s, one per name, with children nested below their
//! prefix. Read-only throughout.

use ctx_entries::{Entry, EntryName, EntrySet, EntryVisitor};
use serde::Serialize;

/// One node of the display tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayNode {
    /// Base name (final segment).
    pub name: String,
    /// Full entry name, e.g. `user/act/active`.
    pub path: String,
    /// The entry's value, if the node corresponds to a valued entry.
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DisplayNode>,
}

impl DisplayNode {
    fn for_name(name: &EntryName) -> Self {
        Self {
            name: name.base_name().to_string(),
            path: name.to_string(),
            value: None,
            children: Vec::new(),
        }
    }
}

/// Visitor that assembles [`DisplayNode`] trees from an entry walk.
///
/// A prefix that is itself a valued entry keeps its value: the node
/// created by `visit` is reopened when the traversal enters the
/// subtree below it.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    roots: Vec<DisplayNode>,
    stack: Vec<DisplayNode>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The assembled root nodes, consuming the builder.
    pub fn finish(mut self) -> Vec<DisplayNode> {
        // accept() balances enter/leave, so the stack is normally empty
        while let Some(node) = self.stack.pop() {
            self.current_children().push(node);
        }
        self.roots
    }

    fn current_children(&mut self) -> &mut Vec<DisplayNode> {
        match self.stack.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.roots,
        }
    }
}

impl EntryVisitor for TreeBuilder {
    fn enter_subtree(&mut self, name: &EntryName) {
        let path = name.to_string();
        let siblings = self.current_children();
        let node = if siblings.last().is_some_and(|n| n.path == path) {
            // the prefix was visited as an entry just before
            siblings.pop().unwrap_or_else(|| DisplayNode::for_name(name))
        } else {
            DisplayNode::for_name(name)
        };
        self.stack.push(node);
    }

    fn visit(&mut self, entry: &Entry) {
        let mut node = DisplayNode::for_name(entry.name());
        node.value = entry.value().map(str::to_string);
        self.current_children().push(node);
    }

    fn leave_subtree(&mut self, _name: &EntryName) {
        if let Some(node) = self.stack.pop() {
            self.current_children().push(node);
        }
    }
}

/// Build the display tree for a whole entry set.
pub fn build_tree(entries: &EntrySet) -> Vec<DisplayNode> {
    let mut builder = TreeBuilder::new();
    entries.accept(&mut builder);
    builder.finish()
}

/// Render nodes as indented plain text, one node per line.
pub fn render(nodes: &[DisplayNode]) -> String {
    fn walk(nodes: &[DisplayNode], depth: usize, out: &mut String) {
        for node in nodes {
            out.push_str(&"  ".repeat(depth));
            match &node.value {
                Some(value) => out.push_str(&format!("{} = {}\n", node.name, value)),
                None => out.push_str(&format!("{}\n", node.name)),
            }
            walk(&node.children, depth + 1, out);
        }
    }
    let mut out = String::new();
    walk(nodes, 0, &mut out);
    out
}

/// Serialize nodes as pretty JSON for external front ends.
pub fn to_json(nodes: &[DisplayNode]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(nodes)
}

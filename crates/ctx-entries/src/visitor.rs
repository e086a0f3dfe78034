//! Visitor-style traversal over an entry set
//!
//! Consumers that render entries as a tree (editors, GUIs) walk the set
//! through [`EntryVisitor`] instead of reimplementing subtree grouping.

use crate::entry::Entry;
use crate::entryset::EntrySet;
use crate::name::EntryName;

/// Read-only visitor over the entries of a set, in name order.
///
/// `enter_subtree`/`leave_subtree` bracket every name prefix that has
/// entries below it, whether or not the prefix itself is an entry.
pub trait EntryVisitor {
    /// Called before the first entry below `name` is visited.
    fn enter_subtree(&mut self, name: &EntryName) {
        let _ = name;
    }

    /// Called for every entry.
    fn visit(&mut self, entry: &Entry);

    /// Called after the last entry below `name` has been visited.
    fn leave_subtree(&mut self, name: &EntryName) {
        let _ = name;
    }
}

impl EntrySet {
    /// Walk all entries in name order, announcing subtree boundaries.
    pub fn accept(&self, visitor: &mut dyn EntryVisitor) {
        let mut stack: Vec<EntryName> = Vec::new();

        for entry in self.iter() {
            let name = entry.name();

            while let Some(top) = stack.last() {
                if name.starts_with(top) {
                    break;
                }
                visitor.leave_subtree(top);
                stack.pop();
            }

            let from = stack.last().map_or(1, |top| top.segments().len() + 1);
            for len in from..name.segments().len() {
                let ancestor = match name.namespace() {
                    Some(ns) => EntryName::in_namespace(ns, name.segments()[..len].to_vec()),
                    None => EntryName::cascading(name.segments()[..len].to_vec()),
                };
                visitor.enter_subtree(&ancestor);
                stack.push(ancestor);
            }

            visitor.visit(entry);
        }

        while let Some(top) = stack.pop() {
            visitor.leave_subtree(&top);
        }
    }
}

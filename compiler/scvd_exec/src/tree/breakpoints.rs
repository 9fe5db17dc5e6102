//! Splicing out-of-band breakpoints into a built tree.

use tracing::{debug, warn};

use super::{NodeId, StatementTree};
use crate::declaration::{DeclKind, Declaration};
use crate::statement::Statement;

impl StatementTree {
    /// Attach each `break` declaration to the deepest node whose line span
    /// contains its line. Lines outside the root's span attach to the root.
    /// A breakpoint already present at the same line is skipped.
    pub fn insert_breakpoints(&mut self, breakpoints: &[Declaration]) {
        let Some(root) = self.root else {
            return;
        };
        for decl in breakpoints {
            if decl.kind != DeclKind::Break {
                warn!(line = decl.line, kind = decl.kind.tag(), "not a breakpoint, ignored");
                continue;
            }
            let target = self.deepest_containing(root, decl.line);
            let duplicate = self.children(target).iter().any(|&child| {
                let node = self.get(child);
                node.statement.is_break() && node.line == decl.line
            });
            if duplicate {
                continue;
            }
            let Some(statement) = Statement::from_declaration(decl) else {
                continue;
            };
            let id = self.push(statement, decl, Some(target));
            self.nodes[target.index()].children.push(id);
            self.sort_children(target);
            debug!(line = decl.line, parent_line = self.get(target).line, "breakpoint inserted");
        }
    }

    fn deepest_containing(&self, root: NodeId, line: u32) -> NodeId {
        let mut current = root;
        loop {
            // Breakpoints are leaves; a new one at the same line is their sibling.
            let next = self.children(current).iter().copied().find(|&child| {
                let (first, last) = self.line_span(child);
                !self.get(child).statement.is_break() && (first..=last).contains(&line)
            });
            match next {
                Some(child) => current = child,
                None => return current,
            }
        }
    }
}

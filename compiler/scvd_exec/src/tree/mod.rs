//! The statement tree.
//!
//! Nodes live in a flat arena and refer to each other by [`NodeId`]; each node
//! keeps a back-link to its parent. Every level is ordered by source line, so
//! textual position, not declaration order, decides execution order.

mod breakpoints;

use std::fmt;

use scvd_stack::ensure_sufficient_stack;
use tracing::debug;

use crate::compiled::CompiledExpr;
use crate::declaration::Declaration;
use crate::statement::Statement;

#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct StatementNode {
    pub statement: Statement,
    pub line: u32,
    /// `cond` attribute; absent means always.
    pub cond: Option<CompiledExpr>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl StatementNode {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

#[derive(Clone, Debug, Default)]
pub struct StatementTree {
    nodes: Vec<StatementNode>,
    root: Option<NodeId>,
}

impl StatementTree {
    /// Build from a declaration. An unrecognised root gives an empty tree.
    pub fn build(root: &Declaration) -> Self {
        let mut tree = StatementTree::default();
        tree.root = tree.convert(root, None);
        tree.sort_all();
        debug!(nodes = tree.nodes.len(), "statement tree built");
        tree
    }

    fn convert(&mut self, decl: &Declaration, parent: Option<NodeId>) -> Option<NodeId> {
        ensure_sufficient_stack(|| {
            let statement = Statement::from_declaration(decl)?;
            let id = self.push(statement, decl, parent);
            for child in &decl.children {
                if let Some(child_id) = self.convert(child, Some(id)) {
                    self.nodes[id.index()].children.push(child_id);
                }
            }
            Some(id)
        })
    }

    fn push(&mut self, statement: Statement, decl: &Declaration, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(StatementNode {
            statement,
            line: decl.line,
            cond: decl.attr("cond").map(CompiledExpr::new),
            parent,
            children: Vec::new(),
        });
        id
    }

    /// Stable sort of every child list by line.
    fn sort_all(&mut self) {
        for index in 0..self.nodes.len() {
            self.sort_children(NodeId(index as u32));
        }
    }

    fn sort_children(&mut self, id: NodeId) {
        let mut children = std::mem::take(&mut self.nodes[id.index()].children);
        children.sort_by_key(|child| self.nodes[child.index()].line);
        self.nodes[id.index()].children = children;
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> &StatementNode {
        &self.nodes[id.index()]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.index()].children
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node's own line through the largest line in its subtree.
    pub fn line_span(&self, id: NodeId) -> (u32, u32) {
        let first = self.get(id).line;
        let mut last = first;
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            let node = self.get(next);
            last = last.max(node.line);
            stack.extend_from_slice(&node.children);
        }
        (first, last)
    }

    /// Nodes in execution order.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev());
        }
        order
    }
}

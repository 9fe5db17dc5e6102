//! Output of an execution pass.

/// One row of the rendered view.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PresentationNode {
    pub name: String,
    pub value: Option<String>,
    /// False when the statement's condition did not hold.
    pub visible: bool,
    pub line: u32,
    pub children: Vec<PresentationNode>,
}

impl PresentationNode {
    /// Depth-first search by name.
    pub fn find(&self, name: &str) -> Option<&PresentationNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Everything one pass produced.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExecReport {
    pub presentation: Vec<PresentationNode>,
    /// Lines of `break` statements reached, in execution order.
    pub breaks_hit: Vec<u32>,
    /// Lines of lists disabled by a configuration error.
    pub disabled_lists: Vec<u32>,
}

//! Declarative input: what the view description says, before compilation.

use rustc_hash::FxHashMap;

/// Statement kind as named in the description.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Object,
    Var,
    Calc,
    Read,
    ReadList,
    List,
    ListOut,
    Out,
    Item,
    Print,
    Break,
    /// Anything else. Produces no statement and its subtree is dropped.
    Other(String),
}

impl DeclKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "object" => Self::Object,
            "var" => Self::Var,
            "calc" => Self::Calc,
            "read" => Self::Read,
            "readlist" => Self::ReadList,
            "list" => Self::List,
            "listout" => Self::ListOut,
            "out" => Self::Out,
            "item" => Self::Item,
            "print" => Self::Print,
            "break" => Self::Break,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Object => "object",
            Self::Var => "var",
            Self::Calc => "calc",
            Self::Read => "read",
            Self::ReadList => "readlist",
            Self::List => "list",
            Self::ListOut => "listout",
            Self::Out => "out",
            Self::Item => "item",
            Self::Print => "print",
            Self::Break => "break",
            Self::Other(tag) => tag,
        }
    }
}

/// One element of the description with its attributes and body text.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Declaration {
    pub kind: DeclKind,
    /// Source line, 1-based.
    pub line: u32,
    pub attrs: FxHashMap<String, String>,
    /// Element body, used by `calc`.
    pub text: String,
    pub children: Vec<Declaration>,
}

impl Declaration {
    pub fn new(kind: DeclKind, line: u32) -> Self {
        Declaration {
            kind,
            line,
            attrs: FxHashMap::default(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Declaration) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// `"1"` and `"true"` are set; anything else, or absence, is not.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.attr(name).map(str::trim), Some("1" | "true"))
    }
}

//! Flat expression AST.
//!
//! Nodes live in an [`ExprArena`] and refer to their children by [`ExprId`].
//! The parser allocates children before parents, so a node's id is always
//! greater than the ids of its operands. Printf inner expressions share the
//! arena of the surrounding format text.

mod operators;

use std::fmt;

use smallvec::SmallVec;

pub use operators::{AssignOp, BinaryOp, UnaryOp, UpdateOp};

use crate::{FormatSpec, Intrinsic, Scalar, Span};

/// Index into an [`ExprArena`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn new(index: u32) -> Self {
        ExprId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// Argument list; most calls take at most four arguments.
pub type ExprList = SmallVec<[ExprId; 4]>;

/// Literal number as written.
#[derive(Copy, Clone, PartialEq, Debug)]
pub enum NumericLit {
    Float(f64),
    /// Integer too large to be exact in an `f64`.
    Int(i64),
}

impl NumericLit {
    pub fn to_scalar(self) -> Scalar {
        match self {
            NumericLit::Float(v) => Scalar::Number(v),
            NumericLit::Int(v) => Scalar::Int(v),
        }
    }
}

/// One piece of a printf-style format text.
#[derive(Clone, PartialEq, Debug)]
pub enum PrintfSegment {
    /// Literal text, emitted verbatim. `%%` is already reduced to `%`.
    Text(String),
    /// `%spec[expr]`.
    Format { spec: FormatSpec, expr: ExprId },
}

/// Expression node kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Number(NumericLit),
    /// String literal with escapes already applied.
    Str(String),
    /// Plain identifier, or a joined colon path inside intrinsic arguments.
    Ident(String),
    /// `base.name`
    Member { base: ExprId, name: String },
    /// `base[index]`
    Index { base: ExprId, index: ExprId },
    Unary { op: UnaryOp, operand: ExprId },
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    /// `cond ? then_branch : else_branch`
    Conditional {
        cond: ExprId,
        then_branch: ExprId,
        else_branch: ExprId,
    },
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    /// `++x`, `x--`, ...
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },
    /// Call to something that is not an intrinsic.
    Call { callee: ExprId, args: ExprList },
    Intrinsic { intrinsic: Intrinsic, args: ExprList },
    Printf(Vec<PrintfSegment>),
    /// Placeholder produced by error recovery.
    Error,
}

impl ExprKind {
    /// Identifier, member access and index expressions can be written to.
    pub fn is_lvalue(&self) -> bool {
        matches!(
            self,
            ExprKind::Ident(_) | ExprKind::Member { .. } | ExprKind::Index { .. }
        )
    }
}

/// An expression node with its span and folded constant.
#[derive(Clone, PartialEq, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    /// Set by constant folding.
    pub constant: Option<Scalar>,
    /// The constant was derived through an assignment, so evaluation must
    /// still walk the node to perform it.
    pub effectful: bool,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr {
            kind,
            span,
            constant: None,
            effectful: false,
        }
    }
}

/// Owning storage for the nodes of one parsed text.
#[derive(Clone, Default, PartialEq, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node and return its id.
    pub fn alloc(&mut self, expr: Expr) -> ExprId {
        let index = u32::try_from(self.exprs.len()).unwrap_or(u32::MAX);
        self.exprs.push(expr);
        ExprId::new(index)
    }

    #[inline]
    pub fn get(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: ExprId) -> &mut Expr {
        &mut self.exprs[id.index()]
    }

    #[inline]
    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.get(id).kind
    }

    #[inline]
    pub fn span(&self, id: ExprId) -> Span {
        self.get(id).span
    }

    #[inline]
    pub fn constant(&self, id: ExprId) -> Option<&Scalar> {
        self.get(id).constant.as_ref()
    }

    /// The folded constant, if evaluating the node can be skipped in its favor.
    #[inline]
    pub fn pure_constant(&self, id: ExprId) -> Option<&Scalar> {
        let expr = self.get(id);
        if expr.effectful {
            None
        } else {
            expr.constant.as_ref()
        }
    }

    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ExprId, &Expr)> {
        self.exprs
            .iter()
            .enumerate()
            .map(|(i, e)| (ExprId::new(i as u32), e))
    }
}

//! Executable statements, one per declaration kind.

use scvd_ir::ScalarType;
use tracing::warn;

use crate::compiled::{split_expressions, CompiledExpr};
use crate::declaration::{DeclKind, Declaration};
use crate::memory::Endian;

#[derive(Clone, Debug)]
pub enum Statement {
    Object(OutStmt),
    Out(OutStmt),
    ListOut(OutStmt),
    Var(VarStmt),
    Calc(CalcStmt),
    Read(ReadStmt),
    ReadList(ReadListStmt),
    List(ListStmt),
    Item(ItemStmt),
    Print(ItemStmt),
    Break(BreakStmt),
}

/// `object`, `out` and `listout`: a presentation group.
#[derive(Clone, Debug)]
pub struct OutStmt {
    pub name: Option<String>,
    pub value: Option<CompiledExpr>,
}

#[derive(Clone, Debug)]
pub struct VarStmt {
    pub name: String,
    /// Defaults to 0.
    pub value: Option<CompiledExpr>,
    pub ty: Option<ScalarType>,
    pub size: Option<CompiledExpr>,
}

#[derive(Clone, Debug)]
pub struct CalcStmt {
    pub exprs: Vec<CompiledExpr>,
}

#[derive(Clone, Debug)]
pub struct ReadStmt {
    pub name: String,
    pub ty: ScalarType,
    pub symbol: Option<String>,
    pub offset: Option<CompiledExpr>,
    /// Element count.
    pub size: Option<CompiledExpr>,
    pub endian: Endian,
    pub based: bool,
    pub is_const: bool,
}

#[derive(Clone, Debug)]
pub struct ReadListStmt {
    pub name: String,
    pub ty: ScalarType,
    pub symbol: Option<String>,
    pub offset: Option<CompiledExpr>,
    pub count: Option<CompiledExpr>,
    /// Byte offset of the next-pointer within each element.
    pub next: Option<CompiledExpr>,
    pub endian: Endian,
    pub based: bool,
    pub is_const: bool,
}

#[derive(Clone, Debug)]
pub struct ListStmt {
    /// Loop variable.
    pub name: Option<String>,
    pub start: Option<CompiledExpr>,
    pub limit: Option<CompiledExpr>,
    pub while_cond: Option<CompiledExpr>,
}

impl ListStmt {
    /// `limit` and `while` are mutually exclusive.
    pub fn verify(&self) -> bool {
        !(self.limit.is_some() && self.while_cond.is_some())
    }
}

/// `item` and `print`.
#[derive(Clone, Debug)]
pub struct ItemStmt {
    /// Printf text for the label.
    pub property: Option<CompiledExpr>,
    /// Printf text for the value.
    pub value: Option<CompiledExpr>,
}

#[derive(Clone, Debug)]
pub struct BreakStmt {
    pub label: Option<String>,
}

impl Statement {
    /// Compile a declaration. `None` for unrecognised kinds.
    pub fn from_declaration(decl: &Declaration) -> Option<Self> {
        let expr = |name: &str| decl.attr(name).map(CompiledExpr::new);
        let name = || decl.attr("name").map(str::to_owned);

        Some(match &decl.kind {
            DeclKind::Object => Statement::Object(out_stmt(decl)),
            DeclKind::Out => Statement::Out(out_stmt(decl)),
            DeclKind::ListOut => Statement::ListOut(out_stmt(decl)),
            DeclKind::Var => Statement::Var(VarStmt {
                name: name().unwrap_or_default(),
                value: expr("value"),
                ty: decl.attr("type").and_then(|t| scalar_type(decl, t)),
                size: expr("size"),
            }),
            DeclKind::Calc => Statement::Calc(CalcStmt {
                exprs: split_expressions(&decl.text)
                    .into_iter()
                    .map(CompiledExpr::new)
                    .collect(),
            }),
            DeclKind::Read => Statement::Read(ReadStmt {
                name: name().unwrap_or_default(),
                ty: read_type(decl),
                symbol: decl.attr("symbol").map(str::to_owned),
                offset: expr("offset"),
                size: expr("size"),
                endian: Endian::from_attr(decl.attr("endian")),
                based: decl.flag("based"),
                is_const: decl.flag("const"),
            }),
            DeclKind::ReadList => Statement::ReadList(ReadListStmt {
                name: name().unwrap_or_default(),
                ty: read_type(decl),
                symbol: decl.attr("symbol").map(str::to_owned),
                offset: expr("offset"),
                count: expr("count"),
                next: expr("next"),
                endian: Endian::from_attr(decl.attr("endian")),
                based: decl.flag("based"),
                is_const: decl.flag("const"),
            }),
            DeclKind::List => Statement::List(ListStmt {
                name: name(),
                start: expr("start"),
                limit: expr("limit"),
                while_cond: expr("while"),
            }),
            DeclKind::Item => Statement::Item(item_stmt(decl)),
            DeclKind::Print => Statement::Print(item_stmt(decl)),
            DeclKind::Break => Statement::Break(BreakStmt {
                label: decl.attr("label").map(str::to_owned),
            }),
            DeclKind::Other(_) => return None,
        })
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Statement::Object(_) => "object",
            Statement::Out(_) => "out",
            Statement::ListOut(_) => "listout",
            Statement::Var(_) => "var",
            Statement::Calc(_) => "calc",
            Statement::Read(_) => "read",
            Statement::ReadList(_) => "readlist",
            Statement::List(_) => "list",
            Statement::Item(_) => "item",
            Statement::Print(_) => "print",
            Statement::Break(_) => "break",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, Statement::Break(_))
    }
}

fn out_stmt(decl: &Declaration) -> OutStmt {
    OutStmt {
        name: decl.attr("name").map(str::to_owned),
        value: decl.attr("value").map(CompiledExpr::new),
    }
}

fn item_stmt(decl: &Declaration) -> ItemStmt {
    ItemStmt {
        property: decl.attr("property").map(CompiledExpr::new),
        value: decl.attr("value").map(CompiledExpr::new),
    }
}

fn scalar_type(decl: &Declaration, name: &str) -> Option<ScalarType> {
    let ty = ScalarType::from_name(name);
    if ty.is_none() {
        warn!(line = decl.line, type_name = name, "unknown scalar type");
    }
    ty
}

/// Reads default to 32-bit words.
fn read_type(decl: &Declaration) -> ScalarType {
    decl.attr("type")
        .and_then(|t| scalar_type(decl, t))
        .unwrap_or(ScalarType::U32)
}

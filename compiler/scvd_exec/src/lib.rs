//! SCVD Exec - statement tree and interpreter for view descriptions.
//!
//! A parsed description arrives as a tree of [`Declaration`]s. It is compiled
//! once into a [`StatementTree`] whose expression attributes are parsed lazily,
//! then executed by an [`Interpreter`] once per debug stop against a
//! [`TargetHost`] wrapping the caller's [`MemoryHost`].
//!
//! # Module Structure
//!
//! - `declaration.rs`: Declarative input
//! - `statement.rs`: Per-kind statement payloads
//! - `compiled.rs`: Lazily parsed expression attributes
//! - `tree/`: Tree construction and breakpoint insertion
//! - `interpreter/`: The execution pass, `read` and `readlist`
//! - `memory.rs`: Target memory access and scalar decoding
//! - `target.rs`: Evaluation host over symbols, memory and registers

mod cancel;
mod compiled;
mod config;
mod declaration;
mod error;
mod interpreter;
mod memory;
mod presentation;
mod statement;
mod target;
mod tree;

pub use cancel::CancelToken;
pub use compiled::{split_expressions, CompiledExpr};
pub use config::ExecConfig;
pub use declaration::{DeclKind, Declaration};
pub use error::ExecError;
pub use interpreter::Interpreter;
pub use memory::{bytes_to_u64, decode_elements, decode_scalar, Endian, MemoryHost};
pub use presentation::{ExecReport, PresentationNode};
pub use statement::{
    BreakStmt, CalcStmt, ItemStmt, ListStmt, OutStmt, ReadListStmt, ReadStmt, Statement, VarStmt,
};
pub use target::{ExecContext, Formatter, TargetHost};
pub use tree::{NodeId, StatementNode, StatementTree};

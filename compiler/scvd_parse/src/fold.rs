//! Constant folding.
//!
//! The parser allocates children before parents, so one forward sweep over
//! the arena visits every node after its operands: folding is bottom-up
//! without recursion.
//!
//! Rules:
//! - literals are constant
//! - unary and binary operators fold when their operands do
//! - `&&` folds to 0 on a falsy constant left side, `||` to 1 on a truthy one
//! - constant division or modulo by zero is reported and left unfolded
//! - `=` carries its right-hand constant; it and every constant folded over
//!   it are marked effectful so the assignment still executes
//! - a conditional folds when its condition and the chosen branch do
//! - a printf with only text segments folds to the joined text
//! - identifiers, compound assignment, `++`/`--`, calls, intrinsics,
//!   member and index access never fold

use scvd_diagnostic::{Diagnostic, ErrorCode};
use scvd_ir::{ops, AssignOp, BinaryOp, ExprArena, ExprId, ExprKind, PrintfSegment, Scalar};

/// Fold every node of `arena` in place.
pub(crate) fn fold_constants(arena: &mut ExprArena, diagnostics: &mut Vec<Diagnostic>) {
    for index in 0..arena.len() {
        let id = ExprId::new(index as u32);
        let constant = fold_node(arena, id, diagnostics);
        let effectful = constant.is_some() && folds_over_assignment(arena, id);
        let expr = arena.get_mut(id);
        expr.constant = constant;
        expr.effectful = effectful;
    }
}

/// `=` itself, or an operator whose operands include an effectful constant.
fn folds_over_assignment(arena: &ExprArena, id: ExprId) -> bool {
    let effectful = |child: ExprId| arena.get(child).effectful;
    match arena.kind(id) {
        ExprKind::Assign {
            op: AssignOp::Assign,
            ..
        } => true,
        ExprKind::Unary { operand, .. } => effectful(*operand),
        ExprKind::Binary { left, right, .. } => effectful(*left) || effectful(*right),
        ExprKind::Conditional {
            cond,
            then_branch,
            else_branch,
        } => effectful(*cond) || effectful(*then_branch) || effectful(*else_branch),
        _ => false,
    }
}

fn fold_node(
    arena: &ExprArena,
    id: ExprId,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Scalar> {
    let constant = |child: ExprId| arena.constant(child);

    match arena.kind(id) {
        ExprKind::Number(lit) => Some(lit.to_scalar()),
        ExprKind::Str(s) => Some(Scalar::Str(s.clone())),
        ExprKind::Unary { op, operand } => constant(*operand).map(|v| ops::unary(*op, v)),
        ExprKind::Binary { op, left, right } => {
            fold_binary(arena, id, *op, constant(*left), constant(*right), diagnostics)
        }
        ExprKind::Conditional {
            cond,
            then_branch,
            else_branch,
        } => {
            let chosen = if constant(*cond)?.is_truthy() {
                *then_branch
            } else {
                *else_branch
            };
            constant(chosen).cloned()
        }
        ExprKind::Assign {
            op: AssignOp::Assign,
            value,
            ..
        } => constant(*value).cloned(),
        ExprKind::Printf(segments) => {
            let mut text = String::new();
            for segment in segments {
                match segment {
                    PrintfSegment::Text(t) => text.push_str(t),
                    PrintfSegment::Format { .. } => return None,
                }
            }
            Some(Scalar::Str(text))
        }
        ExprKind::Ident(_)
        | ExprKind::Member { .. }
        | ExprKind::Index { .. }
        | ExprKind::Assign { .. }
        | ExprKind::Update { .. }
        | ExprKind::Call { .. }
        | ExprKind::Intrinsic { .. }
        | ExprKind::Error => None,
    }
}

fn fold_binary(
    arena: &ExprArena,
    id: ExprId,
    op: BinaryOp,
    left: Option<&Scalar>,
    right: Option<&Scalar>,
    diagnostics: &mut Vec<Diagnostic>,
) -> Option<Scalar> {
    match op {
        BinaryOp::And => {
            let left = left?;
            if !left.is_truthy() {
                return Some(Scalar::FALSE);
            }
            right.map(|r| Scalar::from_bool(r.is_truthy()))
        }
        BinaryOp::Or => {
            let left = left?;
            if left.is_truthy() {
                return Some(Scalar::TRUE);
            }
            right.map(|r| Scalar::from_bool(r.is_truthy()))
        }
        _ => match ops::binary(op, left?, right?) {
            Ok(value) => Some(value),
            Err(err) => {
                let span = arena.span(id);
                diagnostics.push(
                    Diagnostic::error(ErrorCode::E2001)
                        .with_message(format!("constant {err}"))
                        .with_label(span, format!("`{}` by a constant zero", op.as_symbol())),
                );
                None
            }
        },
    }
}

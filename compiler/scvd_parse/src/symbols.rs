//! External symbol collection.

use rustc_hash::FxHashSet;
use scvd_ir::{ExprArena, ExprId, ExprKind, PrintfSegment};

/// Free identifiers reachable from `root`, unique and sorted.
///
/// Skipped: the callee of a generic call, and the name arguments of
/// intrinsics that take names (these are names, not values, and include the
/// joined colon paths).
pub(crate) fn external_symbols(arena: &ExprArena, root: ExprId) -> Vec<String> {
    let mut found = FxHashSet::default();
    let mut stack = vec![root];

    while let Some(id) = stack.pop() {
        match arena.kind(id) {
            ExprKind::Ident(name) => {
                found.insert(name.clone());
            }
            ExprKind::Number(_) | ExprKind::Str(_) | ExprKind::Error => {}
            ExprKind::Member { base, .. } => stack.push(*base),
            ExprKind::Index { base, index } => stack.extend([*base, *index]),
            ExprKind::Unary { operand, .. } => stack.push(*operand),
            ExprKind::Binary { left, right, .. } => stack.extend([*left, *right]),
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => stack.extend([*cond, *then_branch, *else_branch]),
            ExprKind::Assign { target, value, .. } => stack.extend([*target, *value]),
            ExprKind::Update { target, .. } => stack.push(*target),
            ExprKind::Call { args, .. } => stack.extend(args.iter().copied()),
            ExprKind::Intrinsic { intrinsic, args } => {
                for &arg in args {
                    let is_name = matches!(arena.kind(arg), ExprKind::Ident(_) | ExprKind::Str(_));
                    if !(intrinsic.takes_names() && is_name) {
                        stack.push(arg);
                    }
                }
            }
            ExprKind::Printf(segments) => {
                for segment in segments {
                    if let PrintfSegment::Format { expr, .. } = segment {
                        stack.push(*expr);
                    }
                }
            }
        }
    }

    let mut symbols: Vec<String> = found.into_iter().collect();
    symbols.sort_unstable();
    symbols
}

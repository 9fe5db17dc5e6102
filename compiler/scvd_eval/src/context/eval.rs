//! Node evaluation.

use scvd_ir::ops;
use scvd_ir::{
    AssignOp, BinaryOp, ExprArena, ExprId, ExprKind, Scalar, UnaryOp, UpdateOp,
};
use tracing::warn;

use super::EvalContext;
use crate::errors::{not_callable, unresolved_path, write_rejected, EvalError, EvalResult};
use crate::host::EvalHost;
use crate::{Key, Value};

/// `type:member` paths only appear as intrinsic arguments.
pub(crate) fn is_colon_path(name: &str) -> bool {
    name.contains(':')
}

impl<H: EvalHost> EvalContext<H> {
    pub(super) async fn eval_node(&mut self, arena: &ExprArena, id: ExprId) -> EvalResult {
        if let Some(constant) = arena.pure_constant(id) {
            return Ok(Value::from(constant.clone()));
        }
        let expr = arena.get(id);

        match &expr.kind {
            ExprKind::Number(lit) => Ok(Value::from(lit.to_scalar())),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Ident(name) => self.read_name(name),
            ExprKind::Member { base, name } => {
                let base = self.eval(arena, *base).await?;
                Ok(self.read_member(&base, &Key::Name(name.clone())))
            }
            ExprKind::Index { base, index } => {
                let base = self.eval(arena, *base).await?;
                let index = self.eval(arena, *index).await?;
                Ok(self.read_member(&base, &Key::from_value(&index)))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(arena, *operand).await?;
                Ok(Value::from(ops::unary(*op, &operand.to_scalar()?)))
            }
            ExprKind::Binary { op, left, right } => {
                self.eval_binary(arena, *op, *left, *right).await
            }
            ExprKind::Conditional {
                cond,
                then_branch,
                else_branch,
            } => {
                let branch = if self.eval(arena, *cond).await?.is_truthy() {
                    *then_branch
                } else {
                    *else_branch
                };
                self.eval(arena, branch).await
            }
            ExprKind::Assign { op, target, value } => {
                self.eval_assign(arena, *op, *target, *value).await
            }
            ExprKind::Update { op, prefix, target } => {
                self.eval_update(arena, *op, *prefix, *target).await
            }
            ExprKind::Call { callee, .. } => Err(not_callable(callee_name(arena, *callee))),
            ExprKind::Intrinsic { intrinsic, args } => {
                self.call_intrinsic(arena, *intrinsic, args).await
            }
            ExprKind::Printf(segments) => self.render_printf(arena, segments).await,
            ExprKind::Error => Err(EvalError::SyntaxError),
        }
    }

    /// Read a symbol, creating it with 0 if it does not exist.
    pub(crate) fn read_name(&mut self, name: &str) -> EvalResult {
        if is_colon_path(name) {
            return self
                .host
                .resolve_colon_path(name)
                .ok_or_else(|| unresolved_path(name));
        }
        if self.host.symbol_exists(self.container, name) {
            return Ok(self
                .host
                .read_symbol(self.container, name)
                .unwrap_or(Value::Undefined));
        }
        warn!(symbol = name, "unknown symbol, created with value 0");
        if !self.host.write_symbol(self.container, name, Value::ZERO) {
            return Err(write_rejected(name));
        }
        Ok(Value::ZERO)
    }

    fn read_member(&self, base: &Value, key: &Key) -> Value {
        base.as_container()
            .and_then(|c| self.host.read_key(c, key))
            .unwrap_or(Value::Undefined)
    }

    async fn eval_binary(
        &mut self,
        arena: &ExprArena,
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    ) -> EvalResult {
        let left = self.eval(arena, left).await?;
        match op {
            BinaryOp::And if !left.is_truthy() => return Ok(Value::from_bool(false)),
            BinaryOp::Or if left.is_truthy() => return Ok(Value::from_bool(true)),
            BinaryOp::And | BinaryOp::Or => {
                let right = self.eval(arena, right).await?;
                return Ok(Value::from_bool(right.is_truthy()));
            }
            _ => {}
        }
        let right = self.eval(arena, right).await?;
        match (op, &left, &right) {
            (BinaryOp::Eq, Value::Container(a), Value::Container(b)) => Ok(Value::from_bool(a == b)),
            (BinaryOp::NotEq, Value::Container(a), Value::Container(b)) => {
                Ok(Value::from_bool(a != b))
            }
            _ => Ok(Value::from(ops::binary(
                op,
                &left.to_scalar()?,
                &right.to_scalar()?,
            )?)),
        }
    }

    async fn eval_assign(
        &mut self,
        arena: &ExprArena,
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    ) -> EvalResult {
        let place = self.resolve_place(arena, target).await?;
        let result = match op {
            AssignOp::Assign => self.eval(arena, value).await?,
            AssignOp::Compound(op) => {
                let current = self.get_place(&place)?;
                let rhs = self.eval(arena, value).await?;
                Value::from(ops::binary(op, &current.to_scalar()?, &rhs.to_scalar()?)?)
            }
        };
        self.set_place(&place, result.clone())?;
        Ok(result)
    }

    async fn eval_update(
        &mut self,
        arena: &ExprArena,
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    ) -> EvalResult {
        let place = self.resolve_place(arena, target).await?;
        let old = ops::unary(UnaryOp::Plus, &self.get_place(&place)?.to_scalar()?);
        let new = ops::binary(op.step(), &old, &Scalar::Number(1.0))?;
        self.set_place(&place, Value::from(new.clone()))?;
        Ok(Value::from(if prefix { new } else { old }))
    }
}

fn callee_name(arena: &ExprArena, callee: ExprId) -> String {
    match arena.kind(callee) {
        ExprKind::Ident(name) => name.clone(),
        ExprKind::Member { name, .. } => name.clone(),
        _ => String::from("expression"),
    }
}

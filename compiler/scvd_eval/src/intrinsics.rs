//! `__` intrinsic calls.
//!
//! Dispatch: the host's generic dispatcher, then its per-name method, then
//! the built-in default below.

use scvd_ir::ops::scalar_from_u64;
use scvd_ir::{ExprArena, ExprId, ExprKind, Intrinsic, ScalarType};

use crate::context::{is_colon_path, EvalContext};
use crate::errors::{
    missing_intrinsic, register_unavailable, unknown_type, unresolved_path, wrong_arg_count,
    EvalError, EvalResult,
};
use crate::host::EvalHost;
use crate::Value;

impl<H: EvalHost> EvalContext<H> {
    pub(crate) async fn call_intrinsic(
        &mut self,
        arena: &ExprArena,
        intrinsic: Intrinsic,
        args: &[ExprId],
    ) -> EvalResult {
        let mut values = Vec::with_capacity(args.len());
        for &arg in args {
            let value = match arena.kind(arg) {
                ExprKind::Ident(name) | ExprKind::Str(name) if intrinsic.takes_names() => {
                    Value::Str(name.clone())
                }
                _ => self.eval(arena, arg).await?,
            };
            values.push(value);
        }

        if let Some(result) = self.host_mut().dispatch_intrinsic(intrinsic, &values).await {
            return result;
        }

        if intrinsic == Intrinsic::CalcMemUsed {
            if let Some(result) = self.host_mut().calc_mem_used(&values) {
                return result;
            }
            return self.builtin_calc_mem_used();
        }

        let name = match values.as_slice() {
            [single] => single.to_string(),
            _ => return Err(wrong_arg_count(intrinsic, 1, values.len())),
        };
        let host = self.host_mut();
        let overridden = match intrinsic {
            Intrinsic::FindSymbol => host.find_symbol(&name),
            Intrinsic::GetRegVal => host.get_reg_val(&name).await,
            Intrinsic::OffsetOf => host.offset_of(&name),
            Intrinsic::SizeOf => host.size_of(&name),
            Intrinsic::SymbolExists => host.check_symbol_exists(&name),
            Intrinsic::CalcMemUsed => None,
        };
        if let Some(result) = overridden {
            return result;
        }

        match intrinsic {
            Intrinsic::FindSymbol => self.read_name(&name),
            Intrinsic::GetRegVal => self.builtin_get_reg_val(&name).await,
            // No type layout information is available to compute offsets.
            Intrinsic::OffsetOf => Ok(Value::ZERO),
            Intrinsic::SizeOf => ScalarType::from_name(&name)
                .map(|ty| Value::Number(f64::from(ty.size())))
                .ok_or_else(|| unknown_type(&name)),
            Intrinsic::SymbolExists => self.check_and_create(&name).map(Value::from_bool),
            Intrinsic::CalcMemUsed => self.builtin_calc_mem_used(),
        }
    }

    /// Whether `name` existed before the check. Like a plain read, checking an
    /// unknown identifier creates it with value 0.
    fn check_and_create(&mut self, name: &str) -> Result<bool, EvalError> {
        if is_colon_path(name) {
            return Ok(self.host().resolve_colon_path(name).is_some());
        }
        let existed = self.host().symbol_exists(self.container(), name);
        if !existed {
            self.read_name(name)?;
        }
        Ok(existed)
    }

    fn builtin_calc_mem_used(&self) -> EvalResult {
        self.host()
            .stats()
            .map(|stats| Value::from(scalar_from_u64(stats.bytes_used)))
            .ok_or_else(|| {
                missing_intrinsic(Intrinsic::CalcMemUsed, "host provides no memory statistics")
            })
    }

    async fn builtin_get_reg_val(&mut self, name: &str) -> EvalResult {
        if !self.host().has_registers() {
            return Err(missing_intrinsic(
                Intrinsic::GetRegVal,
                "host has no register access",
            ));
        }
        if is_colon_path(name) {
            return Err(unresolved_path(name));
        }
        self.host_mut()
            .register_value(name)
            .await
            .ok_or_else(|| register_unavailable(name))
    }
}

#[cfg(test)]
mod tests;

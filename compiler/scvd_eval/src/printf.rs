//! Printf rendering.

use scvd_ir::ops::to_uint32;
use scvd_ir::{f64_to_i64, ExprArena, FormatSpec, PrintfSegment};
use tracing::warn;

use crate::context::EvalContext;
use crate::errors::EvalResult;
use crate::host::EvalHost;
use crate::Value;

impl<H: EvalHost> EvalContext<H> {
    /// Concatenate text segments and rendered format segments. One failing
    /// segment fails the whole text.
    pub(crate) async fn render_printf(
        &mut self,
        arena: &ExprArena,
        segments: &[PrintfSegment],
    ) -> EvalResult {
        let mut out = String::new();
        for segment in segments {
            match segment {
                PrintfSegment::Text(text) => out.push_str(text),
                PrintfSegment::Format { spec, expr } => {
                    let value = match self.eval(arena, *expr).await {
                        Ok(value) => value,
                        Err(err) => {
                            warn!(%spec, error = %err, "format segment could not be evaluated");
                            return Err(err);
                        }
                    };
                    match self.host().format_value(*spec, &value) {
                        Some(text) => out.push_str(&text),
                        None => out.push_str(&format_builtin(*spec, &value)),
                    }
                }
            }
        }
        Ok(Value::Str(out))
    }
}

/// Built-in rendering of `value` for `spec`.
///
/// `%d`, `%u` and `%x` render integers; values without an integer reading
/// (NaN, containers, undefined) fall back to the natural rendering, as do
/// `%t`, `%T` and the domain-specific specifiers.
pub fn format_builtin(spec: FormatSpec, value: &Value) -> String {
    match spec {
        FormatSpec::Decimal => match signed(value) {
            Some(v) => v.to_string(),
            None => value.to_string(),
        },
        FormatSpec::Unsigned => match unsigned(value) {
            Some(v) => v.to_string(),
            None => value.to_string(),
        },
        FormatSpec::Hex => match unsigned(value) {
            Some(v) => format!("{v:x}"),
            None => value.to_string(),
        },
        _ => value.to_string(),
    }
}

fn signed(value: &Value) -> Option<i64> {
    match value {
        Value::Int(v) => Some(*v),
        other => other.to_number().filter(|n| n.is_finite()).map(f64_to_i64),
    }
}

/// Negative numbers wrap to 32 bits like a C `int` passed to `%u`.
fn unsigned(value: &Value) -> Option<u64> {
    match value {
        Value::Int(v) => Some(*v as u64),
        other => {
            let n = other.to_number().filter(|n| n.is_finite())?;
            Some(if n < 0.0 {
                u64::from(to_uint32(n))
            } else {
                n as u64
            })
        }
    }
}

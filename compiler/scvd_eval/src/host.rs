//! The boundary between the evaluator and whatever owns the data.
//!
//! A host is split in three:
//! - [`DataHost`]: symbols and containers, always synchronous
//! - [`IntrinsicHost`]: optional overrides for the `__` intrinsics and the
//!   register reads behind `__GetRegVal`
//! - [`FormatHost`]: optional per-specifier printf rendering
//!
//! Every optional method has a default, so a plain symbol table only has to
//! implement [`DataHost`] and opt into the other two with empty impls.

use std::future::{self, Future};

use scvd_ir::{FormatSpec, Intrinsic};

use crate::{ContainerRef, EvalResult, Key, Value};

/// Numbers reported to `__CalcMemUsed`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct HostStats {
    pub bytes_used: u64,
    pub symbols: usize,
}

/// Symbol and container storage.
///
/// `scope` is the active container: its keys shadow globals of the same name.
pub trait DataHost {
    fn symbol_exists(&self, scope: Option<ContainerRef>, name: &str) -> bool;

    fn read_symbol(&self, scope: Option<ContainerRef>, name: &str) -> Option<Value>;

    /// Returns `false` if the host refuses the write.
    fn write_symbol(&mut self, scope: Option<ContainerRef>, name: &str, value: Value) -> bool;

    fn is_array(&self, container: ContainerRef) -> bool;

    fn new_object(&mut self) -> ContainerRef;

    fn new_array(&mut self) -> ContainerRef;

    fn read_key(&self, container: ContainerRef, key: &Key) -> Option<Value>;

    fn write_key(&mut self, container: ContainerRef, key: Key, value: Value) -> bool;

    /// Resolve a `type:member` path. Hosts without type information return
    /// `None`.
    fn resolve_colon_path(&self, _path: &str) -> Option<Value> {
        None
    }

    fn stats(&self) -> Option<HostStats> {
        None
    }
}

/// Intrinsic overrides.
///
/// Dispatch order is the generic [`dispatch_intrinsic`], then the method
/// named after the intrinsic, then the evaluator's built-in default. A method
/// returning `None` passes to the next step.
///
/// [`dispatch_intrinsic`]: IntrinsicHost::dispatch_intrinsic
pub trait IntrinsicHost {
    /// Name-taking intrinsics receive identifier and string arguments as
    /// [`Value::Str`] names.
    fn dispatch_intrinsic(
        &mut self,
        _intrinsic: Intrinsic,
        _args: &[Value],
    ) -> impl Future<Output = Option<EvalResult>> {
        future::ready(None)
    }

    fn calc_mem_used(&mut self, _args: &[Value]) -> Option<EvalResult> {
        None
    }

    fn find_symbol(&mut self, _name: &str) -> Option<EvalResult> {
        None
    }

    fn get_reg_val(&mut self, _name: &str) -> impl Future<Output = Option<EvalResult>> {
        future::ready(None)
    }

    fn offset_of(&mut self, _path: &str) -> Option<EvalResult> {
        None
    }

    fn size_of(&mut self, _type_name: &str) -> Option<EvalResult> {
        None
    }

    /// `__Symbol_exists`.
    fn check_symbol_exists(&mut self, _name: &str) -> Option<EvalResult> {
        None
    }

    /// Whether [`register_value`](IntrinsicHost::register_value) is backed by
    /// a target. Without it, `__GetRegVal` is a missing intrinsic.
    fn has_registers(&self) -> bool {
        false
    }

    /// Current value of a register, `None` if it cannot be read.
    fn register_value(&mut self, _name: &str) -> impl Future<Output = Option<Value>> {
        future::ready(None)
    }
}

/// Printf override.
pub trait FormatHost {
    /// Render `value` for `%spec`, or `None` for the built-in rendering.
    fn format_value(&self, _spec: FormatSpec, _value: &Value) -> Option<String> {
        None
    }
}

/// Everything the evaluator needs from its host.
pub trait EvalHost: DataHost + IntrinsicHost + FormatHost {}

impl<T: DataHost + IntrinsicHost + FormatHost> EvalHost for T {}

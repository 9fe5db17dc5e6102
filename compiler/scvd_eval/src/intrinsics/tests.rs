use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use scvd_ir::FormatSpec;
use scvd_parse::parse;

use crate::{
    read_cached_register, ContainerRef, DataHost, EvalContext, EvalResult, FormatHost, HostStats,
    IntrinsicHost, Key, MissingIntrinsic, RegisterCache, RegisterSource, SymbolTable, Value,
};
use scvd_ir::Intrinsic;

#[derive(Default)]
struct Registers {
    values: FxHashMap<String, u64>,
    fetches: usize,
}

impl RegisterSource for Registers {
    async fn fetch_register(&mut self, name: &str) -> Option<u64> {
        self.fetches += 1;
        self.values.get(name).copied()
    }
}

/// Symbol table plus registers, statistics and optional overrides.
#[derive(Default)]
struct Target {
    table: SymbolTable,
    registers: Registers,
    cache: RegisterCache,
    bytes_used: Option<u64>,
    override_size_of: bool,
    dispatch_size_of: bool,
}

impl DataHost for Target {
    fn symbol_exists(&self, scope: Option<ContainerRef>, name: &str) -> bool {
        self.table.symbol_exists(scope, name)
    }

    fn read_symbol(&self, scope: Option<ContainerRef>, name: &str) -> Option<Value> {
        self.table.read_symbol(scope, name)
    }

    fn write_symbol(&mut self, scope: Option<ContainerRef>, name: &str, value: Value) -> bool {
        self.table.write_symbol(scope, name, value)
    }

    fn is_array(&self, container: ContainerRef) -> bool {
        self.table.is_array(container)
    }

    fn new_object(&mut self) -> ContainerRef {
        self.table.new_object()
    }

    fn new_array(&mut self) -> ContainerRef {
        self.table.new_array()
    }

    fn read_key(&self, container: ContainerRef, key: &Key) -> Option<Value> {
        self.table.read_key(container, key)
    }

    fn write_key(&mut self, container: ContainerRef, key: Key, value: Value) -> bool {
        self.table.write_key(container, key, value)
    }

    fn resolve_colon_path(&self, path: &str) -> Option<Value> {
        (path == "TCB:state").then_some(Value::Number(8.0))
    }

    fn stats(&self) -> Option<HostStats> {
        self.bytes_used.map(|bytes_used| HostStats {
            bytes_used,
            symbols: 0,
        })
    }
}

impl IntrinsicHost for Target {
    async fn dispatch_intrinsic(
        &mut self,
        intrinsic: Intrinsic,
        _args: &[Value],
    ) -> Option<EvalResult> {
        (self.dispatch_size_of && intrinsic == Intrinsic::SizeOf).then_some(Ok(Value::Number(1.0)))
    }

    fn size_of(&mut self, type_name: &str) -> Option<EvalResult> {
        (self.override_size_of && type_name == "TCB").then_some(Ok(Value::Number(64.0)))
    }

    fn has_registers(&self) -> bool {
        true
    }

    async fn register_value(&mut self, name: &str) -> Option<Value> {
        read_cached_register(&mut self.cache, &mut self.registers, name).await
    }
}

impl FormatHost for Target {
    fn format_value(&self, spec: FormatSpec, value: &Value) -> Option<String> {
        (spec == FormatSpec::E).then(|| format!("<{value}>"))
    }
}

async fn eval<H: crate::EvalHost>(
    ctx: &mut EvalContext<H>,
    text: &str,
) -> Result<Option<Value>, MissingIntrinsic> {
    ctx.evaluate_parse_result(&parse(text), None).await
}

#[tokio::test(flavor = "current_thread")]
async fn test_size_of_builtin_table() {
    let mut ctx = EvalContext::new(SymbolTable::new());
    assert_eq!(eval(&mut ctx, "__size_of(uint8_t)").await, Ok(Some(Value::Number(1.0))));
    assert_eq!(eval(&mut ctx, "__size_of(\"int16_t\")").await, Ok(Some(Value::Number(2.0))));
    assert_eq!(eval(&mut ctx, "__size_of(uint32_t) * 2").await, Ok(Some(Value::Number(8.0))));
    assert_eq!(eval(&mut ctx, "__size_of(double)").await, Ok(Some(Value::Number(8.0))));
    assert_eq!(eval(&mut ctx, "__size_of(a, b)").await, Ok(None));
}

#[tokio::test(flavor = "current_thread")]
async fn test_dispatch_order() {
    let mut ctx = EvalContext::new(Target {
        override_size_of: true,
        ..Target::default()
    });
    assert_eq!(eval(&mut ctx, "__size_of(TCB)").await, Ok(Some(Value::Number(64.0))));
    assert_eq!(eval(&mut ctx, "__size_of(int)").await, Ok(Some(Value::Number(4.0))));

    ctx.host_mut().dispatch_size_of = true;
    assert_eq!(eval(&mut ctx, "__size_of(TCB)").await, Ok(Some(Value::Number(1.0))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_symbol_exists_creates_unknown_symbol() {
    let mut ctx = EvalContext::new(SymbolTable::new());
    assert_eq!(eval(&mut ctx, "__Symbol_exists(foo)").await, Ok(Some(Value::Number(0.0))));
    assert_eq!(ctx.host().get("foo"), Some(&Value::ZERO));
    assert_eq!(eval(&mut ctx, "__Symbol_exists(\"foo\")").await, Ok(Some(Value::Number(1.0))));

    ctx.host_mut().set("bar", 3.0);
    assert_eq!(eval(&mut ctx, "__Symbol_exists(bar)").await, Ok(Some(Value::Number(1.0))));
    assert_eq!(ctx.host().get("bar"), Some(&Value::Number(3.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_find_symbol_creates() {
    let mut ctx = EvalContext::new(SymbolTable::new());
    ctx.host_mut().set("known", 7.0);
    assert_eq!(eval(&mut ctx, "__FindSymbol(known)").await, Ok(Some(Value::Number(7.0))));
    assert_eq!(eval(&mut ctx, "__FindSymbol(fresh)").await, Ok(Some(Value::Number(0.0))));
    assert!(ctx.host().symbol_exists(None, "fresh"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_offset_of_is_zero() {
    let mut ctx = EvalContext::new(SymbolTable::new());
    assert_eq!(eval(&mut ctx, "__Offset_of(TCB:state)").await, Ok(Some(Value::Number(0.0))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_colon_path_resolution() {
    let mut ctx = EvalContext::new(Target::default());
    assert_eq!(eval(&mut ctx, "__Symbol_exists(TCB:state)").await, Ok(Some(Value::Number(1.0))));
    assert_eq!(eval(&mut ctx, "__Symbol_exists(TCB:prio)").await, Ok(Some(Value::Number(0.0))));
    assert_eq!(eval(&mut ctx, "__FindSymbol(TCB:state)").await, Ok(Some(Value::Number(8.0))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_capabilities_propagate() {
    let mut ctx = EvalContext::new(SymbolTable::new());
    let err = eval(&mut ctx, "__GetRegVal(R0) + 1").await;
    assert_eq!(
        err.map_err(|m| m.intrinsic),
        Err(Intrinsic::GetRegVal)
    );
    let err = eval(&mut ctx, "Used: %d[__CalcMemUsed(0, 0, 0, 0)]").await;
    assert_eq!(
        err.map_err(|m| m.intrinsic),
        Err(Intrinsic::CalcMemUsed)
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_calc_mem_used_from_stats() {
    let mut ctx = EvalContext::new(Target {
        bytes_used: Some(512),
        ..Target::default()
    });
    assert_eq!(
        eval(&mut ctx, "__CalcMemUsed(0, 0, 0, 0)").await,
        Ok(Some(Value::Number(512.0)))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_register_reads_are_cached() {
    let mut target = Target::default();
    target.registers.values.insert("R0".into(), 0x20);
    let mut ctx = EvalContext::new(target);

    assert_eq!(
        eval(&mut ctx, "__GetRegVal(R0) + __GetRegVal(\"R0\")").await,
        Ok(Some(Value::Number(64.0)))
    );
    assert_eq!(ctx.host().registers.fetches, 1);

    ctx.host_mut().cache.invalidate_all();
    ctx.host_mut().registers.values.insert("R0".into(), 1);
    assert_eq!(eval(&mut ctx, "__GetRegVal(R0)").await, Ok(Some(Value::Number(1.0))));
    assert_eq!(ctx.host().registers.fetches, 2);

    // Unknown registers are an ordinary failure, not a missing intrinsic.
    assert_eq!(eval(&mut ctx, "__GetRegVal(PSP)").await, Ok(None));
}

#[tokio::test(flavor = "current_thread")]
async fn test_format_override() {
    let mut ctx = EvalContext::new(Target::default());
    assert_eq!(
        eval(&mut ctx, "%E[3] %d[3]").await,
        Ok(Some(Value::from("<3> 3")))
    );
}

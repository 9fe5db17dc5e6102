//! The evaluation host used during execution.
//!
//! [`TargetHost`] combines the symbol table, the target's memory host and
//! the register cache. Register reads from `__GetRegVal` go through the cache
//! so each register is fetched at most once per stop.

use scvd_eval::{
    read_cached_register, ContainerRef, DataHost, EvalContext, FormatHost, HostStats,
    IntrinsicHost, Key, RegisterCache, RegisterSource, SymbolTable, Value,
};
use scvd_ir::FormatSpec;

use crate::memory::MemoryHost;

/// Custom printf rendering installed by the embedder.
pub type Formatter = Box<dyn Fn(FormatSpec, &Value) -> Option<String>>;

/// Evaluation context of one target.
pub type ExecContext<M> = EvalContext<TargetHost<M>>;

pub struct TargetHost<M> {
    symbols: SymbolTable,
    memory: M,
    registers: RegisterCache,
    formatter: Option<Formatter>,
}

impl<M: MemoryHost> TargetHost<M> {
    pub fn new(memory: M) -> Self {
        TargetHost {
            symbols: SymbolTable::new(),
            memory,
            registers: RegisterCache::new(),
            formatter: None,
        }
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: Formatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// Wrap in an evaluation context.
    pub fn into_context(self) -> ExecContext<M> {
        EvalContext::new(self)
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn registers(&self) -> &RegisterCache {
        &self.registers
    }

    pub fn registers_mut(&mut self) -> &mut RegisterCache {
        &mut self.registers
    }

    /// Write a register on the target and record the value in the cache.
    pub async fn write_register(&mut self, name: &str, value: u64) -> bool {
        if !self.memory.write_register(name, value).await {
            return false;
        }
        self.registers.write(
            name.to_owned(),
            Value::from(scvd_ir::ops::scalar_from_u64(value)),
        );
        true
    }
}

/// Register access through the memory host.
struct TargetRegisters<'a, M>(&'a mut M);

impl<M: MemoryHost> RegisterSource for TargetRegisters<'_, M> {
    async fn fetch_register(&mut self, name: &str) -> Option<u64> {
        self.0.read_register(name).await
    }
}

impl<M: MemoryHost> DataHost for TargetHost<M> {
    fn symbol_exists(&self, scope: Option<ContainerRef>, name: &str) -> bool {
        self.symbols.symbol_exists(scope, name)
    }

    fn read_symbol(&self, scope: Option<ContainerRef>, name: &str) -> Option<Value> {
        self.symbols.read_symbol(scope, name)
    }

    fn write_symbol(&mut self, scope: Option<ContainerRef>, name: &str, value: Value) -> bool {
        self.symbols.write_symbol(scope, name, value)
    }

    fn is_array(&self, container: ContainerRef) -> bool {
        self.symbols.is_array(container)
    }

    fn new_object(&mut self) -> ContainerRef {
        self.symbols.new_object()
    }

    fn new_array(&mut self) -> ContainerRef {
        self.symbols.new_array()
    }

    fn read_key(&self, container: ContainerRef, key: &Key) -> Option<Value> {
        self.symbols.read_key(container, key)
    }

    fn write_key(&mut self, container: ContainerRef, key: Key, value: Value) -> bool {
        self.symbols.write_key(container, key, value)
    }

    fn stats(&self) -> Option<HostStats> {
        self.memory.stats()
    }
}

impl<M: MemoryHost> IntrinsicHost for TargetHost<M> {
    fn has_registers(&self) -> bool {
        true
    }

    async fn register_value(&mut self, name: &str) -> Option<Value> {
        let mut source = TargetRegisters(&mut self.memory);
        read_cached_register(&mut self.registers, &mut source, name).await
    }
}

impl<M: MemoryHost> FormatHost for TargetHost<M> {
    fn format_value(&self, spec: FormatSpec, value: &Value) -> Option<String> {
        if let Some(formatter) = &self.formatter {
            if let Some(text) = formatter(spec, value) {
                return Some(text);
            }
        }
        // Containers render with their contents.
        value
            .as_container()
            .map(|_| self.symbols.describe(value))
    }
}

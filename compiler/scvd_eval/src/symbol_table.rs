//! In-memory data host.
//!
//! Globals live in one map; objects and arrays live in an arena addressed by
//! [`ContainerRef`]. Used as the symbol store of the statement interpreter
//! and directly by the CLI and tests.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use crate::host::{DataHost, FormatHost, IntrinsicHost};
use crate::{ContainerRef, Key, Value};

/// Largest index an array grows to on write.
pub const MAX_ARRAY_LEN: usize = 1 << 20;

/// Nesting depth at which [`SymbolTable::describe`] stops descending.
const DESCRIBE_DEPTH: usize = 8;

#[derive(Clone, Debug)]
enum Container {
    Object(FxHashMap<String, Value>),
    Array(Vec<Value>),
}

#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    globals: FxHashMap<String, Value>,
    containers: Vec<Container>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.globals.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.globals.remove(name)
    }

    /// Global names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.globals.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Elements of an array container.
    pub fn elements(&self, container: ContainerRef) -> Option<&[Value]> {
        match self.containers.get(container.index())? {
            Container::Array(items) => Some(items),
            Container::Object(_) => None,
        }
    }

    /// Create an array holding `items`.
    pub fn alloc_array(&mut self, items: Vec<Value>) -> ContainerRef {
        self.push(Container::Array(items))
    }

    /// Bind global `name` to an array of `items`. An array already bound to
    /// `name` is refilled in place, so repeated reads keep one container.
    pub fn set_array(&mut self, name: &str, items: Vec<Value>) -> ContainerRef {
        if let Some(Value::Container(bound)) = self.globals.get(name) {
            let bound = *bound;
            if let Some(Container::Array(existing)) = self.containers.get_mut(bound.index()) {
                *existing = items;
                return bound;
            }
        }
        let array = self.alloc_array(items);
        self.globals.insert(name.to_owned(), Value::Container(array));
        array
    }

    /// Drop every global and container.
    pub fn clear(&mut self) {
        self.globals.clear();
        self.containers.clear();
    }

    /// Render a value with container contents expanded, e.g. `[1, 2]` or
    /// `{a: 1}`. Object keys are sorted.
    pub fn describe(&self, value: &Value) -> String {
        let mut out = String::new();
        self.describe_into(value, 0, &mut out);
        out
    }

    fn describe_into(&self, value: &Value, depth: usize, out: &mut String) {
        let Some(container) = value
            .as_container()
            .and_then(|c| self.containers.get(c.index()))
        else {
            let _ = write!(out, "{value}");
            return;
        };
        if depth >= DESCRIBE_DEPTH {
            out.push_str("...");
            return;
        }
        match container {
            Container::Array(items) => {
                out.push('[');
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.describe_into(item, depth + 1, out);
                }
                out.push(']');
            }
            Container::Object(fields) => {
                let mut keys: Vec<&String> = fields.keys().collect();
                keys.sort_unstable();
                out.push('{');
                for (i, key) in keys.into_iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    let _ = write!(out, "{key}: ");
                    if let Some(field) = fields.get(key) {
                        self.describe_into(field, depth + 1, out);
                    }
                }
                out.push('}');
            }
        }
    }

    fn push(&mut self, container: Container) -> ContainerRef {
        let index = self.containers.len() as u32;
        self.containers.push(container);
        ContainerRef::new(index)
    }

    fn object(&self, scope: Option<ContainerRef>) -> Option<&FxHashMap<String, Value>> {
        match self.containers.get(scope?.index())? {
            Container::Object(fields) => Some(fields),
            Container::Array(_) => None,
        }
    }
}

impl DataHost for SymbolTable {
    fn symbol_exists(&self, scope: Option<ContainerRef>, name: &str) -> bool {
        self.object(scope).is_some_and(|o| o.contains_key(name)) || self.globals.contains_key(name)
    }

    fn read_symbol(&self, scope: Option<ContainerRef>, name: &str) -> Option<Value> {
        self.object(scope)
            .and_then(|o| o.get(name))
            .or_else(|| self.globals.get(name))
            .cloned()
    }

    fn write_symbol(&mut self, scope: Option<ContainerRef>, name: &str, value: Value) -> bool {
        if let Some(Container::Object(fields)) =
            scope.and_then(|c| self.containers.get_mut(c.index()))
        {
            if let Some(slot) = fields.get_mut(name) {
                *slot = value;
                return true;
            }
        }
        self.globals.insert(name.to_owned(), value);
        true
    }

    fn is_array(&self, container: ContainerRef) -> bool {
        matches!(
            self.containers.get(container.index()),
            Some(Container::Array(_))
        )
    }

    fn new_object(&mut self) -> ContainerRef {
        self.push(Container::Object(FxHashMap::default()))
    }

    fn new_array(&mut self) -> ContainerRef {
        self.push(Container::Array(Vec::new()))
    }

    fn read_key(&self, container: ContainerRef, key: &Key) -> Option<Value> {
        match (self.containers.get(container.index())?, key) {
            (Container::Object(fields), Key::Name(name)) => fields.get(name).cloned(),
            (Container::Object(fields), Key::Index(i)) => fields.get(&i.to_string()).cloned(),
            (Container::Array(items), Key::Index(i)) => {
                usize::try_from(*i).ok().and_then(|i| items.get(i)).cloned()
            }
            (Container::Array(items), Key::Name(name)) if name == "length" => {
                Some(Value::Number(items.len() as f64))
            }
            (Container::Array(_), Key::Name(_)) => None,
        }
    }

    fn write_key(&mut self, container: ContainerRef, key: Key, value: Value) -> bool {
        let Some(target) = self.containers.get_mut(container.index()) else {
            return false;
        };
        match (target, key) {
            (Container::Object(fields), key) => {
                fields.insert(key.to_string(), value);
                true
            }
            (Container::Array(items), Key::Index(i)) => {
                let Ok(i) = usize::try_from(i) else {
                    return false;
                };
                if i >= MAX_ARRAY_LEN {
                    return false;
                }
                if i >= items.len() {
                    items.resize(i + 1, Value::Undefined);
                }
                items[i] = value;
                true
            }
            (Container::Array(_), Key::Name(_)) => false,
        }
    }
}

impl IntrinsicHost for SymbolTable {}

impl FormatHost for SymbolTable {}

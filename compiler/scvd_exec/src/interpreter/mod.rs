//! Tree-walking statement interpreter.
//!
//! One pass per debug stop: clear the memory host's variables, invalidate
//! cached registers, then walk the tree top-down. Per node:
//!
//! 1. evaluate `cond`; a false or unevaluable condition skips the node and
//!    its children
//! 2. perform the node's effect
//! 3. run children in line order, collecting presentation entries
//!
//! Only a missing intrinsic or cancellation aborts a pass.

mod read;

use std::future::Future;
use std::pin::Pin;

use rustc_hash::{FxHashMap, FxHashSet};
use scvd_eval::Value;
use scvd_parse::is_format_text;
use tracing::{debug, error, info, trace, warn};

use crate::cancel::CancelToken;
use crate::compiled::CompiledExpr;
use crate::config::ExecConfig;
use crate::error::ExecError;
use crate::memory::MemoryHost;
use crate::presentation::{ExecReport, PresentationNode};
use crate::statement::{CalcStmt, ItemStmt, ListStmt, OutStmt, Statement, VarStmt};
use crate::target::ExecContext;
use crate::tree::{NodeId, StatementNode, StatementTree};

/// Variables without `type` or `size` are this wide.
const DEFAULT_VAR_SIZE: u32 = 4;

type Entries = Vec<PresentationNode>;
type NodeFuture<'s> = Pin<Box<dyn Future<Output = Result<Entries, ExecError>> + 's>>;

/// Owns a statement tree and the state that survives between passes.
pub struct Interpreter {
    tree: StatementTree,
    config: ExecConfig,
    /// `const` reads that already ran.
    const_done: FxHashSet<NodeId>,
    calc_results: FxHashMap<NodeId, Vec<Option<Value>>>,
}

impl Interpreter {
    pub fn new(tree: StatementTree) -> Self {
        Self::with_config(tree, ExecConfig::default())
    }

    pub fn with_config(tree: StatementTree, config: ExecConfig) -> Self {
        Interpreter {
            tree,
            config,
            const_done: FxHashSet::default(),
            calc_results: FxHashMap::default(),
        }
    }

    pub fn tree(&self) -> &StatementTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut StatementTree {
        &mut self.tree
    }

    pub fn config(&self) -> &ExecConfig {
        &self.config
    }

    /// Results of the last run of the `calc` at `id`, one per expression.
    pub fn calc_results(&self, id: NodeId) -> Option<&[Option<Value>]> {
        self.calc_results.get(&id).map(Vec::as_slice)
    }

    /// Run one pass.
    pub async fn execute<M: MemoryHost>(
        &mut self,
        ctx: &mut ExecContext<M>,
        cancel: &CancelToken,
    ) -> Result<ExecReport, ExecError> {
        ctx.host_mut().memory_mut().clear();
        ctx.host_mut().registers_mut().invalidate_all();

        let mut pass = Pass {
            tree: &self.tree,
            config: &self.config,
            ctx,
            cancel,
            const_done: &mut self.const_done,
            calc_results: &mut self.calc_results,
            breaks_hit: Vec::new(),
            disabled_lists: Vec::new(),
        };
        let presentation = match self.tree.root() {
            Some(root) => pass.run(root).await?,
            None => Vec::new(),
        };
        let report = ExecReport {
            presentation,
            breaks_hit: pass.breaks_hit,
            disabled_lists: pass.disabled_lists,
        };
        debug!(
            entries = report.presentation.len(),
            breaks = report.breaks_hit.len(),
            "pass complete"
        );
        Ok(report)
    }
}

/// State of one pass.
struct Pass<'p, M> {
    tree: &'p StatementTree,
    config: &'p ExecConfig,
    ctx: &'p mut ExecContext<M>,
    cancel: &'p CancelToken,
    const_done: &'p mut FxHashSet<NodeId>,
    calc_results: &'p mut FxHashMap<NodeId, Vec<Option<Value>>>,
    breaks_hit: Vec<u32>,
    disabled_lists: Vec<u32>,
}

impl<'p, M: MemoryHost> Pass<'p, M> {
    fn run<'s>(&'s mut self, id: NodeId) -> NodeFuture<'s> {
        Box::pin(async move {
            if self.cancel.is_cancelled() {
                return Err(ExecError::Cancelled);
            }
            let tree = self.tree;
            let node = tree.get(id);

            if !self.condition(node).await? {
                trace!(line = node.line, kind = node.statement.kind_name(), "skipped");
                return Ok(hidden_entry(node));
            }

            match &node.statement {
                Statement::Object(out) | Statement::Out(out) | Statement::ListOut(out) => {
                    let entry = self.group(id, node, out).await?;
                    Ok(vec![entry])
                }
                Statement::Item(item) | Statement::Print(item) => {
                    let entry = self.item(id, node, item).await?;
                    Ok(vec![entry])
                }
                Statement::Var(var) => {
                    self.var(var, node.line).await?;
                    self.children(id).await
                }
                Statement::Calc(calc) => {
                    self.calc(id, calc, node.line).await?;
                    self.children(id).await
                }
                Statement::Read(read) => {
                    self.read(id, read, node.line).await?;
                    self.children(id).await
                }
                Statement::ReadList(list) => {
                    self.read_list(id, list, node.line).await?;
                    self.children(id).await
                }
                Statement::List(list) => self.list(id, list, node.line).await,
                Statement::Break(_) => {
                    info!(line = node.line, "breakpoint hit");
                    self.breaks_hit.push(node.line);
                    self.children(id).await
                }
            }
        })
    }

    async fn children(&mut self, id: NodeId) -> Result<Entries, ExecError> {
        let tree = self.tree;
        let mut entries = Vec::new();
        for &child in tree.children(id) {
            entries.extend(self.run(child).await?);
        }
        Ok(entries)
    }

    /// Evaluate in the global scope. `None` means "could not evaluate".
    async fn eval(&mut self, expr: &CompiledExpr) -> Result<Option<Value>, ExecError> {
        let parsed = expr.parsed();
        Ok(self.ctx.evaluate_parse_result(parsed, None).await?)
    }

    async fn eval_i64(&mut self, expr: &CompiledExpr, line: u32) -> Result<Option<i64>, ExecError> {
        let value = self.eval(expr).await?;
        let number = value.as_ref().and_then(Value::to_i64);
        if number.is_none() {
            warn!(line, expr = expr.text(), "expression has no integer value");
        }
        Ok(number)
    }

    async fn condition(&mut self, node: &StatementNode) -> Result<bool, ExecError> {
        let Some(cond) = &node.cond else {
            return Ok(true);
        };
        match self.eval(cond).await? {
            Some(value) => Ok(value.is_truthy()),
            None => {
                warn!(line = node.line, cond = cond.text(), "condition could not be evaluated");
                Ok(false)
            }
        }
    }

    fn render(&self, value: &Value) -> String {
        self.ctx.host().symbols().describe(value)
    }

    /// Labels without format segments are shown verbatim.
    async fn format_text(&mut self, text: &CompiledExpr) -> Result<Option<String>, ExecError> {
        if !is_format_text(text.text()) {
            return Ok(Some(text.text().to_owned()));
        }
        Ok(self.eval(text).await?.map(|v| self.render(&v)))
    }

    async fn group(
        &mut self,
        id: NodeId,
        node: &StatementNode,
        out: &OutStmt,
    ) -> Result<PresentationNode, ExecError> {
        let value = match &out.value {
            Some(expr) => self.eval(expr).await?.map(|v| self.render(&v)),
            None => None,
        };
        let children = self.children(id).await?;
        Ok(PresentationNode {
            name: out
                .name
                .clone()
                .unwrap_or_else(|| node.statement.kind_name().to_owned()),
            value,
            visible: true,
            line: node.line,
            children,
        })
    }

    async fn item(
        &mut self,
        id: NodeId,
        node: &StatementNode,
        item: &ItemStmt,
    ) -> Result<PresentationNode, ExecError> {
        let name = match &item.property {
            Some(text) => self.format_text(text).await?,
            None => None,
        };
        let value = match &item.value {
            Some(text) => self.format_text(text).await?,
            None => None,
        };
        let children = self.children(id).await?;
        Ok(PresentationNode {
            name: name.unwrap_or_default(),
            value,
            visible: true,
            line: node.line,
            children,
        })
    }

    async fn var(&mut self, var: &VarStmt, line: u32) -> Result<(), ExecError> {
        if var.name.is_empty() {
            warn!(line, "var without a name");
            return Ok(());
        }
        let value = match &var.value {
            Some(expr) => match self.eval(expr).await? {
                Some(value) => value,
                None => {
                    warn!(line, name = %var.name, "var value could not be evaluated");
                    return Ok(());
                }
            },
            None => Value::ZERO,
        };
        let size = match (&var.ty, &var.size) {
            (Some(ty), _) => ty.size(),
            (None, Some(size)) => self
                .eval_i64(size, line)
                .await?
                .and_then(|s| u32::try_from(s).ok())
                .unwrap_or(DEFAULT_VAR_SIZE),
            (None, None) => DEFAULT_VAR_SIZE,
        };
        let host = self.ctx.host_mut();
        host.symbols_mut().set(var.name.clone(), value.clone());
        host.memory_mut().set_variable(&var.name, size, &value);
        trace!(line, name = %var.name, size, "var declared");
        Ok(())
    }

    async fn calc(&mut self, id: NodeId, calc: &CalcStmt, line: u32) -> Result<(), ExecError> {
        self.calc_results.remove(&id);
        let mut results = Vec::with_capacity(calc.exprs.len());
        for expr in &calc.exprs {
            let result = self.eval(expr).await?;
            match &result {
                Some(value) => debug!(line, expr = expr.text(), %value, "calc"),
                None => warn!(line, expr = expr.text(), "calc expression could not be evaluated"),
            }
            results.push(result);
        }
        self.calc_results.insert(id, results);
        Ok(())
    }

    async fn list(&mut self, id: NodeId, list: &ListStmt, line: u32) -> Result<Entries, ExecError> {
        if !list.verify() {
            error!(line, "list has both `limit` and `while`, disabled");
            self.disabled_lists.push(line);
            return Ok(Vec::new());
        }
        let mut index = match &list.start {
            Some(expr) => self.eval_i64(expr, line).await?.unwrap_or(0),
            None => 0,
        };
        let limit = match &list.limit {
            Some(expr) => self.eval_i64(expr, line).await?.unwrap_or(0),
            None => 0,
        };

        let mut entries = Vec::new();
        let mut iterations = 0u32;
        loop {
            if let Some(name) = &list.name {
                self.ctx
                    .host_mut()
                    .symbols_mut()
                    .set(name.clone(), Value::Number(index as f64));
            }
            // Only an explicit `while` may run unbounded; otherwise `limit`
            // (default 0) ends the loop.
            let proceed = match &list.while_cond {
                Some(cond) => self.eval(cond).await?.is_some_and(|v| v.is_truthy()),
                None => index < limit,
            };
            if !proceed {
                break;
            }
            if iterations >= self.config.max_list_iterations {
                error!(
                    line,
                    max = self.config.max_list_iterations,
                    "list iteration cap reached"
                );
                break;
            }
            entries.extend(self.children(id).await?);
            iterations += 1;
            index = index.wrapping_add(1);
        }
        trace!(line, iterations, "list done");
        Ok(entries)
    }
}

/// Presentation groups whose condition failed still occupy a slot.
fn hidden_entry(node: &StatementNode) -> Entries {
    let name = match &node.statement {
        Statement::Object(out) | Statement::Out(out) | Statement::ListOut(out) => out
            .name
            .clone()
            .unwrap_or_else(|| node.statement.kind_name().to_owned()),
        Statement::Item(_) | Statement::Print(_) => String::new(),
        _ => return Vec::new(),
    };
    vec![PresentationNode {
        name,
        value: None,
        visible: false,
        line: node.line,
        children: Vec::new(),
    }]
}

#[cfg(test)]
mod tests;

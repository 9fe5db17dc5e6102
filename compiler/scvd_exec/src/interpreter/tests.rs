#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;
use rustc_hash::FxHashMap;
use scvd_eval::{HostStats, Value};
use scvd_ir::Intrinsic;

use crate::declaration::{DeclKind, Declaration};
use crate::memory::MemoryHost;
use crate::target::{ExecContext, TargetHost};
use crate::{CancelToken, ExecConfig, ExecError, ExecReport, Interpreter, PresentationNode, StatementTree};

const RAM: u64 = 0x2000_0000;

/// Sparse byte-addressed memory with symbols and registers.
#[derive(Default)]
struct MockTarget {
    bytes: FxHashMap<u64, u8>,
    symbols: FxHashMap<String, u64>,
    registers: FxHashMap<String, u64>,
    variables: Vec<(String, u32, Value)>,
    bytes_used: Option<u64>,
    clears: usize,
    reads: usize,
    register_reads: usize,
}

impl MockTarget {
    fn poke(&mut self, address: u64, bytes: &[u8]) {
        for (i, b) in bytes.iter().enumerate() {
            self.bytes.insert(address + i as u64, *b);
        }
    }

    fn poke_u32(&mut self, address: u64, value: u32) {
        self.poke(address, &value.to_le_bytes());
    }

    fn symbol(mut self, name: &str, address: u64) -> Self {
        self.symbols.insert(name.to_owned(), address);
        self
    }
}

impl MemoryHost for MockTarget {
    async fn read(&mut self, address: u64, size: usize) -> Option<Vec<u8>> {
        self.reads += 1;
        (0..size as u64)
            .map(|i| self.bytes.get(&(address + i)).copied())
            .collect()
    }

    async fn write(&mut self, address: u64, bytes: &[u8]) -> bool {
        self.poke(address, bytes);
        true
    }

    fn set_variable(&mut self, name: &str, size: u32, value: &Value) {
        self.variables.push((name.to_owned(), size, value.clone()));
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.variables.clear();
    }

    async fn read_register(&mut self, name: &str) -> Option<u64> {
        self.register_reads += 1;
        self.registers.get(name).copied()
    }

    async fn write_register(&mut self, name: &str, value: u64) -> bool {
        self.registers.insert(name.to_owned(), value);
        true
    }

    fn symbol_address(&self, name: &str) -> Option<u64> {
        self.symbols.get(name).copied()
    }

    fn stats(&self) -> Option<HostStats> {
        self.bytes_used.map(|bytes_used| HostStats {
            bytes_used,
            symbols: self.symbols.len(),
        })
    }
}

fn decl(kind: DeclKind, line: u32) -> Declaration {
    Declaration::new(kind, line)
}

fn item(line: u32, property: &str, value: &str) -> Declaration {
    decl(DeclKind::Item, line)
        .with_attr("property", property)
        .with_attr("value", value)
}

fn object(line: u32, children: Vec<Declaration>) -> Declaration {
    let mut root = decl(DeclKind::Object, line).with_attr("name", "view");
    root.children = children;
    root
}

async fn run(root: &Declaration, target: MockTarget) -> (ExecReport, ExecContext<MockTarget>) {
    let mut interpreter = Interpreter::new(StatementTree::build(root));
    let mut ctx = TargetHost::new(target).into_context();
    let report = interpreter
        .execute(&mut ctx, &CancelToken::new())
        .await
        .unwrap();
    (report, ctx)
}

fn items(report: &ExecReport) -> Vec<(String, Option<String>)> {
    report.presentation[0]
        .children
        .iter()
        .map(|n| (n.name.clone(), n.value.clone()))
        .collect()
}

fn symbol(ctx: &ExecContext<MockTarget>, name: &str) -> Option<Value> {
    ctx.host().symbols().get(name).cloned()
}

#[tokio::test(flavor = "current_thread")]
async fn test_var_and_item() {
    let root = object(
        1,
        vec![
            decl(DeclKind::Var, 2)
                .with_attr("name", "x")
                .with_attr("type", "uint16_t")
                .with_attr("value", "4"),
            item(3, "Count", "Value: %d[x+1]"),
        ],
    );
    let (report, ctx) = run(&root, MockTarget::default()).await;

    assert_eq!(
        report.presentation,
        vec![PresentationNode {
            name: "view".into(),
            value: None,
            visible: true,
            line: 1,
            children: vec![PresentationNode {
                name: "Count".into(),
                value: Some("Value: 5".into()),
                visible: true,
                line: 3,
                children: vec![],
            }],
        }]
    );
    let target = ctx.host().memory();
    assert_eq!(target.clears, 1);
    assert_eq!(target.variables, vec![("x".to_owned(), 2, Value::Number(4.0))]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_var_defaults_to_zero() {
    let root = object(1, vec![decl(DeclKind::Var, 2).with_attr("name", "n")]);
    let (_, ctx) = run(&root, MockTarget::default()).await;
    assert_eq!(symbol(&ctx, "n"), Some(Value::ZERO));
    assert_eq!(ctx.host().memory().variables[0].1, 4);
}

#[tokio::test(flavor = "current_thread")]
async fn test_false_condition_skips_children() {
    let root = object(
        1,
        vec![
            decl(DeclKind::Out, 2)
                .with_attr("name", "hidden")
                .with_attr("cond", "0")
                .with_child(decl(DeclKind::Var, 3).with_attr("name", "never")),
            decl(DeclKind::Var, 4)
                .with_attr("name", "skipped")
                .with_attr("cond", "1 == 2"),
        ],
    );
    let (report, ctx) = run(&root, MockTarget::default()).await;

    let hidden = &report.presentation[0].children[0];
    assert_eq!(hidden.name, "hidden");
    assert!(!hidden.visible);
    assert!(hidden.children.is_empty());
    assert_eq!(symbol(&ctx, "never"), None);
    assert_eq!(symbol(&ctx, "skipped"), None);
}

#[tokio::test(flavor = "current_thread")]
async fn test_execution_follows_line_order() {
    // Declared out of order; the var on line 2 must run before the item.
    let root = object(
        1,
        vec![
            item(5, "x", "%d[x]"),
            decl(DeclKind::Var, 2)
                .with_attr("name", "x")
                .with_attr("value", "7"),
        ],
    );
    let (report, _) = run(&root, MockTarget::default()).await;
    assert_eq!(items(&report), vec![("x".into(), Some("7".into()))]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_list_with_limit() {
    let root = object(
        1,
        vec![decl(DeclKind::List, 2)
            .with_attr("name", "i")
            .with_attr("start", "1")
            .with_attr("limit", "4")
            .with_child(item(3, "%d[i]", "%d[i * i]"))],
    );
    let (report, _) = run(&root, MockTarget::default()).await;
    assert_eq!(
        items(&report),
        vec![
            ("1".into(), Some("1".into())),
            ("2".into(), Some("4".into())),
            ("3".into(), Some("9".into())),
        ]
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_list_with_while() {
    let root = object(
        1,
        vec![decl(DeclKind::List, 2)
            .with_attr("name", "i")
            .with_attr("while", "i < 2")
            .with_child(item(3, "row %d[i]", "x"))],
    );
    let (report, _) = run(&root, MockTarget::default()).await;
    assert_eq!(report.presentation[0].children.len(), 2);
}

#[tokio::test(flavor = "current_thread")]
async fn test_list_with_limit_and_while_is_disabled() {
    let root = object(
        1,
        vec![decl(DeclKind::List, 2)
            .with_attr("name", "i")
            .with_attr("limit", "3")
            .with_attr("while", "1")
            .with_child(item(3, "row", "x"))],
    );
    let (report, _) = run(&root, MockTarget::default()).await;
    assert!(report.presentation[0].children.is_empty());
    assert_eq!(report.disabled_lists, vec![2]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_list_iterations_are_capped() {
    let root = object(
        1,
        vec![decl(DeclKind::List, 2)
            .with_attr("while", "1")
            .with_child(item(3, "row", "x"))],
    );
    let mut interpreter = Interpreter::with_config(
        StatementTree::build(&root),
        ExecConfig::default().with_max_list_iterations(5),
    );
    let mut ctx = TargetHost::new(MockTarget::default()).into_context();
    let report = interpreter.execute(&mut ctx, &CancelToken::new()).await.unwrap();
    assert_eq!(report.presentation[0].children.len(), 5);
}

#[tokio::test(flavor = "current_thread")]
async fn test_calc_evaluates_each_expression() {
    let root = object(
        1,
        vec![decl(DeclKind::Calc, 2).with_text("a = 2; b = a * 3\n1 / 0")],
    );
    let mut interpreter = Interpreter::new(StatementTree::build(&root));
    let mut ctx = TargetHost::new(MockTarget::default()).into_context();
    interpreter.execute(&mut ctx, &CancelToken::new()).await.unwrap();

    assert_eq!(symbol(&ctx, "b"), Some(Value::Number(6.0)));
    let calc = interpreter.tree().preorder()[1];
    assert_eq!(
        interpreter.calc_results(calc),
        Some(&[Some(Value::Number(2.0)), Some(Value::Number(6.0)), None][..])
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_read_scalar_and_array() {
    let mut target = MockTarget::default()
        .symbol("counter", RAM)
        .symbol("samples", RAM + 0x10);
    target.poke_u32(RAM, 0x1234);
    target.poke(RAM + 0x10, &[1, 0, 2, 0, 3, 0]);

    let root = object(
        1,
        vec![
            decl(DeclKind::Read, 2)
                .with_attr("name", "c")
                .with_attr("symbol", "counter")
                .with_attr("type", "uint32_t"),
            decl(DeclKind::Read, 3)
                .with_attr("name", "s")
                .with_attr("symbol", "samples")
                .with_attr("type", "uint16_t")
                .with_attr("size", "3"),
            item(4, "samples", "%T[s]"),
        ],
    );
    let (report, ctx) = run(&root, target).await;
    assert_eq!(symbol(&ctx, "c"), Some(Value::Number(4660.0)));
    assert_eq!(items(&report), vec![("samples".into(), Some("[1, 2, 3]".into()))]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_read_offset_endian_and_based() {
    let mut target = MockTarget::default().symbol("ptr", RAM);
    target.poke_u32(RAM, (RAM + 0x100) as u32);
    target.poke(RAM + 0x104, &[0x12, 0x34]);

    let root = object(
        1,
        vec![
            decl(DeclKind::Read, 2)
                .with_attr("name", "word")
                .with_attr("symbol", "ptr")
                .with_attr("based", "1")
                .with_attr("offset", "4")
                .with_attr("type", "uint16_t")
                .with_attr("endian", "B"),
        ],
    );
    let (_, ctx) = run(&root, target).await;
    // Offset applies before the dereference.
    assert_eq!(symbol(&ctx, "word"), None);

    let mut target = MockTarget::default().symbol("ptr", RAM);
    target.poke_u32(RAM + 4, (RAM + 0x100) as u32);
    target.poke(RAM + 0x100, &[0x12, 0x34]);
    let (_, ctx) = run(&root, target).await;
    assert_eq!(symbol(&ctx, "word"), Some(Value::Number(f64::from(0x1234))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_read_size_is_clamped() {
    let mut target = MockTarget::default().symbol("b", RAM);
    target.poke(RAM, &[9]);
    let root = object(
        1,
        vec![decl(DeclKind::Read, 2)
            .with_attr("name", "v")
            .with_attr("symbol", "b")
            .with_attr("type", "uint8_t")
            .with_attr("size", "0")],
    );
    let (_, ctx) = run(&root, target).await;
    assert_eq!(symbol(&ctx, "v"), Some(Value::Number(9.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_const_read_runs_once() {
    let mut target = MockTarget::default().symbol("id", RAM);
    target.poke_u32(RAM, 1);
    let root = object(
        1,
        vec![decl(DeclKind::Read, 2)
            .with_attr("name", "id")
            .with_attr("symbol", "id")
            .with_attr("const", "1")],
    );
    let mut interpreter = Interpreter::new(StatementTree::build(&root));
    let mut ctx = TargetHost::new(target).into_context();
    let cancel = CancelToken::new();

    interpreter.execute(&mut ctx, &cancel).await.unwrap();
    ctx.host_mut().memory_mut().poke_u32(RAM, 2);
    interpreter.execute(&mut ctx, &cancel).await.unwrap();

    assert_eq!(symbol(&ctx, "id"), Some(Value::Number(1.0)));
    assert_eq!(ctx.host().memory().reads, 1);
    assert_eq!(ctx.host().memory().clears, 2);
}

#[tokio::test(flavor = "current_thread")]
async fn test_readlist_follows_links() {
    let first = RAM + 0x40;
    let second = RAM + 0x80;
    let mut target = MockTarget::default().symbol("head", RAM);
    target.poke_u32(RAM, first as u32);
    target.poke_u32(first, 10);
    target.poke_u32(first + 4, second as u32);
    target.poke_u32(second, 20);
    target.poke_u32(second + 4, 0);

    let root = object(
        1,
        vec![
            decl(DeclKind::ReadList, 2)
                .with_attr("name", "nodes")
                .with_attr("symbol", "head")
                .with_attr("based", "1")
                .with_attr("type", "uint32_t")
                .with_attr("next", "4"),
            item(3, "count", "%d[nodes.length]"),
        ],
    );
    let (report, ctx) = run(&root, target).await;
    let nodes = symbol(&ctx, "nodes").and_then(|v| v.as_container()).unwrap();
    assert_eq!(
        ctx.host().symbols().elements(nodes),
        Some(&[Value::Number(10.0), Value::Number(20.0)][..])
    );
    assert_eq!(items(&report), vec![("count".into(), Some("2".into()))]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_readlist_count_is_contiguous() {
    let mut target = MockTarget::default().symbol("table", RAM);
    target.poke(RAM, &[5, 6, 7, 8]);
    let root = object(
        1,
        vec![decl(DeclKind::ReadList, 2)
            .with_attr("name", "t")
            .with_attr("symbol", "table")
            .with_attr("type", "uint8_t")
            .with_attr("count", "3")],
    );
    let (_, ctx) = run(&root, target).await;
    let t = symbol(&ctx, "t").and_then(|v| v.as_container()).unwrap();
    assert_eq!(
        ctx.host().symbols().elements(t),
        Some(&[Value::Number(5.0), Value::Number(6.0), Value::Number(7.0)][..])
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_breakpoints_are_reported() {
    let root = object(
        1,
        vec![decl(DeclKind::List, 2)
            .with_attr("name", "i")
            .with_attr("limit", "2")
            .with_child(decl(DeclKind::Var, 5).with_attr("name", "v"))],
    );
    let mut tree = StatementTree::build(&root);
    tree.insert_breakpoints(&[decl(DeclKind::Break, 4)]);
    let mut interpreter = Interpreter::new(tree);
    let mut ctx = TargetHost::new(MockTarget::default()).into_context();
    let report = interpreter.execute(&mut ctx, &CancelToken::new()).await.unwrap();
    assert_eq!(report.breaks_hit, vec![4, 4]);
}

#[tokio::test(flavor = "current_thread")]
async fn test_registers_fetched_once_per_pass() {
    let mut target = MockTarget::default();
    target.registers.insert("R0".into(), 3);
    let root = object(
        1,
        vec![
            decl(DeclKind::Var, 2)
                .with_attr("name", "a")
                .with_attr("value", "__GetRegVal(R0)"),
            decl(DeclKind::Var, 3)
                .with_attr("name", "b")
                .with_attr("value", "__GetRegVal(R0) * 2"),
        ],
    );
    let mut interpreter = Interpreter::new(StatementTree::build(&root));
    let mut ctx = TargetHost::new(target).into_context();
    let cancel = CancelToken::new();

    interpreter.execute(&mut ctx, &cancel).await.unwrap();
    assert_eq!(symbol(&ctx, "b"), Some(Value::Number(6.0)));
    assert_eq!(ctx.host().memory().register_reads, 1);

    interpreter.execute(&mut ctx, &cancel).await.unwrap();
    assert_eq!(ctx.host().memory().register_reads, 2);
}

#[tokio::test(flavor = "current_thread")]
async fn test_register_write_updates_cache() {
    let mut ctx = TargetHost::new(MockTarget::default()).into_context();
    assert!(ctx.host_mut().write_register("R1", 0x55).await);
    assert_eq!(
        ctx.host().registers().last_known("R1"),
        Some(&Value::Number(85.0))
    );
    assert_eq!(ctx.host().memory().registers.get("R1"), Some(&0x55));
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_intrinsic_aborts_pass() {
    let root = object(
        1,
        vec![decl(DeclKind::Var, 2)
            .with_attr("name", "used")
            .with_attr("value", "__CalcMemUsed(0, 0, 0, 0)")],
    );
    let mut interpreter = Interpreter::new(StatementTree::build(&root));
    let mut ctx = TargetHost::new(MockTarget::default()).into_context();
    let err = interpreter.execute(&mut ctx, &CancelToken::new()).await;
    assert!(matches!(
        err,
        Err(ExecError::MissingIntrinsic(m)) if m.intrinsic == Intrinsic::CalcMemUsed
    ));

    let mut ctx = TargetHost::new(MockTarget {
        bytes_used: Some(128),
        ..MockTarget::default()
    })
    .into_context();
    interpreter.execute(&mut ctx, &CancelToken::new()).await.unwrap();
    assert_eq!(symbol(&ctx, "used"), Some(Value::Number(128.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_cancelled_pass() {
    let root = object(1, vec![decl(DeclKind::Var, 2).with_attr("name", "x")]);
    let mut interpreter = Interpreter::new(StatementTree::build(&root));
    let mut ctx = TargetHost::new(MockTarget::default()).into_context();
    let cancel = CancelToken::new();
    cancel.cancel();
    assert_eq!(
        interpreter.execute(&mut ctx, &cancel).await,
        Err(ExecError::Cancelled)
    );
    assert_eq!(symbol(&ctx, "x"), None);
}

#[tokio::test(flavor = "current_thread")]
async fn test_bare_list_uses_default_limit() {
    let root = object(
        1,
        vec![decl(DeclKind::List, 2)
            .with_attr("name", "i")
            .with_child(item(3, "row", "x"))],
    );
    let (report, ctx) = run(&root, MockTarget::default()).await;
    assert!(report.presentation[0].children.is_empty());
    assert!(report.disabled_lists.is_empty());
    assert_eq!(symbol(&ctx, "i"), Some(Value::ZERO));
}

#[tokio::test(flavor = "current_thread")]
async fn test_pointer_byte_order_is_configured() {
    let mut target = MockTarget::default().symbol("ptr", RAM);
    target.poke(RAM, &((RAM + 0x100) as u32).to_be_bytes());
    target.poke(RAM + 0x100, &[0x34, 0x12]);

    let root = object(
        1,
        vec![decl(DeclKind::Read, 2)
            .with_attr("name", "word")
            .with_attr("symbol", "ptr")
            .with_attr("based", "1")
            .with_attr("type", "uint16_t")],
    );
    let mut interpreter = Interpreter::with_config(
        StatementTree::build(&root),
        ExecConfig::default().with_pointer_endian(crate::Endian::Big),
    );
    let mut ctx = TargetHost::new(target).into_context();
    interpreter.execute(&mut ctx, &CancelToken::new()).await.unwrap();
    assert_eq!(symbol(&ctx, "word"), Some(Value::Number(f64::from(0x1234))));
}

#[tokio::test(flavor = "current_thread")]
async fn test_repeated_passes_reuse_read_arrays() {
    let mut target = MockTarget::default().symbol("samples", RAM);
    target.poke(RAM, &[1, 2, 3]);
    let root = object(
        1,
        vec![
            decl(DeclKind::Read, 2)
                .with_attr("name", "s")
                .with_attr("symbol", "samples")
                .with_attr("type", "uint8_t")
                .with_attr("size", "3"),
            decl(DeclKind::ReadList, 3)
                .with_attr("name", "t")
                .with_attr("symbol", "samples")
                .with_attr("type", "uint8_t")
                .with_attr("count", "2"),
        ],
    );
    let mut interpreter = Interpreter::new(StatementTree::build(&root));
    let mut ctx = TargetHost::new(target).into_context();
    let cancel = CancelToken::new();

    interpreter.execute(&mut ctx, &cancel).await.unwrap();
    let first = (symbol(&ctx, "s"), symbol(&ctx, "t"));
    for _ in 0..10 {
        interpreter.execute(&mut ctx, &cancel).await.unwrap();
    }
    ctx.host_mut().memory_mut().poke(RAM, &[7]);
    interpreter.execute(&mut ctx, &cancel).await.unwrap();

    assert_eq!((symbol(&ctx, "s"), symbol(&ctx, "t")), first);
    let s = symbol(&ctx, "s").and_then(|v| v.as_container()).unwrap();
    assert_eq!(
        ctx.host().symbols().elements(s),
        Some(&[Value::Number(7.0), Value::Number(2.0), Value::Number(3.0)][..])
    );
}

use super::*;
use pretty_assertions::assert_eq;
use scvd_parse::parse;

fn context() -> EvalContext<SymbolTable> {
    EvalContext::new(SymbolTable::new())
}

async fn eval(ctx: &mut EvalContext<SymbolTable>, text: &str) -> Option<Value> {
    match ctx.evaluate_parse_result(&parse(text), None).await {
        Ok(value) => value,
        Err(missing) => panic!("unexpected missing intrinsic: {missing}"),
    }
}

async fn num(ctx: &mut EvalContext<SymbolTable>, text: &str) -> f64 {
    match eval(ctx, text).await {
        Some(Value::Number(n)) => n,
        other => panic!("`{text}` did not produce a number: {other:?}"),
    }
}

#[tokio::test(flavor = "current_thread")]
async fn test_postfix_increment_returns_old_value() {
    let mut ctx = context();
    ctx.host_mut().set("cnt", 4.0);
    assert_eq!(num(&mut ctx, "cnt++").await, 4.0);
    assert_eq!(ctx.host().get("cnt"), Some(&Value::Number(5.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_prefix_increment_returns_new_value() {
    let mut ctx = context();
    ctx.host_mut().set("cnt", 4.0);
    assert_eq!(num(&mut ctx, "++cnt").await, 5.0);
    assert_eq!(num(&mut ctx, "cnt--").await, 5.0);
    assert_eq!(ctx.host().get("cnt"), Some(&Value::Number(4.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_printf_evaluates_segments() {
    let mut ctx = context();
    ctx.host_mut().set("x", 4.0);
    assert_eq!(
        eval(&mut ctx, "Value: %d[x+1]").await,
        Some(Value::from("Value: 5"))
    );
    assert_eq!(eval(&mut ctx, "%%").await, Some(Value::from("%")));
    assert_eq!(
        eval(&mut ctx, "%x[x * 64] and %t[\"on\"]").await,
        Some(Value::from("100 and on"))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_unknown_identifier_is_created() {
    let mut ctx = context();
    assert!(!ctx.host().symbol_exists(None, "foo"));
    assert_eq!(num(&mut ctx, "foo").await, 0.0);
    assert!(ctx.host().symbol_exists(None, "foo"));
    assert_eq!(num(&mut ctx, "foo + 2").await, 2.0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_folded_constant_is_returned() {
    let mut ctx = context();
    assert_eq!(num(&mut ctx, "2+3*4").await, 14.0);
    assert_eq!(num(&mut ctx, "1 ? 2 : 3").await, 2.0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_constant_assignment_still_writes() {
    let mut ctx = context();
    assert_eq!(num(&mut ctx, "a = b = 1").await, 1.0);
    assert_eq!(ctx.host().get("a"), Some(&Value::Number(1.0)));
    assert_eq!(ctx.host().get("b"), Some(&Value::Number(1.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_assignment_inside_folded_expression_runs() {
    let mut ctx = context();
    assert_eq!(num(&mut ctx, "(a = 1) + 2").await, 3.0);
    assert_eq!(ctx.host().get("a"), Some(&Value::Number(1.0)));

    assert_eq!(num(&mut ctx, "1 ? (b = 5) : 0").await, 5.0);
    assert_eq!(ctx.host().get("b"), Some(&Value::Number(5.0)));

    assert_eq!(num(&mut ctx, "x = (y = 2) * 3").await, 6.0);
    assert_eq!(ctx.host().get("x"), Some(&Value::Number(6.0)));
    assert_eq!(ctx.host().get("y"), Some(&Value::Number(2.0)));

    assert_eq!(num(&mut ctx, "(z = 0) && 1").await, 0.0);
    assert_eq!(ctx.host().get("z"), Some(&Value::Number(0.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_compound_assignment() {
    let mut ctx = context();
    ctx.host_mut().set("x", 6.0);
    assert_eq!(num(&mut ctx, "x += 4").await, 10.0);
    assert_eq!(num(&mut ctx, "x <<= 2").await, 40.0);
    assert_eq!(num(&mut ctx, "x %= 7").await, 5.0);
    ctx.host_mut().set("s", "a");
    assert_eq!(eval(&mut ctx, "s += 1").await, Some(Value::from("a1")));
}

#[tokio::test(flavor = "current_thread")]
async fn test_short_circuit_skips_side_effects() {
    let mut ctx = context();
    ctx.host_mut().set("n", 0.0);
    assert_eq!(num(&mut ctx, "n && (k = 1)").await, 0.0);
    assert_eq!(ctx.host().get("k"), None);
    assert_eq!(num(&mut ctx, "1 || (k = 1)").await, 1.0);
    assert_eq!(ctx.host().get("k"), None);
    assert_eq!(num(&mut ctx, "n || (k = 2)").await, 1.0);
    assert_eq!(ctx.host().get("k"), Some(&Value::Number(2.0)));
}

#[tokio::test(flavor = "current_thread")]
async fn test_member_assignment_creates_object() {
    let mut ctx = context();
    assert_eq!(num(&mut ctx, "task.state = 3").await, 3.0);
    let Some(Value::Container(task)) = ctx.host().get("task").cloned() else {
        panic!("task is not a container");
    };
    assert!(!ctx.host().is_array(task));
    assert_eq!(num(&mut ctx, "task.state + 1").await, 4.0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_index_assignment_creates_array() {
    let mut ctx = context();
    assert_eq!(num(&mut ctx, "buf[2] = 9").await, 9.0);
    let Some(Value::Container(buf)) = ctx.host().get("buf").cloned() else {
        panic!("buf is not a container");
    };
    assert!(ctx.host().is_array(buf));
    assert_eq!(ctx.host().describe(&Value::Container(buf)), "[undefined, undefined, 9]");
}

#[tokio::test(flavor = "current_thread")]
async fn test_nested_auto_vivification() {
    let mut ctx = context();
    assert_eq!(num(&mut ctx, "a.b[1].c = 5").await, 5.0);
    assert_eq!(num(&mut ctx, "a.b[1].c * 2").await, 10.0);
    let a = ctx.host().get("a").cloned().unwrap_or(Value::Undefined);
    assert_eq!(ctx.host().describe(&a), "{b: [undefined, {c: 5}]}");
}

#[tokio::test(flavor = "current_thread")]
async fn test_missing_member_is_undefined() {
    let mut ctx = context();
    ctx.host_mut().set("x", 1.0);
    assert_eq!(eval(&mut ctx, "x.field").await, Some(Value::Undefined));
    assert!(num(&mut ctx, "x.field + 1").await.is_nan());
}

#[tokio::test(flavor = "current_thread")]
async fn test_failures_become_none() {
    let mut ctx = context();
    ctx.host_mut().set("z", 0.0);
    assert_eq!(eval(&mut ctx, "1 / z").await, None);
    assert_eq!(eval(&mut ctx, "f(1)").await, None);
    assert_eq!(eval(&mut ctx, "1 +").await, None);
    assert_eq!(eval(&mut ctx, "3 = 4").await, None);
    assert_eq!(eval(&mut ctx, "Total: %d[1 / z]").await, None);
    assert_eq!(eval(&mut ctx, "__size_of(TCB)").await, None);
}

#[tokio::test(flavor = "current_thread")]
async fn test_container_in_arithmetic_fails() {
    let mut ctx = context();
    num(&mut ctx, "arr[0] = 1").await;
    assert_eq!(eval(&mut ctx, "arr + 1").await, None);
    assert_eq!(num(&mut ctx, "arr == arr").await, 1.0);
}

#[tokio::test(flavor = "current_thread")]
async fn test_int_promotion() {
    let mut ctx = context();
    assert_eq!(
        eval(&mut ctx, "0xFFFFFFFFFFFFFFFF + 0").await,
        Some(Value::Int(-1))
    );
    assert_eq!(
        eval(&mut ctx, "0x8000000000000000 >>> 63").await,
        Some(Value::Int(1))
    );
}

#[tokio::test(flavor = "current_thread")]
async fn test_container_scope_is_restored() {
    let mut ctx = context();
    ctx.host_mut().set("x", 1.0);
    let scope = ctx.host_mut().new_object();
    ctx.host_mut()
        .write_key(scope, Key::Name("x".into()), Value::Number(10.0));

    let result = parse("x + 1");
    assert_eq!(
        ctx.evaluate_parse_result(&result, Some(scope)).await,
        Ok(Some(Value::Number(11.0)))
    );
    assert_eq!(ctx.container(), None);
    assert_eq!(
        ctx.evaluate_parse_result(&result, None).await,
        Ok(Some(Value::Number(2.0)))
    );

    // Restored on the failure path too.
    assert_eq!(
        ctx.evaluate_parse_result(&parse("1 %"), Some(scope)).await,
        Ok(None)
    );
    assert_eq!(ctx.container(), None);
}

#[tokio::test(flavor = "current_thread")]
async fn test_scoped_guard_restores_previous_container() {
    let mut ctx = context();
    let outer = ctx.host_mut().new_object();
    let inner = ctx.host_mut().new_object();
    ctx.set_container(Some(outer));
    {
        let scoped = ctx.scoped(Some(inner));
        assert_eq!(scoped.container(), Some(inner));
    }
    assert_eq!(ctx.container(), Some(outer));
}

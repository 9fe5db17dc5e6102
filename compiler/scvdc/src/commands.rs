//! `lex`, `parse` and `eval` for inspecting expression handling.

use std::fmt::Write;

use scvd_diagnostic::render_all;
use scvd_eval::{EvalContext, SymbolTable};
use scvd_parse::parse;
use tracing::debug;

/// Options for `eval`.
#[derive(Clone, Debug, Default)]
pub struct EvalOptions {
    /// `--set name=value` pairs, applied in order before evaluation.
    pub assignments: Vec<(String, String)>,
    /// List every global symbol after evaluation.
    pub dump_symbols: bool,
}

impl EvalOptions {
    /// Apply one flag. Returns `Ok(false)` for arguments that are not flags.
    pub fn apply_flag(&mut self, arg: &str) -> Result<bool, String> {
        if let Some(pair) = arg.strip_prefix("--set=") {
            self.assignments.push(parse_assignment(pair)?);
            return Ok(true);
        }
        if arg == "--symbols" {
            self.dump_symbols = true;
            return Ok(true);
        }
        Ok(false)
    }
}

/// Split `name=value`.
pub fn parse_assignment(pair: &str) -> Result<(String, String), String> {
    match pair.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_owned(), value.trim().to_owned()))
        }
        _ => Err(format!("expected `name=value`, found `{pair}`")),
    }
}

/// Token stream of `text`, one token per line.
pub fn lex_text(text: &str) -> String {
    let output = scvd_lexer::lex(text);
    let mut out = String::new();
    let _ = writeln!(out, "Tokens ({}):", output.tokens.len());
    for token in &output.tokens {
        let _ = writeln!(out, "  {:?} {:?} @ {}", token.kind, token.text, token.span);
    }
    if !output.diagnostics.is_empty() {
        out.push('\n');
        out.push_str(&render_all(&output.diagnostics, text, false));
    }
    out
}

/// Summary of the parse of `text`.
pub fn parse_text(text: &str) -> String {
    let result = parse(text);
    let mut out = String::new();
    let _ = writeln!(out, "Parse result for {text:?}:");
    let _ = writeln!(out, "  Nodes: {}", result.arena.len());
    let _ = writeln!(out, "  Printf: {}", result.is_printf);
    match &result.constant {
        Some(constant) => {
            let _ = writeln!(out, "  Constant: {constant:?}");
        }
        None => {
            let _ = writeln!(out, "  Constant: none");
        }
    }
    let _ = writeln!(out, "  Symbols: [{}]", result.external_symbols.join(", "));
    let _ = writeln!(out, "  Diagnostics: {}", result.diagnostics.len());
    if !result.diagnostics.is_empty() {
        out.push('\n');
        out.push_str(&render_all(&result.diagnostics, text, false));
    }
    out
}

/// Evaluate `text` against a fresh symbol table.
///
/// Each assignment's value is itself an expression, so `--set=p=0x20` and
/// `--set=s="idle"` both work.
pub async fn eval_text(text: &str, options: &EvalOptions) -> Result<String, String> {
    let mut ctx = EvalContext::new(SymbolTable::new());

    for (name, value_text) in &options.assignments {
        let parsed = parse(value_text);
        if parsed.has_errors() {
            return Err(render_all(&parsed.diagnostics, value_text, false));
        }
        let value = ctx
            .evaluate(&parsed)
            .await
            .map_err(|e| format!("cannot set `{name}`: {e}"))?;
        debug!(name, %value, "symbol set");
        ctx.host_mut().set(name.clone(), value);
    }

    let parsed = parse(text);
    if parsed.has_errors() {
        return Err(render_all(&parsed.diagnostics, text, false));
    }
    let value = match ctx.evaluate_parse_result(&parsed, None).await {
        Ok(Some(value)) => value,
        Ok(None) => return Err(format!("{text:?} could not be evaluated")),
        Err(missing) => return Err(missing.to_string()),
    };

    let symbols = ctx.host();
    let mut out = symbols.describe(&value);
    if options.dump_symbols {
        for name in symbols.names() {
            if let Some(value) = symbols.get(name) {
                let _ = write!(out, "\n  {name} = {}", symbols.describe(value));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests;

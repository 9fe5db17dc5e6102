//! SCVD view expression CLI
//!
//! Lex, parse and evaluate single expressions the way a debugger would see
//! them in a view description attribute.

use scvdc::commands::{eval_text, lex_text, parse_text, EvalOptions};
use scvdc::init_tracing;

fn main() {
    init_tracing();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    let command = &args[1];

    match command.as_str() {
        "lex" => {
            let Some(text) = args.get(2) else {
                eprintln!("Usage: scvd lex <expr>");
                std::process::exit(1);
            };
            print!("{}", lex_text(text));
        }
        "parse" => {
            let Some(text) = args.get(2) else {
                eprintln!("Usage: scvd parse <expr>");
                std::process::exit(1);
            };
            print!("{}", parse_text(text));
        }
        "eval" => {
            let mut options = EvalOptions::default();
            let mut text = None;
            let mut rest = args.iter().skip(2);
            while let Some(arg) = rest.next() {
                // `--set name=value` is accepted as well as `--set=name=value`
                let flag = if arg == "--set" {
                    match rest.next() {
                        Some(pair) => format!("--set={pair}"),
                        None => {
                            eprintln!("error: `--set` needs a `name=value` argument");
                            std::process::exit(1);
                        }
                    }
                } else {
                    arg.clone()
                };
                match options.apply_flag(&flag) {
                    Ok(true) => {}
                    Ok(false) if text.is_none() => text = Some(flag),
                    Ok(false) => {
                        eprintln!("error: unexpected argument '{flag}'");
                        std::process::exit(1);
                    }
                    Err(msg) => {
                        eprintln!("error: {msg}");
                        std::process::exit(1);
                    }
                }
            }

            let Some(text) = text else {
                eprintln!("Usage: scvd eval <expr> [--set name=value]... [--symbols]");
                std::process::exit(1);
            };

            let runtime = match tokio::runtime::Builder::new_current_thread().build() {
                Ok(runtime) => runtime,
                Err(e) => {
                    eprintln!("error: cannot start runtime: {e}");
                    std::process::exit(1);
                }
            };
            match runtime.block_on(eval_text(&text, &options)) {
                Ok(out) => println!("{out}"),
                Err(msg) => {
                    eprintln!("{msg}");
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => {
            print_usage();
        }
        "version" | "--version" | "-v" => {
            println!("scvd {}", env!("CARGO_PKG_VERSION"));
        }
        _ => {
            eprintln!("Unknown command: {command}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn print_usage() {
    println!("SCVD view expression tool");
    println!();
    println!("Usage: scvd <command> [options]");
    println!();
    println!("Commands:");
    println!("  lex <expr>           Tokenize and display tokens");
    println!("  parse <expr>         Parse and display AST info");
    println!("  eval <expr>          Evaluate against an empty symbol table");
    println!("  help                 Show this help message");
    println!("  version              Show version information");
    println!();
    println!("Eval options:");
    println!("  --set name=value     Define a symbol before evaluating (value is an expression)");
    println!("  --symbols            List all symbols afterwards");
    println!();
    println!("Logging:");
    println!("  RUST_LOG=scvd_eval=debug scvd eval 'a = 1 + 2'");
    println!();
    println!("Examples:");
    println!("  scvd lex 'x << 2'");
    println!("  scvd parse 'Value: %d[x + 1]'");
    println!("  scvd eval 'cnt++' --set cnt=4 --symbols");
}

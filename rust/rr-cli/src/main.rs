//! RR CLI — reads a program from standard input, evaluates it, and
//! prints the final value.

use clap::Parser as ClapParser;
use rr_compiler::compiler::ast::AstNode;
use rr_core::Value;
use rr_rt::{default_env, eval, run_source, RrError};
use std::io::Read;
use std::process::ExitCode;

#[derive(ClapParser)]
#[command(
    name = "rr",
    version,
    about = "The RR expression language interpreter",
    long_about = "Reads an RR program from standard input until EOF, evaluates it as a\n\
                  single block of top-level statements, and prints the final value."
)]
struct Cli {
    /// Print tokens, the AST, and a per-statement evaluation trace
    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut source = String::new();
    if let Err(err) = std::io::stdin().read_to_string(&mut source) {
        println!("--RR: io error: {}", err);
        return ExitCode::FAILURE;
    }
    match run(&source, cli.debug) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("--RR: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(source: &str, debug: bool) -> Result<(), RrError> {
    let mut env = default_env();
    if !debug {
        let value = run_source(source, &mut env)?;
        println!("{}", value);
        return Ok(());
    }

    let tokens = rr_compiler::tokenize(source)?;
    println!("--start tokens:");
    for token in &tokens {
        println!(
            "{} at line {}, col {}",
            token.kind, token.span.line, token.span.col
        );
    }
    println!("--end tokens.");

    let ast = rr_compiler::parse(source, &env)?;
    println!("--start ast:");
    match serde_json::to_string_pretty(&ast) {
        Ok(json) => println!("{}", json),
        Err(err) => println!("<ast not serializable: {}>", err),
    }
    println!("--end ast.");

    println!("--start eval:");
    let value = match &ast {
        AstNode::Statement(lines) => {
            let mut last = Value::None;
            for line in lines {
                last = eval(line, &mut env)?;
                println!("{}", last);
            }
            last
        }
        other => eval(other, &mut env)?,
    };
    println!("--end eval.");

    println!("{}", value);
    Ok(())
}

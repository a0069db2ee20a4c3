use std::{fs, process::ExitCode};

use clap::Parser;
use quill::{
    init_environment, init_tracing,
    interpreter::{evaluator::core::DEFAULT_MAX_CALL_DEPTH, host::Host},
    parse, tokenize, Config, Context, Error, Value,
};

/// quill runs small scripts written in the quill language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat `contents` as the path of a script file instead of source code.
    #[arg(short, long)]
    file: bool,

    /// Print the token stream before running.
    #[arg(long)]
    tokens: bool,

    /// Print the syntax tree before running.
    #[arg(long)]
    ast: bool,

    /// Maximum depth of nested function calls.
    #[arg(long, default_value_t = DEFAULT_MAX_CALL_DEPTH)]
    max_depth: usize,

    contents: String,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let script = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => script,
            Err(e) => {
                eprintln!("Failed to read the input file '{}': {e}", args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        args.contents.clone()
    };

    match execute(&script, &args) {
        Ok(Value::Null) => ExitCode::SUCCESS,
        Ok(value) => {
            println!("{value}");
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    }
}

fn execute(script: &str, args: &Args) -> Result<Value, Error> {
    let tokens = tokenize(script)?;
    if args.tokens {
        for token in &tokens {
            println!("{:>4}  {}", token.line, token.kind);
        }
    }

    let program = parse(&tokens)?;
    if args.ast {
        println!("{program:#?}");
    }

    let config = Config { max_call_depth: args.max_depth, };
    let mut context = Context::new(Host::stdio(), config);
    Ok(context.run(&program, &init_environment())?)
}

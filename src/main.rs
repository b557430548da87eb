use std::{env, fs::read_to_string, path::PathBuf, process::exit};

use tealc::{
    display_error,
    errors::errors::ErrorClass,
    parser::{context::ParseContext, psa::psa},
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: tealc <file>");
        exit(1);
    }

    let file_path = PathBuf::from(&args[1]);

    let source = match read_to_string(&file_path) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Failed to read {}: {}", file_path.display(), error);
            exit(1);
        }
    };

    let mut ctx = match ParseContext::new(&source) {
        Ok(ctx) => ctx,
        Err(error) => {
            display_error(error, file_path);
            exit(1);
        }
    };

    match psa(&mut ctx) {
        Ok(result_type) => {
            println!("Expression type: {}", result_type);
            for event in ctx.emitter.events() {
                println!("  {}", event);
            }
        }
        Err(error) => {
            // Internal errors are compiler defects; keep their exit code
            // apart from ordinary diagnostics.
            let code = if error.class() == ErrorClass::Internal {
                99
            } else {
                1
            };
            display_error(error, file_path);
            exit(code);
        }
    }
}

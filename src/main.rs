use std::{env, fs, io, process::ExitCode};

use loxwalk::{Config, Interpreter, Lexer, Value, evaluate_expression, init_tracing, value};

const EXIT_USAGE: u8 = 1;
const EXIT_LEX_ERROR: u8 = 65;
const EXIT_RUNTIME_ERROR: u8 = 70;

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <tokenize|parse|run> <file.lox>", program_name(&args));
        return ExitCode::from(EXIT_USAGE);
    }
    let command = args[1].as_str();
    let file_path = &args[2];

    let input = match fs::read_to_string(file_path) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error reading file {file_path}: {e}");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let scanned = Lexer::tokenize(&input);
    let config = Config::from_env();
    tracing::debug!(command, file = %file_path, ?config, "starting");

    match command {
        "tokenize" => {
            println!("{scanned}");
        }
        "parse" => match evaluate_expression(&scanned.tokens, &config) {
            Value::Number(n) => println!("{}", value::format_number(n)),
            other => println!("{other}"),
        },
        "run" => {
            // Lexical errors stop the run before any statement executes
            if scanned.has_errors() {
                return report_lex_errors(&scanned.errors);
            }
            let mut interpreter = Interpreter::with_config(io::stdout().lock(), config);
            if let Err(e) = interpreter.interpret(&scanned.tokens) {
                eprintln!("Error: {e}");
                return ExitCode::from(EXIT_RUNTIME_ERROR);
            }
        }
        _ => {
            eprintln!("Unknown command: {command}");
            return ExitCode::from(EXIT_USAGE);
        }
    }

    if scanned.has_errors() {
        return report_lex_errors(&scanned.errors);
    }
    ExitCode::SUCCESS
}

fn report_lex_errors(errors: &[loxwalk::LexError]) -> ExitCode {
    for e in errors {
        eprintln!("{e}");
    }
    ExitCode::from(EXIT_LEX_ERROR)
}

fn program_name(args: &[String]) -> &str {
    args.first().map_or("lox", String::as_str)
}

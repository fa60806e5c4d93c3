//! A tree-walking interpreter for a small Lox-like language.
//!
//! Source text is scanned into [`token::Token`]s by the [`lexer`], then either
//! evaluated as a single expression ([`evaluate_expression`]) or run as a
//! program by the [`interpreter::Interpreter`].

pub mod ast;
pub mod config;
pub mod cursor;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod value;

use std::sync::Once;

pub use config::Config;
pub use error::InterpretError;
pub use interpreter::Interpreter;
pub use lexer::{LexError, Lexer, Tokenized};
pub use value::Value;

use environment::Environment;
use parser::Parser;
use token::Token;

static TRACING_INIT: Once = Once::new();

/// Installs a stderr `tracing` subscriber when `RUST_LOG` is set, e.g.
/// `RUST_LOG=loxwalk=debug`. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}

/// Parses the whole token stream as one expression against an empty
/// environment and evaluates it.
pub fn evaluate_expression(tokens: &[Token], config: &Config) -> Value {
    let env = Environment::new();
    let expr = Parser::new(&env)
        .with_max_depth(config.max_depth)
        .parse_expression(tokens);
    tracing::debug!(%expr, "parsed expression");
    evaluator::evaluate(&expr, &env)
}

use std::io;

use thiserror::Error;

use crate::value::Value;

/// Statement-layer failures. The first one aborts the whole run.
#[derive(Debug, Error)]
pub enum InterpretError {
    #[error("incomplete variable declaration")]
    IncompleteDeclaration,

    #[error("no identifier found in declaration, got `{found}`")]
    MissingIdentifier { found: String },

    #[error("equal not found in {construct} of `{name}`")]
    MissingEqual {
        construct: &'static str,
        name: String,
    },

    #[error("no semicolon found after {construct}")]
    MissingSemicolon { construct: &'static str },

    #[error("empty expression in {construct}")]
    EmptyExpression { construct: &'static str },

    #[error("incomplete print statement")]
    IncompletePrint,

    #[error("malformed if statement: {reason}")]
    MalformedIf { reason: &'static str },

    #[error("invalid if condition: expected a bool, got {} `{found}`", .found.kind_name())]
    InvalidCondition { found: Value },

    #[error("invalid {branch} body: {source}")]
    InvalidBody {
        branch: &'static str,
        #[source]
        source: Box<InterpretError>,
    },

    #[error("nesting depth exceeded (limit {limit})")]
    TooDeep { limit: usize },

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, InterpretError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = InterpretError::InvalidBody {
            branch: "if",
            source: Box::new(InterpretError::MissingSemicolon {
                construct: "print",
            }),
        };
        assert_eq!(err.to_string(), "invalid if body: no semicolon found after print");

        let err = InterpretError::InvalidCondition { found: Value::Nil };
        assert_eq!(err.to_string(), "invalid if condition: expected a bool, got nil `nil`");
    }
}

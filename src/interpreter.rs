use std::io::Write;

use crate::config::Config;
use crate::cursor::Cursor;
use crate::environment::Environment;
use crate::error::{InterpretError, Result};
use crate::evaluator::evaluate;
use crate::parser::Parser;
use crate::token::{Token, TokenKind};
use crate::value::Value;

/// Boundaries of one `if` statement, found before anything runs.
#[derive(Debug)]
struct IfStatement<'t> {
    condition: &'t [Token],
    then_branch: &'t [Token],
    else_branch: Option<ElseBranch<'t>>,
}

#[derive(Debug)]
enum ElseBranch<'t> {
    // The nested `if ...` tokens, fed back through the statement loop
    ElseIf(&'t [Token]),
    Block(&'t [Token]),
}

impl<'t> ElseBranch<'t> {
    fn tokens(&self) -> &'t [Token] {
        match self {
            ElseBranch::ElseIf(tokens) | ElseBranch::Block(tokens) => *tokens,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ElseBranch::ElseIf(_) => "else if",
            ElseBranch::Block(_) => "else",
        }
    }
}

/// Executes a token stream statement by statement.
///
/// The interpreter owns the global [`Environment`] and the output sink that
/// `print` writes to. Block bodies are interpreted by re-entering the same
/// statement loop on the body's token window.
pub struct Interpreter<W: Write> {
    env: Environment,
    out: W,
    config: Config,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self::with_config(out, Config::default())
    }

    pub fn with_config(out: W, config: Config) -> Self {
        Interpreter {
            env: Environment::new(),
            out,
            config,
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs a whole program. The first failing statement stops the run.
    pub fn interpret(&mut self, tokens: &[Token]) -> Result<()> {
        let result = self.run(tokens, 0);
        self.out.flush()?;
        result
    }

    fn run(&mut self, tokens: &[Token], depth: usize) -> Result<()> {
        if depth > self.config.max_depth {
            return Err(InterpretError::TooDeep {
                limit: self.config.max_depth,
            });
        }

        let mut cursor = Cursor::new(tokens);
        while let Some(token) = cursor.peek() {
            tracing::trace!(kind = %token.kind, position = cursor.position(), depth, "dispatch");
            match token.kind {
                TokenKind::Var => self.declaration(&mut cursor)?,
                TokenKind::Identifier => self.reassignment(&mut cursor)?,
                TokenKind::Print => self.print(&mut cursor)?,
                TokenKind::If => self.conditional(&mut cursor, depth)?,
                _ => {
                    cursor.advance();
                }
            }
        }
        Ok(())
    }

    fn parser(&self) -> Parser<'_> {
        Parser::new(&self.env).with_max_depth(self.config.max_depth)
    }

    fn eval_tokens(&self, tokens: &[Token]) -> Value {
        let expr = self.parser().parse_expression(tokens);
        evaluate(&expr, &self.env)
    }

    /// `var <name> = <expr> ;`
    fn declaration(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
        if cursor.remaining() < 4 {
            return Err(InterpretError::IncompleteDeclaration);
        }
        cursor.advance();

        let found = cursor.peek().map(|t| t.lexeme.clone()).unwrap_or_default();
        let name = cursor
            .expect(TokenKind::Identifier, InterpretError::MissingIdentifier { found })?
            .lexeme
            .clone();
        self.assign_rest(cursor, name, "declaration")
    }

    /// `<name> = <expr> ;`
    fn reassignment(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
        let name = cursor
            .advance()
            .map(|t| t.lexeme.clone())
            .unwrap_or_default();
        self.assign_rest(cursor, name, "reassignment")
    }

    fn assign_rest(
        &mut self,
        cursor: &mut Cursor<'_>,
        name: String,
        construct: &'static str,
    ) -> Result<()> {
        if !cursor.eat(TokenKind::Equal) {
            return Err(InterpretError::MissingEqual { construct, name });
        }
        let body = cursor
            .until_semicolon()
            .ok_or(InterpretError::MissingSemicolon { construct })?;
        if body.is_empty() {
            return Err(InterpretError::EmptyExpression { construct });
        }

        let value = self.eval_tokens(body);
        tracing::debug!(%name, %value, construct, "store");
        self.env.set(name, value);
        Ok(())
    }

    /// `print <expr> ;`
    fn print(&mut self, cursor: &mut Cursor<'_>) -> Result<()> {
        if cursor.remaining() < 2 {
            return Err(InterpretError::IncompletePrint);
        }
        cursor.advance();

        let body = cursor
            .until_semicolon()
            .ok_or(InterpretError::MissingSemicolon { construct: "print" })?;
        if body.is_empty() {
            return Err(InterpretError::EmptyExpression { construct: "print" });
        }

        let value = self.eval_tokens(body);
        writeln!(self.out, "{value}")?;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip(self, cursor))]
    fn conditional(&mut self, cursor: &mut Cursor<'_>, depth: usize) -> Result<()> {
        let statement = self.scan_if(cursor, depth)?;

        let condition = self.condition_value(statement.condition);
        let Some(taken) = condition.as_bool() else {
            return Err(InterpretError::InvalidCondition { found: condition });
        };
        tracing::debug!(taken, "if condition");

        if taken {
            self.run(statement.then_branch, depth + 1)
                .map_err(|err| InterpretError::InvalidBody {
                    branch: "if",
                    source: Box::new(err),
                })
        } else if let Some(branch) = statement.else_branch {
            self.run(branch.tokens(), depth + 1)
                .map_err(|err| InterpretError::InvalidBody {
                    branch: branch.label(),
                    source: Box::new(err),
                })
        } else {
            Ok(())
        }
    }

    /// A condition of the form `<name> = <expr>` assigns and yields the
    /// assigned value.
    fn condition_value(&mut self, condition: &[Token]) -> Value {
        match condition {
            [target, equal, rest @ ..]
                if target.is(TokenKind::Identifier)
                    && equal.is(TokenKind::Equal)
                    && !rest.is_empty() =>
            {
                let value = self.eval_tokens(rest);
                self.env.set(target.lexeme.clone(), value.clone());
                value
            }
            _ => self.eval_tokens(condition),
        }
    }

    /// `if-stmt := IF '(' expr ')' body (ELSE (if-stmt | body))?`
    fn scan_if<'t>(&self, cursor: &mut Cursor<'t>, depth: usize) -> Result<IfStatement<'t>> {
        if depth > self.config.max_depth {
            return Err(InterpretError::TooDeep {
                limit: self.config.max_depth,
            });
        }
        cursor.expect(
            TokenKind::If,
            InterpretError::MalformedIf {
                reason: "expected `if`",
            },
        )?;

        let condition = cursor
            .delimited(TokenKind::LeftParen, TokenKind::RightParen)
            .ok_or(InterpretError::MalformedIf {
                reason: "condition must be a balanced parenthesized expression",
            })?;
        if condition.is_empty() {
            return Err(InterpretError::MalformedIf {
                reason: "empty condition",
            });
        }

        let then_branch = self.scan_body(cursor, depth, "missing if body")?;

        let else_branch = if cursor.eat(TokenKind::Else) {
            if cursor.check(TokenKind::If) {
                let start = cursor.position();
                self.scan_if(cursor, depth + 1)?;
                Some(ElseBranch::ElseIf(cursor.slice_from(start)))
            } else {
                Some(ElseBranch::Block(self.scan_body(
                    cursor,
                    depth,
                    "missing else body",
                )?))
            }
        } else {
            None
        };

        Ok(IfStatement {
            condition,
            then_branch,
            else_branch,
        })
    }

    /// `body := '{' ... '}' | statement`. A braced body yields its interior.
    fn scan_body<'t>(
        &self,
        cursor: &mut Cursor<'t>,
        depth: usize,
        missing: &'static str,
    ) -> Result<&'t [Token]> {
        let start = cursor.position();
        match cursor.peek_kind() {
            None | Some(TokenKind::RightBrace) | Some(TokenKind::Else) => {
                Err(InterpretError::MalformedIf { reason: missing })
            }
            Some(TokenKind::LeftBrace) => cursor
                .delimited(TokenKind::LeftBrace, TokenKind::RightBrace)
                .ok_or(InterpretError::MalformedIf {
                    reason: "unbalanced braces in body",
                }),
            Some(TokenKind::If) => {
                self.scan_if(cursor, depth + 1)?;
                Ok(cursor.slice_from(start))
            }
            Some(_) => {
                cursor
                    .until_semicolon()
                    .ok_or(InterpretError::MalformedIf {
                        reason: "body statement has no terminating `;`",
                    })?;
                Ok(cursor.slice_from(start))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use pretty_assertions::assert_eq;

    fn run(input: &str) -> (Result<()>, String) {
        let tokens = Lexer::tokenize(input).tokens;
        let mut interpreter = Interpreter::new(Vec::new());
        let result = interpreter.interpret(&tokens);
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (result, output)
    }

    fn run_with(input: &str, config: Config) -> (Result<()>, String) {
        let tokens = Lexer::tokenize(input).tokens;
        let mut interpreter = Interpreter::with_config(Vec::new(), config);
        let result = interpreter.interpret(&tokens);
        let output = String::from_utf8(interpreter.into_output()).unwrap();
        (result, output)
    }

    fn output(input: &str) -> String {
        let (result, output) = run(input);
        result.unwrap();
        output
    }

    #[test]
    fn test_declaration_then_print() {
        assert_eq!(output("var x = 1; print x;"), "1\n");
    }

    #[test]
    fn test_reassignment_overwrites() {
        assert_eq!(output("var x = 1; x = 2; print x;"), "2\n");
        assert_eq!(output("var x = 1; var x = \"again\"; print x;"), "again\n");
    }

    #[test]
    fn test_print_expressions() {
        assert_eq!(output("print 1 + 2 * 3;"), "9\n");
        assert_eq!(output("print (5);"), "(group 5)\n");
        assert_eq!(output("print \"a\" + \"b\";"), "ab\n");
        assert_eq!(output("print 1 + \"b\";"), "nil\n");
        assert_eq!(output("var a = 3; var b = a * 2; print b - a;"), "3\n");
    }

    #[test]
    fn test_true_branch() {
        assert_eq!(output("if (true) { print 1; }"), "1\n");
        assert_eq!(output("if (true) { print 1; } else { print 2; }"), "1\n");
    }

    #[test]
    fn test_false_branch_with_else() {
        assert_eq!(output("if (false) { print 1; } else { print 2; }"), "2\n");
        assert_eq!(output("if (false) { print 1; } print 3;"), "3\n");
    }

    #[test]
    fn test_else_if_chain_picks_first_true_branch() {
        let program = "
            var n = 2;
            if (n == 1) { print \"one\"; }
            else if (n == 2) { print \"two\"; x = 10; }
            else if (n < 3) { print \"small\"; y = 1; }
            else { print \"other\"; }
            print x;
            print y;
        ";
        assert_eq!(output(program), "two\n10\nnil\n");
    }

    #[test]
    fn test_else_if_falls_through_to_else() {
        let program = "
            if (false) print 1;
            else if (false) print 2;
            else print 3;
        ";
        assert_eq!(output(program), "3\n");
    }

    #[test]
    fn test_single_statement_bodies() {
        assert_eq!(output("if (true) print 1; else print 2; print 3;"), "1\n3\n");
        assert_eq!(output("if (false) print 1; else print 2; print 3;"), "2\n3\n");
    }

    #[test]
    fn test_nested_if_bodies() {
        let program = "
            var a = true;
            if (a) {
                if (!a) { print \"inner\"; } else { print \"nested else\"; }
                print \"after\";
            }
            if (a) if (false) print 1; else print 2;
        ";
        assert_eq!(output(program), "nested else\nafter\n2\n");
    }

    #[test]
    fn test_condition_reassignment() {
        assert_eq!(output("var a = false; if (a = true) print a;"), "true\n");
    }

    #[test]
    fn test_unknown_tokens_are_skipped() {
        assert_eq!(output("; ; 1 + 2; print 4;"), "4\n");
    }

    #[test]
    fn test_missing_semicolon_halts_before_output() {
        let (result, output) = run("var x = 1\nprint x");
        let err = result.unwrap_err();

        assert!(matches!(err, InterpretError::MissingSemicolon { construct: "declaration" }));
        assert_eq!(err.to_string(), "no semicolon found after declaration");
        assert_eq!(output, "");
    }

    #[test]
    fn test_first_failure_aborts_run() {
        let (result, output) = run("print 1; x 2; print 3;");
        assert!(matches!(result, Err(InterpretError::MissingEqual { .. })));
        assert_eq!(output, "1\n");
    }

    #[test]
    fn test_declaration_errors() {
        assert!(matches!(run("var x =").0, Err(InterpretError::IncompleteDeclaration)));
        assert!(matches!(
            run("var 1 = 2;").0,
            Err(InterpretError::MissingIdentifier { .. })
        ));
        assert!(matches!(
            run("var x 2 ;").0,
            Err(InterpretError::MissingEqual { .. })
        ));
        assert!(matches!(
            run("var x = ;").0,
            Err(InterpretError::EmptyExpression { .. })
        ));
        assert!(matches!(run("print").0, Err(InterpretError::IncompletePrint)));
    }

    #[test]
    fn test_malformed_if_runs_nothing() {
        let (result, output) = run("if (true { print 1; }");
        assert!(matches!(result, Err(InterpretError::MalformedIf { .. })));
        assert_eq!(output, "");

        let (result, output) = run("if (true) { print 1;");
        assert!(matches!(result, Err(InterpretError::MalformedIf { .. })));
        assert_eq!(output, "");

        let (result, output) = run("if (true) { print 1; } else");
        assert!(matches!(result, Err(InterpretError::MalformedIf { .. })));
        assert_eq!(output, "");
    }

    #[test]
    fn test_non_bool_condition() {
        let (result, _) = run("if (1 + 1) print 1;");
        let err = result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid if condition: expected a bool, got number `2`"
        );

        // a malformed condition parses to nil and only fails here
        assert!(matches!(
            run("if (1 +) print 1;").0,
            Err(InterpretError::InvalidCondition { found: Value::Nil })
        ));
    }

    #[test]
    fn test_body_errors_are_wrapped() {
        let err = run("if (true) { print 1 }").0.unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid if body: no semicolon found after print"
        );
    }

    #[test]
    fn test_long_operator_chain_prints_nil() {
        let short = format!("print {};", vec!["1"; 101].join(" + "));
        assert_eq!(output(&short), "101\n");

        let long = format!("print {};", vec!["1"; 300].join(" + "));
        assert_eq!(output(&long), "nil\n");
    }

    fn else_if_chain(clauses: usize) -> String {
        let mut program = String::from("if (false) print 0;");
        for n in 1..clauses {
            program.push_str(&format!(" else if (false) print {n};"));
        }
        program.push_str(" else print \"last\";");
        program
    }

    #[test]
    fn test_else_if_chain_length_counts_as_nesting() {
        let program = else_if_chain(20);

        let (result, output) = run_with(&program, Config::default().with_max_depth(10));
        let mut err = result.unwrap_err();
        while let InterpretError::InvalidBody { source, .. } = err {
            err = *source;
        }
        assert!(matches!(err, InterpretError::TooDeep { limit: 10 }));
        assert_eq!(output, "");

        let (result, output) = run_with(&program, Config::default().with_max_depth(64));
        result.unwrap();
        assert_eq!(output, "last\n");
    }

    #[test]
    fn test_nesting_limit() {
        let program = "if (true) { if (true) { if (true) { print 1; } } }";

        let (result, _) = run_with(program, Config::default().with_max_depth(2));
        let mut err = result.unwrap_err();
        while let InterpretError::InvalidBody { source, .. } = err {
            err = *source;
        }
        assert!(matches!(err, InterpretError::TooDeep { limit: 2 }));

        assert_eq!(output(program), "1\n");
    }
}

//! Recursive-descent parser for Sable.
//!
//! Statements are newline-terminated. Precedence, lowest to highest:
//! equality, additive, multiplicative, unary minus, attribute access.

use crate::ast::{BinOp, Expr, Program, Stmt, UnaryOp};
use crate::error::CompileError;
use crate::lexer::{line_col, tokenize, Span, Token};

/// Parser over a pre-lexed token stream.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

/// Compile source text to a program.
///
/// This is the single lex-then-parse entry point used by the loader.
pub fn compile_source(source: &str) -> Result<Program, CompileError> {
    Parser::new(source)?.parse()
}

impl<'src> Parser<'src> {
    /// Lex `source` and construct a parser over it.
    pub fn new(source: &'src str) -> Result<Self, CompileError> {
        let tokens = tokenize(source)?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    /// Parse a whole program.
    pub fn parse(mut self) -> Result<Program, CompileError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines();
            if self.at_end() {
                break;
            }
            stmts.push(self.statement()?);
            // A statement ends at a newline or at end of input
            if !self.at_end() && !self.eat(&Token::Newline) {
                return Err(self.unexpected("end of line"));
            }
        }
        Ok(Program { stmts })
    }

    fn statement(&mut self) -> Result<Stmt, CompileError> {
        if self.eat(&Token::Import) {
            return self.import_statement();
        }
        // `ident =` starts an assignment; anything else is an expression
        if let Some(Token::Ident(_)) = self.peek() {
            if matches!(self.peek_at(1), Some(Token::Assign)) {
                let name = self.expect_ident()?;
                self.advance(); // consume `=`
                let value = self.expression()?;
                return Ok(Stmt::Assign { name, value });
            }
        }
        Ok(Stmt::Expr(self.expression()?))
    }

    /// Parse the dotted target of an `import` statement.
    fn import_statement(&mut self) -> Result<Stmt, CompileError> {
        let mut target = self.expect_ident()?;
        while self.eat(&Token::Dot) {
            target.push('.');
            target.push_str(&self.expect_ident()?);
        }
        Ok(Stmt::Import { target })
    }

    fn expression(&mut self) -> Result<Expr, CompileError> {
        self.equality()
    }

    fn equality(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.additive()?;
        loop {
            let op = match self.peek() {
                Some(Token::EqEq) => BinOp::Eq,
                Some(Token::BangEq) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let rhs = self.additive()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn additive(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinOp::Add,
                Some(Token::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.multiplicative()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn multiplicative(&mut self) -> Result<Expr, CompileError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinOp::Mul,
                Some(Token::Slash) => BinOp::Div,
                Some(Token::Percent) => BinOp::Rem,
                _ => break,
            };
            self.advance();
            let rhs = self.unary()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, CompileError> {
        if self.eat(&Token::Minus) {
            let operand = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                operand: Box::new(operand),
            });
        }
        self.postfix()
    }

    /// Attribute access chains: `base.attr.attr`.
    fn postfix(&mut self) -> Result<Expr, CompileError> {
        let mut expr = self.primary()?;
        while self.eat(&Token::Dot) {
            let attr = self.expect_ident()?;
            expr = Expr::Attr {
                base: Box::new(expr),
                attr,
            };
        }
        Ok(expr)
    }

    fn primary(&mut self) -> Result<Expr, CompileError> {
        let token = match self.peek() {
            Some(t) => t.clone(),
            None => return Err(self.unexpected("an expression")),
        };
        match token {
            Token::Int(v) => {
                self.advance();
                Ok(Expr::Int(v))
            }
            Token::Float(v) => {
                self.advance();
                Ok(Expr::Float(v))
            }
            Token::Str(s) => {
                self.advance();
                Ok(Expr::Str(s))
            }
            Token::True => {
                self.advance();
                Ok(Expr::Bool(true))
            }
            Token::False => {
                self.advance();
                Ok(Expr::Bool(false))
            }
            Token::None => {
                self.advance();
                Ok(Expr::None)
            }
            Token::Ident(name) => {
                self.advance();
                Ok(Expr::Name(name))
            }
            Token::LParen => {
                self.advance();
                let expr = self.expression()?;
                if !self.eat(&Token::RParen) {
                    return Err(self.unexpected("`)`"));
                }
                Ok(expr)
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    // Token-stream helpers

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn peek_at(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset).map(|(t, _)| t)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_ident(&mut self) -> Result<String, CompileError> {
        match self.peek() {
            Some(Token::Ident(name)) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    fn skip_newlines(&mut self) {
        while self.eat(&Token::Newline) {}
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        let (offset, found) = match self.tokens.get(self.pos) {
            Some((token, span)) => (span.start, format!("{token}")),
            None => (self.source.len(), "end of input".to_string()),
        };
        let (line, col) = line_col(self.source, offset);
        CompileError::Parse {
            line,
            col,
            message: format!("expected {expected}, found {found}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_assignment() {
        let program = compile_source("VALUE = 42").unwrap();
        assert_eq!(
            program.stmts,
            vec![Stmt::Assign {
                name: "VALUE".to_string(),
                value: Expr::Int(42),
            }]
        );
    }

    #[test]
    fn test_parse_import() {
        let program = compile_source("import pkg.sub").unwrap();
        assert_eq!(
            program.stmts,
            vec![Stmt::Import {
                target: "pkg.sub".to_string()
            }]
        );
    }

    #[test]
    fn test_parse_precedence() {
        let program = compile_source("x = 1 + 2 * 3").unwrap();
        assert_eq!(
            program.stmts,
            vec![Stmt::Assign {
                name: "x".to_string(),
                value: Expr::Binary {
                    op: BinOp::Add,
                    lhs: Box::new(Expr::Int(1)),
                    rhs: Box::new(Expr::Binary {
                        op: BinOp::Mul,
                        lhs: Box::new(Expr::Int(2)),
                        rhs: Box::new(Expr::Int(3)),
                    }),
                },
            }]
        );
    }

    #[test]
    fn test_parse_attribute_chain() {
        let program = compile_source("x = a.b.c").unwrap();
        assert_eq!(
            program.stmts,
            vec![Stmt::Assign {
                name: "x".to_string(),
                value: Expr::Attr {
                    base: Box::new(Expr::Attr {
                        base: Box::new(Expr::Name("a".to_string())),
                        attr: "b".to_string(),
                    }),
                    attr: "c".to_string(),
                },
            }]
        );
    }

    #[test]
    fn test_parse_multiple_statements() {
        let program = compile_source("\n\na = 1\n\nb = a + 1\n").unwrap();
        assert_eq!(program.stmts.len(), 2);
    }

    #[test]
    fn test_parse_error_has_position() {
        let err = compile_source("x = 1\ny = =").unwrap_err();
        match err {
            CompileError::Parse { line, message, .. } => {
                assert_eq!(line, 2);
                assert!(message.contains("expected an expression"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_two_statements_on_one_line_rejected() {
        assert!(compile_source("a = 1 b = 2").is_err());
    }

    #[test]
    fn test_import_requires_identifier() {
        assert!(compile_source("import 42").is_err());
    }
}

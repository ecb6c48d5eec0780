//! Lexer for the Sable language.
//!
//! Built on the logos library. Newlines are significant (they terminate
//! statements), so only intra-line whitespace and `#` comments are skipped.

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::error::CompileError;

/// Byte span of a token within the source text.
pub type Span = Range<usize>;

/// Token enum for lexing.
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r]+")]
#[logos(skip r"#[^\n]*")]
pub enum Token {
    // Keywords (must come before identifiers)
    #[token("import")]
    Import,

    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("none")]
    None,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r"[0-9]+\.[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Float(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
    Int(i64),

    #[regex(r#""([^"\\\n]|\\.)*""#, lex_string)]
    Str(String),

    #[token("=")]
    Assign,

    #[token("==")]
    EqEq,

    #[token("!=")]
    BangEq,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token(".")]
    Dot,

    #[token("\n")]
    Newline,
}

/// Unescape the body of a string literal.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            _ => return None,
        }
    }
    Some(out)
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Import => write!(f, "`import`"),
            Token::True => write!(f, "`true`"),
            Token::False => write!(f, "`false`"),
            Token::None => write!(f, "`none`"),
            Token::Ident(name) => write!(f, "identifier `{name}`"),
            Token::Float(v) => write!(f, "float literal `{v}`"),
            Token::Int(v) => write!(f, "integer literal `{v}`"),
            Token::Str(_) => write!(f, "string literal"),
            Token::Assign => write!(f, "`=`"),
            Token::EqEq => write!(f, "`==`"),
            Token::BangEq => write!(f, "`!=`"),
            Token::Plus => write!(f, "`+`"),
            Token::Minus => write!(f, "`-`"),
            Token::Star => write!(f, "`*`"),
            Token::Slash => write!(f, "`/`"),
            Token::Percent => write!(f, "`%`"),
            Token::LParen => write!(f, "`(`"),
            Token::RParen => write!(f, "`)`"),
            Token::Dot => write!(f, "`.`"),
            Token::Newline => write!(f, "end of line"),
        }
    }
}

/// Compute the 1-based line and column of a byte offset.
pub(crate) fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let prefix = &source[..offset.min(source.len())];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let col = offset - prefix.rfind('\n').map(|i| i + 1).unwrap_or(0) + 1;
    (line, col)
}

/// Tokenize source text into spanned tokens.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                let (line, col) = line_col(source, lexer.span().start);
                return Err(CompileError::Lex {
                    line,
                    col,
                    message: format!("unexpected input {:?}", lexer.slice()),
                });
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_assignment_tokens() {
        assert_eq!(
            kinds("x = 42"),
            vec![
                Token::Ident("x".to_string()),
                Token::Assign,
                Token::Int(42)
            ]
        );
    }

    #[test]
    fn test_dotted_import() {
        assert_eq!(
            kinds("import a.b"),
            vec![
                Token::Import,
                Token::Ident("a".to_string()),
                Token::Dot,
                Token::Ident("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_newlines_are_tokens() {
        assert_eq!(
            kinds("x = 1\ny = 2"),
            vec![
                Token::Ident("x".to_string()),
                Token::Assign,
                Token::Int(1),
                Token::Newline,
                Token::Ident("y".to_string()),
                Token::Assign,
                Token::Int(2),
            ]
        );
    }

    #[test]
    fn test_comments_skipped() {
        assert_eq!(
            kinds("# leading comment\nx = 1 # trailing"),
            vec![
                Token::Newline,
                Token::Ident("x".to_string()),
                Token::Assign,
                Token::Int(1),
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#"s = "a\nb\"c""#),
            vec![
                Token::Ident("s".to_string()),
                Token::Assign,
                Token::Str("a\nb\"c".to_string()),
            ]
        );
    }

    #[test]
    fn test_float_vs_int() {
        assert_eq!(kinds("1.5"), vec![Token::Float(1.5)]);
        assert_eq!(kinds("15"), vec![Token::Int(15)]);
    }

    #[test]
    fn test_unexpected_input_positions() {
        let err = tokenize("x = 1\ny = @").unwrap_err();
        match err {
            CompileError::Lex { line, col, .. } => {
                assert_eq!(line, 2);
                assert_eq!(col, 5);
            }
            other => panic!("expected lex error, got {other:?}"),
        }
    }

    #[test]
    fn test_unicode_in_strings() {
        assert_eq!(
            kinds("s = \"инсталляция\""),
            vec![
                Token::Ident("s".to_string()),
                Token::Assign,
                Token::Str("инсталляция".to_string()),
            ]
        );
    }
}

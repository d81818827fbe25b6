//! Recursive-descent POSIX/Bash command line syntax.
//!
//! This crate turns a single command-line string into a span-annotated
//! [`ast::List`]: a lexer ([`lexer`]) producing a flat token stream, and a
//! parser ([`parser`]) building the tree from it. Both stages are
//! synchronous — there is exactly one source string per call and no
//! interactive re-reading, unlike a running shell, so nothing here needs
//! to suspend partway through a line.

pub mod ast;
pub mod lexer;
pub mod parser;
pub mod span;
pub mod token;

pub use ast::List;
pub use lexer::{tokenize, LexError};
pub use parser::{parse, ParseError};
pub use span::Span;

/// Any error that can arise while turning source text into an [`Ast`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span(),
            SyntaxError::Parse(e) => e.span(),
        }
    }
}

/// Lexes and parses `input` into a single top-level [`ast::List`].
pub fn parse_command_line(input: &str) -> Result<ast::List, SyntaxError> {
    let tokens = tokenize(input)?;
    let list = parse(&tokens)?;
    Ok(list)
}

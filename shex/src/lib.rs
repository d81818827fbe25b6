//! The explain API (§6): parses a command line and matches it against a
//! [`Store`], producing one [`MatchGroup`] per shell-level construct and
//! resolved or attempted command.
//!
//! This is the thin top-level crate the other five compose into: parsing
//! ([`shex_syntax`]) feeds matching ([`shex_match`]), which consults
//! whatever [`Store`] the caller brought. The CLI (`shex-cli`) is a
//! separate, illustrative binary target built on top of this library —
//! the production man-page ingestion and HTTP presentation layers stay
//! out of scope.

pub mod args;
#[cfg(feature = "pretty")]
pub mod diagnostic;
pub mod fixtures;

pub use shex_match::{Explanation, MatchGroup, MatchResult};
pub use shex_store::{
    ExpectsArg, InMemoryStore, ManPage, ManPageParagraph, OptionParagraph, Paragraph, Store, StoreError,
};
pub use shex_syntax::{LexError, ParseError, Span, SyntaxError};

/// Anything [`explain`] can fail with: a syntax error while parsing
/// `input`, or the re-promoted [`StoreError::ProgramDoesNotExist`] when
/// the whole input amounted to one unresolvable command with nothing
/// else in it (§4.M.d rule 4, §7).
#[derive(Debug, thiserror::Error)]
pub enum ExplainError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Parses `input` and matches it against `store`, returning the match
/// groups the caller would render as an annotated command line (§6).
///
/// Expansion bookkeeping (§4.M "State" `expansions`) is dropped at this
/// boundary; callers who need it can call [`shex_match::explain`]
/// directly with the parsed [`shex_syntax::ast::List`].
pub fn explain(input: &str, store: &dyn Store) -> Result<Vec<MatchGroup>, ExplainError> {
    let list = shex_syntax::parse_command_line(input)?;
    let explanation = shex_match::explain(&list, input, store)?;
    Ok(explanation.groups)
}

//! The tokenizer.
//!
//! The lexer is a single pass over the input producing a flat token
//! stream; reserved-word recognition is left to the parser, because
//! whether e.g. `if` is a keyword or an ordinary word depends on where it
//! appears, not on its spelling — a reserved word is only a reserved word
//! in command position.

use shex_util::Peekable;

use crate::ast::{Expansion, ExpansionKind};
use crate::span::Span;
use crate::token::{Operator, Paren, RedirOp, Token, TokenKind};

/// A lexical error.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum LexError {
    #[error("unclosed {quote:?} quote starting at byte {}", span.start)]
    UnclosedQuote { quote: char, span: Span },
    #[error("backslash with nothing following it at byte {}", span.start)]
    UnterminatedEscape { span: Span },
    #[error("unclosed `{opener}` starting at byte {}", span.start)]
    UnclosedSubstitution { opener: &'static str, span: Span },
}

impl LexError {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            LexError::UnclosedQuote { span, .. }
            | LexError::UnterminatedEscape { span }
            | LexError::UnclosedSubstitution { span, .. } => *span,
        }
    }
}

const METACHARS: &[char] = &['&', '|', ';', '<', '>'];

fn is_metachar(c: char) -> bool {
    METACHARS.contains(&c)
}

fn is_word_boundary(c: char) -> bool {
    c.is_whitespace() || is_metachar(c) || c == '(' || c == ')'
}

/// The known multi-character operator and redirection spellings, longest
/// first so a greedy prefix match picks the right one.
const MULTI_CHAR_OPS: &[(&str, TokenKind)] = &[
    ("&>>", TokenKind::Redirection(RedirOp::OutErrAppend)),
    ("<<-", TokenKind::Redirection(RedirOp::HereDoc)),
    ("<<<", TokenKind::Redirection(RedirOp::HereString)),
    ("&&", TokenKind::Operator(Operator::AndAnd)),
    ("||", TokenKind::Operator(Operator::OrOr)),
    ("|&", TokenKind::Operator(Operator::PipeAmp)),
    ("<<", TokenKind::Redirection(RedirOp::HereDoc)),
    ("<&", TokenKind::Redirection(RedirOp::DupIn)),
    ("&>", TokenKind::Redirection(RedirOp::OutErr)),
    (">>", TokenKind::Redirection(RedirOp::Append)),
    (">&", TokenKind::Redirection(RedirOp::DupOut)),
];

fn single_char_op(c: char) -> TokenKind {
    match c {
        '&' => TokenKind::Operator(Operator::Amp),
        '|' => TokenKind::Operator(Operator::Pipe),
        ';' => TokenKind::Operator(Operator::Semi),
        '<' => TokenKind::Redirection(RedirOp::In),
        '>' => TokenKind::Redirection(RedirOp::Out),
        _ => unreachable!("metacharacter set is closed"),
    }
}

/// Tokenizes `input` in full, returning every token including a final
/// [`TokenKind::Eof`].
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).run()
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<std::str::CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            chars: Peekable::new(input.char_indices()),
        }
    }

    fn byte_pos(&mut self) -> usize {
        self.chars.peek().map_or(self.input.len(), |&(i, _)| i)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    /// Looks `n` characters ahead of the cursor without consuming anything.
    fn peek_at(&mut self, n: usize) -> Option<char> {
        let pos = self.byte_pos();
        self.input[pos..].chars().nth(n)
    }

    fn run(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let ws_start = self.byte_pos();
            while self.peek_char().is_some_and(char::is_whitespace) {
                self.bump();
            }
            let ws_end = self.byte_pos();
            let preceding_whitespace = self.input[ws_start..ws_end].to_string();

            let start = self.byte_pos();
            let Some(c) = self.peek_char() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    lexeme: String::new(),
                    text: String::new(),
                    preceding_whitespace,
                    span: Span::empty(start),
                });
                break;
            };

            if c == '#' {
                // A `#` starting a word begins a comment that runs to the
                // end of input; it is dropped here rather than tokenized,
                // so it shows up to callers as an unparsed gap.
                while self.peek_char().is_some() {
                    self.bump();
                }
                continue;
            }

            let token = if c == '(' {
                self.bump();
                self.make_simple(TokenKind::Paren(Paren::Open), start, preceding_whitespace)
            } else if c == ')' {
                self.bump();
                self.make_simple(TokenKind::Paren(Paren::Close), start, preceding_whitespace)
            } else if is_metachar(c) && !self.starts_process_substitution(c) {
                self.lex_operator(start, preceding_whitespace)
            } else {
                self.lex_word(start, preceding_whitespace)?
            };
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn make_simple(&mut self, kind: TokenKind, start: usize, preceding_whitespace: String) -> Token {
        let end = self.byte_pos();
        let lexeme = self.input[start..end].to_string();
        Token {
            kind,
            text: lexeme.clone(),
            lexeme,
            preceding_whitespace,
            span: Span::new(start, end),
        }
    }

    /// `<(` / `>(` only start a process substitution when adjacent, the
    /// same way bash requires no space between them.
    fn starts_process_substitution(&mut self, c: char) -> bool {
        (c == '<' || c == '>') && self.peek_at(1) == Some('(')
    }

    /// Matches the longest known operator spelling starting at the
    /// cursor, falling back to a single metacharacter (which is always a
    /// valid operator on its own).
    fn lex_operator(&mut self, start: usize, preceding_whitespace: String) -> Token {
        let rest = &self.input[start..];
        let matched = MULTI_CHAR_OPS.iter().find(|(pat, _)| rest.starts_with(pat));
        let kind = if let Some((pat, kind)) = matched {
            for _ in 0..pat.chars().count() {
                self.bump();
            }
            kind.clone()
        } else {
            let c = self.bump().expect("caller confirmed a character is present");
            single_char_op(c)
        };
        let end = self.byte_pos();
        let lexeme = self.input[start..end].to_string();
        Token {
            kind,
            text: lexeme.clone(),
            lexeme,
            preceding_whitespace,
            span: Span::new(start, end),
        }
    }

    fn lex_word(&mut self, start: usize, preceding_whitespace: String) -> Result<Token, LexError> {
        let mut text = String::new();
        let mut parts = Vec::new();
        let mut at_start = true;
        loop {
            let Some(c) = self.peek_char() else { break };
            if c == '~' && at_start {
                self.lex_tilde(&mut text, &mut parts);
            } else if (c == '<' || c == '>') && self.peek_at(1) == Some('(') {
                self.lex_process_substitution(&mut text, &mut parts)?;
            } else if is_word_boundary(c) {
                break;
            } else if c == '\'' {
                self.lex_single_quoted(&mut text)?;
            } else if c == '"' {
                self.bump();
                self.lex_double_quoted(&mut text, &mut parts)?;
            } else if c == '\\' {
                self.bump();
                match self.bump() {
                    Some(escaped) => text.push(escaped),
                    None => {
                        return Err(LexError::UnterminatedEscape {
                            span: Span::empty(self.byte_pos()),
                        })
                    }
                }
            } else if c == '$' {
                self.lex_dollar(&mut text, &mut parts)?;
            } else if c == '`' {
                self.lex_backtick(&mut text, &mut parts)?;
            } else {
                self.bump();
                text.push(c);
            }
            at_start = false;
        }
        let end = self.byte_pos();
        let lexeme = self.input[start..end].to_string();
        Ok(Token {
            kind: TokenKind::Word,
            lexeme,
            text,
            preceding_whitespace,
            span: Span::new(start, end),
        })
    }

    fn lex_tilde(&mut self, text: &mut String, parts: &mut Vec<Expansion>) {
        let tilde_start = self.byte_pos();
        self.bump();
        text.push('~');
        while self
            .peek_char()
            .is_some_and(|c| !is_word_boundary(c) && c != '/')
        {
            let c = self.bump().unwrap();
            text.push(c);
        }
        let tilde_end = self.byte_pos();
        parts.push(Expansion {
            kind: ExpansionKind::Tilde,
            span: Span::new(tilde_start, tilde_end),
        });
    }

    fn lex_single_quoted(&mut self, text: &mut String) -> Result<(), LexError> {
        let open_at = self.byte_pos();
        self.bump(); // consume opening '
        loop {
            match self.bump() {
                Some('\'') => return Ok(()),
                Some(c) => text.push(c),
                None => {
                    return Err(LexError::UnclosedQuote {
                        quote: '\'',
                        span: Span::empty(open_at),
                    })
                }
            }
        }
    }

    fn lex_double_quoted(&mut self, text: &mut String, parts: &mut Vec<Expansion>) -> Result<(), LexError> {
        let open_at = self.byte_pos() - 1;
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.bump();
                    return Ok(());
                }
                Some('\\') => {
                    self.bump();
                    match self.bump() {
                        Some(c) if matches!(c, '"' | '\\' | '$' | '`') => text.push(c),
                        Some('\n') => {}
                        Some(c) => {
                            text.push('\\');
                            text.push(c);
                        }
                        None => {
                            return Err(LexError::UnterminatedEscape {
                                span: Span::empty(self.byte_pos()),
                            })
                        }
                    }
                }
                Some('$') => self.lex_dollar(text, parts)?,
                Some('`') => self.lex_backtick(text, parts)?,
                Some(c) => {
                    self.bump();
                    text.push(c);
                }
                None => {
                    return Err(LexError::UnclosedQuote {
                        quote: '"',
                        span: Span::empty(open_at),
                    })
                }
            }
        }
    }

    /// Lexes a `$...` expansion: `$(...)`, `${...}`, `$name` or `$1`.
    fn lex_dollar(&mut self, text: &mut String, parts: &mut Vec<Expansion>) -> Result<(), LexError> {
        let dollar_start = self.byte_pos();
        self.bump(); // consume $
        text.push('$');
        match self.peek_char() {
            Some('(') => {
                self.bump();
                text.push('(');
                let mut depth = 1usize;
                loop {
                    match self.bump() {
                        Some('(') => {
                            depth += 1;
                            text.push('(');
                        }
                        Some(')') => {
                            depth -= 1;
                            text.push(')');
                            if depth == 0 {
                                break;
                            }
                        }
                        Some(c) => text.push(c),
                        None => {
                            return Err(LexError::UnclosedSubstitution {
                                opener: "$(",
                                span: Span::empty(dollar_start),
                            })
                        }
                    }
                }
                parts.push(Expansion {
                    kind: ExpansionKind::Substitution,
                    span: Span::new(dollar_start, self.byte_pos()),
                });
            }
            Some('{') => {
                self.bump();
                text.push('{');
                loop {
                    match self.bump() {
                        Some('}') => {
                            text.push('}');
                            break;
                        }
                        Some(c) => text.push(c),
                        None => {
                            return Err(LexError::UnclosedSubstitution {
                                opener: "${",
                                span: Span::empty(dollar_start),
                            })
                        }
                    }
                }
                parts.push(Expansion {
                    kind: ExpansionKind::ParameterNamed,
                    span: Span::new(dollar_start, self.byte_pos()),
                });
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '@' | '*' | '#' | '?' | '$' | '!') => {
                self.bump();
                text.push(c);
                parts.push(Expansion {
                    kind: ExpansionKind::ParameterDigits,
                    span: Span::new(dollar_start, self.byte_pos()),
                });
            }
            Some(c) if c.is_alphabetic() || c == '_' => {
                while self
                    .peek_char()
                    .is_some_and(|c| c.is_alphanumeric() || c == '_')
                {
                    let c = self.bump().unwrap();
                    text.push(c);
                }
                parts.push(Expansion {
                    kind: ExpansionKind::ParameterNamed,
                    span: Span::new(dollar_start, self.byte_pos()),
                });
            }
            _ => {
                // A bare `$` with nothing recognizable after it is just a
                // literal dollar sign.
            }
        }
        Ok(())
    }

    fn lex_backtick(&mut self, text: &mut String, parts: &mut Vec<Expansion>) -> Result<(), LexError> {
        let start = self.byte_pos();
        self.bump();
        text.push('`');
        loop {
            match self.bump() {
                Some('`') => {
                    text.push('`');
                    break;
                }
                Some('\\') => {
                    text.push('\\');
                    if let Some(c) = self.bump() {
                        text.push(c);
                    }
                }
                Some(c) => text.push(c),
                None => {
                    return Err(LexError::UnclosedSubstitution {
                        opener: "`",
                        span: Span::empty(start),
                    })
                }
            }
        }
        parts.push(Expansion {
            kind: ExpansionKind::Substitution,
            span: Span::new(start, self.byte_pos()),
        });
        Ok(())
    }

    /// Lexes `<(...)` or `>(...)` as a single word containing one
    /// substitution expansion, the same way command substitution is
    /// handled.
    fn lex_process_substitution(&mut self, text: &mut String, parts: &mut Vec<Expansion>) -> Result<(), LexError> {
        let start = self.byte_pos();
        let opener_char = self.bump().unwrap(); // '<' or '>'
        text.push(opener_char);
        self.bump(); // '('
        text.push('(');
        let opener: &'static str = if opener_char == '<' { "<(" } else { ">(" };
        let mut depth = 1usize;
        loop {
            match self.bump() {
                Some('(') => {
                    depth += 1;
                    text.push('(');
                }
                Some(')') => {
                    depth -= 1;
                    text.push(')');
                    if depth == 0 {
                        break;
                    }
                }
                Some(c) => text.push(c),
                None => {
                    return Err(LexError::UnclosedSubstitution {
                        opener,
                        span: Span::empty(start),
                    })
                }
            }
        }
        parts.push(Expansion {
            kind: ExpansionKind::Substitution,
            span: Span::new(start, self.byte_pos()),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind.clone()).collect()
    }

    #[test]
    fn tokenizes_simple_pipeline() {
        let tokens = tokenize("ls -l | grep foo").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Operator(Operator::Pipe),
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[0].text, "ls");
        assert_eq!(tokens[1].text, "-l");
    }

    #[test]
    fn recognizes_and_and_and_here_doc() {
        let tokens = tokenize("a && b <<EOF").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Operator(Operator::AndAnd),
                TokenKind::Word,
                TokenKind::Redirection(RedirOp::HereDoc),
                TokenKind::Word,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn single_quotes_are_literal() {
        let tokens = tokenize("echo 'a $b `c`'").unwrap();
        assert_eq!(tokens[1].text, "a $b `c`");
        assert!(matches!(tokens[1].kind, TokenKind::Word));
    }

    #[test]
    fn double_quotes_still_expand_parameters() {
        let tokens = tokenize("echo \"$HOME/bin\"").unwrap();
        assert_eq!(tokens[1].text, "$HOME/bin");
    }

    #[test]
    fn unclosed_single_quote_is_an_error() {
        let err = tokenize("echo 'unterminated").unwrap_err();
        assert!(matches!(err, LexError::UnclosedQuote { quote: '\'', .. }));
    }

    #[test]
    fn dup_out_redirection_is_recognized() {
        let tokens = tokenize("cmd 2>&1").unwrap();
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Word,
                TokenKind::Word,
                TokenKind::Redirection(RedirOp::DupOut),
                TokenKind::Word,
                TokenKind::Eof,
            ]
        );
        assert_eq!(tokens[2].preceding_whitespace, "");
    }

    #[test]
    fn process_substitution_is_kept_as_one_word() {
        let tokens = tokenize("diff <(sort a) <(sort b)").unwrap();
        assert_eq!(tokens[1].kind, TokenKind::Word);
        assert!(tokens[1].text.starts_with("<(sort a)"));
    }
}

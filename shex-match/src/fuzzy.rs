//! Fuzzy short-option splitting: a word that doesn't match any single
//! documented flag is split character by character and each character is
//! looked up as its own short option.

use shex_store::ManPage;

use crate::state::OptionMemo;

/// One piece of a fuzzy-split word.
#[derive(Clone, Debug)]
pub struct FuzzyPiece {
    /// Byte offset relative to the start of the word being split.
    pub offset: usize,
    pub len: usize,
    pub text: Option<String>,
}

/// The result of attempting a fuzzy split.
pub struct FuzzyResult {
    pub pieces: Vec<FuzzyPiece>,
    /// The option matched by the last piece, if it expects an argument —
    /// carried forward so the next word can be merged into it (§4.M.b rule
    /// 4).
    pub trailing_option: Option<OptionMemo>,
}

impl FuzzyResult {
    #[must_use]
    pub fn all_known(&self) -> bool {
        !self.pieces.is_empty() && self.pieces.iter().all(|p| p.text.is_some())
    }
}

/// Splits `word` into single-character short-option tokens and resolves
/// each one against `manpage`.
///
/// When `dashed`, the first token is the leading `-` plus the character
/// after it (e.g. `-x` out of `-xzvf`); every later token is a single bare
/// character reinterpreted as `-<char>`. Whenever a token other than the
/// last one matches an option that expects an argument, the rest of the
/// word from that point on is consumed as that argument in one piece and
/// splitting stops there.
///
/// When not `dashed`, every character (including the first) is its own
/// token, with no such short-circuit — this is the no-leading-dash mode
/// used for `partial_match` pages like `tar xzvf`.
#[must_use]
pub fn attempt_fuzzy(word: &str, manpage: &ManPage, dashed: bool) -> FuzzyResult {
    let chars: Vec<char> = word.chars().collect();
    if chars.is_empty() {
        return FuzzyResult { pieces: Vec::new(), trailing_option: None };
    }

    let mut tokens: Vec<String> = Vec::new();
    if dashed {
        let first_len = 2.min(chars.len());
        tokens.push(chars[..first_len].iter().collect());
        for c in &chars[first_len..] {
            tokens.push(c.to_string());
        }
    } else {
        for c in &chars {
            tokens.push(c.to_string());
        }
    }

    let mut pieces = Vec::new();
    let mut trailing_option = None;
    let mut offset = 0usize;
    for tok in &tokens {
        let op = if tok.starts_with('-') { tok.clone() } else { format!("-{tok}") };
        let byte_len = tok.len();
        match manpage.find_option(&op) {
            Some(opt) => {
                let memo = OptionMemo::from(opt);
                if dashed && memo.expects_arg.is_some() && offset + byte_len < word.len() {
                    pieces.push(FuzzyPiece {
                        offset,
                        len: word.len() - offset,
                        text: Some(opt.paragraph.clean_text()),
                    });
                    return FuzzyResult { pieces, trailing_option: None };
                }
                trailing_option = if memo.expects_arg.is_some() { Some(memo) } else { None };
                pieces.push(FuzzyPiece {
                    offset,
                    len: byte_len,
                    text: Some(opt.paragraph.clean_text()),
                });
            }
            None => {
                trailing_option = None;
                pieces.push(FuzzyPiece { offset, len: byte_len, text: None });
            }
        }
        offset += byte_len;
    }
    FuzzyResult { pieces, trailing_option }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shex_store::{ManPageParagraph, OptionParagraph, Paragraph};

    fn page_with_options(opts: &[(&str, bool)]) -> ManPage {
        let mut paragraphs = Vec::new();
        for (flag, expects_arg) in opts {
            paragraphs.push(ManPageParagraph::Option(OptionParagraph {
                paragraph: Paragraph::new(0, format!("{flag}  does a thing"), "1", true),
                short: vec![(*flag).to_string()],
                long: Vec::new(),
                expects_arg: if *expects_arg {
                    shex_store::ExpectsArg::Any
                } else {
                    shex_store::ExpectsArg::No
                },
                argument: None,
                nested_command: None,
            }));
        }
        ManPage {
            source: "fixture.1".to_string(),
            name: "fixture".to_string(),
            synopsis: None,
            paragraphs,
            aliases: Vec::new(),
            partial_match: false,
            multicommand: false,
            nested_command: false,
        }
    }

    #[test]
    fn splits_each_short_flag_into_its_own_piece() {
        let page = page_with_options(&[("-x", false), ("-z", false), ("-v", false), ("-f", true)]);
        let result = attempt_fuzzy("-xzvf", &page, true);
        assert_eq!(result.pieces.len(), 4);
        assert!(result.all_known());
        assert!(result.trailing_option.is_some());
    }

    #[test]
    fn first_token_expecting_arg_consumes_the_remainder() {
        let page = page_with_options(&[("-r", true)]);
        let result = attempt_fuzzy("-rbig.tar", &page, true);
        assert_eq!(result.pieces.len(), 1);
        assert_eq!(result.pieces[0].len, "-rbig.tar".len());
        assert!(result.trailing_option.is_none());
    }

    #[test]
    fn unknown_characters_are_reported_individually() {
        let page = page_with_options(&[("-e", false)]);
        let result = attempt_fuzzy("-en", &page, true);
        assert_eq!(result.pieces.len(), 2);
        assert!(result.pieces[0].text.is_some());
        assert!(result.pieces[1].text.is_none());
    }

    #[test]
    fn mid_token_expecting_arg_consumes_the_remainder() {
        let page = page_with_options(&[("-r", false), ("-n", true)]);
        let result = attempt_fuzzy("-r0n1", &page, true);
        assert_eq!(result.pieces.len(), 3);
        assert_eq!(result.pieces[0].text.as_deref(), Some("-r  does a thing"));
        assert!(result.pieces[1].text.is_none());
        assert_eq!(result.pieces[2].offset, 3);
        assert_eq!(result.pieces[2].len, 2);
        assert!(result.trailing_option.is_none());
    }

    #[test]
    fn non_dashed_mode_splits_every_character() {
        let mut page = page_with_options(&[("-x", false), ("-z", false), ("-v", false), ("-f", true)]);
        page.partial_match = true;
        let result = attempt_fuzzy("xzvf", &page, false);
        assert_eq!(result.pieces.len(), 4);
        assert!(result.all_known());
    }
}

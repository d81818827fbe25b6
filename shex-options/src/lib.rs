//! Extracts the option flags documented by a man page's `OPTIONS`
//! paragraphs (§4.O).
//!
//! A paragraph's cleaned text is scanned greedily from the start: each
//! match consumes one option spelling and its optional argument
//! placeholder, then the scan resumes after the separator between
//! options (`,`, `|`, `or`, or plain whitespace). When the primary
//! pattern can't match anything at all, a second, looser pattern picks
//! up option styles that don't start with `-`, like `dd`'s `bs=BYTES`.

use std::sync::OnceLock;

use regex::Regex;

/// One flag spelling found in an option paragraph, with whether it takes
/// an argument.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExtractedOption {
    pub flag: String,
    pub expects_arg: bool,
}

impl ExtractedOption {
    fn new(flag: impl Into<String>, expects_arg: bool) -> Self {
        ExtractedOption {
            flag: flag.into(),
            expects_arg,
        }
    }
}

fn opt_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^(?P<opt>--?(?:\?|\#|(?:\w+-)*\w+))
            (?:
                [ \t]*=?[ \t]*(?P<open>[<\[])[ \t]*=?[ \t]*(?P<barg>[^\]>]+)(?P<close>[\]>])
                |
                [ \t]*=[ \t]*(?P<aarg>[-a-zA-Z]+)
                |
                [ \t]+(?P<uarg>[A-Z]+)
            )?
            (?P<ending>,[ \t]*|[ \t]+|/|\||\z)
            ",
        )
        .expect("opt_re is a fixed, valid pattern")
    })
}

fn flag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^(?P<opt>\w+)
            [ \t]*=[ \t]*(?P<arg>\w+)
            (?:,[ \t]*|[ \t]+|\z)
            ",
        )
        .expect("flag_re is a fixed, valid pattern")
    })
}

fn eat_between_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[ \t]*(?:or|,|\|)[ \t]*").expect("eat_between_re is a fixed, valid pattern"))
}

fn eat_between(text: &str, pos: usize) -> usize {
    match eat_between_re().find(&text[pos..]) {
        Some(m) => pos + m.end(),
        None => pos,
    }
}

/// Extracts the short (`-a`) and long (`--all`) option spellings from one
/// cleaned option paragraph, in that order.
///
/// Returns two empty vectors if nothing recognizable as an option was
/// found; callers treat that as "extraction failed" for this paragraph.
#[must_use]
pub fn extract_option(text: &str) -> (Vec<ExtractedOption>, Vec<ExtractedOption>) {
    let startpos = text.len() - text.trim_start().len();
    let mut pos = startpos;
    let mut short = Vec::new();
    let mut long = Vec::new();

    let mut m = opt_re().captures(&text[pos..]);
    while let Some(caps) = m {
        let opt = &caps["opt"];
        let arg = caps
            .name("barg")
            .or_else(|| caps.name("aarg"))
            .or_else(|| caps.name("uarg"))
            .map(|m| m.as_str());
        let expects_arg = arg.is_some();
        let flag = ExtractedOption::new(opt, expects_arg);
        if opt.starts_with("--") {
            long.push(flag);
        } else {
            short.push(flag);
        }

        let match_end = pos + caps.get(0).unwrap().end();
        let ending = &caps["ending"];
        pos = eat_between(text, match_end);

        if ending == "|" {
            m = opt_re().captures(&text[pos..]);
            if m.is_none() {
                // A run of bare `|`-separated short flags with no
                // recognizable trailing option, e.g. "-x|-y|-z".
                let mut cursor = pos;
                let mut piece_start = pos;
                let bytes = text.as_bytes();
                while cursor < text.len() && !text[cursor..].starts_with(char::is_whitespace) {
                    if bytes[cursor] == b'|' {
                        short.push(ExtractedOption::new(&text[piece_start..cursor], false));
                        piece_start = cursor + 1;
                    }
                    cursor += 1;
                }
                let leftover = &text[piece_start..cursor];
                if !leftover.is_empty() {
                    short.push(ExtractedOption::new(leftover, false));
                }
                pos = cursor;
            }
        } else {
            m = opt_re().captures(&text[pos..]);
        }
    }

    if pos == startpos {
        let mut m = flag_re().captures(&text[pos..]);
        while let Some(caps) = m {
            let opt = &caps["opt"];
            let arg = &caps["arg"];
            long.push(ExtractedOption::new(opt, !arg.is_empty()));
            let match_end = pos + caps.get(0).unwrap().end();
            pos = eat_between(text, match_end);
            m = flag_re().captures(&text[pos..]);
        }
    }

    (short, long)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_short_and_long_flags() {
        let (short, long) = extract_option("-a, --all    do not ignore entries starting with .");
        assert_eq!(short, vec![ExtractedOption::new("-a", false)]);
        assert_eq!(long, vec![ExtractedOption::new("--all", false)]);
    }

    #[test]
    fn flags_an_option_that_expects_an_argument() {
        let (short, long) = extract_option("-o, --output=FILE    write result to FILE");
        assert_eq!(short, vec![ExtractedOption::new("-o", false)]);
        assert_eq!(long[0].flag, "--output");
        assert!(long[0].expects_arg);
    }

    #[test]
    fn recognizes_bracketed_optional_argument() {
        let (short, _long) = extract_option("-i[SUFFIX]  edit files in place");
        assert_eq!(short[0].flag, "-i");
        assert!(short[0].expects_arg);
    }

    #[test]
    fn falls_back_to_flag_regex_for_bare_assignments() {
        let (short, long) = extract_option("bs=BYTES    read and write up to BYTES at a time");
        assert!(short.is_empty());
        assert_eq!(long[0].flag, "bs");
        assert!(long[0].expects_arg);
    }

    #[test]
    fn walks_bar_separated_flags_when_the_trailing_piece_has_no_dash() {
        let (short, _long) = extract_option("-x|-y|z    one of three mutually exclusive modes");
        let flags: Vec<&str> = short.iter().map(|o| o.flag.as_str()).collect();
        assert_eq!(flags, vec!["-x", "-y", "z"]);
    }

    #[test]
    fn returns_nothing_for_unrecognizable_text() {
        let (short, long) = extract_option("this paragraph has no options in it at all");
        assert!(short.is_empty() && long.is_empty());
    }
}

//! Matches a parsed command line against man pages and static shell help
//! text, producing span-annotated explanations (§4.M).
//!
//! [`explain`] is the single entry point: it walks the tree built by
//! `shex_syntax::parse_command_line`, consulting a
//! [`Store`](shex_store::Store) for program lookups, then finalizes the
//! spans it collected into the groups the caller sees.

mod finalize;
mod fuzzy;
mod result;
mod state;
mod visit;

pub use result::{Explanation, MatchGroup, MatchResult};

use shex_store::{Store, StoreError};
use shex_syntax::ast::List;

use visit::Matcher;

/// Walks `list` (the parse of some input string `input`) and returns the
/// match groups and expansions found, or the re-promoted
/// [`StoreError::ProgramDoesNotExist`] when `list` was exactly one
/// unresolvable command with nothing else in it (§4.M.d rule 4).
pub fn explain(list: &List, input: &str, store: &dyn Store) -> Result<Explanation, StoreError> {
    let (state, fatal) = Matcher::new(store).run(list);
    if let Some(err) = fatal {
        return Err(err);
    }
    let expansions = state.expansions.clone();
    let groups = finalize::finalize(state, input);
    Ok(Explanation { groups, expansions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shex_store::{ExpectsArg, InMemoryStore, ManPage, ManPageParagraph, OptionParagraph, Paragraph};
    use shex_syntax::parse_command_line;

    fn opt(flag: &str, text: &str, expects_arg: ExpectsArg, nested_command: Option<Vec<String>>) -> ManPageParagraph {
        ManPageParagraph::Option(OptionParagraph {
            paragraph: Paragraph::new(0, text, "1", true),
            short: vec![flag.to_string()],
            long: Vec::new(),
            expects_arg,
            argument: None,
            nested_command,
        })
    }

    fn page(name: &str, source: &str, synopsis: &str) -> ManPage {
        ManPage {
            source: source.to_string(),
            name: name.to_string(),
            synopsis: Some(synopsis.to_string()),
            paragraphs: Vec::new(),
            aliases: Vec::new(),
            partial_match: false,
            multicommand: false,
            nested_command: false,
        }
    }

    fn explain_str(input: &str, store: &InMemoryStore) -> Explanation {
        let list = parse_command_line(input).unwrap();
        explain(&list, input, store).unwrap()
    }

    #[test]
    fn echo_en_splits_into_two_flag_spans() {
        let mut echo = page("echo", "echo.1.gz", "echo - display a line of text");
        echo.paragraphs.push(opt("-e", "-e  enable backslash escapes", ExpectsArg::No, None));
        echo.paragraphs.push(opt("-n", "-n  do not output a trailing newline", ExpectsArg::No, None));
        let mut store = InMemoryStore::new();
        store.insert(echo);

        let explanation = explain_str("echo -en foo", &store);
        let command = &explanation.groups[1];
        assert_eq!(command.results.len(), 4);
        assert_eq!(command.results[0].matched, "echo");
        assert_eq!(command.results[1].matched, "-e");
        assert_eq!(command.results[2].matched, "n");
        assert!(command.results[3].text.is_none());
        assert_eq!(command.results[3].matched, "foo");
    }

    #[test]
    fn find_exec_opens_a_nested_command_group_for_grep() {
        let mut find = page("find", "find.1.gz", "find - search for files");
        find.paragraphs.push(opt("-name", "-name PATTERN  base of file name matches PATTERN", ExpectsArg::Any, None));
        find.paragraphs.push(opt(
            "-exec",
            "-exec COMMAND ;  run COMMAND",
            ExpectsArg::Any,
            Some(vec![";".to_string()]),
        ));
        let grep = page("grep", "grep.1.gz", "grep - print lines matching a pattern");
        let mut store = InMemoryStore::new();
        store.insert(find);
        store.insert(grep);

        let explanation = explain_str("find . -name '*.c' -exec grep foo {} ';'", &store);
        assert_eq!(explanation.groups.len(), 3);
        assert_eq!(explanation.groups[1].name, "command0");
        assert_eq!(explanation.groups[2].name, "command1");

        let find_group = &explanation.groups[1];
        assert!(find_group.results.iter().any(|r| r.matched == "-exec"));
        let terminator = find_group.results.iter().find(|r| r.matched == "';'").unwrap();
        assert!(terminator.text.is_some());

        let grep_group = &explanation.groups[2];
        assert_eq!(grep_group.results[0].matched, "grep");
    }

    #[test]
    fn unknown_program_alone_is_a_fatal_error() {
        let store = InMemoryStore::new();
        let list = parse_command_line("totallyunknownprogram").unwrap();
        let err = explain(&list, "totallyunknownprogram", &store).unwrap_err();
        assert!(matches!(err, StoreError::ProgramDoesNotExist { .. }));
    }

    #[test]
    fn unknown_program_in_a_pipeline_stays_non_fatal() {
        let echo = page("echo", "echo.1.gz", "echo - display a line of text");
        let mut store = InMemoryStore::new();
        store.insert(echo);

        let explanation = explain_str("echo hi | nope", &store);
        assert_eq!(explanation.groups.len(), 3);
        assert!(explanation.groups[2].manpage.is_none());
    }

    #[test]
    fn repeated_flags_merge_into_one_span() {
        let mut foo = page("foo", "foo.1.gz", "foo - an example program");
        foo.paragraphs.push(opt("-v", "-v  be verbose", ExpectsArg::No, None));
        let mut store = InMemoryStore::new();
        store.insert(foo);

        let explanation = explain_str("foo -v -v -v", &store);
        let command = &explanation.groups[1];
        assert_eq!(command.results.len(), 2);
        assert_eq!(command.results[1].matched, "-v -v -v");
    }

    #[test]
    fn trailing_comment_is_a_single_span() {
        let echo = page("echo", "echo.1.gz", "echo - display a line of text");
        let mut store = InMemoryStore::new();
        store.insert(echo);

        let explanation = explain_str("echo hi # say hi", &store);
        let comment = explanation.groups[0].results.iter().find(|r| r.matched.starts_with('#')).unwrap();
        assert_eq!(comment.matched, "# say hi");
    }
}

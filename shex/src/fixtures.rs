//! A small bundled set of man pages, used by `shex-cli` so the binary has
//! something to explain against without wiring up a real man-page
//! database, and reused by the integration tests under `tests/`.
//!
//! This is illustrative data, not a real man-page corpus: each page only
//! documents the handful of options the bundled examples actually use.

use shex_store::{InMemoryStore, ManPage, ManPageParagraph, OptionParagraph, Paragraph};

fn option(idx: usize, text: &str, argument: Option<&str>, nested_command: Option<Vec<&str>>) -> ManPageParagraph {
    let paragraph = Paragraph::new(idx, text, "1", true);
    let mut opt = OptionParagraph::extract(paragraph)
        .unwrap_or_else(|| panic!("fixture paragraph {idx:?} ({text:?}) does not extract any option"));
    opt.argument = argument.map(str::to_string);
    opt.nested_command = nested_command.map(|words| words.into_iter().map(str::to_string).collect());
    ManPageParagraph::Option(opt)
}

fn plain(idx: usize, text: &str) -> ManPageParagraph {
    ManPageParagraph::Plain(Paragraph::new(idx, text, "1", false))
}

/// Builds the bundled fixture store.
///
/// Covers every program named in the end-to-end scenarios: `echo`,
/// `tar`, `find`, `grep`, `cat`, and `xargs`.
#[must_use]
pub fn bundled() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    store.insert(echo());
    store.insert(tar());
    store.insert(find());
    store.insert(grep());
    store.insert(cat());
    store.insert(xargs());
    store
}

fn echo() -> ManPage {
    ManPage {
        source: "echo.1.gz".to_string(),
        name: "echo".to_string(),
        synopsis: Some("echo - display a line of text".to_string()),
        paragraphs: vec![
            plain(0, "Echoes the given arguments, separated by single spaces."),
            option(1, "-e     enable interpretation of backslash escapes", None, None),
            option(2, "-n     do not output the trailing newline", None, None),
        ],
        aliases: Vec::new(),
        partial_match: false,
        multicommand: false,
        nested_command: false,
    }
}

fn tar() -> ManPage {
    ManPage {
        source: "tar.1.gz".to_string(),
        name: "tar".to_string(),
        synopsis: Some("tar - an archiving utility".to_string()),
        paragraphs: vec![
            option(0, "-x, --extract      extract files from an archive", None, None),
            option(1, "-z, --gzip         filter the archive through gzip", None, None),
            option(2, "-v, --verbose      verbosely list files processed", None, None),
            option(3, "-f, --file=ARCHIVE use archive file ARCHIVE", Some("ARCHIVE"), None),
        ],
        aliases: Vec::new(),
        // Single-letter options may be bundled without their own `-`, e.g. `xzvf`.
        partial_match: true,
        multicommand: false,
        nested_command: false,
    }
}

fn find() -> ManPage {
    ManPage {
        source: "find.1.gz".to_string(),
        name: "find".to_string(),
        synopsis: Some("find - search for files in a directory hierarchy".to_string()),
        paragraphs: vec![
            option(0, "-name PATTERN   base of file name matches shell PATTERN", Some("PATTERN"), None),
            option(
                1,
                "-exec COMMAND ;  run COMMAND; true if 0 status is returned",
                None,
                Some(vec![";"]),
            ),
        ],
        aliases: Vec::new(),
        partial_match: false,
        multicommand: false,
        nested_command: true,
    }
}

fn grep() -> ManPage {
    ManPage {
        source: "grep.1.gz".to_string(),
        name: "grep".to_string(),
        synopsis: Some("grep - print lines that match patterns".to_string()),
        paragraphs: vec![option(0, "-i, --ignore-case   ignore case distinctions", None, None)],
        aliases: Vec::new(),
        partial_match: false,
        multicommand: false,
        nested_command: false,
    }
}

fn cat() -> ManPage {
    ManPage {
        source: "cat.1.gz".to_string(),
        name: "cat".to_string(),
        synopsis: Some("cat - concatenate files and print on the standard output".to_string()),
        paragraphs: vec![option(0, "-n, --number   number all output lines", None, None)],
        aliases: Vec::new(),
        partial_match: false,
        multicommand: false,
        nested_command: false,
    }
}

fn xargs() -> ManPage {
    ManPage {
        source: "xargs.1.gz".to_string(),
        name: "xargs".to_string(),
        synopsis: Some("xargs - build and execute command lines from standard input".to_string()),
        paragraphs: vec![
            option(0, "-r, --no-run-if-empty   do not run COMMAND if stdin is empty", None, None),
            option(1, "-0, --null              input items are null-terminated", None, None),
            option(2, "-n NUM                  use at most NUM arguments per command line", Some("NUM"), None),
        ],
        aliases: Vec::new(),
        partial_match: false,
        multicommand: false,
        nested_command: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shex_store::Store;

    #[test]
    fn bundled_store_resolves_every_named_program() {
        let store = bundled();
        for name in ["echo", "tar", "find", "grep", "cat", "xargs"] {
            assert!(store.find_man_page(name).is_ok(), "{name} should resolve");
        }
    }

    #[test]
    fn find_exec_declares_its_terminator() {
        let store = bundled();
        let find = &store.find_man_page("find").unwrap()[0];
        let exec = find.find_option("-exec").unwrap();
        assert_eq!(exec.nested_command.as_deref(), Some(&[";".to_string()][..]));
    }
}

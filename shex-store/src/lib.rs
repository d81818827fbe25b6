//! The man-page data model and the [`Store`] trait the matcher queries
//! it through (§4.S).
//!
//! A [`Store`] implementation is free to back itself with whatever it
//! likes — a database, a bundled data file, a test fixture — as long as
//! it can answer [`Store::find_man_page`]. [`InMemoryStore`] is the
//! reference implementation, used by the CLI and the test suite.

use std::collections::HashMap;
use std::sync::Arc;

use shex_options::extract_option;

/// A single paragraph of man-page text, ending at a blank line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Paragraph {
    pub idx: usize,
    pub text: String,
    pub section: String,
    pub is_option: bool,
}

impl Paragraph {
    #[must_use]
    pub fn new(idx: usize, text: impl Into<String>, section: impl Into<String>, is_option: bool) -> Self {
        Paragraph {
            idx,
            text: text.into(),
            section: section.into(),
            is_option,
        }
    }

    /// Strips markup left over from the source man page (`<b>`-style tags
    /// and HTML entities), the way a paragraph's text is cleaned before
    /// being shown as an explanation.
    #[must_use]
    pub fn clean_text(&self) -> String {
        strip_tags(&self.text).replace("&lt;", "<").replace("&gt;", ">")
    }
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

/// Whether an option takes an argument, and, if so, whether the argument
/// is restricted to an enumerated set of values (§3 `Option.expects_arg:
/// bool|[string]`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExpectsArg {
    /// The option takes no argument.
    No,
    /// The option takes an argument, with no restriction on its value.
    Any,
    /// The option takes an argument, and only these values are accepted.
    Values(Vec<String>),
}

impl ExpectsArg {
    #[must_use]
    pub fn is_some(&self) -> bool {
        !matches!(self, ExpectsArg::No)
    }

    /// Whether `value` is an acceptable argument: always true unless a
    /// value list was declared, in which case `value` must appear in it.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ExpectsArg::No | ExpectsArg::Any => true,
            ExpectsArg::Values(values) => values.iter().any(|v| v == value),
        }
    }
}

/// A paragraph that documents one or more command-line flags (§3
/// `Option`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OptionParagraph {
    pub paragraph: Paragraph,
    pub short: Vec<String>,
    pub long: Vec<String>,
    pub expects_arg: ExpectsArg,
    /// When set, this option's argument is documented as accepting a
    /// positional argument group named by this string (e.g. `tar`'s
    /// `FILE` argument, shared across `-f`/`--file`); `ManPage::arguments`
    /// groups paragraphs by this field.
    pub argument: Option<String>,
    /// When set, the argument(s) following this flag start a nested
    /// command (§3 `Option.nested_cmd: bool|[string]`), as with `find
    /// -exec`. An empty vector means the nested command runs unterminated
    /// (no declared terminator word); a non-empty vector lists the words
    /// that end it.
    pub nested_command: Option<Vec<String>>,
}

impl OptionParagraph {
    /// All flags this paragraph documents, short before long, in the
    /// order they were extracted.
    #[must_use]
    pub fn flags(&self) -> impl Iterator<Item = &str> {
        self.short.iter().chain(self.long.iter()).map(String::as_str)
    }

    /// Runs the option extractor over `paragraph`'s cleaned text,
    /// returning `None` if nothing recognizable as an option was found
    /// (the paragraph is kept as a plain [`Paragraph`] in that case).
    #[must_use]
    pub fn extract(paragraph: Paragraph) -> Option<Self> {
        let (short, long) = extract_option(&paragraph.clean_text());
        if short.is_empty() && long.is_empty() {
            return None;
        }
        let expects_arg = if short.iter().chain(long.iter()).any(|o| o.expects_arg) {
            ExpectsArg::Any
        } else {
            ExpectsArg::No
        };
        Some(OptionParagraph {
            paragraph,
            short: short.into_iter().map(|o| o.flag).collect(),
            long: long.into_iter().map(|o| o.flag).collect(),
            expects_arg,
            argument: None,
            nested_command: None,
        })
    }
}

/// Either kind of paragraph a man page's body is made of.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ManPageParagraph {
    Plain(Paragraph),
    Option(OptionParagraph),
}

impl ManPageParagraph {
    #[must_use]
    pub fn as_option(&self) -> Option<&OptionParagraph> {
        match self {
            ManPageParagraph::Option(o) => Some(o),
            ManPageParagraph::Plain(_) => None,
        }
    }
}

/// A fully processed man page (§3 `ManPage`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ManPage {
    /// The path or identifier of the underlying man-page source, e.g.
    /// `tar.1.gz`.
    pub source: String,
    pub name: String,
    pub synopsis: Option<String>,
    pub paragraphs: Vec<ManPageParagraph>,
    /// Alternate names this page is also known by.
    pub aliases: Vec<String>,
    /// Whether an unprefixed word (no leading `-`) may still be
    /// interpreted as one of this page's options.
    pub partial_match: bool,
    /// Whether this program has sub-commands of its own worth
    /// recognizing (e.g. `git commit`).
    pub multicommand: bool,
    pub nested_command: bool,
}

impl ManPage {
    #[must_use]
    pub fn options(&self) -> impl Iterator<Item = &OptionParagraph> {
        self.paragraphs.iter().filter_map(ManPageParagraph::as_option)
    }

    /// Looks up an option by exact flag spelling.
    #[must_use]
    pub fn find_option(&self, flag: &str) -> Option<&OptionParagraph> {
        self.options().find(|o| o.flags().any(|f| f == flag))
    }

    /// Groups options that share an `argument` field, keyed by that
    /// field, in first-insertion order.
    #[must_use]
    pub fn arguments(&self) -> Vec<(String, Vec<&OptionParagraph>)> {
        let mut order = Vec::new();
        let mut groups: HashMap<&str, Vec<&OptionParagraph>> = HashMap::new();
        for opt in self.options() {
            let Some(key) = opt.argument.as_deref() else { continue };
            if !groups.contains_key(key) {
                order.push(key);
            }
            groups.entry(key).or_default().push(opt);
        }
        order
            .into_iter()
            .map(|key| (key.to_string(), groups.remove(key).unwrap_or_default()))
            .collect()
    }

    #[must_use]
    pub fn name_section(&self) -> String {
        format!("{}({})", self.name, self.section())
    }

    /// The section number parsed out of `source`, e.g. `"1"` for
    /// `tar.1.gz`.
    #[must_use]
    pub fn section(&self) -> String {
        name_section(&self.source).1
    }
}

/// Splits a man-page source filename into `(name, section)`, e.g.
/// `tar.1.gz` -> `("tar", "1")`.
#[must_use]
pub fn name_section(source: &str) -> (String, String) {
    let trimmed = source.strip_suffix(".gz").unwrap_or(source);
    match trimmed.rsplit_once('.') {
        Some((name, section)) => (name.to_string(), section.to_string()),
        None => (trimmed.to_string(), String::new()),
    }
}

/// An error looking up a program in a [`Store`].
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("no man page found for program {name:?}")]
    ProgramDoesNotExist { name: String },
}

/// Looks man pages up by program name (§4.S).
///
/// Implementations must be `Send + Sync`: the explain API makes no
/// promise about which thread a request runs on (§5).
pub trait Store: Send + Sync {
    /// Finds the man page(s) matching `name`.
    ///
    /// On success, the first element is the best match, fully populated
    /// with its options; any further elements are suggestions that also
    /// matched `name` ambiguously, populated with name/source only.
    ///
    /// `name` may carry an explicit section suffix (`tar.1`), in which
    /// case only a man page in that section is accepted.
    fn find_man_page(&self, name: &str) -> Result<Vec<Arc<ManPage>>, StoreError>;
}

/// A scored alias pointing at a man page: the canonical name scores
/// higher than any other alias, so an ambiguous lookup prefers the page
/// whose canonical name matches over one that only lists it as an alias.
const CANONICAL_SCORE: u32 = 10;
const ALIAS_SCORE: u32 = 1;

/// A simple in-process [`Store`] backed by a fixed set of man pages, used
/// by the CLI and by tests.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    pages: Vec<Arc<ManPage>>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        InMemoryStore { pages: Vec::new() }
    }

    /// Registers a man page, indexed under its canonical name and every
    /// alias.
    pub fn insert(&mut self, page: ManPage) -> &mut Self {
        self.pages.push(Arc::new(page));
        self
    }

    fn candidates(&self, name: &str) -> Vec<(usize, u32)> {
        let mut scored = Vec::new();
        for (idx, page) in self.pages.iter().enumerate() {
            if page.name == name {
                scored.push((idx, CANONICAL_SCORE));
            } else if page.aliases.iter().any(|a| a == name) {
                scored.push((idx, ALIAS_SCORE));
            }
        }
        scored
    }
}

impl Store for InMemoryStore {
    fn find_man_page(&self, name: &str) -> Result<Vec<Arc<ManPage>>, StoreError> {
        let (base, section) = match name.rsplit_once('.') {
            Some((base, section)) if !section.is_empty() && section.chars().all(|c| c.is_ascii_alphanumeric()) => {
                (base, Some(section))
            }
            _ => (name, None),
        };

        let mut scored = self.candidates(base);
        if scored.is_empty() {
            return Err(StoreError::ProgramDoesNotExist { name: name.to_string() });
        }
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        if let Some(section) = section {
            scored.sort_by_key(|&(idx, _)| self.pages[idx].section() != section);
            if self.pages[scored[0].0].section() != section {
                return Err(StoreError::ProgramDoesNotExist { name: name.to_string() });
            }
        }

        Ok(scored.into_iter().map(|(idx, _)| self.pages[idx].clone()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_page(name: &str, source: &str) -> ManPage {
        ManPage {
            source: source.to_string(),
            name: name.to_string(),
            synopsis: Some(format!("{name} - does things")),
            paragraphs: Vec::new(),
            aliases: Vec::new(),
            partial_match: false,
            multicommand: false,
            nested_command: false,
        }
    }

    #[test]
    fn clean_text_strips_tags_and_entities() {
        let p = Paragraph::new(0, "<b>-a</b>, &lt;FILE&gt;", "1", true);
        assert_eq!(p.clean_text(), "-a, <FILE>");
    }

    #[test]
    fn extract_returns_none_for_non_option_paragraphs() {
        let p = Paragraph::new(0, "just some prose", "1", false);
        assert!(OptionParagraph::extract(p).is_none());
    }

    #[test]
    fn extract_populates_short_and_long_flags() {
        let p = Paragraph::new(0, "-a, --all   do not ignore entries starting with .", "1", true);
        let opt = OptionParagraph::extract(p).unwrap();
        assert_eq!(opt.short, vec!["-a"]);
        assert_eq!(opt.long, vec!["--all"]);
    }

    #[test]
    fn find_option_looks_across_short_and_long() {
        let mut page = simple_page("ls", "ls.1.gz");
        let opt = OptionParagraph {
            paragraph: Paragraph::new(0, "-a, --all", "1", true),
            short: vec!["-a".to_string()],
            long: vec!["--all".to_string()],
            expects_arg: ExpectsArg::No,
            argument: None,
            nested_command: None,
        };
        page.paragraphs.push(ManPageParagraph::Option(opt));
        assert!(page.find_option("-a").is_some());
        assert!(page.find_option("--all").is_some());
        assert!(page.find_option("-z").is_none());
    }

    #[test]
    fn arguments_preserves_first_insertion_order() {
        let mut page = simple_page("tar", "tar.1.gz");
        for (flag, arg_group) in [("-f", "ARCHIVE"), ("-z", "COMPRESSION"), ("--file", "ARCHIVE")] {
            page.paragraphs.push(ManPageParagraph::Option(OptionParagraph {
                paragraph: Paragraph::new(0, flag, "1", true),
                short: vec![flag.to_string()],
                long: Vec::new(),
                expects_arg: ExpectsArg::Any,
                argument: Some(arg_group.to_string()),
                nested_command: None,
            }));
        }
        let groups = page.arguments();
        let keys: Vec<&str> = groups.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["ARCHIVE", "COMPRESSION"]);
        assert_eq!(groups[0].1.len(), 2);
    }

    #[test]
    fn expects_arg_values_restricts_accepted_words() {
        let ea = ExpectsArg::Values(vec!["gzip".to_string(), "bzip2".to_string()]);
        assert!(ea.accepts("gzip"));
        assert!(!ea.accepts("zstd"));
        assert!(ExpectsArg::Any.accepts("anything"));
    }

    #[test]
    fn name_section_splits_gz_suffixed_source() {
        assert_eq!(name_section("tar.1.gz"), ("tar".to_string(), "1".to_string()));
    }

    struct Fixture {
        store: InMemoryStore,
    }

    impl Fixture {
        fn new() -> Self {
            let mut store = InMemoryStore::new();
            let mut git = simple_page("git", "git.1.gz");
            git.aliases.push("git-core".to_string());
            store.insert(git);
            store.insert(simple_page("git", "git-commit.1.gz"));
            Fixture { store }
        }
    }

    #[test]
    fn find_man_page_prefers_canonical_name_over_alias() {
        let fixture = Fixture::new();
        let results = fixture.store.find_man_page("git").unwrap();
        assert!(results.len() >= 2);
    }

    #[test]
    fn find_man_page_errors_for_unknown_program() {
        let fixture = Fixture::new();
        let err = fixture.store.find_man_page("nope").unwrap_err();
        assert!(matches!(err, StoreError::ProgramDoesNotExist { .. }));
    }
}

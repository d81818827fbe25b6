//! The output types produced by [`crate::Matcher::explain`] (§3 `MatchResult`
//! / `MatchGroup`).

use std::sync::Arc;

use shex_store::ManPage;
use shex_syntax::Span;

/// One annotated span of the input (§3 `MatchResult`).
///
/// `text` is the explanation shown for this span; it is `None` for a span
/// the matcher couldn't explain (an unrecognized flag, an unresolved
/// program, a gap between recognized spans).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchResult {
    pub start: usize,
    pub end: usize,
    pub text: Option<String>,
    /// The literal source text covered by `start..end`, filled in once the
    /// whole command line has been matched.
    pub matched: String,
    /// Creation order, used only by finalize's adjacent-merge pass (§4.M.d
    /// rule 2) to tell two spans that happen to land next to each other
    /// after sorting apart from two that were actually visited back to
    /// back — e.g. a nested command's spans fall between an option and the
    /// word that terminates it, so those two must not merge even though
    /// they end up adjacent in `command0`'s own sorted span list.
    pub(crate) index: usize,
}

impl MatchResult {
    #[must_use]
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.text.is_none()
    }
}

/// A named bucket of [`MatchResult`]s: either the shell-level group
/// (`"shell"`, index 0) or one command group per resolved or attempted
/// program (`"command0"`, `"command1"`, ...) (§3 `MatchGroup`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchGroup {
    pub name: String,
    /// The page this group resolved to, if any. `None` for the shell
    /// group, for a function-call group, and for a command group whose
    /// program lookup failed.
    pub manpage: Option<Arc<ManPage>>,
    /// Other pages that matched the same name ambiguously, offered as
    /// alternatives (only ever populated alongside `manpage`).
    pub suggestions: Vec<Arc<ManPage>>,
    pub results: Vec<MatchResult>,
}

impl MatchGroup {
    pub(crate) fn shell() -> Self {
        MatchGroup {
            name: "shell".to_string(),
            manpage: None,
            suggestions: Vec::new(),
            results: Vec::new(),
        }
    }

    pub(crate) fn command(index: usize, manpage: Option<Arc<ManPage>>, suggestions: Vec<Arc<ManPage>>) -> Self {
        MatchGroup {
            name: format!("command{index}"),
            manpage,
            suggestions,
            results: Vec::new(),
        }
    }
}

/// The complete result of matching one command line (§4.M.d).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Explanation {
    pub groups: Vec<MatchGroup>,
    /// Every expansion encountered while walking the tree, in source order
    /// (§4.M "State": `expansions`). This is bookkeeping exposed alongside
    /// the match groups, not itself a set of additional spans: an
    /// expansion's byte range always lies inside whatever word span
    /// already covers it.
    pub expansions: Vec<shex_syntax::ast::Expansion>,
}

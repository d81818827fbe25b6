//! The mutable state threaded through the visit (§4.M "State").
//!
//! This is a plain struct updated in place by the visit functions in
//! [`crate::visit`], not a visitor object with private fields — matching
//! the shape §4.M describes directly rather than wrapping it in a trait.

use std::collections::HashSet;

use shex_store::{ExpectsArg, OptionParagraph, StoreError};
use shex_syntax::ast::Expansion;

use crate::result::MatchGroup;

/// A remembered option, carried across one word boundary so the decision
/// ladder's rule 4 (previous-option argument) can consult it.
#[derive(Clone, Debug)]
pub struct OptionMemo {
    pub expects_arg: ExpectsArg,
    pub nested_command: Option<Vec<String>>,
    /// The option's own explanation text, reused verbatim when rule 4
    /// attributes an argument word to it so that finalize's adjacent-merge
    /// pass (equal text, contiguous index) joins them into one span.
    pub text: String,
}

impl OptionMemo {
    #[must_use]
    pub fn from(opt: &OptionParagraph) -> Self {
        OptionMemo {
            expects_arg: opt.expects_arg.clone(),
            nested_command: opt.nested_command.clone(),
            text: opt.paragraph.clean_text(),
        }
    }
}

/// One entry of the nested-command stack: while active, subsequent words in
/// the same simple command are matched against `group_index`'s program
/// instead of the one that opened the simple command.
pub struct GroupFrame {
    pub group_index: usize,
    /// `None` at the base of a simple command (never popped by a
    /// terminator word). `Some(words)` for a nested command opened by
    /// `nested_cmd`: an empty list means "runs unterminated", a non-empty
    /// one lists the words that close it (§3 `Option.nested_cmd`).
    pub end_words: Option<Vec<String>>,
    /// Set when this group was opened for a function call (the call's
    /// name), so word visitation can special-case function arguments
    /// instead of probing a man page (§4.M.b, function-call handling).
    pub function_name: Option<String>,
    /// The explanation text to repeat on the terminator word that closes
    /// this frame (the nesting option's own help text), attributed to the
    /// outer group once this frame pops.
    pub terminator_text: Option<String>,
}

pub struct MatcherState {
    pub groups: Vec<MatchGroup>,
    pub group_stack: Vec<GroupFrame>,
    /// Which compound command (if any) the visitor is currently inside, for
    /// reserved-word help lookup (§4.M.c).
    pub compound_stack: Vec<shex_help::CompoundContext>,
    pub functions: HashSet<String>,
    pub expansions: Vec<Expansion>,
    /// The option matched by the previous word in the current simple
    /// command, if it expects an argument — consulted by rule 4 and
    /// overwritten (to `None` when the word didn't extend it) once per
    /// word visited.
    pub prev_option: Option<OptionMemo>,
    /// The most recent program-lookup failure, kept so the top level can
    /// re-promote it to a hard error when the whole input was just that
    /// one simple command (§4.M.d).
    pub pending_error: Option<StoreError>,
    /// Monotonic counter handed out to every emitted [`MatchResult`],
    /// across all groups, in visitation order. Finalize continues this
    /// same counter for the spans it synthesizes over unparsed input, so
    /// gap-filled spans never collide with a real one's index.
    pub next_index: usize,
}

impl MatcherState {
    #[must_use]
    pub fn new() -> Self {
        MatcherState {
            groups: vec![MatchGroup::shell()],
            group_stack: Vec::new(),
            compound_stack: Vec::new(),
            functions: HashSet::new(),
            expansions: Vec::new(),
            prev_option: None,
            pending_error: None,
            next_index: 0,
        }
    }

    /// Hands out the next value of the global, cross-group creation-order
    /// counter (§4.M "State" `expansions`/index bookkeeping), so finalize's
    /// adjacent-merge pass can tell two spans that were actually visited
    /// back to back apart from two that only ended up next to each other
    /// after sorting.
    pub fn alloc_index(&mut self) -> usize {
        let idx = self.next_index;
        self.next_index += 1;
        idx
    }

    #[must_use]
    pub fn current_group_index(&self) -> usize {
        self.group_stack.last().map_or(0, |f| f.group_index)
    }

    pub fn current_group(&mut self) -> &mut MatchGroup {
        let idx = self.current_group_index();
        &mut self.groups[idx]
    }

    pub fn shell_group(&mut self) -> &mut MatchGroup {
        &mut self.groups[0]
    }
}

impl Default for MatcherState {
    fn default() -> Self {
        MatcherState::new()
    }
}

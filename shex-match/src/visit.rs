//! The AST walk implementing §4.M.a–c: one handler per node kind, threading
//! a [`MatcherState`] through rather than dispatching through a visitor
//! trait (see `DESIGN.md`, Open Question — class-based `visit<kind>`
//! dispatch becomes exhaustive pattern matching).

use std::sync::Arc;

use shex_help::CompoundContext;
use shex_store::{ManPage, Store, StoreError};
use shex_syntax::ast::{
    Compound, CompoundKind, Function, List, ListOp, Pipeline, PipelineCommand, RedirTarget,
    Redirect, ReservedWordNode, SimpleCommand, Word,
};
use shex_syntax::Span;

use crate::fuzzy::attempt_fuzzy;
use crate::result::MatchGroup;
use crate::state::{GroupFrame, MatcherState, OptionMemo};

pub struct Matcher<'a> {
    store: &'a dyn Store,
    state: MatcherState,
}

impl<'a> Matcher<'a> {
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Matcher {
            store,
            state: MatcherState::new(),
        }
    }

    pub fn run(mut self, list: &List) -> (MatcherState, Option<StoreError>) {
        self.collect_functions_in_list(list);
        self.visit_list(list);
        let fatal = self.promote_error();
        (self.state, fatal)
    }

    /// Implements §4.M.d rule 4: re-promotes a swallowed `ProgramDoesNotExist`
    /// to a fatal error when the whole input was that one unknown command
    /// with nothing else to say.
    fn promote_error(&self) -> Option<StoreError> {
        let pending = self.state.pending_error.clone()?;
        let command_groups: Vec<&MatchGroup> = self.state.groups.iter().skip(1).collect();
        if command_groups.len() != 1 {
            return None;
        }
        if command_groups[0].manpage.is_some() {
            return None;
        }
        if !self.state.groups[0].results.is_empty() {
            return None;
        }
        Some(pending)
    }

    // ---- function pre-pass -----------------------------------------------

    fn collect_functions_in_list(&mut self, list: &List) {
        for pipeline in &list.pipelines {
            for cmd in &pipeline.commands {
                self.collect_functions_in_pipeline_command(cmd);
            }
        }
    }

    fn collect_functions_in_pipeline_command(&mut self, cmd: &PipelineCommand) {
        match cmd {
            PipelineCommand::Function(f) => {
                self.state.functions.insert(f.name.text.clone());
                self.collect_functions_in_compound(&f.body);
            }
            PipelineCommand::Compound(c) => self.collect_functions_in_compound(c),
            PipelineCommand::Simple(_) => {}
        }
    }

    fn collect_functions_in_compound(&mut self, c: &Compound) {
        match &c.kind {
            CompoundKind::Subshell { body, .. } | CompoundKind::Group { body, .. } => {
                self.collect_functions_in_list(body);
            }
            CompoundKind::If { branches, else_body, .. } => {
                for branch in branches {
                    self.collect_functions_in_list(&branch.condition);
                    self.collect_functions_in_list(&branch.body);
                }
                if let Some(else_body) = else_body {
                    self.collect_functions_in_list(else_body);
                }
            }
            CompoundKind::For { body, .. } | CompoundKind::Select { body, .. } => {
                self.collect_functions_in_list(body);
            }
            CompoundKind::While { condition, body, .. } | CompoundKind::Until { condition, body, .. } => {
                self.collect_functions_in_list(condition);
                self.collect_functions_in_list(body);
            }
        }
    }

    // ---- list / pipeline ---------------------------------------------------

    fn visit_list(&mut self, list: &List) {
        for (i, pipeline) in list.pipelines.iter().enumerate() {
            self.visit_pipeline(pipeline);
            if i + 1 < list.pipelines.len() {
                if let Some(op) = list.operators.get(i) {
                    self.emit_list_operator(op.op, op.span);
                }
            }
        }
        if !list.operators.is_empty() && list.operators.len() == list.pipelines.len() {
            let op = list.operators.last().unwrap();
            self.emit_list_operator(op.op, op.span);
        }
    }

    fn emit_list_operator(&mut self, op: ListOp, span: Span) {
        let text = shex_help::operator(list_op_str(op));
        self.emit_shell(span, text.to_string());
    }

    fn visit_pipeline(&mut self, pipeline: &Pipeline) {
        if let Some(span) = pipeline.bang_span {
            self.emit_shell(span, shex_help::reserved_word("!").to_string());
        }
        for (i, cmd) in pipeline.commands.iter().enumerate() {
            self.visit_pipeline_command(cmd);
            if let Some(pipe) = pipeline.pipes.get(i) {
                let op_str = match pipe.op {
                    shex_syntax::ast::PipeOp::Bar => "|",
                    shex_syntax::ast::PipeOp::BarAmp => "|&",
                };
                self.emit_shell(pipe.span, shex_help::operator(op_str).to_string());
            }
        }
    }

    fn visit_pipeline_command(&mut self, cmd: &PipelineCommand) {
        match cmd {
            PipelineCommand::Simple(sc) => self.visit_simple_command(sc),
            PipelineCommand::Compound(c) => self.visit_compound(c),
            PipelineCommand::Function(f) => self.visit_function(f),
        }
    }

    fn visit_function(&mut self, f: &Function) {
        let header = Span::new(f.span.start, f.body.span.start);
        self.emit_shell(header, shex_help::FUNCTION_DECL.to_string());
        self.visit_compound(&f.body);
    }

    // ---- compound commands --------------------------------------------------

    fn visit_compound(&mut self, c: &Compound) {
        match &c.kind {
            CompoundKind::Subshell { body, open_span, close_span } => {
                self.emit_shell(*open_span, shex_help::SUBSHELL.to_string());
                self.visit_list(body);
                self.emit_shell(*close_span, shex_help::SUBSHELL.to_string());
            }
            CompoundKind::Group { body, open_span, close_span } => {
                self.emit_shell(*open_span, shex_help::reserved_word("{").to_string());
                self.visit_list(body);
                self.emit_shell(*close_span, shex_help::reserved_word("}").to_string());
            }
            CompoundKind::If { branches, else_body, keywords } => {
                self.with_compound_context(CompoundContext::If, keywords, |m| {
                    for branch in branches {
                        m.visit_list(&branch.condition);
                        m.visit_list(&branch.body);
                    }
                    if let Some(else_body) = else_body {
                        m.visit_list(else_body);
                    }
                });
            }
            CompoundKind::For { body, keywords, .. } => {
                self.with_compound_context(CompoundContext::For, keywords, |m| m.visit_list(body));
            }
            CompoundKind::Select { body, keywords, .. } => {
                self.with_compound_context(CompoundContext::Select, keywords, |m| m.visit_list(body));
            }
            CompoundKind::While { condition, body, keywords } => {
                self.with_compound_context(CompoundContext::While, keywords, |m| {
                    m.visit_list(condition);
                    m.visit_list(body);
                });
            }
            CompoundKind::Until { condition, body, keywords } => {
                self.with_compound_context(CompoundContext::Until, keywords, |m| {
                    m.visit_list(condition);
                    m.visit_list(body);
                });
            }
        }
        for redirect in &c.redirects {
            self.visit_redirect(redirect);
        }
    }

    fn with_compound_context(
        &mut self,
        ctx: CompoundContext,
        keywords: &[ReservedWordNode],
        body: impl FnOnce(&mut Self),
    ) {
        self.state.compound_stack.push(ctx);
        for kw in keywords {
            self.emit_compound_keyword(ctx, kw);
        }
        body(self);
        self.state.compound_stack.pop();
    }

    fn emit_compound_keyword(&mut self, ctx: CompoundContext, kw: &ReservedWordNode) {
        let word = kw.word.as_str();
        let text = shex_help::compound_reserved_word(ctx, word)
            .unwrap_or_else(|| shex_help::reserved_word(word));
        self.emit_shell(kw.span, text.to_string());
    }

    // ---- simple commands --------------------------------------------------

    fn visit_simple_command(&mut self, sc: &SimpleCommand) {
        for part in &sc.parts {
            match part {
                shex_syntax::ast::CommandPart::Assignment(a) => {
                    self.emit_shell(a.span, shex_help::ASSIGNMENT.to_string());
                    self.collect_word_expansions(&a.value);
                }
                shex_syntax::ast::CommandPart::Redirect(r) => self.visit_redirect(r),
                shex_syntax::ast::CommandPart::Word(_) => {}
            }
        }

        let words: Vec<&Word> = sc.words().collect();
        if words.is_empty() {
            return;
        }

        let base_stack_len = self.state.group_stack.len();
        self.state.prev_option = None;

        let mut i = 0;
        let consumed = self.start_command(&words, 0);
        i += consumed.max(1);
        while i < words.len() {
            let consumed = self.visit_command_word(&words, i);
            i += consumed.max(1);
        }

        self.state.group_stack.truncate(base_stack_len);
        self.state.prev_option = None;
    }

    fn visit_redirect(&mut self, r: &Redirect) {
        let text = shex_help::redirection_kind(r.kind.as_str());
        self.emit_shell(r.span, text.to_string());
        match &r.target {
            RedirTarget::Word(w) => self.collect_word_expansions(w),
            RedirTarget::HereDocDelimiter { word, .. } => self.collect_word_expansions(word),
            RedirTarget::Fd(_) => {}
        }
    }

    // ---- §4.M.a: opening a command group -----------------------------------

    fn start_command(&mut self, words: &[&Word], idx: usize) -> usize {
        let word = words[idx];

        if self.state.functions.contains(&word.text) {
            let group_index = self.open_group(None, Vec::new());
            self.state.group_stack.push(GroupFrame {
                group_index,
                end_words: None,
                function_name: Some(word.text.clone()),
                terminator_text: None,
            });
            self.emit_current(word.span, shex_help::function_call(&word.text));
            return 1;
        }

        if word.is_expanded() {
            self.collect_word_expansions(word);
            let group_index = self.open_group(None, Vec::new());
            self.state.group_stack.push(GroupFrame {
                group_index,
                end_words: None,
                function_name: None,
                terminator_text: None,
            });
            return 1;
        }

        match self.store.find_man_page(&word.text) {
            Ok(pages) => {
                let mut page = pages[0].clone();
                let mut suggestions = pages[1..].to_vec();
                let mut span = word.span;
                let mut consumed = 1;

                if page.multicommand {
                    if let Some(next) = words.get(idx + 1) {
                        if !next.is_expanded() {
                            let combined = format!("{} {}", word.text, next.text);
                            if let Ok(sub_pages) = self.store.find_man_page(&combined) {
                                page = sub_pages[0].clone();
                                suggestions = sub_pages[1..].to_vec();
                                span = word.span.cover(next.span);
                                consumed = 2;
                            }
                        }
                    }
                }

                let group_index = self.open_group(Some(page.clone()), suggestions);
                self.state.group_stack.push(GroupFrame {
                    group_index,
                    end_words: None,
                    function_name: None,
                    terminator_text: None,
                });
                self.emit_current(span, synopsis_text(&page));
                consumed
            }
            Err(StoreError::ProgramDoesNotExist { name }) => {
                let group_index = self.open_group(None, Vec::new());
                self.state.group_stack.push(GroupFrame {
                    group_index,
                    end_words: None,
                    function_name: None,
                    terminator_text: None,
                });
                self.state.pending_error = Some(StoreError::ProgramDoesNotExist { name });
                1
            }
        }
    }

    fn start_nested(&mut self, word: &Word, end_words: Vec<String>, terminator_text: String) -> usize {
        if word.is_expanded() {
            self.collect_word_expansions(word);
            let group_index = self.open_group(None, Vec::new());
            self.state.group_stack.push(GroupFrame {
                group_index,
                end_words: Some(end_words),
                function_name: None,
                terminator_text: Some(terminator_text),
            });
            return 1;
        }

        match self.store.find_man_page(&word.text) {
            Ok(pages) => {
                let page = pages[0].clone();
                let suggestions = pages[1..].to_vec();
                let group_index = self.open_group(Some(page.clone()), suggestions);
                self.state.group_stack.push(GroupFrame {
                    group_index,
                    end_words: Some(end_words),
                    function_name: None,
                    terminator_text: Some(terminator_text),
                });
                self.emit_current(word.span, synopsis_text(&page));
            }
            Err(_) => {
                let group_index = self.open_group(None, Vec::new());
                self.state.group_stack.push(GroupFrame {
                    group_index,
                    end_words: Some(end_words),
                    function_name: None,
                    terminator_text: Some(terminator_text),
                });
            }
        }
        1
    }

    fn open_group(&mut self, manpage: Option<Arc<ManPage>>, suggestions: Vec<Arc<ManPage>>) -> usize {
        let command_index = self.state.groups.len() - 1;
        self.state.groups.push(MatchGroup::command(command_index, manpage, suggestions));
        self.state.groups.len() - 1
    }

    // ---- §4.M.b: the word decision ladder ----------------------------------

    fn visit_command_word(&mut self, words: &[&Word], idx: usize) -> usize {
        let word = words[idx];
        self.collect_word_expansions(word);

        if let Some(frame) = self.state.group_stack.last() {
            if let Some(fname) = frame.function_name.clone() {
                self.emit_current(word.span, shex_help::function_arg(&fname));
                self.state.prev_option = None;
                return 1;
            }
        }

        // Rule 1: nested-command terminator.
        if let Some(frame) = self.state.group_stack.last() {
            if let Some(end_words) = &frame.end_words {
                if end_words.iter().any(|w| w == &word.text) {
                    let text = frame.terminator_text.clone().unwrap_or_default();
                    self.state.group_stack.pop();
                    self.emit_current(word.span, text);
                    self.state.prev_option = None;
                    return 1;
                }
            }
        }

        // Rule 2: exact option match (long with `=value` stripped, or a
        // plain exact short/long spelling).
        let (flag_text, had_eq) = match word.text.split_once('=') {
            Some((flag, _)) if flag.starts_with('-') => (flag.to_string(), true),
            _ => (word.text.clone(), false),
        };
        if let Some(opt) = self.current_manpage().and_then(|p| p.find_option(&flag_text)) {
            let memo = OptionMemo::from(opt);
            self.emit_current(word.span, memo.text.clone());
            self.state.prev_option = if had_eq { None } else { Some(memo) };
            return 1;
        }

        // Rule 3: fuzzy short-option series, e.g. `-xzvf`.
        if word.text.starts_with('-') && !word.text.starts_with("--") && word.text.len() >= 3 {
            if let Some(page) = self.current_manpage().cloned() {
                let result = attempt_fuzzy(&word.text, &page, true);
                if result.pieces.first().is_some_and(|p| p.text.is_some()) {
                    self.emit_fuzzy_pieces(word, &result.pieces);
                    self.state.prev_option = result.trailing_option;
                    return 1;
                }
                if page.partial_match {
                    let alt = attempt_fuzzy(&word.text, &page, false);
                    if alt.pieces.first().is_some_and(|p| p.text.is_some()) {
                        self.emit_fuzzy_pieces(word, &alt.pieces);
                        self.state.prev_option = alt.trailing_option;
                        return 1;
                    }
                }
            }
        }

        // Rule 4: argument to the previous option. Emitting a fresh span
        // with the option's own text (rather than mutating the prior span)
        // lets finalize's adjacent-merge pass join the two when nothing
        // else falls between them — the same mechanism that collapses
        // repeated flags in rule 2/3.
        if let Some(memo) = self.state.prev_option.clone() {
            if memo.expects_arg.is_some() && memo.expects_arg.accepts(&word.text) {
                self.state.prev_option = None;
                if let Some(nested) = memo.nested_command {
                    return self.start_nested(word, nested, memo.text);
                }
                self.emit_current(word.span, memo.text);
                return 1;
            }
        }

        // Rule 5: partial match, e.g. `tar xzvf`.
        if !word.text.starts_with('-') {
            if let Some(page) = self.current_manpage().cloned() {
                if page.partial_match {
                    let result = attempt_fuzzy(&word.text, &page, false);
                    if result.all_known() {
                        self.emit_fuzzy_pieces(word, &result.pieces);
                        self.state.prev_option = result.trailing_option;
                        return 1;
                    }
                }
            }
        }

        // Rule 6: positional argument documented by the page.
        if let Some(page) = self.current_manpage() {
            if let Some((_, opts)) = page.arguments().into_iter().next() {
                if let Some(opt) = opts.first() {
                    let text = opt.paragraph.clean_text();
                    self.emit_current(word.span, text);
                    self.state.prev_option = None;
                    return 1;
                }
            }
        }

        // Rule 7: the page's own nested command (e.g. `sudo`, `xargs`). This
        // is unterminated (runs to the end of the simple command), so there
        // is no terminator word to ever need a repeated text for.
        if let Some(page) = self.current_manpage() {
            if page.nested_command {
                return self.start_nested(word, Vec::new(), String::new());
            }
        }

        // Rule 8: unknown.
        self.emit_unknown_current(word.span);
        self.state.prev_option = None;
        1
    }

    // ---- small helpers ------------------------------------------------------

    fn current_manpage(&self) -> Option<&ManPage> {
        let idx = self.state.current_group_index();
        self.state.groups[idx].manpage.as_deref()
    }

    fn collect_word_expansions(&mut self, word: &Word) {
        self.state.expansions.extend(word.parts.iter().cloned());
    }

    fn push_result_in(&mut self, group_index: usize, span: Span, text: Option<String>) {
        let index = self.state.alloc_index();
        self.state.groups[group_index].results.push(crate::result::MatchResult {
            start: span.start,
            end: span.end,
            text,
            matched: String::new(),
            index,
        });
    }

    fn emit_current(&mut self, span: Span, text: impl Into<String>) {
        let idx = self.state.current_group_index();
        self.push_result_in(idx, span, Some(text.into()));
    }

    fn emit_unknown_current(&mut self, span: Span) {
        let idx = self.state.current_group_index();
        self.push_result_in(idx, span, None);
    }

    fn emit_shell(&mut self, span: Span, text: impl Into<String>) {
        self.push_result_in(0, span, Some(text.into()));
    }

    fn emit_fuzzy_pieces(&mut self, word: &Word, pieces: &[crate::fuzzy::FuzzyPiece]) {
        let idx = self.state.current_group_index();
        for p in pieces {
            let start = word.span.start + p.offset;
            let end = start + p.len;
            self.push_result_in(idx, Span::new(start, end), p.text.clone());
        }
    }

}

fn list_op_str(op: ListOp) -> &'static str {
    match op {
        ListOp::Semi => ";",
        ListOp::Amp => "&",
        ListOp::AndAnd => "&&",
        ListOp::OrOr => "||",
    }
}

fn synopsis_text(page: &ManPage) -> String {
    page.synopsis.clone().unwrap_or_else(|| shex_help::NO_SYNOPSIS.to_string())
}

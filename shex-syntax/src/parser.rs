//! The recursive-descent parser.
//!
//! Reserved words are recognized contextually: the parser only treats a
//! [`TokenKind::Word`] as a keyword when it asks for one at a specific
//! grammar position (start of a command, after `do`, and so on). Anywhere
//! else — `echo if` — the same spelling is an ordinary word.

use std::str::FromStr;

use crate::ast::{
    Assignment, CommandPart, Compound, CompoundKind, Function, IfBranch, List, ListOp,
    ListOperator, Pipe, PipeOp, Pipeline, PipelineCommand, RedirTarget, Redirect, ReservedWordNode,
    SimpleCommand, Word,
};
use crate::span::Span;
use crate::token::{Keyword, Operator, Paren, RedirOp, Token, TokenKind};

/// A syntax error.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected {found} at byte {}, expected {expected}", span.start)]
    UnexpectedToken {
        found: String,
        expected: &'static str,
        span: Span,
    },
    #[error("`{opener}` opened at byte {} is never closed", span.start)]
    Unclosed { opener: &'static str, span: Span },
    #[error("redirection at byte {} has no target", span.start)]
    MissingRedirectTarget { span: Span },
    #[error("`{word}` at byte {} is a reserved word here and can't be used as a command name", span.start)]
    ReservedWordAsCommand { word: &'static str, span: Span },
    #[error("a `{{ list; }}` group's list must end with `;` before the closing `}}` (byte {})", span.start)]
    ExpectedSemicolonInGroup { span: Span },
}

impl ParseError {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. }
            | ParseError::Unclosed { span, .. }
            | ParseError::MissingRedirectTarget { span }
            | ParseError::ReservedWordAsCommand { span, .. }
            | ParseError::ExpectedSemicolonInGroup { span } => *span,
        }
    }
}

/// Parses a full token stream (as produced by [`crate::lexer::tokenize`])
/// into a single top-level [`List`].
pub fn parse(tokens: &[Token]) -> Result<List, ParseError> {
    let mut parser = Parser { tokens, pos: 0 };
    let list = parser.parse_list(&[])?;
    parser.expect_eof()?;
    Ok(list)
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

/// Keywords that may legally end a `List` being parsed, passed down so
/// `parse_list` knows when to stop without consuming the delimiter.
type Stoppers<'a> = &'a [Keyword];

impl<'a> Parser<'a> {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> &Token {
        let tok = &self.tokens[self.pos];
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_eof(&self) -> bool {
        self.current().is_eof()
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if self.at_eof() {
            Ok(())
        } else {
            Err(self.unexpected("end of input"))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        let tok = self.current();
        ParseError::UnexpectedToken {
            found: describe(tok),
            expected,
            span: tok.span,
        }
    }

    /// Returns the keyword this word spells, if the current token is an
    /// unquoted word whose text matches one exactly.
    fn peek_keyword(&self) -> Option<Keyword> {
        let tok = self.current();
        if !matches!(tok.kind, TokenKind::Word) {
            return None;
        }
        if tok.lexeme != tok.text {
            // The word contained quotes or escapes, so it can't be a
            // reserved word even if its unquoted value matches one.
            return None;
        }
        Keyword::from_str(&tok.text).ok()
    }

    fn eat_keyword(&mut self, kw: Keyword) -> bool {
        if self.peek_keyword() == Some(kw) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> Result<Span, ParseError> {
        let span = self.current().span;
        if self.eat_keyword(kw) {
            Ok(span)
        } else {
            Err(self.unexpected(kw.as_str()))
        }
    }

    fn eat_operator(&mut self, op: Operator) -> Option<Span> {
        if let TokenKind::Operator(found) = self.current().kind {
            if found == op {
                let span = self.current().span;
                self.advance();
                return Some(span);
            }
        }
        None
    }

    fn skip_separators(&mut self) {
        while self.eat_operator(Operator::Semi).is_some() {}
    }

    // ---- list / pipeline -------------------------------------------------

    /// Parses a `;`/`&`/`&&`/`||`-separated list, stopping before any
    /// token that would begin a reserved word in `stoppers`, a closing
    /// paren, or a `}` word.
    fn parse_list(&mut self, stoppers: Stoppers<'_>) -> Result<List, ParseError> {
        let start = self.current().span;
        let mut pipelines = Vec::new();
        let mut operators = Vec::new();

        loop {
            if self.at_list_end(stoppers) {
                break;
            }
            let pipeline = self.parse_pipeline()?;
            pipelines.push(pipeline);

            if self.at_list_end(stoppers) {
                break;
            }
            match self.parse_list_operator() {
                Some(op) => operators.push(op),
                None => break,
            }
        }

        let end = if let Some(last) = pipelines.last() {
            operators.last().map_or(last.span, |o| o.span)
        } else {
            start
        };
        Ok(List {
            pipelines,
            operators,
            span: Span::new(start.start, end.end.max(start.start)),
        })
    }

    fn at_list_end(&self, stoppers: Stoppers<'_>) -> bool {
        if self.at_eof() {
            return true;
        }
        if matches!(self.current().kind, TokenKind::Paren(Paren::Close)) {
            return true;
        }
        if self.word_is("}") {
            return true;
        }
        if let Some(kw) = self.peek_keyword() {
            if stoppers.contains(&kw) {
                return true;
            }
        }
        false
    }

    fn word_is(&self, text: &str) -> bool {
        matches!(self.current().kind, TokenKind::Word) && self.current().text == text
    }

    fn parse_list_operator(&mut self) -> Option<ListOperator> {
        let tok = self.current();
        let op = match tok.kind {
            TokenKind::Operator(Operator::Semi) => ListOp::Semi,
            TokenKind::Operator(Operator::Amp) => ListOp::Amp,
            TokenKind::Operator(Operator::AndAnd) => ListOp::AndAnd,
            TokenKind::Operator(Operator::OrOr) => ListOp::OrOr,
            _ => return None,
        };
        let span = tok.span;
        self.advance();
        Some(ListOperator { op, span })
    }

    fn parse_pipeline(&mut self) -> Result<Pipeline, ParseError> {
        let start = self.current().span;
        let bang_span = self.eat_keyword(Keyword::Bang).then_some(start);

        let mut commands = vec![self.parse_pipe_command()?];
        let mut pipes = Vec::new();
        loop {
            let (op, span) = match self.current().kind {
                TokenKind::Operator(Operator::Pipe) => (PipeOp::Bar, self.current().span),
                TokenKind::Operator(Operator::PipeAmp) => (PipeOp::BarAmp, self.current().span),
                _ => break,
            };
            self.advance();
            pipes.push(Pipe { op, span });
            commands.push(self.parse_pipe_command()?);
        }

        let end = commands.last().map_or(start, PipelineCommand::span);
        Ok(Pipeline {
            negated: bang_span.is_some(),
            bang_span,
            commands,
            pipes,
            span: start.cover(end),
        })
    }

    fn parse_pipe_command(&mut self) -> Result<PipelineCommand, ParseError> {
        if self.looks_like_function_definition() {
            return Ok(PipelineCommand::Function(Box::new(self.parse_function()?)));
        }
        if self.peek_keyword().is_some() || matches!(self.current().kind, TokenKind::Paren(Paren::Open)) {
            if let Some(kw) = self.peek_keyword() {
                if matches!(
                    kw,
                    Keyword::If | Keyword::For | Keyword::While | Keyword::Until | Keyword::Select | Keyword::OpenBrace
                ) {
                    return Ok(PipelineCommand::Compound(Box::new(self.parse_compound_command()?)));
                }
                if kw == Keyword::Bang || kw == Keyword::Function {
                    // handled by caller / looks_like_function_definition
                } else {
                    return Err(ParseError::ReservedWordAsCommand {
                        word: kw.as_str(),
                        span: self.current().span,
                    });
                }
            } else {
                return Ok(PipelineCommand::Compound(Box::new(self.parse_compound_command()?)));
            }
        }
        Ok(PipelineCommand::Simple(self.parse_simple_command()?))
    }

    fn looks_like_function_definition(&self) -> bool {
        if self.peek_keyword() == Some(Keyword::Function) {
            return true;
        }
        matches!(self.current().kind, TokenKind::Word)
            && matches!(self.tokens.get(self.pos + 1).map(|t| &t.kind), Some(TokenKind::Paren(Paren::Open)))
            && matches!(self.tokens.get(self.pos + 2).map(|t| &t.kind), Some(TokenKind::Paren(Paren::Close)))
    }

    fn parse_function(&mut self) -> Result<Function, ParseError> {
        let start = self.current().span;
        let has_keyword = self.eat_keyword(Keyword::Function);
        let name = self.parse_word("a function name")?;
        if has_keyword {
            // `function name` may omit the `()`.
            if matches!(self.current().kind, TokenKind::Paren(Paren::Open)) {
                self.advance();
                self.expect_paren_close()?;
            }
        } else {
            self.advance(); // '('
            self.expect_paren_close()?;
        }
        self.skip_separators();
        let body = self.parse_compound_command()?;
        let end = body.span;
        Ok(Function {
            has_keyword,
            name,
            body: Box::new(body),
            span: start.cover(end),
        })
    }

    fn expect_paren_close(&mut self) -> Result<Span, ParseError> {
        let tok = self.current();
        if matches!(tok.kind, TokenKind::Paren(Paren::Close)) {
            let span = tok.span;
            self.advance();
            Ok(span)
        } else {
            Err(self.unexpected(")"))
        }
    }

    // ---- compound commands -----------------------------------------------

    fn parse_compound_command(&mut self) -> Result<Compound, ParseError> {
        let start = self.current().span;
        let kind = if matches!(self.current().kind, TokenKind::Paren(Paren::Open)) {
            let open_span = self.current().span;
            self.advance();
            let body = self.parse_list(&[])?;
            if !matches!(self.current().kind, TokenKind::Paren(Paren::Close)) {
                return Err(ParseError::Unclosed { opener: "(", span: start });
            }
            let close_span = self.current().span;
            self.advance();
            CompoundKind::Subshell { body, open_span, close_span }
        } else {
            match self.peek_keyword() {
                Some(Keyword::OpenBrace) => self.parse_group(start)?,
                Some(Keyword::If) => self.parse_if(start)?,
                Some(Keyword::For) => self.parse_for(start)?,
                Some(Keyword::While) => self.parse_while(start)?,
                Some(Keyword::Until) => self.parse_until(start)?,
                Some(Keyword::Select) => self.parse_select(start)?,
                _ => return Err(self.unexpected("a compound command")),
            }
        };
        let mut redirects = Vec::new();
        while let Some(redirect) = self.try_parse_redirect()? {
            redirects.push(redirect);
        }
        let end = redirects.last().map_or(self.prev_span(), |r| r.span);
        Ok(Compound {
            kind,
            redirects,
            span: start.cover(end),
        })
    }

    fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    fn parse_group(&mut self, start: Span) -> Result<CompoundKind, ParseError> {
        let open_span = self.current().span;
        self.advance(); // '{'
        let body = self.parse_list(&[])?;
        if !self.word_is("}") {
            return Err(ParseError::Unclosed { opener: "{", span: start });
        }
        if !list_ends_with_semicolon(&body) {
            return Err(ParseError::ExpectedSemicolonInGroup { span: self.current().span });
        }
        let close_span = self.current().span;
        self.advance();
        Ok(CompoundKind::Group { body, open_span, close_span })
    }

    fn parse_if(&mut self, start: Span) -> Result<CompoundKind, ParseError> {
        let mut keywords = vec![ReservedWordNode { word: Keyword::If, span: start }];
        self.advance(); // 'if'
        let mut branches = Vec::new();
        loop {
            let condition = self.parse_list(&[Keyword::Then])?;
            let then_span = self.expect_keyword(Keyword::Then).map_err(|_| ParseError::Unclosed {
                opener: "if",
                span: start,
            })?;
            keywords.push(ReservedWordNode { word: Keyword::Then, span: then_span });
            let body = self.parse_list(&[Keyword::Elif, Keyword::Else, Keyword::Fi])?;
            branches.push(IfBranch { condition, body });
            let elif_span = self.current().span;
            if self.eat_keyword(Keyword::Elif) {
                keywords.push(ReservedWordNode { word: Keyword::Elif, span: elif_span });
                continue;
            }
            break;
        }
        let else_span = self.current().span;
        let else_body = if self.eat_keyword(Keyword::Else) {
            keywords.push(ReservedWordNode { word: Keyword::Else, span: else_span });
            Some(self.parse_list(&[Keyword::Fi])?)
        } else {
            None
        };
        let fi_span = self
            .expect_keyword(Keyword::Fi)
            .map_err(|_| ParseError::Unclosed { opener: "if", span: start })?;
        keywords.push(ReservedWordNode { word: Keyword::Fi, span: fi_span });
        Ok(CompoundKind::If { branches, else_body, keywords })
    }

    fn parse_do_group(
        &mut self,
        opener: &'static str,
        start: Span,
        keywords: &mut Vec<ReservedWordNode>,
    ) -> Result<List, ParseError> {
        let do_span = self
            .expect_keyword(Keyword::Do)
            .map_err(|_| ParseError::Unclosed { opener, span: start })?;
        keywords.push(ReservedWordNode { word: Keyword::Do, span: do_span });
        let body = self.parse_list(&[Keyword::Done])?;
        let done_span = self
            .expect_keyword(Keyword::Done)
            .map_err(|_| ParseError::Unclosed { opener, span: start })?;
        keywords.push(ReservedWordNode { word: Keyword::Done, span: done_span });
        Ok(body)
    }

    fn parse_name_in_values(
        &mut self,
        keywords: &mut Vec<ReservedWordNode>,
    ) -> Result<(Word, Option<Vec<Word>>), ParseError> {
        let name = self.parse_word("a name")?;
        self.skip_separators();
        let in_span = self.current().span;
        let values = if self.eat_keyword(Keyword::In) {
            keywords.push(ReservedWordNode { word: Keyword::In, span: in_span });
            let mut words = Vec::new();
            while matches!(self.current().kind, TokenKind::Word) && self.peek_keyword().is_none() {
                words.push(self.parse_word("a word")?);
            }
            self.skip_separators();
            Some(words)
        } else {
            None
        };
        Ok((name, values))
    }

    fn parse_for(&mut self, start: Span) -> Result<CompoundKind, ParseError> {
        let mut keywords = vec![ReservedWordNode { word: Keyword::For, span: start }];
        self.advance(); // 'for'
        let (name, values) = self.parse_name_in_values(&mut keywords)?;
        let body = self.parse_do_group("for", start, &mut keywords)?;
        Ok(CompoundKind::For { name, values, body, keywords })
    }

    fn parse_select(&mut self, start: Span) -> Result<CompoundKind, ParseError> {
        let mut keywords = vec![ReservedWordNode { word: Keyword::Select, span: start }];
        self.advance(); // 'select'
        let (name, values) = self.parse_name_in_values(&mut keywords)?;
        let body = self.parse_do_group("select", start, &mut keywords)?;
        Ok(CompoundKind::Select { name, values, body, keywords })
    }

    fn parse_while(&mut self, start: Span) -> Result<CompoundKind, ParseError> {
        let mut keywords = vec![ReservedWordNode { word: Keyword::While, span: start }];
        self.advance(); // 'while'
        let condition = self.parse_list(&[Keyword::Do])?;
        let body = self.parse_do_group("while", start, &mut keywords)?;
        Ok(CompoundKind::While { condition, body, keywords })
    }

    fn parse_until(&mut self, start: Span) -> Result<CompoundKind, ParseError> {
        let mut keywords = vec![ReservedWordNode { word: Keyword::Until, span: start }];
        self.advance(); // 'until'
        let condition = self.parse_list(&[Keyword::Do])?;
        let body = self.parse_do_group("until", start, &mut keywords)?;
        Ok(CompoundKind::Until { condition, body, keywords })
    }

    // ---- simple commands ---------------------------------------------------

    fn parse_simple_command(&mut self) -> Result<SimpleCommand, ParseError> {
        let start = self.current().span;
        let mut parts = Vec::new();
        loop {
            if let Some(redirect) = self.try_parse_redirect()? {
                parts.push(CommandPart::Redirect(redirect));
                continue;
            }
            if parts.iter().all(|p| !matches!(p, CommandPart::Word(_))) {
                if let Some(assignment) = self.try_parse_assignment()? {
                    parts.push(CommandPart::Assignment(assignment));
                    continue;
                }
            }
            // A reserved word is only recognized as the first word of a
            // command; once this simple command has at least one word,
            // later words are ordinary arguments no matter what they
            // spell (`grep -e then file` doesn't need `then` quoted).
            let word_is_keyword = parts.is_empty() && self.peek_keyword().is_some();
            if matches!(self.current().kind, TokenKind::Word) && !word_is_keyword {
                let word = self.parse_word("a word")?;
                parts.push(CommandPart::Word(word));
                continue;
            }
            break;
        }
        if parts.is_empty() {
            return Err(self.unexpected("a command"));
        }
        let end = self.prev_span();
        Ok(SimpleCommand {
            parts,
            span: start.cover(end),
        })
    }

    /// `NAME=value`, only recognized before the first ordinary word.
    fn try_parse_assignment(&mut self) -> Result<Option<Assignment>, ParseError> {
        let tok = self.current();
        if !matches!(tok.kind, TokenKind::Word) {
            return Ok(None);
        }
        let Some(eq) = tok.text.find('=') else { return Ok(None) };
        let name = &tok.text[..eq];
        if name.is_empty() || !is_valid_name(name) {
            return Ok(None);
        }
        let name = name.to_string();
        let value_text = tok.text[eq + 1..].to_string();
        let span = tok.span;
        self.advance();
        Ok(Some(Assignment {
            name,
            value: Word::literal(value_text, span),
            span,
        }))
    }

    fn parse_word(&mut self, expected: &'static str) -> Result<Word, ParseError> {
        let tok = self.current();
        if !matches!(tok.kind, TokenKind::Word) {
            return Err(self.unexpected(expected));
        }
        let word = Word {
            text: tok.text.clone(),
            span: tok.span,
            parts: Vec::new(),
        };
        self.advance();
        Ok(word)
    }

    // ---- redirections -------------------------------------------------------

    fn try_parse_redirect(&mut self) -> Result<Option<Redirect>, ParseError> {
        let (src_fd, start) = self.leading_io_number();
        let kind = match self.current().kind {
            TokenKind::Redirection(op) => op,
            _ => return Ok(None),
        };
        let op_span = self.current().span;
        self.advance();

        let target = if let Some(fd) = self.try_parse_dup_fd(kind) {
            RedirTarget::Fd(fd)
        } else if matches!(kind, RedirOp::HereDoc) {
            let strip_tabs = op_span.len() == 3; // "<<-" lexed as HereDoc too
            let word = self.parse_word("a here-document delimiter")?;
            RedirTarget::HereDocDelimiter { word, strip_tabs }
        } else {
            let word = self
                .parse_word("a redirection target")
                .map_err(|_| ParseError::MissingRedirectTarget { span: op_span })?;
            RedirTarget::Word(word)
        };
        let end = self.prev_span();
        Ok(Some(Redirect {
            src_fd,
            kind,
            target,
            span: start.cover(end),
        }))
    }

    /// A redirect may be preceded directly (no whitespace) by a
    /// file-descriptor number, as in `2>&1`.
    fn leading_io_number(&mut self) -> (Option<i32>, Span) {
        let tok = self.current();
        let start = tok.span;
        if matches!(tok.kind, TokenKind::Word)
            && !tok.text.is_empty()
            && tok.text.bytes().all(|b| b.is_ascii_digit())
        {
            if let Some(next) = self.tokens.get(self.pos + 1) {
                if matches!(next.kind, TokenKind::Redirection(_)) && next.is_adjacent() {
                    let fd = tok.text.parse().ok();
                    self.advance();
                    return (fd, start);
                }
            }
        }
        (None, start)
    }

    /// For `>&`/`<&`, a directly following `-` or all-digit word names the
    /// duplicated file descriptor (`2>&1`, `3<&-`) rather than an ordinary
    /// redirection target word. The lexer already fuses the `&` into the
    /// operator token itself (`>&`/`<&` are single entries in the lexer's
    /// multi-character-operator table), so there is no separate `&` token
    /// left here to match against — only the fd word that follows.
    fn try_parse_dup_fd(&mut self, kind: RedirOp) -> Option<i32> {
        if !matches!(kind, RedirOp::DupOut | RedirOp::DupIn) {
            return None;
        }
        let tok = self.current();
        if !matches!(tok.kind, TokenKind::Word) {
            return None;
        }
        if tok.text == "-" {
            self.advance();
            return Some(-1);
        }
        if !tok.text.is_empty() && tok.text.bytes().all(|b| b.is_ascii_digit()) {
            let fd: i32 = tok.text.parse().ok()?;
            self.advance();
            return Some(fd);
        }
        None
    }
}

/// Whether `list` closes with an explicit trailing `;` (grammar: `'{'
/// list ';' '}'`, spec §4.P) rather than just happening to stop where a
/// `}` was found. A trailing separator shows up as one more operator
/// than pipeline — see the invariant on [`crate::ast::List`].
fn list_ends_with_semicolon(list: &List) -> bool {
    if list.operators.len() != list.pipelines.len() {
        return false;
    }
    list.operators.last().is_some_and(|op| op.op == ListOp::Semi)
}

fn is_valid_name(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_alphabetic() || c == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

fn describe(tok: &Token) -> String {
    match &tok.kind {
        TokenKind::Eof => "end of input".to_string(),
        TokenKind::Word => format!("word `{}`", tok.text),
        TokenKind::Operator(op) => format!("`{op}`"),
        TokenKind::Redirection(op) => format!("`{op}`"),
        TokenKind::Paren(Paren::Open) => "`(`".to_string(),
        TokenKind::Paren(Paren::Close) => "`)`".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_str(s: &str) -> List {
        parse(&tokenize(s).unwrap()).unwrap()
    }

    #[test]
    fn parses_simple_command_with_redirect() {
        let list = parse_str("grep foo < input.txt > out.txt");
        let cmd = match &list.pipelines[0].commands[0] {
            PipelineCommand::Simple(c) => c,
            _ => panic!("expected simple command"),
        };
        let redirects: Vec<_> = cmd
            .parts
            .iter()
            .filter(|p| matches!(p, CommandPart::Redirect(_)))
            .collect();
        assert_eq!(redirects.len(), 2);
    }

    #[test]
    fn parses_and_or_list() {
        let list = parse_str("make && make install || echo failed");
        assert_eq!(list.pipelines.len(), 3);
        assert_eq!(list.operators.len(), 2);
        assert_eq!(list.operators[0].op, ListOp::AndAnd);
        assert_eq!(list.operators[1].op, ListOp::OrOr);
    }

    #[test]
    fn parses_negated_pipeline() {
        let list = parse_str("! grep foo bar.txt");
        assert!(list.pipelines[0].negated);
    }

    #[test]
    fn parses_subshell() {
        let list = parse_str("(cd /tmp && ls)");
        assert!(matches!(
            list.pipelines[0].commands[0],
            PipelineCommand::Compound(_)
        ));
    }

    #[test]
    fn parses_if_statement() {
        let list = parse_str("if grep -q foo file; then echo yes; else echo no; fi");
        let compound = match &list.pipelines[0].commands[0] {
            PipelineCommand::Compound(c) => c,
            _ => panic!("expected compound command"),
        };
        match &compound.kind {
            CompoundKind::If { branches, else_body, keywords } => {
                assert_eq!(branches.len(), 1);
                assert!(else_body.is_some());
                assert_eq!(keywords.first().unwrap().word, Keyword::If);
                assert_eq!(keywords.last().unwrap().word, Keyword::Fi);
            }
            _ => panic!("expected if"),
        }
    }

    #[test]
    fn parses_for_loop_with_explicit_values() {
        let list = parse_str("for f in a b c; do echo $f; done");
        let compound = match &list.pipelines[0].commands[0] {
            PipelineCommand::Compound(c) => c,
            _ => panic!("expected compound command"),
        };
        match &compound.kind {
            CompoundKind::For { values, .. } => {
                assert_eq!(values.as_ref().unwrap().len(), 3);
            }
            _ => panic!("expected for"),
        }
    }

    #[test]
    fn parses_function_definition_without_keyword() {
        let list = parse_str("greet() { echo hi; }");
        assert!(matches!(
            list.pipelines[0].commands[0],
            PipelineCommand::Function(_)
        ));
    }

    #[test]
    fn io_number_attaches_to_redirect() {
        let list = parse_str("cmd 2>&1");
        let cmd = match &list.pipelines[0].commands[0] {
            PipelineCommand::Simple(c) => c,
            _ => panic!("expected simple command"),
        };
        let redirect = cmd
            .parts
            .iter()
            .find_map(|p| match p {
                CommandPart::Redirect(r) => Some(r),
                _ => None,
            })
            .unwrap();
        assert_eq!(redirect.src_fd, Some(2));
        assert_eq!(redirect.target, RedirTarget::Fd(1));
    }

    #[test]
    fn reports_unclosed_subshell() {
        let err = parse(&tokenize("(echo hi").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::Unclosed { opener: "(", .. }));
    }

    #[test]
    fn dup_out_with_a_digit_target_is_a_file_descriptor() {
        let list = parse_str("cmd >&2");
        let cmd = match &list.pipelines[0].commands[0] {
            PipelineCommand::Simple(c) => c,
            _ => panic!("expected simple command"),
        };
        let redirect = cmd
            .parts
            .iter()
            .find_map(|p| match p {
                CommandPart::Redirect(r) => Some(r),
                _ => None,
            })
            .unwrap();
        assert_eq!(redirect.target, RedirTarget::Fd(2));
    }

    #[test]
    fn dup_out_with_a_dash_target_closes_the_descriptor() {
        let list = parse_str("cmd 2>&-");
        let cmd = match &list.pipelines[0].commands[0] {
            PipelineCommand::Simple(c) => c,
            _ => panic!("expected simple command"),
        };
        let redirect = cmd
            .parts
            .iter()
            .find_map(|p| match p {
                CommandPart::Redirect(r) => Some(r),
                _ => None,
            })
            .unwrap();
        assert_eq!(redirect.target, RedirTarget::Fd(-1));
    }

    #[test]
    fn dup_out_with_a_filename_target_is_an_ordinary_word() {
        let list = parse_str("cmd >&logfile");
        let cmd = match &list.pipelines[0].commands[0] {
            PipelineCommand::Simple(c) => c,
            _ => panic!("expected simple command"),
        };
        let redirect = cmd
            .parts
            .iter()
            .find_map(|p| match p {
                CommandPart::Redirect(r) => Some(r),
                _ => None,
            })
            .unwrap();
        assert!(matches!(&redirect.target, RedirTarget::Word(w) if w.text == "logfile"));
    }

    #[test]
    fn group_command_ended_by_background_instead_of_semicolon_is_rejected() {
        // The list stops right at `}`, same as a well-formed group, but its
        // trailing operator is `&` rather than the `;` the grammar requires.
        let err = parse(&tokenize("{ echo hi & }").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::ExpectedSemicolonInGroup { .. }));
    }

    #[test]
    fn empty_group_command_is_rejected() {
        let err = parse(&tokenize("{ }").unwrap()).unwrap_err();
        assert!(matches!(err, ParseError::ExpectedSemicolonInGroup { .. }));
    }

    #[test]
    fn group_command_with_a_trailing_semicolon_is_accepted() {
        let list = parse_str("{ echo hi; }");
        assert!(matches!(
            list.pipelines[0].commands[0],
            PipelineCommand::Compound(_)
        ));
    }
}

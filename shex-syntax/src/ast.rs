//! The position-annotated abstract syntax tree.
//!
//! Every node carries a [`Span`]. One invariant holds throughout this
//! module: a parent span always encloses every child span, and sibling
//! spans never overlap.

use crate::span::Span;
use crate::token::{Keyword, Operator, RedirOp};

/// What kind of expansion a [`Word`] contains.
///
/// The spec's data model only needs to *locate* expansions (for
/// highlighting and for excluding expanded words from man-page option
/// lookup), not evaluate them — evaluating parameter/command
/// substitutions is an explicit non-goal. So unlike a full shell AST this
/// has exactly the four members §3 names.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExpansionKind {
    /// `$(...)`, `` `...` `` (command substitution), or `<(...)`/`>(...)`
    /// (process substitution).
    Substitution,
    /// A leading `~` or `~user`.
    Tilde,
    /// `$name` or `${name}`.
    ParameterNamed,
    /// `$1`, `$@`, `$#`, etc.
    ParameterDigits,
}

/// A located expansion inside a [`Word`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Expansion {
    pub kind: ExpansionKind,
    pub span: Span,
}

/// A single shell word (§3 `Word`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Word {
    /// The unquoted text of the word.
    pub text: String,
    pub span: Span,
    /// Expansions found inside the word, in source order.
    pub parts: Vec<Expansion>,
}

impl Word {
    #[must_use]
    pub fn literal(text: impl Into<String>, span: Span) -> Self {
        Word {
            text: text.into(),
            span,
            parts: Vec::new(),
        }
    }

    /// Whether any part of this word came from an expansion, meaning its
    /// value can't be resolved at explain time (§4.M.a: such a word is
    /// never looked up in the man-page store).
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.parts.is_empty()
    }
}

/// A variable assignment preceding a simple command (`FOO=bar cmd`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    pub name: String,
    pub value: Word,
    pub span: Span,
}

/// The target of a [`Redirect`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum RedirTarget {
    /// An ordinary redirection target, e.g. the `file` in `>file`.
    Word(Word),
    /// `&n`: duplicate an existing file descriptor, as in `2>&1`.
    Fd(i32),
    /// The delimiter word of a `<<`/`<<-` here-document. The here-document
    /// body itself is not modeled (§4.P: "the body is not consumed by the
    /// core").
    HereDocDelimiter { word: Word, strip_tabs: bool },
}

/// A redirection (§3 `Redirect`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Redirect {
    /// The file descriptor being redirected, if explicitly given (e.g. the
    /// `2` in `2>&1`).
    pub src_fd: Option<i32>,
    pub kind: RedirOp,
    pub target: RedirTarget,
    pub span: Span,
}

/// A word, redirection or assignment inside a [`SimpleCommand`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CommandPart {
    Word(Word),
    Redirect(Redirect),
    Assignment(Assignment),
}

/// A simple command (§3 `Command`): a program name, arguments, assignments
/// and redirections, in source order.
///
/// Invariant: a simple command has at least one [`Word`] unless it
/// consists solely of redirections/assignments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SimpleCommand {
    pub parts: Vec<CommandPart>,
    pub span: Span,
}

impl SimpleCommand {
    #[must_use]
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.parts.iter().filter_map(|p| match p {
            CommandPart::Word(w) => Some(w),
            _ => None,
        })
    }

    #[must_use]
    pub fn first_word(&self) -> Option<&Word> {
        self.words().next()
    }
}

/// A `then`/condition pair in an `if` command, including every `elif`
/// clause.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IfBranch {
    pub condition: List,
    pub body: List,
}

/// The kind-specific part of a [`Compound`] command.
///
/// The minimal grammar in §4.P only names `(list)` and `{ list ; }`, but
/// §4.M.c's `compound_stack` and §4.H's `COMPOUND_RESERVED_WORDS` tables
/// only make sense if `if`/`for`/`while`/`until`/`select` are parsed as
/// compound commands too, so this enum implements that fuller set (see
/// `DESIGN.md`, Open Question 1).
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum CompoundKind {
    /// `(` list `)`
    Subshell {
        body: List,
        open_span: Span,
        close_span: Span,
    },
    /// `{` list `;` `}`
    Group {
        body: List,
        open_span: Span,
        close_span: Span,
    },
    If {
        branches: Vec<IfBranch>,
        else_body: Option<List>,
        /// Every `if`/`then`/`elif`/`else`/`fi` occurrence, in source order
        /// (§4.M.c: the matcher annotates each one independently).
        keywords: Vec<ReservedWordNode>,
    },
    For {
        name: Word,
        values: Option<Vec<Word>>,
        body: List,
        keywords: Vec<ReservedWordNode>,
    },
    While {
        condition: List,
        body: List,
        keywords: Vec<ReservedWordNode>,
    },
    Until {
        condition: List,
        body: List,
        keywords: Vec<ReservedWordNode>,
    },
    Select {
        name: Word,
        values: Option<Vec<Word>>,
        body: List,
        keywords: Vec<ReservedWordNode>,
    },
}

/// A compound command together with any redirections that apply to it as
/// a whole (§3 `Compound`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Compound {
    pub kind: CompoundKind,
    pub redirects: Vec<Redirect>,
    pub span: Span,
}

/// A function definition (§3 `Function`): `name () compound-command`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Function {
    /// Whether the definition used the optional `function` keyword.
    pub has_keyword: bool,
    pub name: Word,
    pub body: Box<Compound>,
    pub span: Span,
}

/// One element of a [`Pipeline`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum PipelineCommand {
    Simple(SimpleCommand),
    Compound(Box<Compound>),
    Function(Box<Function>),
}

impl PipelineCommand {
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            PipelineCommand::Simple(c) => c.span,
            PipelineCommand::Compound(c) => c.span,
            PipelineCommand::Function(f) => f.span,
        }
    }
}

/// A `|` or `|&` separating two pipeline elements (§3 `Pipe`).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PipeOp {
    /// `|`
    Bar,
    /// `|&`
    BarAmp,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipe {
    pub op: PipeOp,
    pub span: Span,
}

/// Commands connected by `|`/`|&`, optionally negated with a leading `!`
/// (§3 `Pipeline`).
///
/// Invariant: `pipes.len() == commands.len() - 1`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Pipeline {
    pub negated: bool,
    /// The span of the `!`, if `negated`.
    pub bang_span: Option<Span>,
    pub commands: Vec<PipelineCommand>,
    pub pipes: Vec<Pipe>,
    pub span: Span,
}

/// A `;`, `&`, `&&` or `||` connecting list elements (§3 `Operator`, used
/// at the `List` level).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ListOp {
    Semi,
    Amp,
    AndAnd,
    OrOr,
}

impl From<Operator> for Option<ListOp> {
    fn from(op: Operator) -> Self {
        match op {
            Operator::Semi => Some(ListOp::Semi),
            Operator::Amp => Some(ListOp::Amp),
            Operator::AndAnd => Some(ListOp::AndAnd),
            Operator::OrOr => Some(ListOp::OrOr),
            Operator::Pipe | Operator::PipeAmp => None,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListOperator {
    pub op: ListOp,
    pub span: Span,
}

/// A sequence of pipelines separated by `;`, `&`, `&&` or `||` (§3 `List`).
///
/// Invariant: `operators.len() == pipelines.len() - 1`, except that a
/// trailing `;`/`&` with no following pipeline is recorded as a trailing
/// operator with no corresponding pipeline (the command line `foo &`
/// parses to one pipeline and one trailing operator).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct List {
    pub pipelines: Vec<Pipeline>,
    pub operators: Vec<ListOperator>,
    pub span: Span,
}

impl List {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pipelines.is_empty()
    }
}

/// A reserved word occurrence, kept as its own node so the matcher can
/// attach help text to it independent of command grouping (§3
/// `ReservedWord`).
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReservedWordNode {
    pub word: Keyword,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_command_span_matches_variant() {
        let cmd = SimpleCommand {
            parts: vec![],
            span: Span::new(0, 3),
        };
        let pc = PipelineCommand::Simple(cmd);
        assert_eq!(pc.span(), Span::new(0, 3));
    }

    #[test]
    fn list_op_excludes_pipe_operators() {
        let none: Option<ListOp> = Operator::Pipe.into();
        assert_eq!(none, None);
        let some: Option<ListOp> = Operator::Semi.into();
        assert_eq!(some, Some(ListOp::Semi));
    }
}

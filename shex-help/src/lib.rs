//! Static documentation strings for shell syntax that isn't backed by a
//! man page: pipes, operators, redirections, reserved words and the
//! handful of other constructs the matcher (§4.M) annotates directly
//! instead of looking up in the [`Store`](shex_store::Store) (§4.H).
//!
//! Every entry here is plain prose written for this crate; it covers the
//! same subject matter as a shell's own manual but is not copied from
//! any manual page.

/// A pipeline connecting two or more commands with `|` or `|&`.
pub const PIPELINE: &str = "\
A pipeline is a sequence of one or more commands connected by `|` or `|&`. \
Each command's standard output feeds the next command's standard input; \
with `|&` the standard error is piped along with it. The pipeline's exit \
status is the exit status of its last command, unless negated by a \
leading `!`.";

/// `;` as a sequential command separator.
pub const SEMICOLON: &str = "\
Commands separated by `;` run one after another; the shell waits for \
each to finish before starting the next. The exit status of the \
sequence is the exit status of the last command run.";

/// `&` as a background operator.
pub const BACKGROUND: &str = "\
A command (or pipeline) followed by `&` is started in the background: \
the shell does not wait for it to finish and immediately reports an \
exit status of 0.";

/// `&&` / `||` short-circuiting lists.
pub const AND_OR: &str = "\
`&&` runs the command on its right only if the command on its left \
exited successfully; `||` runs its right-hand command only if the \
left-hand one failed. Both associate left to right, and the exit \
status of the whole list is the exit status of the last command \
actually run.";

/// Generic redirection preamble, shown when a more specific kind isn't
/// available.
pub const REDIRECTION: &str = "\
A redirection changes where a command's input comes from or where its \
output goes, by attaching a file descriptor to a file, another \
descriptor, or a pipe. Redirections are processed left to right and \
take effect before the command runs.";

const REDIR_IN: &str = "\
`[n]<word` opens `word` for reading on file descriptor `n` (or \
descriptor 0, standard input, if `n` is omitted).";

const REDIR_OUT: &str = "\
`[n]>word` opens `word` for writing on file descriptor `n` (or \
descriptor 1, standard output, if `n` is omitted), creating it if it \
doesn't exist and truncating it if it does.";

const REDIR_APPEND: &str = "\
`[n]>>word` opens `word` for appending on file descriptor `n` (or \
descriptor 1 if `n` is omitted), creating it if it doesn't exist.";

const REDIR_HEREDOC: &str = "\
`<<word` (or `<<-word` to also strip leading tabs from the body) reads \
input up to a line containing only `word`, and supplies everything read \
as the command's standard input.";

const REDIR_HERESTRING: &str = "\
`<<<word` expands `word` and supplies the result, followed by a \
newline, as the command's standard input.";

const REDIR_DUP_OUT: &str = "\
`[n]>&m` duplicates file descriptor `m` onto `n` (standard output by \
default) for output; `&>word`/`>&word` instead redirect both standard \
output and standard error to `word`.";

const REDIR_DUP_IN: &str = "\
`[n]<&m` duplicates file descriptor `m` onto `n` (standard input by \
default) for input.";

const REDIR_OUT_ERR_APPEND: &str = "\
`&>>word` appends both standard output and standard error to `word`.";

/// Looks up the documentation for a redirection operator's spelling
/// (`<`, `>`, `>>`, `<<`, `<<<`, `>&`, `<&`, `&>`, `&>>`).
#[must_use]
pub fn redirection_kind(op: &str) -> &'static str {
    match op {
        "<" => REDIR_IN,
        ">" => REDIR_OUT,
        ">>" => REDIR_APPEND,
        "<<" => REDIR_HEREDOC,
        "<<<" => REDIR_HERESTRING,
        ">&" | "&>" => REDIR_DUP_OUT,
        "<&" => REDIR_DUP_IN,
        "&>>" => REDIR_OUT_ERR_APPEND,
        _ => REDIRECTION,
    }
}

/// Looks up the documentation for a list-level operator (`;`, `&`, `&&`,
/// `||`).
#[must_use]
pub fn operator(op: &str) -> &'static str {
    match op {
        ";" => SEMICOLON,
        "&" => BACKGROUND,
        "&&" | "||" => AND_OR,
        _ => PIPELINE,
    }
}

const BANG: &str = "\
A leading `!` negates the exit status of the pipeline that follows it: \
the pipeline's own (possibly non-zero) status becomes the logical \
negation, so a failing pipeline reports success and vice versa.";

const BRACE_GROUP: &str = "\
`{ list; }` runs `list` in the current shell environment, without a \
subshell. Unlike `(` and `)`, `{` and `}` are reserved words and must be \
surrounded by whitespace or another metacharacter.";

/// The `( list )` subshell construct.
pub const SUBSHELL: &str = "\
`( list )` runs `list` in a subshell: a forked copy of the current \
environment. Variable assignments and built-ins that change shell \
state inside the subshell don't affect the parent shell.";

/// Looks up the documentation for a standalone reserved word (`!`, `{`,
/// `}`) outside of any compound-command context.
#[must_use]
pub fn reserved_word(word: &str) -> &'static str {
    match word {
        "!" => BANG,
        "{" | "}" => BRACE_GROUP,
        _ => BRACE_GROUP,
    }
}

const IF_CLAUSE: &str = "\
`if list; then list; [elif list; then list;]... [else list;] fi` runs \
the `if` list; if it exits successfully, the following `then` list \
runs. Otherwise each `elif` list is tried in turn, running its `then` \
list on the first success, falling back to the `else` list if none \
succeed.";

const FOR_CLAUSE: &str = "\
`for name [in word...]; do list; done` assigns each `word` to `name` in \
turn and runs `list` once per assignment. Without an explicit `in \
word...`, the positional parameters are used instead.";

const WHILE_UNTIL_CLAUSE: &str = "\
`while list-1; do list-2; done` repeats `list-2` for as long as the \
last command of `list-1` succeeds; `until` is the same but repeats \
while `list-1` keeps failing.";

const SELECT_CLAUSE: &str = "\
`select name [in word...]; do list; done` prints each `word` numbered \
on standard error, reads a number from standard input into `name`, and \
runs `list` once per selection until a `break`.";

/// Which compound command a reserved word is currently being read inside
/// of, for the purposes of picking contextual help text (§4.M.c).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CompoundContext {
    If,
    For,
    While,
    Until,
    Select,
}

/// Looks up the documentation for a reserved word given the compound
/// command it currently appears inside of, e.g. `done` inside a `for`
/// loop gets the for-loop's documentation rather than the while-loop's.
///
/// Returns `None` if `word` isn't a reserved word belonging to `ctx`.
#[must_use]
pub fn compound_reserved_word(ctx: CompoundContext, word: &str) -> Option<&'static str> {
    use CompoundContext::*;
    let belongs = match ctx {
        If => matches!(word, "if" | "then" | "elif" | "else" | "fi" | ";"),
        For => matches!(word, "for" | "in" | "do" | "done" | ";"),
        While => matches!(word, "while" | "do" | "done"),
        Until => matches!(word, "until" | "do" | "done"),
        Select => matches!(word, "select" | "in" | "do" | "done"),
    };
    if !belongs {
        return None;
    }
    Some(match ctx {
        If => IF_CLAUSE,
        For => FOR_CLAUSE,
        While | Until => WHILE_UNTIL_CLAUSE,
        Select => SELECT_CLAUSE,
    })
}

/// `NAME=value` preceding a simple command.
pub const ASSIGNMENT: &str = "\
A word of the form `name=value` appearing before a command's program \
name sets `name` to `value` in the environment of that command only, \
without affecting the shell's own variables.";

/// A `#`-prefixed comment running to the end of the line.
pub const COMMENT: &str = "A `#` starts a comment that runs to the end of the line.";

/// Emitted for a resolved program with nothing further to say about it
/// (no synopsis on record).
pub const NO_SYNOPSIS: &str = "No manual page synopsis is available for this program.";

/// A `name() { ... }` or `function name { ... }` function definition.
pub const FUNCTION_DECL: &str = "\
This defines a shell function: a named, reusable list of commands \
stored for later invocation by that name within the current shell.";

/// A call to a previously defined function, parameterized by its name.
#[must_use]
pub fn function_call(name: &str) -> String {
    format!("Calls the shell function `{name}`, defined earlier in this command line.")
}

/// An argument passed to a previously defined function, parameterized by
/// the function's name.
#[must_use]
pub fn function_arg(name: &str) -> String {
    format!("Argument passed to the shell function `{name}`.")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redirection_kind_covers_all_spellings() {
        for op in ["<", ">", ">>", "<<", "<<<", ">&", "<&", "&>", "&>>"] {
            assert!(!redirection_kind(op).is_empty());
        }
    }

    #[test]
    fn operator_covers_all_list_operators() {
        for op in [";", "&", "&&", "||"] {
            assert!(!operator(op).is_empty());
        }
    }

    #[test]
    fn compound_reserved_word_is_context_sensitive() {
        let for_done = compound_reserved_word(CompoundContext::For, "done").unwrap();
        let while_done = compound_reserved_word(CompoundContext::While, "done").unwrap();
        assert_ne!(for_done, while_done);
    }

    #[test]
    fn compound_reserved_word_rejects_mismatched_context() {
        assert_eq!(compound_reserved_word(CompoundContext::For, "while"), None);
    }

    #[test]
    fn function_helpers_interpolate_the_name() {
        assert!(function_call("greet").contains("greet"));
        assert!(function_arg("greet").contains("greet"));
    }
}

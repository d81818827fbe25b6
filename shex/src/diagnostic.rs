//! Optional pretty-printing of [`ExplainError`] with `annotate-snippets`.
//! Only the CLI needs this; the library API surface (`explain`) never
//! requires it.

use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

use crate::ExplainError;

/// Renders `error` as a one-shot annotated snippet of `source`, the
/// input string `error` was produced from.
#[must_use]
pub fn render(error: &ExplainError, source: &str) -> String {
    let (range, label) = match error {
        ExplainError::Syntax(e) => {
            let span = e.span();
            (span.start..span.end, e.to_string())
        }
        ExplainError::Store(e) => (0..source.len(), e.to_string()),
    };

    let snippet = Snippet::source(source).annotation(AnnotationKind::Primary.span(range).label(&label));
    let group = Level::ERROR.primary_title(error.to_string()).elements([snippet]);
    Renderer::styled().render(&[group]).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shex_store::InMemoryStore;

    #[test]
    fn renders_a_syntax_error_with_its_span_label() {
        let store = InMemoryStore::new();
        let input = "echo 'unterminated";
        let err = crate::explain(input, &store).unwrap_err();
        let rendered = render(&err, input);
        assert!(rendered.contains("unclosed"));
    }

    #[test]
    fn renders_the_promoted_store_error() {
        let store = InMemoryStore::new();
        let input = "totallyunknownprogram";
        let err = crate::explain(input, &store).unwrap_err();
        let rendered = render(&err, input);
        assert!(rendered.contains("no man page found"));
    }
}

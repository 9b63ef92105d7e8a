use crate::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn label(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            span,
        }
    }

    pub fn warning(message: impl Into<String>, span: Span) -> Self {
        Self {
            severity: Severity::Warning,
            message: message.into(),
            span,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Maps byte offsets to line/column positions and renders diagnostics.
pub struct SourceMap<'a> {
    name: &'a str,
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> SourceMap<'a> {
    pub fn new(name: &'a str, source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(i + 1);
            }
        }
        Self {
            name,
            source,
            line_starts,
        }
    }

    /// Returns (1-indexed line, 1-indexed column).
    pub fn line_col(&self, byte_offset: usize) -> (usize, usize) {
        let offset = byte_offset.min(self.source.len());
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        (line + 1, offset - self.line_starts[line] + 1)
    }

    /// Render a diagnostic in rustc-style format.
    pub fn render(&self, diag: &Diagnostic) -> String {
        if diag.span.is_dummy() {
            return format!("{}: {}\n --> {}", diag.severity.label(), diag.message, self.name);
        }

        let (line, col) = self.line_col(diag.span.start);
        let text_start = self.line_starts[line - 1];
        let text_end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        let text = self.source[text_start..text_end].trim_end_matches(['\n', '\r']);

        let pad = " ".repeat(line.to_string().len());
        let carets = "^".repeat(diag.span.len().max(1));

        format!(
            "{severity}: {msg}\n\
             {pad} --> {name}:{line}:{col}\n\
             {pad} |\n\
             {line} | {text}\n\
             {pad} | {spaces}{carets}",
            severity = diag.severity.label(),
            msg = diag.message,
            name = self.name,
            spaces = " ".repeat(col - 1),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_counts_from_one() {
        let map = SourceMap::new("a.lsl", "integer X = 1;\nfoo() {}\n");
        assert_eq!(map.line_col(0), (1, 1));
        assert_eq!(map.line_col(15), (2, 1));
        assert_eq!(map.line_col(17), (2, 3));
    }

    #[test]
    fn render_points_at_span() {
        let source = "default {\n    bogus\n}\n";
        let map = SourceMap::new("a.lsl", source);
        let diag = Diagnostic::error("expected '('", Span::new(14, 19));
        let out = map.render(&diag);
        assert!(out.starts_with("error: expected '('"), "got: {}", out);
        assert!(out.contains("a.lsl:2:5"), "got: {}", out);
        assert!(out.contains("^^^^^"), "got: {}", out);
    }
}

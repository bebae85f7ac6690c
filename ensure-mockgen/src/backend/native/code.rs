//! Builder for tab-indented Go source.

/// Fluent API for building Go code with tab indentation.
///
/// ```ignore
/// let mut builder = CodeBuilder::new();
/// builder.push_block("func main() {", |b| {
///     b.push_line("fmt.Println(\"hello\")");
/// });
/// assert_eq!(builder.build(), "func main() {\n\tfmt.Println(\"hello\")\n}\n");
/// ```
#[derive(Debug, Clone, Default)]
pub(crate) struct CodeBuilder {
    indent_level: usize,
    buffer: String,
}

impl CodeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line of code with current indentation.
    pub fn push_line(&mut self, s: &str) -> &mut Self {
        for _ in 0..self.indent_level {
            self.buffer.push('\t');
        }
        self.buffer.push_str(s);
        self.buffer.push('\n');
        self
    }

    /// Add a blank line.
    pub fn push_blank(&mut self) -> &mut Self {
        self.buffer.push('\n');
        self
    }

    pub fn push_indent(&mut self) -> &mut Self {
        self.indent_level += 1;
        self
    }

    pub fn push_dedent(&mut self) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self
    }

    /// Add `header`, the indented body built by `f`, and a closing `}`.
    pub fn push_block<F>(&mut self, header: &str, f: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        self.push_line(header).push_indent();
        f(self);
        self.push_dedent().push_line("}")
    }

    /// Consume the builder and return the generated code.
    pub fn build(self) -> String {
        self.buffer
    }
}

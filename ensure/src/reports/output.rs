//! Where reports are written.

use std::io::{self, Stdout, Write};

/// Target output for reports.
///
/// Methods follow what `ensure` reports on: mocks that were written and
/// stray paths below a mock root.
pub trait Output {
    /// Start a list, e.g. `Generated` or `Would remove`.
    fn heading(&mut self, name: &str) -> io::Result<()>;

    /// A mock file written for `package`.
    fn mock(&mut self, path: &str, package: &str) -> io::Result<()>;

    /// A path below a mock root that is not expected.
    fn stray(&mut self, path: &str) -> io::Result<()>;

    /// A standalone line, used when a list would be empty.
    fn note(&mut self, text: &str) -> io::Result<()>;

    fn blank(&mut self) -> io::Result<()>;
}

/// A report that can render itself to an output.
pub trait Report {
    fn render(&self, out: &mut dyn Output) -> io::Result<()>;
}

/// Plain text output, one entry per line.
pub struct TerminalOutput<W = Stdout> {
    writer: W,
}

impl TerminalOutput {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for TerminalOutput<W> {
    fn heading(&mut self, name: &str) -> io::Result<()> {
        writeln!(self.writer, "{name}:")
    }

    fn mock(&mut self, path: &str, package: &str) -> io::Result<()> {
        writeln!(self.writer, "  + {path} ({package})")
    }

    fn stray(&mut self, path: &str) -> io::Result<()> {
        writeln!(self.writer, "  - {path}")
    }

    fn note(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.writer, "{text}")
    }

    fn blank(&mut self) -> io::Result<()> {
        writeln!(self.writer)
    }
}

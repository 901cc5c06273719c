//! Output collection for command execution.
//!
//! Every command produces an ordered sequence of lines: query results and
//! diagnostics alike. The executor and the layers below it write into an
//! [`Output`] sink passed down explicitly; the caller decides where the
//! collected lines end up (stdout for the shell, a log buffer for batch
//! execution, assertions in tests).

/// Collects the lines a command prints.
#[derive(Debug, Default)]
pub struct Output {
    lines: Vec<String>,
}

impl Output {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one output line
    pub fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// All lines collected so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Drain the collected lines
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Whether anything has been written
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True if some collected line contains the given fragment
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines.iter().any(|l| l.contains(fragment))
    }
}

use std::io::{self, Write};
use colored::*;
use crate::scanner::{MatchResult, ScanError};

/// Counts gathered while printing a scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub matched: usize,
    pub warnings: usize,
}

/// Writes scan output: matches to `out`, warnings and errors to `err`.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    summary: ScanSummary,
}

impl Reporter<io::Stdout, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdout(), io::stderr())
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E) -> Self {
        Self {
            out,
            err,
            summary: ScanSummary::default(),
        }
    }

    /// `<fullPath>: <label>`, never coloured so the output stays greppable.
    pub fn matched(&mut self, result: &MatchResult) -> io::Result<()> {
        self.summary.matched += 1;
        writeln!(self.out, "{}: {}", result.path.display(), result.label)
    }

    pub fn warning(&mut self, error: &ScanError) -> io::Result<()> {
        self.summary.warnings += 1;
        writeln!(self.err, "{} {}", "warning:".yellow().bold(), error)
    }

    pub fn error(&mut self, message: &dyn std::fmt::Display) -> io::Result<()> {
        writeln!(self.err, "{} {}", "error:".red().bold(), message)
    }

    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

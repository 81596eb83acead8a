//! Per-run merge statistics
//!
//! One [`MergeStats`] is owned by a single merge run and handed by `&mut`
//! to each stage that counts something.

use std::fmt;

/// Counters accumulated while merging
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Comments that survived filtering
    pub comments_kept: usize,
    /// Comments dropped by the filter
    pub comments_removed: usize,
    /// Toolchange lines seen in the body stream
    pub toolchanges: usize,
    /// Synthetic subroutine calls inserted
    pub toolchange_calls: usize,
    /// Lines that received a fresh `N` number
    pub lines_renumbered: usize,
    /// Lines in the header segment
    pub header_lines: usize,
    /// Lines in the normalized body stream
    pub body_lines: usize,
    /// Lines in the assembled program, separators and closing block included
    pub total_output_lines: usize,
    /// Findings recorded by the validator
    pub validation_errors: Vec<String>,
}

impl MergeStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.validation_errors.is_empty()
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.validation_errors.push(message.into());
    }
}

impl fmt::Display for MergeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Lines in output: {}", self.total_output_lines)?;
        writeln!(f, "N-lines renumbered: {}", self.lines_renumbered)?;
        writeln!(f, "Toolchanges found: {}", self.toolchanges)?;
        writeln!(f, "Toolchange-calls inserted: {}", self.toolchange_calls)?;
        writeln!(f, "Comments kept: {}", self.comments_kept)?;
        write!(f, "Comments removed: {}", self.comments_removed)?;
        if !self.validation_errors.is_empty() {
            write!(f, "\nVALIDATION ERRORS:")?;
            for error in &self.validation_errors {
                write!(f, "\n{}", error)?;
            }
        }
        Ok(())
    }
}

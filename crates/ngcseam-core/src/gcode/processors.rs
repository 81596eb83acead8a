//! Line processor implementations for body normalization

use super::classify::{
    has_sequence_number, is_comment, is_toolchange, strip_sequence_number, LineClassifier,
    LineKind,
};
use super::pipeline::LineProcessor;
use crate::stats::MergeStats;

/// Default name of the LinuxCNC toolchange subroutine
pub const DEFAULT_TOOLCHANGE_SUBROUTINE: &str = "toolchange";

/// Default first `N` number after renumbering
pub const DEFAULT_RENUMBER_START: u64 = 10;

/// Default `N` increment
pub const DEFAULT_RENUMBER_STEP: u64 = 10;

/// Drops generic comments, keeps operation and tool comments
///
/// With `keep_all` set every comment is kept. Both outcomes are counted.
#[derive(Debug, Clone)]
pub struct CommentFilter {
    classifier: LineClassifier,
    keep_all: bool,
}

impl CommentFilter {
    /// Comment filter using the built-in important prefixes
    pub fn new(keep_all: bool) -> Self {
        Self::with_classifier(LineClassifier::new(), keep_all)
    }

    pub fn with_classifier(classifier: LineClassifier, keep_all: bool) -> Self {
        Self {
            classifier,
            keep_all,
        }
    }
}

impl LineProcessor for CommentFilter {
    fn name(&self) -> &str {
        "comment_filter"
    }

    fn description(&self) -> &str {
        "Removes comments that do not name an operation, tool or toolchange"
    }

    fn process(&mut self, line: String, stats: &mut MergeStats) -> Vec<String> {
        match self.classifier.classify(&line) {
            LineKind::Comment { important } if important || self.keep_all => {
                stats.comments_kept += 1;
                vec![line]
            }
            LineKind::Comment { .. } => {
                stats.comments_removed += 1;
                tracing::debug!("Comment removed: {}", line.trim());
                vec![]
            }
            _ => vec![line],
        }
    }
}

/// Counts toolchanges and optionally calls a subroutine before each one
///
/// The inserted line has the fixed form `O <name> call`.
#[derive(Debug, Clone)]
pub struct ToolchangeProcessor {
    insert_call: bool,
    subroutine: String,
}

impl ToolchangeProcessor {
    pub fn new(insert_call: bool, subroutine: impl Into<String>) -> Self {
        Self {
            insert_call,
            subroutine: subroutine.into(),
        }
    }

    /// The synthetic subroutine call line
    pub fn call_line(&self) -> String {
        format!("O <{}> call", self.subroutine)
    }
}

impl Default for ToolchangeProcessor {
    fn default() -> Self {
        Self::new(false, DEFAULT_TOOLCHANGE_SUBROUTINE)
    }
}

impl LineProcessor for ToolchangeProcessor {
    fn name(&self) -> &str {
        "toolchange"
    }

    fn description(&self) -> &str {
        "Counts Tn M6 toolchanges and inserts a subroutine call before each when enabled"
    }

    fn process(&mut self, line: String, stats: &mut MergeStats) -> Vec<String> {
        if is_comment(&line) || !is_toolchange(&line) {
            return vec![line];
        }

        stats.toolchanges += 1;
        if !self.insert_call {
            return vec![line];
        }

        let call = self.call_line();
        tracing::debug!("Inserted {} before: {}", call, line.trim());
        stats.toolchange_calls += 1;
        vec![call, line]
    }
}

/// Replaces existing `N` numbers with a fresh sequence
///
/// Numbers are handed out in output order starting at `start` and
/// increasing by `step`. Lines without an `N` word pass through and do not
/// consume a number. Once the sequence would run past `u64::MAX` the
/// remaining lines keep their original numbers.
#[derive(Debug, Clone)]
pub struct Renumberer {
    next: Option<u64>,
    step: u64,
    enabled: bool,
}

impl Renumberer {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            next: Some(start),
            step,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for Renumberer {
    fn default() -> Self {
        Self::new(DEFAULT_RENUMBER_START, DEFAULT_RENUMBER_STEP)
    }
}

impl LineProcessor for Renumberer {
    fn name(&self) -> &str {
        "renumber"
    }

    fn description(&self) -> &str {
        "Renumbers N-words sequentially from a configurable start and step"
    }

    fn process(&mut self, line: String, stats: &mut MergeStats) -> Vec<String> {
        if is_comment(&line) || !has_sequence_number(&line) {
            return vec![line];
        }
        let Some(number) = self.next else {
            return vec![line];
        };

        let code = strip_sequence_number(&line);
        let numbered = if code.is_empty() {
            format!("N{}", number)
        } else {
            format!("N{} {}", number, code)
        };
        tracing::debug!("Renumbered: {} -> {}", line.trim(), numbered.trim());

        self.next = number.checked_add(self.step);
        if self.next.is_none() {
            tracing::warn!(
                "Sequence numbers exhausted after N{}; remaining lines keep their numbers",
                number
            );
        }
        stats.lines_renumbered += 1;
        vec![numbered]
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(processor: &mut dyn LineProcessor, lines: &[&str], stats: &mut MergeStats) -> Vec<String> {
        lines
            .iter()
            .flat_map(|l| processor.process(l.to_string(), stats))
            .collect()
    }

    #[test]
    fn test_comment_filter_is_selective() {
        let mut stats = MergeStats::new();
        let mut filter = CommentFilter::new(false);
        let out = run(&mut filter, &["(2D Contour1)", "(Machine)", "G0 X0"], &mut stats);
        assert_eq!(out, vec!["(2D Contour1)", "G0 X0"]);
        assert_eq!(stats.comments_kept, 1);
        assert_eq!(stats.comments_removed, 1);
    }

    #[test]
    fn test_comment_filter_keep_all() {
        let mut stats = MergeStats::new();
        let mut filter = CommentFilter::new(true);
        let out = run(&mut filter, &["(2D Contour1)", "(Machine)"], &mut stats);
        assert_eq!(out.len(), 2);
        assert_eq!(stats.comments_kept, 2);
        assert_eq!(stats.comments_removed, 0);
    }

    #[test]
    fn test_toolchange_counted_without_insertion() {
        let mut stats = MergeStats::new();
        let mut processor = ToolchangeProcessor::default();
        let out = run(&mut processor, &["N25 T1 M6", "G0 X0"], &mut stats);
        assert_eq!(out, vec!["N25 T1 M6", "G0 X0"]);
        assert_eq!(stats.toolchanges, 1);
        assert_eq!(stats.toolchange_calls, 0);
    }

    #[test]
    fn test_toolchange_call_precedes_toolchange() {
        let mut stats = MergeStats::new();
        let mut processor = ToolchangeProcessor::new(true, "my_tc");
        let out = run(&mut processor, &["G0 Z5", "T2 M6"], &mut stats);
        assert_eq!(out, vec!["G0 Z5", "O <my_tc> call", "T2 M6"]);
        assert_eq!(stats.toolchanges, 1);
        assert_eq!(stats.toolchange_calls, 1);
    }

    #[test]
    fn test_renumber_sequence() {
        let mut stats = MergeStats::new();
        let mut renumberer = Renumberer::new(100, 5);
        let out = run(
            &mut renumberer,
            &["N7 G90", "G0 X1", "  N3\tG1 X2", "N9"],
            &mut stats,
        );
        assert_eq!(out, vec!["N100 G90", "G0 X1", "N105 G1 X2", "N110"]);
        assert_eq!(stats.lines_renumbered, 3);
    }

    #[test]
    fn test_renumber_stops_at_end_of_range() {
        let mut stats = MergeStats::new();
        let mut renumberer = Renumberer::new(u64::MAX - 5, 10);
        let out = run(&mut renumberer, &["N1 G0 X0", "N2 G1 X1", "N3 G1 X2"], &mut stats);
        assert_eq!(
            out,
            vec![format!("N{} G0 X0", u64::MAX - 5), "N2 G1 X1".to_string(), "N3 G1 X2".to_string()]
        );
        assert_eq!(stats.lines_renumbered, 1);
    }

    #[test]
    fn test_renumber_leaves_comments_alone() {
        let mut stats = MergeStats::new();
        let mut renumberer = Renumberer::default();
        let out = run(&mut renumberer, &["(N10 is a note)"], &mut stats);
        assert_eq!(out, vec!["(N10 is a note)"]);
        assert_eq!(stats.lines_renumbered, 0);
    }
}

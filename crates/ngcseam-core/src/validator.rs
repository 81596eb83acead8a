//! Post-assembly structural checks
//!
//! Validation never fails a run. Every finding is appended to
//! [`MergeStats::validation_errors`] and shows up in the summary.

use crate::assemble::AssembledProgram;
use crate::gcode::classify::{is_comment, is_program_end, is_toolchange, PERCENT_TERMINATOR};
use crate::stats::MergeStats;

pub const MSG_BAD_LAST_LINE: &str = "Output does not end with %";
pub const MSG_MISSING_END: &str = "No M30 found in output (should end program)";
pub const MSG_DUPLICATE_END: &str = "Multiple M30 lines found in output";

/// Structural validator for merged programs
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputValidator;

impl OutputValidator {
    pub fn new() -> Self {
        Self
    }

    /// Check a merged program and record findings in `stats`.
    ///
    /// Returns the number of findings added.
    pub fn validate(&self, program: &AssembledProgram, stats: &mut MergeStats) -> usize {
        let before = stats.validation_errors.len();
        let lines = program.lines();

        let last = lines.iter().rev().find(|line| !line.trim().is_empty());
        if last.map(|line| line.trim()) != Some(PERCENT_TERMINATOR) {
            stats.record_error(MSG_BAD_LAST_LINE);
        }

        match lines.iter().filter(|line| is_program_end(line)).count() {
            0 => stats.record_error(MSG_MISSING_END),
            1 => {}
            _ => stats.record_error(MSG_DUPLICATE_END),
        }

        let found = lines
            .iter()
            .filter(|line| !is_comment(line) && is_toolchange(line))
            .count();
        if found != stats.toolchanges {
            stats.record_error(format!(
                "Internal error: toolchange count mismatch ({} vs {})",
                found, stats.toolchanges
            ));
        }

        let added = stats.validation_errors.len() - before;
        if added > 0 {
            tracing::warn!("Validation recorded {} finding(s)", added);
        }
        added
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn program(lines: &[&str]) -> AssembledProgram {
        AssembledProgram::from_lines(lines.iter().map(|l| l.to_string()).collect())
    }

    #[test]
    fn test_clean_program_has_no_findings() {
        let mut stats = MergeStats {
            toolchanges: 1,
            ..Default::default()
        };
        let added = OutputValidator::new().validate(
            &program(&["%", "", "N10 T1 M6", "", "M5", "G53 G0 Z0.", "M30", "%", ""]),
            &mut stats,
        );
        assert_eq!(added, 0);
        assert!(stats.is_valid());
    }

    #[test]
    fn test_duplicate_program_end_reported_once() {
        let mut stats = MergeStats::new();
        OutputValidator::new().validate(
            &program(&["%", "M30", "", "M5", "G53 G0 Z0.", "M30", "%"]),
            &mut stats,
        );
        assert_eq!(stats.validation_errors, vec![MSG_DUPLICATE_END.to_string()]);
    }

    #[test]
    fn test_missing_end_and_wrong_last_line() {
        let mut stats = MergeStats::new();
        OutputValidator::new().validate(&program(&["%", "G0 X0"]), &mut stats);
        assert_eq!(
            stats.validation_errors,
            vec![MSG_BAD_LAST_LINE.to_string(), MSG_MISSING_END.to_string()]
        );
    }

    #[test]
    fn test_toolchange_mismatch() {
        let mut stats = MergeStats {
            toolchanges: 2,
            ..Default::default()
        };
        OutputValidator::new().validate(&program(&["N10 T1 M6", "M30", "%"]), &mut stats);
        assert_eq!(
            stats.validation_errors,
            vec!["Internal error: toolchange count mismatch (1 vs 2)".to_string()]
        );
    }

    #[test]
    fn test_commented_end_code_is_not_counted() {
        let mut stats = MergeStats::new();
        OutputValidator::new().validate(&program(&["(ends with M30)", "M30", "%"]), &mut stats);
        assert!(stats.is_valid());
    }
}

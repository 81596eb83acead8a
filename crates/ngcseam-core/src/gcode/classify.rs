//! Line classification for CAM-exported G-code
//!
//! Every line falls into exactly one [`LineKind`], decided by fixed textual
//! rules applied in priority order:
//!
//! 1. comment (`(` after leading whitespace)
//! 2. toolchange (`T<n> M6`, optionally behind an `N` word)
//! 3. sequenced instruction (`N<digits>`)
//! 4. terminator (`M30` anywhere, or exactly `%` / `M2`)
//! 5. everything else
//!
//! The individual predicates are public. The segment extractor and the
//! validator need narrower questions than the full classification, e.g. a
//! sequence-numbered `N500 M30` is a sequenced instruction but still ends
//! the program.

use regex::Regex;
use std::sync::OnceLock;

/// Program end and rewind
pub const PROGRAM_END: &str = "M30";

/// Tape delimiter that opens and closes a program
pub const PERCENT_TERMINATOR: &str = "%";

/// Program end without rewind
pub const ALT_PROGRAM_END: &str = "M2";

/// Comment prefixes (after the opening parenthesis) that mark an operation
/// or tool comment worth keeping.
pub const IMPORTANT_COMMENT_PREFIXES: &[&str] = &[
    "2d",
    "3d",
    "drill",
    "contour",
    "tool",
    "operation",
    "adaptive",
    "facing",
    "slot",
    "bore",
    "tap",
    "thread",
    "change",
];

/// Category of a single G-code line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Parenthesized comment
    Comment {
        /// Whether the comment names an operation, tool or toolchange
        important: bool,
    },
    /// Tool select and change (`T<n> M6`)
    Toolchange,
    /// Instruction carrying an `N` sequence number
    Sequenced,
    /// Program end code or percent delimiter
    Terminator,
    /// Anything else, passed through untouched
    Other,
}

impl LineKind {
    /// True for both important and generic comments
    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment { .. })
    }
}

fn toolchange_regex() -> &'static Regex {
    static TOOLCHANGE_REGEX: OnceLock<Regex> = OnceLock::new();
    TOOLCHANGE_REGEX.get_or_init(|| {
        Regex::new(r"^[ \t]*(?:N\d+[ \t]*)?T\d+[ \t]+M6\b").expect("invalid regex pattern")
    })
}

fn sequence_number_regex() -> &'static Regex {
    static SEQUENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    SEQUENCE_REGEX.get_or_init(|| Regex::new(r"^[ \t]*N(\d+)[ \t]*").expect("invalid regex pattern"))
}

/// Line starts with an opening parenthesis (leading whitespace ignored)
pub fn is_comment(line: &str) -> bool {
    line.trim_start().starts_with('(')
}

/// Comment whose text begins with one of `prefixes`, compared case-insensitively
pub fn is_important_comment_with<S: AsRef<str>>(line: &str, prefixes: &[S]) -> bool {
    let lowered = line.trim().to_lowercase();
    let Some(body) = lowered.strip_prefix('(') else {
        return false;
    };
    prefixes
        .iter()
        .any(|prefix| body.starts_with(&prefix.as_ref().to_lowercase()))
}

/// Comment beginning with one of the built-in [`IMPORTANT_COMMENT_PREFIXES`]
pub fn is_important_comment(line: &str) -> bool {
    is_important_comment_with(line, IMPORTANT_COMMENT_PREFIXES)
}

/// `T<n> M6`, with or without a leading `N` word
pub fn is_toolchange(line: &str) -> bool {
    toolchange_regex().is_match(line)
}

/// Line begins with `N` followed by at least one digit
pub fn has_sequence_number(line: &str) -> bool {
    sequence_number_regex().is_match(line)
}

/// The existing `N` number, if the line carries one
pub fn sequence_number(line: &str) -> Option<u64> {
    sequence_number_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Remove the leading `N` word and the blanks after it.
///
/// Leading indentation goes with it. Lines without a sequence number come
/// back unchanged.
pub fn strip_sequence_number(line: &str) -> &str {
    match sequence_number_regex().find(line) {
        Some(m) => &line[m.end()..],
        None => line,
    }
}

/// `M30` anywhere on the line, or exactly `%` / `M2` after trimming
pub fn is_terminator(line: &str) -> bool {
    let trimmed = line.trim();
    line.contains(PROGRAM_END) || trimmed == PERCENT_TERMINATOR || trimmed == ALT_PROGRAM_END
}

/// Non-comment line carrying the program end code
pub fn is_program_end(line: &str) -> bool {
    !is_comment(line) && line.contains(PROGRAM_END)
}

/// The machine-coordinate Z retract that closes a Fusion 360 setup block,
/// `N<sequence> G53 G0 Z0.`
pub fn is_header_retract(line: &str, sequence: u32) -> bool {
    let mut words = line.split([' ', '\t']).filter(|w| !w.is_empty());
    let expected = format!("N{}", sequence);
    words.next() == Some(expected.as_str())
        && words.next() == Some("G53")
        && words.next() == Some("G0")
        && words.next().is_some_and(|z| z.starts_with("Z0."))
}

/// Classifies lines by the rules in the module documentation.
///
/// The set of important comment prefixes is configurable; everything else
/// is fixed.
#[derive(Debug, Clone)]
pub struct LineClassifier {
    important_prefixes: Vec<String>,
}

impl LineClassifier {
    /// Classifier with the built-in important comment prefixes
    pub fn new() -> Self {
        Self::with_prefixes(IMPORTANT_COMMENT_PREFIXES.iter().copied())
    }

    /// Classifier with a custom set of important comment prefixes
    pub fn with_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            important_prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn important_prefixes(&self) -> &[String] {
        &self.important_prefixes
    }

    pub fn classify(&self, line: &str) -> LineKind {
        if is_comment(line) {
            LineKind::Comment {
                important: is_important_comment_with(line, &self.important_prefixes),
            }
        } else if is_toolchange(line) {
            LineKind::Toolchange
        } else if has_sequence_number(line) {
            LineKind::Sequenced
        } else if is_terminator(line) {
            LineKind::Terminator
        } else {
            LineKind::Other
        }
    }
}

impl Default for LineClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Classify with the built-in prefixes
pub fn classify(line: &str) -> LineKind {
    static DEFAULT_CLASSIFIER: OnceLock<LineClassifier> = OnceLock::new();
    DEFAULT_CLASSIFIER.get_or_init(LineClassifier::new).classify(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_takes_priority() {
        assert_eq!(
            classify("(T1 M6 flat end mill)"),
            LineKind::Comment { important: false }
        );
        assert_eq!(
            classify("(Tool change T1 M6)"),
            LineKind::Comment { important: true }
        );
        assert_eq!(
            classify("  (N10 program note)"),
            LineKind::Comment { important: false }
        );
    }

    #[test]
    fn test_important_prefixes_are_case_insensitive() {
        assert!(is_important_comment("(2D Contour1)"));
        assert!(is_important_comment("(ADAPTIVE2)"));
        assert!(is_important_comment("  (Drill3)"));
        assert!(!is_important_comment("(Machine)"));
        assert!(!is_important_comment("(T1  D=6. CR=0.)"));
        assert!(!is_important_comment("G0 X0 (2d)"));
    }

    #[test]
    fn test_toolchange_forms() {
        assert_eq!(classify("N25 T1 M6"), LineKind::Toolchange);
        assert_eq!(classify("T12 M6"), LineKind::Toolchange);
        assert_eq!(classify("  N5\tT3\tM6 (tool)"), LineKind::Toolchange);
        assert_eq!(classify("N25 T1"), LineKind::Sequenced);
        assert_eq!(classify("T1 M60"), LineKind::Other);
    }

    #[test]
    fn test_sequenced_and_terminators() {
        assert_eq!(classify("N30 G0 X0 Y0"), LineKind::Sequenced);
        assert_eq!(classify("N500 M30"), LineKind::Sequenced);
        assert_eq!(classify("M30"), LineKind::Terminator);
        assert_eq!(classify(" % "), LineKind::Terminator);
        assert_eq!(classify("M2"), LineKind::Terminator);
        assert_eq!(classify("M25"), LineKind::Other);
        assert_eq!(classify("Nope"), LineKind::Other);
        assert_eq!(classify(""), LineKind::Other);
    }

    #[test]
    fn test_terminator_predicate_ignores_priority() {
        assert!(is_terminator("N500 M30"));
        assert!(is_program_end("N500 M30"));
        assert!(!is_program_end("(M30 ends the program)"));
    }

    #[test]
    fn test_sequence_number_helpers() {
        assert_eq!(sequence_number("N120 G1 X5"), Some(120));
        assert_eq!(sequence_number("G1 X5"), None);
        assert_eq!(strip_sequence_number("  N120 \tG1 X5"), "G1 X5");
        assert_eq!(strip_sequence_number("G1 X5"), "G1 X5");
        assert_eq!(strip_sequence_number("N7"), "");
    }

    #[test]
    fn test_header_retract() {
        assert!(is_header_retract("N20 G53 G0 Z0.", 20));
        assert!(is_header_retract("  N20\tG53 G0 Z0.000", 20));
        assert!(!is_header_retract("N200 G53 G0 Z0.", 20));
        assert!(!is_header_retract("N20 G53 G0 Z0", 20));
        assert!(!is_header_retract("N20 G53 G0 Z0.", 10));
        assert!(is_header_retract("N10 G53 G0 Z0.", 10));
    }

    #[test]
    fn test_custom_prefixes() {
        let classifier = LineClassifier::with_prefixes(["pocket"]);
        assert_eq!(
            classifier.classify("(Pocket1)"),
            LineKind::Comment { important: true }
        );
        assert_eq!(
            classifier.classify("(2D Contour1)"),
            LineKind::Comment { important: false }
        );
    }
}

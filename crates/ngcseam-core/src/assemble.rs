//! Final program assembly
//!
//! Header, normalized body and the fixed closing block, separated by single
//! blank lines.

/// Spindle stop, machine-coordinate Z retract, program end, tape delimiter.
///
/// Appended exactly once to every merged program.
pub const CLOSING_BLOCK: [&str; 4] = ["M5", "G53 G0 Z0.", "M30", "%"];

/// A fully assembled program as a flat line sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledProgram {
    lines: Vec<String>,
}

impl AssembledProgram {
    /// Header verbatim, blank line, body, blank line, closing block
    pub fn assemble(header: &[String], body: &[String]) -> Self {
        let mut lines = Vec::with_capacity(header.len() + body.len() + CLOSING_BLOCK.len() + 2);
        lines.extend(header.iter().cloned());
        lines.push(String::new());
        lines.extend(body.iter().cloned());
        lines.push(String::new());
        lines.extend(CLOSING_BLOCK.iter().map(|l| l.to_string()));
        Self { lines }
    }

    /// Wrap an already assembled line sequence, e.g. one read back from disk
    pub fn from_lines(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-terminated program text
    pub fn to_text(&self) -> String {
        let mut text = String::with_capacity(self.lines.iter().map(|l| l.len() + 1).sum());
        for line in &self.lines {
            text.push_str(line);
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_layout() {
        let program = AssembledProgram::assemble(
            &owned(&["%", "N10 G90", "N20 G53 G0 Z0."]),
            &owned(&["(2D Contour1)", "N10 T1 M6"]),
        );
        assert_eq!(
            program.lines(),
            owned(&[
                "%",
                "N10 G90",
                "N20 G53 G0 Z0.",
                "",
                "(2D Contour1)",
                "N10 T1 M6",
                "",
                "M5",
                "G53 G0 Z0.",
                "M30",
                "%",
            ])
            .as_slice()
        );
        assert_eq!(program.len(), 11);
    }

    #[test]
    fn test_empty_inputs_still_close_program() {
        let program = AssembledProgram::assemble(&[], &[]);
        assert_eq!(program.lines(), owned(&["", "", "M5", "G53 G0 Z0.", "M30", "%"]).as_slice());
        assert_eq!(program.to_text(), "\n\nM5\nG53 G0 Z0.\nM30\n%\n");
    }
}

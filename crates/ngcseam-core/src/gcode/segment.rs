//! Header and body extraction from a single program
//!
//! Segments borrow from the program they were cut from; they live only
//! until the merged body stream has been built.

use super::classify::{is_comment, is_header_retract, is_terminator, is_toolchange};

/// Default sequence number of the `G53 G0 Z0.` retract that ends the setup block
pub const DEFAULT_HEADER_RETRACT_SEQUENCE: u32 = 20;

/// Machine setup block taken from the first program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderSegment<'a> {
    /// Lines from the top of the program up to and including the boundary
    pub lines: &'a [String],
    /// False when no boundary line was found and the whole program was taken
    pub found_boundary: bool,
}

/// Operation content of one program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySegment<'a> {
    /// Lines from the first operation marker up to (excluding) the terminator
    pub lines: &'a [String],
    /// Index of the first body line in the program, if an operation marker was found
    pub start: Option<usize>,
    /// False when the program ran out without a terminator
    pub terminated: bool,
}

impl<'a> BodySegment<'a> {
    fn empty() -> Self {
        Self {
            lines: &[],
            start: None,
            terminated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Take lines up to and including the setup boundary.
///
/// The boundary is either `N<retract_sequence> G53 G0 Z0.` or the first
/// toolchange, whichever comes first. Without a boundary the whole input
/// becomes the header.
pub fn extract_header(lines: &[String], retract_sequence: u32) -> HeaderSegment<'_> {
    let boundary = lines
        .iter()
        .position(|line| is_header_retract(line, retract_sequence) || is_toolchange(line));

    match boundary {
        Some(index) => {
            tracing::debug!("Header ends at: {}", lines[index].trim());
            HeaderSegment {
                lines: &lines[..=index],
                found_boundary: true,
            }
        }
        None => {
            tracing::debug!(
                "No header boundary found, using all {} lines as header",
                lines.len()
            );
            HeaderSegment {
                lines,
                found_boundary: false,
            }
        }
    }
}

/// Take lines from the first comment or toolchange up to the first terminator.
///
/// The terminator itself is excluded. Comments never terminate the body even
/// when they mention an end code.
pub fn extract_body(lines: &[String]) -> BodySegment<'_> {
    let Some(start) = lines
        .iter()
        .position(|line| is_comment(line) || is_toolchange(line))
    else {
        tracing::debug!("No operation marker found, body is empty");
        return BodySegment::empty();
    };
    tracing::debug!("Body starts at: {}", lines[start].trim());

    let end = lines[start..]
        .iter()
        .position(|line| !is_comment(line) && is_terminator(line))
        .map(|offset| start + offset);

    match end {
        Some(end) => {
            tracing::debug!("Body ends at: {}", lines[end].trim());
            BodySegment {
                lines: &lines[start..end],
                start: Some(start),
                terminated: true,
            }
        }
        None => {
            tracing::debug!("Body runs to end of input without a terminator");
            BodySegment {
                lines: &lines[start..],
                start: Some(start),
                terminated: false,
            }
        }
    }
}

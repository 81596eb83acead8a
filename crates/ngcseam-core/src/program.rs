//! Source programs and merge ordering
//!
//! Programs are read fully into memory and never modified afterwards.
//! In directory mode the merge order comes from the last number in front of
//! the `.ngc` extension (`part2.ngc` before `part10.ngc`); files without such
//! a number are left out.

use crate::error::{MergeError, MergeResult};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// File extension of programs picked up in directory mode
pub const NGC_EXTENSION: &str = "ngc";

/// One source program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// File the program was read from
    pub path: PathBuf,
    /// Zero-based position in the merge order
    pub ordinal: usize,
    /// Raw lines without terminators
    pub lines: Vec<String>,
}

impl Program {
    /// Build a program from in-memory text
    pub fn from_text(path: impl Into<PathBuf>, ordinal: usize, text: &str) -> Self {
        Self {
            path: path.into(),
            ordinal,
            lines: split_lines(text),
        }
    }

    /// Read a program from disk
    pub fn load(path: impl AsRef<Path>, ordinal: usize) -> MergeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| MergeError::io(path, e))?;
        Ok(Self::from_text(path, ordinal, &text))
    }

    /// Read several programs, numbering them in the given order
    pub fn load_all<P: AsRef<Path>>(paths: &[P]) -> MergeResult<Vec<Self>> {
        paths
            .iter()
            .enumerate()
            .map(|(ordinal, path)| Self::load(path, ordinal))
            .collect()
    }
}

fn line_break_regex() -> &'static Regex {
    static LINE_BREAK_REGEX: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK_REGEX.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("invalid regex pattern"))
}

/// Split on `\r\n`, `\n` or a lone `\r`; a final terminator ends the last line.
fn split_lines(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = line_break_regex().split(text).map(str::to_string).collect();
    if lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

fn trailing_number_regex() -> &'static Regex {
    static TRAILING_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    TRAILING_NUMBER_REGEX
        .get_or_init(|| Regex::new(r"(?i)(\d+)\.ngc$").expect("invalid regex pattern"))
}

/// The number directly in front of the `.ngc` extension
///
/// `part12.ngc` gives 12, `op3_v2.ngc` gives 2, `partX.ngc` gives `None`.
pub fn file_sort_key(file_name: &str) -> Option<u64> {
    trailing_number_regex()
        .captures(file_name)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Numbered `.ngc` files in `dir`, ascending by their trailing number.
///
/// Equal numbers are ordered by file name. A directory without any numbered
/// program is an error.
pub fn numbered_programs_in(dir: &Path) -> MergeResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(MergeError::NotADirectory(dir.to_path_buf()));
    }

    let entries = std::fs::read_dir(dir).map_err(|e| MergeError::io(dir, e))?;
    let mut numbered = Vec::new();

    for entry in entries {
        let entry = entry.map_err(|e| MergeError::io(dir, e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        match file_sort_key(name) {
            Some(key) => numbered.push((key, name.to_string(), path)),
            None => tracing::debug!("Skipping unnumbered file {}", name),
        }
    }

    if numbered.is_empty() {
        return Err(MergeError::NoNumberedFiles {
            dir: dir.to_path_buf(),
        });
    }

    numbered.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    Ok(numbered.into_iter().map(|(_, _, path)| path).collect())
}

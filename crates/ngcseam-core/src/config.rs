//! Merge configuration
//!
//! Defaults reproduce the stock behaviour: renumber from N10 in steps of 10,
//! keep only operation/tool comments, no toolchange subroutine calls.
//! A configuration file (`.toml` or `.json`) may override any field; missing
//! fields keep their defaults.

use crate::error::ConfigError;
use crate::gcode::classify::{LineClassifier, IMPORTANT_COMMENT_PREFIXES};
use crate::gcode::processors::{
    DEFAULT_RENUMBER_START, DEFAULT_RENUMBER_STEP, DEFAULT_TOOLCHANGE_SUBROUTINE,
};
use crate::gcode::segment::DEFAULT_HEADER_RETRACT_SEQUENCE;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Number of lines a renumbering range must be able to cover
pub const MAX_RENUMBERED_LINES: u64 = 1_000_000;

/// Settings for one merge run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    /// Replace `N` numbers with a fresh sequence
    pub renumber: bool,
    /// Keep every comment instead of only important ones
    pub keep_all_comments: bool,
    /// Insert `O <subroutine> call` before every toolchange
    pub insert_toolchange_call: bool,
    /// Subroutine named by the inserted call
    pub toolchange_subroutine: String,
    /// First number handed out when renumbering
    pub renumber_start: u64,
    /// Increment between renumbered lines
    pub renumber_step: u64,
    /// `N` number of the `G53 G0 Z0.` retract that closes the header
    pub header_retract_sequence: u32,
    /// Comment prefixes that mark a comment as worth keeping
    pub important_comment_prefixes: Vec<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            renumber: true,
            keep_all_comments: false,
            insert_toolchange_call: false,
            toolchange_subroutine: DEFAULT_TOOLCHANGE_SUBROUTINE.to_string(),
            renumber_start: DEFAULT_RENUMBER_START,
            renumber_step: DEFAULT_RENUMBER_STEP,
            header_retract_sequence: DEFAULT_HEADER_RETRACT_SEQUENCE,
            important_comment_prefixes: IMPORTANT_COMMENT_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}

impl MergeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a `.toml` or `.json` file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => toml::from_str(&content)?,
            Some(ext) if ext.eq_ignore_ascii_case("json") => serde_json::from_str(&content)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };

        config.validate()?;
        tracing::debug!("Loaded merge config from {}", path.display());
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.renumber_step == 0 {
            return Err(ConfigError::ZeroRenumberStep);
        }

        let last = self
            .renumber_step
            .checked_mul(MAX_RENUMBERED_LINES)
            .and_then(|span| self.renumber_start.checked_add(span));
        if last.is_none() {
            return Err(ConfigError::RenumberRangeOverflow {
                start: self.renumber_start,
                step: self.renumber_step,
            });
        }

        let name = self.toolchange_subroutine.trim();
        if name.is_empty() || name.contains(['<', '>']) || name != self.toolchange_subroutine {
            return Err(ConfigError::InvalidSubroutine(
                self.toolchange_subroutine.clone(),
            ));
        }

        Ok(())
    }

    /// Line classifier honouring the configured comment prefixes
    pub fn classifier(&self) -> LineClassifier {
        LineClassifier::with_prefixes(self.important_comment_prefixes.iter().cloned())
    }
}

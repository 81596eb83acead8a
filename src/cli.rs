//! Merge command line
//!
//! Two invocation forms share one positional list:
//!
//! - `ngcseam <dir> <output>` merges the numbered `.ngc` files of `dir`
//! - `ngcseam <input>... <output>` merges the inputs in the given order

use anyhow::Context;
use clap::Parser;
use ngcseam_core::{numbered_programs_in, MergeConfig, MergeError};
use std::path::PathBuf;

/// Exit status when directory mode finds nothing to merge
pub const EXIT_NO_NUMBERED_FILES: u8 = 2;

/// Exit status for every other fatal error
pub const EXIT_FAILURE: u8 = 1;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ngcseam",
    version,
    long_version = crate::LONG_VERSION,
    about = "Merge Fusion 360 .ngc files in correct order for LinuxCNC",
    long_about = "Merge Fusion 360 .ngc files in correct order for LinuxCNC. \
                  Output is renumbered and cleaned unless options override."
)]
pub struct MergeArgs {
    /// Input files or a directory, followed by the output file
    #[arg(required = true, num_args = 2.., value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Do NOT renumber N-lines
    #[arg(long)]
    pub no_renumber: bool,

    /// Keep all comments (default: only operation/tool comments are kept)
    #[arg(long)]
    pub keep_all_comments: bool,

    /// Insert O <toolchange> call before every toolchange (Tn M6)
    #[arg(long)]
    pub insert_toolchange_call: bool,

    /// Append all output to this log file
    #[arg(long, value_name = "LOGFILE")]
    pub log: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Merge settings file (.toml or .json); flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Resolved inputs and output of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeInvocation {
    /// Programs in merge order
    pub inputs: Vec<PathBuf>,
    pub output: PathBuf,
}

impl MergeArgs {
    /// Settings from `--config` (or defaults) with the flags applied on top
    pub fn merge_config(&self) -> anyhow::Result<MergeConfig> {
        let mut config = match &self.config {
            Some(path) => MergeConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MergeConfig::default(),
        };

        if self.no_renumber {
            config.renumber = false;
        }
        if self.keep_all_comments {
            config.keep_all_comments = true;
        }
        if self.insert_toolchange_call {
            config.insert_toolchange_call = true;
        }

        Ok(config)
    }

    /// Split the positional paths into inputs and output.
    ///
    /// Directory mode applies only to exactly one directory plus the output.
    pub fn resolve(&self) -> Result<MergeInvocation, MergeError> {
        let (output, inputs) = self.paths.split_last().ok_or(MergeError::NoInputs)?;
        if inputs.is_empty() {
            return Err(MergeError::NoInputs);
        }

        if let [dir] = inputs {
            if dir.is_dir() {
                let files = numbered_programs_in(dir)?;
                tracing::debug!("Detected input order:");
                for file in &files {
                    tracing::debug!(
                        "  {}",
                        file.file_name().unwrap_or_default().to_string_lossy()
                    );
                }
                return Ok(MergeInvocation {
                    inputs: files,
                    output: output.clone(),
                });
            }
        }

        tracing::debug!("File list mode. Input files:");
        for file in inputs {
            tracing::debug!("  {}", file.display());
        }
        Ok(MergeInvocation {
            inputs: inputs.to_vec(),
            output: output.clone(),
        })
    }
}

/// Process exit status for a fatal error
pub fn exit_status(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<MergeError>() {
        Some(MergeError::NoNumberedFiles { .. }) => EXIT_NO_NUMBERED_FILES,
        _ => EXIT_FAILURE,
    }
}

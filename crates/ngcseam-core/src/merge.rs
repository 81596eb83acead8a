//! Merge orchestration
//!
//! ```text
//! programs ─┬─ program 1 ──> header
//!           └─ every program ──> body ──> merged body ──> pipeline
//!                                                            │
//!                     header + body + closing block <────────┘
//!                                  │
//!                              validator ──> stats
//! ```

use crate::assemble::AssembledProgram;
use crate::config::MergeConfig;
use crate::error::{ConfigError, MergeError, MergeResult};
use crate::gcode::pipeline::ProcessorPipeline;
use crate::gcode::segment::{extract_body, extract_header};
use crate::program::Program;
use crate::stats::MergeStats;
use crate::validator::OutputValidator;
use std::io::Write;
use std::path::Path;

/// Banner written in front of the summary
pub const SUMMARY_BANNER: &str = "===== MERGE SUMMARY =====";

/// Result of an in-memory merge
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub program: AssembledProgram,
    pub stats: MergeStats,
}

/// Merges programs according to a [`MergeConfig`]
#[derive(Debug, Clone)]
pub struct Merger {
    config: MergeConfig,
    validator: OutputValidator,
}

impl Merger {
    /// Create a merger, rejecting invalid configurations
    pub fn new(config: MergeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            validator: OutputValidator::new(),
        })
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Merge already loaded programs without touching the filesystem.
    ///
    /// The header comes from the first program, bodies from all of them in
    /// slice order.
    pub fn merge(&self, programs: &[Program]) -> MergeResult<MergeOutcome> {
        let first = programs.first().ok_or(MergeError::NoInputs)?;
        let mut stats = MergeStats::new();

        let header = extract_header(&first.lines, self.config.header_retract_sequence);
        tracing::debug!("Header extracted, length: {}", header.lines.len());
        stats.header_lines = header.lines.len();

        let mut merged_body = Vec::new();
        for program in programs {
            tracing::debug!(
                "Processing file {}/{}: {}",
                program.ordinal + 1,
                programs.len(),
                program.path.display()
            );

            let body = extract_body(&program.lines);
            tracing::debug!(
                "Body extracted from {}, length: {}",
                program.path.display(),
                body.lines.len()
            );
            if let (Some(first_line), Some(last_line)) = (body.lines.first(), body.lines.last()) {
                tracing::debug!("First body line: {}", first_line.trim());
                tracing::debug!("Last body line: {}", last_line.trim());
            }
            if !body.terminated {
                tracing::debug!("{} has no program terminator", program.path.display());
            }

            merged_body.extend_from_slice(body.lines);
        }

        let mut pipeline = ProcessorPipeline::from_config(&self.config);
        let normalized = pipeline.process_lines(merged_body, &mut stats);
        stats.body_lines = normalized.len();

        let program = AssembledProgram::assemble(header.lines, &normalized);
        stats.total_output_lines = program.len();

        self.validator.validate(&program, &mut stats);

        Ok(MergeOutcome { program, stats })
    }

    /// Load `inputs`, merge them into `output` and write the summary to `report`.
    ///
    /// The output file only appears once it is complete. Validation findings
    /// do not fail the run; they are part of the returned statistics.
    pub fn run<P: AsRef<Path>>(
        &self,
        inputs: &[P],
        output: &Path,
        report: &mut dyn Write,
    ) -> MergeResult<MergeStats> {
        let programs = Program::load_all(inputs)?;
        let outcome = self.merge(&programs)?;

        write_output(output, &outcome.program.to_text())?;
        tracing::debug!(
            "Merged {} program(s) into {}",
            programs.len(),
            output.display()
        );

        write_report(report, output, &outcome.stats).map_err(MergeError::Report)?;
        Ok(outcome.stats)
    }
}

fn write_report(report: &mut dyn Write, output: &Path, stats: &MergeStats) -> std::io::Result<()> {
    writeln!(report, "Combined to: {}", output.display())?;
    writeln!(report)?;
    writeln!(report, "{}", SUMMARY_BANNER)?;
    writeln!(report, "{}", stats)?;
    report.flush()
}

fn write_output(path: &Path, text: &str) -> MergeResult<()> {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(|e| MergeError::io(path, e))?;
    file.write_all(text.as_bytes())
        .and_then(|_| file.flush())
        .map_err(|e| MergeError::io(path, e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(file.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(|e| MergeError::io(path, e))?;
    }

    file.persist(path).map_err(|e| MergeError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

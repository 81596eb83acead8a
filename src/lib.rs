//! # ngcseam
//!
//! Command-line front end for merging Fusion 360 post-processed LinuxCNC
//! programs, plus a Fusion 360 tool library to `tool.tbl` converter.
//!
//! ## Architecture
//!
//! 1. **ngcseam-core** - classification, segment extraction, normalization,
//!    assembly and validation of G-code programs
//! 2. **ngcseam-toollib** - tool library model and tool table rendering
//! 3. **ngcseam** - both binaries, argument handling and logging setup

pub mod cli;
pub mod tee;

pub use cli::{exit_status, MergeArgs, MergeInvocation, EXIT_FAILURE, EXIT_NO_NUMBERED_FILES};
pub use tee::TeeWriter;

/// Version string shown by `--version`
pub const LONG_VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("BUILD_DATE"), ")");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output through `writer` (console, optionally mirrored to a log file)
/// - INFO by default, DEBUG with `verbose`
/// - RUST_LOG environment variable support
pub fn init_logging(verbose: bool, writer: TeeWriter) -> anyhow::Result<()> {
    use std::io::IsTerminal;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = fmt::layer()
        .with_ansi(ansi_enabled(writer.has_file(), std::io::stdout().is_terminal()))
        .with_writer(writer)
        .with_target(false)
        .with_level(true)
        .without_time();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Colour only reaches an interactive console, never a log file or a pipe
fn ansi_enabled(has_file: bool, stdout_is_terminal: bool) -> bool {
    !has_file && stdout_is_terminal
}

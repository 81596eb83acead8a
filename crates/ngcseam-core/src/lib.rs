//! # ngcseam core
//!
//! Merges several CAM-exported G-code programs (one file per operation) into
//! a single program that runs on LinuxCNC without manual editing.
//!
//! ## Pipeline
//!
//! - **Header**: taken verbatim from the first program, up to the safety
//!   retract or the first toolchange
//! - **Bodies**: from the first operation comment or toolchange up to the
//!   program terminator, concatenated in input order
//! - **Normalization**: comment filtering, optional toolchange subroutine
//!   calls, `N` renumbering
//! - **Assembly**: header, body and a fixed closing block
//! - **Validation**: structural self-checks reported through [`MergeStats`]

pub mod assemble;
pub mod config;
pub mod error;
pub mod gcode;
pub mod merge;
pub mod program;
pub mod stats;
pub mod validator;

pub use assemble::{AssembledProgram, CLOSING_BLOCK};
pub use config::MergeConfig;
pub use error::{ConfigError, MergeError, MergeResult};
pub use merge::{MergeOutcome, Merger, SUMMARY_BANNER};
pub use program::{file_sort_key, numbered_programs_in, Program, NGC_EXTENSION};
pub use stats::MergeStats;
pub use validator::OutputValidator;

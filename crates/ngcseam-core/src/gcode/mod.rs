//! G-code line handling
//!
//! This module provides:
//! - Line classification
//! - Header and body segment extraction
//! - The body normalization pipeline and its processors

pub mod classify;
pub mod pipeline;
pub mod processors;
pub mod segment;

pub use classify::{classify, LineClassifier, LineKind};
pub use pipeline::{LineProcessor, ProcessorHandle, ProcessorPipeline};
pub use processors::{CommentFilter, Renumberer, ToolchangeProcessor};
pub use segment::{extract_body, extract_header, BodySegment, HeaderSegment};

//! Body stream normalization pipeline
//!
//! The merged body stream runs line by line through an ordered list of
//! [`LineProcessor`]s. A processor may pass a line through, drop it, or
//! expand it into several lines; whatever it returns is fed to the next
//! processor. The only state carried across lines is what a processor keeps
//! for itself (the renumbering counter).

use super::processors::{CommentFilter, Renumberer, ToolchangeProcessor};
use crate::config::MergeConfig;
use crate::stats::MergeStats;

/// A single normalization rule over the body stream
///
/// # Examples
/// - Comment filtering
/// - Toolchange subroutine call insertion
/// - Sequence number renumbering
pub trait LineProcessor {
    /// Get the name/identifier of this processor
    fn name(&self) -> &str;

    /// Get a description of what this processor does
    fn description(&self) -> &str;

    /// Process one line.
    ///
    /// Returns the lines to hand on, in order. An empty vector drops the line.
    fn process(&mut self, line: String, stats: &mut MergeStats) -> Vec<String>;

    /// Disabled processors are skipped by the pipeline
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Boxed processor owned by a pipeline
pub type ProcessorHandle = Box<dyn LineProcessor>;

/// Ordered sequence of line processors
///
/// # Example
/// ```
/// use ngcseam_core::gcode::{CommentFilter, ProcessorPipeline, Renumberer};
/// use ngcseam_core::MergeStats;
///
/// let mut pipeline = ProcessorPipeline::new();
/// pipeline.register(Box::new(CommentFilter::new(false)));
/// pipeline.register(Box::new(Renumberer::new(10, 10)));
///
/// let mut stats = MergeStats::new();
/// let out = pipeline.process_lines(vec!["(note)".to_string(), "N7 G0 X1".to_string()], &mut stats);
/// assert_eq!(out, vec!["N10 G0 X1".to_string()]);
/// ```
pub struct ProcessorPipeline {
    processors: Vec<ProcessorHandle>,
}

impl ProcessorPipeline {
    /// Create a new empty processor pipeline
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
        }
    }

    /// The fixed normalization order: comment filtering, toolchange handling,
    /// renumbering.
    pub fn from_config(config: &MergeConfig) -> Self {
        let mut pipeline = Self::new();
        pipeline
            .register(Box::new(CommentFilter::with_classifier(
                config.classifier(),
                config.keep_all_comments,
            )))
            .register(Box::new(ToolchangeProcessor::new(
                config.insert_toolchange_call,
                config.toolchange_subroutine.clone(),
            )))
            .register(Box::new(
                Renumberer::new(config.renumber_start, config.renumber_step)
                    .enabled(config.renumber),
            ));
        pipeline
    }

    /// Register a processor in the pipeline
    ///
    /// Processors are applied in the order they are registered.
    pub fn register(&mut self, processor: ProcessorHandle) -> &mut Self {
        self.processors.push(processor);
        self
    }

    /// Name, description and enabled flag of every registered processor
    pub fn list_processors(&self) -> Vec<(&str, &str, bool)> {
        self.processors
            .iter()
            .map(|p| (p.name(), p.description(), p.is_enabled()))
            .collect()
    }

    /// Run one line through every enabled processor
    pub fn process_line(&mut self, line: String, stats: &mut MergeStats) -> Vec<String> {
        let mut current = vec![line];

        for processor in self.processors.iter_mut() {
            if !processor.is_enabled() {
                continue;
            }

            let mut next = Vec::with_capacity(current.len());
            for line in current {
                next.extend(processor.process(line, stats));
            }
            current = next;

            if current.is_empty() {
                break;
            }
        }

        current
    }

    /// Run a whole stream through the pipeline in a single pass
    pub fn process_lines<I>(&mut self, lines: I, stats: &mut MergeStats) -> Vec<String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut output = Vec::new();
        for line in lines {
            output.extend(self.process_line(line, stats));
        }
        output
    }
}

impl Default for ProcessorPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_default_pipeline_order() {
        let pipeline = ProcessorPipeline::from_config(&MergeConfig::default());
        let names: Vec<&str> = pipeline
            .list_processors()
            .into_iter()
            .map(|(name, _, _)| name)
            .collect();
        assert_eq!(names, vec!["comment_filter", "toolchange", "renumber"]);
    }

    #[test]
    fn test_disabled_renumber_is_skipped() {
        let config = MergeConfig {
            renumber: false,
            ..Default::default()
        };
        let mut pipeline = ProcessorPipeline::from_config(&config);
        let mut stats = MergeStats::new();
        let out = pipeline.process_lines(owned(&["N5 G0 X0", "N6 G1 X1"]), &mut stats);
        assert_eq!(out, owned(&["N5 G0 X0", "N6 G1 X1"]));
        assert_eq!(stats.lines_renumbered, 0);
    }

    #[test]
    fn test_inserted_call_is_not_renumbered() {
        let config = MergeConfig {
            insert_toolchange_call: true,
            ..Default::default()
        };
        let mut pipeline = ProcessorPipeline::from_config(&config);
        let mut stats = MergeStats::new();
        let out = pipeline.process_lines(
            owned(&["(2D Pocket)", "N25 T1 M6", "N30 S12000 M3"]),
            &mut stats,
        );
        assert_eq!(
            out,
            owned(&["(2D Pocket)", "O <toolchange> call", "N10 T1 M6", "N20 S12000 M3"])
        );
        assert_eq!(stats.toolchanges, 1);
        assert_eq!(stats.toolchange_calls, 1);
        assert_eq!(stats.lines_renumbered, 2);
        assert_eq!(stats.comments_kept, 1);
    }

    #[test]
    fn test_removed_comment_consumes_no_number() {
        let mut pipeline = ProcessorPipeline::from_config(&MergeConfig::default());
        let mut stats = MergeStats::new();
        let out = pipeline.process_lines(
            owned(&["N1 G0 X0", "(generic)", "N2 G0 X1"]),
            &mut stats,
        );
        assert_eq!(out, owned(&["N10 G0 X0", "N20 G0 X1"]));
        assert_eq!(stats.comments_removed, 1);
    }
}

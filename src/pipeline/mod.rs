/*!
 * Annotation pipeline.
 *
 * A pipeline is an ordered list of stages resolved once from a
 * [`PipelineConfig`]. Running it executes the stages in sequence against one
 * document:
 * 1. **Prerequisite check**: every layer the stage requires must be completed
 * 2. **Annotate**: the stage computes its annotations from a read-only view
 * 3. **Commit**: the annotations are appended and the produced layers marked
 *
 * The first failing stage stops the run.
 */

pub mod orchestrator;

pub use orchestrator::{AnnotationPipeline, PipelineConfig, PipelineReport, StageDescriptor, StageStats};

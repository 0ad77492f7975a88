/*!
 * Document container for the annotation pipeline.
 *
 * This module provides the document model shared by every stage:
 * - Immutable text with identifier, language, title and source URI
 * - Append-only typed span annotations
 * - Completed layer tracking for stage prerequisites
 */

pub mod model;

pub use model::{Annotation, AnnotationType, AnnotationValue, Document, DocumentMetadata};

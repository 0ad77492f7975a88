/*!
 * Error types for the annoflow library.
 *
 * The core (document, stages, pipeline, interchange files) reports typed
 * errors defined here with thiserror. The application layers wrap them in
 * anyhow with context.
 */

use std::path::PathBuf;

use thiserror::Error;

use crate::document::AnnotationType;

/// An annotation span that does not fit the document text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid span [{begin}, {end}) for text of length {text_len}")]
pub struct InvalidSpanError {
    /// Requested begin offset
    pub begin: usize,
    /// Requested end offset
    pub end: usize,
    /// Length of the document text in bytes
    pub text_len: usize,
}

/// Why a stage could not complete
#[derive(Error, Debug)]
pub enum StageFailure {
    /// A layer the stage depends on has not been produced yet
    #[error("missing prerequisite layer '{0}'")]
    MissingPrerequisite(AnnotationType),

    /// The underlying capability failed
    #[error("{0}")]
    Capability(String),

    /// The stage produced an annotation outside the document
    #[error(transparent)]
    InvalidSpan(#[from] InvalidSpanError),
}

/// A failed pipeline stage
#[derive(Error, Debug)]
#[error("Stage '{stage}' failed: {cause}")]
pub struct StageError {
    /// Name of the stage that failed
    pub stage: String,
    /// Underlying cause
    #[source]
    pub cause: StageFailure,
}

impl StageError {
    pub fn new(stage: impl Into<String>, cause: StageFailure) -> Self {
        Self {
            stage: stage.into(),
            cause,
        }
    }

    /// Whether the stage failed because a prerequisite layer was missing
    pub fn is_missing_prerequisite(&self) -> bool {
        matches!(self.cause, StageFailure::MissingPrerequisite(_))
    }
}

/// Errors reading or writing interchange files
#[derive(Error, Debug)]
pub enum IoError {
    /// Error reading a file or directory
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error writing a file or creating a directory
    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content is not a valid interchange document
    #[error("Malformed interchange file {path:?}: {message}")]
    Format { path: PathBuf, message: String },
}

/// Invalid pipeline or application configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// No stage registered under this name
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    /// A stage parameter is unknown or has an unusable value
    #[error("Invalid parameter '{param}' for stage '{stage}': {message}")]
    InvalidParameter {
        stage: String,
        param: String,
        message: String,
    },

    /// A file pattern could not be compiled
    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}

/// Errors surfaced by a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A stage failed while annotating a document
    #[error("Document '{document_id}': {source}")]
    Stage {
        document_id: String,
        #[source]
        source: StageError,
    },
}

impl PipelineError {
    /// The stage error behind this pipeline failure
    pub fn stage_error(&self) -> &StageError {
        match self {
            Self::Stage { source, .. } => source,
        }
    }

    pub fn document_id(&self) -> &str {
        match self {
            Self::Stage { document_id, .. } => document_id,
        }
    }
}

/// Errors of library operations that combine file access and configuration
#[derive(Error, Debug)]
pub enum AppError {
    /// Interchange file error
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

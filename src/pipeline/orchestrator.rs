/*!
 * Pipeline orchestrator for running annotation stages.
 */

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::errors::{ConfigError, PipelineError, StageError, StageFailure};
use crate::stages::{
    Annotator, CoreferenceResolver, DependencyParser, Lemmatizer, NamedEntityRecognizer,
    ParagraphSplitter, PosTagger, Segmenter, StageParams, StageRegistry,
};

/// One configured stage: its registered name and string parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// Registered stage name
    pub name: String,

    /// Stage parameters
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl StageDescriptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: BTreeMap::new(),
        }
    }

    /// Add a parameter
    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn params(&self) -> StageParams {
        StageParams::new(&self.name, self.params.clone())
    }
}

/// Ordered stage configuration of a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_stages")]
    pub stages: Vec<StageDescriptor>,
}

fn default_stages() -> Vec<StageDescriptor> {
    vec![
        StageDescriptor::new(Segmenter::NAME),
        StageDescriptor::new(ParagraphSplitter::NAME)
            .with_param(ParagraphSplitter::PARAM_SPLIT_PATTERN, "single-line-breaks"),
        StageDescriptor::new(Lemmatizer::NAME),
        StageDescriptor::new(PosTagger::NAME),
        StageDescriptor::new(DependencyParser::NAME),
        StageDescriptor::new(NamedEntityRecognizer::NAME),
        StageDescriptor::new(CoreferenceResolver::NAME),
    ]
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stages: default_stages(),
        }
    }
}

impl PipelineConfig {
    pub fn new(stages: Vec<StageDescriptor>) -> Self {
        Self { stages }
    }

    /// Stage names in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Statistics of one completed stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStats {
    pub stage: String,

    /// Annotations the stage added
    pub annotations_added: usize,

    pub duration: Duration,
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// Identifier of the annotated document
    pub document_id: String,

    /// Per-stage statistics in execution order
    pub stages: Vec<StageStats>,

    /// Total duration of the run
    pub duration: Duration,
}

impl PipelineReport {
    /// Annotations added by all stages
    pub fn total_annotations(&self) -> usize {
        self.stages.iter().map(|s| s.annotations_added).sum()
    }

    /// Get a one-line summary of the run.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();

        parts.push(format!("Document: {}", self.document_id));
        parts.push(format!("Duration: {:.2}s", self.duration.as_secs_f32()));
        parts.push(format!(
            "Stages: {} ({} annotations)",
            self.stages.len(),
            self.total_annotations()
        ));

        if !self.stages.is_empty() {
            let details: Vec<String> = self
                .stages
                .iter()
                .map(|s| format!("{}={}", s.stage, s.annotations_added))
                .collect();
            parts.push(details.join(", "));
        }

        parts.join(" | ")
    }
}

/// Sequential annotation pipeline.
pub struct AnnotationPipeline {
    stages: Vec<Box<dyn Annotator>>,
}

impl AnnotationPipeline {
    /// Create a pipeline from already constructed stages.
    pub fn new(stages: Vec<Box<dyn Annotator>>) -> Self {
        Self { stages }
    }

    /// Resolve every descriptor of `config` against `registry`.
    ///
    /// Fails on the first unknown stage name or invalid parameter; no stage
    /// lookup happens after construction.
    pub fn from_config(config: &PipelineConfig, registry: &StageRegistry) -> Result<Self, ConfigError> {
        let stages = config
            .stages
            .iter()
            .map(|descriptor| registry.create(&descriptor.params()))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Pipeline built with stages: {}", config.stage_names().join(" -> "));
        Ok(Self::new(stages))
    }

    /// Pipeline of the default stages
    pub fn with_defaults() -> Result<Self, ConfigError> {
        Self::from_config(&PipelineConfig::default(), &StageRegistry::with_builtin())
    }

    /// Names of the stages in execution order
    pub fn stage_names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run every stage against `document` in order.
    ///
    /// On the first failure the remaining stages are skipped and the document
    /// keeps the annotations of the stages that completed.
    pub fn run(&self, document: &mut Document) -> Result<PipelineReport, PipelineError> {
        let start_time = Instant::now();
        let mut report = PipelineReport {
            document_id: document.id().to_string(),
            ..Default::default()
        };

        for stage in &self.stages {
            let stats = Self::run_stage(stage.as_ref(), document).map_err(|source| PipelineError::Stage {
                document_id: document.id().to_string(),
                source,
            })?;
            report.stages.push(stats);
        }

        report.duration = start_time.elapsed();
        info!("Annotated document {}: {}", report.document_id, report.summary());
        Ok(report)
    }

    fn run_stage(stage: &dyn Annotator, document: &mut Document) -> Result<StageStats, StageError> {
        let fail = |cause: StageFailure| StageError::new(stage.name(), cause);

        if let Some(missing) = stage.requires().iter().find(|t| !document.has_layer(**t)) {
            return Err(fail(StageFailure::MissingPrerequisite(*missing)));
        }

        debug!("Running stage '{}'", stage.name());
        let started = Instant::now();

        let annotations = stage.annotate(document).map_err(fail)?;
        let added = document
            .add_layer(stage.produces(), annotations)
            .map_err(|e| fail(StageFailure::InvalidSpan(e)))?;

        let duration = started.elapsed();
        debug!("Stage '{}' added {} annotations in {:?}", stage.name(), added, duration);

        Ok(StageStats {
            stage: stage.name().to_string(),
            annotations_added: added,
            duration,
        })
    }
}

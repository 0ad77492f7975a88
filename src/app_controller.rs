use anyhow::{Context, Result, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info, warn};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use url::Url;

use crate::app_config::Config;
use crate::document::Document;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::output::{dump, xmi};
use crate::pipeline::{AnnotationPipeline, PipelineReport};
use crate::sample;
use crate::stages::StageRegistry;

// @module: Application controller wiring inputs, pipeline and outputs

/// Outcome of an annotate command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnotateSummary {
    /// Interchange files written, in processing order
    pub written: Vec<PathBuf>,

    /// Documents skipped because their output already existed
    pub skipped: usize,

    /// Annotations added over all documents
    pub annotations: usize,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Pipeline resolved from the configuration
    pipeline: AnnotationPipeline,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Self::with_registry(config, &StageRegistry::with_builtin())
    }

    /// Create a controller resolving stages against a custom registry
    pub fn with_registry(config: Config, registry: &StageRegistry) -> Result<Self> {
        let pipeline = AnnotationPipeline::from_config(&config.pipeline, registry)
            .context("Failed to build annotation pipeline")?;

        if let Ok(name) = language_utils::get_language_name(&config.language) {
            debug!("Pipeline [{}] ready for {} documents", pipeline.stage_names().join(", "), name);
        }

        Ok(Self { config, pipeline })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Language code new documents are created with
    fn document_language(&self) -> Result<String> {
        language_utils::normalize_language_code(&self.config.language)
    }

    /// Run the pipeline over one document
    pub fn annotate_document(&self, document: &mut Document) -> Result<PipelineReport> {
        let report = self
            .pipeline
            .run(document)
            .with_context(|| format!("Failed to annotate document {}", document.id()))?;
        Ok(report)
    }

    /// Build a document from a plain text file.
    ///
    /// The file stem becomes identifier and title; the URI is the file URL.
    pub fn load_text_document(&self, path: &Path) -> Result<Document> {
        let text = FileManager::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .ok_or_else(|| anyhow!("Input path has no file name: {:?}", path))?;

        let mut document = Document::new(text, &self.document_language()?)
            .with_id(stem.clone())
            .with_title(stem);

        if let Some(uri) = fs::canonicalize(path).ok().and_then(|p| Url::from_file_path(p).ok()) {
            document = document.with_uri(uri.to_string());
        }

        Ok(document)
    }

    /// Expand inputs to text files: files as given, directories searched
    /// recursively for `.txt`
    pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in inputs {
            if input.is_file() {
                files.push(input.clone());
            } else if input.is_dir() {
                let found = FileManager::find_files(input, "txt")?;
                if found.is_empty() {
                    warn!("No .txt files found in directory: {:?}", input);
                }
                files.extend(found);
            } else {
                return Err(anyhow!("Input path does not exist: {:?}", input));
            }
        }

        Ok(files)
    }

    /// Annotate the built-in sample document
    pub fn annotate_sample<W: Write>(&self, output_dir: &Path, force_overwrite: bool, out: &mut W) -> Result<AnnotateSummary> {
        let document = sample::sample_document(&self.document_language()?);
        let mut summary = AnnotateSummary::default();
        self.process_document(document, output_dir, force_overwrite, out, &mut summary)?;
        Ok(summary)
    }

    /// Annotate text files one after another; the first failure aborts
    pub fn annotate_files<W: Write>(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        force_overwrite: bool,
        out: &mut W,
    ) -> Result<AnnotateSummary> {
        let start_time = Instant::now();
        let files = Self::collect_inputs(inputs)?;
        if files.is_empty() {
            return Err(anyhow!("No input text files found"));
        }

        let progress_bar = Self::progress_bar(files.len());
        let mut summary = AnnotateSummary::default();

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(format!("Annotating: {}", file_name));

            let document = self.load_text_document(file)?;
            self.process_document(document, output_dir, force_overwrite, out, &mut summary)
                .with_context(|| format!("Failed to process {:?}", file))?;

            progress_bar.inc(1);
        }

        progress_bar.finish_and_clear();
        info!(
            "Annotated {} of {} documents ({} skipped) in {}",
            summary.written.len(),
            files.len(),
            summary.skipped,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    fn process_document<W: Write>(
        &self,
        mut document: Document,
        output_dir: &Path,
        force_overwrite: bool,
        out: &mut W,
        summary: &mut AnnotateSummary,
    ) -> Result<()> {
        let output_path = FileManager::output_path(output_dir, document.id());
        if summary.written.contains(&output_path) {
            return Err(anyhow!(
                "Document {} maps to {:?}, which was already written in this run",
                document.id(),
                output_path
            ));
        }
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping document {}, {:?} already exists (use -f to force overwrite)",
                document.id(),
                output_path
            );
            summary.skipped += 1;
            return Ok(());
        }

        let report = self.annotate_document(&mut document)?;
        debug!("{}", report.summary());

        let written = xmi::write_document(&document, output_dir)?;
        info!("Success: {}", written.display());

        dump::write_highlights(out, &document).context("Failed to print highlights")?;

        summary.annotations += report.total_annotations();
        summary.written.push(written);
        Ok(())
    }

    /// Read every selected interchange file and dump it; returns the count
    pub fn dump<W: Write>(&self, source_dir: &Path, patterns: &[String], out: &mut W) -> Result<usize> {
        if !FileManager::dir_exists(source_dir) {
            return Err(anyhow!("Source directory does not exist: {:?}", source_dir));
        }

        let documents = xmi::read_collection(source_dir, patterns)
            .with_context(|| format!("Failed to read interchange files from {:?}", source_dir))?;
        if documents.is_empty() {
            warn!("No interchange files matched in {:?}", source_dir);
        }

        dump::dump_collection(out, &documents).context("Failed to write dump")?;
        Ok(documents.len())
    }

    /// Annotate the sample into the configured output directory, then dump
    /// that directory
    pub fn run_sample<W: Write>(&self, out: &mut W) -> Result<usize> {
        let output_dir = self.config.io.output_dir.clone();
        self.annotate_sample(&output_dir, true, out)?;
        self.dump(&output_dir, &self.config.io.patterns, out)
    }

    fn progress_bar(len: usize) -> ProgressBar {
        if len <= 1 {
            return ProgressBar::hidden();
        }

        let progress_bar = ProgressBar::new(len as u64);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} documents ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    // Format duration in a human-readable format
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let minutes = total_seconds / 60;
        let seconds = total_seconds % 60;

        if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

/*!
 * Common test utilities for the annoflow test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use annoflow::app_config::Config;
use annoflow::document::{Annotation, AnnotationType, AnnotationValue, Document};

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Default configuration writing into `output_dir`
pub fn test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.io.output_dir = output_dir.to_path_buf();
    config
}

/// A small document with tokens, a sentence and one entity
pub fn create_annotated_document(id: &str) -> Document {
    let mut doc = Document::new("Artur Mas won in Catalonia.", "en")
        .with_id(id)
        .with_title("Result");
    doc.add_layer(
        &[AnnotationType::Sentence, AnnotationType::Token],
        vec![
            Annotation::new(0, 27, AnnotationValue::Sentence),
            Annotation::new(0, 5, AnnotationValue::Token),
            Annotation::new(6, 9, AnnotationValue::Token),
            Annotation::new(10, 13, AnnotationValue::Token),
            Annotation::new(14, 16, AnnotationValue::Token),
            Annotation::new(17, 26, AnnotationValue::Token),
            Annotation::new(26, 27, AnnotationValue::Token),
        ],
    )
    .expect("valid spans");
    doc.add_layer(
        &[AnnotationType::NamedEntity],
        vec![Annotation::new(
            0,
            9,
            AnnotationValue::NamedEntity {
                value: "PERSON".to_string(),
            },
        )],
    )
    .expect("valid spans");
    doc
}

/// Initialise env_logger once for tests that want log output
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

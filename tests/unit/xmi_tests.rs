/*!
 * Tests for reading and writing interchange files
 */

use anyhow::Result;
use annoflow::document::{AnnotationType, Document};
use annoflow::errors::{AppError, IoError};
use annoflow::output::xmi;
use crate::common;

/// Test that a written document reads back equal
#[test]
fn test_writeDocument_thenReadDocument_shouldRestoreDocument() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let doc = common::create_annotated_document("result-1");

    let path = xmi::write_document(&doc, temp_dir.path())?;
    let restored = xmi::read_document(&path)?;

    assert_eq!(path, temp_dir.path().join("result-1.xmi"));
    assert_eq!(restored, doc);
    assert!(restored.has_layer(AnnotationType::NamedEntity));
    Ok(())
}

/// Test that write_document creates the output directory
#[test]
fn test_writeDocument_withMissingDir_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("xmi-temp");

    xmi::write_document(&Document::new("", "en").with_id("empty"), &output_dir)?;

    assert!(output_dir.join("empty.xmi").is_file());
    Ok(())
}

/// Test that read_collection honours include and exclude patterns
#[test]
fn test_readCollection_withPatterns_shouldSelectFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    xmi::write_document(&common::create_annotated_document("b"), root)?;
    xmi::write_document(&common::create_annotated_document("a"), root)?;
    xmi::write_document(&common::create_annotated_document("skip"), root)?;
    common::create_test_file(root, "readme.txt", "not xml")?;

    let documents = xmi::read_collection(root, &["[+]*.xmi", "[-]skip.xmi"])?;

    let ids: Vec<&str> = documents.iter().map(Document::id).collect();
    assert_eq!(ids, vec!["a", "b"]);
    Ok(())
}

/// Test that a malformed file fails the whole collection with its path
#[test]
fn test_readCollection_withMalformedFile_shouldReportPath() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let broken = common::create_test_file(temp_dir.path(), "broken.xmi", "<document")?;

    let result = xmi::read_collection(temp_dir.path(), &["*.xmi"]);

    match result {
        Err(AppError::Io(IoError::Format { path, .. })) => assert_eq!(path, broken),
        other => panic!("expected format error, got {:?}", other.map(|d| d.len())),
    }
    Ok(())
}

/// Test that an invalid pattern is reported as a configuration error
#[test]
fn test_readCollection_withEmptyPattern_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;

    let result = xmi::read_collection(temp_dir.path(), &["[-]"]);

    assert!(matches!(result, Err(AppError::Config(_))));
    Ok(())
}

/// Test that reading a missing file is a read error
#[test]
fn test_readDocument_withMissingFile_shouldFail() {
    let result = xmi::read_document("/no/such/file.xmi");

    assert!(matches!(result, Err(IoError::Read { .. })));
}

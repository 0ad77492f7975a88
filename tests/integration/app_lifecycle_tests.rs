/*!
 * Integration tests for the application controller
 */

use anyhow::Result;
use std::fs;

use annoflow::app_controller::Controller;
use annoflow::document::AnnotationType;
use annoflow::output::xmi;
use annoflow::pipeline::{PipelineConfig, StageDescriptor};
use annoflow::sample;
use crate::common;

/// Test that annotating the sample writes its interchange file and highlights
#[test]
fn test_annotateSample_shouldWriteXmiAndHighlights() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("xmi-temp");
    let controller = Controller::with_config(common::test_config(&output_dir))?;
    let mut out = Vec::new();

    let summary = controller.annotate_sample(&output_dir, false, &mut out)?;

    let expected = output_dir.join("2465939.xmi");
    assert_eq!(summary.written, vec![expected.clone()]);
    assert_eq!(summary.skipped, 0);
    assert!(summary.annotations > 0);

    let restored = xmi::read_document(&expected)?;
    assert_eq!(restored.text(), sample::SAMPLE_TEXT);
    assert_eq!(restored.metadata().uri.as_deref(), Some(sample::SAMPLE_URI));
    assert_eq!(restored.len(), summary.annotations);

    let highlights = String::from_utf8(out)?;
    assert!(highlights.starts_with("Paragraph: Regional elections"));
    assert!(highlights.contains("Found NEs: "));
    Ok(())
}

/// Test that existing output is skipped unless overwriting is forced
#[test]
fn test_annotateSample_withExistingOutput_shouldRespectForce() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().to_path_buf();
    let existing = common::create_test_file(&output_dir, "2465939.xmi", "placeholder")?;
    let controller = Controller::with_config(common::test_config(&output_dir))?;

    let skipped = controller.annotate_sample(&output_dir, false, &mut Vec::new())?;
    assert_eq!(skipped.skipped, 1);
    assert!(skipped.written.is_empty());
    assert_eq!(fs::read_to_string(&existing)?, "placeholder");

    let forced = controller.annotate_sample(&output_dir, true, &mut Vec::new())?;
    assert_eq!(forced.written, vec![existing.clone()]);
    assert!(fs::read_to_string(&existing)?.contains("<document id=\"2465939\""));
    Ok(())
}

/// Test that text files become documents named after their stems
#[test]
fn test_annotateFiles_shouldProcessDirectoryInOrder() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    let output_dir = temp_dir.path().join("output");
    common::create_test_file(&input_dir, "b.txt", "Rajoy spoke in Madrid.")?;
    common::create_test_file(&input_dir, "nested/a.txt", "Artur Mas won in Catalonia.\nHe celebrated.")?;
    common::create_test_file(&input_dir, "ignored.md", "# not text")?;
    let controller = Controller::with_config(common::test_config(&output_dir))?;

    let summary = controller.annotate_files(&[input_dir], &output_dir, false, &mut Vec::new())?;

    assert_eq!(summary.written, vec![output_dir.join("b.xmi"), output_dir.join("a.xmi")]);

    let document = xmi::read_document(output_dir.join("a.xmi"))?;
    assert_eq!(document.id(), "a");
    assert_eq!(document.metadata().title.as_deref(), Some("a"));
    assert!(document.metadata().uri.as_deref().is_some_and(|u| u.starts_with("file://")));
    assert_eq!(document.annotations_of_type(AnnotationType::Paragraph).count(), 2);
    Ok(())
}

/// Test that two inputs with the same stem cannot share one output file
#[test]
fn test_annotateFiles_withSameStemInTwoDirs_shouldFailOnSecond() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input_dir = temp_dir.path().join("input");
    common::create_test_file(&input_dir, "a/news.txt", "Artur Mas won in Catalonia.")?;
    common::create_test_file(&input_dir, "b/news.txt", "Rajoy spoke in Madrid.")?;

    for (force_overwrite, output_name) in [(true, "forced"), (false, "plain")] {
        let output_dir = temp_dir.path().join(output_name);
        let controller = Controller::with_config(common::test_config(&output_dir))?;

        let result = controller.annotate_files(&[input_dir.clone()], &output_dir, force_overwrite, &mut Vec::new());

        let err = result.expect_err("duplicate output must fail");
        assert!(format!("{:#}", err).contains("already written in this run"));
        let restored = xmi::read_document(output_dir.join("news.xmi"))?;
        assert_eq!(restored.text(), "Artur Mas won in Catalonia.");
    }
    Ok(())
}

/// Test that a missing input is an error before anything is written
#[test]
fn test_annotateFiles_withMissingInput_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let output_dir = temp_dir.path().join("output");
    let controller = Controller::with_config(common::test_config(&output_dir))?;

    let result = controller.annotate_files(&[temp_dir.path().join("nope.txt")], &output_dir, false, &mut Vec::new());

    assert!(result.is_err());
    assert!(!output_dir.exists());
    Ok(())
}

/// Test that the configured language is carried by new documents
#[test]
fn test_annotateFiles_withLanguage_shouldNormalizeCode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "cat.txt", "El Parlament vota avui.")?;
    let output_dir = temp_dir.path().join("output");
    let mut config = common::test_config(&output_dir);
    config.language = "cat".to_string();
    let controller = Controller::with_config(config)?;

    controller.annotate_files(&[input], &output_dir, false, &mut Vec::new())?;

    assert_eq!(xmi::read_document(output_dir.join("cat.xmi"))?.language(), "ca");
    Ok(())
}

/// Test that dump prints every selected document
#[test]
fn test_dump_shouldPrintSelectedDocuments() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    xmi::write_document(&common::create_annotated_document("first"), root)?;
    xmi::write_document(&common::create_annotated_document("second"), root.join("archive"))?;
    let controller = Controller::with_config(common::test_config(root))?;
    let mut out = Vec::new();

    let count = controller.dump(root, &["[+]**/*.xmi".to_string()], &mut out)?;

    let text = String::from_utf8(out)?;
    assert_eq!(count, 2);
    assert!(text.contains("======== Document second ========"));
    assert!(text.contains("======== Document first ========"));
    assert!(text.contains("-------- NamedEntity (1) --------"));
    assert!(text.contains("  [0, 9) \"Artur Mas\" value=PERSON"));
    Ok(())
}

/// Test that dumping a missing directory fails
#[test]
fn test_dump_withMissingDir_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    let result = controller.dump(&temp_dir.path().join("missing"), &["*.xmi".to_string()], &mut Vec::new());

    assert!(result.is_err());
    Ok(())
}

/// Test that the default command annotates the sample and dumps it back
#[test]
fn test_runSample_shouldOverwriteAndDump() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let controller = Controller::with_config(common::test_config(temp_dir.path()))?;

    controller.run_sample(&mut Vec::new())?;
    let mut out = Vec::new();
    let count = controller.run_sample(&mut out)?;

    let text = String::from_utf8(out)?;
    assert_eq!(count, 1);
    assert!(text.contains("Paragraph: "));
    assert!(text.contains("======== Document 2465939 ========"));
    assert!(text.contains("-------- CoreferenceLink ("));
    Ok(())
}

/// Test that a pipeline naming an unknown stage cannot be built
#[test]
fn test_withConfig_withUnknownStage_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::test_config(temp_dir.path());
    config.pipeline = PipelineConfig::new(vec![StageDescriptor::new("segmenter"), StageDescriptor::new("summarizer")]);

    assert!(Controller::with_config(config).is_err());
    Ok(())
}

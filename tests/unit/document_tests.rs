/*!
 * Tests for the document container
 */

use annoflow::document::{Annotation, AnnotationType, AnnotationValue, Document};
use annoflow::errors::InvalidSpanError;
use crate::common;

/// Test that annotations outside the text are rejected
#[test]
fn test_addAnnotation_withEndPastText_shouldFail() {
    let mut doc = Document::new("abc", "en");

    let result = doc.add_annotation(Annotation::new(1, 4, AnnotationValue::Token));

    assert_eq!(result, Err(InvalidSpanError { begin: 1, end: 4, text_len: 3 }));
    assert!(doc.is_empty());
}

/// Test that a span splitting a multi-byte character is rejected
#[test]
fn test_addAnnotation_insideMultibyteChar_shouldFail() {
    let mut doc = Document::new("Sí", "ca");

    assert!(doc.add_annotation(Annotation::new(0, 2, AnnotationValue::Token)).is_err());
    assert!(doc.add_annotation(Annotation::new(0, 3, AnnotationValue::Token)).is_ok());
}

/// Test that a layer with one bad span adds nothing
#[test]
fn test_addLayer_withOneInvalidSpan_shouldLeaveDocumentUnchanged() {
    let mut doc = Document::new("Hello world", "en");

    let result = doc.add_layer(
        &[AnnotationType::Token],
        vec![
            Annotation::new(0, 5, AnnotationValue::Token),
            Annotation::new(6, 20, AnnotationValue::Token),
        ],
    );

    assert!(result.is_err());
    assert!(doc.is_empty());
    assert!(!doc.has_layer(AnnotationType::Token));
}

/// Test that annotations_of_type can be restarted by cloning
#[test]
fn test_annotationsOfType_shouldBeRestartable() {
    let doc = common::create_annotated_document("doc-1");

    let tokens = doc.annotations_of_type(AnnotationType::Token);
    let first_pass: Vec<&str> = tokens.clone().map(|a| doc.covered_text(a)).collect();
    let second_pass: Vec<&str> = tokens.map(|a| doc.covered_text(a)).collect();

    assert_eq!(first_pass, vec!["Artur", "Mas", "won", "in", "Catalonia", "."]);
    assert_eq!(first_pass, second_pass);
}

/// Test that the entity covers the expected text
#[test]
fn test_coveredText_shouldReturnSpanText() {
    let doc = common::create_annotated_document("doc-1");

    let entity = doc.annotations_of_type(AnnotationType::NamedEntity).next().unwrap();

    assert_eq!(doc.covered_text(entity), "Artur Mas");
}

/// Test that annotation types are listed in order of first appearance
#[test]
fn test_annotationTypes_shouldFollowInsertionOrder() {
    let doc = common::create_annotated_document("doc-1");

    assert_eq!(
        doc.annotation_types(),
        vec![AnnotationType::Sentence, AnnotationType::Token, AnnotationType::NamedEntity]
    );
}

/// Test that tokens within a sentence are found
#[test]
fn test_annotationsWithin_shouldSelectContainedSpans() {
    let doc = common::create_annotated_document("doc-1");
    let sentence = doc.annotations_of_type(AnnotationType::Sentence).next().unwrap();

    assert_eq!(doc.annotations_within(AnnotationType::Token, sentence).count(), 6);
}

/// Test that generated identifiers differ between documents
#[test]
fn test_new_shouldGenerateDistinctIds() {
    let a = Document::new("x", "en");
    let b = Document::new("x", "en");

    assert_ne!(a.id(), b.id());
}

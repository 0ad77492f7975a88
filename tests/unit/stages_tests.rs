/*!
 * Tests for the built-in stages and the stage registry
 */

use std::collections::BTreeMap;

use anyhow::Result;
use annoflow::document::{AnnotationType, AnnotationValue, Document};
use annoflow::errors::{ConfigError, StageFailure};
use annoflow::stages::{Annotator, NamedEntityRecognizer, Segmenter, StageParams, StageRegistry};
use crate::common;

fn run(stage: &dyn Annotator, doc: &mut Document) {
    let annotations = stage.annotate(doc).unwrap();
    doc.add_layer(stage.produces(), annotations).unwrap();
}

fn create(name: &str) -> Box<dyn Annotator> {
    StageRegistry::with_builtin()
        .create(&StageParams::empty(name))
        .unwrap_or_else(|e| panic!("cannot create {}: {}", name, e))
}

/// Test that every built-in stage declares what it needs and produces
#[test]
fn test_builtinStages_shouldDeclarePrerequisites() {
    let expectations = [
        ("segmenter", vec![], vec![AnnotationType::Sentence, AnnotationType::Token]),
        ("paragraph-splitter", vec![], vec![AnnotationType::Paragraph]),
        ("lemmatizer", vec![AnnotationType::Token], vec![AnnotationType::Lemma]),
        ("pos-tagger", vec![AnnotationType::Token], vec![AnnotationType::PartOfSpeech]),
        (
            "parser",
            vec![AnnotationType::Sentence, AnnotationType::Token, AnnotationType::PartOfSpeech],
            vec![AnnotationType::Dependency],
        ),
        (
            "ner",
            vec![AnnotationType::Sentence, AnnotationType::Token, AnnotationType::PartOfSpeech],
            vec![AnnotationType::NamedEntity],
        ),
        (
            "coreference",
            vec![AnnotationType::Token, AnnotationType::PartOfSpeech, AnnotationType::NamedEntity],
            vec![AnnotationType::CoreferenceLink],
        ),
    ];

    for (name, requires, produces) in expectations {
        let stage = create(name);
        assert_eq!(stage.name(), name);
        assert_eq!(stage.requires(), requires.as_slice(), "requires of {}", name);
        assert_eq!(stage.produces(), produces.as_slice(), "produces of {}", name);
    }
}

/// Test that the segmenter splits sentences and tokens
#[test]
fn test_segmenter_shouldSplitSentencesAndTokens() {
    let mut doc = Document::new("Rajoy took part. He says \"united we will win\".", "en");

    run(&Segmenter::new(), &mut doc);

    let sentences: Vec<&str> = doc
        .annotations_of_type(AnnotationType::Sentence)
        .map(|a| doc.covered_text(a))
        .collect();
    assert_eq!(sentences, vec!["Rajoy took part.", "He says \"united we will win\"."]);
    assert_eq!(doc.annotations_of_type(AnnotationType::Token).count(), 13);
}

/// Test that every token gets a lemma and a tag
#[test]
fn test_lemmatizerAndTagger_shouldCoverEveryToken() {
    let mut doc = common::create_annotated_document("doc-1");

    run(create("lemmatizer").as_ref(), &mut doc);
    run(create("pos-tagger").as_ref(), &mut doc);

    let tokens = doc.annotations_of_type(AnnotationType::Token).count();
    assert_eq!(doc.annotations_of_type(AnnotationType::Lemma).count(), tokens);
    assert_eq!(doc.annotations_of_type(AnnotationType::PartOfSpeech).count(), tokens);

    let won = doc.annotation_at(AnnotationType::Lemma, 10, 13).unwrap();
    assert_eq!(won.value, AnnotationValue::Lemma { value: "win".to_string() });
}

/// Test that the parser gives every token one governor inside its sentence
#[test]
fn test_parser_shouldAttachEveryTokenWithinSentence() {
    let mut doc = common::create_annotated_document("doc-1");
    run(create("pos-tagger").as_ref(), &mut doc);

    run(create("parser").as_ref(), &mut doc);

    let mut roots = 0;
    for dependency in doc.annotations_of_type(AnnotationType::Dependency) {
        if let AnnotationValue::Dependency { relation, governor_begin, governor_end } = &dependency.value {
            assert!(doc.annotation_at(AnnotationType::Token, *governor_begin, *governor_end).is_some());
            if relation == "root" {
                roots += 1;
                assert!(dependency.has_span(*governor_begin, *governor_end));
            }
        }
    }
    assert_eq!(roots, 1);
}

/// Test that a gazetteer file overrides the heuristic category
#[test]
fn test_ner_withGazetteerFile_shouldUseItsCategory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let gazetteer = common::create_test_file(temp_dir.path(), "names.json", r#"{"Catalonia": "ORGANIZATION"}"#)?;

    let mut values = BTreeMap::new();
    values.insert("gazetteer".to_string(), gazetteer.to_string_lossy().into_owned());
    let stage = NamedEntityRecognizer::from_params(&StageParams::new("ner", values))?;

    let mut doc = Document::new("Artur Mas won in Catalonia.", "en");
    run(&Segmenter::new(), &mut doc);
    run(create("pos-tagger").as_ref(), &mut doc);
    run(stage.as_ref(), &mut doc);

    let found: Vec<(String, String)> = doc
        .annotations_of_type(AnnotationType::NamedEntity)
        .filter_map(|a| match &a.value {
            AnnotationValue::NamedEntity { value } => Some((doc.covered_text(a).to_string(), value.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        found,
        vec![
            ("Artur Mas".to_string(), "PERSON".to_string()),
            ("Catalonia".to_string(), "ORGANIZATION".to_string()),
        ]
    );
    Ok(())
}

/// Test that a missing gazetteer file is a configuration error
#[test]
fn test_ner_withMissingGazetteer_shouldFailAtConstruction() {
    let mut values = BTreeMap::new();
    values.insert("gazetteer".to_string(), "/no/such/gazetteer.json".to_string());

    let result = NamedEntityRecognizer::from_params(&StageParams::new("ner", values));

    assert!(matches!(result, Err(ConfigError::InvalidParameter { param, .. }) if param == "gazetteer"));
}

/// Test that stages reject unknown parameters
#[test]
fn test_registry_withUnknownParameter_shouldFail() {
    let mut values = BTreeMap::new();
    values.insert("model".to_string(), "large".to_string());

    let result = StageRegistry::with_builtin().create(&StageParams::new("pos-tagger", values));

    assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));
}

/// Test that a custom stage can be registered and created by name
#[test]
fn test_registry_register_shouldAcceptCustomStage() {
    struct Shout;

    impl Annotator for Shout {
        fn name(&self) -> &str {
            "shout"
        }
        fn requires(&self) -> &'static [AnnotationType] {
            &[]
        }
        fn produces(&self) -> &'static [AnnotationType] {
            &[]
        }
        fn annotate(&self, _document: &Document) -> Result<Vec<annoflow::Annotation>, StageFailure> {
            Err(StageFailure::Capability("too loud".to_string()))
        }
    }

    fn shout(_params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        Ok(Box::new(Shout))
    }

    let mut registry = StageRegistry::with_builtin();
    registry.register("shout", shout);

    assert!(registry.contains("shout"));
    let stage = registry.create(&StageParams::empty("shout")).map_err(|e| e.to_string());
    assert!(matches!(stage, Ok(ref s) if s.name() == "shout"));
}

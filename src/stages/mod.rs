/*!
 * Annotation stages.
 *
 * Every stage wraps one NLP capability behind the [`Annotator`] trait:
 * - `segmenter`: sentences and tokens
 * - `paragraph-splitter`: paragraphs split on a configurable pattern
 * - `lemmatizer`: token lemmas
 * - `pos-tagger`: part-of-speech tags
 * - `parser`: dependency relations
 * - `ner`: named entities
 * - `coreference`: coreference chains over entity and pronoun mentions
 *
 * The built-in capabilities are rule based. Stages are looked up by name
 * through the [`StageRegistry`].
 */

use std::collections::{BTreeMap, HashMap};

use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

pub mod coreference;
pub mod lemmatizer;
pub mod ner;
pub mod paragraph;
pub mod parser;
pub mod pos_tagger;
pub mod registry;
pub mod segmenter;

pub use coreference::CoreferenceResolver;
pub use lemmatizer::Lemmatizer;
pub use ner::NamedEntityRecognizer;
pub use paragraph::ParagraphSplitter;
pub use parser::DependencyParser;
pub use pos_tagger::PosTagger;
pub use registry::{StageFactory, StageRegistry};
pub use segmenter::Segmenter;

/// One step of the annotation pipeline.
///
/// A stage reads the document and returns the annotations it adds. It never
/// sees a mutable document, so earlier annotations cannot be changed.
pub trait Annotator: Send + Sync {
    /// Name used in configuration and error messages
    fn name(&self) -> &str;

    /// Layers that must be completed before this stage runs
    fn requires(&self) -> &'static [AnnotationType];

    /// Layers this stage completes
    fn produces(&self) -> &'static [AnnotationType];

    /// Compute the new annotations for a document
    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure>;
}

/// String parameters of a stage descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageParams {
    stage: String,
    values: BTreeMap<String, String>,
}

impl StageParams {
    pub fn new(stage: &str, values: BTreeMap<String, String>) -> Self {
        Self {
            stage: stage.to_string(),
            values,
        }
    }

    /// Parameters with no values
    pub fn empty(stage: &str) -> Self {
        Self::new(stage, BTreeMap::new())
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Reject any parameter not in `known`
    pub fn ensure_only(&self, known: &[&str]) -> Result<(), ConfigError> {
        match self.values.keys().find(|k| !known.contains(&k.as_str())) {
            Some(unknown) => Err(self.invalid(unknown, "unknown parameter")),
            None => Ok(()),
        }
    }

    /// Build an error for one of this stage's parameters
    pub fn invalid(&self, param: &str, message: impl Into<String>) -> ConfigError {
        ConfigError::InvalidParameter {
            stage: self.stage.clone(),
            param: param.to_string(),
            message: message.into(),
        }
    }
}

/// Whether a token contains at least one letter or digit
pub(crate) fn is_word(text: &str) -> bool {
    text.chars().any(char::is_alphanumeric)
}

pub(crate) fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

/// Coarse part-of-speech category per tagged span
pub(crate) fn coarse_tags(document: &Document) -> HashMap<(usize, usize), &str> {
    document
        .annotations_of_type(AnnotationType::PartOfSpeech)
        .filter_map(|a| match &a.value {
            AnnotationValue::PartOfSpeech { coarse, .. } => Some(((a.begin, a.end), coarse.as_str())),
            _ => None,
        })
        .collect()
}

/// Tokens of every sentence, sentences in insertion order and tokens by offset.
///
/// Tokens are sorted once and each sentence takes its range by binary search.
pub(crate) fn sentence_tokens(document: &Document) -> Vec<Vec<&Annotation>> {
    let mut tokens: Vec<&Annotation> = document.annotations_of_type(AnnotationType::Token).collect();
    tokens.sort_by_key(|t| (t.begin, t.end));

    document
        .annotations_of_type(AnnotationType::Sentence)
        .map(|sentence| {
            let first = tokens.partition_point(|t| t.begin < sentence.begin);
            tokens[first..]
                .iter()
                .take_while(|t| t.begin <= sentence.end)
                .filter(|t| sentence.covers(t))
                .copied()
                .collect()
        })
        .collect()
}

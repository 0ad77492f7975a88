/*!
 * Core document model types for the annotation pipeline.
 *
 * A document owns its text and an append-only list of span annotations.
 * Offsets are byte offsets into the UTF-8 text.
 */

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::errors::InvalidSpanError;

/// Type tag of an annotation.
///
/// Declaration order is the order layers are listed in interchange files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AnnotationType {
    Sentence,
    Token,
    Paragraph,
    Lemma,
    PartOfSpeech,
    Dependency,
    NamedEntity,
    CoreferenceLink,
}

impl AnnotationType {
    /// All annotation types in declaration order
    pub const ALL: [AnnotationType; 8] = [
        Self::Sentence,
        Self::Token,
        Self::Paragraph,
        Self::Lemma,
        Self::PartOfSpeech,
        Self::Dependency,
        Self::NamedEntity,
        Self::CoreferenceLink,
    ];

    /// Stable lowercase name used in configuration, logs and interchange files
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sentence => "sentence",
            Self::Token => "token",
            Self::Paragraph => "paragraph",
            Self::Lemma => "lemma",
            Self::PartOfSpeech => "pos",
            Self::Dependency => "dependency",
            Self::NamedEntity => "named-entity",
            Self::CoreferenceLink => "coreference",
        }
    }

    /// Human readable name for console output
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Sentence => "Sentence",
            Self::Token => "Token",
            Self::Paragraph => "Paragraph",
            Self::Lemma => "Lemma",
            Self::PartOfSpeech => "POS",
            Self::Dependency => "Dependency",
            Self::NamedEntity => "NamedEntity",
            Self::CoreferenceLink => "CoreferenceLink",
        }
    }
}

impl fmt::Display for AnnotationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnotationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown annotation type: {}", s))
    }
}

/// Type-specific payload of an annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationValue {
    Sentence,
    Token,
    Paragraph,
    Lemma {
        value: String,
    },
    PartOfSpeech {
        /// Fine-grained tag (Penn Treebank style)
        tag: String,
        /// Coarse universal category
        coarse: String,
    },
    /// Spans the dependent token. The root's governor is itself.
    Dependency {
        relation: String,
        governor_begin: usize,
        governor_end: usize,
    },
    NamedEntity {
        /// Entity category, e.g. PERSON or LOCATION
        value: String,
    },
    CoreferenceLink {
        /// Mentions sharing a chain id corefer
        chain: u32,
        /// PROPER or PRONOMINAL
        mention: String,
    },
}

impl AnnotationValue {
    pub fn annotation_type(&self) -> AnnotationType {
        match self {
            Self::Sentence => AnnotationType::Sentence,
            Self::Token => AnnotationType::Token,
            Self::Paragraph => AnnotationType::Paragraph,
            Self::Lemma { .. } => AnnotationType::Lemma,
            Self::PartOfSpeech { .. } => AnnotationType::PartOfSpeech,
            Self::Dependency { .. } => AnnotationType::Dependency,
            Self::NamedEntity { .. } => AnnotationType::NamedEntity,
            Self::CoreferenceLink { .. } => AnnotationType::CoreferenceLink,
        }
    }

    /// Attributes as ordered name/value pairs.
    ///
    /// This is the flat form used by the console dump and the interchange
    /// writer; [`AnnotationValue::from_attributes`] is its inverse.
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Sentence | Self::Token | Self::Paragraph => Vec::new(),
            Self::Lemma { value } => vec![("value", value.clone())],
            Self::PartOfSpeech { tag, coarse } => {
                vec![("tag", tag.clone()), ("coarse", coarse.clone())]
            }
            Self::Dependency {
                relation,
                governor_begin,
                governor_end,
            } => vec![
                ("relation", relation.clone()),
                ("governor-begin", governor_begin.to_string()),
                ("governor-end", governor_end.to_string()),
            ],
            Self::NamedEntity { value } => vec![("value", value.clone())],
            Self::CoreferenceLink { chain, mention } => {
                vec![("chain", chain.to_string()), ("mention", mention.clone())]
            }
        }
    }

    /// Rebuild a value from its type and flat attributes.
    ///
    /// `lookup` returns the raw value of a named attribute, if present.
    pub fn from_attributes<'a, F>(annotation_type: AnnotationType, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let required = |name: &str| -> Result<String, String> {
            lookup(name)
                .map(str::to_string)
                .ok_or_else(|| format!("{} annotation is missing attribute '{}'", annotation_type, name))
        };
        let number = |name: &str| -> Result<usize, String> {
            required(name)?
                .parse::<usize>()
                .map_err(|e| format!("attribute '{}' is not a number: {}", name, e))
        };

        Ok(match annotation_type {
            AnnotationType::Sentence => Self::Sentence,
            AnnotationType::Token => Self::Token,
            AnnotationType::Paragraph => Self::Paragraph,
            AnnotationType::Lemma => Self::Lemma {
                value: required("value")?,
            },
            AnnotationType::PartOfSpeech => Self::PartOfSpeech {
                tag: required("tag")?,
                coarse: required("coarse")?,
            },
            AnnotationType::Dependency => Self::Dependency {
                relation: required("relation")?,
                governor_begin: number("governor-begin")?,
                governor_end: number("governor-end")?,
            },
            AnnotationType::NamedEntity => Self::NamedEntity {
                value: required("value")?,
            },
            AnnotationType::CoreferenceLink => Self::CoreferenceLink {
                chain: required("chain")?
                    .parse::<u32>()
                    .map_err(|e| format!("attribute 'chain' is not a number: {}", e))?,
                mention: required("mention")?,
            },
        })
    }
}

/// A typed fact attached to a span of the document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub begin: usize,
    pub end: usize,
    pub value: AnnotationValue,
}

impl Annotation {
    pub fn new(begin: usize, end: usize, value: AnnotationValue) -> Self {
        Self { begin, end, value }
    }

    pub fn annotation_type(&self) -> AnnotationType {
        self.value.annotation_type()
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `other` lies entirely within this annotation's span
    pub fn covers(&self, other: &Annotation) -> bool {
        self.begin <= other.begin && other.end <= self.end
    }

    /// Whether this annotation has the given span
    pub fn has_span(&self, begin: usize, end: usize) -> bool {
        self.begin == begin && self.end == end
    }
}

/// Descriptive metadata of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentMetadata {
    /// Unique identifier; also names the interchange file
    pub id: String,

    /// Language code (ISO 639)
    pub language: String,

    pub title: Option<String>,

    /// Where the text came from
    pub uri: Option<String>,
}

/// A text with its annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    text: String,
    metadata: DocumentMetadata,
    annotations: Vec<Annotation>,
    layers: BTreeSet<AnnotationType>,
}

impl Document {
    /// Create a document with a generated identifier.
    pub fn new(text: impl Into<String>, language: &str) -> Self {
        Self::with_metadata(
            text,
            DocumentMetadata {
                id: Uuid::new_v4().to_string(),
                language: language.to_string(),
                title: None,
                uri: None,
            },
        )
    }

    pub fn with_metadata(text: impl Into<String>, metadata: DocumentMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
            annotations: Vec::new(),
            layers: BTreeSet::new(),
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.metadata.id = id.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn with_uri(mut self, uri: impl Into<String>) -> Self {
        self.metadata.uri = Some(uri.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn language(&self) -> &str {
        &self.metadata.language
    }

    /// All annotations in insertion order
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Number of annotations
    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }

    /// Check that a span fits the text and falls on character boundaries.
    pub fn check_span(&self, begin: usize, end: usize) -> Result<(), InvalidSpanError> {
        let valid = begin <= end
            && end <= self.text.len()
            && self.text.is_char_boundary(begin)
            && self.text.is_char_boundary(end);

        if valid {
            Ok(())
        } else {
            Err(InvalidSpanError {
                begin,
                end,
                text_len: self.text.len(),
            })
        }
    }

    /// Append one annotation after checking its span.
    pub fn add_annotation(&mut self, annotation: Annotation) -> Result<(), InvalidSpanError> {
        self.check_span(annotation.begin, annotation.end)?;
        self.annotations.push(annotation);
        Ok(())
    }

    /// Append the output of a completed stage.
    ///
    /// Every span is checked before anything is added, so on error the
    /// document is unchanged. On success the produced layers are marked
    /// completed even when no annotation was added.
    pub fn add_layer(
        &mut self,
        produced: &[AnnotationType],
        annotations: Vec<Annotation>,
    ) -> Result<usize, InvalidSpanError> {
        for annotation in &annotations {
            self.check_span(annotation.begin, annotation.end)?;
        }

        let added = annotations.len();
        self.annotations.extend(annotations);
        self.layers.extend(produced.iter().copied());
        Ok(added)
    }

    /// Mark a layer completed without adding annotations
    pub fn mark_layer(&mut self, annotation_type: AnnotationType) {
        self.layers.insert(annotation_type);
    }

    /// Whether a stage producing this type has completed
    pub fn has_layer(&self, annotation_type: AnnotationType) -> bool {
        self.layers.contains(&annotation_type)
    }

    /// Completed layers in declaration order
    pub fn layers(&self) -> impl Iterator<Item = AnnotationType> + '_ {
        self.layers.iter().copied()
    }

    /// Annotations of one type in insertion order.
    ///
    /// The iterator is lazy and can be cloned to restart it.
    pub fn annotations_of_type(
        &self,
        annotation_type: AnnotationType,
    ) -> impl Iterator<Item = &Annotation> + Clone + '_ {
        self.annotations
            .iter()
            .filter(move |a| a.annotation_type() == annotation_type)
    }

    /// Annotations of one type lying within the span of `container`
    pub fn annotations_within<'a>(
        &'a self,
        annotation_type: AnnotationType,
        container: &'a Annotation,
    ) -> impl Iterator<Item = &'a Annotation> + Clone + 'a {
        self.annotations_of_type(annotation_type)
            .filter(move |a| container.covers(a))
    }

    /// First annotation of a type with exactly the given span
    pub fn annotation_at(
        &self,
        annotation_type: AnnotationType,
        begin: usize,
        end: usize,
    ) -> Option<&Annotation> {
        self.annotations_of_type(annotation_type)
            .find(|a| a.has_span(begin, end))
    }

    /// Annotation types present, in order of first appearance
    pub fn annotation_types(&self) -> Vec<AnnotationType> {
        let mut seen = Vec::new();
        for annotation in &self.annotations {
            let t = annotation.annotation_type();
            if !seen.contains(&t) {
                seen.push(t);
            }
        }
        seen
    }

    /// Text covered by an annotation.
    ///
    /// Annotations stored in the document always have valid spans; for a
    /// foreign annotation an empty string is returned if the span is invalid.
    pub fn covered_text(&self, annotation: &Annotation) -> &str {
        self.text.get(annotation.begin..annotation.end).unwrap_or("")
    }
}

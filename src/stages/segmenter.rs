/*!
 * Sentence and token segmentation.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Annotator, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

/// Numbers with separators, words with inner hyphens or apostrophes, or a
/// single symbol.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+(?:[.,]\d+)+|\w+(?:[-'’]\w+)*|[^\w\s]").expect("valid token pattern")
});

const SENTENCE_TERMINATORS: [&str; 3] = [".", "!", "?"];

const CLOSING_PUNCTUATION: [&str; 6] = ["\"", "'", ")", "]", "”", "’"];

const ABBREVIATIONS: [&str; 12] = [
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "inc", "ltd",
];

/// Splits text into tokens and sentences.
#[derive(Debug, Clone, Default)]
pub struct Segmenter;

impl Segmenter {
    pub const NAME: &'static str = "segmenter";

    pub fn new() -> Self {
        Self
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[])?;
        Ok(Box::new(Self::new()))
    }

    /// Token spans of a text in order
    pub fn tokenize(text: &str) -> Vec<(usize, usize)> {
        TOKEN_PATTERN
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    /// Group token spans into sentence spans.
    ///
    /// A sentence ends after a terminator (plus any closing quotes or
    /// brackets that follow it) or before a line break.
    pub fn sentences(text: &str, tokens: &[(usize, usize)]) -> Vec<(usize, usize)> {
        let mut sentences = Vec::new();
        let mut start: Option<usize> = None;
        let mut i = 0;

        while i < tokens.len() {
            let (begin, end) = tokens[i];
            let sentence_begin = *start.get_or_insert(begin);
            let mut sentence_end = end;
            let mut boundary = false;

            if SENTENCE_TERMINATORS.contains(&&text[begin..end]) && !Self::is_abbreviation(text, tokens, i) {
                boundary = true;
                while i + 1 < tokens.len()
                    && CLOSING_PUNCTUATION.contains(&&text[tokens[i + 1].0..tokens[i + 1].1])
                    && tokens[i + 1].0 == sentence_end
                {
                    i += 1;
                    sentence_end = tokens[i].1;
                }
            }

            if let Some(&(next_begin, _)) = tokens.get(i + 1) {
                if text[sentence_end..next_begin].contains('\n') {
                    boundary = true;
                }
            }

            if boundary {
                sentences.push((sentence_begin, sentence_end));
                start = None;
            }
            i += 1;
        }

        if let (Some(begin), Some(&(_, end))) = (start, tokens.last()) {
            sentences.push((begin, end));
        }

        sentences
    }

    /// A period directly attached to a known abbreviation or a single capital
    fn is_abbreviation(text: &str, tokens: &[(usize, usize)], index: usize) -> bool {
        let (begin, _) = tokens[index];
        if &text[begin..tokens[index].1] != "." || index == 0 {
            return false;
        }

        let (prev_begin, prev_end) = tokens[index - 1];
        if prev_end != begin {
            return false;
        }

        let previous = &text[prev_begin..prev_end];
        let single_initial = previous.chars().count() == 1 && super::starts_uppercase(previous);
        single_initial || ABBREVIATIONS.contains(&previous.to_lowercase().as_str())
    }
}

impl Annotator for Segmenter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Sentence, AnnotationType::Token]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        let text = document.text();
        let tokens = Self::tokenize(text);
        let sentences = Self::sentences(text, &tokens);

        let mut annotations = Vec::with_capacity(tokens.len() + sentences.len());
        annotations.extend(
            sentences
                .into_iter()
                .map(|(begin, end)| Annotation::new(begin, end, AnnotationValue::Sentence)),
        );
        annotations.extend(
            tokens
                .into_iter()
                .map(|(begin, end)| Annotation::new(begin, end, AnnotationValue::Token)),
        );

        Ok(annotations)
    }
}

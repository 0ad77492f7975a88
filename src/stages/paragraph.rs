/*!
 * Paragraph splitting on a line break pattern.
 */

use regex::Regex;

use super::{Annotator, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

/// Any run of line breaks separates paragraphs
pub const SINGLE_LINE_BREAKS_PATTERN: &str = r"(?:\r\n)+|\n+";

/// Only blank lines separate paragraphs
pub const DOUBLE_LINE_BREAKS_PATTERN: &str = r"(?:\r\n){2,}|\n{2,}";

/// Splits text into paragraphs at matches of a separator pattern.
#[derive(Debug, Clone)]
pub struct ParagraphSplitter {
    separator: Regex,
}

impl ParagraphSplitter {
    pub const NAME: &'static str = "paragraph-splitter";

    pub const PARAM_SPLIT_PATTERN: &'static str = "split_pattern";

    /// Build a splitter from a preset name or a regular expression.
    ///
    /// `single-line-breaks` and `double-line-breaks` select the presets.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let expression = match pattern {
            "single-line-breaks" => SINGLE_LINE_BREAKS_PATTERN,
            "double-line-breaks" => DOUBLE_LINE_BREAKS_PATTERN,
            other => other,
        };

        Ok(Self {
            separator: Regex::new(expression)?,
        })
    }

    pub fn single_line_breaks() -> Self {
        Self {
            separator: Regex::new(SINGLE_LINE_BREAKS_PATTERN).expect("valid preset pattern"),
        }
    }

    pub fn double_line_breaks() -> Self {
        Self {
            separator: Regex::new(DOUBLE_LINE_BREAKS_PATTERN).expect("valid preset pattern"),
        }
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[Self::PARAM_SPLIT_PATTERN])?;

        let splitter = match params.get(Self::PARAM_SPLIT_PATTERN) {
            Some(pattern) => Self::new(pattern)
                .map_err(|e| params.invalid(Self::PARAM_SPLIT_PATTERN, e.to_string()))?,
            None => Self::double_line_breaks(),
        };
        Ok(Box::new(splitter))
    }

    /// Paragraph spans with surrounding whitespace trimmed; empty ones dropped
    pub fn paragraphs(&self, text: &str) -> Vec<(usize, usize)> {
        let mut spans = Vec::new();
        let mut start = 0;

        for separator in self.separator.find_iter(text) {
            if separator.start() == separator.end() {
                continue;
            }
            if let Some(span) = trimmed_span(text, start, separator.start()) {
                spans.push(span);
            }
            start = separator.end();
        }

        if let Some(span) = trimmed_span(text, start, text.len()) {
            spans.push(span);
        }

        spans
    }
}

impl Default for ParagraphSplitter {
    fn default() -> Self {
        Self::double_line_breaks()
    }
}

fn trimmed_span(text: &str, begin: usize, end: usize) -> Option<(usize, usize)> {
    let slice = &text[begin..end];
    let leading = slice.len() - slice.trim_start().len();
    let trailing = slice.len() - slice.trim_end().len();

    if leading == slice.len() {
        None
    } else {
        Some((begin + leading, end - trailing))
    }
}

impl Annotator for ParagraphSplitter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Paragraph]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        Ok(self
            .paragraphs(document.text())
            .into_iter()
            .map(|(begin, end)| Annotation::new(begin, end, AnnotationValue::Paragraph))
            .collect())
    }
}

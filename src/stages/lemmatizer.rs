/*!
 * Dictionary and suffix based English lemmatizer.
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Annotator, PosTagger, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

static IRREGULAR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("is", "be"), ("are", "be"), ("was", "be"), ("were", "be"), ("been", "be"),
        ("being", "be"), ("am", "be"),
        ("has", "have"), ("had", "have"), ("having", "have"),
        ("does", "do"), ("did", "do"), ("done", "do"),
        ("went", "go"), ("gone", "go"), ("goes", "go"),
        ("took", "take"), ("taken", "take"),
        ("led", "lead"), ("held", "hold"), ("said", "say"), ("says", "say"),
        ("won", "win"), ("made", "make"), ("found", "find"), ("left", "leave"),
        ("children", "child"), ("people", "people"), ("men", "man"), ("women", "woman"),
        ("better", "good"), ("best", "good"), ("worse", "bad"), ("worst", "bad"),
        ("us", "we"), ("them", "they"), ("him", "he"), ("her", "she"),
        // uninflected words the suffix rules would damage
        ("less", "less"), ("news", "news"), ("this", "this"), ("his", "his"), ("its", "its"),
        ("as", "as"), ("thus", "thus"), ("series", "series"), ("during", "during"),
        ("hundred", "hundred"), ("something", "something"), ("nothing", "nothing"),
        ("anything", "anything"), ("everything", "everything"), ("morning", "morning"),
        ("evening", "evening"), ("bring", "bring"), ("thing", "thing"), ("spring", "spring"),
    ]
    .into_iter()
    .collect()
});

/// Assigns a lemma to every word token.
#[derive(Debug, Clone, Default)]
pub struct Lemmatizer;

impl Lemmatizer {
    pub const NAME: &'static str = "lemmatizer";

    pub fn new() -> Self {
        Self
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[])?;
        Ok(Box::new(Self::new()))
    }

    /// Lemma of a single word form.
    ///
    /// Capitalised words without an inflectional suffix are treated as names
    /// and keep their surface form; symbols are returned unchanged.
    pub fn lemma(word: &str) -> String {
        if !super::is_word(word) {
            return word.to_string();
        }

        let lower = word.to_lowercase();
        if let Some(lemma) = IRREGULAR.get(lower.as_str()) {
            return (*lemma).to_string();
        }
        if lower.chars().any(|c| c.is_ascii_digit()) {
            return lower;
        }

        let stripped = strip_suffix(&lower);
        if super::starts_uppercase(word) && stripped == lower && !PosTagger::is_closed_class(&lower) {
            return word.to_string();
        }
        stripped
    }
}

fn strip_suffix(word: &str) -> String {
    let len = word.chars().count();

    if len > 4 && word.ends_with("ies") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if len > 4 && word.ends_with("ied") {
        return format!("{}y", &word[..word.len() - 3]);
    }
    if len > 5 && word.ends_with("ing") {
        return restore_stem(&word[..word.len() - 3]);
    }
    if len > 4 && word.ends_with("ed") && !word.ends_with("eed") {
        let stem = &word[..word.len() - 2];
        if stem.ends_with('v') || stem.ends_with('c') || stem.ends_with('z') {
            return format!("{}e", stem);
        }
        return restore_stem(stem);
    }
    if len > 4 && (word.ends_with("sses") || word.ends_with("ches") || word.ends_with("shes") || word.ends_with("xes")) {
        return word[..word.len() - 2].to_string();
    }
    if len > 3
        && word.ends_with('s')
        && !word.ends_with("ss")
        && !word.ends_with("us")
        && !word.ends_with("is")
    {
        return word[..word.len() - 1].to_string();
    }

    word.to_string()
}

/// Undo spelling changes made before a suffix.
///
/// A doubled final consonant collapses ("stopp" -> "stop"); a short
/// consonant-vowel-consonant stem regains its silent e ("tak" -> "take").
fn restore_stem(stem: &str) -> String {
    let bytes = stem.as_bytes();
    let n = bytes.len();
    let is_vowel = |b: u8| b"aeiou".contains(&b);

    let mut tail = stem.char_indices().rev();
    if let (Some((last_at, last)), Some((_, previous))) = (tail.next(), tail.next()) {
        if stem.chars().count() >= 3 && last == previous && !"aeiouls".contains(last) {
            return stem[..last_at].to_string();
        }
    }
    if n == 3
        && stem.is_ascii()
        && !is_vowel(bytes[0])
        && is_vowel(bytes[1])
        && !is_vowel(bytes[2])
        && !b"wxy".contains(&bytes[2])
    {
        return format!("{}e", stem);
    }
    stem.to_string()
}

impl Annotator for Lemmatizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Token]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Lemma]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        Ok(document
            .annotations_of_type(AnnotationType::Token)
            .map(|token| {
                let value = Self::lemma(document.covered_text(token));
                Annotation::new(token.begin, token.end, AnnotationValue::Lemma { value })
            })
            .collect())
    }
}

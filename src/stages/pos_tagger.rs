/*!
 * Lexicon and suffix based part-of-speech tagger.
 *
 * Tags follow the Penn Treebank set; each fine tag comes with a coarse
 * universal category (NOUN, PROPN, VERB, AUX, ...).
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{Annotator, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

/// Closed-class words and a few frequent verbs: lowercase form -> (tag, coarse)
static LEXICON: Lazy<HashMap<&'static str, (&'static str, &'static str)>> = Lazy::new(|| {
    let mut lexicon = HashMap::new();
    let groups: [(&[&str], &str, &str); 20] = [
        (
            &["the", "a", "an", "this", "that", "these", "those", "every", "each", "some", "any", "no", "all", "both", "another"],
            "DT",
            "DET",
        ),
        (
            &["in", "on", "at", "of", "for", "with", "by", "from", "as", "into", "within", "about", "after",
              "before", "over", "under", "between", "than", "during", "since", "like", "until", "against",
              "across", "through", "without", "per"],
            "IN",
            "ADP",
        ),
        (&["to"], "TO", "PART"),
        (&["and", "or", "but", "nor", "yet"], "CC", "CCONJ"),
        (&["if", "because", "whether", "although", "though", "while", "unless"], "IN", "SCONJ"),
        (&["i", "you", "he", "she", "it", "we", "they", "me", "him", "us", "them"], "PRP", "PRON"),
        (&["his", "her", "its", "their", "our", "my", "your"], "PRP$", "PRON"),
        (&["who", "whom", "what"], "WP", "PRON"),
        (&["which"], "WDT", "DET"),
        (&["is", "does", "has"], "VBZ", "AUX"),
        (&["are", "am", "do", "have"], "VBP", "AUX"),
        (&["was", "were", "did", "had"], "VBD", "AUX"),
        (&["be"], "VB", "AUX"),
        (&["been"], "VBN", "AUX"),
        (&["being"], "VBG", "AUX"),
        (&["will", "would", "can", "could", "may", "might", "shall", "should", "must"], "MD", "AUX"),
        (&["not", "n't"], "RB", "PART"),
        (
            &["also", "however", "further", "more", "most", "very", "early", "today", "now", "then", "there",
              "here", "already", "still", "just", "only", "even", "again", "never", "soon", "instead"],
            "RB",
            "ADV",
        ),
        (
            &["one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven", "twelve",
              "fifteen", "eighteen", "twenty", "hundred", "thousand", "million"],
            "CD",
            "NUM",
        ),
        (&["says", "suggests", "hopes", "wants", "needs"], "VBZ", "VERB"),
    ];

    for (words, tag, coarse) in groups {
        for word in words {
            lexicon.insert(*word, (tag, coarse));
        }
    }

    for (word, tag) in [
        ("say", "VB"), ("win", "VB"), ("hold", "VB"), ("support", "VB"), ("remain", "VB"),
        ("leave", "VB"), ("become", "VB"), ("find", "VB"), ("take", "VB"), ("suggest", "VBP"),
        ("include", "VBP"), ("said", "VBD"), ("won", "VBD"), ("took", "VBD"), ("led", "VBN"),
        ("held", "VBN"), ("made", "VBD"), ("left", "VBD"),
    ] {
        lexicon.insert(word, (tag, "VERB"));
    }

    lexicon
});

/// Tags every token with a part of speech.
#[derive(Debug, Clone, Default)]
pub struct PosTagger;

impl PosTagger {
    pub const NAME: &'static str = "pos-tagger";

    pub fn new() -> Self {
        Self
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[])?;
        Ok(Box::new(Self::new()))
    }

    /// Whether a lowercase word is in the closed-class lexicon
    pub fn is_closed_class(lower: &str) -> bool {
        LEXICON
            .get(lower)
            .is_some_and(|(_, coarse)| *coarse != "VERB")
    }

    /// Fine tag and coarse category of one token
    pub fn tag(word: &str) -> (&'static str, &'static str) {
        if !super::is_word(word) {
            return punctuation_tag(word);
        }
        if word.chars().all(|c| c.is_ascii_digit() || c == '.' || c == ',') {
            return ("CD", "NUM");
        }

        let lower = word.to_lowercase();
        if let Some(&(tag, coarse)) = LEXICON.get(lower.as_str()) {
            return (tag, coarse);
        }
        if super::starts_uppercase(word) {
            return if lower.ends_with('s') && word.chars().count() > 3 && word != word.to_uppercase() {
                ("NNPS", "PROPN")
            } else {
                ("NNP", "PROPN")
            };
        }

        suffix_tag(&lower)
    }
}

fn punctuation_tag(symbol: &str) -> (&'static str, &'static str) {
    match symbol {
        "." | "!" | "?" => (".", "PUNCT"),
        "," => (",", "PUNCT"),
        ":" | ";" | "-" | "–" | "—" => (":", "PUNCT"),
        "(" | "[" => ("-LRB-", "PUNCT"),
        ")" | "]" => ("-RRB-", "PUNCT"),
        "\"" | "“" | "”" | "'" | "‘" | "’" => ("''", "PUNCT"),
        "$" | "€" | "£" => ("$", "SYM"),
        "%" | "&" | "+" | "=" | "/" => ("SYM", "SYM"),
        _ => ("SYM", "SYM"),
    }
}

fn suffix_tag(lower: &str) -> (&'static str, &'static str) {
    const ADJECTIVE_SUFFIXES: [&str; 10] = ["ous", "ful", "ive", "able", "ible", "al", "ic", "ent", "ant", "less"];

    if lower.ends_with("ly") && lower.len() > 4 {
        ("RB", "ADV")
    } else if lower.ends_with("ing") && lower.len() > 5 {
        ("VBG", "VERB")
    } else if lower.ends_with("ed") && lower.len() > 4 {
        ("VBD", "VERB")
    } else if ADJECTIVE_SUFFIXES.iter().any(|s| lower.ends_with(s)) && lower.len() > 4 {
        ("JJ", "ADJ")
    } else if lower.ends_with('s') && !lower.ends_with("ss") && lower.len() > 3 {
        ("NNS", "NOUN")
    } else {
        ("NN", "NOUN")
    }
}

impl Annotator for PosTagger {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Token]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::PartOfSpeech]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        Ok(document
            .annotations_of_type(AnnotationType::Token)
            .map(|token| {
                let (tag, coarse) = Self::tag(document.covered_text(token));
                Annotation::new(
                    token.begin,
                    token.end,
                    AnnotationValue::PartOfSpeech {
                        tag: tag.to_string(),
                        coarse: coarse.to_string(),
                    },
                )
            })
            .collect())
    }
}

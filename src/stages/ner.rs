/*!
 * Named entity recognizer.
 *
 * Candidates are runs of proper nouns (optionally bridged by connectors
 * such as "of" or "pel"). Each run is classified as PERSON, LOCATION,
 * ORGANIZATION or MISC from a gazetteer, title words, cue words and the
 * categories already assigned earlier in the document.
 */

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use log::debug;

use super::{Annotator, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

pub const PERSON: &str = "PERSON";
pub const LOCATION: &str = "LOCATION";
pub const ORGANIZATION: &str = "ORGANIZATION";
pub const MISC: &str = "MISC";

const CONNECTORS: [&str; 11] = ["of", "de", "del", "pel", "la", "van", "von", "der", "y", "i", "for"];

const TITLES: [&str; 16] = [
    "mr", "mrs", "ms", "dr", "prof", "president", "minister", "prime", "chancellor", "king", "queen",
    "senator", "governor", "mayor", "general", "judge",
];

const ORGANIZATION_CUES: [&str; 21] = [
    "party", "union", "parliament", "candidacy", "coalition", "council", "committee", "commission",
    "government", "ministry", "inc", "corp", "company", "bank", "university", "association", "agency",
    "court", "army", "front", "alliance",
];

const LOCATION_CUES: [&str; 8] = ["republic", "kingdom", "city", "river", "mountains", "island", "street", "county"];

const LOCATION_PREPOSITIONS: [&str; 7] = ["in", "at", "from", "within", "across", "near", "into"];

/// Calendar names are not entities for this recognizer
const CALENDAR: [&str; 19] = [
    "monday", "tuesday", "wednesday", "thursday", "friday", "saturday", "sunday", "january",
    "february", "march", "april", "june", "july", "august", "september", "october", "november",
    "december", "may",
];

const BUILTIN_GAZETTEER: [(&str, &str); 6] = [
    ("Reuters", ORGANIZATION),
    ("Associated Press", ORGANIZATION),
    ("BBC", ORGANIZATION),
    ("United Nations", ORGANIZATION),
    ("European Union", ORGANIZATION),
    ("Wikinews", ORGANIZATION),
];

/// A token with its tag, as seen by the recognizer
#[derive(Debug, Clone, Copy)]
struct Word<'a> {
    begin: usize,
    end: usize,
    text: &'a str,
    coarse: &'a str,
}

impl Word<'_> {
    fn is_proper(&self) -> bool {
        self.coarse == "PROPN" && !CALENDAR.contains(&self.text.to_lowercase().as_str())
    }

    fn is_connector(&self) -> bool {
        CONNECTORS.contains(&self.text)
    }

    fn lower(&self) -> String {
        self.text.to_lowercase()
    }
}

/// Categories assigned so far in the document
#[derive(Debug, Default)]
struct Seen {
    categories: HashMap<String, &'static str>,
    person_parts: HashSet<String>,
}

/// Finds and classifies named entities.
#[derive(Debug, Clone)]
pub struct NamedEntityRecognizer {
    gazetteer: HashMap<String, String>,
}

impl NamedEntityRecognizer {
    pub const NAME: &'static str = "ner";

    pub const PARAM_GAZETTEER: &'static str = "gazetteer";

    /// Recognizer with the built-in gazetteer only
    pub fn new() -> Self {
        Self::with_gazetteer(HashMap::new())
    }

    /// Recognizer with extra gazetteer entries; they take precedence over
    /// the built-in ones.
    pub fn with_gazetteer(entries: HashMap<String, String>) -> Self {
        let mut gazetteer: HashMap<String, String> = BUILTIN_GAZETTEER
            .iter()
            .map(|(name, category)| (name.to_string(), category.to_string()))
            .collect();
        gazetteer.extend(entries);
        Self { gazetteer }
    }

    /// Load gazetteer entries from a JSON object of surface form to category
    pub fn load_gazetteer(path: &Path) -> Result<HashMap<String, String>, String> {
        let content = fs::read_to_string(path).map_err(|e| format!("cannot read {:?}: {}", path, e))?;
        serde_json::from_str(&content).map_err(|e| format!("cannot parse {:?}: {}", path, e))
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[Self::PARAM_GAZETTEER])?;

        let recognizer = match params.get(Self::PARAM_GAZETTEER) {
            Some(path) => {
                let entries = Self::load_gazetteer(Path::new(path))
                    .map_err(|message| params.invalid(Self::PARAM_GAZETTEER, message))?;
                debug!("Loaded {} gazetteer entries from {}", entries.len(), path);
                Self::with_gazetteer(entries)
            }
            None => Self::new(),
        };
        Ok(Box::new(recognizer))
    }

    /// Candidate runs in one sentence as index ranges into `words`
    fn candidate_runs(words: &[Word<'_>]) -> Vec<(usize, usize)> {
        let mut runs = Vec::new();
        let mut i = 0;

        while i < words.len() {
            if !words[i].is_proper() {
                i += 1;
                continue;
            }

            let start = i;
            let mut end = i + 1;
            loop {
                if end < words.len() && words[end].is_proper() {
                    end += 1;
                } else if end + 1 < words.len() && words[end].is_connector() && words[end + 1].is_proper() {
                    end += 2;
                } else {
                    break;
                }
            }
            runs.push((start, end));
            i = end;
        }

        runs
    }

    /// Drop leading title words; return the remaining range and whether a
    /// title was found (in the run or right before it).
    fn strip_titles(words: &[Word<'_>], start: usize, end: usize) -> (usize, usize, bool) {
        let last_title = (start..end).rev().find(|&i| TITLES.contains(&words[i].lower().as_str()));
        if let Some(title) = last_title {
            return (title + 1, end, true);
        }

        let mut before = start;
        if before > 0 && words[before - 1].text == "." {
            before -= 1;
        }
        let titled = before > 0 && TITLES.contains(&words[before - 1].lower().as_str());
        (start, end, titled)
    }

    fn classify(
        &self,
        words: &[Word<'_>],
        start: usize,
        end: usize,
        surface: &str,
        titled: bool,
        seen: &Seen,
    ) -> &'static str {
        if let Some(category) = self.gazetteer.get(surface) {
            return category_constant(category);
        }
        if titled {
            return PERSON;
        }

        let last = words[end - 1].lower();
        if ORGANIZATION_CUES.contains(&last.as_str()) {
            return ORGANIZATION;
        }
        if (start..end).any(|i| LOCATION_CUES.contains(&words[i].lower().as_str())) {
            return LOCATION;
        }
        if let Some(&category) = seen.categories.get(surface) {
            return category;
        }
        if end - start == 1 && seen.person_parts.contains(surface) {
            return PERSON;
        }

        let text = words[start].text;
        if end - start == 1 && text.chars().count() > 1 && text.chars().all(|c| c.is_uppercase()) {
            return ORGANIZATION;
        }
        if start > 0 && LOCATION_PREPOSITIONS.contains(&words[start - 1].lower().as_str()) {
            return LOCATION;
        }
        if start > 1
            && words[start - 1].text == ","
            && seen.categories.get(words[start - 2].text) == Some(&LOCATION)
        {
            return LOCATION;
        }

        let connected = (start..end).any(|i| words[i].is_connector());
        if end - start >= 2 && !connected {
            PERSON
        } else {
            MISC
        }
    }
}

impl Default for NamedEntityRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map gazetteer categories onto the recognizer's label set
fn category_constant(category: &str) -> &'static str {
    match category.to_uppercase().as_str() {
        "PERSON" | "PER" => PERSON,
        "LOCATION" | "LOC" | "GPE" => LOCATION,
        "ORGANIZATION" | "ORGANISATION" | "ORG" => ORGANIZATION,
        _ => MISC,
    }
}

impl Annotator for NamedEntityRecognizer {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Sentence, AnnotationType::Token, AnnotationType::PartOfSpeech]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::NamedEntity]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        let tags = super::coarse_tags(document);

        let sentences: Vec<Vec<Word<'_>>> = super::sentence_tokens(document)
            .into_iter()
            .map(|tokens| {
                tokens
                    .into_iter()
                    .map(|token| Word {
                        begin: token.begin,
                        end: token.end,
                        text: document.covered_text(token),
                        coarse: tags.get(&(token.begin, token.end)).copied().unwrap_or("X"),
                    })
                    .collect()
            })
            .collect();

        // proper nouns seen away from the start of a sentence
        let inner_proper: HashSet<&str> = sentences
            .iter()
            .flat_map(|words| words.iter().skip(1))
            .filter(|w| w.is_proper())
            .map(|w| w.text)
            .collect();

        let mut seen = Seen::default();
        let mut annotations = Vec::new();

        for words in &sentences {
            let first_word = words.iter().position(|w| super::is_word(w.text));

            for (run_start, run_end) in Self::candidate_runs(words) {
                let (start, end, titled) = Self::strip_titles(words, run_start, run_end);
                if start >= end {
                    continue;
                }

                let begin = words[start].begin;
                let finish = words[end - 1].end;
                let surface = &document.text()[begin..finish];

                let sentence_initial = Some(start) == first_word && end - start == 1;
                if sentence_initial
                    && !titled
                    && !self.gazetteer.contains_key(surface)
                    && !inner_proper.contains(surface)
                {
                    continue;
                }

                let category = self.classify(words, start, end, surface, titled, &seen);
                if category == PERSON && end - start > 1 {
                    seen.person_parts.extend(words[start..end].iter().map(|w| w.text.to_string()));
                }
                seen.categories.insert(surface.to_string(), category);

                annotations.push(Annotation::new(
                    begin,
                    finish,
                    AnnotationValue::NamedEntity {
                        value: category.to_string(),
                    },
                ));
            }
        }

        Ok(annotations)
    }
}

/*!
 * Coreference resolution over named entities and personal pronouns.
 *
 * Entity mentions with the same text share a chain, and a single-token
 * mention joins the chain of an earlier person whose name it ends. Pronouns
 * attach to the nearest preceding chain of a compatible category. Only
 * chains with at least two mentions are emitted.
 */

use std::collections::HashMap;

use super::ner::{ORGANIZATION, PERSON};
use super::{Annotator, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

pub const PROPER: &str = "PROPER";
pub const PRONOMINAL: &str = "PRONOMINAL";

const PERSONAL_PRONOUNS: [&str; 8] = ["he", "she", "him", "her", "his", "hers", "himself", "herself"];
const PLURAL_PRONOUNS: [&str; 5] = ["they", "them", "their", "theirs", "themselves"];

#[derive(Debug, Clone)]
struct Mention<'a> {
    begin: usize,
    end: usize,
    text: &'a str,
    category: &'a str,
    pronominal: bool,
}

/// Links mentions of the same entity into chains.
#[derive(Debug, Clone, Default)]
pub struct CoreferenceResolver;

impl CoreferenceResolver {
    pub const NAME: &'static str = "coreference";

    pub fn new() -> Self {
        Self
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[])?;
        Ok(Box::new(Self::new()))
    }

    /// Category a pronoun can refer to, if it is one we resolve
    fn pronoun_category(lower: &str) -> Option<&'static str> {
        if PERSONAL_PRONOUNS.contains(&lower) {
            Some(PERSON)
        } else if PLURAL_PRONOUNS.contains(&lower) {
            Some(ORGANIZATION)
        } else {
            None
        }
    }

    fn mentions<'a>(document: &'a Document) -> Vec<Mention<'a>> {
        let entities = document
            .annotations_of_type(AnnotationType::NamedEntity)
            .filter_map(|a| match &a.value {
                AnnotationValue::NamedEntity { value } => Some(Mention {
                    begin: a.begin,
                    end: a.end,
                    text: document.covered_text(a),
                    category: value.as_str(),
                    pronominal: false,
                }),
                _ => None,
            });

        let tags = super::coarse_tags(document);
        let pronouns = document
            .annotations_of_type(AnnotationType::Token)
            .filter(move |token| tags.get(&(token.begin, token.end)) == Some(&"PRON"))
            .filter_map(|token| {
                let text = document.covered_text(token);
                Self::pronoun_category(&text.to_lowercase()).map(|category| Mention {
                    begin: token.begin,
                    end: token.end,
                    text,
                    category,
                    pronominal: true,
                })
            });

        let mut mentions: Vec<Mention<'a>> = entities.chain(pronouns).collect();
        mentions.sort_by_key(|m| (m.begin, m.end));
        mentions
    }

    /// Chain index per mention; `None` for pronouns with no antecedent
    fn resolve(mentions: &[Mention<'_>]) -> Vec<Option<usize>> {
        let mut chains: Vec<Option<usize>> = Vec::with_capacity(mentions.len());
        let mut by_text: HashMap<String, usize> = HashMap::new();
        // last name token of each multi-token person -> chain
        let mut by_surname: HashMap<&str, usize> = HashMap::new();
        // chain of the latest entity mention per category
        let mut latest: HashMap<&str, usize> = HashMap::new();
        let mut next_chain = 0;

        for mention in mentions {
            if mention.pronominal {
                chains.push(latest.get(mention.category).copied());
                continue;
            }

            let key = mention.text.to_lowercase();
            let existing = by_text.get(&key).copied().or_else(|| {
                if mention.category == PERSON && !mention.text.contains(char::is_whitespace) {
                    by_surname.get(mention.text).copied()
                } else {
                    None
                }
            });

            let chain = existing.unwrap_or_else(|| {
                next_chain += 1;
                next_chain - 1
            });
            by_text.insert(key, chain);
            if mention.category == PERSON {
                let mut names = mention.text.split_whitespace();
                if let (Some(_), Some(surname)) = (names.next(), names.last()) {
                    by_surname.entry(surname).or_insert(chain);
                }
            }
            latest.insert(mention.category, chain);
            chains.push(Some(chain));
        }

        chains
    }
}

impl Annotator for CoreferenceResolver {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Token, AnnotationType::PartOfSpeech, AnnotationType::NamedEntity]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::CoreferenceLink]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        let mentions = Self::mentions(document);
        let chains = Self::resolve(&mentions);

        let mut sizes: HashMap<usize, usize> = HashMap::new();
        for chain in chains.iter().flatten() {
            *sizes.entry(*chain).or_default() += 1;
        }

        // renumber surviving chains in order of first mention
        let mut numbering: HashMap<usize, u32> = HashMap::new();
        let mut annotations = Vec::new();
        for (mention, chain) in mentions.iter().zip(&chains) {
            let Some(chain) = chain.filter(|c| sizes[c] >= 2) else {
                continue;
            };
            let next = numbering.len() as u32;
            let number = *numbering.entry(chain).or_insert(next);

            annotations.push(Annotation::new(
                mention.begin,
                mention.end,
                AnnotationValue::CoreferenceLink {
                    chain: number,
                    mention: if mention.pronominal { PRONOMINAL } else { PROPER }.to_string(),
                },
            ));
        }

        Ok(annotations)
    }
}

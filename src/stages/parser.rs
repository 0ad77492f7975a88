/*!
 * Rule-based dependency parser.
 *
 * Each sentence gets one root: the first verb, otherwise the first noun,
 * otherwise its first token. Every other token attaches to a head chosen
 * from its coarse part of speech and position relative to the root.
 */

use super::{Annotator, StageParams};
use crate::document::{Annotation, AnnotationType, AnnotationValue, Document};
use crate::errors::{ConfigError, StageFailure};

/// Produces one dependency annotation per token.
#[derive(Debug, Clone, Default)]
pub struct DependencyParser;

/// A token of the sentence being parsed
#[derive(Debug, Clone, Copy)]
struct Node<'a> {
    begin: usize,
    end: usize,
    coarse: &'a str,
}

impl Node<'_> {
    fn is_nominal(&self) -> bool {
        matches!(self.coarse, "NOUN" | "PROPN" | "PRON" | "NUM")
    }
}

impl DependencyParser {
    pub const NAME: &'static str = "parser";

    pub fn new() -> Self {
        Self
    }

    pub fn from_params(params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        params.ensure_only(&[])?;
        Ok(Box::new(Self::new()))
    }

    fn root_index(nodes: &[Node<'_>]) -> usize {
        nodes
            .iter()
            .position(|n| n.coarse == "VERB")
            .or_else(|| nodes.iter().position(|n| n.coarse == "AUX"))
            .or_else(|| nodes.iter().position(|n| matches!(n.coarse, "NOUN" | "PROPN")))
            .unwrap_or(0)
    }

    /// Next nominal to the right of `index`, stopping at verbs and punctuation
    fn next_nominal(nodes: &[Node<'_>], index: usize) -> Option<usize> {
        for (offset, node) in nodes[index + 1..].iter().enumerate() {
            if matches!(node.coarse, "NOUN" | "PROPN" | "NUM" | "PRON") {
                return Some(index + 1 + offset);
            }
            if matches!(node.coarse, "VERB" | "AUX" | "PUNCT" | "CCONJ" | "SCONJ") {
                return None;
            }
        }
        None
    }

    /// Head index and relation of a non-root token
    fn attach(nodes: &[Node<'_>], index: usize, root: usize) -> (usize, &'static str) {
        let node = nodes[index];
        let before_root = index < root;

        match node.coarse {
            "PUNCT" | "SYM" => (root, "punct"),
            "DET" => (Self::next_nominal(nodes, index).unwrap_or(root), "det"),
            "ADJ" => match Self::next_nominal(nodes, index) {
                Some(head) => (head, "amod"),
                None => (root, "xcomp"),
            },
            "NUM" if nodes.get(index + 1).is_some_and(Node::is_nominal) => (index + 1, "nummod"),
            "ADP" | "PART" => match Self::next_nominal(nodes, index) {
                Some(head) => (head, "case"),
                None => (root, "mark"),
            },
            "AUX" => (root, "aux"),
            "ADV" => (root, "advmod"),
            "CCONJ" => (root, "cc"),
            "SCONJ" => (root, "mark"),
            "NOUN" | "PROPN" | "PRON" | "NUM" => {
                if nodes
                    .get(index + 1)
                    .is_some_and(|next| matches!(next.coarse, "NOUN" | "PROPN") && node.coarse != "PRON")
                {
                    (index + 1, "compound")
                } else if index > 0 && nodes[index - 1].coarse == "ADP" {
                    (root, "obl")
                } else if before_root {
                    (root, "nsubj")
                } else {
                    (root, "obj")
                }
            }
            "VERB" => (root, if before_root { "csubj" } else { "conj" }),
            _ => (root, "dep"),
        }
    }

    /// Dependencies for one sentence as (dependent, governor, relation)
    fn parse_sentence(nodes: &[Node<'_>]) -> Vec<(usize, usize, &'static str)> {
        if nodes.is_empty() {
            return Vec::new();
        }

        let root = Self::root_index(nodes);
        (0..nodes.len())
            .map(|index| {
                if index == root {
                    (index, index, "root")
                } else {
                    let (head, relation) = Self::attach(nodes, index, root);
                    (index, head, relation)
                }
            })
            .collect()
    }
}

impl Annotator for DependencyParser {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn requires(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Sentence, AnnotationType::Token, AnnotationType::PartOfSpeech]
    }

    fn produces(&self) -> &'static [AnnotationType] {
        &[AnnotationType::Dependency]
    }

    fn annotate(&self, document: &Document) -> Result<Vec<Annotation>, StageFailure> {
        let tags = super::coarse_tags(document);

        let mut annotations = Vec::new();
        for tokens in super::sentence_tokens(document) {
            let nodes: Vec<Node<'_>> = tokens
                .into_iter()
                .map(|token| -> Result<Node, StageFailure> {
                    let coarse = tags.get(&(token.begin, token.end)).copied().ok_or_else(|| {
                        StageFailure::Capability(format!(
                            "token [{}, {}) has no part-of-speech tag",
                            token.begin, token.end
                        ))
                    })?;
                    Ok(Node {
                        begin: token.begin,
                        end: token.end,
                        coarse,
                    })
                })
                .collect::<Result<_, StageFailure>>()?;

            for (dependent, governor, relation) in Self::parse_sentence(&nodes) {
                let dependent = nodes[dependent];
                let governor = nodes[governor];
                annotations.push(Annotation::new(
                    dependent.begin,
                    dependent.end,
                    AnnotationValue::Dependency {
                        relation: relation.to_string(),
                        governor_begin: governor.begin,
                        governor_end: governor.end,
                    },
                ));
            }
        }

        Ok(annotations)
    }
}

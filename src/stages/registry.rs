/*!
 * Stage registry.
 *
 * Maps stage names to constructors. The pipeline resolves its descriptors
 * against a registry once, when it is built.
 */

use std::collections::BTreeMap;

use log::debug;

use super::{
    Annotator, CoreferenceResolver, DependencyParser, Lemmatizer, NamedEntityRecognizer,
    ParagraphSplitter, PosTagger, Segmenter, StageParams,
};
use crate::errors::ConfigError;

/// Builds a stage from its parameters
pub type StageFactory = fn(&StageParams) -> Result<Box<dyn Annotator>, ConfigError>;

/// Name to constructor mapping for annotation stages.
#[derive(Clone)]
pub struct StageRegistry {
    factories: BTreeMap<String, StageFactory>,
}

impl StageRegistry {
    /// Registry with no stages
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with every built-in stage
    pub fn with_builtin() -> Self {
        let mut registry = Self::empty();
        registry.register(Segmenter::NAME, Segmenter::from_params);
        registry.register(ParagraphSplitter::NAME, ParagraphSplitter::from_params);
        registry.register(Lemmatizer::NAME, Lemmatizer::from_params);
        registry.register(PosTagger::NAME, PosTagger::from_params);
        registry.register(DependencyParser::NAME, DependencyParser::from_params);
        registry.register(NamedEntityRecognizer::NAME, NamedEntityRecognizer::from_params);
        registry.register(CoreferenceResolver::NAME, CoreferenceResolver::from_params);
        registry
    }

    /// Add or replace a stage constructor
    pub fn register(&mut self, name: &str, factory: StageFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Construct the stage registered under `params.stage()`
    pub fn create(&self, params: &StageParams) -> Result<Box<dyn Annotator>, ConfigError> {
        let factory = self
            .factories
            .get(params.stage())
            .ok_or_else(|| ConfigError::UnknownStage(params.stage().to_string()))?;

        debug!("Creating stage '{}'", params.stage());
        factory(params)
    }
}

impl Default for StageRegistry {
    fn default() -> Self {
        Self::with_builtin()
    }
}

use crate::{
    identity::ClassName,
    metadata::{ClassDefinition, MappingGraph},
    persistence::{PersistenceError, StorageEntityResolver},
};
use std::sync::Arc;

///
/// StorageProviderLoader
///
/// One storage provider's side of the boundary: assign storage entity and
/// per-property storage mappings to a class hierarchy, and build a validator
/// for the result. Implemented by the storage layer.
///

pub trait StorageProviderLoader {
    fn apply_persistence_model(
        &self,
        hierarchy: &[Arc<ClassDefinition>],
    ) -> Result<(), PersistenceError>;

    fn create_validator(
        &self,
        root: &Arc<ClassDefinition>,
    ) -> Result<Box<dyn PersistenceModelValidator>, PersistenceError>;
}

///
/// PersistenceModelValidator
///

pub trait PersistenceModelValidator {
    fn validate(&self) -> Result<(), PersistenceError>;
}

///
/// PersistenceModelLoader
///
/// The dispatcher the engine calls: expands the root into its class
/// hierarchy, resolves the owning provider, and delegates. Both operations
/// are pure delegation.
///

pub struct PersistenceModelLoader<'a> {
    graph: &'a MappingGraph,
    resolver: StorageEntityResolver,
}

impl<'a> PersistenceModelLoader<'a> {
    #[must_use]
    pub const fn new(graph: &'a MappingGraph, resolver: StorageEntityResolver) -> Self {
        Self { graph, resolver }
    }

    /// Assign storage mappings to `root` and every class derived from it.
    pub fn apply_persistence_model(&self, root: &ClassName) -> Result<(), PersistenceError> {
        let hierarchy = self.graph.class_hierarchy(root)?;
        let provider = self.resolver.provider_for(&hierarchy[0])?;

        provider.apply_persistence_model(&hierarchy)
    }

    /// A validator for `root`'s hierarchy, built by its provider.
    pub fn create_validator(
        &self,
        root: &ClassName,
    ) -> Result<Box<dyn PersistenceModelValidator>, PersistenceError> {
        let root_class = self.graph.try_class(root)?;
        let provider = self.resolver.provider_for(root_class)?;

        provider.create_validator(root_class)
    }
}

use crate::{
    metadata::ClassDefinition,
    persistence::{PersistenceError, StorageProviderLoader},
};
use std::{collections::HashMap, rc::Rc};

///
/// StorageEntityResolver
///
/// Maps a class's declared storage group to the provider that owns it. One
/// provider per group.
///

#[derive(Default)]
pub struct StorageEntityResolver {
    providers: HashMap<String, Rc<dyn StorageProviderLoader>>,
}

impl StorageEntityResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        group: impl Into<String>,
        provider: Rc<dyn StorageProviderLoader>,
    ) -> Result<(), PersistenceError> {
        let group = group.into();
        if self.providers.contains_key(&group) {
            return Err(PersistenceError::DuplicateStorageProvider { group });
        }

        self.providers.insert(group, provider);

        Ok(())
    }

    /// The provider owning `class`'s storage group.
    pub fn provider_for(
        &self,
        class: &ClassDefinition,
    ) -> Result<&Rc<dyn StorageProviderLoader>, PersistenceError> {
        let group = class
            .storage_group()
            .ok_or_else(|| PersistenceError::NoStorageGroup {
                class: class.name().clone(),
            })?;

        self.providers
            .get(group)
            .ok_or_else(|| PersistenceError::UnknownStorageProvider {
                group: group.to_string(),
            })
    }
}

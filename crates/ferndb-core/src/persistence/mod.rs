//! Module: persistence
//! Responsibility: the storage-provider boundary — resolve which provider
//! owns a class hierarchy's storage group and delegate persistence-model
//! assignment and validation to it. No mapping logic lives here.
//! Does not own: persisted layout, query execution, or container state.

pub mod loader;
pub mod resolver;

#[cfg(test)]
mod tests;

pub use loader::{PersistenceModelLoader, PersistenceModelValidator, StorageProviderLoader};
pub use resolver::StorageEntityResolver;

use crate::{error::ErrorClass, identity::ClassName, metadata::MetadataError};
use thiserror::Error as ThisError;

///
/// PersistenceError
///

#[derive(Debug, ThisError)]
pub enum PersistenceError {
    #[error("a storage provider is already registered for group '{group}'")]
    DuplicateStorageProvider { group: String },

    #[error("class '{class}' declares no storage group")]
    NoStorageGroup { class: ClassName },

    #[error("no storage provider is registered for group '{group}'")]
    UnknownStorageProvider { group: String },

    #[error("invalid persistence mapping for class '{class}': {message}")]
    InvalidMapping { class: ClassName, message: String },

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl PersistenceError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicateStorageProvider { .. } => ErrorClass::Conflict,
            Self::NoStorageGroup { .. } | Self::UnknownStorageProvider { .. } => {
                ErrorClass::NotFound
            }
            Self::InvalidMapping { .. } => ErrorClass::InvariantViolation,
            Self::Metadata(err) => err.class(),
        }
    }
}

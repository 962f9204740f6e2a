//! Module: collection
//! Responsibility: the data structure backing one-to-many relation
//! collections — a plain versioned store plus an ordered decorator pipeline.
//! Does not own: end-point lifecycle or fetch-result registration.
//!
//! Invariants:
//! - Items are unique by object id; order is significant.
//! - A mutating op fully succeeds or fully fails; backing structures never
//!   diverge.
//! - The version counter increments on every structural change; enumerators
//!   spanning a change fail instead of yielding stale elements.
//!
//! Pipeline order at association use sites: checking wraps eventing wraps the
//! plain store — argument checks run first, events fire only for operations
//! that will reach the store, read-only enforcement (where used) sits
//! outermost.

pub mod checked;
pub mod copy_on_write;
pub mod enumerator;
pub mod events;
pub mod plain;
pub mod read_only;

#[cfg(test)]
mod tests;

pub use checked::CheckedCollectionData;
pub use copy_on_write::CopyOnWriteCollectionData;
pub use enumerator::CollectionEnumerator;
pub use events::{
    ChangeKind, ChangePhase, CollectionChangeEvent, CollectionChangeSink,
    EventRaisingCollectionData,
};
pub use plain::PlainCollectionData;
pub use read_only::ReadOnlyCollectionData;

use crate::{
    error::ErrorClass,
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::{cell::RefCell, cmp::Ordering, rc::Rc};
use thiserror::Error as ThisError;

///
/// CollectionError
///

#[derive(Debug, ThisError)]
pub enum CollectionError {
    #[error("index {index} out of range for collection of {count} items")]
    IndexOutOfRange { index: usize, count: usize },

    #[error("collection already contains object '{id}'")]
    DuplicateObject { id: ObjectId },

    #[error("collection requires items of class '{expected}', got '{actual}' (object '{id}')")]
    WrongItemClass {
        expected: ClassName,
        actual: ClassName,
        id: ObjectId,
    },

    #[error(
        "object '{id}' is id-equal but not the instance held by the collection; refusing removal"
    )]
    InstanceMismatch { id: ObjectId },

    #[error("collection is read-only")]
    ReadOnly,

    #[error("collection was modified during enumeration (version {expected} -> {observed})")]
    ModifiedDuringEnumeration { expected: u64, observed: u64 },

    #[error("end point '{end_point}' has incomplete data; call mark_data_complete first")]
    DataIncomplete { end_point: String },
}

impl CollectionError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::IndexOutOfRange { .. } => ErrorClass::InvariantViolation,
            Self::DuplicateObject { .. } => ErrorClass::Conflict,
            Self::WrongItemClass { .. } | Self::InstanceMismatch { .. } => {
                ErrorClass::InvariantViolation
            }
            Self::ReadOnly | Self::DataIncomplete { .. } => ErrorClass::InvalidState,
            Self::ModifiedDuringEnumeration { .. } => ErrorClass::Conflict,
        }
    }
}

///
/// CollectionData
///
/// Base contract of the relation-collection pipeline. Accessors return
/// `Result` so lazy placeholders can fail loudly instead of silently
/// answering for data they do not have.
///

pub trait CollectionData {
    fn count(&self) -> usize;

    /// Monotonic counter; increments on every structural change.
    fn version(&self) -> u64;

    fn is_read_only(&self) -> bool {
        false
    }

    /// Item-class restriction, if any.
    fn required_item_class(&self) -> Option<ClassName>;

    /// The end point this data is associated with; stand-alone collections
    /// have none.
    fn associated_end_point(&self) -> Option<RelationEndPointId>;

    /// False only for lazy placeholders that have not been completed yet.
    fn is_data_complete(&self) -> bool {
        true
    }

    fn get(&self, index: usize) -> Result<ObjectHandle, CollectionError>;

    fn get_by_id(&self, id: &ObjectId) -> Result<Option<ObjectHandle>, CollectionError>;

    fn index_of(&self, id: &ObjectId) -> Result<Option<usize>, CollectionError>;

    fn contains(&self, id: &ObjectId) -> Result<bool, CollectionError>;

    fn insert(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError>;

    /// Remove by reference; `Ok(false)` when no item with that id is present.
    fn remove(&mut self, item: &ObjectHandle) -> Result<bool, CollectionError>;

    fn remove_by_id(&mut self, id: &ObjectId) -> Result<bool, CollectionError>;

    fn replace(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError>;

    fn sort_by(
        &mut self,
        compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError>;

    fn clear(&mut self) -> Result<(), CollectionError>;
}

/// Shared handle to a collection pipeline; the unit of work is
/// single-threaded, so `Rc<RefCell<_>>` is the sharing primitive.
pub type SharedCollectionData = Rc<RefCell<dyn CollectionData>>;

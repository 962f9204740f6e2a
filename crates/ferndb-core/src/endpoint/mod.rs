//! Module: endpoint
//! Responsibility: the virtual side of a relation — end points that start
//! incomplete and are explicitly transitioned to complete, plus the registry
//! that lazily materializes them per `(object, definition)` key.
//! Does not own: fetch-result grouping (fetch) or container lifecycle.
//!
//! Invariants:
//! - An end point is keyed by `RelationEndPointId`, never held as a
//!   back-pointer from the opposite side.
//! - Incomplete end points fail loudly on data access; they never fake an
//!   empty result.
//! - `mark_data_complete` is a one-way transition at this layer; re-marking
//!   errors here and is absorbed as a no-op one layer up, by the fetch
//!   registration agents.

pub mod collection;
pub mod object;
pub mod registry;


pub use collection::{CollectionEndPoint, IncompleteCollectionData};
pub use object::ObjectEndPoint;
pub use registry::EndPointRegistry;

use crate::{
    collection::CollectionError,
    error::ErrorClass,
    identity::ClassName,
    metadata::{MetadataError, RelationEndPointId},
};
use thiserror::Error as ThisError;

///
/// EndPointError
///

#[derive(Debug, ThisError)]
pub enum EndPointError {
    #[error("end point '{end_point}' is already marked complete")]
    AlreadyComplete { end_point: String },

    #[error("end point '{end_point}' has not been marked complete")]
    DataIncomplete { end_point: String },

    #[error("end point '{end_point}' is not a virtual end point")]
    NotVirtual { end_point: String },

    #[error("end point '{end_point}' holds {expected} objects, got '{actual}'")]
    WrongObjectClass {
        end_point: String,
        expected: ClassName,
        actual: ClassName,
    },

    #[error(transparent)]
    Collection(#[from] CollectionError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl EndPointError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyComplete { .. } | Self::DataIncomplete { .. } => ErrorClass::InvalidState,
            Self::NotVirtual { .. } | Self::WrongObjectClass { .. } => {
                ErrorClass::InvariantViolation
            }
            Self::Collection(err) => err.class(),
            Self::Metadata(err) => err.class(),
        }
    }
}

///
/// VirtualEndPoint
///
/// The two shapes a virtual relation side can take, as the registry hands
/// them out.
///

pub enum VirtualEndPoint {
    Object(ObjectEndPoint),
    Collection(CollectionEndPoint),
}

impl VirtualEndPoint {
    #[must_use]
    pub const fn id(&self) -> &RelationEndPointId {
        match self {
            Self::Object(end_point) => end_point.id(),
            Self::Collection(end_point) => end_point.id(),
        }
    }

    #[must_use]
    pub fn is_data_complete(&self) -> bool {
        match self {
            Self::Object(end_point) => end_point.is_data_complete(),
            Self::Collection(end_point) => end_point.is_data_complete(),
        }
    }

    #[must_use]
    pub const fn as_object(&self) -> Option<&ObjectEndPoint> {
        match self {
            Self::Object(end_point) => Some(end_point),
            Self::Collection(_) => None,
        }
    }

    #[must_use]
    pub const fn as_collection(&self) -> Option<&CollectionEndPoint> {
        match self {
            Self::Collection(end_point) => Some(end_point),
            Self::Object(_) => None,
        }
    }

    #[must_use]
    pub const fn as_object_mut(&mut self) -> Option<&mut ObjectEndPoint> {
        match self {
            Self::Object(end_point) => Some(end_point),
            Self::Collection(_) => None,
        }
    }

    #[must_use]
    pub const fn as_collection_mut(&mut self) -> Option<&mut CollectionEndPoint> {
        match self {
            Self::Collection(end_point) => Some(end_point),
            Self::Object(_) => None,
        }
    }
}

///
/// EndPointProvider
///
/// The surface a transaction exposes to collaborators that resolve relation
/// sides on demand, eager fetching included.
///

pub trait EndPointProvider {
    fn get_or_create_virtual_end_point(
        &mut self,
        id: &RelationEndPointId,
    ) -> Result<&mut VirtualEndPoint, EndPointError>;
}

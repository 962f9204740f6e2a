//! Module: metadata
//! Responsibility: immutable mapping facts — classes, properties, relations.
//! Does not own: property values, end-point state, or storage layout.
//!
//! Invariants:
//! - Definitions are published exactly once and frozen before use.
//! - A relation pairs exactly one real side with one virtual or anonymous side.
//! - Opposite sides are resolved by lookup, never by embedded back-pointers.

pub mod class;
pub mod graph;
pub mod property;
pub mod relation;


pub use class::ClassDefinition;
pub use graph::{MappingGraph, MappingGraphBuilder};
pub use property::{PropertyDefinition, PropertyType, StorageClass};
pub use relation::{
    EndPointCardinality, RelationDefinition, RelationEndPointDefinition, RelationEndPointId,
};

use crate::{
    error::ErrorClass,
    identity::{ClassName, PropertyName},
};
use thiserror::Error as ThisError;

///
/// MetadataError
///

#[derive(Debug, ThisError)]
pub enum MetadataError {
    #[error("class '{class}': {what} already published")]
    AlreadyPublished { class: ClassName, what: &'static str },

    #[error("class '{class}' is frozen; no further definition changes allowed")]
    Frozen { class: ClassName },

    #[error("class '{class}': {what} not published yet")]
    NotPublished { class: ClassName, what: &'static str },

    #[error("unknown class '{name}'")]
    UnknownClass { name: ClassName },

    #[error("class '{class}' has no property '{property}'")]
    UnknownProperty {
        class: ClassName,
        property: PropertyName,
    },

    #[error("duplicate class '{name}' in mapping graph")]
    DuplicateClass { name: ClassName },

    #[error("duplicate relation '{id}' in mapping graph")]
    DuplicateRelation { id: String },

    #[error("class '{class}' declares unknown base class '{base}'")]
    UnknownBase { class: ClassName, base: ClassName },

    #[error("class '{class}' sits on a cyclic base-class chain")]
    BaseCycle { class: ClassName },

    #[error("relation '{id}': {message}")]
    RelationShape { id: String, message: String },

    #[error(
        "end point '{end_point}' is not part of any relation in the mapping graph"
    )]
    NoSuchEndPoint { end_point: String },

    #[error("an anonymous end point cannot anchor a RelationEndPointId (class '{class}')")]
    AnonymousEndPointId { class: ClassName },
}

impl MetadataError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::UnknownClass { .. }
            | Self::UnknownProperty { .. }
            | Self::NoSuchEndPoint { .. } => ErrorClass::NotFound,
            Self::DuplicateClass { .. } | Self::DuplicateRelation { .. } => ErrorClass::Conflict,
            Self::AlreadyPublished { .. } | Self::Frozen { .. } | Self::NotPublished { .. } => {
                ErrorClass::InvalidState
            }
            Self::RelationShape { .. }
            | Self::AnonymousEndPointId { .. }
            | Self::UnknownBase { .. }
            | Self::BaseCycle { .. } => ErrorClass::InvariantViolation,
        }
    }
}

//! Core runtime for FernDB: the transactional unit of work over a persistent
//! object graph — change-tracked containers, relation collections, virtual
//! end points, eager fetching, and the storage-provider boundary.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod collection;
pub mod container;
pub mod endpoint;
pub mod error;
pub mod fetch;
pub mod identity;
pub mod metadata;
pub mod object;
pub mod persistence;
pub mod uow;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        container::{ContainerState, DataContainer, ValueAccess},
        identity::{ClassName, ObjectId, ObjectKey, PropertyName},
        metadata::{MappingGraph, RelationEndPointId},
        object::ObjectHandle,
        uow::UnitOfWork,
        value::Value,
    };
}

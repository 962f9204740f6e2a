//! Module: fetch
//! Responsibility: eager relation fetching — secondary ("fetch") queries per
//! relation end point, grouping of the fetched rows by foreign key, and
//! registration of the grouped results on virtual end points.
//! Does not own: query execution (injected) or end-point storage (provider).
//!
//! Invariants:
//! - One level of fetch depth per invocation; nested fetch instructions are
//!   carried but never recursed into here.
//! - A query executes at most once per invocation; repeated end points reuse
//!   the cached result rows.
//! - Registration failures wrap the original cause, abort the failing end
//!   point, and leave end points registered by earlier pairs standing.

pub mod agent;
pub mod fetcher;
pub mod query;
pub mod source;
pub mod trace;


pub use agent::{
    RealObjectRegistrationAgent, RelationDataRegistrationAgent, VirtualCollectionRegistrationAgent,
    VirtualObjectRegistrationAgent,
};
pub use fetcher::EagerFetcher;
pub use query::{EagerFetchQueryCollection, FetchQuery, FetchQueryExecutor, QueryId};
pub use source::{DataSourceRecord, LoadedObjectWithSource};
pub use trace::{FetchTraceEvent, FetchTraceSink};

use crate::{
    endpoint::EndPointError,
    error::ErrorClass,
    identity::{ClassName, ObjectId},
    metadata::MetadataError,
};
use thiserror::Error as ThisError;

///
/// FetchError
///

#[derive(Debug, ThisError)]
pub enum FetchError {
    #[error("a fetch query is already registered for end point '{end_point}'")]
    DuplicateFetchQuery { end_point: String },

    #[error(
        "objects {first} and {second} both reference {object} through 1:1 end point '{end_point}'"
    )]
    DuplicateForeignKey {
        end_point: String,
        object: ObjectId,
        first: ObjectId,
        second: ObjectId,
    },

    #[error("mandatory end point '{end_point}' of {object} matched no fetched objects")]
    MandatoryRelationViolation { end_point: String, object: ObjectId },

    #[error("end point '{end_point}' relates {expected} objects, fetched '{actual}'")]
    WrongRelatedClass {
        end_point: String,
        expected: ClassName,
        actual: ClassName,
    },

    #[error("end point '{end_point}' resolved to an end point of the other cardinality")]
    WrongEndPointShape { end_point: String },

    #[error("fetch query '{query}' failed: {message}")]
    QueryExecution { query: QueryId, message: String },

    #[error("unexpected query result at end point '{end_point}'")]
    UnexpectedQueryResult {
        end_point: String,
        #[source]
        cause: Box<FetchError>,
    },

    #[error(transparent)]
    EndPoint(#[from] EndPointError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

impl FetchError {
    // Not const: classifying a wrapped cause dereferences the box.
    pub(crate) fn class(&self) -> ErrorClass {
        match self {
            Self::DuplicateFetchQuery { .. } => ErrorClass::Conflict,
            Self::DuplicateForeignKey { .. }
            | Self::MandatoryRelationViolation { .. }
            | Self::WrongRelatedClass { .. } => ErrorClass::InvariantViolation,
            Self::WrongEndPointShape { .. } | Self::QueryExecution { .. } => ErrorClass::Internal,
            Self::UnexpectedQueryResult { cause, .. } => cause.class(),
            Self::EndPoint(err) => err.class(),
            Self::Metadata(err) => err.class(),
        }
    }
}

use crate::{
    fetch::{FetchError, LoadedObjectWithSource},
    metadata::RelationEndPointDefinition,
};
use serde::{Deserialize, Serialize};
use std::{fmt, sync::Arc};

///
/// QueryId
///
/// Caller-assigned identifier of one fetch query, the key under which an
/// invocation caches that query's result rows.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct QueryId(String);

impl QueryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

///
/// FetchQuery
///
/// A secondary query that loads the related side of one relation end point.
/// May carry its own nested eager-fetch instructions; those are opaque to a
/// single fetch pass and only processed if the owning transaction iterates.
///

pub struct FetchQuery {
    id: QueryId,
    statement: String,
    nested: EagerFetchQueryCollection,
}

impl FetchQuery {
    #[must_use]
    pub fn new(id: QueryId, statement: impl Into<String>) -> Self {
        Self {
            id,
            statement: statement.into(),
            nested: EagerFetchQueryCollection::new(),
        }
    }

    #[must_use]
    pub fn with_nested(mut self, nested: EagerFetchQueryCollection) -> Self {
        self.nested = nested;
        self
    }

    #[must_use]
    pub const fn id(&self) -> &QueryId {
        &self.id
    }

    #[must_use]
    pub fn statement(&self) -> &str {
        &self.statement
    }

    #[must_use]
    pub const fn nested(&self) -> &EagerFetchQueryCollection {
        &self.nested
    }
}

///
/// FetchQueryExecutor
///
/// The query-execution boundary. Implemented by the storage layer; the
/// fetcher only sees ordered result rows.
///

pub trait FetchQueryExecutor {
    fn execute(&mut self, query: &FetchQuery) -> Result<Vec<LoadedObjectWithSource>, FetchError>;
}

///
/// EagerFetchQueryCollection
///
/// The end-point-definition → fetch-query mapping one fetch pass works
/// through, in registration order. At most one query per definition.
///

#[derive(Default)]
pub struct EagerFetchQueryCollection {
    entries: Vec<(Arc<RelationEndPointDefinition>, FetchQuery)>,
}

impl EagerFetchQueryCollection {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(
        &mut self,
        definition: Arc<RelationEndPointDefinition>,
        query: FetchQuery,
    ) -> Result<(), FetchError> {
        if self.entries.iter().any(|(held, _)| *held == definition) {
            return Err(FetchError::DuplicateFetchQuery {
                end_point: definition.to_string(),
            });
        }

        self.entries.push((definition, query));

        Ok(())
    }

    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&Arc<RelationEndPointDefinition>, &FetchQuery)> {
        self.entries
            .iter()
            .map(|(definition, query)| (definition, query))
    }
}

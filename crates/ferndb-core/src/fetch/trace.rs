//! Fetch tracing boundary.
//!
//! Tracing is optional, injected by the caller, and must not affect fetch
//! semantics.

use crate::fetch::QueryId;

///
/// FetchTraceSink
///

pub trait FetchTraceSink {
    fn on_event(&self, event: FetchTraceEvent);
}

///
/// FetchTraceEvent
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FetchTraceEvent {
    QueryExecuted {
        query: QueryId,
        rows: usize,
        cache_hit: bool,
    },
    EndPointRegistered {
        end_point: String,
        originators: usize,
    },
}

use crate::{
    endpoint::EndPointProvider,
    fetch::{
        EagerFetchQueryCollection, FetchError, FetchQueryExecutor, FetchTraceEvent,
        FetchTraceSink, LoadedObjectWithSource, QueryId, RealObjectRegistrationAgent,
        RelationDataRegistrationAgent, VirtualCollectionRegistrationAgent,
        VirtualObjectRegistrationAgent,
    },
    metadata::{MappingGraph, MetadataError, RelationEndPointDefinition},
    object::ObjectHandle,
};
use std::{collections::HashMap, rc::Rc, sync::Arc};

///
/// EagerFetcher
///
/// Works through an end-point-definition → fetch-query mapping for one set
/// of originating objects: executes (or reuses) each query, dispatches the
/// rows to the registration agent matching the end point's virtuality and
/// cardinality, and wraps registration failures with the failing end point.
///

pub struct EagerFetcher<'a> {
    graph: &'a MappingGraph,
    trace: Option<&'a dyn FetchTraceSink>,
}

impl<'a> EagerFetcher<'a> {
    #[must_use]
    pub const fn new(graph: &'a MappingGraph) -> Self {
        Self { graph, trace: None }
    }

    #[must_use]
    pub const fn with_trace(mut self, trace: &'a dyn FetchTraceSink) -> Self {
        self.trace = Some(trace);
        self
    }

    /// One fetch pass. Queries execute at most once each; nested fetch
    /// instructions on the secondary queries are not recursed into.
    pub fn perform(
        &self,
        originators: &[Option<ObjectHandle>],
        queries: &EagerFetchQueryCollection,
        executor: &mut dyn FetchQueryExecutor,
        provider: &mut dyn EndPointProvider,
    ) -> Result<(), FetchError> {
        let mut cache: HashMap<QueryId, Rc<Vec<LoadedObjectWithSource>>> = HashMap::new();

        for (definition, query) in queries.iter() {
            let fetched = if let Some(rows) = cache.get(query.id()) {
                self.emit(FetchTraceEvent::QueryExecuted {
                    query: query.id().clone(),
                    rows: rows.len(),
                    cache_hit: true,
                });
                Rc::clone(rows)
            } else {
                let rows = Rc::new(executor.execute(query)?);
                self.emit(FetchTraceEvent::QueryExecuted {
                    query: query.id().clone(),
                    rows: rows.len(),
                    cache_hit: false,
                });
                cache.insert(query.id().clone(), Rc::clone(&rows));
                rows
            };

            let agent = Self::agent_for(definition)?;
            if let Err(cause) = agent.register(definition, originators, &fetched, self.graph, provider)
            {
                return Err(FetchError::UnexpectedQueryResult {
                    end_point: definition.to_string(),
                    cause: Box::new(cause),
                });
            }

            self.emit(FetchTraceEvent::EndPointRegistered {
                end_point: definition.to_string(),
                originators: originators.iter().flatten().count(),
            });
        }

        Ok(())
    }

    fn agent_for(
        definition: &Arc<RelationEndPointDefinition>,
    ) -> Result<&'static dyn RelationDataRegistrationAgent, FetchError> {
        match definition.as_ref() {
            RelationEndPointDefinition::Real { .. } => Ok(&RealObjectRegistrationAgent),
            RelationEndPointDefinition::VirtualObject { .. } => {
                Ok(&VirtualObjectRegistrationAgent)
            }
            RelationEndPointDefinition::VirtualCollection { .. } => {
                Ok(&VirtualCollectionRegistrationAgent)
            }
            RelationEndPointDefinition::Anonymous { class } => Err(MetadataError::AnonymousEndPointId {
                class: class.clone(),
            }
            .into()),
        }
    }

    fn emit(&self, event: FetchTraceEvent) {
        if let Some(trace) = self.trace {
            trace.on_event(event);
        }
    }
}

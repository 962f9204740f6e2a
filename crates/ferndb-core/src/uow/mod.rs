//! Module: uow
//! Responsibility: the unit of work — one logical transaction's tracked
//! containers, its virtual end points, and the storage adapter that lazily
//! materializes placeholders on first data access.
//! Does not own: persisted layout or query planning; both sit behind the
//! adapter and executor seams.
//!
//! Invariants:
//! - One container per object id; creation conflicts are rejected.
//! - Lazy materialization is transparent: a data access on a `NotLoadedYet`
//!   container loads it first, and a miss invalidates it.
//! - `commit` and `rollback` sweep every loaded container and purge the
//!   containers that ended up `Invalid`.

#[cfg(test)]
mod tests;

use crate::{
    container::{ContainerState, DataContainer, ValueAccess},
    endpoint::{EndPointError, EndPointProvider, EndPointRegistry, VirtualEndPoint},
    error::{EngineError, ErrorClass, ErrorOrigin},
    fetch::{DataSourceRecord, EagerFetchQueryCollection, EagerFetcher, FetchQueryExecutor},
    identity::{ClassName, ObjectId, ObjectKey, PropertyName},
    metadata::{MappingGraph, RelationEndPointId},
    object::ObjectHandle,
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};

///
/// StorageAdapter
///
/// The load side of the storage boundary: fetch the raw record one object
/// was persisted as, or `None` when it does not exist.
///

pub trait StorageAdapter {
    fn load_record(&mut self, id: &ObjectId) -> Result<Option<DataSourceRecord>, EngineError>;
}

///
/// UnitOfWork
///
/// One transaction's object graph: containers keyed by object id plus the
/// registry of virtual end points resolved during the transaction. All
/// mutation runs on the owning transaction's call stack; there is no
/// internal locking.
///

pub struct UnitOfWork {
    graph: Arc<MappingGraph>,
    adapter: Box<dyn StorageAdapter>,
    containers: BTreeMap<ObjectId, DataContainer>,
    end_points: EndPointRegistry,
}

impl UnitOfWork {
    #[must_use]
    pub fn new(graph: Arc<MappingGraph>, adapter: Box<dyn StorageAdapter>) -> Self {
        let end_points = EndPointRegistry::new(Arc::clone(&graph));

        Self {
            graph,
            adapter,
            containers: BTreeMap::new(),
            end_points,
        }
    }

    #[must_use]
    pub fn graph(&self) -> &MappingGraph {
        &self.graph
    }

    #[must_use]
    pub fn tracked_count(&self) -> usize {
        self.containers.len()
    }

    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.containers.contains_key(id)
    }

    /// Track a freshly created object. Every slot starts at its declared
    /// default and the container is `New`.
    pub fn new_object(
        &mut self,
        class: &ClassName,
        key: ObjectKey,
    ) -> Result<ObjectHandle, EngineError> {
        let definition = self.graph.try_class(class)?;
        let id = ObjectId::new(class.clone(), key);
        if self.containers.contains_key(&id) {
            return Err(EngineError::new(
                ErrorClass::Conflict,
                ErrorOrigin::Transaction,
                format!("object {id} is already tracked"),
            ));
        }

        let container = DataContainer::new_for_new_object(id.clone(), Arc::clone(definition))?;
        self.containers.insert(id.clone(), container);

        Ok(ObjectHandle::new(id))
    }

    /// Track an object known by id only. Idempotent; the placeholder
    /// materializes on first data access.
    pub fn register_loaded(&mut self, id: ObjectId) -> Result<ObjectHandle, EngineError> {
        if !self.containers.contains_key(&id) {
            let definition = self.graph.try_class(id.class())?;
            let container = DataContainer::new_not_loaded_yet(id.clone(), Arc::clone(definition));
            self.containers.insert(id.clone(), container);
        }

        Ok(ObjectHandle::new(id))
    }

    pub fn state(&self, id: &ObjectId) -> Result<ContainerState, EngineError> {
        Ok(self.container(id)?.state())
    }

    /// Current or original value of one property, loading the container
    /// first if it is still a placeholder.
    pub fn get_value(
        &mut self,
        id: &ObjectId,
        property: &PropertyName,
        access: ValueAccess,
    ) -> Result<Value, EngineError> {
        let container = self.loaded_container_mut(id)?;

        Ok(container.get_value(property, access)?.clone())
    }

    pub fn set_value(
        &mut self,
        id: &ObjectId,
        property: &PropertyName,
        value: Value,
    ) -> Result<(), EngineError> {
        let container = self.loaded_container_mut(id)?;
        container.set_value(property, value)?;

        Ok(())
    }

    /// Mark one object deleted. A `New` object is discarded instead.
    pub fn delete(&mut self, id: &ObjectId) -> Result<(), EngineError> {
        let container = self.loaded_container_mut(id)?;
        container.delete()?;

        Ok(())
    }

    /// End of transaction: every loaded container commits, deletions become
    /// final, and the invalidated containers leave the unit of work.
    /// Untouched placeholders stay tracked, still unloaded.
    pub fn commit(&mut self) -> Result<(), EngineError> {
        for container in self.containers.values_mut() {
            let state = container.state();
            if state.is_not_loaded_yet() || state.is_invalid() {
                continue;
            }
            container.commit()?;
        }
        self.purge_invalid();

        Ok(())
    }

    /// Revert every loaded container to its original values. `New` objects
    /// are discarded; deletions are undone.
    pub fn rollback(&mut self) -> Result<(), EngineError> {
        for container in self.containers.values_mut() {
            let state = container.state();
            if state.is_not_loaded_yet() || state.is_invalid() {
                continue;
            }
            container.rollback()?;
        }
        self.purge_invalid();

        Ok(())
    }

    /// Point-in-time read-only view over the loaded containers, placeholders
    /// and invalidated entries excluded.
    pub fn loaded_containers(&self) -> impl Iterator<Item = &DataContainer> {
        self.containers
            .values()
            .filter(|container| container.state().is_loaded())
    }

    /// The virtual end point for `id`, created on first request.
    pub fn virtual_end_point(
        &mut self,
        id: &RelationEndPointId,
    ) -> Result<&mut VirtualEndPoint, EngineError> {
        Ok(self.end_points.get_or_create(id)?)
    }

    /// One eager-fetch pass over this transaction's end-point registry.
    pub fn eager_fetch(
        &mut self,
        originators: &[Option<ObjectHandle>],
        queries: &EagerFetchQueryCollection,
        executor: &mut dyn FetchQueryExecutor,
    ) -> Result<(), EngineError> {
        EagerFetcher::new(&self.graph).perform(
            originators,
            queries,
            executor,
            &mut self.end_points,
        )?;

        Ok(())
    }

    fn container(&self, id: &ObjectId) -> Result<&DataContainer, EngineError> {
        self.containers
            .get(id)
            .ok_or_else(|| EngineError::object_not_found(id))
    }

    fn loaded_container_mut(&mut self, id: &ObjectId) -> Result<&mut DataContainer, EngineError> {
        let container = self
            .containers
            .get_mut(id)
            .ok_or_else(|| EngineError::object_not_found(id))?;

        if container.state().is_not_loaded_yet() {
            match self.adapter.load_record(container.id())? {
                Some(record) => container.materialize(record.into_values())?,
                None => container.materialize_not_found()?,
            }
        }

        Ok(container)
    }

    fn purge_invalid(&mut self) {
        self.containers
            .retain(|_, container| !container.state().is_invalid());
    }
}

impl EndPointProvider for UnitOfWork {
    fn get_or_create_virtual_end_point(
        &mut self,
        id: &RelationEndPointId,
    ) -> Result<&mut VirtualEndPoint, EndPointError> {
        self.end_points.get_or_create(id)
    }
}

use crate::{
    endpoint::{
        CollectionEndPoint, EndPointError, EndPointProvider, ObjectEndPoint, VirtualEndPoint,
    },
    metadata::{EndPointCardinality, MappingGraph, RelationEndPointId},
};
use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

///
/// EndPointRegistry
///
/// Lazily materializes virtual end points, one per `(object, definition)`
/// key, and hands out the same entry on every subsequent lookup. The
/// opposite real side is resolved through the mapping graph at creation
/// time, never stored as a back-pointer.
///

pub struct EndPointRegistry {
    graph: Arc<MappingGraph>,
    entries: HashMap<RelationEndPointId, VirtualEndPoint>,
}

impl EndPointRegistry {
    #[must_use]
    pub fn new(graph: Arc<MappingGraph>) -> Self {
        Self {
            graph,
            entries: HashMap::new(),
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

    #[must_use]
    pub fn get(&self, id: &RelationEndPointId) -> Option<&VirtualEndPoint> {
        self.entries.get(id)
    }

    pub fn get_or_create(
        &mut self,
        id: &RelationEndPointId,
    ) -> Result<&mut VirtualEndPoint, EndPointError> {
        if !id.definition().is_virtual() {
            return Err(EndPointError::NotVirtual {
                end_point: id.to_string(),
            });
        }

        match self.entries.entry(id.clone()) {
            Entry::Occupied(occupied) => Ok(occupied.into_mut()),
            Entry::Vacant(vacant) => {
                let end_point = Self::create(&self.graph, id)?;

                Ok(vacant.insert(end_point))
            }
        }
    }

    fn create(
        graph: &MappingGraph,
        id: &RelationEndPointId,
    ) -> Result<VirtualEndPoint, EndPointError> {
        let opposite = graph.opposite(id.definition())?;
        let item_class = opposite.class_name().clone();

        let end_point = match id.definition().cardinality() {
            EndPointCardinality::One => {
                VirtualEndPoint::Object(ObjectEndPoint::new(id.clone(), item_class))
            }
            EndPointCardinality::Many => {
                VirtualEndPoint::Collection(CollectionEndPoint::new(id.clone(), item_class))
            }
        };

        Ok(end_point)
    }
}

impl EndPointProvider for EndPointRegistry {
    fn get_or_create_virtual_end_point(
        &mut self,
        id: &RelationEndPointId,
    ) -> Result<&mut VirtualEndPoint, EndPointError> {
        self.get_or_create(id)
    }
}

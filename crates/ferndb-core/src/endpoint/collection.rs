use crate::{
    collection::{
        CheckedCollectionData, CollectionData, CollectionError, EventRaisingCollectionData,
        PlainCollectionData, SharedCollectionData,
    },
    endpoint::EndPointError,
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::{cell::RefCell, cmp::Ordering, rc::Rc};

///
/// IncompleteCollectionData
///
/// The sentinel a collection-valued end point hands out before its data has
/// been supplied. Reports zero items and `is_data_complete() == false`;
/// every accessor and mutator fails loudly instead of faking an empty
/// collection, so a caller that skipped the completeness check surfaces
/// immediately.
///

pub struct IncompleteCollectionData {
    end_point: RelationEndPointId,
}

impl IncompleteCollectionData {
    #[must_use]
    pub const fn new(end_point: RelationEndPointId) -> Self {
        Self { end_point }
    }

    fn incomplete(&self) -> CollectionError {
        CollectionError::DataIncomplete {
            end_point: self.end_point.to_string(),
        }
    }
}

impl CollectionData for IncompleteCollectionData {
    fn count(&self) -> usize {
        0
    }

    fn version(&self) -> u64 {
        0
    }

    fn required_item_class(&self) -> Option<ClassName> {
        None
    }

    fn associated_end_point(&self) -> Option<RelationEndPointId> {
        Some(self.end_point.clone())
    }

    fn is_data_complete(&self) -> bool {
        false
    }

    fn get(&self, _index: usize) -> Result<ObjectHandle, CollectionError> {
        Err(self.incomplete())
    }

    fn get_by_id(&self, _id: &ObjectId) -> Result<Option<ObjectHandle>, CollectionError> {
        Err(self.incomplete())
    }

    fn index_of(&self, _id: &ObjectId) -> Result<Option<usize>, CollectionError> {
        Err(self.incomplete())
    }

    fn contains(&self, _id: &ObjectId) -> Result<bool, CollectionError> {
        Err(self.incomplete())
    }

    fn insert(&mut self, _index: usize, _item: ObjectHandle) -> Result<(), CollectionError> {
        Err(self.incomplete())
    }

    fn remove(&mut self, _item: &ObjectHandle) -> Result<bool, CollectionError> {
        Err(self.incomplete())
    }

    fn remove_by_id(&mut self, _id: &ObjectId) -> Result<bool, CollectionError> {
        Err(self.incomplete())
    }

    fn replace(&mut self, _index: usize, _item: ObjectHandle) -> Result<(), CollectionError> {
        Err(self.incomplete())
    }

    fn sort_by(
        &mut self,
        _compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError> {
        Err(self.incomplete())
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        Err(self.incomplete())
    }
}

///
/// CollectionEndPoint
///
/// The collection-valued (1:N) virtual side of a relation. Hands out the
/// incomplete sentinel until `mark_data_complete` supplies the item set, at
/// which point the data becomes a checked, event-raising store and further
/// mutation follows the standard pipeline.
///

pub struct CollectionEndPoint {
    id: RelationEndPointId,
    item_class: ClassName,
    data: SharedCollectionData,
}

impl CollectionEndPoint {
    #[must_use]
    pub fn new(id: RelationEndPointId, item_class: ClassName) -> Self {
        let sentinel = IncompleteCollectionData::new(id.clone());

        Self {
            id,
            item_class,
            data: Rc::new(RefCell::new(sentinel)),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &RelationEndPointId {
        &self.id
    }

    #[must_use]
    pub const fn item_class(&self) -> &ClassName {
        &self.item_class
    }

    #[must_use]
    pub fn is_data_complete(&self) -> bool {
        self.data.borrow().is_data_complete()
    }

    /// The current data object: the incomplete sentinel before completion,
    /// the pipeline afterwards. Handles taken before completion keep the
    /// sentinel, so stale holders fail loudly rather than read nothing.
    #[must_use]
    pub fn data(&self) -> SharedCollectionData {
        Rc::clone(&self.data)
    }

    /// Transition to complete with the supplied items, preserving their
    /// order. Errors if already complete or if an item fails the pipeline's
    /// class and uniqueness checks.
    pub fn mark_data_complete(&mut self, items: Vec<ObjectHandle>) -> Result<(), EndPointError> {
        if self.is_data_complete() {
            return Err(EndPointError::AlreadyComplete {
                end_point: self.id.to_string(),
            });
        }

        let store = PlainCollectionData::for_end_point(self.id.clone(), self.item_class.clone());
        let mut pipeline = CheckedCollectionData::new(Box::new(EventRaisingCollectionData::new(
            Box::new(store),
        )));
        for item in items {
            pipeline.insert(pipeline.count(), item)?;
        }

        self.data = Rc::new(RefCell::new(pipeline));

        Ok(())
    }
}

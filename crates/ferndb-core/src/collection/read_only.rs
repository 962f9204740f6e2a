use crate::{
    collection::{CollectionData, CollectionError, SharedCollectionData},
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::cmp::Ordering;

///
/// ReadOnlyCollectionData
///
/// Safe view over a shared collection: reads delegate, every mutator fails
/// with [`CollectionError::ReadOnly`]. Used to expose association contents to
/// external collaborators without handing out mutation rights.
///

pub struct ReadOnlyCollectionData {
    inner: SharedCollectionData,
}

impl ReadOnlyCollectionData {
    #[must_use]
    pub const fn new(inner: SharedCollectionData) -> Self {
        Self { inner }
    }
}

impl CollectionData for ReadOnlyCollectionData {
    fn count(&self) -> usize {
        self.inner.borrow().count()
    }

    fn version(&self) -> u64 {
        self.inner.borrow().version()
    }

    fn is_read_only(&self) -> bool {
        true
    }

    fn required_item_class(&self) -> Option<ClassName> {
        self.inner.borrow().required_item_class()
    }

    fn associated_end_point(&self) -> Option<RelationEndPointId> {
        self.inner.borrow().associated_end_point()
    }

    fn is_data_complete(&self) -> bool {
        self.inner.borrow().is_data_complete()
    }

    fn get(&self, index: usize) -> Result<ObjectHandle, CollectionError> {
        self.inner.borrow().get(index)
    }

    fn get_by_id(&self, id: &ObjectId) -> Result<Option<ObjectHandle>, CollectionError> {
        self.inner.borrow().get_by_id(id)
    }

    fn index_of(&self, id: &ObjectId) -> Result<Option<usize>, CollectionError> {
        self.inner.borrow().index_of(id)
    }

    fn contains(&self, id: &ObjectId) -> Result<bool, CollectionError> {
        self.inner.borrow().contains(id)
    }

    fn insert(&mut self, _index: usize, _item: ObjectHandle) -> Result<(), CollectionError> {
        Err(CollectionError::ReadOnly)
    }

    fn remove(&mut self, _item: &ObjectHandle) -> Result<bool, CollectionError> {
        Err(CollectionError::ReadOnly)
    }

    fn remove_by_id(&mut self, _id: &ObjectId) -> Result<bool, CollectionError> {
        Err(CollectionError::ReadOnly)
    }

    fn replace(&mut self, _index: usize, _item: ObjectHandle) -> Result<(), CollectionError> {
        Err(CollectionError::ReadOnly)
    }

    fn sort_by(
        &mut self,
        _compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError> {
        Err(CollectionError::ReadOnly)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        Err(CollectionError::ReadOnly)
    }
}

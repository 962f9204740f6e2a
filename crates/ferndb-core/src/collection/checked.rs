use crate::{
    collection::{CollectionData, CollectionError},
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::cmp::Ordering;

///
/// CheckedCollectionData
///
/// Modification-checking decorator. Rejects wrong-class items and removals
/// through an id-equal but distinct reference before the operation reaches
/// the inner pipeline; duplicate-id and index checks are enforced by the
/// plain store and surface unchanged. Sits outside the event-raising layer so
/// rejected operations raise no events.
///

pub struct CheckedCollectionData {
    inner: Box<dyn CollectionData>,
}

impl CheckedCollectionData {
    #[must_use]
    pub fn new(inner: Box<dyn CollectionData>) -> Self {
        Self { inner }
    }

    fn check_item_class(&self, item: &ObjectHandle) -> Result<(), CollectionError> {
        let Some(expected) = self.inner.required_item_class() else {
            return Ok(());
        };

        if item.id().class() == &expected {
            return Ok(());
        }

        Err(CollectionError::WrongItemClass {
            expected,
            actual: item.id().class().clone(),
            id: item.id().clone(),
        })
    }
}

impl CollectionData for CheckedCollectionData {
    fn count(&self) -> usize {
        self.inner.count()
    }

    fn version(&self) -> u64 {
        self.inner.version()
    }

    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }

    fn required_item_class(&self) -> Option<ClassName> {
        self.inner.required_item_class()
    }

    fn associated_end_point(&self) -> Option<RelationEndPointId> {
        self.inner.associated_end_point()
    }

    fn is_data_complete(&self) -> bool {
        self.inner.is_data_complete()
    }

    fn get(&self, index: usize) -> Result<ObjectHandle, CollectionError> {
        self.inner.get(index)
    }

    fn get_by_id(&self, id: &ObjectId) -> Result<Option<ObjectHandle>, CollectionError> {
        self.inner.get_by_id(id)
    }

    fn index_of(&self, id: &ObjectId) -> Result<Option<usize>, CollectionError> {
        self.inner.index_of(id)
    }

    fn contains(&self, id: &ObjectId) -> Result<bool, CollectionError> {
        self.inner.contains(id)
    }

    fn insert(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        self.check_item_class(&item)?;

        self.inner.insert(index, item)
    }

    fn remove(&mut self, item: &ObjectHandle) -> Result<bool, CollectionError> {
        // Removing a reference that is id-equal but not the stored instance
        // would silently detach the wrong object.
        if let Some(stored) = self.inner.get_by_id(item.id())? {
            if !stored.same_instance(item) {
                return Err(CollectionError::InstanceMismatch {
                    id: item.id().clone(),
                });
            }
        }

        self.inner.remove(item)
    }

    fn remove_by_id(&mut self, id: &ObjectId) -> Result<bool, CollectionError> {
        self.inner.remove_by_id(id)
    }

    fn replace(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        self.check_item_class(&item)?;

        self.inner.replace(index, item)
    }

    fn sort_by(
        &mut self,
        compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError> {
        self.inner.sort_by(compare)
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.inner.clear()
    }
}

use crate::{
    collection::{CollectionData, CollectionError},
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::{cmp::Ordering, collections::HashMap};

///
/// PlainCollectionData
///
/// The innermost store: an ordered id list plus an id→handle map. Every
/// mutating op validates its arguments completely before touching either
/// backing structure, so a failing call leaves both untouched. The version
/// counter increments on every structural change.
///

#[derive(Debug, Default)]
pub struct PlainCollectionData {
    order: Vec<ObjectId>,
    items: HashMap<ObjectId, ObjectHandle>,
    version: u64,
    required_class: Option<ClassName>,
    end_point: Option<RelationEndPointId>,
}

impl PlainCollectionData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store for an association: carries the end-point id and the item-class
    /// restriction of the relation.
    #[must_use]
    pub fn for_end_point(end_point: RelationEndPointId, required_class: ClassName) -> Self {
        Self {
            required_class: Some(required_class),
            end_point: Some(end_point),
            ..Self::default()
        }
    }

    /// Stand-alone store restricted to one item class.
    #[must_use]
    pub fn with_required_class(required_class: ClassName) -> Self {
        Self {
            required_class: Some(required_class),
            ..Self::default()
        }
    }

    /// Stand-alone copy of another collection's current contents. Preserves
    /// the source's version so enumerators keep their frame of reference, and
    /// the item-class restriction; drops the end-point association.
    pub fn snapshot_of(source: &dyn CollectionData) -> Result<Self, CollectionError> {
        let mut copy = Self {
            required_class: source.required_item_class(),
            version: source.version(),
            ..Self::default()
        };

        for index in 0..source.count() {
            let item = source.get(index)?;
            copy.order.push(item.id().clone());
            copy.items.insert(item.id().clone(), item);
        }

        Ok(copy)
    }

    fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl CollectionData for PlainCollectionData {
    fn count(&self) -> usize {
        self.order.len()
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn required_item_class(&self) -> Option<ClassName> {
        self.required_class.clone()
    }

    fn associated_end_point(&self) -> Option<RelationEndPointId> {
        self.end_point.clone()
    }

    fn get(&self, index: usize) -> Result<ObjectHandle, CollectionError> {
        let id = self
            .order
            .get(index)
            .ok_or(CollectionError::IndexOutOfRange {
                index,
                count: self.order.len(),
            })?;

        Ok(self.items[id].clone())
    }

    fn get_by_id(&self, id: &ObjectId) -> Result<Option<ObjectHandle>, CollectionError> {
        Ok(self.items.get(id).cloned())
    }

    fn index_of(&self, id: &ObjectId) -> Result<Option<usize>, CollectionError> {
        Ok(self.order.iter().position(|existing| existing == id))
    }

    fn contains(&self, id: &ObjectId) -> Result<bool, CollectionError> {
        Ok(self.items.contains_key(id))
    }

    fn insert(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        if index > self.order.len() {
            return Err(CollectionError::IndexOutOfRange {
                index,
                count: self.order.len(),
            });
        }
        if self.items.contains_key(item.id()) {
            return Err(CollectionError::DuplicateObject {
                id: item.id().clone(),
            });
        }

        self.order.insert(index, item.id().clone());
        self.items.insert(item.id().clone(), item);
        self.bump();

        Ok(())
    }

    fn remove(&mut self, item: &ObjectHandle) -> Result<bool, CollectionError> {
        self.remove_by_id(item.id())
    }

    fn remove_by_id(&mut self, id: &ObjectId) -> Result<bool, CollectionError> {
        let Some(position) = self.order.iter().position(|existing| existing == id) else {
            return Ok(false);
        };

        self.order.remove(position);
        self.items.remove(id);
        self.bump();

        Ok(true)
    }

    fn replace(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        let Some(current) = self.order.get(index) else {
            return Err(CollectionError::IndexOutOfRange {
                index,
                count: self.order.len(),
            });
        };

        // Replacing an item with itself (by id) is allowed; colliding with a
        // different slot is not.
        if current != item.id() && self.items.contains_key(item.id()) {
            return Err(CollectionError::DuplicateObject {
                id: item.id().clone(),
            });
        }

        let previous = current.clone();
        self.items.remove(&previous);
        self.order[index] = item.id().clone();
        self.items.insert(item.id().clone(), item);
        self.bump();

        Ok(())
    }

    fn sort_by(
        &mut self,
        compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError> {
        if self.order.is_empty() {
            return Ok(());
        }

        let items = &self.items;
        self.order.sort_by(|a, b| compare(&items[a], &items[b]));
        self.bump();

        Ok(())
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        if self.order.is_empty() {
            return Ok(());
        }

        self.order.clear();
        self.items.clear();
        self.bump();

        Ok(())
    }
}

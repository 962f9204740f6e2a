use crate::{
    collection::{
        ChangePhase, CollectionChangeEvent, CollectionChangeSink, CollectionData, CollectionError,
        EventRaisingCollectionData, PlainCollectionData,
    },
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::{
    cell::RefCell,
    cmp::Ordering,
    rc::{Rc, Weak},
};

///
/// CowState
///
/// Shared between the wrapper and the change subscription so the Begin event
/// of a source mutation can capture the pre-change snapshot.
///

#[derive(Default)]
struct CowState {
    copied: RefCell<Option<PlainCollectionData>>,
}

impl CowState {
    fn copy_from(&self, data: &dyn CollectionData) -> Result<(), CollectionError> {
        if self.copied.borrow().is_some() {
            return Ok(());
        }

        let snapshot = PlainCollectionData::snapshot_of(data)?;
        *self.copied.borrow_mut() = Some(snapshot);

        Ok(())
    }
}

impl CollectionChangeSink for CowState {
    fn on_change(&self, data: &dyn CollectionData, event: &CollectionChangeEvent) {
        if event.phase == ChangePhase::Begin {
            // Begin delivers the pre-change data; snapshot failure is
            // impossible for complete sources, and an incomplete source has
            // nothing to preserve.
            let _ = self.copy_from(data);
        }
    }
}

///
/// CopyOnWriteCollectionData
///
/// Wraps an observed, event-raising source collection. Transparent
/// pass-through until (a) an explicit `copy_on_write`, (b) the source raises
/// a structural-change Begin event, or (c) this collection itself is about to
/// mutate — then the current contents are cloned into a private store and the
/// wrapper detaches. Cheap sharing of unmodified relation collections across
/// snapshots without cross-snapshot mutation.
///

pub struct CopyOnWriteCollectionData {
    source: Rc<RefCell<EventRaisingCollectionData>>,
    state: Rc<CowState>,
}

impl CopyOnWriteCollectionData {
    #[must_use]
    pub fn new(source: Rc<RefCell<EventRaisingCollectionData>>) -> Self {
        let state = Rc::new(CowState::default());

        // Downgrade first so inference sees the concrete type, then unsize.
        let weak = Rc::downgrade(&state);
        let subscription: Weak<dyn CollectionChangeSink> = weak;
        source.borrow_mut().subscribe(subscription);

        Self { source, state }
    }

    /// True once this wrapper holds a private copy.
    #[must_use]
    pub fn is_content_copied(&self) -> bool {
        self.state.copied.borrow().is_some()
    }

    /// Explicitly clone the current contents and detach from the source.
    pub fn copy_on_write(&self) -> Result<(), CollectionError> {
        if self.is_content_copied() {
            return Ok(());
        }

        self.state.copy_from(&*self.source.borrow())
    }

    fn with_data<R>(&self, read: impl FnOnce(&dyn CollectionData) -> R) -> R {
        let copied = self.state.copied.borrow();
        if let Some(private) = copied.as_ref() {
            read(private)
        } else {
            drop(copied);
            read(&*self.source.borrow())
        }
    }

    fn with_private<R>(
        &mut self,
        mutate: impl FnOnce(&mut PlainCollectionData) -> Result<R, CollectionError>,
    ) -> Result<R, CollectionError> {
        self.copy_on_write()?;

        let mut copied = self.state.copied.borrow_mut();
        let private = copied.as_mut().ok_or(CollectionError::DataIncomplete {
            end_point: "copy-on-write".to_string(),
        })?;

        mutate(private)
    }
}

impl CollectionData for CopyOnWriteCollectionData {
    fn count(&self) -> usize {
        self.with_data(|data| data.count())
    }

    fn version(&self) -> u64 {
        self.with_data(|data| data.version())
    }

    fn required_item_class(&self) -> Option<ClassName> {
        self.with_data(|data| data.required_item_class())
    }

    fn associated_end_point(&self) -> Option<RelationEndPointId> {
        self.with_data(|data| data.associated_end_point())
    }

    fn get(&self, index: usize) -> Result<ObjectHandle, CollectionError> {
        self.with_data(|data| data.get(index))
    }

    fn get_by_id(&self, id: &ObjectId) -> Result<Option<ObjectHandle>, CollectionError> {
        self.with_data(|data| data.get_by_id(id))
    }

    fn index_of(&self, id: &ObjectId) -> Result<Option<usize>, CollectionError> {
        self.with_data(|data| data.index_of(id))
    }

    fn contains(&self, id: &ObjectId) -> Result<bool, CollectionError> {
        self.with_data(|data| data.contains(id))
    }

    fn insert(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        self.with_private(|data| data.insert(index, item))
    }

    fn remove(&mut self, item: &ObjectHandle) -> Result<bool, CollectionError> {
        self.with_private(|data| data.remove(item))
    }

    fn remove_by_id(&mut self, id: &ObjectId) -> Result<bool, CollectionError> {
        self.with_private(|data| data.remove_by_id(id))
    }

    fn replace(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        self.with_private(|data| data.replace(index, item))
    }

    fn sort_by(
        &mut self,
        compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError> {
        self.with_private(|data| data.sort_by(compare))
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.with_private(|data| data.clear())
    }
}

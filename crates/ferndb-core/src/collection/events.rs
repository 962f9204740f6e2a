use crate::{
    collection::{CollectionData, CollectionError},
    identity::{ClassName, ObjectId},
    metadata::RelationEndPointId,
    object::ObjectHandle,
};
use std::{cmp::Ordering, rc::Weak};

///
/// ChangeKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangeKind {
    Insert,
    Remove,
    Replace,
    Sort,
    Clear,
}

///
/// ChangePhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChangePhase {
    Begin,
    End,
}

///
/// CollectionChangeEvent
///
/// One structural-change notification. `object` is `None` for sort and
/// clear; `index` is `None` where no position applies.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CollectionChangeEvent {
    pub kind: ChangeKind,
    pub phase: ChangePhase,
    pub object: Option<ObjectId>,
    pub index: Option<usize>,
}

///
/// CollectionChangeSink
///
/// Listener boundary for external collaborators (UI binding, copy-on-write
/// wrappers). Begin events see the pre-change data; sinks must not mutate the
/// collection they observe.
///

pub trait CollectionChangeSink {
    fn on_change(&self, data: &dyn CollectionData, event: &CollectionChangeEvent);
}

///
/// EventRaisingCollectionData
///
/// Decorator that fires a Begin event before and an End event after each
/// structural change. A failing inner operation raises no End event.
/// Subscribers are held weakly; dead subscriptions are pruned on fire.
///

pub struct EventRaisingCollectionData {
    inner: Box<dyn CollectionData>,
    sinks: Vec<Weak<dyn CollectionChangeSink>>,
}

impl EventRaisingCollectionData {
    #[must_use]
    pub fn new(inner: Box<dyn CollectionData>) -> Self {
        Self {
            inner,
            sinks: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, sink: Weak<dyn CollectionChangeSink>) {
        self.sinks.push(sink);
    }

    fn fire(&mut self, kind: ChangeKind, phase: ChangePhase, object: Option<ObjectId>, index: Option<usize>) {
        let event = CollectionChangeEvent {
            kind,
            phase,
            object,
            index,
        };

        let inner = &*self.inner;
        self.sinks.retain(|weak| {
            weak.upgrade().is_some_and(|sink| {
                sink.on_change(inner, &event);
                true
            })
        });
    }
}

impl CollectionData for EventRaisingCollectionData {
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
        let object = item.id().clone();

        self.fire(ChangeKind::Insert, ChangePhase::Begin, Some(object.clone()), Some(index));
        self.inner.insert(index, item)?;
        self.fire(ChangeKind::Insert, ChangePhase::End, Some(object), Some(index));

        Ok(())
    }

    fn remove(&mut self, item: &ObjectHandle) -> Result<bool, CollectionError> {
        let object = item.id().clone();
        let index = self.inner.index_of(&object)?;

        self.fire(ChangeKind::Remove, ChangePhase::Begin, Some(object.clone()), index);
        let removed = self.inner.remove(item)?;
        if removed {
            self.fire(ChangeKind::Remove, ChangePhase::End, Some(object), index);
        }

        Ok(removed)
    }

    fn remove_by_id(&mut self, id: &ObjectId) -> Result<bool, CollectionError> {
        let index = self.inner.index_of(id)?;

        self.fire(ChangeKind::Remove, ChangePhase::Begin, Some(id.clone()), index);
        let removed = self.inner.remove_by_id(id)?;
        if removed {
            self.fire(ChangeKind::Remove, ChangePhase::End, Some(id.clone()), index);
        }

        Ok(removed)
    }

    fn replace(&mut self, index: usize, item: ObjectHandle) -> Result<(), CollectionError> {
        let object = item.id().clone();

        self.fire(ChangeKind::Replace, ChangePhase::Begin, Some(object.clone()), Some(index));
        self.inner.replace(index, item)?;
        self.fire(ChangeKind::Replace, ChangePhase::End, Some(object), Some(index));

        Ok(())
    }

    fn sort_by(
        &mut self,
        compare: &mut dyn FnMut(&ObjectHandle, &ObjectHandle) -> Ordering,
    ) -> Result<(), CollectionError> {
        self.fire(ChangeKind::Sort, ChangePhase::Begin, None, None);
        self.inner.sort_by(compare)?;
        self.fire(ChangeKind::Sort, ChangePhase::End, None, None);

        Ok(())
    }

    fn clear(&mut self) -> Result<(), CollectionError> {
        self.fire(ChangeKind::Clear, ChangePhase::Begin, None, None);
        self.inner.clear()?;
        self.fire(ChangeKind::Clear, ChangePhase::End, None, None);

        Ok(())
    }
}

use crate::{
    collection::{CollectionError, SharedCollectionData},
    object::ObjectHandle,
};

///
/// CollectionEnumerator
///
/// Index-walking enumerator over a shared collection. Captures the version
/// at construction; any step that observes a different version fails with
/// [`CollectionError::ModifiedDuringEnumeration`]. This is a correctness
/// guard against structural changes mid-walk, not a concurrency mechanism.
///

pub struct CollectionEnumerator {
    data: SharedCollectionData,
    expected_version: u64,
    position: usize,
}

impl CollectionEnumerator {
    #[must_use]
    pub fn new(data: SharedCollectionData) -> Self {
        let expected_version = data.borrow().version();

        Self {
            data,
            expected_version,
            position: 0,
        }
    }

    /// Next item, or `Ok(None)` at the end. Fails when the underlying
    /// collection changed structurally since this enumerator started.
    pub fn try_next(&mut self) -> Result<Option<ObjectHandle>, CollectionError> {
        let data = self.data.borrow();

        let observed = data.version();
        if observed != self.expected_version {
            return Err(CollectionError::ModifiedDuringEnumeration {
                expected: self.expected_version,
                observed,
            });
        }

        if self.position >= data.count() {
            return Ok(None);
        }

        let item = data.get(self.position)?;
        self.position += 1;

        Ok(Some(item))
    }
}

impl Iterator for CollectionEnumerator {
    type Item = Result<ObjectHandle, CollectionError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.try_next().transpose()
    }
}

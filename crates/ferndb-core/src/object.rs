//! Domain-object references used by the collection pipeline and end points.

use crate::identity::ObjectId;
use std::{
    fmt::{self, Display},
    sync::Arc,
};

///
/// DomainObject
///
/// The in-transaction representation of one entity instance. Property data
/// lives in the owning unit of work's data container; this carries identity
/// only, so handles stay cheap and free of ownership cycles.
///

#[derive(Debug)]
pub struct DomainObject {
    id: ObjectId,
}

impl DomainObject {
    #[must_use]
    pub const fn new(id: ObjectId) -> Self {
        Self { id }
    }

    #[must_use]
    pub const fn id(&self) -> &ObjectId {
        &self.id
    }
}

///
/// ObjectHandle
///
/// Shared reference to a domain object. Equality is id value equality;
/// `same_instance` is pointer identity, which the modification-checking
/// collection decorator uses to reject id-equal but distinct references.
///

#[derive(Clone, Debug)]
pub struct ObjectHandle(Arc<DomainObject>);

impl ObjectHandle {
    #[must_use]
    pub fn new(id: ObjectId) -> Self {
        Self(Arc::new(DomainObject::new(id)))
    }

    #[must_use]
    pub fn id(&self) -> &ObjectId {
        self.0.id()
    }

    /// Pointer identity, not id equality.
    #[must_use]
    pub fn same_instance(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ObjectHandle {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for ObjectHandle {}

impl Display for ObjectHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

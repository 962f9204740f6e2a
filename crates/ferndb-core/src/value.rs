//! Property-value vocabulary shared by containers, data-source records, and
//! foreign-key grouping.

use crate::identity::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use ulid::Ulid;

///
/// Value
///
/// Runtime value of one entity property. A property whose declared type is
/// `ObjectId` is a real relation end point (the foreign-key side).
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    Ulid(Ulid),
    ObjectId(ObjectId),
    Blob(Vec<u8>),
}

impl Value {
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Return the contained object id, if this value holds one.
    #[must_use]
    pub const fn as_object_id(&self) -> Option<&ObjectId> {
        match self {
            Self::ObjectId(id) => Some(id),
            _ => None,
        }
    }

    /// Runtime type label used in diagnostics.
    #[must_use]
    pub const fn type_label(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Uint(_) => "uint",
            Self::Text(_) => "text",
            Self::Ulid(_) => "ulid",
            Self::ObjectId(_) => "object_id",
            Self::Blob(_) => "blob",
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Uint(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
            Self::Ulid(u) => write!(f, "{u}"),
            Self::ObjectId(id) => write!(f, "{id}"),
            Self::Blob(bytes) => write!(f, "blob[{}]", bytes.len()),
        }
    }
}

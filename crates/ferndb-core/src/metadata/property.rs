use crate::{identity::PropertyName, value::Value};
use serde::{Deserialize, Serialize};

///
/// PropertyType
///
/// Declared runtime type of one property. `ObjectId` marks the property as a
/// real (foreign-key-holding) relation end point.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum PropertyType {
    Bool,
    Int,
    Uint,
    Text,
    Ulid,
    ObjectId,
    Blob,
}

impl PropertyType {
    /// Check a runtime value against this declared type. `Null` is checked
    /// separately through nullability.
    #[must_use]
    pub const fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Bool, Value::Bool(_))
                | (Self::Int, Value::Int(_))
                | (Self::Uint, Value::Uint(_))
                | (Self::Text, Value::Text(_))
                | (Self::Ulid, Value::Ulid(_))
                | (Self::ObjectId, Value::ObjectId(_))
                | (Self::Blob, Value::Blob(_))
        )
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Text => "text",
            Self::Ulid => "ulid",
            Self::ObjectId => "object_id",
            Self::Blob => "blob",
        }
    }
}

///
/// StorageClass
///
/// Where a property's value lives. `Persistent` round-trips through storage,
/// `Transaction` exists only for the transaction's lifetime, `None` is
/// computed/unmanaged.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum StorageClass {
    #[default]
    Persistent,
    Transaction,
    None,
}

///
/// PropertyDefinition
///
/// Static mapping facts for one property. Read-only once the owning class
/// definition is frozen.
///

#[derive(Clone, Debug)]
pub struct PropertyDefinition {
    name: PropertyName,
    declared_type: PropertyType,
    nullable: bool,
    storage_class: StorageClass,
}

impl PropertyDefinition {
    #[must_use]
    pub const fn new(
        name: PropertyName,
        declared_type: PropertyType,
        nullable: bool,
        storage_class: StorageClass,
    ) -> Self {
        Self {
            name,
            declared_type,
            nullable,
            storage_class,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &PropertyName {
        &self.name
    }

    #[must_use]
    pub const fn declared_type(&self) -> PropertyType {
        self.declared_type
    }

    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    #[must_use]
    pub const fn storage_class(&self) -> StorageClass {
        self.storage_class
    }

    /// A property holding an `ObjectId` is the real side of a relation.
    #[must_use]
    pub const fn is_object_id_property(&self) -> bool {
        matches!(self.declared_type, PropertyType::ObjectId)
    }

    /// Default slot value for freshly created containers.
    #[must_use]
    pub fn default_value(&self) -> Value {
        if self.nullable {
            return Value::Null;
        }

        match self.declared_type {
            PropertyType::Bool => Value::Bool(false),
            PropertyType::Int => Value::Int(0),
            PropertyType::Uint => Value::Uint(0),
            PropertyType::Text => Value::Text(String::new()),
            PropertyType::Ulid => Value::Ulid(ulid::Ulid(0)),
            // A non-nullable relation still starts unset; mandatory-ness is
            // enforced at commit/registration time, not at construction.
            PropertyType::ObjectId => Value::Null,
            PropertyType::Blob => Value::Blob(Vec::new()),
        }
    }
}

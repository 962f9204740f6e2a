use crate::{
    identity::{ObjectId, PropertyName},
    object::ObjectHandle,
    value::Value,
};
use std::collections::BTreeMap;

///
/// DataSourceRecord
///
/// The raw property values one loaded object came from, keyed by property
/// name. The storage layer produces these; materialization and foreign-key
/// grouping consume them.
///

#[derive(Clone, Debug, Default)]
pub struct DataSourceRecord {
    values: BTreeMap<PropertyName, Value>,
}

impl DataSourceRecord {
    #[must_use]
    pub const fn new(values: BTreeMap<PropertyName, Value>) -> Self {
        Self { values }
    }

    #[must_use]
    pub fn value(&self, property: &PropertyName) -> Option<&Value> {
        self.values.get(property)
    }

    /// The foreign key stored under `property`, if present and non-null.
    #[must_use]
    pub fn foreign_key(&self, property: &PropertyName) -> Option<&ObjectId> {
        self.values.get(property).and_then(Value::as_object_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PropertyName, &Value)> {
        self.values.iter()
    }

    #[must_use]
    pub fn into_values(self) -> BTreeMap<PropertyName, Value> {
        self.values
    }
}

///
/// LoadedObjectWithSource
///
/// One row of a fetch query result: the materialized object paired with the
/// record it was built from.
///

#[derive(Clone, Debug)]
pub struct LoadedObjectWithSource {
    pub object: ObjectHandle,
    pub source: DataSourceRecord,
}

impl LoadedObjectWithSource {
    #[must_use]
    pub const fn new(object: ObjectHandle, source: DataSourceRecord) -> Self {
        Self { object, source }
    }
}

use crate::{
    identity::{ClassName, PropertyName},
    metadata::{MetadataError, PropertyDefinition, RelationEndPointDefinition},
};
use std::{collections::BTreeMap, sync::Arc, sync::OnceLock};

///
/// ClassDefinition
///
/// Static mapping metadata for one entity class. Property and end-point
/// definitions are published exactly once, then the definition is frozen;
/// reads before publication fail.
///
/// Publication uses `OnceLock` set-once guards (read-mostly, write-once).
///

#[derive(Debug)]
pub struct ClassDefinition {
    name: ClassName,
    base: Option<ClassName>,
    storage_group: Option<String>,
    properties: OnceLock<BTreeMap<PropertyName, PropertyDefinition>>,
    end_points: OnceLock<Vec<Arc<RelationEndPointDefinition>>>,
    frozen: OnceLock<()>,
}

impl ClassDefinition {
    #[must_use]
    pub fn new(name: ClassName, base: Option<ClassName>, storage_group: Option<String>) -> Self {
        Self {
            name,
            base,
            storage_group,
            properties: OnceLock::new(),
            end_points: OnceLock::new(),
            frozen: OnceLock::new(),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &ClassName {
        &self.name
    }

    #[must_use]
    pub const fn base(&self) -> Option<&ClassName> {
        self.base.as_ref()
    }

    #[must_use]
    pub fn storage_group(&self) -> Option<&str> {
        self.storage_group.as_deref()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.frozen.get().is_some()
    }

    /// Publish the property definitions. Allowed exactly once, before freeze.
    pub fn set_property_definitions(
        &self,
        definitions: Vec<PropertyDefinition>,
    ) -> Result<(), MetadataError> {
        if self.is_read_only() {
            return Err(MetadataError::Frozen {
                class: self.name.clone(),
            });
        }

        let map = definitions
            .into_iter()
            .map(|def| (def.name().clone(), def))
            .collect();

        self.properties
            .set(map)
            .map_err(|_| MetadataError::AlreadyPublished {
                class: self.name.clone(),
                what: "property definitions",
            })
    }

    /// Publish the relation end-point definitions. Allowed exactly once,
    /// before freeze.
    pub fn set_relation_end_point_definitions(
        &self,
        definitions: Vec<Arc<RelationEndPointDefinition>>,
    ) -> Result<(), MetadataError> {
        if self.is_read_only() {
            return Err(MetadataError::Frozen {
                class: self.name.clone(),
            });
        }

        self.end_points
            .set(definitions)
            .map_err(|_| MetadataError::AlreadyPublished {
                class: self.name.clone(),
                what: "relation end-point definitions",
            })
    }

    /// Freeze the definition. Requires both definition sets to be published;
    /// freezing an already-frozen definition is a no-op.
    pub fn set_read_only(&self) -> Result<(), MetadataError> {
        if self.properties.get().is_none() {
            return Err(MetadataError::NotPublished {
                class: self.name.clone(),
                what: "property definitions",
            });
        }
        if self.end_points.get().is_none() {
            return Err(MetadataError::NotPublished {
                class: self.name.clone(),
                what: "relation end-point definitions",
            });
        }

        let _ = self.frozen.set(());

        Ok(())
    }

    /// All property definitions, ordered by name.
    pub fn properties(
        &self,
    ) -> Result<&BTreeMap<PropertyName, PropertyDefinition>, MetadataError> {
        self.properties
            .get()
            .ok_or_else(|| MetadataError::NotPublished {
                class: self.name.clone(),
                what: "property definitions",
            })
    }

    /// Published relation end-point definitions anchored at this class.
    pub fn relation_end_points(
        &self,
    ) -> Result<&[Arc<RelationEndPointDefinition>], MetadataError> {
        self.end_points
            .get()
            .map(Vec::as_slice)
            .ok_or_else(|| MetadataError::NotPublished {
                class: self.name.clone(),
                what: "relation end-point definitions",
            })
    }

    #[must_use]
    pub fn property(&self, name: &PropertyName) -> Option<&PropertyDefinition> {
        self.properties.get().and_then(|map| map.get(name))
    }

    pub fn try_property(&self, name: &PropertyName) -> Result<&PropertyDefinition, MetadataError> {
        self.properties()?
            .get(name)
            .ok_or_else(|| MetadataError::UnknownProperty {
                class: self.name.clone(),
                property: name.clone(),
            })
    }
}

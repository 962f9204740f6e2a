//! Module: container
//! Responsibility: per-entity property-value store with a lifecycle state.
//! Does not own: relation end-point state or storage access.
//!
//! Invariants:
//! - `Invalid` is terminal; no read or mutation succeeds afterwards.
//! - Reads on `Deleted` fail rather than returning stale data.
//! - Every state-guard failure embeds the object id (and property name where
//!   one is involved).

pub mod state;


pub use state::{ContainerState, Lifecycle};

use crate::{
    error::ErrorClass,
    identity::{ObjectId, PropertyName},
    metadata::{ClassDefinition, PropertyDefinition, StorageClass},
    value::Value,
};
use std::{collections::BTreeMap, sync::Arc};
use thiserror::Error as ThisError;

///
/// ContainerError
///

#[derive(Debug, ThisError)]
pub enum ContainerError {
    #[error("object '{id}' is deleted; cannot access property '{property}'")]
    ObjectDeleted { id: ObjectId, property: String },

    #[error("object '{id}' is invalid; cannot access property '{property}'")]
    ObjectInvalid { id: ObjectId, property: String },

    #[error("object '{id}' is not loaded yet")]
    ObjectNotLoaded { id: ObjectId },

    #[error("object '{id}' has no property '{property}'")]
    UnknownProperty { id: ObjectId, property: PropertyName },

    #[error("property '{property}' of object '{id}' expects {expected}, got {actual}")]
    TypeMismatch {
        id: ObjectId,
        property: PropertyName,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("property '{property}' of object '{id}' is not nullable")]
    NullNotAllowed { id: ObjectId, property: PropertyName },

    #[error("object '{id}': cannot {operation} while {lifecycle}")]
    IllegalTransition {
        id: ObjectId,
        lifecycle: Lifecycle,
        operation: &'static str,
    },

    #[error("class of object '{id}' is not frozen; containers require published metadata")]
    ClassNotFrozen { id: ObjectId },
}

impl ContainerError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::ObjectDeleted { .. }
            | Self::ObjectInvalid { .. }
            | Self::ObjectNotLoaded { .. }
            | Self::IllegalTransition { .. }
            | Self::ClassNotFrozen { .. } => ErrorClass::InvalidState,
            Self::UnknownProperty { .. } => ErrorClass::NotFound,
            Self::TypeMismatch { .. } | Self::NullNotAllowed { .. } => {
                ErrorClass::InvariantViolation
            }
        }
    }
}

///
/// ValueAccess
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValueAccess {
    Current,
    Original,
}

///
/// PropertyValueSlot
///

#[derive(Clone, Debug, Eq, PartialEq)]
struct PropertyValueSlot {
    original: Value,
    current: Value,
}

impl PropertyValueSlot {
    fn new(value: Value) -> Self {
        Self {
            original: value.clone(),
            current: value,
        }
    }

    fn is_touched(&self) -> bool {
        self.original != self.current
    }
}

///
/// DataContainer
///
/// Owns the property-value map for one entity instance and drives the
/// lifecycle state machine:
/// `New → {Unchanged, Deleted, Invalid}`,
/// `Unchanged → {Changed, Deleted}`,
/// `Changed → {Unchanged, Deleted}`, any state `→ Invalid` on discard.
/// `NotLoadedYet` is the pre-state before data has been materialized.
///

#[derive(Debug)]
pub struct DataContainer {
    id: ObjectId,
    class: Arc<ClassDefinition>,
    lifecycle: Lifecycle,
    slots: BTreeMap<PropertyName, PropertyValueSlot>,
}

impl DataContainer {
    /// Container for a freshly created object: state `New`, every slot at its
    /// declared default.
    pub fn new_for_new_object(
        id: ObjectId,
        class: Arc<ClassDefinition>,
    ) -> Result<Self, ContainerError> {
        let slots = default_slots(&class, &id)?;

        Ok(Self {
            id,
            class,
            lifecycle: Lifecycle::New,
            slots,
        })
    }

    /// Placeholder container for an object known by id only. Data access must
    /// first materialize it.
    #[must_use]
    pub const fn new_not_loaded_yet(id: ObjectId, class: Arc<ClassDefinition>) -> Self {
        Self {
            id,
            class,
            lifecycle: Lifecycle::NotLoadedYet,
            slots: BTreeMap::new(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> &ObjectId {
        &self.id
    }

    #[must_use]
    pub const fn class(&self) -> &Arc<ClassDefinition> {
        &self.class
    }

    /// Composite state snapshot including changed-data flags.
    #[must_use]
    pub fn state(&self) -> ContainerState {
        let mut persistent = false;
        let mut non_persistent = false;

        for (name, slot) in &self.slots {
            if !slot.is_touched() {
                continue;
            }
            match self.class.property(name).map(PropertyDefinition::storage_class) {
                Some(StorageClass::Persistent) => persistent = true,
                Some(StorageClass::Transaction | StorageClass::None) | None => {
                    non_persistent = true;
                }
            }
        }

        ContainerState::new(self.lifecycle, persistent, non_persistent)
    }

    /// Materialize a `NotLoadedYet` container from loaded values. Missing
    /// properties fall back to declared defaults; unknown or ill-typed values
    /// are rejected.
    pub fn materialize(
        &mut self,
        values: BTreeMap<PropertyName, Value>,
    ) -> Result<(), ContainerError> {
        self.require_lifecycle(Lifecycle::NotLoadedYet, "materialize")?;

        let mut slots = default_slots(&self.class, &self.id)?;
        for (name, value) in values {
            let definition = self.class.property(&name).ok_or_else(|| {
                ContainerError::UnknownProperty {
                    id: self.id.clone(),
                    property: name.clone(),
                }
            })?;
            check_value(&self.id, definition, &value)?;

            slots.insert(name, PropertyValueSlot::new(value));
        }

        self.slots = slots;
        self.lifecycle = Lifecycle::Unchanged;

        Ok(())
    }

    /// The load found nothing: the container becomes `Invalid` irreversibly.
    pub fn materialize_not_found(&mut self) -> Result<(), ContainerError> {
        self.require_lifecycle(Lifecycle::NotLoadedYet, "materialize")?;
        self.lifecycle = Lifecycle::Invalid;

        Ok(())
    }

    pub fn get_value(
        &self,
        property: &PropertyName,
        access: ValueAccess,
    ) -> Result<&Value, ContainerError> {
        self.guard_access(property)?;

        let slot = self
            .slots
            .get(property)
            .ok_or_else(|| ContainerError::UnknownProperty {
                id: self.id.clone(),
                property: property.clone(),
            })?;

        Ok(match access {
            ValueAccess::Current => &slot.current,
            ValueAccess::Original => &slot.original,
        })
    }

    pub fn set_value(&mut self, property: &PropertyName, value: Value) -> Result<(), ContainerError> {
        self.guard_access(property)?;

        let definition =
            self.class
                .property(property)
                .ok_or_else(|| ContainerError::UnknownProperty {
                    id: self.id.clone(),
                    property: property.clone(),
                })?;
        check_value(&self.id, definition, &value)?;

        let slot = self
            .slots
            .get_mut(property)
            .ok_or_else(|| ContainerError::UnknownProperty {
                id: self.id.clone(),
                property: property.clone(),
            })?;
        slot.current = value;

        // Setting a value back to its original may revert the whole container.
        self.recompute_changed();

        Ok(())
    }

    /// `New` containers are discarded outright; loaded ones become `Deleted`.
    pub fn delete(&mut self) -> Result<(), ContainerError> {
        match self.lifecycle {
            Lifecycle::New => {
                self.lifecycle = Lifecycle::Invalid;
                Ok(())
            }
            Lifecycle::Unchanged | Lifecycle::Changed => {
                self.lifecycle = Lifecycle::Deleted;
                Ok(())
            }
            Lifecycle::NotLoadedYet | Lifecycle::Deleted | Lifecycle::Invalid => {
                Err(self.illegal("delete"))
            }
        }
    }

    /// Commit pending changes: current values become original; a deleted
    /// container becomes `Invalid`.
    pub fn commit(&mut self) -> Result<(), ContainerError> {
        match self.lifecycle {
            Lifecycle::New | Lifecycle::Changed | Lifecycle::Unchanged => {
                for slot in self.slots.values_mut() {
                    slot.original = slot.current.clone();
                }
                self.lifecycle = Lifecycle::Unchanged;
                Ok(())
            }
            Lifecycle::Deleted => {
                self.lifecycle = Lifecycle::Invalid;
                Ok(())
            }
            Lifecycle::NotLoadedYet | Lifecycle::Invalid => Err(self.illegal("commit")),
        }
    }

    /// Roll back pending changes: current values restored from original; a
    /// `New` container vanishes (`Invalid`).
    pub fn rollback(&mut self) -> Result<(), ContainerError> {
        match self.lifecycle {
            Lifecycle::New => {
                self.lifecycle = Lifecycle::Invalid;
                Ok(())
            }
            Lifecycle::Changed | Lifecycle::Deleted | Lifecycle::Unchanged => {
                for slot in self.slots.values_mut() {
                    slot.current = slot.original.clone();
                }
                self.lifecycle = Lifecycle::Unchanged;
                Ok(())
            }
            Lifecycle::NotLoadedYet | Lifecycle::Invalid => Err(self.illegal("rollback")),
        }
    }

    /// Unconditionally invalidate (object discarded or not found).
    pub fn discard(&mut self) {
        self.lifecycle = Lifecycle::Invalid;
    }

    fn guard_access(&self, property: &PropertyName) -> Result<(), ContainerError> {
        match self.lifecycle {
            Lifecycle::Invalid => Err(ContainerError::ObjectInvalid {
                id: self.id.clone(),
                property: property.to_string(),
            }),
            Lifecycle::Deleted => Err(ContainerError::ObjectDeleted {
                id: self.id.clone(),
                property: property.to_string(),
            }),
            Lifecycle::NotLoadedYet => Err(ContainerError::ObjectNotLoaded {
                id: self.id.clone(),
            }),
            Lifecycle::New | Lifecycle::Unchanged | Lifecycle::Changed => Ok(()),
        }
    }

    fn recompute_changed(&mut self) {
        self.lifecycle = match self.lifecycle {
            Lifecycle::Unchanged | Lifecycle::Changed => {
                if self.slots.values().any(PropertyValueSlot::is_touched) {
                    Lifecycle::Changed
                } else {
                    Lifecycle::Unchanged
                }
            }
            other => other,
        };
    }

    fn require_lifecycle(
        &self,
        expected: Lifecycle,
        operation: &'static str,
    ) -> Result<(), ContainerError> {
        if self.lifecycle == expected {
            Ok(())
        } else {
            Err(ContainerError::IllegalTransition {
                id: self.id.clone(),
                lifecycle: self.lifecycle,
                operation,
            })
        }
    }

    fn illegal(&self, operation: &'static str) -> ContainerError {
        ContainerError::IllegalTransition {
            id: self.id.clone(),
            lifecycle: self.lifecycle,
            operation,
        }
    }
}

// Build the full default slot map for a class.
fn default_slots(
    class: &ClassDefinition,
    id: &ObjectId,
) -> Result<BTreeMap<PropertyName, PropertyValueSlot>, ContainerError> {
    let properties = class
        .properties()
        .map_err(|_| ContainerError::ClassNotFrozen { id: id.clone() })?;

    Ok(properties
        .values()
        .map(|definition| {
            let default = definition.default_value();
            let mut slot = PropertyValueSlot::new(default.clone());
            slot.current = default;
            (definition.name().clone(), slot)
        })
        .collect())
}

fn check_value(
    id: &ObjectId,
    definition: &PropertyDefinition,
    value: &Value,
) -> Result<(), ContainerError> {
    if value.is_null() {
        if definition.is_nullable() || definition.is_object_id_property() {
            return Ok(());
        }
        return Err(ContainerError::NullNotAllowed {
            id: id.clone(),
            property: definition.name().clone(),
        });
    }

    if !definition.declared_type().matches(value) {
        return Err(ContainerError::TypeMismatch {
            id: id.clone(),
            property: definition.name().clone(),
            expected: definition.declared_type().label(),
            actual: value.type_label(),
        });
    }

    Ok(())
}

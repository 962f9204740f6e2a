use crate::{
    identity::{ClassName, ObjectId, PropertyName},
    metadata::MetadataError,
};
use std::{
    fmt::{self, Display},
    sync::Arc,
};

///
/// EndPointCardinality
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EndPointCardinality {
    One,
    Many,
}

///
/// RelationEndPointDefinition
///
/// One side of a relation definition. `Real` holds a physical foreign key;
/// the virtual variants have no storage of their own; `Anonymous` is the
/// non-existent side of a one-directional relation.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum RelationEndPointDefinition {
    Real {
        class: ClassName,
        property: PropertyName,
        mandatory: bool,
    },
    VirtualObject {
        class: ClassName,
        property: PropertyName,
        mandatory: bool,
    },
    VirtualCollection {
        class: ClassName,
        property: PropertyName,
        mandatory: bool,
    },
    Anonymous {
        class: ClassName,
    },
}

impl RelationEndPointDefinition {
    #[must_use]
    pub const fn class_name(&self) -> &ClassName {
        match self {
            Self::Real { class, .. }
            | Self::VirtualObject { class, .. }
            | Self::VirtualCollection { class, .. }
            | Self::Anonymous { class } => class,
        }
    }

    #[must_use]
    pub const fn property_name(&self) -> Option<&PropertyName> {
        match self {
            Self::Real { property, .. }
            | Self::VirtualObject { property, .. }
            | Self::VirtualCollection { property, .. } => Some(property),
            Self::Anonymous { .. } => None,
        }
    }

    #[must_use]
    pub const fn is_real(&self) -> bool {
        matches!(self, Self::Real { .. })
    }

    #[must_use]
    pub const fn is_virtual(&self) -> bool {
        matches!(
            self,
            Self::VirtualObject { .. } | Self::VirtualCollection { .. }
        )
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous { .. })
    }

    #[must_use]
    pub const fn is_mandatory(&self) -> bool {
        match self {
            Self::Real { mandatory, .. }
            | Self::VirtualObject { mandatory, .. }
            | Self::VirtualCollection { mandatory, .. } => *mandatory,
            Self::Anonymous { .. } => false,
        }
    }

    #[must_use]
    pub const fn cardinality(&self) -> EndPointCardinality {
        match self {
            Self::VirtualCollection { .. } => EndPointCardinality::Many,
            _ => EndPointCardinality::One,
        }
    }

    /// True when this definition is anchored at `(class, property)`.
    #[must_use]
    pub fn is_anchored_at(&self, class: &ClassName, property: &PropertyName) -> bool {
        self.class_name() == class && self.property_name() == Some(property)
    }
}

impl Display for RelationEndPointDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.property_name() {
            Some(property) => write!(f, "{}.{property}", self.class_name()),
            None => write!(f, "{}.<anonymous>", self.class_name()),
        }
    }
}

///
/// RelationDefinition
///
/// Pairs exactly two end-point definitions: one real side and one virtual or
/// anonymous side. Validated at construction; immutable afterwards.
///

#[derive(Debug)]
pub struct RelationDefinition {
    id: String,
    end_points: [Arc<RelationEndPointDefinition>; 2],
}

impl RelationDefinition {
    pub fn try_new(
        id: impl Into<String>,
        first: Arc<RelationEndPointDefinition>,
        second: Arc<RelationEndPointDefinition>,
    ) -> Result<Self, MetadataError> {
        let id = id.into();

        let shape_error = |message: &str| MetadataError::RelationShape {
            id: id.clone(),
            message: message.to_string(),
        };

        if id.is_empty() {
            return Err(shape_error("relation id must not be empty"));
        }

        let real_count = [&first, &second].iter().filter(|ep| ep.is_real()).count();
        let anonymous_count = [&first, &second]
            .iter()
            .filter(|ep| ep.is_anonymous())
            .count();
        let virtual_count = [&first, &second].iter().filter(|ep| ep.is_virtual()).count();

        if real_count != 1 {
            return Err(shape_error(
                "a relation must have exactly one real (foreign-key) side",
            ));
        }
        if anonymous_count > 1 {
            return Err(shape_error("at most one side may be anonymous"));
        }
        if virtual_count > 1 {
            return Err(shape_error("at most one side may be virtual"));
        }
        if anonymous_count == 1 && virtual_count == 1 {
            // Unreachable with real_count == 1; kept as an explicit guard.
            return Err(shape_error(
                "an anonymous side must sit opposite a real side",
            ));
        }

        Ok(Self {
            id,
            end_points: [first, second],
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub const fn end_points(&self) -> &[Arc<RelationEndPointDefinition>; 2] {
        &self.end_points
    }

    /// The real (foreign-key-holding) side.
    #[must_use]
    pub fn real_end_point(&self) -> &Arc<RelationEndPointDefinition> {
        if self.end_points[0].is_real() {
            &self.end_points[0]
        } else {
            &self.end_points[1]
        }
    }

    #[must_use]
    pub fn contains(&self, definition: &RelationEndPointDefinition) -> bool {
        self.end_points.iter().any(|ep| ep.as_ref() == definition)
    }

    /// Opposite side of `definition`, if `definition` belongs to this relation.
    #[must_use]
    pub fn opposite(
        &self,
        definition: &RelationEndPointDefinition,
    ) -> Option<&Arc<RelationEndPointDefinition>> {
        if self.end_points[0].as_ref() == definition {
            Some(&self.end_points[1])
        } else if self.end_points[1].as_ref() == definition {
            Some(&self.end_points[0])
        } else {
            None
        }
    }
}

///
/// RelationEndPointId
///
/// (object id, end-point definition) pair identifying one side of a relation
/// instance; the cache key for virtual end points. Anonymous definitions
/// cannot anchor an id.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct RelationEndPointId {
    object: ObjectId,
    definition: Arc<RelationEndPointDefinition>,
}

impl RelationEndPointId {
    pub fn try_new(
        object: ObjectId,
        definition: Arc<RelationEndPointDefinition>,
    ) -> Result<Self, MetadataError> {
        if definition.is_anonymous() {
            return Err(MetadataError::AnonymousEndPointId {
                class: definition.class_name().clone(),
            });
        }

        Ok(Self { object, definition })
    }

    #[must_use]
    pub const fn object(&self) -> &ObjectId {
        &self.object
    }

    #[must_use]
    pub const fn definition(&self) -> &Arc<RelationEndPointDefinition> {
        &self.definition
    }
}

impl Display for RelationEndPointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.definition.property_name() {
            Some(property) => write!(f, "{}/{property}", self.object),
            None => write!(f, "{}/<anonymous>", self.object),
        }
    }
}

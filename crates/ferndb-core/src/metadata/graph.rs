use crate::{
    identity::{ClassName, PropertyName},
    metadata::{
        ClassDefinition, MetadataError, RelationDefinition, RelationEndPointDefinition,
    },
};
use std::{collections::BTreeMap, sync::Arc};

///
/// MappingGraphBuilder
///
/// Collects class and relation definitions, validates cross-references, and
/// freezes them into a read-only [`MappingGraph`]. Metadata discovery (XML
/// import, reflection) happens upstream; the builder only consumes its output.
///

#[derive(Default)]
pub struct MappingGraphBuilder {
    classes: BTreeMap<ClassName, Arc<ClassDefinition>>,
    relations: Vec<Arc<RelationDefinition>>,
}

impl MappingGraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: ClassDefinition) -> Result<(), MetadataError> {
        let name = class.name().clone();
        if self.classes.contains_key(&name) {
            return Err(MetadataError::DuplicateClass { name });
        }

        self.classes.insert(name, Arc::new(class));

        Ok(())
    }

    pub fn add_relation(&mut self, relation: RelationDefinition) -> Result<(), MetadataError> {
        if self
            .relations
            .iter()
            .any(|existing| existing.id() == relation.id())
        {
            return Err(MetadataError::DuplicateRelation {
                id: relation.id().to_string(),
            });
        }

        for end_point in relation.end_points() {
            self.validate_end_point(relation.id(), end_point)?;
        }

        self.relations.push(Arc::new(relation));

        Ok(())
    }

    // Every non-anonymous side must be anchored at a known class; the real
    // side must sit on an object-id property.
    fn validate_end_point(
        &self,
        relation_id: &str,
        end_point: &RelationEndPointDefinition,
    ) -> Result<(), MetadataError> {
        let class = self.classes.get(end_point.class_name()).ok_or_else(|| {
            MetadataError::UnknownClass {
                name: end_point.class_name().clone(),
            }
        })?;

        let Some(property) = end_point.property_name() else {
            return Ok(());
        };

        if end_point.is_real() {
            let definition = class.try_property(property)?;
            if !definition.is_object_id_property() {
                return Err(MetadataError::RelationShape {
                    id: relation_id.to_string(),
                    message: format!(
                        "real end point '{end_point}' must be declared on an object-id property, found {}",
                        definition.declared_type().label()
                    ),
                });
            }
        }

        Ok(())
    }

    // Base references must resolve to a registered class and may not form a
    // cycle; `class_hierarchy` walks them unguarded.
    fn validate_bases(&self) -> Result<(), MetadataError> {
        for class in self.classes.values() {
            let mut seen = vec![class.name()];
            let mut current = class.base();
            while let Some(base) = current {
                let base_class =
                    self.classes
                        .get(base)
                        .ok_or_else(|| MetadataError::UnknownBase {
                            class: class.name().clone(),
                            base: base.clone(),
                        })?;
                if seen.contains(&base_class.name()) {
                    return Err(MetadataError::BaseCycle {
                        class: class.name().clone(),
                    });
                }
                seen.push(base_class.name());
                current = base_class.base();
            }
        }

        Ok(())
    }

    /// Freeze all definitions and produce the read-only graph. Freezing fails
    /// if any class was never fully published or declares an unknown or
    /// cyclic base.
    pub fn build(self) -> Result<MappingGraph, MetadataError> {
        self.validate_bases()?;
        for class in self.classes.values() {
            class.set_read_only()?;
        }

        Ok(MappingGraph {
            classes: self.classes,
            relations: self.relations,
        })
    }
}

///
/// MappingGraph
///
/// Frozen registry of classes and relations. Resolves classes by name and
/// opposite end-point definitions by lookup; end points never hold embedded
/// back-pointers to their opposite side.
///

pub struct MappingGraph {
    classes: BTreeMap<ClassName, Arc<ClassDefinition>>,
    relations: Vec<Arc<RelationDefinition>>,
}

impl MappingGraph {
    #[must_use]
    pub fn class(&self, name: &ClassName) -> Option<&Arc<ClassDefinition>> {
        self.classes.get(name)
    }

    pub fn try_class(&self, name: &ClassName) -> Result<&Arc<ClassDefinition>, MetadataError> {
        self.classes
            .get(name)
            .ok_or_else(|| MetadataError::UnknownClass { name: name.clone() })
    }

    #[must_use]
    pub fn relations(&self) -> &[Arc<RelationDefinition>] {
        &self.relations
    }

    /// Resolve the end-point definition anchored at `(class, property)`.
    pub fn end_point_definition(
        &self,
        class: &ClassName,
        property: &PropertyName,
    ) -> Result<&Arc<RelationEndPointDefinition>, MetadataError> {
        self.relations
            .iter()
            .flat_map(|relation| relation.end_points().iter())
            .find(|ep| ep.is_anchored_at(class, property))
            .ok_or_else(|| MetadataError::NoSuchEndPoint {
                end_point: format!("{class}.{property}"),
            })
    }

    /// The relation a definition belongs to.
    pub fn relation_for(
        &self,
        definition: &RelationEndPointDefinition,
    ) -> Result<&Arc<RelationDefinition>, MetadataError> {
        self.relations
            .iter()
            .find(|relation| relation.contains(definition))
            .ok_or_else(|| MetadataError::NoSuchEndPoint {
                end_point: definition.to_string(),
            })
    }

    /// Resolve the opposite side of `definition` by lookup.
    pub fn opposite(
        &self,
        definition: &RelationEndPointDefinition,
    ) -> Result<&Arc<RelationEndPointDefinition>, MetadataError> {
        let relation = self.relation_for(definition)?;

        relation
            .opposite(definition)
            .ok_or_else(|| MetadataError::NoSuchEndPoint {
                end_point: definition.to_string(),
            })
    }

    /// Root class plus all transitively derived classes, root first.
    pub fn class_hierarchy(
        &self,
        root: &ClassName,
    ) -> Result<Vec<Arc<ClassDefinition>>, MetadataError> {
        let root_class = self.try_class(root)?;
        let mut hierarchy = vec![Arc::clone(root_class)];
        let mut frontier = vec![root.clone()];

        while let Some(current) = frontier.pop() {
            for class in self.classes.values() {
                if class.base() == Some(&current) {
                    hierarchy.push(Arc::clone(class));
                    frontier.push(class.name().clone());
                }
            }
        }

        Ok(hierarchy)
    }
}

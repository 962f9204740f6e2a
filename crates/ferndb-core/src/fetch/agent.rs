use crate::{
    endpoint::EndPointProvider,
    fetch::{FetchError, LoadedObjectWithSource},
    identity::{ObjectId, PropertyName},
    metadata::{MappingGraph, RelationEndPointDefinition, RelationEndPointId},
    object::ObjectHandle,
};
use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

///
/// RelationDataRegistrationAgent
///
/// The per-end-point-kind strategy that turns one fetch query's result rows
/// into registered end points. `originators` are the objects the primary
/// query loaded; `None` entries are unresolved placeholders and are skipped
/// without error. Already-complete end points are left untouched, so
/// overlapping invocations stay idempotent.
///

pub trait RelationDataRegistrationAgent {
    fn register(
        &self,
        definition: &Arc<RelationEndPointDefinition>,
        originators: &[Option<ObjectHandle>],
        fetched: &[LoadedObjectWithSource],
        graph: &MappingGraph,
        provider: &mut dyn EndPointProvider,
    ) -> Result<(), FetchError>;
}

/// Related-side class check shared by every agent.
fn check_related_class(
    end_point: &RelationEndPointDefinition,
    related: &RelationEndPointDefinition,
    fetched: &[LoadedObjectWithSource],
) -> Result<(), FetchError> {
    for item in fetched {
        if item.object.id().class() != related.class_name() {
            return Err(FetchError::WrongRelatedClass {
                end_point: end_point.to_string(),
                expected: related.class_name().clone(),
                actual: item.object.id().class().clone(),
            });
        }
    }

    Ok(())
}

/// The foreign-key property the related side stores the originator under.
fn foreign_key_property(
    related: &Arc<RelationEndPointDefinition>,
) -> Result<PropertyName, FetchError> {
    related
        .property_name()
        .cloned()
        .ok_or_else(|| FetchError::WrongEndPointShape {
            end_point: related.to_string(),
        })
}

fn originator_ids(originators: &[Option<ObjectHandle>]) -> HashSet<ObjectId> {
    originators
        .iter()
        .flatten()
        .map(|handle| handle.id().clone())
        .collect()
}

///
/// RealObjectRegistrationAgent
///
/// Real, single-valued end points carry the foreign key in the originator's
/// own data, so there is nothing to register. The agent only validates that
/// the fetched objects are of the related class.
///

pub struct RealObjectRegistrationAgent;

impl RelationDataRegistrationAgent for RealObjectRegistrationAgent {
    fn register(
        &self,
        definition: &Arc<RelationEndPointDefinition>,
        originators: &[Option<ObjectHandle>],
        fetched: &[LoadedObjectWithSource],
        graph: &MappingGraph,
        _provider: &mut dyn EndPointProvider,
    ) -> Result<(), FetchError> {
        let related = graph.opposite(definition)?;
        check_related_class(definition, related, fetched)?;

        for originator in originators.iter().flatten() {
            if originator.id().class() != definition.class_name() {
                return Err(FetchError::WrongRelatedClass {
                    end_point: definition.to_string(),
                    expected: definition.class_name().clone(),
                    actual: originator.id().class().clone(),
                });
            }
        }

        Ok(())
    }
}

///
/// VirtualObjectRegistrationAgent
///
/// 1:1 virtual side: each fetched object names its originator through the
/// real side's foreign key. At most one match per originator; zero matches
/// complete the end point with `None` unless the relation is mandatory.
///

pub struct VirtualObjectRegistrationAgent;

impl RelationDataRegistrationAgent for VirtualObjectRegistrationAgent {
    fn register(
        &self,
        definition: &Arc<RelationEndPointDefinition>,
        originators: &[Option<ObjectHandle>],
        fetched: &[LoadedObjectWithSource],
        graph: &MappingGraph,
        provider: &mut dyn EndPointProvider,
    ) -> Result<(), FetchError> {
        let related = graph.opposite(definition)?;
        check_related_class(definition, related, fetched)?;
        let fk_property = foreign_key_property(related)?;
        let known = originator_ids(originators);

        let mut matches: HashMap<ObjectId, ObjectHandle> = HashMap::new();
        for item in fetched {
            let Some(fk) = item.source.foreign_key(&fk_property) else {
                continue;
            };
            if !known.contains(fk) {
                continue;
            }
            if let Some(first) = matches.insert(fk.clone(), item.object.clone()) {
                return Err(FetchError::DuplicateForeignKey {
                    end_point: definition.to_string(),
                    object: fk.clone(),
                    first: first.id().clone(),
                    second: item.object.id().clone(),
                });
            }
        }

        for originator in originators.iter().flatten() {
            let id = RelationEndPointId::try_new(originator.id().clone(), Arc::clone(definition))?;
            let end_point = provider.get_or_create_virtual_end_point(&id)?;
            if end_point.is_data_complete() {
                continue;
            }

            let matched = matches.remove(originator.id());
            if matched.is_none() && definition.is_mandatory() {
                return Err(FetchError::MandatoryRelationViolation {
                    end_point: definition.to_string(),
                    object: originator.id().clone(),
                });
            }

            end_point
                .as_object_mut()
                .ok_or_else(|| FetchError::WrongEndPointShape {
                    end_point: id.to_string(),
                })?
                .mark_data_complete(matched)
                .map_err(FetchError::from)?;
        }

        Ok(())
    }
}

///
/// VirtualCollectionRegistrationAgent
///
/// 1:N virtual side: fetched objects are grouped by foreign key in result
/// order. Zero matches complete the end point with an empty set unless the
/// relation is mandatory.
///

pub struct VirtualCollectionRegistrationAgent;

impl RelationDataRegistrationAgent for VirtualCollectionRegistrationAgent {
    fn register(
        &self,
        definition: &Arc<RelationEndPointDefinition>,
        originators: &[Option<ObjectHandle>],
        fetched: &[LoadedObjectWithSource],
        graph: &MappingGraph,
        provider: &mut dyn EndPointProvider,
    ) -> Result<(), FetchError> {
        let related = graph.opposite(definition)?;
        check_related_class(definition, related, fetched)?;
        let fk_property = foreign_key_property(related)?;
        let known = originator_ids(originators);

        let mut groups: HashMap<ObjectId, Vec<ObjectHandle>> = HashMap::new();
        for item in fetched {
            let Some(fk) = item.source.foreign_key(&fk_property) else {
                continue;
            };
            if known.contains(fk) {
                groups.entry(fk.clone()).or_default().push(item.object.clone());
            }
        }

        for originator in originators.iter().flatten() {
            let id = RelationEndPointId::try_new(originator.id().clone(), Arc::clone(definition))?;
            let end_point = provider.get_or_create_virtual_end_point(&id)?;
            if end_point.is_data_complete() {
                continue;
            }

            let group = groups.remove(originator.id()).unwrap_or_default();
            if group.is_empty() && definition.is_mandatory() {
                return Err(FetchError::MandatoryRelationViolation {
                    end_point: definition.to_string(),
                    object: originator.id().clone(),
                });
            }

            end_point
                .as_collection_mut()
                .ok_or_else(|| FetchError::WrongEndPointShape {
                    end_point: id.to_string(),
                })?
                .mark_data_complete(group)
                .map_err(FetchError::from)?;
        }

        Ok(())
    }
}

//! Shared fixtures for unit tests: a small frozen mapping graph and handle
//! helpers.
//!
//! Fixture universe:
//! - `Customer` — virtual sides: `orders` (1:N, optional), `invoices`
//!   (1:N, mandatory), `profile` (1:1, optional), `card` (1:1, mandatory).
//! - `Order`, `Invoice`, `Profile`, `Card` — real foreign-key sides.

use crate::{
    identity::{ClassName, ObjectId, ObjectKey, PropertyName},
    metadata::{
        ClassDefinition, MappingGraph, MappingGraphBuilder, PropertyDefinition, PropertyType,
        RelationDefinition, RelationEndPointDefinition, RelationEndPointId, StorageClass,
    },
    object::ObjectHandle,
};
use std::sync::{Arc, OnceLock};
use ulid::Ulid;

pub(crate) fn class_name(name: &str) -> ClassName {
    ClassName::try_from_str(name).unwrap()
}

pub(crate) fn property_name(name: &str) -> PropertyName {
    PropertyName::try_from_str(name).unwrap()
}

pub(crate) fn object_id(class: &str, n: u128) -> ObjectId {
    ObjectId::new(class_name(class), ObjectKey::Ulid(Ulid(n)))
}

pub(crate) fn handle(class: &str, n: u128) -> ObjectHandle {
    ObjectHandle::new(object_id(class, n))
}

fn property(
    name: &str,
    declared_type: PropertyType,
    nullable: bool,
    storage_class: StorageClass,
) -> PropertyDefinition {
    PropertyDefinition::new(property_name(name), declared_type, nullable, storage_class)
}

fn real(class: &str, prop: &str, mandatory: bool) -> Arc<RelationEndPointDefinition> {
    Arc::new(RelationEndPointDefinition::Real {
        class: class_name(class),
        property: property_name(prop),
        mandatory,
    })
}

fn virtual_collection(class: &str, prop: &str, mandatory: bool) -> Arc<RelationEndPointDefinition> {
    Arc::new(RelationEndPointDefinition::VirtualCollection {
        class: class_name(class),
        property: property_name(prop),
        mandatory,
    })
}

fn virtual_object(class: &str, prop: &str, mandatory: bool) -> Arc<RelationEndPointDefinition> {
    Arc::new(RelationEndPointDefinition::VirtualObject {
        class: class_name(class),
        property: property_name(prop),
        mandatory,
    })
}

fn build_fixture_graph() -> MappingGraph {
    let mut builder = MappingGraphBuilder::new();

    let customer_orders = virtual_collection("Customer", "orders", false);
    let customer_invoices = virtual_collection("Customer", "invoices", true);
    let customer_profile = virtual_object("Customer", "profile", false);
    let customer_card = virtual_object("Customer", "card", true);
    let order_customer = real("Order", "customer", true);
    let invoice_customer = real("Invoice", "customer", true);
    let profile_owner = real("Profile", "owner", false);
    let card_owner = real("Card", "owner", false);

    let customer = ClassDefinition::new(class_name("Customer"), None, Some("main".to_string()));
    customer
        .set_property_definitions(vec![property(
            "name",
            PropertyType::Text,
            false,
            StorageClass::Persistent,
        )])
        .unwrap();
    customer
        .set_relation_end_point_definitions(vec![
            customer_orders.clone(),
            customer_invoices.clone(),
            customer_profile.clone(),
            customer_card.clone(),
        ])
        .unwrap();
    builder.add_class(customer).unwrap();

    let order = ClassDefinition::new(class_name("Order"), None, Some("main".to_string()));
    order
        .set_property_definitions(vec![
            property("number", PropertyType::Uint, false, StorageClass::Persistent),
            property(
                "customer",
                PropertyType::ObjectId,
                true,
                StorageClass::Persistent,
            ),
            property("note", PropertyType::Text, true, StorageClass::Transaction),
        ])
        .unwrap();
    order
        .set_relation_end_point_definitions(vec![order_customer.clone()])
        .unwrap();
    builder.add_class(order).unwrap();

    for (class, prop, end_point) in [
        ("Invoice", "customer", invoice_customer.clone()),
        ("Profile", "owner", profile_owner.clone()),
        ("Card", "owner", card_owner.clone()),
    ] {
        let definition = ClassDefinition::new(class_name(class), None, Some("main".to_string()));
        definition
            .set_property_definitions(vec![property(
                prop,
                PropertyType::ObjectId,
                true,
                StorageClass::Persistent,
            )])
            .unwrap();
        definition
            .set_relation_end_point_definitions(vec![end_point])
            .unwrap();
        builder.add_class(definition).unwrap();
    }

    for (id, real_side, other_side) in [
        ("Order->Customer", order_customer, customer_orders),
        ("Invoice->Customer", invoice_customer, customer_invoices),
        ("Profile->Customer", profile_owner, customer_profile),
        ("Card->Customer", card_owner, customer_card),
    ] {
        builder
            .add_relation(RelationDefinition::try_new(id, real_side, other_side).unwrap())
            .unwrap();
    }

    builder.build().unwrap()
}

pub(crate) fn fixture_graph() -> &'static Arc<MappingGraph> {
    static GRAPH: OnceLock<Arc<MappingGraph>> = OnceLock::new();

    GRAPH.get_or_init(|| Arc::new(build_fixture_graph()))
}

pub(crate) fn end_point_def(class: &str, prop: &str) -> Arc<RelationEndPointDefinition> {
    fixture_graph()
        .end_point_definition(&class_name(class), &property_name(prop))
        .unwrap()
        .clone()
}

pub(crate) fn end_point_id(class: &str, n: u128, prop: &str) -> RelationEndPointId {
    RelationEndPointId::try_new(object_id(class, n), end_point_def(class, prop)).unwrap()
}

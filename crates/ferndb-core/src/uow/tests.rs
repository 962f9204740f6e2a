use crate::{
    container::ValueAccess,
    error::{EngineError, ErrorClass, ErrorOrigin},
    fetch::{
        DataSourceRecord, EagerFetchQueryCollection, FetchError, FetchQuery, FetchQueryExecutor,
        LoadedObjectWithSource, QueryId,
    },
    identity::{ObjectId, ObjectKey},
    test_support::{class_name, end_point_def, end_point_id, handle, object_id, property_name},
    uow::{StorageAdapter, UnitOfWork},
    value::Value,
};
use std::{cell::RefCell, collections::BTreeMap, rc::Rc, sync::Arc};
use ulid::Ulid;

///
/// StubAdapter
///

#[derive(Default)]
struct StubAdapter {
    records: BTreeMap<ObjectId, DataSourceRecord>,
    log: Rc<RefCell<Vec<ObjectId>>>,
}

impl StorageAdapter for StubAdapter {
    fn load_record(&mut self, id: &ObjectId) -> Result<Option<DataSourceRecord>, EngineError> {
        self.log.borrow_mut().push(id.clone());

        Ok(self.records.get(id).cloned())
    }
}

fn order_record(number: u64, customer: Option<ObjectId>) -> DataSourceRecord {
    let mut values = BTreeMap::new();
    values.insert(property_name("number"), Value::Uint(number));
    values.insert(
        property_name("customer"),
        customer.map_or(Value::Null, Value::ObjectId),
    );

    DataSourceRecord::new(values)
}

fn uow_with(records: Vec<(ObjectId, DataSourceRecord)>) -> (UnitOfWork, Rc<RefCell<Vec<ObjectId>>>) {
    let log = Rc::new(RefCell::new(Vec::new()));
    let adapter = StubAdapter {
        records: records.into_iter().collect(),
        log: Rc::clone(&log),
    };

    (
        UnitOfWork::new(
            Arc::clone(crate::test_support::fixture_graph()),
            Box::new(adapter),
        ),
        log,
    )
}

#[test]
fn new_object_starts_at_declared_defaults() {
    let (mut uow, _) = uow_with(vec![]);

    let order = uow.new_object(&class_name("Order"), ObjectKey::Ulid(Ulid(1))).unwrap();
    assert!(uow.state(order.id()).unwrap().is_new());
    assert_eq!(
        uow.get_value(order.id(), &property_name("number"), ValueAccess::Current)
            .unwrap(),
        Value::Uint(0)
    );

    uow.commit().unwrap();
    assert!(uow.state(order.id()).unwrap().is_unchanged());
}

#[test]
fn a_second_object_with_the_same_id_is_a_conflict() {
    let (mut uow, _) = uow_with(vec![]);
    uow.new_object(&class_name("Order"), ObjectKey::Ulid(Ulid(1))).unwrap();

    let err = uow
        .new_object(&class_name("Order"), ObjectKey::Ulid(Ulid(1)))
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Conflict);
    assert_eq!(err.origin, ErrorOrigin::Transaction);
}

#[test]
fn unknown_class_is_rejected() {
    let (mut uow, _) = uow_with(vec![]);

    let err = uow
        .new_object(&class_name("Ghost"), ObjectKey::Ulid(Ulid(1)))
        .unwrap_err();
    assert_eq!(err.origin, ErrorOrigin::Metadata);
}

#[test]
fn placeholder_materializes_on_first_data_access() {
    let id = object_id("Order", 1);
    let (mut uow, log) = uow_with(vec![(
        id.clone(),
        order_record(7, Some(object_id("Customer", 1))),
    )]);

    uow.register_loaded(id.clone()).unwrap();
    assert!(uow.state(&id).unwrap().is_not_loaded_yet());
    assert!(log.borrow().is_empty());

    let number = uow
        .get_value(&id, &property_name("number"), ValueAccess::Current)
        .unwrap();
    assert_eq!(number, Value::Uint(7));
    assert!(uow.state(&id).unwrap().is_unchanged());
    assert_eq!(log.borrow().len(), 1);

    // Further accesses hit the materialized container, not the adapter.
    uow.get_value(&id, &property_name("customer"), ValueAccess::Current)
        .unwrap();
    assert_eq!(log.borrow().len(), 1);
}

#[test]
fn a_load_miss_invalidates_the_placeholder() {
    let id = object_id("Order", 1);
    let (mut uow, _) = uow_with(vec![]);
    uow.register_loaded(id.clone()).unwrap();

    let err = uow
        .get_value(&id, &property_name("number"), ValueAccess::Current)
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::InvalidState);
    assert_eq!(err.origin, ErrorOrigin::Container);
    assert!(uow.state(&id).unwrap().is_invalid());
}

#[test]
fn rollback_reverts_changes_and_discards_new_objects() {
    let id = object_id("Order", 1);
    let (mut uow, _) = uow_with(vec![(id.clone(), order_record(7, None))]);
    uow.register_loaded(id.clone()).unwrap();
    let new = uow.new_object(&class_name("Order"), ObjectKey::Ulid(Ulid(2))).unwrap();

    uow.set_value(&id, &property_name("number"), Value::Uint(8)).unwrap();
    assert!(uow.state(&id).unwrap().is_changed());

    uow.rollback().unwrap();

    assert_eq!(
        uow.get_value(&id, &property_name("number"), ValueAccess::Current)
            .unwrap(),
        Value::Uint(7)
    );
    assert!(uow.state(&id).unwrap().is_unchanged());
    assert!(!uow.contains(new.id()));
}

#[test]
fn commit_finalizes_deletions() {
    let id = object_id("Order", 1);
    let (mut uow, _) = uow_with(vec![(id.clone(), order_record(7, None))]);
    uow.register_loaded(id.clone()).unwrap();
    uow.get_value(&id, &property_name("number"), ValueAccess::Current)
        .unwrap();

    uow.delete(&id).unwrap();
    assert!(uow.state(&id).unwrap().is_deleted());

    uow.commit().unwrap();
    assert!(!uow.contains(&id));
}

#[test]
fn untouched_placeholders_survive_commit() {
    let id = object_id("Order", 1);
    let (mut uow, log) = uow_with(vec![]);
    uow.register_loaded(id.clone()).unwrap();

    uow.commit().unwrap();

    assert!(uow.state(&id).unwrap().is_not_loaded_yet());
    assert!(log.borrow().is_empty());
}

#[test]
fn loaded_containers_exclude_placeholders() {
    let loaded = object_id("Order", 1);
    let placeholder = object_id("Order", 2);
    let (mut uow, _) = uow_with(vec![(loaded.clone(), order_record(7, None))]);
    uow.register_loaded(loaded.clone()).unwrap();
    uow.register_loaded(placeholder).unwrap();
    uow.get_value(&loaded, &property_name("number"), ValueAccess::Current)
        .unwrap();

    let ids: Vec<_> = uow.loaded_containers().map(|c| c.id().clone()).collect();
    assert_eq!(ids, vec![loaded]);
}

#[test]
fn untracked_objects_are_not_found() {
    let (mut uow, _) = uow_with(vec![]);

    let err = uow
        .get_value(
            &object_id("Order", 9),
            &property_name("number"),
            ValueAccess::Current,
        )
        .unwrap_err();
    assert!(err.is_not_found());
}

///
/// OneShotExecutor
///

struct OneShotExecutor {
    rows: Vec<LoadedObjectWithSource>,
}

impl FetchQueryExecutor for OneShotExecutor {
    fn execute(&mut self, _query: &FetchQuery) -> Result<Vec<LoadedObjectWithSource>, FetchError> {
        Ok(self.rows.clone())
    }
}

#[test]
fn eager_fetch_registers_on_the_transaction_registry() {
    let (mut uow, _) = uow_with(vec![]);
    let originators = vec![Some(handle("Customer", 1))];

    let mut queries = EagerFetchQueryCollection::new();
    queries
        .add(
            end_point_def("Customer", "orders"),
            FetchQuery::new(QueryId::new("orders-by-customer"), "related by fk"),
        )
        .unwrap();

    let mut values = BTreeMap::new();
    values.insert(
        property_name("customer"),
        Value::ObjectId(object_id("Customer", 1)),
    );
    let mut executor = OneShotExecutor {
        rows: vec![LoadedObjectWithSource::new(
            handle("Order", 1),
            DataSourceRecord::new(values),
        )],
    };

    uow.eager_fetch(&originators, &queries, &mut executor).unwrap();

    let end_point = uow.virtual_end_point(&end_point_id("Customer", 1, "orders")).unwrap();
    assert!(end_point.is_data_complete());
    let data = end_point.as_collection().unwrap().data();
    assert_eq!(data.borrow().count(), 1);
}

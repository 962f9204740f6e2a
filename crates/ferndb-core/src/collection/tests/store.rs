use crate::{
    collection::{
        CollectionData, CollectionEnumerator, CollectionError, PlainCollectionData,
        SharedCollectionData,
    },
    test_support::{handle, object_id},
};
use std::{cell::RefCell, rc::Rc};

fn store_with(n: u128) -> PlainCollectionData {
    let mut store = PlainCollectionData::new();
    for i in 0..n {
        store.insert(store.count(), handle("Order", i)).unwrap();
    }

    store
}

#[test]
fn insert_and_lookup() {
    let store = store_with(3);

    assert_eq!(store.count(), 3);
    assert_eq!(store.get(1).unwrap().id(), &object_id("Order", 1));
    assert_eq!(store.index_of(&object_id("Order", 2)).unwrap(), Some(2));
    assert!(store.contains(&object_id("Order", 0)).unwrap());
    assert!(!store.contains(&object_id("Order", 9)).unwrap());
}

#[test]
fn failed_duplicate_insert_leaves_store_untouched() {
    let mut store = store_with(3);
    let version = store.version();

    let err = store.insert(1, handle("Order", 2)).unwrap_err();
    assert!(matches!(err, CollectionError::DuplicateObject { .. }));

    // Count, order, and version are exactly as before the failed call.
    assert_eq!(store.count(), 3);
    assert_eq!(store.version(), version);
    for i in 0..3u128 {
        assert_eq!(
            store.index_of(&object_id("Order", i)).unwrap(),
            Some(i as usize)
        );
    }
}

#[test]
fn failed_out_of_range_insert_leaves_store_untouched() {
    let mut store = store_with(2);
    let version = store.version();

    assert!(matches!(
        store.insert(5, handle("Order", 9)),
        Err(CollectionError::IndexOutOfRange { index: 5, count: 2 })
    ));
    assert_eq!(store.version(), version);
    assert_eq!(store.count(), 2);
}

#[test]
fn remove_missing_is_a_no_op_without_version_bump() {
    let mut store = store_with(2);
    let version = store.version();

    assert!(!store.remove_by_id(&object_id("Order", 9)).unwrap());
    assert_eq!(store.version(), version);
}

#[test]
fn replace_rejects_id_collision_with_other_slot() {
    let mut store = store_with(3);

    assert!(matches!(
        store.replace(0, handle("Order", 2)),
        Err(CollectionError::DuplicateObject { .. })
    ));

    // Replacing a slot with the same id is allowed.
    store.replace(0, handle("Order", 0)).unwrap();
    // And with a brand-new id.
    store.replace(0, handle("Order", 7)).unwrap();
    assert_eq!(store.index_of(&object_id("Order", 7)).unwrap(), Some(0));
    assert!(!store.contains(&object_id("Order", 0)).unwrap());
}

#[test]
fn sort_reorders_and_bumps_version() {
    let mut store = PlainCollectionData::new();
    for i in [3u128, 1, 2] {
        store.insert(store.count(), handle("Order", i)).unwrap();
    }
    let version = store.version();

    store.sort_by(&mut |a, b| a.id().cmp(b.id())).unwrap();

    assert!(store.version() > version);
    let ids: Vec<_> = (0..store.count())
        .map(|i| store.get(i).unwrap().id().clone())
        .collect();
    assert_eq!(
        ids,
        vec![
            object_id("Order", 1),
            object_id("Order", 2),
            object_id("Order", 3)
        ]
    );
}

#[test]
fn clear_on_empty_store_does_not_bump_version() {
    let mut store = PlainCollectionData::new();
    let version = store.version();
    store.clear().unwrap();
    assert_eq!(store.version(), version);
}

#[test]
fn enumerator_fails_when_mutation_falls_inside_the_walk() {
    let shared: SharedCollectionData = Rc::new(RefCell::new(store_with(4)));

    let mut enumerator = CollectionEnumerator::new(shared.clone());
    assert!(enumerator.try_next().unwrap().is_some());
    assert!(enumerator.try_next().unwrap().is_some());

    shared
        .borrow_mut()
        .insert(0, handle("Order", 99))
        .unwrap();

    assert!(matches!(
        enumerator.try_next(),
        Err(CollectionError::ModifiedDuringEnumeration { .. })
    ));
}

#[test]
fn enumerator_finished_before_mutation_is_unaffected() {
    let shared: SharedCollectionData = Rc::new(RefCell::new(store_with(2)));

    let mut enumerator = CollectionEnumerator::new(shared.clone());
    let mut seen = 0;
    while enumerator.try_next().unwrap().is_some() {
        seen += 1;
    }
    assert_eq!(seen, 2);

    shared.borrow_mut().insert(0, handle("Order", 9)).unwrap();

    // A fresh enumerator sees the new state.
    let restarted = CollectionEnumerator::new(shared);
    assert_eq!(restarted.count(), 3);
}

#[test]
fn enumerator_iterator_surface_yields_results() {
    let shared: SharedCollectionData = Rc::new(RefCell::new(store_with(3)));

    let ids: Result<Vec<_>, _> = CollectionEnumerator::new(shared)
        .map(|item| item.map(|handle| handle.id().clone()))
        .collect();
    assert_eq!(ids.unwrap().len(), 3);
}

use crate::{
    collection::{CollectionData, PlainCollectionData},
    test_support::{handle, object_id},
};
use proptest::prelude::*;

/// A single store mutation, with indices and ids drawn from a small pool so
/// duplicates and out-of-range accesses are hit often.
#[derive(Clone, Debug)]
enum Op {
    Insert { index: usize, id: u128 },
    Remove { id: u128 },
    Replace { index: usize, id: u128 },
    Sort,
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..12usize, 0..8u128).prop_map(|(index, id)| Op::Insert { index, id }),
        (0..8u128).prop_map(|id| Op::Remove { id }),
        (0..12usize, 0..8u128).prop_map(|(index, id)| Op::Replace { index, id }),
        Just(Op::Sort),
        Just(Op::Clear),
    ]
}

/// Reference model: ordered ids with no duplicates.
fn apply_model(model: &mut Vec<u128>, op: &Op) -> bool {
    match op {
        Op::Insert { index, id } => {
            if *index > model.len() || model.contains(id) {
                return false;
            }
            model.insert(*index, *id);
        }
        Op::Remove { id } => {
            let Some(position) = model.iter().position(|held| held == id) else {
                return false;
            };
            model.remove(position);
        }
        Op::Replace { index, id } => {
            if *index >= model.len() {
                return false;
            }
            if model[*index] != *id && model.contains(id) {
                return false;
            }
            model[*index] = *id;
        }
        Op::Sort => {
            if model.is_empty() {
                return false;
            }
            model.sort_unstable();
        }
        Op::Clear => {
            if model.is_empty() {
                return false;
            }
            model.clear();
        }
    }

    true
}

fn apply_store(store: &mut PlainCollectionData, op: &Op) -> bool {
    match op {
        Op::Insert { index, id } => store.insert(*index, handle("Order", *id)).is_ok(),
        Op::Remove { id } => store.remove_by_id(&object_id("Order", *id)).unwrap(),
        Op::Replace { index, id } => store.replace(*index, handle("Order", *id)).is_ok(),
        Op::Sort => {
            store.sort_by(&mut |a, b| a.id().cmp(b.id())).unwrap();
            !store_ids(store).is_empty()
        }
        Op::Clear => {
            let was_populated = store.count() > 0;
            store.clear().unwrap();
            was_populated
        }
    }
}

fn store_ids(store: &PlainCollectionData) -> Vec<u128> {
    (0..store.count())
        .map(|index| match store.get(index).unwrap().id().key() {
            crate::identity::ObjectKey::Ulid(ulid) => ulid.0,
            other => panic!("unexpected key: {other:?}"),
        })
        .collect()
}

proptest! {
    // Any operation sequence keeps the store in lockstep with the ordered
    // reference model, and the version only moves when contents did.
    #[test]
    fn store_tracks_ordered_model(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut model: Vec<u128> = Vec::new();
        let mut store = PlainCollectionData::new();

        for op in &ops {
            let version_before = store.version();
            let model_changed = apply_model(&mut model, op);
            let store_changed = apply_store(&mut store, op);

            prop_assert_eq!(model_changed, store_changed, "op {:?} diverged", op);
            if store_changed {
                prop_assert_ne!(store.version(), version_before);
            } else {
                prop_assert_eq!(store.version(), version_before);
            }

            prop_assert_eq!(store_ids(&store), model.clone());
            prop_assert_eq!(store.count(), model.len());
        }

        // Index and id lookups agree with the final order.
        for (index, id) in model.iter().enumerate() {
            let object = object_id("Order", *id);
            prop_assert_eq!(store.index_of(&object).unwrap(), Some(index));
            prop_assert!(store.contains(&object).unwrap());
        }
    }
}

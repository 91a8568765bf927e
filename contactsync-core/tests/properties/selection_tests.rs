//! Property tests for operator selection

use contactsync_core::models::ContactRecord;
use contactsync_core::store::AccumulationStore;
use proptest::prelude::*;

fn store_with(flags: &[bool]) -> AccumulationStore {
    let mut store = AccumulationStore::new();
    let batch = flags
        .iter()
        .enumerate()
        .map(|(i, selected)| {
            let mut record = ContactRecord::new(format!("Contact {i}")).expect("non-blank name");
            record.selected = *selected;
            record
        })
        .collect();
    store.merge_batch(batch);
    store
}

fn flags(store: &AccumulationStore) -> Vec<bool> {
    store.records().iter().map(|r| r.selected).collect()
}

proptest! {
    /// Property: one toggle_all always leaves a uniform selection
    #[test]
    fn toggle_all_is_uniform(initial in prop::collection::vec(any::<bool>(), 1..20)) {
        let mut store = store_with(&initial);
        let all_before = initial.iter().all(|s| *s);
        store.toggle_all();
        prop_assert!(flags(&store).iter().all(|s| *s != all_before));
    }

    /// Property: toggle_all twice restores a uniform selection
    #[test]
    fn toggle_all_twice_restores(len in 1usize..20, selected in any::<bool>()) {
        let initial = vec![selected; len];
        let mut store = store_with(&initial);
        store.toggle_all();
        store.toggle_all();
        prop_assert_eq!(flags(&store), initial);
    }

    /// Property: toggle_one flips exactly one record
    #[test]
    fn toggle_one_flips_one(
        initial in prop::collection::vec(any::<bool>(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut store = store_with(&initial);
        let index = pick.index(initial.len());
        prop_assert!(store.toggle_one(index));

        let after = flags(&store);
        for (i, (before, now)) in initial.iter().zip(&after).enumerate() {
            if i == index {
                prop_assert_ne!(before, now);
            } else {
                prop_assert_eq!(before, now);
            }
        }
    }

    /// Property: remove_one drops exactly that record and keeps the order
    #[test]
    fn remove_one_keeps_order(
        initial in prop::collection::vec(any::<bool>(), 1..20),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut store = store_with(&initial);
        let before: Vec<_> = store.records().to_vec();
        let index = pick.index(initial.len());

        let removed = store.remove_one(index).expect("index in bounds");
        prop_assert_eq!(&removed, &before[index]);

        let mut expected = before;
        expected.remove(index);
        prop_assert_eq!(store.records(), &expected[..]);
    }
}

//! Property tests for the accumulation merge

use std::collections::HashSet;

use contactsync_core::models::ContactRecord;
use contactsync_core::store::{IdentityStrategy, merge, merge_with};
use proptest::prelude::*;

/// Records drawn from a small name pool so collisions are common
fn record_strategy() -> impl Strategy<Value = ContactRecord> {
    (
        prop::sample::select(vec!["Ann", "Bo", "Cy", "Dee", "Eve", "ann", "Bo Bell"]),
        prop::option::of("[a-z]{1,6}@example\\.com"),
        prop::option::of("\\+?[0-9 ]{3,10}"),
        any::<bool>(),
    )
        .prop_map(|(name, email, phone, selected)| {
            let mut record = ContactRecord::new(name)
                .expect("pool names are non-blank")
                .with_email(email)
                .with_phone(phone);
            record.selected = selected;
            record
        })
}

fn batch_strategy() -> impl Strategy<Value = Vec<ContactRecord>> {
    prop::collection::vec(record_strategy(), 0..12)
}

proptest! {
    /// Property: no two records in a merged store share an identity
    #[test]
    fn merged_identities_are_unique(a in batch_strategy(), b in batch_strategy()) {
        let merged = merge(&merge(&[], a), b);
        let mut seen = HashSet::new();
        for record in &merged {
            prop_assert!(seen.insert(record.identity.clone()), "duplicate {}", record.identity);
        }
    }

    /// Property: the first record to introduce an identity is the one kept
    #[test]
    fn first_introducer_wins(a in batch_strategy(), b in batch_strategy()) {
        let merged = merge(&merge(&[], a.clone()), b.clone());
        for record in &merged {
            let first = a
                .iter()
                .chain(b.iter())
                .find(|r| r.identity == record.identity)
                .expect("merged record came from an input batch");
            prop_assert_eq!(record, first);
        }
    }

    /// Property: existing records are untouched and new ones keep batch order
    #[test]
    fn merge_preserves_order(a in batch_strategy(), b in batch_strategy()) {
        let existing = merge(&[], a);
        let merged = merge(&existing, b.clone());

        prop_assert_eq!(&merged[..existing.len()], &existing[..]);

        let mut cursor = b.iter();
        for appended in &merged[existing.len()..] {
            prop_assert!(cursor.any(|r| r == appended), "appended record out of batch order");
        }
    }

    /// Property: merging the same batch again adds nothing
    #[test]
    fn merge_is_idempotent(a in batch_strategy()) {
        let once = merge(&[], a.clone());
        let twice = merge(&once, a);
        prop_assert_eq!(once, twice);
    }

    /// Property: the composite key keeps same-name people with different contacts
    #[test]
    fn composite_key_is_unique(a in batch_strategy(), b in batch_strategy()) {
        let strategy = IdentityStrategy::NameAndContact;
        let merged = merge_with(&merge_with(&[], a.clone(), strategy), b, strategy);

        let keys: HashSet<_> = merged.iter().map(|r| strategy.key(r)).collect();
        prop_assert_eq!(keys.len(), merged.len());

        let by_name = merge(&[], a);
        prop_assert!(merged.len() >= by_name.len());
    }
}

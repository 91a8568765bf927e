//! Operator selection over the accumulated records.

use crate::models::ContactRecord;

use super::accumulation::AccumulationStore;

impl AccumulationStore {
    /// Flips `selected` on the record at `index`.
    ///
    /// Returns `false` if `index` is out of bounds.
    pub fn toggle_one(&mut self, index: usize) -> bool {
        if let Some(record) = self.records.get_mut(index) {
            record.selected = !record.selected;
            true
        } else {
            false
        }
    }

    /// Deselects everything if all records are selected, otherwise selects all
    pub fn toggle_all(&mut self) {
        let target = !self.all_selected();
        for record in &mut self.records {
            record.selected = target;
        }
    }

    /// Removes the record at `index` for the rest of the session.
    ///
    /// A later batch may bring the same identity back.
    pub fn remove_one(&mut self, index: usize) -> Option<ContactRecord> {
        (index < self.records.len()).then(|| self.records.remove(index))
    }

    /// Returns true when every record is selected (vacuously true when empty)
    #[must_use]
    pub fn all_selected(&self) -> bool {
        self.records.iter().all(|r| r.selected)
    }

    /// Returns the selected records in store order
    pub fn selected(&self) -> impl Iterator<Item = &ContactRecord> {
        self.records.iter().filter(|r| r.selected)
    }

    /// Returns the number of selected records
    #[must_use]
    pub fn selected_count(&self) -> usize {
        self.selected().count()
    }

    /// Returns the indices of every record with this display name, in store order.
    ///
    /// Under [`IdentityStrategy::NameAndContact`](super::IdentityStrategy)
    /// several records may share a name.
    #[must_use]
    pub fn positions(&self, identity: &str) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.identity == identity)
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::IdentityStrategy;

    fn store_of(names: &[&str]) -> AccumulationStore {
        let mut store = AccumulationStore::new();
        store.merge_batch(
            names
                .iter()
                .filter_map(|n| ContactRecord::new(n))
                .collect(),
        );
        store
    }

    fn flags(store: &AccumulationStore) -> Vec<bool> {
        store.records().iter().map(|r| r.selected).collect()
    }

    #[test]
    fn toggle_one_flips_single_record() {
        let mut store = store_of(&["A", "B"]);
        assert!(store.toggle_one(1));
        assert_eq!(flags(&store), vec![true, false]);
        assert!(!store.toggle_one(5));
    }

    #[test]
    fn toggle_all_deselects_when_fully_selected() {
        let mut store = store_of(&["A", "B", "C"]);
        store.toggle_all();
        assert_eq!(flags(&store), vec![false, false, false]);
    }

    #[test]
    fn toggle_all_selects_when_partially_selected() {
        let mut store = store_of(&["A", "B", "C"]);
        store.toggle_one(0);
        store.toggle_all();
        assert_eq!(flags(&store), vec![true, true, true]);
    }

    #[test]
    fn remove_one_is_not_sticky() {
        let mut store = store_of(&["A", "B"]);
        let removed = store.remove_one(0);
        assert_eq!(removed.map(|r| r.identity), Some("A".to_string()));
        assert!(store.remove_one(3).is_none());

        store.merge_batch(vec![ContactRecord::new("A").unwrap()]);
        assert_eq!(store.positions("A"), vec![1]);
        assert!(store.positions("Z").is_empty());
    }

    #[test]
    fn positions_finds_every_record_sharing_a_name() {
        let mut store = AccumulationStore::with_strategy(IdentityStrategy::NameAndContact);
        store.merge_batch(vec![
            ContactRecord::new("Ann Lee")
                .unwrap()
                .with_email(Some("ann@work.example")),
            ContactRecord::new("Bo Bell").unwrap(),
            ContactRecord::new("Ann Lee")
                .unwrap()
                .with_email(Some("ann@home.example")),
        ]);

        assert_eq!(store.positions("Ann Lee"), vec![0, 2]);
        for index in store.positions("Ann Lee").into_iter().rev() {
            store.remove_one(index);
        }
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].identity, "Bo Bell");
    }

    #[test]
    fn selected_count_tracks_toggles() {
        let mut store = store_of(&["A", "B", "C"]);
        store.toggle_one(2);
        assert_eq!(store.selected_count(), 2);
        assert!(!store.all_selected());
    }
}

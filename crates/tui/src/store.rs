//! In-memory mirror of the remote transaction collection.
//!
//! The store is the only owner of the local sequence. A fetch replaces it
//! wholesale, create/update/delete patch it in place, and every mutation
//! keeps ids unique.

use std::collections::HashMap;

use api_types::transaction::{Transaction, TransactionId};

#[derive(Debug, Clone, Default)]
pub struct TransactionStore {
    items: Vec<Transaction>,
}

impl TransactionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sequence with a fetched collection.
    ///
    /// Duplicate ids collapse onto the position of their first occurrence,
    /// holding the value of the last one.
    pub fn replace_all(&mut self, items: Vec<Transaction>) {
        let mut positions: HashMap<TransactionId, usize> = HashMap::with_capacity(items.len());
        let mut deduped: Vec<Transaction> = Vec::with_capacity(items.len());
        for tx in items {
            match positions.get(&tx.id) {
                Some(&index) => deduped[index] = tx,
                None => {
                    positions.insert(tx.id.clone(), deduped.len());
                    deduped.push(tx);
                }
            }
        }
        self.items = deduped;
    }

    /// Reconciles a created record: appended, or replaced in place if the
    /// id is already present.
    pub fn upsert(&mut self, record: Transaction) {
        match self.position(&record.id) {
            Some(index) => self.items[index] = record,
            None => self.items.push(record),
        }
    }

    /// Reconciles an updated record into the slot held by `target`.
    ///
    /// If `target` is no longer present the record is upserted. If the
    /// canonical id differs from `target`, any other entry already holding
    /// the canonical id is dropped.
    pub fn replace(&mut self, target: &TransactionId, record: Transaction) {
        let Some(index) = self.position(target) else {
            self.upsert(record);
            return;
        };

        let canonical = record.id.clone();
        self.items[index] = record;
        if canonical != *target {
            let mut position = 0;
            self.items.retain(|tx| {
                let keep = position == index || tx.id != canonical;
                position += 1;
                keep
            });
        }
    }

    /// Removes the entry with `id`. Returns `false` if nothing matched.
    pub fn remove(&mut self, id: &TransactionId) -> bool {
        let before = self.items.len();
        self.items.retain(|tx| tx.id != *id);
        self.items.len() != before
    }

    pub fn get(&self, id: &TransactionId) -> Option<&Transaction> {
        self.items.iter().find(|tx| tx.id == *id)
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.items.iter().position(|tx| tx.id == *id)
    }
}

#[cfg(test)]
mod tests {
    use api_types::transaction::{Amount, TransactionKind};

    use super::*;

    fn tx(id: &str, amount: f64) -> Transaction {
        Transaction {
            id: id.into(),
            kind: TransactionKind::Income,
            category: "salary".to_string(),
            amount: Amount::Number(amount),
            date: "2024-05-01T10:00:00Z".to_string(),
            description: String::new(),
        }
    }

    fn ids(store: &TransactionStore) -> Vec<&str> {
        store.as_slice().iter().map(|tx| tx.id.as_str()).collect()
    }

    #[test]
    fn replace_all_discards_previous_state() {
        let mut store = TransactionStore::new();
        store.upsert(tx("old", 1.0));
        store.replace_all(vec![tx("1", 1.0), tx("2", 2.0)]);
        assert_eq!(ids(&store), ["1", "2"]);
    }

    #[test]
    fn replace_all_collapses_duplicate_ids() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("1", 1.0), tx("2", 2.0), tx("1", 9.0)]);
        assert_eq!(ids(&store), ["1", "2"]);
        assert_eq!(store.as_slice()[0].amount, Amount::Number(9.0));
    }

    #[test]
    fn upsert_appends_new_ids() {
        let mut store = TransactionStore::new();
        store.upsert(tx("1", 1.0));
        store.upsert(tx("2", 2.0));
        assert_eq!(ids(&store), ["1", "2"]);
    }

    #[test]
    fn upsert_replaces_existing_id_in_place() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("1", 1.0), tx("2", 2.0)]);
        store.upsert(tx("1", 5.0));
        assert_eq!(ids(&store), ["1", "2"]);
        assert_eq!(store.as_slice()[0].amount, Amount::Number(5.0));
    }

    #[test]
    fn replace_keeps_position() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("1", 1.0), tx("2", 2.0), tx("3", 3.0)]);
        store.replace(&"2".into(), tx("2", 20.0));
        assert_eq!(ids(&store), ["1", "2", "3"]);
        assert_eq!(store.get(&"2".into()).unwrap().amount, Amount::Number(20.0));
    }

    #[test]
    fn replace_of_missing_target_appends() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("1", 1.0)]);
        store.replace(&"9".into(), tx("9", 9.0));
        assert_eq!(ids(&store), ["1", "9"]);
    }

    #[test]
    fn replace_with_new_canonical_id_stays_unique() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("1", 1.0), tx("2", 2.0), tx("3", 3.0)]);
        store.replace(&"3".into(), tx("1", 30.0));
        assert_eq!(ids(&store), ["2", "1"]);
        assert_eq!(store.get(&"1".into()).unwrap().amount, Amount::Number(30.0));
    }

    #[test]
    fn remove_filters_by_id() {
        let mut store = TransactionStore::new();
        store.replace_all(vec![tx("1", 1.0), tx("2", 2.0)]);
        assert!(store.remove(&"1".into()));
        assert!(!store.remove(&"1".into()));
        assert_eq!(ids(&store), ["2"]);
    }
}

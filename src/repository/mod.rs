use log::{debug, info};
use uuid::Uuid;
use crate::common::StorageError;
use crate::store::{KeyValueStorage, Store};
use crate::transaction::{Draft, Transaction};
use crate::util::MonthKey;

/// Owns the transaction collection for the lifetime of the program. Every mutation is saved
/// before the call returns, so storage never lags behind what callers can observe.
pub(crate) struct TransactionRepository<S: KeyValueStorage> {
    transactions: Vec<Transaction>,
    store: Store<S>,
}

impl<S: KeyValueStorage> TransactionRepository<S> {
    /// Build the repository from whatever the store currently holds.
    pub(crate) fn load(store: Store<S>) -> TransactionRepository<S> {
        let transactions = store.load();
        info!("Loaded {} transactions", transactions.len());
        TransactionRepository { transactions, store }
    }

    pub(crate) fn add(&mut self, draft: Draft) -> Result<Transaction, StorageError> {
        let t = Transaction::new(self.next_id(), draft);
        self.transactions.push(t.clone());
        if let Err(e) = self.save() {
            self.transactions.pop();
            return Err(e);
        }
        info!("Added {} transaction {}", t.kind, t.id);
        Ok(t)
    }

    /// Replace every field of transaction `id` except the id itself. Returns `false` if there is
    /// no such transaction, in which case nothing is written.
    pub(crate) fn update(&mut self, id: &str, draft: Draft) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let previous = self.transactions[index].clone();
        self.transactions[index].apply(draft);
        if let Err(e) = self.save() {
            self.transactions[index] = previous;
            return Err(e);
        }
        info!("Updated transaction {id}");
        Ok(true)
    }

    /// Remove transaction `id`. Returns `false` if it didn't exist.
    pub(crate) fn delete(&mut self, id: &str) -> Result<bool, StorageError> {
        let Some(index) = self.position(id) else {
            return Ok(false);
        };
        let removed = self.transactions.remove(index);
        if let Err(e) = self.save() {
            self.transactions.insert(index, removed);
            return Err(e);
        }
        info!("Deleted transaction {id}");
        Ok(true)
    }

    pub(crate) fn clear(&mut self) -> Result<usize, StorageError> {
        let previous = std::mem::take(&mut self.transactions);
        if let Err(e) = self.save() {
            self.transactions = previous;
            return Err(e);
        }
        info!("Deleted all {} transactions", previous.len());
        Ok(previous.len())
    }

    /// Transactions dated within `month`, most recent first. Transactions on the same day stay
    /// in the order they were added.
    pub(crate) fn by_month(&self, month: MonthKey) -> Vec<&Transaction> {
        let mut results: Vec<&Transaction> = self.in_month(month).collect();
        results.sort_by(|a, b| b.date.cmp(&a.date));
        results
    }

    /// Transactions dated within `month`, in the order they were added.
    pub(crate) fn in_month(&self, month: MonthKey) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().filter(move |t| month.contains(t.date))
    }

    pub(crate) fn all(&self) -> &[Transaction] {
        &self.transactions
    }

    pub(crate) fn get(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Resolve a full id or a unique id prefix, as typed at the prompt.
    pub(crate) fn resolve(&self, prefix: &str) -> Option<&str> {
        if let Some(t) = self.get(prefix) {
            return Some(t.id.as_str());
        }
        let mut matches = self.transactions.iter().filter(|t| t.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(t), None) if !prefix.is_empty() => Some(t.id.as_str()),
            _ => None,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.transactions.iter().position(|t| t.id == id)
    }

    fn next_id(&self) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if self.get(&id).is_none() {
                return id;
            }
            debug!("Generated id {id} already exists, retrying");
        }
    }

    /// Write the whole collection. Callers undo their in-memory change when this fails.
    fn save(&mut self) -> Result<(), StorageError> {
        self.store.save(&self.transactions)
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &Store<S> {
        &self.store
    }

    #[cfg(test)]
    pub(crate) fn store_mut(&mut self) -> &mut Store<S> {
        &mut self.store
    }
}

// Session context - the acting center, passed explicitly
//
// Operations take the session as an argument instead of reading an ambient
// logged-in-user global. The session's user record mirrors the store; a
// submission updates both the collection document and the session mirror.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::db::{KvStore, UserRepository};
use crate::entities::{BatchItem, Transaction, User};

/// The logged-in center for one sequence of operations.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn new(user: User) -> Self {
        Session { user }
    }

    /// Record a submitted batch of weighed materials.
    ///
    /// Builds the transaction, prepends it to the center's history, and
    /// persists the whole user record (collection entry plus session
    /// mirror). A batch that is empty after weight filtering is a no-op:
    /// `Ok(None)` and no store write of any kind.
    pub fn submit_batch<S: KvStore>(
        &mut self,
        repo: &mut UserRepository<S>,
        batch: &[BatchItem],
        at: DateTime<Utc>,
    ) -> Result<Option<Transaction>> {
        let Some(tx) = Transaction::from_batch(batch, at) else {
            return Ok(None);
        };

        self.user.push_transaction(tx.clone());
        repo.update_user(&self.user)?;
        Ok(Some(tx))
    }

    /// Transaction history, most recent first.
    pub fn history(&self) -> &[Transaction] {
        &self.user.transactions
    }

    /// Grand totals for the history footer: (weight in kg, points).
    pub fn history_totals(&self) -> (f64, f64) {
        (self.user.total_weight(), self.user.total_points())
    }
}

// User entity - a registered recycling center account
//
// Identity is a UUID assigned at registration; the transaction history grows
// monotonically, most recent first, and existing records are never touched.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::transaction::{StoredTransaction, Transaction};

/// A registered center: credentials, display fields, and the full
/// transaction history (most recent first).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Stable identity (UUID).
    pub id: String,

    pub center_name: String,
    pub address: String,
    pub email: String,

    /// SHA-256 hex digest of the password.
    pub password_hash: String,

    pub registered_at: DateTime<Utc>,

    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl User {
    pub fn new(
        center_name: String,
        address: String,
        email: String,
        password_hash: String,
        registered_at: DateTime<Utc>,
    ) -> Self {
        User {
            id: uuid::Uuid::new_v4().to_string(),
            center_name,
            address,
            email,
            password_hash,
            registered_at,
            transactions: Vec::new(),
        }
    }

    /// Prepend a newly recorded transaction. History is most recent first.
    pub fn push_transaction(&mut self, tx: Transaction) {
        self.transactions.insert(0, tx);
    }

    /// Grand total of recorded points across the whole history.
    /// Summed over stored (already rounded) per-transaction values.
    pub fn total_points(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.points).sum()
    }

    /// Grand total of recorded weight in kilograms.
    pub fn total_weight(&self) -> f64 {
        self.transactions.iter().map(|tx| tx.total_weight).sum()
    }
}

/// Stored user record: display fields plus transactions in whatever record
/// shape they were written with. Normalized to `User` once at load.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredUser {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(alias = "centerName")]
    pub center_name: String,

    pub address: String,
    pub email: String,

    #[serde(alias = "password")]
    pub password_hash: String,

    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub transactions: Vec<StoredTransaction>,
}

impl StoredUser {
    pub fn normalize(self) -> User {
        User {
            id: self
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            center_name: self.center_name,
            address: self.address,
            email: self.email,
            password_hash: self.password_hash,
            registered_at: self.registered_at.unwrap_or(DateTime::UNIX_EPOCH),
            transactions: self
                .transactions
                .into_iter()
                .map(StoredTransaction::normalize)
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::transaction::BatchItem;
    use crate::rates::MaterialKind;

    fn at() -> DateTime<Utc> {
        "2024-06-01T12:00:00Z".parse().unwrap()
    }

    fn user() -> User {
        User::new(
            "Green Depot".to_string(),
            "12 Jalan Hijau".to_string(),
            "depot@example.com".to_string(),
            "hash".to_string(),
            at(),
        )
    }

    #[test]
    fn test_new_user_has_empty_history() {
        let user = user();
        assert!(user.transactions.is_empty());
        assert_eq!(user.total_points(), 0.0);
        assert_eq!(user.total_weight(), 0.0);
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut user = user();

        let first =
            Transaction::from_batch(&[BatchItem::new(MaterialKind::Plastic, 10.0)], at()).unwrap();
        let second =
            Transaction::from_batch(&[BatchItem::new(MaterialKind::Glass, 4.0)], at()).unwrap();

        user.push_transaction(first.clone());
        user.push_transaction(second.clone());

        assert_eq!(user.transactions.len(), 2);
        assert_eq!(user.transactions[0].id, second.id);
        assert_eq!(user.transactions[1].id, first.id);
    }

    #[test]
    fn test_grand_totals_sum_all_transactions() {
        let mut user = user();
        for _ in 0..3 {
            let tx = Transaction::from_batch(
                &[
                    BatchItem::new(MaterialKind::Plastic, 10.0),
                    BatchItem::new(MaterialKind::Glass, 4.0),
                ],
                at(),
            )
            .unwrap();
            user.push_transaction(tx);
        }

        assert_eq!(user.transactions.len(), 3);
        assert!((user.total_points() - 3.0 * 1.70).abs() < 1e-9);
        assert!((user.total_weight() - 42.0).abs() < 1e-9);
    }

    #[test]
    fn test_stored_user_normalizes_legacy_fields() {
        // original field names, no id, mixed transaction shapes
        let json = r#"{
            "centerName": "Old Depot",
            "address": "1 Recycle Way",
            "email": "old@example.com",
            "password": "plain",
            "transactions": [
                {"date": "1/2/2023, 9:00:00 AM", "material": "glass", "weight": 4.0, "points": "1.00"}
            ]
        }"#;

        let stored: StoredUser = serde_json::from_str(json).unwrap();
        let user = stored.normalize();

        assert!(!user.id.is_empty());
        assert_eq!(user.center_name, "Old Depot");
        assert_eq!(user.transactions.len(), 1);
        assert_eq!(user.total_points(), 1.0);
        assert_eq!(user.total_weight(), 4.0);
    }

    #[test]
    fn test_stored_user_without_transactions_field() {
        let json = r#"{
            "center_name": "Bare Depot",
            "address": "2 Recycle Way",
            "email": "bare@example.com",
            "password_hash": "hash"
        }"#;

        let stored: StoredUser = serde_json::from_str(json).unwrap();
        let user = stored.normalize();
        assert!(user.transactions.is_empty());
        assert_eq!(user.total_points(), 0.0);
    }
}

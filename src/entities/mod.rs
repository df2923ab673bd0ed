// Entity models: recorded transactions and registered centers

pub mod transaction;
pub mod user;

pub use transaction::{round_points, BatchItem, LineItem, StoredTransaction, Transaction};
pub use user::{StoredUser, User};

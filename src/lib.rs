// Kitakitar - Recycling Rewards Tracker - Core Library
// Exposes all modules for use in the CLI, TUI, and tests

pub mod auth;
pub mod db;
pub mod entities;
pub mod leaderboard;
pub mod qr;
pub mod rates;
pub mod session;

// Re-export commonly used types
pub use auth::{
    hash_password, login, logout, register, request_password_reset, restore_session, AuthError,
    Registration, ResetRequest,
};
pub use db::{KvStore, MemoryStore, SqliteStore, UserRepository, SESSION_KEY, USERS_KEY};
pub use entities::{round_points, BatchItem, LineItem, StoredTransaction, StoredUser, Transaction, User};
pub use leaderboard::{rank_centers, LeaderboardEntry, Tier};
pub use qr::RedemptionPayload;
pub use rates::{MaterialKind, UnknownMaterial, ALL_MATERIALS};
pub use session::Session;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

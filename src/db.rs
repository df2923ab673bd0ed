// 🗄️ Key-value repository - whole-document JSON persistence
//
// The store holds two string-valued keys: the registered-user collection and
// a session mirror of the logged-in user. Documents are read and written
// whole; the last writer wins. The `KvStore` trait keeps the backend
// swappable: SQLite for the binary, an in-memory map for tests.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;

use crate::entities::{StoredUser, User};

/// Store key for the collection of all registered centers.
pub const USERS_KEY: &str = "kitakitar_users";

/// Store key mirroring the currently logged-in center.
pub const SESSION_KEY: &str = "kitakitar_user";

// ============================================================================
// KV STORE BACKENDS
// ============================================================================

/// String-valued key-value store with whole-document semantics.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn put(&mut self, key: &str, value: &str) -> Result<()>;
    fn delete(&mut self, key: &str) -> Result<()>;
}

/// HashMap-backed store for tests. Counts writes so tests can assert that
/// a no-op submission performs no store write.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    put_count: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn put_count(&self) -> usize {
        self.put_count
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.put_count += 1;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// SQLite-backed store used by the binary. Single `kv` table, WAL mode.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open store at {}", path.display()))?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            [],
        )?;
        Ok(SqliteStore { conn })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    fn delete(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ============================================================================
// USER REPOSITORY
// ============================================================================

/// Typed access to the two documents. Loading runs legacy-record
/// normalization once; everything downstream sees only current shapes.
pub struct UserRepository<S: KvStore> {
    pub store: S,
}

impl<S: KvStore> UserRepository<S> {
    pub fn new(store: S) -> Self {
        UserRepository { store }
    }

    /// Load the full registered-center collection. A missing key is an
    /// empty collection, not an error.
    pub fn load_users(&self) -> Result<Vec<User>> {
        match self.store.get(USERS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => {
                let stored: Vec<StoredUser> = serde_json::from_str(&raw)
                    .context("user collection document is not valid JSON")?;
                Ok(stored.into_iter().map(StoredUser::normalize).collect())
            }
        }
    }

    /// Overwrite the whole collection document.
    pub fn save_users(&mut self, users: &[User]) -> Result<()> {
        let raw = serde_json::to_string(users)?;
        self.store.put(USERS_KEY, &raw)
    }

    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.load_users()?.into_iter().find(|u| u.email == email))
    }

    pub fn load_session(&self) -> Result<Option<User>> {
        match self.store.get(SESSION_KEY)? {
            None => Ok(None),
            Some(raw) => {
                let stored: StoredUser = serde_json::from_str(&raw)
                    .context("session document is not valid JSON")?;
                Ok(Some(stored.normalize()))
            }
        }
    }

    pub fn save_session(&mut self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.store.put(SESSION_KEY, &raw)
    }

    pub fn clear_session(&mut self) -> Result<()> {
        self.store.delete(SESSION_KEY)
    }

    /// Write an updated user back: replace its entry in the collection
    /// (matched by email) and refresh the session mirror.
    pub fn update_user(&mut self, user: &User) -> Result<()> {
        let mut users = self.load_users()?;
        if let Some(entry) = users.iter_mut().find(|u| u.email == user.email) {
            *entry = user.clone();
            self.save_users(&users)?;
        }
        self.save_session(user)
    }
}

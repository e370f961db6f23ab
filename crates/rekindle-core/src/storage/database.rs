//! SQLite-backed snapshot persistence for the entity store.
//!
//! The persisted layout mirrors the logical model: one id-keyed table
//! per entity kind, each row holding the serialized entity. No ordering
//! is implied beyond each run's embedded event sequence. Saving a
//! snapshot runs in a single immediate transaction, so a competing
//! writer surfaces as a conflict instead of a silent partial write.

use rusqlite::{params, Connection};

use crate::error::{CoreError, DatabaseError, Result};
use crate::journal::Memory;
use crate::pledge::{Pledge, Return};
use crate::repair::Repair;
use crate::store::Store;
use crate::user::User;

use super::data_dir;

/// SQLite database holding one user's pledge state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/rekindle/rekindle.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()
            .map_err(|e| {
                CoreError::Database(DatabaseError::QueryFailed(format!(
                    "cannot resolve data directory: {e}"
                )))
            })?
            .join("rekindle.db");
        let conn = Connection::open(&path).map_err(|source| {
            CoreError::Database(DatabaseError::OpenFailed { path, source })
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| CoreError::Database(DatabaseError::QueryFailed(e.to_string())))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id   TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS pledges (
                id   TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS repairs (
                id   TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS returns (
                id   TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS memories (
                id   TEXT PRIMARY KEY,
                data TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Load the full store snapshot.
    ///
    /// An empty database yields a fresh store for `default_user_name`.
    pub fn load(&self, default_user_name: &str) -> Result<Store> {
        let user = match self.load_rows::<User>("users")?.into_iter().next() {
            Some(user) => user,
            None => User::new(default_user_name),
        };
        let mut store = Store::new(user);

        for pledge in self.load_rows::<Pledge>("pledges")? {
            store.upsert_pledge(pledge);
        }
        for repair in self.load_rows::<Repair>("repairs")? {
            store.upsert_repair(repair);
        }
        for record in self.load_rows::<Return>("returns")? {
            store.upsert_return(record);
        }
        for memory in self.load_rows::<Memory>("memories")? {
            store.upsert_memory(memory);
        }
        Ok(store)
    }

    /// Persist the full store snapshot, replacing the previous one.
    pub fn save(&self, store: &Store) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE TRANSACTION;")?;
        let result: Result<()> = (|| {
            for table in ["users", "pledges", "repairs", "returns", "memories"] {
                self.conn.execute(&format!("DELETE FROM {table}"), [])?;
            }

            let user = store.user();
            self.insert("users", &user.id, user)?;
            for pledge in store.list_pledges() {
                self.insert("pledges", &pledge.id, pledge)?;
            }
            for repair in store.list_repairs() {
                self.insert("repairs", &repair.id, repair)?;
            }
            for record in store.list_returns() {
                self.insert("returns", &record.id, record)?;
            }
            for memory in store.memories_for(None) {
                self.insert("memories", &memory.id, memory)?;
            }
            Ok(())
        })();

        match result {
            Ok(()) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(())
            }
            Err(err) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(err)
            }
        }
    }

    fn insert<T: serde::Serialize>(&self, table: &str, id: &str, entity: &T) -> Result<()> {
        let data = serde_json::to_string(entity)?;
        self.conn.execute(
            &format!("INSERT OR REPLACE INTO {table} (id, data) VALUES (?1, ?2)"),
            params![id, data],
        )?;
        Ok(())
    }

    fn load_rows<T: serde::de::DeserializeOwned>(&self, table: &str) -> Result<Vec<T>> {
        let mut stmt = self.conn.prepare(&format!("SELECT data FROM {table}"))?;
        let mut rows = stmt.query([])?;
        let mut entities = Vec::new();
        while let Some(row) = rows.next()? {
            let data: String = row.get(0)?;
            let entity = serde_json::from_str(&data).map_err(|e| {
                CoreError::Database(DatabaseError::CorruptRecord {
                    table: table.to_string(),
                    message: e.to_string(),
                })
            })?;
            entities.push(entity);
        }
        Ok(entities)
    }
}

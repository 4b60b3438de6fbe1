//! In-process row store.
//!
//! Used for local development (`database.backend = "memory"`) and by the
//! integration tests. Behaves like the MySQL schema where handlers can
//! observe a difference: usernames are unique, empty rows are rejected and
//! search follows case-insensitive `LIKE` rules.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde_json::Value;

use super::pattern::{contains_pattern, like_matches};
use super::{
    first_invalid_column, NewUser, Row, RowStore, StoreError, StoreResult, Table, UserRecord,
};

#[derive(Default)]
struct Tables {
    users: Vec<UserRecord>,
    rows: HashMap<Table, Vec<Row>>,
}

/// Row store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> StoreResult<()> {
        let mut tables = self.lock()?;
        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::Duplicate(format!("users.username '{}'", user.username)));
        }
        tables.users.push(UserRecord {
            username: user.username.clone(),
            password: user.password.clone(),
            role: user.role.clone(),
        });
        Ok(())
    }

    async fn find_user(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let tables = self.lock()?;
        Ok(tables.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_row(&self, table: Table, row: &Row) -> StoreResult<()> {
        if row.is_empty() {
            return Err(StoreError::InvalidRow(format!("no columns for {table}")));
        }
        if let Some(column) = first_invalid_column(row) {
            return Err(StoreError::InvalidRow(format!("bad column name '{column}'")));
        }
        let mut tables = self.lock()?;
        tables.rows.entry(table).or_default().push(row.clone());
        Ok(())
    }

    async fn fetch_all(&self, table: Table) -> StoreResult<Vec<Row>> {
        let tables = self.lock()?;
        Ok(tables.rows.get(&table).cloned().unwrap_or_default())
    }

    async fn search_reports(&self, needle: &str) -> StoreResult<Vec<Row>> {
        let pattern = contains_pattern(needle);
        let tables = self.lock()?;
        let matches = tables
            .rows
            .get(&Table::Report)
            .map(|rows| {
                rows.iter()
                    .filter(|row| match row.get("lecturer_name") {
                        Some(Value::String(name)) => like_matches(&pattern, name),
                        // NULL never matches LIKE; other scalars compare as text.
                        Some(Value::Null) | None => false,
                        Some(other) => like_matches(&pattern, &other.to_string()),
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(matches)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.lock().map(|_| ())
    }
}

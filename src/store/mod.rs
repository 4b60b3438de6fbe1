//! Row store subsystem.
//!
//! # Data Flow
//! ```text
//! api handler
//!     → RowStore trait (one call per request)
//!     → mysql.rs (sqlx pool, parameterized statements)
//!       or memory.rs (in-process tables, dev + tests)
//!     → Row (ordered column → JSON value map)
//! ```
//!
//! # Design Decisions
//! - Records other than users are free-form: the request body decides the columns
//! - Column names are checked against a plain identifier grammar before any SQL is built
//! - Rows keep the column order reported by the store, so exports can rely on it

pub mod memory;
pub mod mysql;
pub mod pattern;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// A free-form record: column name to value, in column order.
pub type Row = Map<String, Value>;

/// Longest column identifier MySQL accepts.
const MAX_IDENTIFIER_LEN: usize = 64;

/// Tables holding free-form records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Report,
    Rating,
    Assignment,
}

impl Table {
    pub fn name(self) -> &'static str {
        match self {
            Table::Report => "report",
            Table::Rating => "rating",
            Table::Assignment => "assignments",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A user ready to be inserted. `password` is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub role: String,
}

/// A stored user as read back by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct UserRecord {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: String,
}

/// Errors surfaced by a row store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database driver or connection failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A unique constraint rejected the write.
    #[error("duplicate value for {0}")]
    Duplicate(String),

    /// The row cannot be written as given (empty, bad column, unknown column).
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// The store is not reachable.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// The persistence seam used by every handler.
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn insert_user(&self, user: &NewUser) -> StoreResult<()>;

    /// Exact-match lookup by username.
    async fn find_user(&self, username: &str) -> StoreResult<Option<UserRecord>>;

    async fn insert_row(&self, table: Table, row: &Row) -> StoreResult<()>;

    async fn fetch_all(&self, table: Table) -> StoreResult<Vec<Row>>;

    /// Reports whose `lecturer_name` contains `needle`, matched with the
    /// store's `LIKE` semantics.
    async fn search_reports(&self, needle: &str) -> StoreResult<Vec<Row>>;

    async fn ping(&self) -> StoreResult<()>;
}

/// Whether `name` is safe to splice into SQL as a quoted column identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= MAX_IDENTIFIER_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Name of the first column in `row` that is not a valid identifier.
pub fn first_invalid_column(row: &Row) -> Option<&str> {
    row.keys().map(String::as_str).find(|k| !is_valid_identifier(k))
}

//! MySQL row store.
//!
//! # Responsibilities
//! - Own the `sqlx` connection pool
//! - Issue one parameterized statement per call
//! - Decode result sets dynamically into ordered JSON rows
//!
//! # Design Decisions
//! - Values always travel as bind parameters; only validated, backtick-quoted
//!   column names are spliced into statement text
//! - DECIMAL columns come back as strings to keep their exact digits
//! - DATETIME and TIMESTAMP render the same way; TIMESTAMP is read as UTC

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde_json::Value;
use sqlx::mysql::{MySqlArguments, MySqlConnectOptions, MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::query::Query;
use sqlx::{Column, MySql, Row as SqlxRow, TypeInfo, ValueRef};

use super::pattern::contains_pattern;
use super::{
    first_invalid_column, NewUser, Row, RowStore, StoreError, StoreResult, Table, UserRecord,
};
use crate::config::DatabaseConfig;

/// Row store backed by a MySQL connection pool.
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Open the pool and verify one connection can be established.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.name);

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl RowStore for MySqlStore {
    async fn insert_user(&self, user: &NewUser) -> StoreResult<()> {
        let result = sqlx::query("INSERT INTO users (username, password, role) VALUES (?, ?, ?)")
            .bind(&user.username)
            .bind(&user.password)
            .bind(&user.role)
            .execute(&self.pool)
            .await
            .map_err(map_write_error)?;

        tracing::debug!(
            username = %user.username,
            user_id = result.last_insert_id(),
            "User row inserted"
        );
        Ok(())
    }

    async fn find_user(&self, username: &str) -> StoreResult<Option<UserRecord>> {
        let user = sqlx::query_as::<_, UserRecord>(
            "SELECT username, password, role FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    async fn insert_row(&self, table: Table, row: &Row) -> StoreResult<()> {
        let sql = insert_statement(table, row)?;
        let mut query = sqlx::query(&sql);
        for value in row.values() {
            query = bind_value(query, value);
        }
        query.execute(&self.pool).await.map_err(map_write_error)?;
        Ok(())
    }

    async fn fetch_all(&self, table: Table) -> StoreResult<Vec<Row>> {
        let sql = format!("SELECT * FROM `{}`", table.name());
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        rows.iter().map(decode_row).collect()
    }

    async fn search_reports(&self, needle: &str) -> StoreResult<Vec<Row>> {
        let rows = sqlx::query("SELECT * FROM `report` WHERE lecturer_name LIKE ?")
            .bind(contains_pattern(needle))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(decode_row).collect()
    }

    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Build `INSERT INTO `table` (`a`, `b`) VALUES (?, ?)` for `row`.
fn insert_statement(table: Table, row: &Row) -> StoreResult<String> {
    if row.is_empty() {
        return Err(StoreError::InvalidRow(format!("no columns for {table}")));
    }
    if let Some(column) = first_invalid_column(row) {
        return Err(StoreError::InvalidRow(format!("bad column name '{column}'")));
    }

    let columns = row
        .keys()
        .map(|k| format!("`{k}`"))
        .collect::<Vec<_>>()
        .join(", ");
    let placeholders = vec!["?"; row.len()].join(", ");

    Ok(format!(
        "INSERT INTO `{}` ({columns}) VALUES ({placeholders})",
        table.name()
    ))
}

fn bind_value<'q>(
    query: Query<'q, MySql, MySqlArguments>,
    value: &'q Value,
) -> Query<'q, MySql, MySqlArguments> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                query.bind(i)
            } else if let Some(u) = n.as_u64() {
                query.bind(u)
            } else {
                query.bind(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => query.bind(s.as_str()),
        nested => query.bind(nested.to_string()),
    }
}

fn map_write_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            StoreError::Duplicate(db.message().to_string())
        }
        other => StoreError::Database(other),
    }
}

fn decode_row(row: &MySqlRow) -> StoreResult<Row> {
    let mut out = Row::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal(), column.type_info().name())?;
        out.insert(column.name().to_string(), value);
    }
    Ok(out)
}

/// How a result column is read, keyed by the MySQL type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Signed,
    Unsigned,
    Float,
    Double,
    Decimal,
    DateTime,
    Timestamp,
    Date,
    Time,
    Year,
    Json,
    Bytes,
    Text,
}

fn column_kind(type_name: &str) -> ColumnKind {
    match type_name {
        "BOOLEAN" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" => ColumnKind::Signed,
        "TINYINT UNSIGNED" | "SMALLINT UNSIGNED" | "MEDIUMINT UNSIGNED" | "INT UNSIGNED"
        | "BIGINT UNSIGNED" => ColumnKind::Unsigned,
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DECIMAL" => ColumnKind::Decimal,
        "DATETIME" => ColumnKind::DateTime,
        "TIMESTAMP" => ColumnKind::Timestamp,
        "DATE" => ColumnKind::Date,
        "TIME" => ColumnKind::Time,
        "YEAR" => ColumnKind::Year,
        "JSON" => ColumnKind::Json,
        "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BIT" => {
            ColumnKind::Bytes
        }
        _ => ColumnKind::Text,
    }
}

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

fn decode_column(row: &MySqlRow, index: usize, type_name: &str) -> StoreResult<Value> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match column_kind(type_name) {
        ColumnKind::Bool => Value::Bool(row.try_get::<bool, _>(index)?),
        ColumnKind::Signed => Value::from(row.try_get::<i64, _>(index)?),
        ColumnKind::Unsigned => Value::from(row.try_get::<u64, _>(index)?),
        ColumnKind::Float => Value::from(f64::from(row.try_get_unchecked::<f32, _>(index)?)),
        ColumnKind::Double => Value::from(row.try_get::<f64, _>(index)?),
        ColumnKind::Decimal => Value::String(row.try_get_unchecked::<String, _>(index)?),
        ColumnKind::DateTime => Value::String(
            row.try_get::<NaiveDateTime, _>(index)?
                .format(DATETIME_FORMAT)
                .to_string(),
        ),
        ColumnKind::Timestamp => Value::String(
            row.try_get::<DateTime<Utc>, _>(index)?
                .format(DATETIME_FORMAT)
                .to_string(),
        ),
        ColumnKind::Date => Value::String(row.try_get::<NaiveDate, _>(index)?.to_string()),
        ColumnKind::Time => Value::String(row.try_get::<NaiveTime, _>(index)?.to_string()),
        // No Rust type claims YEAR; it arrives as a two-byte integer.
        ColumnKind::Year => Value::from(row.try_get_unchecked::<u16, _>(index)?),
        ColumnKind::Json => row.try_get::<sqlx::types::Json<Value>, _>(index)?.0,
        ColumnKind::Bytes => {
            let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        }
        ColumnKind::Text => match row.try_get_unchecked::<String, _>(index) {
            Ok(text) => Value::String(text),
            Err(_) => {
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(index)?;
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(value)
}

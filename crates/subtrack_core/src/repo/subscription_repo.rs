//! Subscription repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/list/update-partial/delete over the `subscriptions` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths validate `NewSubscription` / `SubscriptionPatch` first.
//! - Update returns the row read back inside its transaction; delete returns
//!   the removed row from the same statement that removed it.
//! - Missing rows surface as `RepoError::NotFound`, never as a DB error.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::DbError;
use crate::model::subscription::{
    NewSubscription, Subscription, SubscriptionId, SubscriptionPatch, ValidationError,
};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const SUBSCRIPTION_SELECT_SQL: &str = "SELECT
    id,
    name,
    price,
    cycle,
    start_date,
    active,
    created_at
FROM subscriptions";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for subscription persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound(SubscriptionId),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "subscription not found: {id}"),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted subscription data: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for subscription CRUD operations.
pub trait SubscriptionRepository {
    fn create_subscription(&self, input: &NewSubscription) -> RepoResult<Subscription>;
    fn get_subscription(&self, id: SubscriptionId) -> RepoResult<Option<Subscription>>;
    /// Lists every row, newest `created_at` first.
    fn list_subscriptions(&self) -> RepoResult<Vec<Subscription>>;
    fn update_subscription(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> RepoResult<Subscription>;
    fn delete_subscription(&self, id: SubscriptionId) -> RepoResult<Subscription>;
    fn count_subscriptions(&self) -> RepoResult<u64>;
}

/// SQLite-backed subscription repository.
pub struct SqliteSubscriptionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteSubscriptionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    fn fetch_one(&self, id: SubscriptionId) -> RepoResult<Option<Subscription>> {
        let mut stmt = self
            .conn
            .prepare_cached(&format!("{SUBSCRIPTION_SELECT_SQL} WHERE id = ?1;"))?;
        let row = stmt
            .query_row([id], |row| Ok(parse_subscription_row(row)))
            .optional()?;
        row.transpose()
    }
}

impl SubscriptionRepository for SqliteSubscriptionRepository<'_> {
    fn create_subscription(&self, input: &NewSubscription) -> RepoResult<Subscription> {
        input.validate()?;

        let created_at = Utc::now().timestamp_millis();
        self.conn.execute(
            "INSERT INTO subscriptions (
                name,
                price,
                cycle,
                start_date,
                active,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, 1, ?5);",
            params![
                input.name.as_str(),
                input.price,
                input.cycle.as_str(),
                input.start_date.timestamp_millis(),
                created_at,
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=subscription_insert module=repo status=ok id={id}");
        self.fetch_one(id)?.ok_or_else(|| {
            RepoError::InvalidData(format!("subscription {id} missing after insert"))
        })
    }

    fn get_subscription(&self, id: SubscriptionId) -> RepoResult<Option<Subscription>> {
        self.fetch_one(id)
    }

    fn list_subscriptions(&self) -> RepoResult<Vec<Subscription>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "{SUBSCRIPTION_SELECT_SQL} ORDER BY created_at DESC, id DESC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut subscriptions = Vec::new();

        while let Some(row) = rows.next()? {
            subscriptions.push(parse_subscription_row(row)?);
        }

        Ok(subscriptions)
    }

    fn update_subscription(
        &self,
        id: SubscriptionId,
        patch: &SubscriptionPatch,
    ) -> RepoResult<Subscription> {
        patch.validate()?;

        let mut assignments: Vec<&'static str> = Vec::new();
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(name) = &patch.name {
            assignments.push("name = ?");
            bind_values.push(Value::Text(name.clone()));
        }
        if let Some(price) = patch.price {
            assignments.push("price = ?");
            bind_values.push(Value::Real(price));
        }
        if let Some(cycle) = &patch.cycle {
            assignments.push("cycle = ?");
            bind_values.push(Value::Text(cycle.clone()));
        }
        if let Some(start_date) = patch.start_date {
            assignments.push("start_date = ?");
            bind_values.push(Value::Integer(start_date.timestamp_millis()));
        }
        if let Some(active) = patch.active {
            assignments.push("active = ?");
            bind_values.push(Value::Integer(bool_to_int(active)));
        }
        bind_values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE subscriptions SET {} WHERE id = ?;",
            assignments.join(", ")
        );

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(&sql, params_from_iter(bind_values))?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        let updated = self.fetch_one(id)?.ok_or(RepoError::NotFound(id))?;
        tx.commit()?;

        Ok(updated)
    }

    fn delete_subscription(&self, id: SubscriptionId) -> RepoResult<Subscription> {
        // Single statement: the write lock is taken before the row is read.
        let mut stmt = self.conn.prepare_cached(
            "DELETE FROM subscriptions
            WHERE id = ?1
            RETURNING id, name, price, cycle, start_date, active, created_at;",
        )?;
        let deleted = stmt
            .query_row([id], |row| Ok(parse_subscription_row(row)))
            .optional()?
            .transpose()?
            .ok_or(RepoError::NotFound(id))?;

        debug!("event=subscription_delete module=repo status=ok id={id}");
        Ok(deleted)
    }

    fn count_subscriptions(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM subscriptions;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative row count `{count}`")))
    }
}

fn parse_subscription_row(row: &Row<'_>) -> RepoResult<Subscription> {
    let id: SubscriptionId = row.get("id")?;

    let price: f64 = row.get("price")?;
    if !price.is_finite() || price < 0.0 {
        return Err(RepoError::InvalidData(format!(
            "invalid price `{price}` in subscriptions.price for id {id}"
        )));
    }

    let active = match row.get::<_, i64>("active")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid active value `{other}` in subscriptions.active for id {id}"
            )));
        }
    };

    Ok(Subscription {
        id,
        name: row.get("name")?,
        price,
        cycle: row.get("cycle")?,
        start_date: millis_to_datetime(row.get("start_date")?, "start_date")?,
        active,
        created_at: millis_to_datetime(row.get("created_at")?, "created_at")?,
    })
}

fn millis_to_datetime(millis: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "timestamp `{millis}` out of range in subscriptions.{column}"
        ))
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

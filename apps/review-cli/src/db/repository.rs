//! SQLite-backed review store.

use crate::db::error::DbError;
use crate::db::schema::{INIT_SCHEMA_VERSION, SCHEMA, SCHEMA_VERSION};
use chrono::{DateTime, SecondsFormat, Utc};
use review_core::{
    ItemId, ItemPatch, ReviewItem, ReviewItemInit, ReviewStore, ScheduleState, StoreError, Subject,
};
use rusqlite::{params, Connection, OptionalExtension, Row, ToSql};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

type Result<T> = std::result::Result<T, DbError>;

const ITEM_COLUMNS: &str = "id, profile_id, topic, error_type, subject, ease_factor, \
     interval_days, repetitions, next_review, last_review, last_quality";

/// Timestamps are stored with fixed precision and a `Z` suffix so that
/// string comparison in SQL matches chronological order.
fn format_ts(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidData(format!("timestamp '{value}': {e}")))
}

/// Row as stored, before validation.
struct RawItem {
    id: i64,
    profile_id: String,
    topic: String,
    error_type: String,
    subject: String,
    ease_factor: f64,
    interval: u32,
    repetitions: u32,
    next_review: String,
    last_review: Option<String>,
    last_quality: Option<u8>,
}

impl RawItem {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            profile_id: row.get(1)?,
            topic: row.get(2)?,
            error_type: row.get(3)?,
            subject: row.get(4)?,
            ease_factor: row.get(5)?,
            interval: row.get(6)?,
            repetitions: row.get(7)?,
            next_review: row.get(8)?,
            last_review: row.get(9)?,
            last_quality: row.get(10)?,
        })
    }

    fn into_item(self) -> Result<ReviewItem> {
        let subject = Subject::from_str(&self.subject)
            .ok_or_else(|| DbError::InvalidData(format!("subject '{}'", self.subject)))?;

        Ok(ReviewItem {
            id: ItemId(self.id),
            profile_id: self.profile_id,
            topic: self.topic,
            error_type: self.error_type,
            subject,
            ease_factor: self.ease_factor,
            interval: self.interval,
            repetitions: self.repetitions,
            next_review: parse_ts(&self.next_review)?,
            last_review: self.last_review.as_deref().map(parse_ts).transpose()?,
            last_quality: self.last_quality,
        })
    }
}

/// Review store over a single SQLite connection.
pub struct SqliteReviewStore {
    conn: Mutex<Connection>,
}

impl SqliteReviewStore {
    /// Open database at path, creating if necessary.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::initialize(conn)
    }

    /// Open in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::initialize(conn)
    }

    fn initialize(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        conn.execute(INIT_SCHEMA_VERSION, params![SCHEMA_VERSION])?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }

    /// Highest applied schema version.
    pub fn schema_version(&self) -> Result<i32> {
        self.conn()?
            .query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))
            .map_err(Into::into)
    }

    fn collect_items(
        conn: &Connection,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<ReviewItem>> {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, RawItem::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        rows.into_iter().map(RawItem::into_item).collect()
    }

    pub fn fetch_queue(&self, profile_id: &str) -> Result<Vec<ReviewItem>> {
        let conn = self.conn()?;
        Self::collect_items(
            &conn,
            &format!("SELECT {ITEM_COLUMNS} FROM review_items WHERE profile_id = ?1 ORDER BY id"),
            params![profile_id],
        )
    }

    pub fn fetch_due(&self, profile_id: &str, now: DateTime<Utc>) -> Result<Vec<ReviewItem>> {
        let conn = self.conn()?;
        Self::collect_items(
            &conn,
            &format!(
                "SELECT {ITEM_COLUMNS} FROM review_items
                 WHERE profile_id = ?1 AND next_review <= ?2 ORDER BY id"
            ),
            params![profile_id, format_ts(now)],
        )
    }

    pub fn fetch_item(&self, id: ItemId) -> Result<Option<ReviewItem>> {
        let conn = self.conn()?;
        let raw = conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM review_items WHERE id = ?1"),
                params![id.0],
                RawItem::from_row,
            )
            .optional()?;
        raw.map(RawItem::into_item).transpose()
    }

    pub fn insert_item(&self, profile_id: &str, init: &ReviewItemInit) -> Result<ItemId> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO review_items (profile_id, topic, error_type, subject, ease_factor,
                interval_days, repetitions, next_review)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                profile_id,
                init.topic,
                init.error_type,
                init.subject.as_str(),
                init.state.ease_factor,
                init.state.interval,
                init.state.repetitions,
                format_ts(init.next_review),
            ],
        )?;
        Ok(ItemId(conn.last_insert_rowid()))
    }

    pub fn update_item(&self, id: ItemId, patch: &ItemPatch) -> Result<()> {
        let conn = self.conn()?;
        let next_review = format_ts(patch.next_review);
        let last_review = format_ts(patch.last_review);

        let mut sql = String::from(
            "UPDATE review_items SET ease_factor = ?1, interval_days = ?2, repetitions = ?3,
                next_review = ?4, last_review = ?5, last_quality = ?6
             WHERE id = ?7",
        );
        let mut values: Vec<&dyn ToSql> = vec![
            &patch.state.ease_factor as &dyn ToSql,
            &patch.state.interval,
            &patch.state.repetitions,
            &next_review,
            &last_review,
            &patch.last_quality,
            &id.0,
        ];
        if let Some(expected) = &patch.expected {
            sql.push_str(" AND ease_factor = ?8 AND interval_days = ?9 AND repetitions = ?10");
            values.push(&expected.ease_factor);
            values.push(&expected.interval);
            values.push(&expected.repetitions);
        }

        let updated = conn.execute(&sql, values.as_slice())?;

        if updated == 0 {
            return Err(missing_or_conflict(&conn, id)?);
        }
        Ok(())
    }

    pub fn delete_item(&self, id: ItemId) -> Result<()> {
        self.conn()?
            .execute("DELETE FROM review_items WHERE id = ?1", params![id.0])?;
        Ok(())
    }

    /// Delete an item only if its schedule still equals `expected`.
    pub fn delete_item_if_unchanged(&self, id: ItemId, expected: &ScheduleState) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM review_items
             WHERE id = ?1 AND ease_factor = ?2 AND interval_days = ?3 AND repetitions = ?4",
            params![
                id.0,
                expected.ease_factor,
                expected.interval,
                expected.repetitions
            ],
        )?;

        if deleted == 0 {
            return Err(missing_or_conflict(&conn, id)?);
        }
        Ok(())
    }
}

/// Why a guarded write touched no rows.
fn missing_or_conflict(conn: &Connection, id: ItemId) -> Result<DbError> {
    let exists: Option<i64> = conn
        .query_row(
            "SELECT id FROM review_items WHERE id = ?1",
            params![id.0],
            |row| row.get(0),
        )
        .optional()?;
    Ok(match exists {
        Some(_) => DbError::Conflict(id),
        None => DbError::ItemNotFound(id),
    })
}

impl ReviewStore for SqliteReviewStore {
    fn get_review_queue(&self, profile_id: &str) -> std::result::Result<Vec<ReviewItem>, StoreError> {
        self.fetch_queue(profile_id).map_err(Into::into)
    }

    fn get_due_reviews(
        &self,
        profile_id: &str,
        now: DateTime<Utc>,
    ) -> std::result::Result<Vec<ReviewItem>, StoreError> {
        self.fetch_due(profile_id, now).map_err(Into::into)
    }

    fn get_review_item(&self, id: ItemId) -> std::result::Result<Option<ReviewItem>, StoreError> {
        self.fetch_item(id).map_err(Into::into)
    }

    fn add_to_review_queue(
        &self,
        profile_id: &str,
        item: ReviewItemInit,
    ) -> std::result::Result<ItemId, StoreError> {
        self.insert_item(profile_id, &item).map_err(Into::into)
    }

    fn update_review_item(&self, id: ItemId, patch: &ItemPatch) -> std::result::Result<(), StoreError> {
        self.update_item(id, patch).map_err(Into::into)
    }

    fn remove_from_review_queue(&self, id: ItemId) -> std::result::Result<(), StoreError> {
        self.delete_item(id).map_err(Into::into)
    }

    fn evict_review_item(
        &self,
        id: ItemId,
        expected: &ScheduleState,
    ) -> std::result::Result<(), StoreError> {
        self.delete_item_if_unchanged(id, expected).map_err(Into::into)
    }
}

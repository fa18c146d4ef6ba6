//! # Counter Repository
//!
//! Durable storage for the document number counter.
//!
//! ## Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  document_counters                                                      │
//! │  ┌──────────────────────┬────────┬───────────────────────────┐          │
//! │  │ key (PK)             │ value  │ updated_at                │          │
//! │  ├──────────────────────┼────────┼───────────────────────────┤          │
//! │  │ fatura.document_seq  │ 42     │ 2024-06-15T12:00:00+00:00 │          │
//! │  └──────────────────────┴────────┴───────────────────────────┘          │
//! │                                                                         │
//! │  A missing row means the counter was never written.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomic Increment
//! Several `fatura` processes may share one database file. Each allocation is
//! a single upsert that bumps the row and returns the previous value, so
//! SQLite's write lock serializes them and no two callers see the same value.
//!
//! ```sql
//! INSERT ... VALUES (key, 1, now)
//! ON CONFLICT(key) DO UPDATE SET value = value + 1 ... WHERE value in range
//! RETURNING value - 1
//! ```

use chrono::Utc;
use fatura_core::{CounterStore, CounterStoreError};
use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Repository for document counters.
#[derive(Debug, Clone)]
pub struct CounterRepository {
    pool: SqlitePool,
}

impl CounterRepository {
    /// Creates a new CounterRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CounterRepository { pool }
    }

    /// Reads the counter stored under `key`.
    pub async fn get(&self, key: &str) -> DbResult<Option<i64>> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT value
            FROM document_counters
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    /// Atomically advances the counter under `key` and returns its previous
    /// value, creating the row at 1 (previous 0) if missing.
    ///
    /// Returns `Ok(None)` without touching the row when the stored value is
    /// negative or cannot be incremented.
    pub async fn increment(&self, key: &str) -> DbResult<Option<i64>> {
        let now = Utc::now().to_rfc3339();

        let previous = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO document_counters (key, value, updated_at)
            VALUES (?1, 1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = document_counters.value + 1,
                updated_at = excluded.updated_at
            WHERE document_counters.value >= 0
              AND document_counters.value < 9223372036854775807
            RETURNING value - 1
            "#,
        )
        .bind(key)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        debug!(key = %key, ?previous, "Incremented counter");
        Ok(previous)
    }
}

impl CounterStore for CounterRepository {
    async fn increment_counter(&self, key: &str) -> Result<i64, CounterStoreError> {
        match self.increment(key).await? {
            Some(previous) => Ok(previous),
            None => {
                let value = self.get(key).await?.unwrap_or_default();
                warn!(key = %key, value, "Stored counter is out of range");
                Err(CounterStoreError::Corrupt {
                    key: key.to_string(),
                    value,
                })
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::{Local, TimeZone};
    use fatura_core::numbering::DEFAULT_COUNTER_KEY;
    use fatura_core::{DocumentNumberGenerator, DocumentType};
    use std::collections::HashSet;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_missing_counter_is_none() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.counters().get("nothing").await.unwrap(), None);
    }

    async fn seed(counters: &CounterRepository, key: &str, value: i64) {
        sqlx::query("INSERT INTO document_counters (key, value, updated_at) VALUES (?1, ?2, ?3)")
            .bind(key)
            .bind(value)
            .bind(Utc::now().to_rfc3339())
            .execute(&counters.pool)
            .await
            .unwrap();
    }

    fn scratch_db_path(name: &str) -> std::path::PathBuf {
        let nanos = Utc::now().timestamp_nanos_opt().unwrap_or_default();
        std::env::temp_dir()
            .join(format!("fatura-db-{}-{}-{}", name, std::process::id(), nanos))
            .join("fatura.db")
    }

    #[tokio::test]
    async fn test_increment_returns_previous_value() {
        let db = Database::in_memory().await.unwrap();
        let counters = db.counters();

        assert_eq!(counters.increment("seq").await.unwrap(), Some(0));
        assert_eq!(counters.increment("seq").await.unwrap(), Some(1));
        assert_eq!(counters.increment("other").await.unwrap(), Some(0));

        assert_eq!(counters.get("seq").await.unwrap(), Some(2));
        assert_eq!(counters.get("other").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_out_of_range_counter_is_left_alone() {
        let db = Database::in_memory().await.unwrap();
        let counters = db.counters();
        seed(&counters, "neg", -4).await;
        seed(&counters, "full", i64::MAX).await;

        assert_eq!(counters.increment("neg").await.unwrap(), None);
        assert_eq!(counters.increment("full").await.unwrap(), None);
        assert_eq!(counters.get("neg").await.unwrap(), Some(-4));
        assert_eq!(counters.get("full").await.unwrap(), Some(i64::MAX));

        let err = counters.increment_counter("neg").await.unwrap_err();
        assert!(matches!(err, CounterStoreError::Corrupt { value: -4, .. }));
    }

    #[tokio::test]
    async fn test_negative_counter_falls_back() {
        let db = Database::in_memory().await.unwrap();
        seed(&db.counters(), DEFAULT_COUNTER_KEY, -1).await;

        let generator = DocumentNumberGenerator::new(db.counters());
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        assert_eq!(
            generator.allocate_at(DocumentType::Quote, now).await,
            format!("Q-{}", now.timestamp_millis())
        );
    }

    #[tokio::test]
    async fn test_generator_over_sqlite() {
        let db = Database::in_memory().await.unwrap();
        let generator = DocumentNumberGenerator::new(db.counters());
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        assert_eq!(generator.allocate_at(DocumentType::Invoice, now).await, "INV-20240000");
        assert_eq!(generator.allocate_at(DocumentType::Quote, now).await, "Q-20240001");
        assert_eq!(db.counters().get(DEFAULT_COUNTER_KEY).await.unwrap(), Some(2));
    }

    #[tokio::test]
    async fn test_closed_database_falls_back() {
        let db = Database::in_memory().await.unwrap();
        let generator = DocumentNumberGenerator::new(db.counters());
        db.close().await;

        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let number = generator.allocate_at(DocumentType::Order, now).await;
        assert_eq!(number, format!("SO-{}", now.timestamp_millis()));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_are_unique() {
        let db = Database::in_memory().await.unwrap();
        let generator = Arc::new(DocumentNumberGenerator::new(db.counters()));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move { generator.allocate(DocumentType::Invoice).await })
            })
            .collect();

        let mut numbers = HashSet::new();
        for handle in handles {
            numbers.insert(handle.await.unwrap());
        }

        assert_eq!(numbers.len(), 16);
        assert_eq!(db.counters().get(DEFAULT_COUNTER_KEY).await.unwrap(), Some(16));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_two_handles_on_one_file_never_share_a_number() {
        let path = scratch_db_path("shared");
        let first = Database::new(DbConfig::new(&path)).await.unwrap();
        let second = Database::new(DbConfig::new(&path)).await.unwrap();

        // Separate generators model separate processes: their in-process
        // locks do not see each other.
        let generators = [
            Arc::new(DocumentNumberGenerator::new(first.counters())),
            Arc::new(DocumentNumberGenerator::new(second.counters())),
        ];
        let now = Local.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();

        let handles: Vec<_> = (0..40)
            .map(|i| {
                let generator = Arc::clone(&generators[i % 2]);
                tokio::spawn(async move { generator.allocate_at(DocumentType::Invoice, now).await })
            })
            .collect();

        let mut numbers = HashSet::new();
        for handle in handles {
            numbers.insert(handle.await.unwrap());
        }

        let expected: HashSet<String> = (0..40).map(|n| format!("INV-2024{:04}", n)).collect();
        assert_eq!(numbers, expected);
        assert_eq!(first.counters().get(DEFAULT_COUNTER_KEY).await.unwrap(), Some(40));

        first.close().await;
        second.close().await;
        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }

    #[tokio::test]
    async fn test_counter_survives_reopen() {
        let path = scratch_db_path("reopen");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        for _ in 0..3 {
            db.counters().increment(DEFAULT_COUNTER_KEY).await.unwrap();
        }
        db.close().await;

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert_eq!(db.counters().get(DEFAULT_COUNTER_KEY).await.unwrap(), Some(3));
        assert_eq!(db.counters().increment(DEFAULT_COUNTER_KEY).await.unwrap(), Some(3));
        db.close().await;

        if let Some(dir) = path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

//! # Document Numbering
//!
//! Allocates sequential document numbers from a persisted counter.
//!
//! ## Allocation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    allocate(DocumentType::Invoice)                      │
//! │                                                                         │
//! │  lock ─► increment_counter(key) ─► previous value n (absent = 0)        │
//! │                                   │                                     │
//! │                                   ▼                                     │
//! │                            "INV-2024" + "0007"  ─► unlock, return       │
//! │                                                                         │
//! │  Any store failure ─► warn! and return "INV-<epoch millis>" instead.    │
//! │  The caller never sees an error.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Persistence is injected through [`CounterStore`]. The SQLite store lives
//! in fatura-db; [`MemoryCounterStore`] covers tests and throwaway runs.
//!
//! One counter is shared by every document type; the prefix tells them apart.

use chrono::{DateTime, Datelike, Local};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex as StdMutex;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::CounterStoreError;
use crate::types::DocumentType;

/// Counter key used when none is configured.
pub const DEFAULT_COUNTER_KEY: &str = "fatura.document_seq";

// =============================================================================
// Counter Store Capability
// =============================================================================

/// Durable storage for the document counter.
///
/// The increment must be atomic with respect to every other user of the
/// same store, including other processes sharing its backing file.
pub trait CounterStore: Send + Sync {
    /// Advances the counter by one and returns the value it held before.
    /// A counter that was never written starts at 0.
    ///
    /// A negative or exhausted stored value is left untouched and reported
    /// as [`CounterStoreError::Corrupt`].
    fn increment_counter(&self, key: &str) -> impl Future<Output = Result<i64, CounterStoreError>> + Send;
}

/// In-process counter store.
#[derive(Debug, Default)]
pub struct MemoryCounterStore {
    values: StdMutex<HashMap<String, i64>>,
}

impl MemoryCounterStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store with `key` preset to `value`.
    pub fn with_value(key: impl Into<String>, value: i64) -> Self {
        let store = Self::new();
        if let Ok(mut values) = store.values.lock() {
            values.insert(key.into(), value);
        }
        store
    }

    /// Current value of `key`, if any.
    pub fn get(&self, key: &str) -> Option<i64> {
        self.values.lock().ok()?.get(key).copied()
    }
}

impl CounterStore for MemoryCounterStore {
    async fn increment_counter(&self, key: &str) -> Result<i64, CounterStoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| CounterStoreError::Unavailable(e.to_string()))?;

        let current = values.get(key).copied().unwrap_or(0);
        let next = current
            .checked_add(1)
            .filter(|_| current >= 0)
            .ok_or_else(|| CounterStoreError::Corrupt {
                key: key.to_string(),
                value: current,
            })?;

        values.insert(key.to_string(), next);
        Ok(current)
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Formats `"{PREFIX}-{YYYY}{NNNN}"`.
///
/// ## Example
/// ```rust
/// use fatura_core::numbering::format_document_number;
/// use fatura_core::DocumentType;
///
/// assert_eq!(format_document_number(DocumentType::Invoice, 2024, 7), "INV-20240007");
/// assert_eq!(format_document_number(DocumentType::Quote, 2024, 12345), "Q-202412345");
/// ```
pub fn format_document_number(document_type: DocumentType, year: i32, sequence: u64) -> String {
    format!("{}-{:04}{:04}", document_type.prefix(), year, sequence)
}

/// Formats the fallback `"{PREFIX}-{epoch millis}"` used when the counter
/// cannot be persisted.
pub fn fallback_document_number(document_type: DocumentType, timestamp_millis: i64) -> String {
    format!("{}-{}", document_type.prefix(), timestamp_millis)
}

// =============================================================================
// Generator
// =============================================================================

/// Process-wide document number allocator.
///
/// Share one instance (behind an `Arc`) across every document session of
/// the process so allocations are serialized.
#[derive(Debug)]
pub struct DocumentNumberGenerator<S> {
    store: S,
    key: String,
    lock: Mutex<()>,
}

impl<S: CounterStore> DocumentNumberGenerator<S> {
    /// Creates a generator using [`DEFAULT_COUNTER_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_COUNTER_KEY)
    }

    /// Creates a generator using a custom counter key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        DocumentNumberGenerator {
            store,
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    /// The counter key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Allocates the next number for `document_type` using the local clock.
    pub async fn allocate(&self, document_type: DocumentType) -> String {
        self.allocate_at(document_type, Local::now()).await
    }

    /// Allocates the next number as of `now`.
    ///
    /// Never fails: if the counter cannot be read or written the result is
    /// the timestamp fallback.
    pub async fn allocate_at(&self, document_type: DocumentType, now: DateTime<Local>) -> String {
        let year = now.year();
        let timestamp_millis = now.timestamp_millis();

        let _guard = self.lock.lock().await;

        match self.next_sequence().await {
            Ok(sequence) => {
                let number = format_document_number(document_type, year, sequence);
                debug!(key = %self.key, sequence, number = %number, "Allocated document number");
                number
            }
            Err(e) => {
                let number = fallback_document_number(document_type, timestamp_millis);
                warn!(key = %self.key, error = %e, number = %number, "Counter unavailable, using timestamp number");
                number
            }
        }
    }

    /// Claims the next sequence value from the store.
    async fn next_sequence(&self) -> Result<u64, CounterStoreError> {
        let previous = self.store.increment_counter(&self.key).await?;
        u64::try_from(previous).map_err(|_| CounterStoreError::Corrupt {
            key: self.key.clone(),
            value: previous,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use std::sync::Arc;

    /// Store that always fails.
    struct FailingStore;

    impl CounterStore for FailingStore {
        async fn increment_counter(&self, _key: &str) -> Result<i64, CounterStoreError> {
            Err(CounterStoreError::Unavailable("disk gone".into()))
        }
    }

    /// Store that hands back a value the generator cannot use.
    struct NegativeStore;

    impl CounterStore for NegativeStore {
        async fn increment_counter(&self, _key: &str) -> Result<i64, CounterStoreError> {
            Ok(-1)
        }
    }

    fn noon_2024() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_first_allocation_starts_at_zero() {
        let generator = DocumentNumberGenerator::new(MemoryCounterStore::new());
        let number = generator.allocate_at(DocumentType::Invoice, noon_2024()).await;

        assert_eq!(number, "INV-20240000");
        assert_eq!(generator.store().get(DEFAULT_COUNTER_KEY), Some(1));
    }

    #[tokio::test]
    async fn test_sequential_allocations_increase() {
        let store = MemoryCounterStore::with_value(DEFAULT_COUNTER_KEY, 7);
        let generator = DocumentNumberGenerator::new(store);

        let first = generator.allocate_at(DocumentType::Invoice, noon_2024()).await;
        let second = generator.allocate_at(DocumentType::Invoice, noon_2024()).await;

        assert_eq!(first, "INV-20240007");
        assert_eq!(second, "INV-20240008");
        assert!(second > first);
    }

    #[tokio::test]
    async fn test_counter_shared_across_types() {
        let generator = DocumentNumberGenerator::new(MemoryCounterStore::new());

        assert_eq!(generator.allocate_at(DocumentType::Quote, noon_2024()).await, "Q-20240000");
        assert_eq!(generator.allocate_at(DocumentType::Order, noon_2024()).await, "SO-20240001");
        assert_eq!(generator.allocate_at(DocumentType::Invoice, noon_2024()).await, "INV-20240002");
    }

    #[tokio::test]
    async fn test_custom_key() {
        let generator = DocumentNumberGenerator::with_key(MemoryCounterStore::new(), "branch-2");
        generator.allocate_at(DocumentType::Quote, noon_2024()).await;

        assert_eq!(generator.key(), "branch-2");
        assert_eq!(generator.store().get("branch-2"), Some(1));
        assert_eq!(generator.store().get(DEFAULT_COUNTER_KEY), None);
    }

    #[tokio::test]
    async fn test_store_failure_falls_back_to_timestamp() {
        let generator = DocumentNumberGenerator::new(FailingStore);
        let now = noon_2024();
        let number = generator.allocate_at(DocumentType::Order, now).await;

        assert_eq!(number, format!("SO-{}", now.timestamp_millis()));
    }

    #[tokio::test]
    async fn test_negative_sequence_from_store_falls_back() {
        let generator = DocumentNumberGenerator::new(NegativeStore);
        let now = noon_2024();
        let number = generator.allocate_at(DocumentType::Invoice, now).await;

        assert_eq!(number, format!("INV-{}", now.timestamp_millis()));
    }

    #[tokio::test]
    async fn test_exhausted_counter_is_not_advanced() {
        let store = MemoryCounterStore::with_value(DEFAULT_COUNTER_KEY, i64::MAX);
        let err = store.increment_counter(DEFAULT_COUNTER_KEY).await.unwrap_err();

        assert!(matches!(err, CounterStoreError::Corrupt { value: i64::MAX, .. }));
        assert_eq!(store.get(DEFAULT_COUNTER_KEY), Some(i64::MAX));
    }

    #[tokio::test]
    async fn test_negative_counter_is_treated_as_failure() {
        let store = MemoryCounterStore::with_value(DEFAULT_COUNTER_KEY, -4);
        let generator = DocumentNumberGenerator::new(store);
        let now = noon_2024();

        let number = generator.allocate_at(DocumentType::Quote, now).await;
        assert_eq!(number, format!("Q-{}", now.timestamp_millis()));
        assert_eq!(generator.store().get(DEFAULT_COUNTER_KEY), Some(-4));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_allocations_are_unique() {
        let generator = Arc::new(DocumentNumberGenerator::new(MemoryCounterStore::new()));

        let handles: Vec<_> = (0..32)
            .map(|_| {
                let generator = Arc::clone(&generator);
                tokio::spawn(async move { generator.allocate_at(DocumentType::Invoice, noon_2024()).await })
            })
            .collect();

        let mut numbers = HashSet::new();
        for handle in handles {
            numbers.insert(handle.await.unwrap());
        }

        assert_eq!(numbers.len(), 32);
        assert_eq!(generator.store().get(DEFAULT_COUNTER_KEY), Some(32));
    }

    #[test]
    fn test_formatting() {
        assert_eq!(format_document_number(DocumentType::Order, 2025, 0), "SO-20250000");
        assert_eq!(fallback_document_number(DocumentType::Invoice, 1718452800000), "INV-1718452800000");
    }
}

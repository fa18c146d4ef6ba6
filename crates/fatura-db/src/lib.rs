//! # fatura-db: Database Layer for Fatura
//!
//! SQLite storage for the document number counter, exposed to the engine
//! through the `CounterStore` capability.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fatura Data Flow                                 │
//! │                                                                         │
//! │  DocumentNumberGenerator (fatura-core)                                 │
//! │       │ increment_counter (one atomic upsert)                          │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     fatura-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────────┐  ┌────────────┐  │   │
//! │  │   │   Database    │◄───│ CounterRepository  │  │ Migrations │  │   │
//! │  │   │   (pool.rs)   │    │ (repository/)      │  │ (embedded) │  │   │
//! │  │   └───────────────┘    └────────────────────┘  └────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file in the platform data directory (fatura.db)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fatura_core::{DocumentNumberGenerator, DocumentType};
//! use fatura_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("fatura.db")).await?;
//! let generator = DocumentNumberGenerator::new(db.counters());
//! let number = generator.allocate(DocumentType::Invoice).await;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::counter::CounterRepository;

//! # State Module
//!
//! Application state shared by the commands.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────┐  ┌──────────────────────┐  ┌──────────────┐  │
//! │  │   DocumentState      │  │   NumberingState     │  │  AppConfig   │  │
//! │  │                      │  │                      │  │              │  │
//! │  │  Arc<Mutex<          │  │  Arc<DocumentNumber  │  │  seller      │  │
//! │  │    DocumentSession   │  │    Generator<S>>     │  │  warranty    │  │
//! │  │  >>                  │  │                      │  │  printed_by  │  │
//! │  └──────────────────────┘  └──────────────────────┘  └──────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • DocumentState: short synchronous critical sections only             │
//! │  • NumberingState: the generator serializes allocations itself         │
//! │  • AppConfig: read-only after startup                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod document;
mod numbering;

pub use document::DocumentState;
pub use numbering::NumberingState;

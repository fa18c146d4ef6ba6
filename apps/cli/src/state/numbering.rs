//! # Numbering State
//!
//! The process-wide document number generator.

use std::sync::Arc;

use fatura_core::{CounterStore, DocumentNumberGenerator};

/// Shared handle to one [`DocumentNumberGenerator`].
///
/// Every document of the process must allocate through the same generator
/// so allocations are serialized.
#[derive(Debug)]
pub struct NumberingState<S> {
    generator: Arc<DocumentNumberGenerator<S>>,
}

impl<S: CounterStore> NumberingState<S> {
    /// Creates the generator over `store` using `counter_key`.
    pub fn new(store: S, counter_key: impl Into<String>) -> Self {
        NumberingState {
            generator: Arc::new(DocumentNumberGenerator::with_key(store, counter_key)),
        }
    }

    /// The shared generator.
    pub fn generator(&self) -> &DocumentNumberGenerator<S> {
        &self.generator
    }
}

impl<S> Clone for NumberingState<S> {
    fn clone(&self) -> Self {
        NumberingState {
            generator: Arc::clone(&self.generator),
        }
    }
}

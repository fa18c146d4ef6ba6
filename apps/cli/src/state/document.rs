//! # Document State
//!
//! The document being edited, shared between commands.
//!
//! The session sits behind a blocking mutex. Closures passed to
//! [`DocumentState::with_session_mut`] must not await; number allocation
//! happens outside the lock (see `commands::document`).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use fatura_core::{DocumentIdentity, DocumentSession, DocumentType};

use crate::config::AppConfig;

/// Shared handle to the current [`DocumentSession`].
#[derive(Debug, Clone, Default)]
pub struct DocumentState {
    session: Arc<Mutex<DocumentSession>>,
}

impl DocumentState {
    /// Wraps an existing session.
    pub fn new(session: DocumentSession) -> Self {
        DocumentState {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Starts an invoice dated today in the configured currency.
    pub fn from_config(config: &AppConfig) -> Self {
        let identity = DocumentIdentity::new(
            DocumentType::default(),
            Local::now().date_naive(),
            config.document.currency.clone(),
        );
        Self::new(DocumentSession::with_identity(identity))
    }

    /// Executes a function with read access to the session.
    pub fn with_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&DocumentSession) -> R,
    {
        f(&self.lock())
    }

    /// Executes a function with write access to the session.
    pub fn with_session_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut DocumentSession) -> R,
    {
        f(&mut self.lock())
    }

    // A panic mid-edit leaves a consistent session: every edit is a single
    // field assignment or Vec operation.
    fn lock(&self) -> MutexGuard<'_, DocumentSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

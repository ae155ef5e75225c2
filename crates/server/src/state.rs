//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::ServerConfig;
use crate::services::{ReportError, ReportMailer};
use crate::sheets::{SheetsClient, SheetsError};
use crate::store::Store;

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("tabular store client: {0}")]
    Sheets(#[from] SheetsError),
    #[error("report mailer: {0}")]
    Report(#[from] ReportError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the store, and the report mailer.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ServerConfig,
    store: Store,
    mailer: ReportMailer,
}

impl AppState {
    /// Create a new application state from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the store client or the mailer cannot be built.
    pub fn new(config: ServerConfig) -> Result<Self, StateInitError> {
        let sheets = SheetsClient::new(&config.sheets)?;
        let store = Store::new(sheets);
        let mailer = ReportMailer::from_config(config.smtp.as_ref())?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                mailer,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.inner.config
    }

    /// Get a reference to the tabular store.
    #[must_use]
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// Get a reference to the report mailer.
    #[must_use]
    pub fn mailer(&self) -> &ReportMailer {
        &self.inner.mailer
    }
}

//! HTTP client for the external tabular store.
//!
//! The store exposes whole worksheets only:
//!
//! - `GET  {endpoint}/documents/{document}/worksheets/{name}/values`
//!   returns every row as `{"values": [[..], ..]}`
//! - `PUT  {endpoint}/documents/{document}/worksheets/{name}/values`
//!   replaces every row
//!
//! There is no row-level primitive; callers that want append semantics must
//! read, concatenate, and write back. The typed adapters in [`crate::store`]
//! do that under a single-writer lock; this client stays raw.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::SheetsConfig;

/// Errors that can occur when talking to the tabular store.
#[derive(Debug, Error)]
pub enum SheetsError {
    /// HTTP request failed (connectivity, DNS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The named worksheet does not exist in the document.
    #[error("Worksheet not found: {0}")]
    WorksheetNotFound(String),

    /// Failed to build the client or parse a response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Wire format for worksheet values, both directions.
#[derive(Debug, Serialize, Deserialize)]
struct ValuesPayload {
    values: Vec<Vec<String>>,
}

/// Client for the tabular store API.
///
/// Cheaply cloneable; holds one connection pool for the whole process.
#[derive(Clone)]
pub struct SheetsClient {
    inner: Arc<SheetsClientInner>,
}

struct SheetsClientInner {
    client: reqwest::Client,
    endpoint: String,
    document: String,
}

impl SheetsClient {
    /// Create a new tabular store client.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::Parse`] if the API token cannot be used as an
    /// HTTP header value, or [`SheetsError::Http`] if the client fails to
    /// build.
    pub fn new(config: &SheetsConfig) -> Result<Self, SheetsError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_token.expose_secret());
        let mut auth_value = HeaderValue::from_str(&auth_value)
            .map_err(|e| SheetsError::Parse(format!("invalid API token: {e}")))?;
        auth_value.set_sensitive(true);
        headers.insert("Authorization", auth_value);

        let client = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            inner: Arc::new(SheetsClientInner {
                client,
                endpoint: config.endpoint.trim_end_matches('/').to_string(),
                document: config.document.clone(),
            }),
        })
    }

    /// URL of a worksheet's values resource.
    fn values_url(&self, worksheet: &str) -> String {
        format!(
            "{}/documents/{}/worksheets/{}/values",
            self.inner.endpoint,
            self.inner.document,
            urlencoding::encode(worksheet)
        )
    }

    /// Read every row of a worksheet, header row included.
    ///
    /// # Errors
    ///
    /// Returns [`SheetsError::WorksheetNotFound`] on 404, [`SheetsError::Api`]
    /// on any other non-success status, and [`SheetsError::Http`] /
    /// [`SheetsError::Parse`] on transport or decoding failures.
    pub async fn read_values(&self, worksheet: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url(worksheet);
        debug!(worksheet, "reading worksheet");

        let response = self.inner.client.get(&url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(SheetsError::WorksheetNotFound(worksheet.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payload: ValuesPayload = response
            .json()
            .await
            .map_err(|e| SheetsError::Parse(e.to_string()))?;

        Ok(payload.values)
    }

    /// Replace every row of a worksheet. This is a full-table overwrite:
    /// whatever was read before this call is gone afterwards.
    ///
    /// # Errors
    ///
    /// Same taxonomy as [`Self::read_values`].
    pub async fn write_values(
        &self,
        worksheet: &str,
        values: &[Vec<String>],
    ) -> Result<(), SheetsError> {
        let url = self.values_url(worksheet);
        debug!(worksheet, rows = values.len(), "writing worksheet");

        let payload = ValuesPayload {
            values: values.to_vec(),
        };

        let response = self.inner.client.put(&url).json(&payload).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(SheetsError::WorksheetNotFound(worksheet.to_string()));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

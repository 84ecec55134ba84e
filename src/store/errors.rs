//! Error types for document store operations

use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for document store operations
///
/// Not-found on delete-collection and get-alias is suppressed inside the
/// client (those are expected states, not errors) and never surfaces here.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or the transport failed mid-request
    #[error("document store unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The store rejected a collection definition
    #[error("collection schema rejected ({status}): {message}")]
    SchemaRejected { status: u16, message: String },

    /// Any other non-success response from the store
    #[error("store request failed ({status}): {message}")]
    Api { status: u16, message: String },

    /// A response body could not be decoded into the expected shape
    #[error("could not decode store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// True when the failure happened before the store accepted anything,
    /// so retrying the whole run is safe.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

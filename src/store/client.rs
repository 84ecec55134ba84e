//! Async HTTP client wrapping the document store API

use reqwest::{Response, StatusCode, header::HeaderValue};
use serde::Serialize;
use url::Url;

use crate::config::{ConfigError, StoreConfig};

use super::errors::{StoreError, StoreResult};
use super::types::{AliasTarget, CollectionSchema, ImportOutcome};

const API_KEY_HEADER: &str = "X-TYPESENSE-API-KEY";

/// Client for the document store consumed by the reindex pipeline.
///
/// Holds the base URL and API key; one instance is shared by all
/// pipeline components for the duration of a run.
#[derive(Debug, Clone)]
pub struct StoreClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl StoreClient {
    /// Create a client against an explicit base URL.
    #[must_use]
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Create a client from a loaded [`StoreConfig`].
    pub fn from_config(config: &StoreConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.base_url()?, config.api_key.clone()))
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn api_key_header(&self) -> HeaderValue {
        HeaderValue::from_str(&self.api_key).unwrap_or_else(|_| HeaderValue::from_static(""))
    }

    /// Create a collection from a fully-specified schema.
    ///
    /// A rejected definition (malformed schema, duplicate name after a
    /// race) maps to [`StoreError::SchemaRejected`] and is fatal for the
    /// run.
    pub async fn create_collection(&self, schema: &CollectionSchema) -> StoreResult<()> {
        tracing::debug!(collection = %schema.name, "creating collection");
        let response = self
            .http
            .post(self.endpoint(&["collections"]))
            .header(API_KEY_HEADER, self.api_key_header())
            .json(schema)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else if status == StatusCode::BAD_REQUEST || status == StatusCode::CONFLICT {
            Err(StoreError::SchemaRejected {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Delete a collection, suppressing not-found.
    ///
    /// Returns whether a collection actually existed, so callers can log
    /// stale-collection cleanup distinctly from a no-op.
    pub async fn delete_collection(&self, name: &str) -> StoreResult<bool> {
        tracing::debug!(collection = %name, "deleting collection");
        let response = self
            .http
            .delete(self.endpoint(&["collections", name]))
            .header(API_KEY_HEADER, self.api_key_header())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(true)
        } else if status == StatusCode::NOT_FOUND {
            Ok(false)
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Bulk-import one batch of documents, returning one outcome per
    /// submitted document.
    ///
    /// The request and response bodies are both JSONL; decoding happens
    /// here once so callers only ever see [`ImportOutcome`] values.
    pub async fn import_documents<T: Serialize>(
        &self,
        collection: &str,
        batch: &[T],
    ) -> StoreResult<Vec<ImportOutcome>> {
        let mut body = String::new();
        for document in batch {
            let line = serde_json::to_string(document)
                .map_err(|e| StoreError::Decode(format!("unserializable document: {e}")))?;
            body.push_str(&line);
            body.push('\n');
        }

        tracing::debug!(collection = %collection, documents = batch.len(), "importing batch");
        let response = self
            .http
            .post(self.endpoint(&["collections", collection, "documents", "import"]))
            .header(API_KEY_HEADER, self.api_key_header())
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            });
        }

        let text = response.text().await?;
        parse_import_response(&text)
    }

    /// Read the collection an alias currently points at.
    ///
    /// An absent alias is an expected state (first-ever reindex) and is
    /// reported as `None`, not an error.
    pub async fn get_alias(&self, name: &str) -> StoreResult<Option<String>> {
        let response = self
            .http
            .get(self.endpoint(&["aliases", name]))
            .header(API_KEY_HEADER, self.api_key_header())
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let target: AliasTarget = response
                .json()
                .await
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            Ok(Some(target.collection_name))
        } else if status == StatusCode::NOT_FOUND {
            Ok(None)
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }

    /// Point an alias at a collection, creating the alias if needed.
    ///
    /// This single upsert is the atomic cutover the whole pipeline is
    /// built around; the store guarantees readers resolving through the
    /// alias immediately afterwards see the new collection.
    pub async fn upsert_alias(&self, name: &str, collection: &str) -> StoreResult<()> {
        tracing::debug!(alias = %name, collection = %collection, "upserting alias");
        let response = self
            .http
            .put(self.endpoint(&["aliases", name]))
            .header(API_KEY_HEADER, self.api_key_header())
            .json(&serde_json::json!({ "collection_name": collection }))
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(StoreError::Api {
                status: status.as_u16(),
                message: error_message(response).await,
            })
        }
    }
}

/// Decode a JSONL import response into per-document outcomes.
fn parse_import_response(body: &str) -> StoreResult<Vec<ImportOutcome>> {
    body.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            serde_json::from_str::<ImportOutcome>(line)
                .map_err(|e| StoreError::Decode(format!("bad import outcome line '{line}': {e}")))
        })
        .collect()
}

/// Pull the store's error message out of a failed response, falling back
/// to the raw body when it is not the usual `{"message": ...}` shape.
async fn error_message(response: Response) -> String {
    let body = response.text().await.unwrap_or_default();
    serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_response_decodes_mixed_outcomes() {
        let body = "{\"success\":true}\n{\"success\":false,\"error\":\"Bad JSON.\",\"document\":\"{}\"}\n";
        let outcomes = parse_import_response(body).unwrap();
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].success);
        assert!(!outcomes[1].success);
        assert_eq!(outcomes[1].error.as_deref(), Some("Bad JSON."));
    }

    #[test]
    fn import_response_skips_blank_lines() {
        let body = "{\"success\":true}\n\n{\"success\":true}\n";
        let outcomes = parse_import_response(body).unwrap();
        assert_eq!(outcomes.len(), 2);
    }

    #[test]
    fn malformed_import_line_is_a_decode_error() {
        let body = "{\"success\":true}\nnot json\n";
        assert!(matches!(
            parse_import_response(body),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn endpoint_joins_segments_under_path_prefix() {
        let client = StoreClient::new(
            Url::parse("http://localhost:8108/typesense").unwrap(),
            "key",
        );
        let url = client.endpoint(&["collections", "docs", "documents", "import"]);
        assert_eq!(
            url.as_str(),
            "http://localhost:8108/typesense/collections/docs/documents/import"
        );
    }
}

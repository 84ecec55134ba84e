//! Test utilities shared by the integration suite

use citeindex::{RawRecord, StoreClient};
use url::Url;

/// Build a store client pointed at a mock server.
#[allow(dead_code)]
pub fn store_client(server: &mockito::ServerGuard) -> StoreClient {
    let base_url = Url::parse(&server.url()).expect("mock server url");
    StoreClient::new(base_url, "test-api-key")
}

/// A plausible extracted page record with a zero-padded marker in its
/// URLs, so batch boundaries can be matched in request bodies.
#[allow(dead_code)]
pub fn page_record(index: usize) -> RawRecord {
    let url = format!("https://docs.example.com/page-{index:03}");
    RawRecord {
        content: Some(format!("Reference material for page {index}")),
        url: Some(url.clone()),
        url_without_anchor: Some(url),
        ..RawRecord::default()
    }
}

/// JSONL import response with `count` successful outcomes.
#[allow(dead_code)]
pub fn success_lines(count: usize) -> String {
    "{\"success\":true}\n".repeat(count)
}

/// JSONL import response where the final outcome failed.
#[allow(dead_code)]
pub fn lines_with_one_failure(successes: usize) -> String {
    let mut body = success_lines(successes);
    body.push_str("{\"success\":false,\"error\":\"Bad JSON.\",\"document\":\"{}\"}\n");
    body
}

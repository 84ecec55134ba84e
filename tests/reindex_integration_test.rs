//! Integration tests for the full reindex pipeline against a mocked store
//!
//! Exercises the blue-green protocol end to end: provisioning deletes
//! stale state, ingestion batches and aborts on partial failure, and the
//! alias only ever moves after every batch succeeded.

mod common;

use citeindex::{IndexSettings, IngestSource, RawRecord, ReindexError, Reindexer, StoreClient};
use common::{lines_with_one_failure, page_record, store_client, success_lines};
use mockito::Matcher;

const ALIAS: &str = "docs";
const STAGING: &str = "docs_staging";

fn reindexer(client: StoreClient) -> Reindexer {
    Reindexer::new(client, ALIAS, STAGING, "en", IndexSettings::default())
}

fn source() -> IngestSource<'static> {
    IngestSource {
        url: "https://docs.example.com/sitemap.xml",
        from_sitemap: true,
    }
}

fn records(count: usize) -> Vec<RawRecord> {
    (0..count).map(page_record).collect()
}

/// Mock the two provisioning calls: stale delete (nothing stale) and create.
async fn mock_provisioning(server: &mut mockito::ServerGuard) -> (mockito::Mock, mockito::Mock) {
    let delete = server
        .mock("DELETE", format!("/collections/{STAGING}").as_str())
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/collections")
        .match_header("x-typesense-api-key", "test-api-key")
        .with_status(201)
        .with_body(r#"{"name": "docs_staging"}"#)
        .create_async()
        .await;
    (delete, create)
}

#[tokio::test]
async fn full_run_provisions_ingests_and_promotes() {
    let mut server = mockito::Server::new_async().await;
    let (delete_stale, create) = mock_provisioning(&mut server).await;

    let import = server
        .mock(
            "POST",
            format!("/collections/{STAGING}/documents/import").as_str(),
        )
        .with_status(200)
        .with_body(success_lines(50))
        .expect(3)
        .create_async()
        .await;
    let get_alias = server
        .mock("GET", format!("/aliases/{ALIAS}").as_str())
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    let upsert_alias = server
        .mock("PUT", format!("/aliases/{ALIAS}").as_str())
        .match_body(Matcher::Json(
            serde_json::json!({"collection_name": STAGING}),
        ))
        .with_status(200)
        .with_body(format!(r#"{{"name":"{ALIAS}","collection_name":"{STAGING}"}}"#))
        .create_async()
        .await;

    let mut run = reindexer(store_client(&server));
    let report = run.run(&records(120), source()).await.unwrap();

    // 120 documents in batches of 50 means exactly three import calls
    assert_eq!(report.documents_ingested, 120);
    assert_eq!(report.batches_submitted, 3);

    delete_stale.assert_async().await;
    create.assert_async().await;
    import.assert_async().await;
    get_alias.assert_async().await;
    upsert_alias.assert_async().await;
}

#[tokio::test]
async fn failing_batch_aborts_run_and_skips_later_batches() {
    let mut server = mockito::Server::new_async().await;
    mock_provisioning(&mut server).await;

    let import_path = format!("/collections/{STAGING}/documents/import");
    let batch_one = server
        .mock("POST", import_path.as_str())
        .match_body(Matcher::Regex("page-000".to_string()))
        .with_status(200)
        .with_body(success_lines(50))
        .create_async()
        .await;
    let batch_two = server
        .mock("POST", import_path.as_str())
        .match_body(Matcher::Regex("page-050".to_string()))
        .with_status(200)
        .with_body(lines_with_one_failure(49))
        .create_async()
        .await;
    let batch_three = server
        .mock("POST", import_path.as_str())
        .match_body(Matcher::Regex("page-100".to_string()))
        .expect(0)
        .create_async()
        .await;
    let upsert_alias = server
        .mock("PUT", format!("/aliases/{ALIAS}").as_str())
        .expect(0)
        .create_async()
        .await;

    let mut run = reindexer(store_client(&server));
    let error = run.run(&records(120), source()).await.unwrap_err();

    match error {
        ReindexError::PartialIngest {
            collection,
            failures,
        } => {
            assert_eq!(collection, STAGING);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].error.as_deref(), Some("Bad JSON."));
        }
        other => panic!("expected PartialIngest, got {other}"),
    }

    batch_one.assert_async().await;
    batch_two.assert_async().await;
    // the aborted run never issues batch three, and the alias never moves
    batch_three.assert_async().await;
    upsert_alias.assert_async().await;
}

#[tokio::test]
async fn promote_without_preexisting_alias_deletes_nothing() {
    let mut server = mockito::Server::new_async().await;
    let (delete_stale, _create) = mock_provisioning(&mut server).await;

    server
        .mock(
            "POST",
            format!("/collections/{STAGING}/documents/import").as_str(),
        )
        .with_status(200)
        .with_body(success_lines(3))
        .create_async()
        .await;
    server
        .mock("GET", format!("/aliases/{ALIAS}").as_str())
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    let upsert_alias = server
        .mock("PUT", format!("/aliases/{ALIAS}").as_str())
        .with_status(200)
        .with_body(format!(r#"{{"name":"{ALIAS}","collection_name":"{STAGING}"}}"#))
        .create_async()
        .await;

    let mut run = reindexer(store_client(&server));
    run.run(&records(3), source()).await.unwrap();

    upsert_alias.assert_async().await;
    // the only DELETE the run issues is the stale-staging check during
    // provisioning; with no previous alias target there is nothing to retire
    delete_stale.assert_async().await;
}

#[tokio::test]
async fn promote_with_preexisting_alias_retires_old_collection() {
    let mut server = mockito::Server::new_async().await;
    mock_provisioning(&mut server).await;

    server
        .mock(
            "POST",
            format!("/collections/{STAGING}/documents/import").as_str(),
        )
        .with_status(200)
        .with_body(success_lines(1))
        .create_async()
        .await;
    server
        .mock("GET", format!("/aliases/{ALIAS}").as_str())
        .with_status(200)
        .with_body(format!(r#"{{"name":"{ALIAS}","collection_name":"docs_old"}}"#))
        .create_async()
        .await;
    let upsert_alias = server
        .mock("PUT", format!("/aliases/{ALIAS}").as_str())
        .with_status(200)
        .with_body(format!(r#"{{"name":"{ALIAS}","collection_name":"{STAGING}"}}"#))
        .create_async()
        .await;
    let retire_old = server
        .mock("DELETE", "/collections/docs_old")
        .with_status(200)
        .with_body(r#"{"name": "docs_old"}"#)
        .create_async()
        .await;

    let mut run = reindexer(store_client(&server));
    run.run(&records(1), source()).await.unwrap();

    upsert_alias.assert_async().await;
    retire_old.assert_async().await;
}

#[tokio::test]
async fn failed_retirement_is_not_a_run_failure() {
    let mut server = mockito::Server::new_async().await;
    mock_provisioning(&mut server).await;

    server
        .mock(
            "POST",
            format!("/collections/{STAGING}/documents/import").as_str(),
        )
        .with_status(200)
        .with_body(success_lines(1))
        .create_async()
        .await;
    server
        .mock("GET", format!("/aliases/{ALIAS}").as_str())
        .with_status(200)
        .with_body(format!(r#"{{"name":"{ALIAS}","collection_name":"docs_old"}}"#))
        .create_async()
        .await;
    server
        .mock("PUT", format!("/aliases/{ALIAS}").as_str())
        .with_status(200)
        .with_body(format!(r#"{{"name":"{ALIAS}","collection_name":"{STAGING}"}}"#))
        .create_async()
        .await;
    let retire_old = server
        .mock("DELETE", "/collections/docs_old")
        .with_status(500)
        .with_body(r#"{"message": "internal error"}"#)
        .create_async()
        .await;

    let mut run = reindexer(store_client(&server));
    // the alias already points at the new collection; the orphan is a warning
    run.run(&records(1), source()).await.unwrap();

    retire_old.assert_async().await;
}

#[tokio::test]
async fn failed_provisioning_leaves_live_alias_untouched() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("DELETE", format!("/collections/{STAGING}").as_str())
        .with_status(404)
        .with_body(r#"{"message": "Not Found"}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/collections")
        .with_status(400)
        .with_body(r#"{"message": "wrong schema"}"#)
        .create_async()
        .await;
    let get_alias = server
        .mock("GET", format!("/aliases/{ALIAS}").as_str())
        .expect(0)
        .create_async()
        .await;
    let upsert_alias = server
        .mock("PUT", format!("/aliases/{ALIAS}").as_str())
        .expect(0)
        .create_async()
        .await;
    let import = server
        .mock(
            "POST",
            format!("/collections/{STAGING}/documents/import").as_str(),
        )
        .expect(0)
        .create_async()
        .await;

    let mut run = reindexer(store_client(&server));
    let error = run.run(&records(2), source()).await.unwrap_err();

    assert!(matches!(error, ReindexError::Provision { .. }));
    assert!(error.to_string().contains("wrong schema"));

    get_alias.assert_async().await;
    upsert_alias.assert_async().await;
    import.assert_async().await;
}

#[tokio::test]
async fn ingest_before_provisioning_is_rejected() {
    let server = mockito::Server::new_async().await;
    let run = reindexer(store_client(&server));

    let error = run.ingest(&records(1), source()).await.unwrap_err();
    assert!(matches!(error, ReindexError::NotProvisioned));
}

//! Tests for the pagination engine

use super::*;
use crate::cache::CacheStore;
use crate::query::SearchParams;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

fn speech_query(maximum_records: u32) -> Query {
    Query::speech(
        SearchParams::builder()
            .any("X")
            .maximum_records(maximum_records)
            .build(),
    )
    .unwrap()
}

fn fetcher(server: &MockServer) -> PageFetcher {
    PageFetcher::new(reqwest::Client::new(), server.uri(), CacheStore::disabled())
}

async fn run(
    server: &MockServer,
    query: &Query,
    options: &SearchOptions,
) -> crate::error::Result<SearchResult> {
    let fetcher = fetcher(server);
    PaginationEngine::new(&fetcher, query, options, std::time::Duration::ZERO)
        .run()
        .await
}

/// Mount one page of speech results served for the given cursor
async fn mount_page(server: &MockServer, start: u64, count: u64, total: u64, next: Option<u64>) {
    let records: Vec<Value> = (0..count)
        .map(|i| json!({"speechID": format!("s{}", start + i)}))
        .collect();
    let mut body = json!({"numberOfRecords": total, "speechRecord": records});
    if let Some(n) = next {
        body["nextRecordPosition"] = json!(n);
    }

    Mock::given(method("GET"))
        .and(path("/speech"))
        .and(query_param("startRecord", start.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

// ============================================================================
// Aggregation Tests
// ============================================================================

#[tokio::test]
async fn test_exhaustive_aggregation_25_records_in_3_pages() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 10, 25, Some(11)).await;
    mount_page(&server, 11, 10, 25, Some(21)).await;
    mount_page(&server, 21, 5, 25, None).await;

    let query = speech_query(10);
    let result = run(&server, &query, &SearchOptions::new()).await.unwrap();

    assert_eq!(result.total_available, 25);
    assert_eq!(result.records.len(), 25);
    assert_eq!(result.pages_fetched, 3);
    assert!(!result.truncated);

    // Service order preserved across page boundaries
    assert_eq!(result.records[0].get("speechID"), Some(&json!("s1")));
    assert_eq!(result.records[10].get("speechID"), Some(&json!("s11")));
    assert_eq!(result.records[24].get("speechID"), Some(&json!("s25")));
}

#[tokio::test]
async fn test_limit_total_truncates_and_stops_fetching() {
    let server = MockServer::start().await;
    // Page 3 is never requested; .expect(1) on the first two verifies counts
    mount_page(&server, 1, 10, 25, Some(11)).await;
    mount_page(&server, 11, 10, 25, Some(21)).await;

    let query = speech_query(10);
    let options = SearchOptions::new().with_limit_total(15);
    let result = run(&server, &query, &options).await.unwrap();

    assert_eq!(result.records.len(), 15);
    assert!(result.truncated);
    assert_eq!(result.pages_fetched, 2);
    assert_eq!(result.total_available, 25);
    assert_eq!(result.records[14].get("speechID"), Some(&json!("s15")));
}

#[tokio::test]
async fn test_limit_above_total_is_not_truncation() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 5, 5, None).await;

    let query = speech_query(10);
    let options = SearchOptions::new().with_limit_total(100);
    let result = run(&server, &query, &options).await.unwrap();

    assert_eq!(result.records.len(), 5);
    assert!(!result.truncated);
    assert_eq!(result.pages_fetched, 1);
}

#[tokio::test]
async fn test_single_page_result() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 3, 3, None).await;

    let query = speech_query(10);
    let result = run(&server, &query, &SearchOptions::new()).await.unwrap();

    assert_eq!(result.total_available, 3);
    assert_eq!(result.records.len(), 3);
    assert_eq!(result.pages_fetched, 1);
}

#[tokio::test]
async fn test_empty_result_set() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 0, 0, None).await;

    let query = speech_query(10);
    let result = run(&server, &query, &SearchOptions::new()).await.unwrap();

    assert_eq!(result.total_available, 0);
    assert!(result.records.is_empty());
    assert!(!result.truncated);
}

#[tokio::test]
async fn test_zero_limit_total_is_rejected_locally() {
    // No mocks mounted: validation must fire before any request
    let server = MockServer::start().await;

    let query = speech_query(10);
    let options = SearchOptions::new().with_limit_total(0);
    let err = run(&server, &query, &options).await.unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
}

// ============================================================================
// Dry-run Tests
// ============================================================================

#[tokio::test]
async fn test_dry_run_issues_exactly_one_minimal_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/speech"))
        .and(query_param("maximumRecords", "1"))
        .and(query_param("startRecord", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numberOfRecords": 48213,
            "nextRecordPosition": 2,
            "speechRecord": [{"speechID": "s1"}],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = speech_query(100);
    let options = SearchOptions::new().with_dry_run(true);
    let result = run(&server, &query, &options).await.unwrap();

    assert_eq!(result.total_available, 48213);
    assert!(result.records.is_empty());
    assert!(!result.truncated);
    assert_eq!(result.pages_fetched, 1);
}

// ============================================================================
// Failure Propagation Tests
// ============================================================================

#[tokio::test]
async fn test_mid_stream_failure_returns_no_partial_result() {
    let server = MockServer::start().await;
    mount_page(&server, 1, 10, 25, Some(11)).await;
    Mock::given(method("GET"))
        .and(path("/speech"))
        .and(query_param("startRecord", "11"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let query = speech_query(10);
    let err = run(&server, &query, &SearchOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Status { status: 502, .. }));
}

// ============================================================================
// Safety Bound Tests
// ============================================================================

#[tokio::test]
async fn test_non_advancing_cursor_is_an_invariant_violation() {
    let server = MockServer::start().await;
    // The service keeps pointing at position 2
    Mock::given(method("GET"))
        .and(path("/speech"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "numberOfRecords": 50,
            "nextRecordPosition": 2,
            "speechRecord": [{"speechID": "s"}],
        })))
        .mount(&server)
        .await;

    let query = speech_query(10);
    let err = run(&server, &query, &SearchOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PaginationInvariant { .. }));
    assert!(err.to_string().contains("did not advance"));
}

/// Responds with a cursor that always advances, so only the page ceiling can
/// stop the run.
struct EndlessCursor {
    served: AtomicU64,
}

impl Respond for EndlessCursor {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        let n = self.served.fetch_add(1, Ordering::SeqCst);
        ResponseTemplate::new(200).set_body_json(json!({
            "numberOfRecords": 3,
            "nextRecordPosition": n + 2,
            "speechRecord": [{"speechID": format!("s{n}")}],
        }))
    }
}

#[tokio::test]
async fn test_endless_cursor_chain_hits_the_ceiling() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/speech"))
        .respond_with(EndlessCursor {
            served: AtomicU64::new(0),
        })
        .mount(&server)
        .await;

    // total 3 at page size 1: a terminating run needs 3 pages, the ceiling
    // allows 3 + SAFETY_MARGIN
    let query = speech_query(1);
    let err = run(&server, &query, &SearchOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::PaginationInvariant { .. }));
    assert!(err.to_string().contains("ceiling"));
}

#[test]
fn test_search_result_serializes_to_json() {
    let result = SearchResult {
        total_available: 25,
        records: vec![json!({"speechID": "s1"}).as_object().cloned().unwrap()],
        truncated: true,
        pages_fetched: 3,
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["total_available"], 25);
    assert_eq!(value["truncated"], true);
    assert_eq!(value["pages_fetched"], 3);
    assert_eq!(value["records"][0]["speechID"], "s1");
}

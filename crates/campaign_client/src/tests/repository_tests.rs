use super::*;
use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use shared::domain::CampaignStatus;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct StoreState {
    seen_query: Arc<Mutex<Option<HashMap<String, String>>>>,
    seen_api_key: Arc<Mutex<Option<String>>>,
}

fn row(id: &str, status: &str, createdat: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Campaign {id}"),
        "status": status,
        "audience": 100,
        "delivered": 90,
        "opened": 30,
        "createdat": createdat,
    })
}

async fn list_campaigns(
    State(state): State<StoreState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Vec<serde_json::Value>> {
    *state.seen_query.lock().await = Some(query);
    *state.seen_api_key.lock().await = headers
        .get("apikey")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    Json(vec![
        row("c-2", "active", "2024-02-02T00:00:00Z"),
        row("c-bad", "archived", "2024-01-15T00:00:00Z"),
        serde_json::json!({
            "id": "c-null", "name": "Null status", "status": null,
            "audience": 1, "delivered": 0, "opened": 0,
            "createdat": "2024-01-10T00:00:00Z"
        }),
        row("c-1", "draft", "2024-01-01T00:00:00Z"),
    ])
}

async fn broken_store() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "store offline")
}

async fn garbage_store() -> impl IntoResponse {
    (StatusCode::OK, "not json")
}

async fn spawn_store(state: StoreState) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/rest/v1/campaigns", get(list_campaigns))
        .route("/rest/v1/broken", get(broken_store))
        .route("/rest/v1/garbage", get(garbage_store))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/rest/v1")
}

#[test]
fn endpoint_requests_newest_first() {
    let endpoint = collection_endpoint("http://store.local/rest/v1/", "campaigns").expect("url");
    assert_eq!(
        endpoint.as_str(),
        "http://store.local/rest/v1/campaigns?select=*&order=createdat.desc"
    );
}

#[test]
fn rejects_unusable_store_url() {
    assert!(matches!(
        collection_endpoint("not a url", "campaigns"),
        Err(FetchError::InvalidStoreUrl(_))
    ));
    assert!(matches!(
        RestCampaignRepository::new("mailto:ops@example.com", "campaigns", None),
        Err(FetchError::InvalidStoreUrl(_))
    ));
}

#[test]
fn ingest_drops_malformed_rows_and_keeps_order() {
    let rows = vec![
        serde_json::json!({
            "id": "b", "name": "B", "status": "scheduled",
            "audience": 10, "delivered": 0, "opened": 0,
            "createdat": "2024-01-02T00:00:00Z"
        }),
        serde_json::json!({
            "id": "broken", "name": "Broken", "status": "failed",
            "audience": 10, "delivered": 20, "opened": 0,
            "createdat": "2024-01-03T00:00:00Z"
        }),
        serde_json::json!({
            "id": "a", "name": "A", "status": "failed",
            "audience": 10, "delivered": 10, "opened": 3,
            "createdat": "2024-01-01T00:00:00Z"
        }),
    ];
    let fetched = ingest_rows(rows);
    assert_eq!(fetched.rejected, 1);
    let ids: Vec<&str> = fetched.campaigns.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[test]
fn row_with_wrong_shape_is_rejected_without_losing_its_neighbours() {
    let rows = vec![
        row("ok", "active", "2024-01-01T00:00:00Z"),
        serde_json::json!({
            "id": "null-status", "name": "N", "status": null,
            "audience": 10, "delivered": 0, "opened": 0,
            "createdat": "2024-01-01T00:00:00Z"
        }),
        serde_json::json!({
            "id": "fractional", "name": "F", "status": "draft",
            "audience": 10.5, "delivered": 0, "opened": 0,
            "createdat": "2024-01-01T00:00:00Z"
        }),
        serde_json::json!({
            "id": "missing-counter", "name": "M", "status": "draft",
            "audience": 10, "opened": 0,
            "createdat": "2024-01-01T00:00:00Z"
        }),
        serde_json::json!("not an object"),
    ];

    let fetched = ingest_rows(rows);

    assert_eq!(fetched.rejected, 4);
    assert_eq!(fetched.campaigns.len(), 1);
    assert_eq!(fetched.campaigns[0].id.as_str(), "ok");
    assert!(matches!(
        decode_row(serde_json::json!({ "id": "x" })),
        Err(MalformedRecord::InvalidShape(_))
    ));
}

#[tokio::test]
async fn fetch_all_queries_store_and_validates_rows() {
    let state = StoreState::default();
    let store_url = spawn_store(state.clone()).await;
    let repository =
        RestCampaignRepository::new(&store_url, "campaigns", Some("anon-key".to_string()))
            .expect("repository");

    let fetched = repository.fetch_all().await.expect("fetch");

    assert_eq!(fetched.rejected, 2);
    assert_eq!(fetched.campaigns.len(), 2);
    assert_eq!(fetched.campaigns[0].id.as_str(), "c-2");
    assert_eq!(fetched.campaigns[1].status, CampaignStatus::Draft);

    let query = state.seen_query.lock().await.clone().expect("query seen");
    assert_eq!(query.get("select").map(String::as_str), Some("*"));
    assert_eq!(query.get("order").map(String::as_str), Some("createdat.desc"));
    assert_eq!(
        state.seen_api_key.lock().await.as_deref(),
        Some("anon-key")
    );
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let store_url = spawn_store(StoreState::default()).await;
    let repository = RestCampaignRepository::new(&store_url, "broken", None).expect("repository");

    let err = repository.fetch_all().await.expect_err("should fail");
    assert_eq!(
        err,
        FetchError::Status {
            status: 503,
            body: "store offline".to_string()
        }
    );
}

#[tokio::test]
async fn undecodable_payload_is_a_decode_error() {
    let store_url = spawn_store(StoreState::default()).await;
    let repository = RestCampaignRepository::new(&store_url, "garbage", None).expect("repository");

    let err = repository.fetch_all().await.expect_err("should fail");
    assert!(matches!(err, FetchError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_store_is_a_transport_error() {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let repository =
        RestCampaignRepository::new(&format!("http://{addr}"), "campaigns", None)
            .expect("repository");
    let err = repository.fetch_all().await.expect_err("should fail");
    assert!(matches!(err, FetchError::Transport(_)), "got {err:?}");
}

#[tokio::test]
async fn static_repository_counts_calls() {
    let repository = StaticCampaignRepository::failing(FetchError::Cancelled);
    let calls = repository.call_counter();
    assert_eq!(repository.fetch_all().await, Err(FetchError::Cancelled));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

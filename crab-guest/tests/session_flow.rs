use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use crab_guest::storage::{FileStorage, SharedStorageArea};
use crab_guest::{
    BillBreakdown, Destination, GuestConfig, GuestError, ResolveError, RouteParams, SessionApi,
    SessionBootstrap, SessionParams, SessionStore, TenantSettings, TenantSettingsProvider,
    customer_href, resolve_customer_context,
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use shared::error::ErrorCode;
use shared::models::SessionStartRequest;
use std::sync::Arc;
use tokio::net::TcpListener;

const TABLE: &str = "3f2b8c1e-9d4a-4c6b-8e2f-1a2b3c4d5e6f";

/// Upstream stub; the table code selects the response
async fn start_session(Json(body): Json<Value>) -> axum::response::Response {
    let table_code = body["tableCode"].as_str().unwrap_or_default();
    match table_code {
        "T-400" => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "code": 7, "message": "tableCode is required" })),
        )
            .into_response(),
        "T-404" => (
            StatusCode::NOT_FOUND,
            Json(json!({ "code": 7007, "message": "Table not found" })),
        )
            .into_response(),
        "T-409" => (
            StatusCode::CONFLICT,
            Json(json!({ "code": 7006, "message": "Table is closed" })),
        )
            .into_response(),
        "T-502" => (StatusCode::BAD_GATEWAY, "upstream down").into_response(),
        "T-ENVELOPE" => (
            StatusCode::OK,
            Json(json!({ "code": 3002, "message": "Tenant not found" })),
        )
            .into_response(),
        "T-GARBAGE" => (StatusCode::OK, "<html>").into_response(),
        _ => (
            StatusCode::OK,
            Json(json!({
                "code": 0,
                "message": "OK",
                "data": {
                    "sessionToken": "sess-abc",
                    "tableId": TABLE,
                    "tenantSettings": {
                        "currencyCode": "IDR",
                        "currencySymbol": "Rp",
                        "tax": { "enabled": true, "rate": 11 },
                        "serviceCharge": { "enabled": true, "rate": 5 }
                    },
                    "tenantInfo": { "name": "Warung Sari", "address": "Jl. Kenanga 4" }
                }
            })),
        )
            .into_response(),
    }
}

async fn spawn_upstream() -> String {
    let router = Router::new().route("/api/guest/session/start", post(start_session));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn session_api() -> SessionApi {
    let config = GuestConfig::from_env()
        .with_api_base_url(spawn_upstream().await)
        .with_timeout_ms(5_000);
    SessionApi::new(&config).unwrap()
}

fn request(table_code: &str) -> SessionStartRequest {
    SessionStartRequest::new("warung-sari", table_code, "id").with_party_size(2)
}

#[tokio::test]
async fn session_start_feeds_every_tab() {
    let api = session_api().await;
    let area = SharedStorageArea::new();
    let tab_a = Arc::new(SessionStore::new(area.open_tab()));
    let tab_b = Arc::new(SessionStore::new(area.open_tab()));

    let provider_a = TenantSettingsProvider::new(Arc::clone(&tab_a));
    let provider_b = TenantSettingsProvider::new(Arc::clone(&tab_b));
    provider_a.mount();
    provider_b.mount();
    assert_eq!(provider_a.current().settings, TenantSettings::default());

    let bootstrap = SessionBootstrap::new(Arc::clone(&tab_a));
    let data = bootstrap.start_session(&api, &request("T-7")).await.unwrap();
    assert_eq!(data.session_token, "sess-abc");

    // Writer tab: same-tab event
    assert!(provider_a.sync_pending() > 0);
    assert_eq!(provider_a.current().settings.currency_code, "IDR");
    assert_eq!(provider_a.format_price(Decimal::from(25000)), "Rp 25,000");

    // Other tab: native storage event
    assert!(provider_b.sync_pending() > 0);
    assert_eq!(provider_b.current().tenant_name.as_deref(), Some("Warung Sari"));

    // Pages in either tab resolve the context from storage alone
    let ctx = resolve_customer_context(&RouteParams::new("warung-sari"), tab_b.as_ref()).unwrap();
    assert_eq!(ctx.table(), TABLE);
    assert_eq!(ctx.token(), "sess-abc");

    let href = customer_href(
        "warung-sari",
        Destination::Item("nasi-goreng"),
        &SessionParams::default(),
        tab_a.as_ref(),
    );
    assert_eq!(
        href,
        format!("/warung-sari/menu/nasi-goreng?table={TABLE}&token=sess-abc")
    );

    let bill = BillBreakdown::compute(Decimal::from(100_000), &provider_a.current().settings);
    assert_eq!(bill.total, Decimal::from(116_550));

    bootstrap.end_session();
    assert_eq!(
        resolve_customer_context(&RouteParams::new("warung-sari"), tab_b.as_ref()).unwrap_err(),
        ResolveError::MissingParams
    );
    provider_b.sync_pending();
    assert_eq!(provider_b.current().settings, TenantSettings::default());
    assert_eq!(
        customer_href("warung-sari", Destination::Cart, &SessionParams::default(), tab_a.as_ref()),
        "/warung-sari/menu"
    );
}

#[tokio::test]
async fn listener_follows_session_start() {
    let api = session_api().await;
    let store = Arc::new(SessionStore::new(crab_guest::storage::MemoryStorage::new()));
    let provider = Arc::new(TenantSettingsProvider::new(Arc::clone(&store)));
    provider.mount();
    let mut snapshots = provider.subscribe();
    snapshots.borrow_and_update();
    let listener = provider.spawn_listener();

    SessionBootstrap::new(Arc::clone(&store))
        .start_session(&api, &request("T-7"))
        .await
        .unwrap();

    tokio::time::timeout(std::time::Duration::from_secs(2), async {
        loop {
            snapshots.changed().await.unwrap();
            if snapshots.borrow().tenant_name.is_some() {
                break;
            }
        }
    })
    .await
    .expect("provider caught up");

    assert_eq!(provider.current().settings.currency_symbol, "Rp");
    listener.abort();
}

#[tokio::test]
async fn upstream_status_categories() {
    let api = session_api().await;

    let err = api.start_session(&request("T-400")).await.unwrap_err();
    assert!(matches!(err, GuestError::MissingFields(ref m) if m == "tableCode is required"));
    assert_eq!(err.code(), ErrorCode::RequiredField);

    let err = api.start_session(&request("T-404")).await.unwrap_err();
    assert!(matches!(err, GuestError::NotFound(_)));
    assert_eq!(err.code(), ErrorCode::TenantOrTableNotFound);

    let err = api.start_session(&request("T-409")).await.unwrap_err();
    assert!(matches!(err, GuestError::TableUnavailable(ref m) if m == "Table is closed"));

    let err = api.start_session(&request("T-502")).await.unwrap_err();
    assert!(matches!(
        err,
        GuestError::Upstream { code: ErrorCode::NetworkError, ref message } if message == "upstream down"
    ));

    let err = api.start_session(&request("T-ENVELOPE")).await.unwrap_err();
    assert!(matches!(err, GuestError::NotFound(_)));

    let err = api.start_session(&request("T-GARBAGE")).await.unwrap_err();
    assert!(matches!(err, GuestError::InvalidResponse(_)));
}

#[tokio::test]
async fn failed_start_writes_nothing() {
    let api = session_api().await;
    let store = Arc::new(SessionStore::new(crab_guest::storage::MemoryStorage::new()));
    let mut changes = store.subscribe(&crab_guest::RecordKey::ALL);

    let result = SessionBootstrap::new(Arc::clone(&store))
        .start_session(&api, &request("T-409"))
        .await;

    assert!(result.is_err());
    assert!(store.tenant_settings().is_none());
    assert!(changes.try_next().is_none());
}

#[tokio::test]
async fn file_storage_survives_reopen() {
    let api = session_api().await;
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = Arc::new(SessionStore::new(FileStorage::new(&path)));
    SessionBootstrap::new(store)
        .start_session(&api, &request("T-7"))
        .await
        .unwrap();

    let reopened = SessionStore::new(FileStorage::new(&path));
    assert_eq!(reopened.tenant_info().unwrap().name, "Warung Sari");
    let ctx = resolve_customer_context(&RouteParams::new("warung-sari").with_token("fresh"), &reopened)
        .unwrap();
    assert_eq!(ctx.table(), TABLE);
    assert_eq!(ctx.token(), "fresh");
}

#[tokio::test]
async fn start_without_storage_still_returns_data() {
    let api = session_api().await;
    let store = Arc::new(SessionStore::new(crab_guest::storage::UnavailableStorage));

    let data = SessionBootstrap::new(Arc::clone(&store))
        .start_session(&api, &request("T-7"))
        .await
        .unwrap();

    assert_eq!(data.session_token, "sess-abc");
    assert!(store.tenant_settings().is_none());
    assert!(store.customer_token().is_none());
}

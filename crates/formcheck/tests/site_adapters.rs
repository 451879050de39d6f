use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::routing::{get, post};
use axum::{Json, Router};
use formcheck::adapters::{RestDataStore, SiteClient};
use formcheck::config::{DatabaseConfig, SiteConfig};
use formcheck::diagnostics::{
    generate_test_report, DataStore, DatabaseProbe, ProbeError, SystemHealthAggregator,
};
use formcheck::forms::{sample_payload, FormType};
use serde_json::{json, Value};

async fn spawn(router: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub site");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("stub site serves");
    });
    addr
}

async fn rest_table(
    Path(table): Path<String>,
    uri: Uri,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let authorized = headers.get("apikey").is_some_and(|key| key == "anon")
        && headers
            .get("authorization")
            .is_some_and(|value| value == "Bearer anon");
    if !authorized {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid API key" })),
        );
    }
    if uri.query() != Some("select=id&limit=1") {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "bad query" })));
    }
    if table == "job_applications" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "relation \"public.job_applications\" does not exist" })),
        );
    }
    (StatusCode::OK, Json(json!([{ "id": 1 }])))
}

async fn healthy() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": { "services": { "email": { "status": "healthy" } } }
    }))
}

async fn accept_contact(Json(payload): Json<Value>) -> (StatusCode, Json<Value>) {
    if payload.get("email").is_some() {
        (StatusCode::OK, Json(json!({ "success": true })))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "success": false, "message": "Email is required" })),
        )
    }
}

fn stub_site() -> Router {
    Router::new()
        .route("/rest/v1/:table", get(rest_table))
        .route("/api/health-check", get(healthy))
        .route("/api/contact", post(accept_contact))
}

fn database_config(addr: SocketAddr, key: &str) -> DatabaseConfig {
    DatabaseConfig {
        url: format!("http://{addr}"),
        anon_key: key.to_string(),
    }
}

#[tokio::test]
async fn rest_store_probes_tables_with_api_key() {
    let addr = spawn(stub_site()).await;
    let store = RestDataStore::new(Some(database_config(addr, "anon"))).expect("client builds");

    assert_eq!(store.probe_table("contact_submissions").await, Ok(()));
    assert_eq!(
        store.probe_table("job_applications").await,
        Err(ProbeError::Rejected(
            "relation \"public.job_applications\" does not exist".to_string()
        ))
    );
    assert_eq!(store.test_connection().await, Ok(true));
}

#[tokio::test]
async fn rest_store_maps_failures_to_false() {
    let addr = spawn(stub_site()).await;
    let wrong_key = RestDataStore::new(Some(database_config(addr, "wrong"))).expect("client builds");
    assert_eq!(
        wrong_key.probe_table("contact_submissions").await,
        Err(ProbeError::Rejected("Invalid API key".to_string()))
    );
    assert_eq!(wrong_key.test_connection().await, Ok(false));

    let unconfigured = RestDataStore::new(None).expect("client builds");
    assert_eq!(
        unconfigured.probe_table("contact_submissions").await,
        Err(ProbeError::NotConfigured("database"))
    );
    assert_eq!(unconfigured.test_connection().await, Ok(false));
}

#[tokio::test]
async fn full_system_test_against_live_stub() {
    let addr = spawn(stub_site()).await;
    let store = RestDataStore::new(Some(database_config(addr, "anon"))).expect("client builds");
    let site = SiteClient::new(SiteConfig::new(format!("http://{addr}/")).expect("valid url"))
        .expect("client builds");
    let aggregator = SystemHealthAggregator::new(Arc::new(store), Arc::new(site));

    let status = aggregator.run_full_system_test().await;
    assert!(status.overall, "details: {:?}", status.details);

    let report = generate_test_report(&status);
    assert!(report.contains("ALL SYSTEMS OPERATIONAL"));
    assert!(report.contains("\"name\": \"Project Builder\""));
}

#[tokio::test]
async fn form_submission_follows_site_status() {
    let addr = spawn(stub_site()).await;
    let store = RestDataStore::new(None).expect("client builds");
    let site = SiteClient::new(SiteConfig::new(format!("http://{addr}")).expect("valid url"))
        .expect("client builds");
    let aggregator = SystemHealthAggregator::new(Arc::new(store), Arc::new(site));

    let contact = sample_payload(FormType::Contact);
    assert!(aggregator.test_form_submission(FormType::Contact, &contact).await);
    assert!(
        !aggregator
            .test_form_submission(FormType::Contact, &json!({ "name": "No Email" }))
            .await
    );
    // The stub has no job endpoint, so the site answers 404.
    assert!(
        !aggregator
            .test_form_submission(FormType::Job, &sample_payload(FormType::Job))
            .await
    );
}

#[tokio::test]
async fn unreachable_site_fails_soft() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let store = RestDataStore::new(Some(database_config(addr, "anon"))).expect("client builds");
    let site = SiteClient::new(SiteConfig::new(format!("http://{addr}")).expect("valid url"))
        .expect("client builds");
    let aggregator = SystemHealthAggregator::new(Arc::new(store), Arc::new(site));

    let status = aggregator.run_full_system_test().await;
    assert!(!status.database);
    assert!(!status.email);
    assert!(status.forms.all_passed());
    assert!(!status.overall);
    assert!(status.details.error.is_none());
}

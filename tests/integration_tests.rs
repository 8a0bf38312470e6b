//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → ResourceClient → HTTP requests

use resource_client::auth::AuthConfig;
use resource_client::http::{HttpClient, HttpClientConfig, Transport};
use resource_client::{
    load_config_from_str, BaseEndpoint, ClientConfig, Error, Filters, ResourceCapabilities,
    ResourceClient,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Order {
    #[serde(default)]
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    status: String,
}

fn config_for(server: &MockServer, extra: &str) -> ClientConfig {
    let yaml = format!(
        "base_url: \"{}\"\nresources:\n  orders: /api/orders\n{extra}",
        server.uri()
    );
    load_config_from_str(&yaml).unwrap()
}

fn orders_client(config: &ClientConfig, defaults: Order) -> ResourceClient<Order> {
    let http = HttpClient::with_auth(config.http_client_config(), config.auth_config()).unwrap();
    ResourceClient::new(
        config.resource_path("orders").unwrap(),
        ResourceCapabilities::from_http_client(http),
        defaults,
    )
    .with_pagination(config.pagination)
}

// ============================================================================
// CRUD
// ============================================================================

#[tokio::test]
async fn test_index_sends_filters_and_reads_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(query_param("length", "10"))
        .and(query_param("status", "open"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1, "name": "first" }, { "id": 2, "name": "second" }],
            "offset": 0,
            "length": 10,
            "total": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = orders_client(&config_for(&server, ""), Order::default());
    let page = client
        .index(Filters::default().set("status", "open"))
        .await
        .unwrap();

    assert_eq!(page.total, Some(2));
    assert_eq!(page.data[1].name, "second");
}

#[tokio::test]
async fn test_get_is_cached_and_filled_from_defaults() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/42"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "id": 42, "name": "widget" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let defaults = Order {
        status: "draft".to_string(),
        ..Order::default()
    };
    let client = orders_client(&config_for(&server, ""), defaults);

    let first = client.get("42").await.unwrap();
    let second = client.get("42").await.unwrap();

    assert_eq!(first, second);
    assert_eq!(
        first,
        Order {
            id: 42,
            name: "widget".to_string(),
            status: "draft".to_string(),
        }
    );
}

#[tokio::test]
async fn test_update_invalidates_cached_item() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 7, "name": "old" })))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/orders/7"))
        .and(body_json(json!({ "id": 7, "name": "new", "status": "" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = orders_client(&config_for(&server, ""), Order::default());

    client.get("7").await.unwrap();
    let updated = Order {
        id: 7,
        name: "new".to_string(),
        ..Order::default()
    };
    client.update("7", &updated).await.unwrap();
    client.get("7").await.unwrap();
}

#[tokio::test]
async fn test_create_and_delete() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/orders"))
        .and(body_json(json!({ "id": 0, "name": "widget", "status": "open" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": 314 })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/orders/314"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = orders_client(&config_for(&server, ""), Order::default());
    let order = Order {
        name: "widget".to_string(),
        status: "open".to_string(),
        ..Order::default()
    };

    let id = client.create(&order).await.unwrap();
    assert_eq!(id, 314);

    client.delete(&id.to_string()).await.unwrap();
}

#[tokio::test]
async fn test_missing_record_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders/404"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&server)
        .await;

    let client = orders_client(&config_for(&server, ""), Order::default());
    let err = client.get("404").await.unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(err, Error::HttpStatus { ref body, .. } if body == "not found"));
}

// ============================================================================
// All pages
// ============================================================================

async fn mount_page(
    server: &MockServer,
    offset: u64,
    with_total: bool,
    delay_ms: u64,
    total: u64,
) {
    let ids: Vec<Value> = (offset..(offset + 50).min(total))
        .map(|id| json!({ "id": id }))
        .collect();
    let mut body = json!({ "data": ids, "offset": offset, "length": 50 });
    if with_total {
        body["total"] = json!(total);
    }

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(query_param("offset", offset.to_string()))
        .and(query_param("length", "50"))
        .and(query_param("withTotal", with_total.to_string()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(body)
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_all_pages_are_stitched_in_page_order() {
    let server = MockServer::start().await;
    mount_page(&server, 0, true, 0, 130).await;
    mount_page(&server, 50, false, 150, 130).await;
    mount_page(&server, 100, false, 0, 130).await;

    let client = orders_client(&config_for(&server, ""), Order::default());
    let records = client
        .get_all_pages_base_list(Filters::empty(), None)
        .await;

    let ids: Vec<i64> = records.iter().map(|o| o.id).collect();
    assert_eq!(ids, (0..130).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_all_pages_failure_yields_empty_list() {
    let server = MockServer::start().await;
    mount_page(&server, 0, true, 0, 130).await;
    mount_page(&server, 50, false, 0, 130).await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = orders_client(&config_for(&server, ""), Order::default());
    let records = client
        .get_all_pages_base_list(Filters::empty(), None)
        .await;

    assert!(records.is_empty());
}

#[tokio::test]
async fn test_all_pages_with_configured_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(query_param("length", "2"))
        .and(query_param("withTotal", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": 1 }, { "id": 2 }],
            "total": 3
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(query_param("offset", "2"))
        .and(query_param("withTotal", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [{ "id": 3 }] })))
        .expect(1)
        .mount(&server)
        .await;

    let config = config_for(&server, "pagination:\n  page_size: 2\n");
    let client = orders_client(&config, Order::default());
    let records = client
        .get_all_pages_base_list(Filters::empty(), None)
        .await;

    assert_eq!(records.len(), 3);
}

// ============================================================================
// Endpoints and transports
// ============================================================================

#[tokio::test]
async fn test_base_discovered_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/discovery"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "orders": "/v2/orders" })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/orders/5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 5 })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v2/orders"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    let http = Arc::new(
        HttpClient::with_config(HttpClientConfig::builder().base_url(server.uri()).build())
            .unwrap(),
    );
    let discovery = http.clone();
    let base = BaseEndpoint::discover(move || {
        let discovery = discovery.clone();
        async move {
            let services: Value = discovery.get_json("/discovery").await?;
            services["orders"]
                .as_str()
                .map(str::to_string)
                .ok_or_else(|| Error::endpoint("no orders service"))
        }
    });
    let transport: Arc<dyn Transport> = http;
    let client: ResourceClient<Order> = ResourceClient::new(
        base,
        ResourceCapabilities::from_transports(transport.clone(), transport),
        Order::default(),
    );

    let (order, page) = tokio::join!(client.get("5"), client.index(Filters::default()));
    assert_eq!(order.unwrap().id, 5);
    assert!(page.unwrap().is_empty());
}

#[tokio::test]
async fn test_raw_transport_skips_auth() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(header("Authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/public/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "up": true })))
        .expect(1)
        .mount(&server)
        .await;

    let http = HttpClient::with_auth(
        HttpClientConfig::builder().base_url(server.uri()).build(),
        AuthConfig::bearer("secret"),
    )
    .unwrap();
    let client: ResourceClient<Order> = ResourceClient::new(
        "/api/orders",
        ResourceCapabilities::from_http_client(http),
        Order::default(),
    );

    client.index(Filters::default()).await.unwrap();
    let status = client
        .raw_transport()
        .get("/public/status", &Vec::new())
        .await
        .unwrap();
    assert_eq!(status, json!({ "up": true }));

    let requests = server.received_requests().await.unwrap();
    let public = requests
        .iter()
        .find(|r| r.url.path() == "/public/status")
        .unwrap();
    assert!(public.headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_oauth2_token_is_fetched_once() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "tok-1",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(header("Authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    let auth = format!(
        concat!(
            "auth:\n",
            "  type: oauth2_client_credentials\n",
            "  token_url: \"{}/oauth/token\"\n",
            "  client_id: id\n",
            "  client_secret: secret\n",
        ),
        server.uri()
    );
    let client = orders_client(&config_for(&server, &auth), Order::default());

    client.index(Filters::default()).await.unwrap();
    client.index(Filters::default()).await.unwrap();
}

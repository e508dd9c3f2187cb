use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use rest_harness::http::RequestBody;
use rest_harness::testing::MockTransport;
use rest_harness::{ErrorKind, HarnessError, HttpMethod, RawResponse, RequestFactory};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Product {
    name: String,
    price: i64,
}

fn factory() -> (RequestFactory, Arc<MockTransport>) {
    rest_harness::logging::init();
    let transport = Arc::new(MockTransport::new());
    let factory = RequestFactory::with_transport("https://localhost:5001", transport.clone())
        .expect("factory should build");
    (factory, transport)
}

#[tokio::test]
async fn test_dispatched_request_reflects_configuration() {
    let (factory, transport) = factory();

    factory
        .create()
        .with_request("Product/{category}/{id}")
        .with_header("Authorization", "Bearer first")
        .with_header("X-Trace", "abc")
        .with_header("Authorization", "Bearer second")
        .with_query_parameter("tag", "a")
        .with_query_parameter("tag", "b")
        .with_query_parameter("page", 2)
        .with_url_segment("category", "hardware")
        .with_url_segment("id", 1)
        .with_url_segment("id", 7)
        .with_get_raw()
        .await
        .expect("request should succeed");

    assert_eq!(transport.calls(), 1);
    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.method, HttpMethod::Get);
    assert_eq!(request.url.path(), "/Product/hardware/7");
    assert_eq!(
        request.query_pairs(),
        vec![
            ("tag".to_string(), "a".to_string()),
            ("tag".to_string(), "b".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
    assert_eq!(request.header("authorization"), Some("Bearer second"));
    assert_eq!(request.header("X-Trace"), Some("abc"));
    assert_eq!(request.headers.len(), 2);
    assert_eq!(request.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_unresolved_segment_fails_before_dispatch() {
    let (factory, transport) = factory();

    let err = factory
        .create()
        .with_request("Product/GetProductById/{id}")
        .with_get::<Product>()
        .await
        .expect_err("segment is missing");

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_missing_path_fails_before_dispatch() {
    let (factory, transport) = factory();

    let err = factory
        .create()
        .with_header("Accept", "application/json")
        .with_get::<Product>()
        .await
        .expect_err("path is missing");

    assert!(matches!(err, HarnessError::Config(_)));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_builders_from_one_factory_are_isolated() {
    let (factory, transport) = factory();

    let builder_a = factory
        .create()
        .with_request("Product")
        .with_header("X-Builder", "a")
        .with_query_parameter("q", "a")
        .with_body(&json!({"from": "a"}));
    let builder_b = factory.create();

    assert!(!builder_a.spec().is_empty());
    assert!(builder_b.spec().is_empty());

    let (a, b) = tokio::join!(
        builder_a.with_post_raw(),
        builder_b.with_request("Other").with_get_raw()
    );
    a.expect("builder a succeeds");
    b.expect("builder b succeeds");

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    let other = requests
        .iter()
        .find(|request| request.url.path() == "/Other")
        .expect("builder b request");
    assert!(other.headers.is_empty());
    assert!(other.url.query().is_none());
    assert_eq!(other.body, RequestBody::Empty);
}

#[tokio::test]
async fn test_typed_get_deserializes_response() {
    let (factory, transport) = factory();
    transport.respond_json(StatusCode::OK, &json!({"name": "Monitor", "price": 400}));

    let product: Product = factory
        .create()
        .with_request("Product/GetProductById/{id}")
        .with_url_segment("id", "2")
        .with_get()
        .await
        .expect("product");

    assert_eq!(product.name, "Monitor");
    assert_eq!(product.price, 400);
    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.url.as_str(), "https://localhost:5001/Product/GetProductById/2");
}

#[tokio::test]
async fn test_json_body_is_dispatched_as_json() {
    let (factory, transport) = factory();
    let product = Product {
        name: "ProductName".to_string(),
        price: 209,
    };
    transport.respond_json(StatusCode::OK, &json!({"name": "ProductName", "price": 209}));

    let created: Product = factory
        .create()
        .with_request("Product/Create")
        .with_body(&product)
        .with_post()
        .await
        .expect("created product");

    assert_eq!(created, product);
    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(
        request.body,
        RequestBody::Json(json!({"name": "ProductName", "price": 209}))
    );
}

#[tokio::test]
async fn test_deserialization_error_keeps_status_and_body() {
    let (factory, transport) = factory();
    transport.respond_with(RawResponse::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        HeaderMap::new(),
        "server exploded",
    ));

    let err = factory
        .create()
        .with_request("Product/GetProductById/1")
        .with_get::<Product>()
        .await
        .expect_err("body is not a product");

    assert_eq!(err.kind(), ErrorKind::Deserialization);
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    match err {
        HarnessError::Deserialization { body, .. } => assert_eq!(body, "server exploded"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_transport_errors_propagate_unchanged() {
    let (factory, transport) = factory();
    transport.fail_with(HarnessError::Cancelled);

    let err = factory
        .create()
        .with_request("Product")
        .with_delete_raw()
        .await
        .expect_err("transport failure");

    assert!(matches!(err, HarnessError::Cancelled));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(transport.calls(), 1);
}

#[tokio::test]
async fn test_missing_upload_file_is_resource_access_error() {
    let (factory, transport) = factory();

    let err = factory
        .create()
        .with_request("Product")
        .with_file("myFile", "/nonexistent/rest-harness/test.png", "multipart/form-data")
        .with_post_raw()
        .await
        .expect_err("file is missing");

    assert_eq!(err.kind(), ErrorKind::ResourceAccess);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_in_memory_upload_reaches_transport() {
    let (factory, transport) = factory();

    factory
        .create()
        .with_request("Product")
        .with_file(
            "myFile",
            rest_harness::http::FileSource::bytes("notes.txt", "hello"),
            "text/plain",
        )
        .with_put_raw()
        .await
        .expect("upload succeeds");

    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.method, HttpMethod::Put);
    match request.body {
        RequestBody::Multipart { files, json } => {
            assert_eq!(files.len(), 1);
            assert_eq!(files[0].field_name, "myFile");
            assert_eq!(files[0].file_name, "notes.txt");
            assert_eq!(files[0].content, b"hello");
            assert!(json.is_none());
        }
        other => panic!("unexpected body: {:?}", other),
    }
}

#[tokio::test]
async fn test_dot_segment_cannot_leave_the_base() {
    let (factory, transport) = factory();

    let err = factory
        .create()
        .with_request("Product/{id}/Details")
        .with_url_segment("id", "..")
        .with_get_raw()
        .await
        .expect_err("dot segment");

    assert!(matches!(err, HarnessError::Config(_)));
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_colon_segment_stays_under_the_base() {
    let (factory, transport) = factory();

    factory
        .create()
        .with_request("{kind}/1")
        .with_url_segment("kind", "mailto:x")
        .with_get_raw()
        .await
        .expect("request should succeed");

    let request = transport.last_request().expect("request recorded");
    assert_eq!(request.url.as_str(), "https://localhost:5001/mailto%3Ax/1");
}

#[tokio::test]
async fn test_absolute_url_path_is_rejected() {
    let (factory, transport) = factory();

    let err = factory
        .create()
        .with_request("https://other.example/Product")
        .with_get_raw()
        .await
        .expect_err("absolute url");

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(transport.calls(), 0);
}

#[tokio::test]
async fn test_invalid_content_type_fails_before_dispatch() {
    let (factory, transport) = factory();

    let err = factory
        .create()
        .with_request("Product")
        .with_file(
            "myFile",
            rest_harness::http::FileSource::bytes("notes.txt", "hello"),
            "not a mime",
        )
        .with_post_raw()
        .await
        .expect_err("invalid content type");

    assert!(matches!(err, HarnessError::Config(_)));
    assert_eq!(transport.calls(), 0);
}

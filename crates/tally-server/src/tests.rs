//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::TimeZone;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Monday 2026-10-19 07:00 UTC
fn reference_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 7, 0, 0).unwrap()
}

fn setup_test_app() -> Router {
    let config = ServerConfig {
        engine: EngineConfig {
            utc_offset: chrono::FixedOffset::east_opt(7 * 3600),
            ..Default::default()
        },
        reference_time: Some(reference_time()),
    };
    create_router(None, config)
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn tea_sales(count: usize) -> serde_json::Value {
    let sales: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("s{}", i),
                "productId": "tea",
                "productName": "Tea",
                "price": 2000,
                "timestamp": format!("2026-10-19T0{}:00:00Z", i % 6),
            })
        })
        .collect();
    serde_json::Value::Array(sales)
}

// ========== Analytics API Tests ==========

#[tokio::test]
async fn test_analytics_out_of_stock() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/analytics",
            serde_json::json!({
                "sales": [],
                "products": [{"id": 1, "name": "Rice", "stock": 0}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["timestamp"], "2026-10-19T07:00:00.000Z");

    let insights = json["insights"].as_array().unwrap();
    assert_eq!(insights.len(), 1);
    assert_eq!(insights[0]["type"], "stock_alert");
    assert_eq!(insights[0]["priority"], "critical");
    assert_eq!(insights[0]["metadata"]["products"][0], "Rice");
}

#[tokio::test]
async fn test_analytics_sorted_insights() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/analytics",
            serde_json::json!({
                "sales": tea_sales(10),
                "products": [
                    {"id": "tea", "name": "Tea", "stock": 50},
                    {"id": "rice", "name": "Rice", "stock": 0}
                ]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let insights = json["insights"].as_array().unwrap();
    let types: Vec<&str> = insights
        .iter()
        .map(|i| i["type"].as_str().unwrap())
        .collect();
    assert_eq!(
        types,
        vec!["stock_alert", "best_seller", "sales_trend", "revenue"]
    );

    let revenue = &insights[3];
    assert_eq!(revenue["message"], "Revenue in the last 7 days: Rp 20.000");
    assert_eq!(revenue["metadata"]["weeklyRevenue"], 20000.0);
    assert_eq!(revenue["metadata"]["dailyAverageRevenue"], 20000.0);
}

#[tokio::test]
async fn test_analytics_is_deterministic() {
    let body = serde_json::json!({
        "sales": tea_sales(4),
        "products": [{"id": "tea", "name": "Tea", "stock": 3}]
    });

    let first = setup_test_app()
        .oneshot(post_json("/api/analytics", body.clone()))
        .await
        .unwrap();
    let second = setup_test_app()
        .oneshot(post_json("/api/analytics", body))
        .await
        .unwrap();

    assert_eq!(get_body_bytes(first).await, get_body_bytes(second).await);
}

#[tokio::test]
async fn test_analytics_missing_collections() {
    for body in [
        serde_json::json!({"sales": []}),
        serde_json::json!({"products": []}),
        serde_json::json!({"sales": null, "products": []}),
        serde_json::json!({}),
    ] {
        let response = setup_test_app()
            .oneshot(post_json("/api/analytics", body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Sales and products data required");
    }
}

#[tokio::test]
async fn test_analytics_malformed_json() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analytics")
                .header("content-type", "application/json")
                .body(Body::from("{\"sales\": ["))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("EOF"));
}

#[tokio::test]
async fn test_analytics_invalid_period() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/analytics",
            serde_json::json!({"sales": [], "products": [], "period": "decade"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("decade"));
}

#[tokio::test]
async fn test_analytics_bare_options() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/analytics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(get_body_bytes(response).await.is_empty());
}

#[tokio::test]
async fn test_analytics_cors_preflight() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/analytics")
                .header("origin", "https://pos.example.com")
                .header("access-control-request-method", "POST")
                .header("access-control-request-headers", "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
    let methods = response
        .headers()
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(methods.contains("POST"));
    assert!(methods.contains("PUT"));
}

#[tokio::test]
async fn test_analytics_method_not_allowed() {
    for method in ["GET", "PUT", "DELETE", "PATCH"] {
        let response = setup_test_app()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri("/api/analytics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let json = get_body_json(response).await;
        assert_eq!(json["error"], "Method not allowed");
    }
}

#[tokio::test]
async fn test_security_headers() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-content-type-options").unwrap(),
        "nosniff"
    );
    assert_eq!(response.headers().get("x-frame-options").unwrap(), "DENY");
}

// ========== Statistics API Tests ==========

#[tokio::test]
async fn test_statistics_report() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/statistics",
            serde_json::json!({
                "sales": tea_sales(3),
                "products": [{"id": "tea", "name": "Tea", "stock": 10}],
                "period": "today"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["success"], true);

    let stats = &json["statistics"];
    assert_eq!(stats["period"], "today");
    assert_eq!(stats["periodLabel"], "Today");
    assert_eq!(stats["totalRevenue"], 6000.0);
    assert_eq!(stats["totalTransactions"], 3);
    assert_eq!(stats["productCount"], 1);
    assert_eq!(stats["topProducts"][0]["productName"], "Tea");
    assert_eq!(stats["busiestDay"]["day"], "Monday");
    assert_eq!(stats["suggestions"][0]["type"], "schedule");
}

#[tokio::test]
async fn test_statistics_custom_period() {
    let app = setup_test_app();

    let response = app
        .oneshot(post_json(
            "/api/statistics",
            serde_json::json!({
                "sales": tea_sales(3),
                "products": [],
                "period": "custom",
                "start": "2026-10-01",
                "end": "2026-10-18"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["statistics"]["totalTransactions"], 0);
}

#[tokio::test]
async fn test_statistics_method_not_allowed() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/statistics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// ========== Health API Tests ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
}

// ========== Error Handling Tests ==========

#[tokio::test]
async fn test_internal_error_body() {
    let response = AppError::internal("boom").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Internal server error");
    assert_eq!(json["message"], "boom");
}

#[tokio::test]
async fn test_panic_payload_becomes_message() {
    let joined = tokio::task::spawn_blocking(|| -> u32 { panic!("tally exploded") }).await;
    let payload = joined.unwrap_err().into_panic();
    let response = AppError::panicked(payload).into_response();

    let json = get_body_json(response).await;
    assert_eq!(json["message"], "tally exploded");
}

#[tokio::test]
async fn test_cancelled_task_keeps_error_chain() {
    let handle = tokio::spawn(std::future::pending::<()>());
    handle.abort();
    let err = handle.await.unwrap_err();
    assert!(err.is_cancelled());

    let app_error = handlers::insights::join_error(err);
    assert_eq!(app_error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app_error.internal.is_some());

    let json = get_body_json(app_error.into_response()).await;
    assert_eq!(json["error"], "Internal server error");
    assert!(json["message"].as_str().unwrap().contains("cancelled"));
}

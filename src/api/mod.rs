//! REST API layer: route handlers, DTOs, and router composition.
//!
//! Resource endpoints are mounted under `/api/v1`; system endpoints at the
//! root. With the `swagger-ui` feature the OpenAPI document is served at
//! `/api-docs/openapi.json` and the UI at `/swagger-ui`.

pub mod dto;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// OpenAPI document for every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(title = "order-service", description = "Order placement and lookup"),
    paths(
        handlers::order::place_order,
        handlers::order::get_order,
        handlers::system::health_handler,
    ),
    components(schemas(
        dto::PlaceOrderRequest,
        dto::PlaceOrderResponse,
        dto::OrderResponse,
        dto::OrderItemDto,
        crate::domain::OrderStatus,
        crate::error::ErrorResponse,
        crate::error::ErrorBody,
    )),
    tags(
        (name = "Orders", description = "Order placement and lookup"),
        (name = "System", description = "Service health"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

/// Wraps [`build_router`] in the server's middleware and binds its state.
///
/// A request still running after `request_timeout` is answered with
/// `408 Request Timeout`.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    build_router()
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, header};
    use tower::ServiceExt;

    use super::*;
    use crate::api::dto::{OrderResponse, PlaceOrderResponse};
    use crate::domain::{Order, OrderId, OrderRepository};
    use crate::error::OrderServiceError;
    use crate::persistence::InMemoryOrderRepository;
    use crate::service::OrderService;

    /// Repository whose calls never complete.
    #[derive(Debug)]
    struct StalledRepository;

    #[async_trait]
    impl OrderRepository for StalledRepository {
        async fn save(&self, _order: &mut Order) -> Result<OrderId, OrderServiceError> {
            std::future::pending().await
        }

        async fn get(&self, _id: OrderId) -> Result<Order, OrderServiceError> {
            std::future::pending().await
        }
    }

    fn app() -> Router {
        let repository = Arc::new(InMemoryOrderRepository::new());
        let state = AppState {
            order_service: Arc::new(OrderService::new(repository)),
        };
        build_router().with_state(state)
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body should be readable");
        };
        let Ok(value) = serde_json::from_slice(&bytes) else {
            panic!("body should be valid json: {}", String::from_utf8_lossy(&bytes));
        };
        value
    }

    fn post_order(body: &serde_json::Value) -> Request<Body> {
        let Ok(request) = Request::post("/api/v1/orders")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
        else {
            panic!("valid request");
        };
        request
    }

    fn get(uri: &str) -> Request<Body> {
        let Ok(request) = Request::get(uri).body(Body::empty()) else {
            panic!("valid request");
        };
        request
    }

    #[tokio::test]
    async fn place_then_get_order() {
        let app = app();
        let body = serde_json::json!({
            "customer_id": 2,
            "items": [{ "product_code": "CAM", "quantity": 5, "unit_price": "1.32" }],
        });

        let Ok(response) = app.clone().oneshot(post_order(&body)).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::CREATED);
        let placed: PlaceOrderResponse = body_json(response).await;

        let uri = format!("/api/v1/orders/{}", placed.order_id);
        let Ok(response) = app.oneshot(get(&uri)).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
        let order: OrderResponse = body_json(response).await;
        assert_eq!(order.customer_id, 2);
        assert_eq!(order.total_price, "6.6");
        assert_eq!(order.items.len(), 1);
    }

    #[tokio::test]
    async fn unknown_order_is_404_with_error_body() {
        let Ok(response) = app().oneshot(get("/api/v1/orders/999")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body.pointer("/error/code"), Some(&serde_json::json!(2001)));
    }

    #[tokio::test]
    async fn invalid_order_is_400() {
        let body = serde_json::json!({ "customer_id": 2, "items": [] });
        let Ok(response) = app().oneshot(post_order(&body)).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn bad_price_is_400() {
        let body = serde_json::json!({
            "customer_id": 2,
            "items": [{ "product_code": "CAM", "quantity": 5, "unit_price": "cheap" }],
        });
        let Ok(response) = app().oneshot(post_order(&body)).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_is_ok() {
        let Ok(response) = app().oneshot(get("/health")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn unrepresentable_price_is_400() {
        for unit_price in ["0.00001", "1000000000000000", "79228162514264337593543950335"] {
            let body = serde_json::json!({
                "customer_id": 2,
                "items": [{ "product_code": "CAM", "quantity": 2, "unit_price": unit_price }],
            });
            let Ok(response) = app().oneshot(post_order(&body)).await else {
                panic!("request failed");
            };
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{unit_price}");
        }
    }

    #[tokio::test]
    async fn app_serves_health_through_middleware() {
        let state = AppState {
            order_service: Arc::new(OrderService::new(Arc::new(InMemoryOrderRepository::new()))),
        };
        let app = build_app(state, Duration::from_secs(5));
        let Ok(response) = app.oneshot(get("/health")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn slow_request_is_408() {
        let state = AppState {
            order_service: Arc::new(OrderService::new(Arc::new(StalledRepository))),
        };
        let app = build_app(state, Duration::from_millis(50));
        let Ok(response) = app.oneshot(get("/api/v1/orders/1")).await else {
            panic!("request failed");
        };
        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }

    #[test]
    fn openapi_lists_order_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/v1/orders"));
        assert!(doc.paths.paths.contains_key("/api/v1/orders/{id}"));
    }
}

//! Order handlers: place and get.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{OrderResponse, PlaceOrderRequest, PlaceOrderResponse};
use crate::app_state::AppState;
use crate::domain::{OrderId, OrderItem};
use crate::error::{ErrorResponse, OrderServiceError};

/// `POST /orders` — Place a new order.
///
/// # Errors
///
/// Returns [`OrderServiceError::InvalidRequest`] for a malformed or invalid
/// order, or a storage error if the save fails.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    tag = "Orders",
    summary = "Place an order",
    description = "Creates a pending order for the customer with the given line items. Unit prices are decimal strings.",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = PlaceOrderResponse),
        (status = 400, description = "Invalid order", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse),
    )
)]
pub async fn place_order(
    State(state): State<AppState>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<impl IntoResponse, OrderServiceError> {
    let items = req
        .items
        .into_iter()
        .map(|item| item.into_domain())
        .collect::<Result<Vec<OrderItem>, _>>()?;

    let order = state
        .order_service
        .place_order(req.customer_id, items)
        .await?;

    let order_id = order.id.ok_or_else(|| {
        OrderServiceError::Internal("saved order has no id".to_string())
    })?;

    let response = PlaceOrderResponse {
        order_id: order_id.get(),
        status: order.status,
        created_at: order.created_at,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /orders/{id}` — Get an order with its items.
///
/// # Errors
///
/// Returns [`OrderServiceError::OrderNotFound`] if the order does not exist.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    tag = "Orders",
    summary = "Get order details",
    description = "Returns a single order with its line items and total price.",
    params(
        ("id" = i64, Path, description = "Order ID"),
    ),
    responses(
        (status = 200, description = "Order details", body = OrderResponse),
        (status = 404, description = "Order not found", body = ErrorResponse),
    )
)]
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, OrderServiceError> {
    let order_id = OrderId::new(id);
    let order = state.order_service.get_order(order_id).await?;
    Ok(Json(OrderResponse::new(order_id, &order)?))
}

/// Order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(place_order))
        .route("/orders/{id}", get(get_order))
}

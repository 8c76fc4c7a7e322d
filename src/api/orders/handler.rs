//! Order API Handlers
//!
//! Order placement is the storefront's single write path: it snapshots
//! the product and hotel, appends a pending ledger row, and hands the
//! guest off to WhatsApp. The WhatsApp redirect is the primary
//! fulfillment channel: if the ledger write fails, the guest still gets
//! the link and only the telemetry row is lost.

use std::net::SocketAddr;
use std::str::FromStr;

use axum::{
    Extension, Json,
    extract::{ConnectInfo, Path, Query, State},
    http::HeaderMap,
};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Analytics, Category, Customer, Order, OrderStatus};
use crate::db::repository::order::{DEFAULT_PAGE_SIZE, OrderListFilter};
use crate::db::repository::{HotelRepository, OrderRepository, ProductRepository, report};
use crate::utils::{AppError, AppResult, DeviceInfo};
use crate::whatsapp;

// =============================================================================
// Place order (public)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub hotel_slug: String,
    pub product_id: String,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub analytics: Option<Analytics>,
    #[serde(default)]
    pub delivery_notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    /// Absent when the ledger write failed but the handoff proceeded
    pub order_id: Option<String>,
    pub whatsapp_url: String,
    pub estimated_delivery: Option<String>,
    pub hotel: OrderHotelInfo,
    pub product: OrderProductInfo,
}

#[derive(Debug, Serialize)]
pub struct OrderHotelInfo {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Serialize)]
pub struct OrderProductInfo {
    pub name: String,
    pub price: f64,
}

/// POST /api/orders - place an order and build the WhatsApp handoff
pub async fn place(
    State(state): State<ServerState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(req): Json<PlaceOrderRequest>,
) -> AppResult<Json<PlaceOrderResponse>> {
    let ip = client_ip(&headers, addr);

    if !state.rate_limiter.check(&format!("orders:{}", ip)) {
        return Err(AppError::RateLimited);
    }

    let hotel_repo = HotelRepository::new(state.get_db());
    let product_repo = ProductRepository::new(state.get_db());

    let hotel = hotel_repo
        .find_active_by_slug(&req.hotel_slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", req.hotel_slug)))?;

    let product = product_repo
        .find_by_id(&req.product_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", req.product_id)))?;

    if !product.is_orderable() {
        return Err(AppError::unavailable(
            "Product is currently unavailable".to_string(),
        ));
    }

    let (Some(product_id), Some(hotel_id)) = (product.id.clone(), hotel.id.clone()) else {
        return Err(AppError::internal("Stored record without id".to_string()));
    };

    let device = DeviceInfo::collect(&ip, &headers);
    let message = whatsapp::order_message(&product, &hotel, &req.customer);
    let whatsapp_url = whatsapp::link(&state.config.whatsapp_number, &message);

    let order = Order::place(
        product_id,
        hotel_id,
        &product,
        &hotel,
        req.customer,
        req.delivery_notes,
        req.analytics.unwrap_or_default(),
        device,
        message,
        chrono::Utc::now(),
    );

    // Ledger write is best-effort telemetry; the redirect must not block
    let repo = OrderRepository::new(state.get_db());
    let (order_id, estimated_delivery) = match repo.create(order).await {
        Ok(created) => (
            created.id.as_ref().map(|id| id.to_string()),
            created.estimated_delivery(),
        ),
        Err(e) => {
            tracing::error!(error = %e, hotel = %hotel.slug, "Order ledger write failed");
            (None, None)
        }
    };

    Ok(Json(PlaceOrderResponse {
        order_id,
        whatsapp_url,
        estimated_delivery,
        hotel: OrderHotelInfo {
            name: hotel.name,
            location: hotel.location,
        },
        product: OrderProductInfo {
            name: product.name,
            price: product.price,
        },
    }))
}

/// Client IP: first X-Forwarded-For hop, falling back to the socket peer
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}

// =============================================================================
// List / get (auth)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub hotel_slug: Option<String>,
    pub category: Option<Category>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub total_orders: usize,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub data: Vec<Order>,
    pub pagination: Pagination,
}

/// GET /api/orders - filtered, paginated, role-scoped listing
pub async fn list(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<OrderListResponse>> {
    let status = query
        .status
        .as_deref()
        .map(OrderStatus::from_str)
        .transpose()
        .map_err(AppError::InvalidStatus)?;

    let repo = OrderRepository::new(state.get_db());
    let page = repo
        .list(OrderListFilter {
            status,
            hotel_slug: query.hotel_slug.map(|s| s.to_lowercase()),
            category: query.category,
            start_date: query.start_date,
            end_date: query.end_date,
            allowed_hotels: user.hotel_scope().map(|s| s.to_vec()),
            page: query.page.unwrap_or(1),
            limit: query.limit.unwrap_or(DEFAULT_PAGE_SIZE),
        })
        .await?;

    Ok(Json(OrderListResponse {
        pagination: Pagination {
            current_page: page.page,
            total_pages: page.total_pages(),
            total_orders: page.total,
            has_next: page.has_next(),
            has_prev: page.has_prev(),
        },
        data: page.orders,
    }))
}

/// GET /api/orders/{id} - single order, role-scoped
pub async fn get_by_id(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let repo = OrderRepository::new(state.get_db());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {}", id)))?;

    if !user.can_view_hotel(&order.hotel_slug) {
        return Err(AppError::forbidden("Access denied to this order".to_string()));
    }

    Ok(Json(order))
}

// =============================================================================
// Status transition (admin/operator)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdateResponse {
    #[serde(flatten)]
    pub order: Order,
    /// True when this transition credited the hotel's counters
    pub commission_accrued: bool,
}

/// PATCH /api/orders/{id}/status
///
/// The new status must belong to the configured vocabulary and advance
/// the order monotonically; re-entering the terminal state is a 409, so
/// the hotel is credited exactly once no matter how often the back
/// office retries.
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(req): Json<StatusUpdateRequest>,
) -> AppResult<Json<StatusUpdateResponse>> {
    let vocabulary = state.config.status_vocabulary;

    let new_status = OrderStatus::from_str(&req.status).map_err(AppError::InvalidStatus)?;
    if !vocabulary.contains(new_status) {
        return Err(AppError::InvalidStatus(format!(
            "Status {} is not part of the configured vocabulary",
            new_status.as_str()
        )));
    }

    let repo = OrderRepository::new(state.get_db());
    let outcome = repo.transition(&id, new_status, vocabulary).await?;

    if outcome.accrued {
        tracing::info!(
            order_id = %id,
            hotel = %outcome.order.hotel_slug,
            commission = outcome.order.commission.amount,
            "Commission accrued to hotel"
        );
    }

    Ok(Json(StatusUpdateResponse {
        order: outcome.order,
        commission_accrued: outcome.accrued,
    }))
}

/// DELETE /api/orders/{id} - admin cleanup
pub async fn delete_order(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let repo = OrderRepository::new(state.get_db());
    repo.delete(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": true })))
}

// =============================================================================
// Summary (auth)
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/orders/stats/summary - ledger-wide aggregate, role-scoped
pub async fn stats_summary(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<report::OrdersSummary>> {
    let repo = OrderRepository::new(state.get_db());
    let orders = repo
        .find_for_report(
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            user.hotel_scope(),
        )
        .await?;

    Ok(Json(report::summary(&orders, state.config.status_vocabulary)))
}

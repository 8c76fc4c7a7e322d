//! Hotel API Handlers
//!
//! Registry management is admin-only; the storefront reads a single
//! active hotel by slug for personalization; per-hotel statistics are
//! open to any role that can see the hotel.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::models::{Hotel, HotelCreate, HotelUpdate};
use crate::db::repository::{HotelRepository, OrderRepository, report};
use crate::utils::{AppError, AppResult};

/// GET /api/hotels - full registry for the back office
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Hotel>>> {
    let repo = HotelRepository::new(state.get_db());
    let hotels = repo.find_all().await?;
    Ok(Json(hotels))
}

/// GET /api/hotels/{slug} - storefront personalization, active only
pub async fn get_by_slug(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Hotel>> {
    let repo = HotelRepository::new(state.get_db());
    let hotel = repo
        .find_active_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", slug)))?;
    Ok(Json(hotel))
}

/// POST /api/hotels - register a partner hotel
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<HotelCreate>,
) -> AppResult<Json<Hotel>> {
    payload.validate()?;

    let repo = HotelRepository::new(state.get_db());
    let hotel = repo.create(payload, &state.config.base_url).await?;

    tracing::info!(slug = %hotel.slug, name = %hotel.name, "Hotel registered");
    Ok(Json(hotel))
}

/// PUT /api/hotels/{slug} - update registry entry (slug is immutable)
pub async fn update(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
    Json(payload): Json<HotelUpdate>,
) -> AppResult<Json<Hotel>> {
    payload.validate()?;

    let repo = HotelRepository::new(state.get_db());
    let hotel = repo.update(&slug, payload).await?;
    Ok(Json(hotel))
}

/// DELETE /api/hotels/{slug} - soft-deactivate
pub async fn delete(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<Hotel>> {
    let repo = HotelRepository::new(state.get_db());
    let hotel = repo.deactivate(&slug).await?;

    tracing::info!(slug = %slug, "Hotel deactivated");
    Ok(Json(hotel))
}

/// Data needed to render the hotel's QR poster client-side
#[derive(Debug, Serialize)]
pub struct QrResponse {
    pub slug: String,
    pub name: String,
    pub tracking_url: String,
}

/// GET /api/hotels/{slug}/qr
pub async fn qr(
    State(state): State<ServerState>,
    Path(slug): Path<String>,
) -> AppResult<Json<QrResponse>> {
    let repo = HotelRepository::new(state.get_db());
    let hotel = repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", slug)))?;

    Ok(Json(QrResponse {
        slug: hotel.slug,
        name: hotel.name,
        tracking_url: hotel.tracking_url,
    }))
}

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/hotels/{slug}/stats - one hotel's commission aggregate
///
/// hotel_viewer callers must be assigned to the hotel.
pub async fn stats(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Path(slug): Path<String>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<report::HotelCommissionReport>> {
    let slug = slug.to_lowercase();
    if !user.can_view_hotel(&slug) {
        return Err(AppError::forbidden("Access denied to this hotel".to_string()));
    }

    let hotel_repo = HotelRepository::new(state.get_db());
    let hotel = hotel_repo
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Hotel {}", slug)))?;

    let order_repo = OrderRepository::new(state.get_db());
    let scope = [slug.clone()];
    let orders = order_repo
        .find_for_report(
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            Some(&scope),
        )
        .await?;

    let hotel_name = hotel.name.clone();
    let mut rows = report::per_hotel(&orders, state.config.status_vocabulary, &[hotel]);
    let row = rows.pop().unwrap_or(report::HotelCommissionReport {
        hotel_slug: slug,
        hotel_name,
        total_orders: 0,
        delivered_orders: 0,
        total_revenue: 0.0,
        total_commission: 0.0,
        avg_order_value: 0.0,
        conversion_rate: 0.0,
    });

    Ok(Json(row))
}

//! Commission report handlers

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{HotelRepository, OrderRepository, report};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// GET /api/reports/commissions - per-hotel aggregates
///
/// hotel_viewer callers only see their assigned hotels; admin sees the
/// whole registry.
pub async fn commissions(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ReportQuery>,
) -> AppResult<Json<Vec<report::HotelCommissionReport>>> {
    let order_repo = OrderRepository::new(state.get_db());
    let hotel_repo = HotelRepository::new(state.get_db());

    let orders = order_repo
        .find_for_report(
            query.start_date.as_deref(),
            query.end_date.as_deref(),
            user.hotel_scope(),
        )
        .await?;
    let hotels = hotel_repo.find_all().await?;

    Ok(Json(report::per_hotel(
        &orders,
        state.config.status_vocabulary,
        &hotels,
    )))
}

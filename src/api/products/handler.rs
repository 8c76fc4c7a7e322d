//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use validator::Validate;

use crate::core::ServerState;
use crate::db::models::{Category, Product, ProductCreate, ProductUpdate};
use crate::db::repository::{ProductFilter, ProductRepository};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub category: Option<Category>,
    pub featured: Option<bool>,
}

/// GET /api/products - active catalog, storefront and back office alike
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = repo
        .find_all(ProductFilter {
            category: query.category,
            featured: query.featured,
        })
        .await?;
    Ok(Json(products))
}

/// GET /api/products/{id}
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {}", id)))?;
    Ok(Json(product))
}

/// POST /api/products - create product
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;

    tracing::info!(
        product_id = %product.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        name = %product.name,
        "Product created"
    );
    Ok(Json(product))
}

/// PUT /api/products/{id} - update product
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    payload.validate()?;

    let repo = ProductRepository::new(state.get_db());
    let product = repo.update(&id, payload).await?;
    Ok(Json(product))
}

/// DELETE /api/products/{id} - deactivate product
///
/// Deactivation rather than deletion: the row stays addressable for the
/// back office and order snapshots keep their references meaningful.
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.deactivate(&id).await?;

    tracing::info!(product_id = %id, "Product deactivated");
    Ok(Json(product))
}

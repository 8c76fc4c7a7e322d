//! Product Repository

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Category, Product, ProductCreate, ProductUpdate};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const PRODUCT_TABLE: &str = "products";

/// Storefront/list filters
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub category: Option<Category>,
    pub featured: Option<bool>,
}

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find active products, newest first
    pub async fn find_all(&self, filter: ProductFilter) -> RepoResult<Vec<Product>> {
        let mut conditions = vec!["is_active = true"];
        if filter.category.is_some() {
            conditions.push("category = $category");
        }
        if filter.featured.is_some() {
            conditions.push("is_featured = $featured");
        }

        let sql = format!(
            "SELECT * FROM {} WHERE {} ORDER BY created_at DESC",
            PRODUCT_TABLE,
            conditions.join(" AND ")
        );

        let mut query = self.base.db().query(sql);
        if let Some(category) = filter.category {
            query = query.bind(("category", category));
        }
        if let Some(featured) = filter.featured {
            query = query.bind(("featured", featured));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        Ok(products)
    }

    /// Find product by id, active or not
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id);
        let product: Option<Product> = self.base.db().select((PRODUCT_TABLE, pure_id)).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        let product = Product {
            id: None,
            name: data.name,
            description: data.description,
            category: data.category,
            price: data.price,
            tourist_price: data.tourist_price,
            images: data.images.unwrap_or_default(),
            stock: data.stock.unwrap_or(0),
            artisan: data.artisan,
            tags: data.tags.unwrap_or_default(),
            crafting_time: data.crafting_time.unwrap_or_default(),
            is_featured: data.is_featured.unwrap_or(false),
            is_active: true,
            created_at: time::now(),
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product; absent fields keep their current value
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let pure_id = strip_table_prefix(PRODUCT_TABLE, id).to_string();

        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.category.is_some() {
            set_parts.push("category = $category");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.tourist_price.is_some() {
            set_parts.push("tourist_price = $tourist_price");
        }
        if data.images.is_some() {
            set_parts.push("images = $images");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.artisan.is_some() {
            set_parts.push("artisan = $artisan");
        }
        if data.tags.is_some() {
            set_parts.push("tags = $tags");
        }
        if data.crafting_time.is_some() {
            set_parts.push("crafting_time = $crafting_time");
        }
        if data.is_featured.is_some() {
            set_parts.push("is_featured = $is_featured");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_id(&pure_id)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)));
        }

        let sql = format!(
            "UPDATE type::thing('{}', $id) SET {} RETURN AFTER",
            PRODUCT_TABLE,
            set_parts.join(", ")
        );

        let mut query = self.base.db().query(sql).bind(("id", pure_id.clone()));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.category {
            query = query.bind(("category", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.tourist_price {
            query = query.bind(("tourist_price", v));
        }
        if let Some(v) = data.images {
            query = query.bind(("images", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.artisan {
            query = query.bind(("artisan", v));
        }
        if let Some(v) = data.tags {
            query = query.bind(("tags", v));
        }
        if let Some(v) = data.crafting_time {
            query = query.bind(("crafting_time", v));
        }
        if let Some(v) = data.is_featured {
            query = query.bind(("is_featured", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let products: Vec<Product> = query.await?.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Deactivate a product instead of hard-deleting it
    ///
    /// Historical orders keep their snapshots either way; deactivation
    /// keeps the record addressable from the back office.
    pub async fn deactivate(&self, id: &str) -> RepoResult<Product> {
        self.update(
            id,
            ProductUpdate {
                name: None,
                description: None,
                category: None,
                price: None,
                tourist_price: None,
                images: None,
                stock: None,
                artisan: None,
                tags: None,
                crafting_time: None,
                is_featured: None,
                is_active: Some(false),
            },
        )
        .await
    }
}

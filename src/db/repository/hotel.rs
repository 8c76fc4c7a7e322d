//! Hotel Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::hotel::{self, DEFAULT_COMMISSION_RATE};
use crate::db::models::{Hotel, HotelCreate, HotelUpdate};
use crate::utils::time;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const HOTEL_TABLE: &str = "hotels";

#[derive(Clone)]
pub struct HotelRepository {
    base: BaseRepository,
}

impl HotelRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// All hotels, active and inactive, for the back office
    pub async fn find_all(&self) -> RepoResult<Vec<Hotel>> {
        let hotels: Vec<Hotel> = self
            .base
            .db()
            .query("SELECT * FROM hotels ORDER BY name")
            .await?
            .take(0)?;
        Ok(hotels)
    }

    /// Find hotel by slug regardless of active state
    pub async fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Hotel>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM hotels WHERE slug = $slug LIMIT 1")
            .bind(("slug", slug.to_lowercase()))
            .await?;
        let hotels: Vec<Hotel> = result.take(0)?;
        Ok(hotels.into_iter().next())
    }

    /// Find an active hotel by slug (storefront personalization)
    pub async fn find_active_by_slug(&self, slug: &str) -> RepoResult<Option<Hotel>> {
        Ok(self
            .find_by_slug(slug)
            .await?
            .filter(|hotel| hotel.is_active))
    }

    /// Create a new hotel
    ///
    /// The slug is lowercased and checked for uniqueness; the database
    /// unique index backstops the check.
    pub async fn create(&self, data: HotelCreate, base_url: &str) -> RepoResult<Hotel> {
        let slug = data.slug.to_lowercase();
        if !hotel::is_valid_slug(&slug) {
            return Err(RepoError::Validation(format!(
                "Slug must be lowercase letters, digits and hyphens: {}",
                slug
            )));
        }

        if self.find_by_slug(&slug).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Hotel slug already in use: {}",
                slug
            )));
        }

        let hotel = Hotel {
            id: None,
            tracking_url: hotel::tracking_url(base_url, &slug),
            slug,
            name: data.name,
            location: data.location,
            contact_person: data.contact_person,
            commission_rate: data.commission_rate.unwrap_or(DEFAULT_COMMISSION_RATE),
            total_orders: 0,
            total_revenue: 0.0,
            total_commission: 0.0,
            is_active: true,
            created_at: time::now(),
        };

        let created: Option<Hotel> = self.base.db().create(HOTEL_TABLE).content(hotel).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create hotel".to_string()))
    }

    /// Update a hotel by slug; the slug itself is immutable
    pub async fn update(&self, slug: &str, data: HotelUpdate) -> RepoResult<Hotel> {
        let mut set_parts: Vec<&str> = Vec::new();
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.location.is_some() {
            set_parts.push("location = $location");
        }
        if data.contact_person.is_some() {
            set_parts.push("contact_person = $contact_person");
        }
        if data.commission_rate.is_some() {
            set_parts.push("commission_rate = $commission_rate");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        if set_parts.is_empty() {
            return self
                .find_by_slug(slug)
                .await?
                .ok_or_else(|| RepoError::NotFound(format!("Hotel {} not found", slug)));
        }

        let sql = format!(
            "UPDATE hotels SET {} WHERE slug = $slug RETURN AFTER",
            set_parts.join(", ")
        );

        let mut query = self
            .base
            .db()
            .query(sql)
            .bind(("slug", slug.to_lowercase()));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.location {
            query = query.bind(("location", v));
        }
        if let Some(v) = data.contact_person {
            query = query.bind(("contact_person", v));
        }
        if let Some(v) = data.commission_rate {
            query = query.bind(("commission_rate", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let hotels: Vec<Hotel> = query.await?.take(0)?;
        hotels
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Hotel {} not found", slug)))
    }

    /// Soft-deactivate a hotel
    pub async fn deactivate(&self, slug: &str) -> RepoResult<Hotel> {
        self.update(
            slug,
            HotelUpdate {
                name: None,
                location: None,
                contact_person: None,
                commission_rate: None,
                is_active: Some(false),
            },
        )
        .await
    }
}

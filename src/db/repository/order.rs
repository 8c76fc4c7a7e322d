//! Order Repository
//!
//! The ledger is append-mostly: rows are created on placement and only
//! their status/timestamps change afterwards. The status transition is a
//! single conditional UPDATE; the guard set doubles as the monotonicity
//! check and the exactly-once gate for commission accrual.

use serde::Deserialize;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use super::{BaseRepository, RepoError, RepoResult, strip_table_prefix};
use crate::db::models::{Category, Order, OrderStatus, StatusVocabulary};
use crate::utils::time;

const ORDER_TABLE: &str = "orders";
const HOTEL_TABLE: &str = "hotels";

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 100;

/// List filters; `allowed_hotels` carries the caller's visibility scope
#[derive(Debug, Clone, Default)]
pub struct OrderListFilter {
    pub status: Option<OrderStatus>,
    pub hotel_slug: Option<String>,
    pub category: Option<Category>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// None = unrestricted; Some = only these hotel slugs are visible
    pub allowed_hotels: Option<Vec<String>>,
    pub page: usize,
    pub limit: usize,
}

/// One page of the ledger plus pagination bookkeeping
#[derive(Debug, Clone)]
pub struct OrderPage {
    pub orders: Vec<Order>,
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl OrderPage {
    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.limit.max(1))
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Result of a status transition
#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub order: Order,
    /// True when this call credited the hotel's counters
    pub accrued: bool,
}

#[derive(Debug, Deserialize)]
struct CountRow {
    total: usize,
}

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Append a new order to the ledger
    pub async fn create(&self, order: Order) -> RepoResult<Order> {
        let created: Option<Order> = self.base.db().create(ORDER_TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let order: Option<Order> = self.base.db().select((ORDER_TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Filtered, paginated listing, newest first
    pub async fn list(&self, filter: OrderListFilter) -> RepoResult<OrderPage> {
        let page = filter.page.max(1);
        let limit = filter.limit.clamp(1, MAX_PAGE_SIZE);

        // A requested hotel outside the caller's scope can match nothing
        if let (Some(requested), Some(allowed)) = (&filter.hotel_slug, &filter.allowed_hotels)
            && !allowed.contains(requested)
        {
            return Ok(OrderPage {
                orders: Vec::new(),
                total: 0,
                page,
                limit,
            });
        }

        let mut conditions: Vec<&str> = Vec::new();
        if filter.status.is_some() {
            conditions.push("status = $status");
        }
        if filter.hotel_slug.is_some() {
            conditions.push("hotel_slug = $hotel_slug");
        } else if filter.allowed_hotels.is_some() {
            conditions.push("hotel_slug IN $allowed_hotels");
        }
        if filter.category.is_some() {
            conditions.push("product.category = $category");
        }
        if filter.start_date.is_some() {
            conditions.push("created_at >= $start_date");
        }
        if filter.end_date.is_some() {
            conditions.push("created_at <= $end_date");
        }

        let where_sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let list_sql = format!(
            "SELECT * FROM {}{} ORDER BY created_at DESC LIMIT $limit START $start",
            ORDER_TABLE, where_sql
        );
        let count_sql = format!(
            "SELECT count() AS total FROM {}{} GROUP ALL",
            ORDER_TABLE, where_sql
        );

        let mut list_query = self
            .base
            .db()
            .query(list_sql)
            .bind(("limit", limit as i64))
            .bind(("start", ((page - 1) * limit) as i64));
        let mut count_query = self.base.db().query(count_sql);

        if let Some(status) = filter.status {
            list_query = list_query.bind(("status", status));
            count_query = count_query.bind(("status", status));
        }
        if let Some(slug) = filter.hotel_slug.clone() {
            list_query = list_query.bind(("hotel_slug", slug.clone()));
            count_query = count_query.bind(("hotel_slug", slug));
        } else if let Some(allowed) = filter.allowed_hotels.clone() {
            list_query = list_query.bind(("allowed_hotels", allowed.clone()));
            count_query = count_query.bind(("allowed_hotels", allowed));
        }
        if let Some(category) = filter.category {
            list_query = list_query.bind(("category", category));
            count_query = count_query.bind(("category", category));
        }
        if let Some(start) = filter.start_date.as_deref() {
            let bound = time::range_start(start);
            list_query = list_query.bind(("start_date", bound.clone()));
            count_query = count_query.bind(("start_date", bound));
        }
        if let Some(end) = filter.end_date.as_deref() {
            let bound = time::range_end(end);
            list_query = list_query.bind(("end_date", bound.clone()));
            count_query = count_query.bind(("end_date", bound));
        }

        let orders: Vec<Order> = list_query.await?.take(0)?;
        let counts: Vec<CountRow> = count_query.await?.take(0)?;
        let total = counts.into_iter().next().map(|c| c.total).unwrap_or(0);

        Ok(OrderPage {
            orders,
            total,
            page,
            limit,
        })
    }

    /// Full ledger slice for reporting, optionally date-bounded and scoped
    pub async fn find_for_report(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
        allowed_hotels: Option<&[String]>,
    ) -> RepoResult<Vec<Order>> {
        let mut conditions: Vec<&str> = Vec::new();
        if start_date.is_some() {
            conditions.push("created_at >= $start_date");
        }
        if end_date.is_some() {
            conditions.push("created_at <= $end_date");
        }
        if allowed_hotels.is_some() {
            conditions.push("hotel_slug IN $allowed_hotels");
        }

        let where_sql = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };
        let sql = format!("SELECT * FROM {}{}", ORDER_TABLE, where_sql);

        let mut query = self.base.db().query(sql);
        if let Some(start) = start_date {
            query = query.bind(("start_date", time::range_start(start)));
        }
        if let Some(end) = end_date {
            query = query.bind(("end_date", time::range_end(end)));
        }
        if let Some(allowed) = allowed_hotels {
            query = query.bind(("allowed_hotels", allowed.to_vec()));
        }

        let orders: Vec<Order> = query.await?.take(0)?;
        Ok(orders)
    }

    /// Advance an order's status
    ///
    /// Single conditional UPDATE: the row only changes when its current
    /// status is in the guard set for `new_status` under `vocabulary`.
    /// A transition into the terminal success state credits the hotel's
    /// counters once: the guard excludes the terminal state
    /// itself, so a lost race or a retry lands on the Conflict arm.
    pub async fn transition(
        &self,
        id: &str,
        new_status: OrderStatus,
        vocabulary: StatusVocabulary,
    ) -> RepoResult<TransitionOutcome> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id).to_string();
        let allowed = vocabulary.prior_states(new_status);

        let sql = format!(
            "UPDATE type::thing('{}', $id) SET status = $new_status, timestamps.{} = $now \
             WHERE status IN $allowed RETURN AFTER",
            ORDER_TABLE,
            new_status.as_str()
        );

        let updated: Vec<Order> = self
            .base
            .db()
            .query(sql)
            .bind(("id", pure_id.clone()))
            .bind(("new_status", new_status))
            .bind(("now", time::now()))
            .bind(("allowed", allowed))
            .await?
            .take(0)?;

        let Some(order) = updated.into_iter().next() else {
            // Guard failed: distinguish a missing row from a bad transition
            return match self.find_by_id(&pure_id).await? {
                None => Err(RepoError::NotFound(format!("Order {} not found", id))),
                Some(existing) => Err(RepoError::Conflict(format!(
                    "Order cannot move from {} to {}",
                    existing.status.as_str(),
                    new_status.as_str()
                ))),
            };
        };

        let accrued = new_status == vocabulary.terminal_success();
        if accrued {
            self.accrue_hotel_counters(&order).await?;
        }

        Ok(TransitionOutcome { order, accrued })
    }

    /// Credit the referring hotel for a delivered order
    async fn accrue_hotel_counters(&self, order: &Order) -> RepoResult<()> {
        let hotel_key = order.hotel_id.key().to_string();
        self.base
            .db()
            .query(format!(
                "UPDATE type::thing('{}', $id) SET total_orders += 1, \
                 total_revenue += $revenue, total_commission += $commission",
                HOTEL_TABLE
            ))
            .bind(("id", hotel_key))
            .bind(("revenue", order.order_value))
            .bind(("commission", order.commission.amount))
            .await?;
        Ok(())
    }

    /// Hard-delete an order (admin cleanup of test/abusive rows)
    pub async fn delete(&self, id: &str) -> RepoResult<()> {
        let pure_id = strip_table_prefix(ORDER_TABLE, id);
        let deleted: Option<Order> = self.base.db().delete((ORDER_TABLE, pure_id)).await?;
        if deleted.is_none() {
            return Err(RepoError::NotFound(format!("Order {} not found", id)));
        }
        Ok(())
    }
}

//! Database models
//!
//! Entity structs plus their Create/Update payloads. Record ids are
//! SurrealDB `RecordId`s serialized as `"table:id"` strings.

pub mod hotel;
pub mod order;
pub mod product;
pub mod serde_helpers;
pub mod user;

pub use hotel::{ContactPerson, Hotel, HotelCreate, HotelId, HotelUpdate};
pub use order::{
    Analytics, Commission, Customer, Order, OrderId, OrderStatus, OrderTimestamps,
    ProductSnapshot, StatusVocabulary,
};
pub use product::{Artisan, Category, Product, ProductCreate, ProductId, ProductImage, ProductUpdate};
pub use user::{Role, User, UserCreate, UserId};

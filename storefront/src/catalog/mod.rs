//! Catalog module providing read-only product listing and name search.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use storefront::catalog::{CatalogSearch, Product};
//! use storefront::db::memory::InMemoryProductRepository;
//! use uuid::Uuid;
//!
//! #[tokio::main]
//! async fn main() {
//!     let products = Arc::new(InMemoryProductRepository::new(vec![Product {
//!         product_id: Uuid::new_v4(),
//!         product_name: "Alienware x15".to_string(),
//!         price: 2500,
//!         rating: Some(5),
//!         image: "alienware.png".to_string(),
//!     }]));
//!     let catalog = CatalogSearch::new(products);
//!
//!     let hits = catalog.search_by_name("ware").await.unwrap();
//!     assert_eq!(hits.len(), 1);
//! }
//! ```

pub mod errors;
pub mod models;
pub mod search;

pub use errors::{CatalogError, CatalogResult};
pub use models::Product;
pub use search::CatalogSearch;

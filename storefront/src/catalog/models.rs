//! Catalog data models.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Product as listed in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: Uuid,
    /// Display name, also the field searched by name
    pub product_name: String,
    pub price: i64,
    pub rating: Option<i16>,
    pub image: String,
}

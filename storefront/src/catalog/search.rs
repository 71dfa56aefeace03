//! Product listing and name search.

use std::sync::Arc;

use log::debug;

use super::{
    errors::{CatalogError, CatalogResult},
    models::Product,
};
use crate::db::ProductRepository;

/// Read-only view over the product collection
#[derive(Clone)]
pub struct CatalogSearch {
    products: Arc<dyn ProductRepository>,
}

impl CatalogSearch {
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// Every product in the catalog
    ///
    /// # Errors
    ///
    /// * `CatalogError::Database` / `CatalogError::Timeout` - The read failed
    pub async fn list_all(&self) -> CatalogResult<Vec<Product>> {
        let products = self.products.list_all().await?;
        debug!("Listed {} products", products.len());
        Ok(products)
    }

    /// Products whose name contains `query` (case-sensitive, unanchored)
    ///
    /// Returns the full match set; there is no pagination.
    ///
    /// # Errors
    ///
    /// * `CatalogError::EmptyQuery` - `query` is empty
    /// * `CatalogError::Database` / `CatalogError::Timeout` - The read failed
    pub async fn search_by_name(&self, query: &str) -> CatalogResult<Vec<Product>> {
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let products = self.products.search_by_name(query).await?;
        debug!("Search {:?} matched {} products", query, products.len());
        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::InMemoryProductRepository;
    use uuid::Uuid;

    fn product(name: &str, price: i64) -> Product {
        Product {
            product_id: Uuid::new_v4(),
            product_name: name.to_string(),
            price,
            rating: None,
            image: format!("{}.png", name.to_lowercase()),
        }
    }

    fn catalog() -> CatalogSearch {
        CatalogSearch::new(Arc::new(InMemoryProductRepository::new(vec![
            product("Alienware x15", 2500),
            product("Giner ware", 45),
            product("Iphone 13 Pro", 1700),
            product("Bose Headphones", 300),
        ])))
    }

    #[tokio::test]
    async fn test_list_all_returns_everything() {
        let products = catalog().list_all().await.unwrap();
        assert_eq!(products.len(), 4);
    }

    #[tokio::test]
    async fn test_search_matches_substring_anywhere() {
        let hits = catalog().search_by_name("ware").await.unwrap();
        let names: Vec<_> = hits.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["Alienware x15", "Giner ware"]);
    }

    #[tokio::test]
    async fn test_search_is_case_sensitive() {
        assert!(catalog().search_by_name("iphone").await.unwrap().is_empty());
        assert_eq!(catalog().search_by_name("Iphone").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        assert!(matches!(
            catalog().search_by_name("").await,
            Err(CatalogError::EmptyQuery)
        ));
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        assert!(catalog().search_by_name("Toaster").await.unwrap().is_empty());
    }
}

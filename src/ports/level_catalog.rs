//! LevelCatalog port - read-only product/persona lookup.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ProductId};
use crate::domain::training::{Level, PersonaContext};

/// Port resolving (product, level) to persona and product details.
#[async_trait]
pub trait LevelCatalog: Send + Sync {
    /// Resolves the persona context for a product at a level.
    async fn persona_context(
        &self,
        product_id: &ProductId,
        level: Level,
    ) -> Result<PersonaContext, CatalogError>;
}

/// Catalog lookup failures.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    #[error("product '{0}' not found in catalog")]
    ProductNotFound(String),

    #[error("product '{product}' has no level {level}")]
    LevelNotFound { product: String, level: u32 },

    #[error("catalog backend failed: {0}")]
    Backend(String),
}

impl From<CatalogError> for DomainError {
    fn from(err: CatalogError) -> Self {
        let code = match &err {
            CatalogError::ProductNotFound(_) => ErrorCode::ProductNotFound,
            CatalogError::LevelNotFound { .. } => ErrorCode::LevelNotFound,
            CatalogError::Backend(_) => ErrorCode::StorageFailed,
        };
        DomainError::new(code, err.to_string())
    }
}

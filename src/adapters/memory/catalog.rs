//! Static LevelCatalog adapter loaded from a YAML definition file.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::domain::foundation::ProductId;
use crate::domain::training::{Level, PersonaContext};
use crate::ports::{CatalogError, LevelCatalog};

/// Persona definition for one level.
#[derive(Debug, Clone, Deserialize)]
pub struct PersonaEntry {
    pub name: String,
    pub primary_trait: String,
    pub description: String,
}

/// One product with its levelled personas.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductEntry {
    pub name: String,
    pub description: String,
    pub levels: HashMap<u32, PersonaEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct CatalogFile {
    products: HashMap<String, ProductEntry>,
}

/// Catalog backed by an in-memory product map.
#[derive(Debug, Clone)]
pub struct StaticLevelCatalog {
    products: HashMap<String, ProductEntry>,
}

impl StaticLevelCatalog {
    /// Creates a catalog from an already-built product map.
    pub fn new(products: HashMap<String, ProductEntry>) -> Self {
        Self { products }
    }

    /// Parses a catalog from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile =
            serde_yaml::from_str(yaml).map_err(|e| CatalogError::Backend(e.to_string()))?;
        Ok(Self::new(file.products))
    }

    /// Loads a catalog from a YAML file on disk.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let text =
            std::fs::read_to_string(path).map_err(|e| CatalogError::Backend(e.to_string()))?;
        Self::from_yaml_str(&text)
    }

    /// Number of products in the catalog.
    pub fn product_count(&self) -> usize {
        self.products.len()
    }
}

#[async_trait]
impl LevelCatalog for StaticLevelCatalog {
    async fn persona_context(
        &self,
        product_id: &ProductId,
        level: Level,
    ) -> Result<PersonaContext, CatalogError> {
        let product = self
            .products
            .get(product_id.as_str())
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;

        let persona = product
            .levels
            .get(&level.value())
            .ok_or_else(|| CatalogError::LevelNotFound {
                product: product_id.to_string(),
                level: level.value(),
            })?;

        Ok(PersonaContext::new(
            &persona.name,
            &persona.description,
            &persona.primary_trait,
            &product.name,
            &product.description,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_YAML: &str = r#"
products:
  p1:
    name: SolarMax Panels
    description: residential solar panels with a 25-year warranty
    levels:
      1:
        name: Maria
        primary_trait: Curious
        description: a first-time buyer gathering information
      2:
        name: Victor
        primary_trait: Skeptical
        description: a price-sensitive homeowner burned by a past vendor
"#;

    fn catalog() -> StaticLevelCatalog {
        StaticLevelCatalog::from_yaml_str(CATALOG_YAML).unwrap()
    }

    #[tokio::test]
    async fn resolves_persona_for_known_product_and_level() {
        let context = catalog()
            .persona_context(&ProductId::new("p1").unwrap(), Level::ONE)
            .await
            .unwrap();

        assert_eq!(context.persona_name, "Maria");
        assert_eq!(context.primary_trait, "Curious");
        assert_eq!(context.product_name, "SolarMax Panels");
    }

    #[tokio::test]
    async fn unknown_product_is_a_product_not_found() {
        let err = catalog()
            .persona_context(&ProductId::new("nope").unwrap(), Level::ONE)
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::ProductNotFound(_)));
    }

    #[tokio::test]
    async fn unknown_level_is_a_level_not_found() {
        let err = catalog()
            .persona_context(&ProductId::new("p1").unwrap(), Level::new(9).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::LevelNotFound { .. }));
    }

    #[test]
    fn malformed_yaml_is_a_backend_error() {
        let err = StaticLevelCatalog::from_yaml_str("products: [not a map]").unwrap_err();
        assert!(matches!(err, CatalogError::Backend(_)));
    }
}

//! Persona and product context from the level catalog.

use serde::{Deserialize, Serialize};

/// Read-only persona and product details for one (product, level) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaContext {
    pub persona_name: String,
    pub persona_description: String,
    pub primary_trait: String,
    pub product_name: String,
    pub product_description: String,
}

impl PersonaContext {
    /// Creates a new persona context.
    pub fn new(
        persona_name: impl Into<String>,
        persona_description: impl Into<String>,
        primary_trait: impl Into<String>,
        product_name: impl Into<String>,
        product_description: impl Into<String>,
    ) -> Self {
        Self {
            persona_name: persona_name.into(),
            persona_description: persona_description.into(),
            primary_trait: primary_trait.into(),
            product_name: product_name.into(),
            product_description: product_description.into(),
        }
    }
}

#[cfg(test)]
pub(crate) fn test_context() -> PersonaContext {
    PersonaContext::new(
        "Maria",
        "a cautious first-time buyer comparing several vendors",
        "Skeptical",
        "SolarMax Panels",
        "residential solar panels with a 25-year warranty",
    )
}

use serde::{Deserialize, Serialize};

/// A local shop listed in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: String,
    pub name: String,
    /// Product categories the store carries.
    pub category: Vec<String>,
    pub rating: f32,
    /// Distance from the buyer in kilometres.
    pub distance: f64,
    pub image: String,
    pub is_verified: bool,
    pub address: String,
    pub phone: String,
}

impl Store {
    pub fn carries(&self, category: &str) -> bool {
        self.category.iter().any(|c| c.eq_ignore_ascii_case(category))
    }

    pub fn summary(&self) -> StoreSummary {
        StoreSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            rating: self.rating,
            is_verified: self.is_verified,
        }
    }
}

/// The slice of a store that a bulk quote keeps for display.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub id: String,
    pub name: String,
    pub rating: f32,
    pub is_verified: bool,
}

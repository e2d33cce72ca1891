use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog document is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{kind} {id} references unknown {target}")]
    DanglingReference { kind: &'static str, id: String, target: String },
    #[error("Product not found: {0}")]
    ProductNotFound(String),
}

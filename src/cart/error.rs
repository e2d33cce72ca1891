use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CartError {
    #[error("Cart has no line for product: {0}")]
    NotFound(String),
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(u32),
    #[error("Cart total overflowed")]
    Overflow,
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

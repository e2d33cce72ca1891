use thiserror::Error;
use crate::actor_framework::FrameworkError;
use crate::domain::Money;

/// Errors that can occur while requesting or negotiating a bulk quote.
///
/// The first four variants are the buyer-facing validation failures; none of
/// them changes negotiation state.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum QuoteError {
    #[error("Please select a store")]
    MissingStore,
    #[error("Please select a product")]
    MissingProduct,
    #[error("Bulk pricing requires at least {minimum} units, got {quantity}")]
    QuantityBelowMinimum { quantity: u32, minimum: u32 },
    #[error("Counter-offer must be a positive amount, got {0:?}")]
    InvalidCounterOffer(String),
    #[error("Unknown store: {0}")]
    UnknownStore(String),
    #[error("Unknown product: {0}")]
    UnknownProduct(String),
    #[error("The request form cannot be edited while a quote is active")]
    FormLocked,
    #[error("There is no active quote request")]
    NoActiveQuote,
    #[error("Cannot {action} while the quote is {stage}")]
    InvalidTransition { stage: String, action: String },
    #[error("Price overflow for {quantity} units at {unit_price}")]
    PriceOverflow { unit_price: Money, quantity: u32 },
    #[error("Quote not found: {0}")]
    NotFound(String),
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl QuoteError {
    /// True for the input problems a buyer can fix by editing the form or the
    /// counter-offer field.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingStore
                | Self::MissingProduct
                | Self::QuantityBelowMinimum { .. }
                | Self::InvalidCounterOffer(_)
        )
    }
}

impl From<FrameworkError<QuoteError>> for QuoteError {
    fn from(e: FrameworkError<QuoteError>) -> Self {
        match e {
            FrameworkError::Entity(inner) => inner,
            FrameworkError::NotFound(id) => QuoteError::NotFound(id),
            other => QuoteError::ActorCommunicationError(other.to_string()),
        }
    }
}

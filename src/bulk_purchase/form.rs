use crate::clients::QuoteRequest;
use crate::quote_actor::{pricing, QuoteError};

/// The editable inputs of a bulk quote request.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteForm {
    pub store_id: Option<String>,
    pub product_id: Option<String>,
    pub quantity: u32,
    pub message: String,
}

impl Default for QuoteForm {
    fn default() -> Self {
        Self {
            store_id: None,
            product_id: None,
            quantity: pricing::MINIMUM_BULK_QUANTITY,
            message: String::new(),
        }
    }
}

impl QuoteForm {
    /// Checks store, product and quantity, in that order.
    pub fn validate(&self) -> Result<QuoteRequest, QuoteError> {
        let store_id = self.store_id.clone().filter(|id| !id.is_empty()).ok_or(QuoteError::MissingStore)?;
        let product_id = self.product_id.clone().filter(|id| !id.is_empty()).ok_or(QuoteError::MissingProduct)?;
        pricing::tier_discount(self.quantity)?;

        let message = self.message.trim();
        Ok(QuoteRequest {
            store_id,
            product_id,
            quantity: self.quantity,
            message: (!message.is_empty()).then(|| message.to_string()),
        })
    }
}

use tracing::debug;
use crate::actor_framework::Entity;
use crate::domain::{AcceptancePath, BulkQuote, BulkQuoteCreate, NegotiationStage, Party};
use super::actions::QuoteAction;
use super::error::QuoteError;
use super::pricing;

impl Entity for BulkQuote {
    type Id = String;
    type CreatePayload = BulkQuoteCreate;
    type Action = QuoteAction;
    type ActionResult = NegotiationStage;
    type Error = QuoteError;

    fn id(&self) -> &String { &self.id }

    /// Opens a quote in `Requested`, freezing the base price.
    ///
    /// # Errors
    /// Quantity below the bulk minimum, or a price that overflows.
    fn from_create(id: String, payload: BulkQuoteCreate) -> Result<Self, QuoteError> {
        let base_price = pricing::base_price(payload.product.unit_price, payload.quantity)?;
        let message = payload.message.filter(|m| !m.trim().is_empty());
        Ok(Self {
            id,
            store: payload.store,
            product: payload.product,
            quantity: payload.quantity,
            message,
            base_price,
            stage: NegotiationStage::Requested,
        })
    }

    /// Advances the negotiation.
    ///
    /// | from                          | action               | to                                  |
    /// |-------------------------------|----------------------|-------------------------------------|
    /// | `Requested`                   | `StoreRespond`       | `CounterOffered { Store, offer }`   |
    /// | `CounterOffered { Store, .. }`| `Accept`             | `Accepted { offer, AsOffered }`     |
    /// | `CounterOffered { Store, .. }`| `Counter(p)`         | `CounterOffered { Buyer, p }`       |
    /// | `CounterOffered { Store, .. }`| `Decline`            | `Declined`                          |
    /// | `CounterOffered { Buyer, .. }`| `StoreAcceptCounter` | `Accepted { offer − 2%, AfterCounter }` |
    ///
    /// Anything else is an `InvalidTransition` and leaves the stage untouched.
    fn handle_action(&mut self, action: QuoteAction) -> Result<NegotiationStage, QuoteError> {
        let next = match (&self.stage, &action) {
            (NegotiationStage::Requested, QuoteAction::StoreRespond) => NegotiationStage::CounterOffered {
                by: Party::Store,
                price: pricing::store_offer(self.base_price),
            },
            (NegotiationStage::CounterOffered { by: Party::Store, price }, QuoteAction::Accept) => {
                NegotiationStage::Accepted { final_price: *price, path: AcceptancePath::AsOffered }
            }
            (NegotiationStage::CounterOffered { by: Party::Store, .. }, QuoteAction::Counter(price)) => {
                if price.is_zero() {
                    return Err(QuoteError::InvalidCounterOffer(price.to_string()));
                }
                NegotiationStage::CounterOffered { by: Party::Buyer, price: *price }
            }
            (NegotiationStage::CounterOffered { by: Party::Store, .. }, QuoteAction::Decline) => {
                NegotiationStage::Declined
            }
            (NegotiationStage::CounterOffered { by: Party::Buyer, .. }, QuoteAction::StoreAcceptCounter) => {
                NegotiationStage::Accepted {
                    final_price: pricing::counter_settlement(self.base_price),
                    path: AcceptancePath::AfterCounter,
                }
            }
            (stage, action) => {
                return Err(QuoteError::InvalidTransition {
                    stage: stage.to_string(),
                    action: action.name().to_string(),
                });
            }
        };
        debug!(quote_id = %self.id, from = %self.stage, to = %next, "Quote stage changed");
        self.stage = next.clone();
        Ok(next)
    }
}

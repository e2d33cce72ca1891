use std::fmt;
use super::{Money, ProductSummary, StoreSummary};

/// Which side of the negotiation made the standing offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Store,
    Buyer,
}

/// How a quote reached its final price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptancePath {
    /// The buyer accepted the store's offer as-is.
    AsOffered,
    /// The buyer countered and the store accepted the counter.
    AfterCounter,
}

/// Where a bulk quote is in its lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum NegotiationStage {
    /// Submitted; waiting for the store to reply.
    Requested,
    /// A standing offer from one party. `by: Store` is the store's reply,
    /// `by: Buyer` is the buyer's counter awaiting the store.
    CounterOffered { by: Party, price: Money },
    Accepted { final_price: Money, path: AcceptancePath },
    Declined,
}

impl NegotiationStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted { .. } | Self::Declined)
    }
}

impl fmt::Display for NegotiationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Requested => f.write_str("requested"),
            Self::CounterOffered { by: Party::Store, .. } => f.write_str("store_responded"),
            Self::CounterOffered { by: Party::Buyer, .. } => f.write_str("negotiating"),
            Self::Accepted { .. } => f.write_str("confirmed"),
            Self::Declined => f.write_str("declined"),
        }
    }
}

/// One in-flight bulk-purchase negotiation.
///
/// Everything except `stage` is fixed at creation; `base_price` is computed
/// once from the unit price and quantity tier.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkQuote {
    pub id: String,
    pub store: StoreSummary,
    pub product: ProductSummary,
    pub quantity: u32,
    pub message: Option<String>,
    pub base_price: Money,
    pub stage: NegotiationStage,
}

impl BulkQuote {
    /// Displayed per-unit price, `round(base_price / quantity)`.
    pub fn per_unit_price(&self) -> Option<Money> {
        self.base_price.per_unit(self.quantity)
    }
}

/// Payload for opening a new bulk quote.
#[derive(Debug, Clone)]
pub struct BulkQuoteCreate {
    pub store: StoreSummary,
    pub product: ProductSummary,
    pub quantity: u32,
    pub message: Option<String>,
}

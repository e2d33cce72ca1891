use crate::domain::Money;

/// Transitions a bulk quote can take after creation.
///
/// Store-side actions are issued by the scheduled replies; buyer-side actions
/// come from the session.
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteAction {
    /// Store replies to a fresh request with its discounted offer.
    StoreRespond,
    /// Buyer takes the store's offer.
    Accept,
    /// Buyer proposes a different price. Allowed once.
    Counter(Money),
    /// Store takes the buyer's counter.
    StoreAcceptCounter,
    /// Buyer walks away from the store's offer.
    Decline,
}

impl QuoteAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::StoreRespond => "store_respond",
            Self::Accept => "accept",
            Self::Counter(_) => "counter",
            Self::StoreAcceptCounter => "store_accept_counter",
            Self::Decline => "decline",
        }
    }
}

//! Bulk tier pricing. Pure functions of unit price and quantity.

use crate::domain::Money;
use super::QuoteError;

/// Smallest order that qualifies for bulk pricing.
pub const MINIMUM_BULK_QUANTITY: u32 = 5;

/// Markdown the store applies to the base price when it replies.
pub const STORE_OFFER_MARKDOWN_PERCENT: u32 = 5;

/// Further markdown when the store accepts a buyer's counter-offer.
pub const COUNTER_ACCEPT_MARKDOWN_PERCENT: u32 = 2;

/// A step of the bulk discount schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscountTier {
    pub min_quantity: u32,
    pub percent: u32,
}

/// Highest threshold first.
pub const DISCOUNT_TIERS: [DiscountTier; 3] = [
    DiscountTier { min_quantity: 20, percent: 15 },
    DiscountTier { min_quantity: 10, percent: 10 },
    DiscountTier { min_quantity: MINIMUM_BULK_QUANTITY, percent: 5 },
];

/// The tier a quantity falls into, or `None` below the bulk minimum.
pub fn tier_for(quantity: u32) -> Option<DiscountTier> {
    DISCOUNT_TIERS.iter().copied().find(|tier| quantity >= tier.min_quantity)
}

/// Discount percentage for `quantity`.
pub fn tier_discount(quantity: u32) -> Result<u32, QuoteError> {
    tier_for(quantity)
        .map(|tier| tier.percent)
        .ok_or(QuoteError::QuantityBelowMinimum { quantity, minimum: MINIMUM_BULK_QUANTITY })
}

/// `unit_price × quantity × (1 − tier_discount(quantity))`.
pub fn base_price(unit_price: Money, quantity: u32) -> Result<Money, QuoteError> {
    let percent = tier_discount(quantity)?;
    unit_price
        .checked_mul(u64::from(quantity))
        .and_then(|gross| gross.marked_down(percent))
        .ok_or(QuoteError::PriceOverflow { unit_price, quantity })
}

/// Displayed per-unit price, `round(base_price / quantity)`.
pub fn per_unit_price(base_price: Money, quantity: u32) -> Option<Money> {
    base_price.per_unit(quantity)
}

/// What the store offers back: the base price less the flat reply markdown.
pub fn store_offer(base_price: Money) -> Money {
    // cannot overflow for amounts produced by base_price()
    base_price.marked_down(STORE_OFFER_MARKDOWN_PERCENT).unwrap_or(base_price)
}

/// Final price when the store accepts the buyer's counter.
pub fn counter_settlement(base_price: Money) -> Money {
    let offer = store_offer(base_price);
    offer.marked_down(COUNTER_ACCEPT_MARKDOWN_PERCENT).unwrap_or(offer)
}

use std::fmt;
use serde::{Deserialize, Serialize};

/// An amount in whole currency units.
///
/// Markdowns round half-up to the nearest unit. Arithmetic is checked; callers
/// decide how to report an overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    pub const fn units(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_mul(self, factor: u64) -> Option<Money> {
        self.0.checked_mul(factor).map(Money)
    }

    /// Takes `percent` off the amount, rounding half-up.
    ///
    /// Returns `None` when `percent > 100` or the intermediate product overflows.
    pub fn marked_down(self, percent: u32) -> Option<Money> {
        if percent > 100 {
            return None;
        }
        let keep = u64::from(100 - percent);
        let scaled = self.0.checked_mul(keep)?.checked_add(50)?;
        Some(Money(scaled / 100))
    }

    /// Splits the amount evenly over `parts`, rounding half-up.
    pub fn per_unit(self, parts: u32) -> Option<Money> {
        if parts == 0 {
            return None;
        }
        let parts = u64::from(parts);
        Some(Money(self.0.checked_add(parts / 2)? / parts))
    }

    /// Parses free-form buyer input such as `"12500"` or `"12500.40"`.
    ///
    /// Only finite, strictly positive numbers that round to at least one unit
    /// are accepted.
    pub fn parse_positive(raw: &str) -> Option<Money> {
        let value: f64 = raw.trim().parse().ok()?;
        if !value.is_finite() || value <= 0.0 || value > u64::MAX as f64 {
            return None;
        }
        let rounded = value.round() as u64;
        (rounded > 0).then_some(Money(rounded))
    }
}

impl From<u64> for Money {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = self.0.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        f.write_str(&grouped)
    }
}

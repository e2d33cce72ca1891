//! Bulk quote negotiation: the entity state machine and its pricing rules.

mod actions;
pub mod entity;
pub mod error;
pub mod pricing;

pub use actions::*;
pub use error::*;

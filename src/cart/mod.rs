//! The buyer's cart: a hand-written service actor keyed by product id.

mod error;
pub mod messages;
mod service;

pub use error::*;
pub use service::*;

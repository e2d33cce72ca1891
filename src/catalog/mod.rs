//! Read-only catalog of stores, products, per-store listings and deals.

pub mod display;
pub mod error;
pub mod repository;

pub use display::*;
pub use error::*;
pub use repository::*;

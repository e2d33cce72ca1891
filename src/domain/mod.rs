//! Business entities shared by the actors. Plain data, no actor concerns.

pub mod money;
pub mod store;
pub mod product;
pub mod quote;
pub mod cart;

pub use money::*;
pub use store::*;
pub use product::*;
pub use quote::*;
pub use cart::*;

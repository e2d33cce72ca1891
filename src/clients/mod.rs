//! Clients: cheap, cloneable handles for talking to the actors.

#[macro_use]
mod macros;

mod cart_client;
mod quote_client;

pub use cart_client::*;
pub use quote_client::*;

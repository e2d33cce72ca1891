//! The buyer-facing bulk purchase workflow.

pub mod form;
pub mod scheduler;
pub mod session;

pub use form::*;
pub use scheduler::*;
pub use session::*;

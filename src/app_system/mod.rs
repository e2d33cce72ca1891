//! System orchestration, configuration, notifications, startup and shutdown.

pub mod config;
pub mod error;
pub mod market_system;
pub mod notifications;
pub mod tracing;

pub use config::*;
pub use error::*;
pub use market_system::*;
pub use notifications::*;
pub use self::tracing::setup_tracing;

//! Rock-paper-scissors game platform core.
//!
//! Two engines share one choice domain: the deck mode scores a 10-choice
//! deck in a single batch, the streak mode walks a 100-round survival
//! session one committed round at a time. Persistence and account balances
//! sit behind the narrow interfaces in [`store`].

pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod store;
pub mod telemetry;

pub use config::{Config, GameConfig};
pub use error::GameError;
pub use service::{DeckGameService, StreakGameService};

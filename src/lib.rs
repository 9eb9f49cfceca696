//! CardBelcher library.
//!
//! This library provides the core functionality for the MTGCardBelcher reply bot:
//! card call extraction, reply composition with its easter eggs, and the Reddit
//! and Scryfall integrations the bot loop runs on.

pub mod error;
pub mod config;
pub mod types;
pub mod timer;
pub mod extract;
pub mod alias;
pub mod replies;
pub mod catalog;
pub mod counter;
pub mod collectible;
pub mod compose;
pub mod eligibility;
pub mod images;
pub mod reddit;
pub mod bot;
pub mod utils;

pub use error::{BelcherError, Result};
pub use config::Config;

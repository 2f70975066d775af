//! Core round engine. Keep this crate free of IO and platform concerns.

pub mod cards;
pub mod config;
pub mod content;
pub mod deck;
pub mod events;
pub mod preview;
pub mod rng;
pub mod round;
pub mod scoring;
pub mod session;
pub mod state;
pub mod store;

pub use cards::*;
pub use config::*;
pub use content::*;
pub use deck::*;
pub use events::*;
pub use preview::*;
pub use rng::*;
pub use round::*;
pub use scoring::*;
pub use session::*;
pub use state::*;
pub use store::*;

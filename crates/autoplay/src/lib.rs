//! Seeded balancing harness: scripted policies playing whole sessions.

mod config;
mod error;
mod policy;
mod simulator;
mod trace;

pub use config::*;
pub use error::*;
pub use policy::*;
pub use simulator::*;
pub use trace::*;

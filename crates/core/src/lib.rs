//! Core game logic. Keep this crate free of IO and platform concerns.

pub mod autoplay;
pub mod board;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod events;
pub mod ops;
pub mod quiz;
pub mod rent;
pub mod rng;
pub mod session;
pub mod state;
pub mod sync;
pub mod upgrade;

pub use board::*;
pub use cards::*;
pub use config::*;
pub use deck::*;
pub use engine::*;
pub use events::*;
pub use quiz::*;
pub use rent::*;
pub use rng::*;
pub use session::*;
pub use state::*;
pub use upgrade::*;

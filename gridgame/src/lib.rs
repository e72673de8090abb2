//! Turn-based grid games in the style of tic-tac-toe and connect four.
//!
//! A [`GameController`] owns the board and decides whose turn it is and when
//! a game is over. Players take part through [`Agent`]s, which exchange
//! [`Notification`]s and [`Signal`]s with the controller. A [`Session`]
//! wires the two together.

pub use agent::*;
pub use board::*;
pub use config::*;
pub use controller::*;
pub use errors::*;
pub use player::*;
pub use protocol::*;
pub use rules::*;
pub use session::*;
pub use symbols::*;

mod agent;
#[cfg(test)]
mod arbitrary;
mod board;
mod config;
mod controller;
mod errors;
mod player;
mod protocol;
mod rules;
mod session;
mod symbols;

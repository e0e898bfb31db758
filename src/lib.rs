//! Storyline Engine — branching, multi-chapter narrative arcs for games.
//!
//! Walks authored storyline graphs with conditional triggers, player
//! choices, probabilistic outcomes, and week-delayed transitions, applying
//! effects to host-owned game state through injected ports.

pub mod content;
pub mod core;
pub mod schema;

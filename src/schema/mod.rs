pub mod condition;
pub mod effect;
pub mod state;
pub mod storyline;

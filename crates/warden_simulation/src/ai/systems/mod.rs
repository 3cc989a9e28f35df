//! AI systems (per-tick controller loop)

pub mod actions;
pub mod fsm;
pub mod reactions;
pub mod targets;

pub use actions::*;
pub use fsm::*;
pub use reactions::*;
pub use targets::*;

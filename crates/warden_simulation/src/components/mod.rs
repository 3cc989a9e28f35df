//! ECS Components shared by the controller and its collaborators
//!
//! Организация по доменам:
//! - actor: здоровье, capability `Damageable`, маркер `Targetable`
//! - movement: граница с навигацией (MovementCommand, NavigationState, MovementSpeed)

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;

//! AI events (state transitions, death)

use bevy::prelude::*;

use super::AgentState;

/// Emitted once per real state change (never on re-evaluation).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentStateChanged {
    pub entity: Entity,
    pub from: AgentState,
    pub to: AgentState,
}

/// Agent entered `Dead` (emitted once).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentDied {
    pub entity: Entity,
}

//! AI module — hostile agent FSM
//!
//! Архитектура (один фиксированный тик):
//! 1. Combat    — AttackTimer: windup → strike → cooldown
//! 2. Lifecycle — смерть: Dead, отмена атаки, AgentDied
//! 3. Decide    — цель → perception → переходы FSM (edge-triggered)
//! 4. Act       — действия состояния: навигация, поворот, старт атаки
//! 5. Cleanup   — учёт популяции, деспавн трупов
//!
//! Навигационный слой (headless или хост) исполняет команды после `Act`.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;
pub mod transitions;

pub use components::{AgentState, AgentTarget, HostileAgent, Locomotion};
pub use events::{AgentDied, AgentStateChanged};
pub use systems::{
    evaluate_transitions, execute_state_actions, handle_agent_death, nearest_visible_candidate, resolve_targets,
};
pub use transitions::{next_state, Situation, TargetView};

use crate::perception::Occluders;

#[cfg(not(feature = "rapier"))]
use crate::perception::update_perception as perception_system;
#[cfg(not(feature = "rapier"))]
use systems::resolve_targets as target_system;
#[cfg(feature = "rapier")]
use crate::perception::rapier::update_perception_rapier as perception_system;
#[cfg(feature = "rapier")]
use systems::resolve_targets_rapier as target_system;

/// Phases of the controller tick, run in this order in `FixedUpdate`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentSystems {
    Combat,
    Lifecycle,
    Decide,
    Act,
    Cleanup,
}

/// AI Plugin
///
/// Регистрирует FSM системы в FixedUpdate. Порядок наборов задаётся здесь,
/// CombatPlugin и SpawnPlugin добавляют свои системы в `Combat`/`Cleanup`.
///
/// С feature `rapier` perception идёт через `RapierContext` (хост сам
/// добавляет `RapierPhysicsPlugin`), иначе через ресурс `Occluders`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AgentStateChanged>()
            .add_event::<AgentDied>()
            .init_resource::<Occluders>();

        app.configure_sets(
            FixedUpdate,
            (
                AgentSystems::Combat,
                AgentSystems::Lifecycle,
                AgentSystems::Decide,
                AgentSystems::Act,
                AgentSystems::Cleanup,
            )
                .chain(),
        );

        app.add_systems(
            FixedUpdate,
            (
                handle_agent_death.in_set(AgentSystems::Lifecycle),
                (target_system, perception_system, evaluate_transitions)
                    .chain()
                    .in_set(AgentSystems::Decide),
                execute_state_actions.in_set(AgentSystems::Act),
            ),
        );
    }
}

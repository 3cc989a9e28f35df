//! Combat module (windup/cooldown attack timer)
//!
//! ECS ответственность:
//! - AttackTimer: windup → strike (range re-check) → cooldown
//! - Damage через capability `Damageable` (Health)
//! - Events: AttackPhaseChanged, DamageDealt
//!
//! Старт атаки решает FSM (ai::systems::actions), здесь только таймер.

use bevy::prelude::*;

pub mod events;
pub mod systems;
pub mod timer;

pub use events::{AttackPhaseChanged, AttackPhaseKind, DamageDealt};
pub use systems::{resolve_strike, tick_attack_timers, MissingHealthWarnings, StrikeOutcome};
pub use timer::{AttackPhase, AttackStep, AttackTimer};

use crate::ai::AgentSystems;

/// Combat Plugin
///
/// Регистрирует события и `tick_attack_timers` в `AgentSystems::Combat`
/// (первый набор тика, до обработки смерти и оценки FSM).
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AttackPhaseChanged>()
            .add_event::<DamageDealt>();

        app.add_systems(FixedUpdate, tick_attack_timers.in_set(AgentSystems::Combat));
    }
}

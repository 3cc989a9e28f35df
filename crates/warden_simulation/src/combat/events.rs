//! Combat events (attack phases, damage)

use bevy::prelude::*;

/// Attack phase edge, for presentation (animation triggers, sounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackPhaseKind {
    /// Timer started
    Windup,
    /// Windup elapsed; `hit` is false on a whiff
    Strike { hit: bool },
    /// Cooldown began (same tick as Strike)
    Cooldown,
    /// Cooldown elapsed, next attack allowed
    Ready,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackPhaseChanged {
    pub entity: Entity,
    pub phase: AttackPhaseKind,
}

/// Событие: урон нанесен
///
/// `damage` — сколько реально снято (не больше оставшегося здоровья).
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

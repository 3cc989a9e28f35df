//! Combat systems (attack timer progression, strike resolution)

use bevy::prelude::*;
use std::collections::HashSet;

use super::{AttackPhaseChanged, AttackPhaseKind, AttackTimer, DamageDealt};
use crate::ai::AgentState;
use crate::components::{Damageable, Health};
use crate::logger;
use crate::profile::{AgentArchetype, CombatProfile};

/// Outcome of the strike re-check at the end of windup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeOutcome {
    /// Target in reach, damage applied
    Hit { applied: u32, target_died: bool },
    /// Target left reach, is gone, or is already dead
    Whiff,
    /// Target in reach but has no damage capability
    NoCapability,
}

/// Пары (attacker, target), о которых уже предупредили: цель без Health.
///
/// Пары с исчезнувшими entity вычищаются каждый тик.
#[derive(Debug, Default)]
pub struct MissingHealthWarnings {
    pairs: HashSet<(Entity, Entity)>,
}

impl MissingHealthWarnings {
    /// `true` only the first time a pair is seen.
    pub fn first_time(&mut self, attacker: Entity, target: Entity) -> bool {
        self.pairs.insert((attacker, target))
    }

    pub fn prune(&mut self, exists: impl Fn(Entity) -> bool) {
        self.pairs
            .retain(|(attacker, target)| exists(*attacker) && exists(*target));
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Resolve a strike from `attacker_position` against `target`.
///
/// Урон проходит только если цель всё ещё в пределах
/// `attack_range + tolerance_margin`.
pub fn resolve_strike<D: Damageable>(
    attacker_position: Vec3,
    target_position: Option<Vec3>,
    target_health: Option<&mut D>,
    combat: &CombatProfile,
) -> StrikeOutcome {
    let Some(target_position) = target_position else {
        return StrikeOutcome::Whiff;
    };

    if attacker_position.distance(target_position) > combat.strike_reach() {
        return StrikeOutcome::Whiff;
    }

    let Some(health) = target_health else {
        return StrikeOutcome::NoCapability;
    };

    if health.is_dead() {
        return StrikeOutcome::Whiff;
    }

    let applied = health.apply_damage(combat.damage);
    StrikeOutcome::Hit {
        applied,
        target_died: health.is_dead(),
    }
}

/// Система: продвижение AttackTimer (windup → strike → cooldown → removal)
///
/// Первая система тика: урон приходит ровно через `windup_seconds` после
/// старта. Атакующий с нулевым здоровьем удар не наносит, его таймер
/// снимается без урона (смерть дальше обрабатывает handle_agent_death).
pub fn tick_attack_timers(
    mut commands: Commands,
    mut attackers: Query<(Entity, &Transform, &AgentArchetype, &AgentState, &mut AttackTimer)>,
    positions: Query<&Transform>,
    mut healths: Query<&mut Health>,
    mut phase_events: EventWriter<AttackPhaseChanged>,
    mut damage_events: EventWriter<DamageDealt>,
    mut warned: Local<MissingHealthWarnings>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    if !warned.is_empty() {
        warned.prune(|entity| positions.contains(entity));
    }

    for (entity, transform, archetype, state, mut timer) in attackers.iter_mut() {
        // Убитый между тиками (или в этом тике) не бьёт: windup отменяется
        let attacker_dead = healths.get(entity).is_ok_and(|h| h.is_dead());
        if state.is_dead() || attacker_dead {
            commands.entity(entity).remove::<AttackTimer>();
            continue;
        }

        let step = timer.tick(delta);

        if step.strike {
            let target = timer.target;
            let target_position = positions.get(target).ok().map(|t| t.translation);
            let mut target_health = healths.get_mut(target).ok();

            let outcome = resolve_strike(
                transform.translation,
                target_position,
                target_health.as_deref_mut(),
                &archetype.combat,
            );

            let hit = match outcome {
                StrikeOutcome::Hit {
                    applied,
                    target_died,
                } => {
                    logger::log(&format!(
                        "⚔️ {:?} hit {:?} for {} (target_died: {})",
                        entity, target, applied, target_died
                    ));
                    damage_events.write(DamageDealt {
                        attacker: entity,
                        target,
                        damage: applied,
                        target_died,
                    });
                    true
                }
                StrikeOutcome::Whiff => {
                    logger::log(&format!("💨 {:?} whiffed on {:?}", entity, target));
                    false
                }
                StrikeOutcome::NoCapability => {
                    if warned.first_time(entity, target) {
                        logger::log_warning(&format!(
                            "⚠️ {:?}: target {:?} has no Health, damage skipped",
                            entity, target
                        ));
                    }
                    false
                }
            };

            phase_events.write(AttackPhaseChanged {
                entity,
                phase: AttackPhaseKind::Strike { hit },
            });
            phase_events.write(AttackPhaseChanged {
                entity,
                phase: AttackPhaseKind::Cooldown,
            });
        }

        if step.finished {
            commands.entity(entity).remove::<AttackTimer>();
            phase_events.write(AttackPhaseChanged {
                entity,
                phase: AttackPhaseKind::Ready,
            });
        }
    }
}

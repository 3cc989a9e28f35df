//! Attack timer component (windup → strike → cooldown).
//!
//! Неблокирующий: продвигается только из `tick_attack_timers`, по одному
//! шагу фиксированного тика. Таймер вставляется при старте атаки и
//! удаляется когда cooldown истёк.

use bevy::prelude::*;

use crate::profile::CombatProfile;
use crate::TIMER_EPSILON;

/// Phase of an in-flight attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackPhase {
    /// Telegraph: агент зафиксирован лицом к цели, урона ещё нет
    Windup,
    /// После удара (попал или нет), новую атаку начать нельзя
    Cooldown,
}

/// Result of advancing the timer by one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttackStep {
    /// Windup just elapsed: resolve the strike now
    pub strike: bool,
    /// Cooldown elapsed: remove the timer
    pub finished: bool,
}

/// In-flight attack. At most one per agent.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct AttackTimer {
    /// Entity the strike is resolved against (captured at start)
    pub target: Entity,
    pub phase: AttackPhase,
    /// Time remaining in the current phase (seconds)
    pub phase_remaining: f32,
    /// Cooldown length, captured at start
    cooldown_seconds: f32,
}

impl AttackTimer {
    /// Create timer in Windup phase.
    pub fn start(target: Entity, combat: &CombatProfile) -> Self {
        Self {
            target,
            phase: AttackPhase::Windup,
            phase_remaining: combat.windup_seconds,
            cooldown_seconds: combat.cooldown_seconds,
        }
    }

    pub fn is_windup(&self) -> bool {
        self.phase == AttackPhase::Windup
    }

    pub fn is_cooldown(&self) -> bool {
        self.phase == AttackPhase::Cooldown
    }

    /// Advance by `delta` seconds.
    ///
    /// Остаток windup переносится в cooldown, поэтому интервал между
    /// ударами не зависит от размера тика. Большой `delta` может за один
    /// вызов и ударить, и завершить cooldown.
    pub fn tick(&mut self, delta: f32) -> AttackStep {
        let mut step = AttackStep::default();
        self.phase_remaining -= delta;

        if self.phase == AttackPhase::Windup {
            if self.phase_remaining > TIMER_EPSILON {
                return step;
            }
            step.strike = true;
            self.phase = AttackPhase::Cooldown;
            self.phase_remaining += self.cooldown_seconds;
        }

        if self.phase_remaining <= TIMER_EPSILON {
            step.finished = true;
        }
        step
    }
}

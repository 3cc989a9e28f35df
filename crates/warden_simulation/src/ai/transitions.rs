//! Transition table of the agent FSM
//!
//! Чистая функция: (текущее состояние, снимок восприятия) → следующее состояние.
//! Строки таблицы проверяются сверху вниз, срабатывает первая подходящая.

use super::AgentState;
use crate::profile::AgentProfile;

/// What the agent knows about its resolved target this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub distance: f32,
    pub visible: bool,
}

/// Inputs to one transition evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Situation {
    pub state: AgentState,
    /// Health reached zero
    pub self_dead: bool,
    /// `None` when the target is absent or failed resolution
    pub target: Option<TargetView>,
    pub distance_to_origin: f32,
    pub has_patrol_route: bool,
}

/// Next state for `situation` under `profile`.
pub fn next_state(situation: &Situation, profile: &AgentProfile) -> AgentState {
    use AgentState::*;

    if situation.state == Dead || situation.self_dead {
        return Dead;
    }

    let perception = &profile.perception;
    let combat = &profile.combat;
    let movement = &profile.movement;

    let detected = situation
        .target
        .is_some_and(|t| t.visible && t.distance <= perception.detection_range);
    let leashed = movement
        .leash_radius
        .is_some_and(|radius| situation.distance_to_origin > radius);

    match (situation.state, situation.target) {
        (Idle, _) if detected => Chase,
        (Idle, _) if situation.has_patrol_route => Patrol,
        (Idle, _) => Idle,

        (Patrol, _) if detected => Chase,
        // Маршрут пропал: деградируем в Idle
        (Patrol, _) if !situation.has_patrol_route => Idle,
        (Patrol, _) => Patrol,

        (Chase, None) => Return,
        (Chase, Some(_)) if leashed => Return,
        (Chase, Some(t)) if t.distance <= combat.attack_range => Attack,
        (Chase, Some(t)) if !t.visible || t.distance > perception.chase_range => Return,
        (Chase, Some(_)) => Chase,

        (Attack, None) => Return,
        (Attack, Some(_)) if leashed => Return,
        (Attack, Some(t)) if t.distance > combat.attack_range => Chase,
        (Attack, Some(t)) if !t.visible => Return,
        (Attack, Some(_)) => Attack,

        // Во время Return новые цели не захватываются
        (Return, _) if situation.distance_to_origin <= movement.arrival_epsilon => Idle,
        (Return, _) => Return,

        (Dead, _) => Dead,
    }
}

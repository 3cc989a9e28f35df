//! FSM transition system.

use bevy::prelude::*;

use crate::ai::transitions::{next_state, Situation, TargetView};
use crate::ai::{AgentState, AgentStateChanged, AgentTarget, HostileAgent};
use crate::components::{Damageable, Health, MovementCommand};
use crate::logger;
use crate::patrol::PatrolProgress;
use crate::perception::Perception;
use crate::profile::AgentArchetype;

/// Build the transition input from the agent's components.
pub fn situation_for(
    state: AgentState,
    health: &Health,
    target: &AgentTarget,
    perception: &Perception,
    position: Vec3,
    origin: Vec3,
    patrol: Option<&PatrolProgress>,
) -> Situation {
    let target = target.get().and(perception.target_distance).map(|distance| TargetView {
        distance,
        visible: perception.target_visible,
    });

    Situation {
        state,
        self_dead: health.is_dead(),
        target,
        distance_to_origin: position.distance(origin),
        has_patrol_route: patrol.is_some_and(|p| p.has_route()),
    }
}

/// Система: оценка переходов FSM
///
/// Edge-triggered: лог, событие и entry actions только при реальной смене
/// состояния. Повторная оценка того же состояния ничего не делает.
pub fn evaluate_transitions(
    mut agents: Query<(
        Entity,
        &HostileAgent,
        &Transform,
        &AgentArchetype,
        &Health,
        &AgentTarget,
        &Perception,
        &mut AgentState,
        &mut MovementCommand,
        Option<&mut PatrolProgress>,
    )>,
    mut state_events: EventWriter<AgentStateChanged>,
) {
    for (entity, agent, transform, archetype, health, target, perception, mut state, mut command, patrol) in
        agents.iter_mut()
    {
        // Dead: терминальное, переходы выключены
        if state.is_dead() {
            continue;
        }

        let situation = situation_for(
            *state,
            health,
            target,
            perception,
            transform.translation,
            agent.origin,
            patrol.as_deref(),
        );
        let next = next_state(&situation, archetype);

        if next == *state {
            continue;
        }

        let from = *state;
        *state = next;

        logger::log(&format!(
            "🧠 {:?}: {} → {} (target: {:?}, dist: {:?})",
            entity,
            from.as_str(),
            next.as_str(),
            target.get(),
            perception.target_distance
        ));
        state_events.write(AgentStateChanged {
            entity,
            from,
            to: next,
        });

        // Entry actions
        match next {
            AgentState::Idle | AgentState::Attack | AgentState::Dead => {
                command.set_if_neq(MovementCommand::Stop);
            }
            AgentState::Patrol => {
                if let Some(mut progress) = patrol {
                    progress.reset_dwell();
                }
            }
            AgentState::Chase | AgentState::Return => {}
        }
    }
}

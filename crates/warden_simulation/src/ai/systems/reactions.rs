//! AI reaction systems (death).

use bevy::prelude::*;

use crate::ai::{AgentDied, AgentState, AgentStateChanged, Locomotion};
use crate::combat::AttackTimer;
use crate::components::{Damageable, Health, MovementCommand};
use crate::logger;
use crate::profile::AgentArchetype;
use crate::spawn::DespawnAfter;

/// System: обработка смерти → переключение AI в Dead state
///
/// При HP == 0 (в любом состоянии, включая середину windup):
/// - AttackTimer снимается без урона
/// - навигация останавливается, дальше запросов нет
/// - AgentStateChanged + AgentDied (один раз)
/// - DespawnAfter если у профиля задан corpse_seconds
pub fn handle_agent_death(
    mut commands: Commands,
    mut agents: Query<(
        Entity,
        &Health,
        &AgentArchetype,
        &mut AgentState,
        &mut MovementCommand,
        &mut Locomotion,
        Has<AttackTimer>,
    )>,
    mut state_events: EventWriter<AgentStateChanged>,
    mut death_events: EventWriter<AgentDied>,
    time: Res<Time<Fixed>>,
) {
    for (entity, health, archetype, mut state, mut command, mut locomotion, attacking) in agents.iter_mut() {
        if !health.is_dead() || state.is_dead() {
            continue;
        }

        let from = *state;
        *state = AgentState::Dead;
        command.set_if_neq(MovementCommand::Stop);
        locomotion.set_if_neq(Locomotion::default());

        if attacking {
            commands.entity(entity).remove::<AttackTimer>();
        }

        if let Some(corpse_seconds) = archetype.movement.corpse_seconds {
            commands.entity(entity).insert(DespawnAfter {
                despawn_time: time.elapsed_secs() + corpse_seconds,
            });
        }

        state_events.write(AgentStateChanged {
            entity,
            from,
            to: AgentState::Dead,
        });
        death_events.write(AgentDied { entity });

        logger::log(&format!(
            "💀 {:?} died in {} → AI disabled (Dead state)",
            entity,
            from.as_str()
        ));
    }
}

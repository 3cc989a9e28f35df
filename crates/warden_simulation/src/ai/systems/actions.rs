//! Per-state actions (navigation requests, facing, attack start).

use bevy::prelude::*;
use std::collections::HashSet;

use crate::ai::{AgentState, AgentTarget, HostileAgent, Locomotion};
use crate::combat::{AttackPhaseChanged, AttackPhaseKind, AttackTimer};
use crate::components::{MovementCommand, NavigationState};
use crate::logger;
use crate::navigation::steering::{face_towards, step_towards, turn_towards};
use crate::navigation::{NavHandle, NavigationAdapter};
use crate::patrol::{PatrolProgress, PatrolStep};
use crate::perception::Perception;
use crate::profile::AgentArchetype;

/// Distance on the ground plane (waypoints may sit at a different height).
pub fn ground_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Система: действия текущего состояния
///
/// - Idle: ничего (stop был entry action)
/// - Patrol: путь к текущей точке, пауза, следующая точка
/// - Chase: destination = позиция цели, доворот с turn rate
/// - Attack: стоим, доворот; во время windup жёстко смотрим на цель;
///   без таймера — старт новой атаки
/// - Return: путь к origin; если пути нет — прямо к origin своими силами
/// - Dead: никаких запросов
pub fn execute_state_actions(
    mut commands: Commands,
    mut agents: Query<(
        Entity,
        &HostileAgent,
        &mut Transform,
        &AgentArchetype,
        &AgentState,
        &Perception,
        &AgentTarget,
        Option<&AttackTimer>,
        Option<&mut PatrolProgress>,
        &mut MovementCommand,
        &NavigationState,
        &mut Locomotion,
    )>,
    mut phase_events: EventWriter<AttackPhaseChanged>,
    mut nav_faults: Local<HashSet<Entity>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (
        entity,
        agent,
        mut transform,
        archetype,
        state,
        perception,
        target,
        timer,
        patrol,
        command,
        nav_state,
        mut locomotion,
    ) in agents.iter_mut()
    {
        if state.is_dead() {
            nav_faults.remove(&entity);
            continue;
        }

        let movement = &archetype.movement;
        let max_turn = movement.turn_rate_degrees.to_radians() * delta;
        let position = transform.translation;

        let mut nav = NavHandle::new(command, nav_state);
        let path_ok = nav.has_valid_path();
        let mut velocity = nav.current_velocity();
        // Запрашивали ли путь в этом тике (для edge-лога провала навигации)
        let mut navigating = false;

        match *state {
            AgentState::Idle | AgentState::Dead => {}

            AgentState::Patrol => {
                let Some(mut progress) = patrol else {
                    nav.stop();
                    continue;
                };
                let Some(waypoint) = progress.current_waypoint() else {
                    nav.stop();
                    continue;
                };

                let arrived = ground_distance(position, waypoint) <= movement.arrival_epsilon;
                let heading = match progress.update(arrived, delta) {
                    PatrolStep::Travel => Some(waypoint),
                    PatrolStep::Advanced { index } => {
                        logger::log(&format!("🚶 {:?}: patrol → waypoint #{}", entity, index));
                        progress.current_waypoint()
                    }
                    PatrolStep::Dwelling | PatrolStep::NoRoute => None,
                };

                match heading {
                    Some(destination) => {
                        nav.request_destination(destination);
                        transform.rotation = turn_towards(transform.rotation, destination - position, max_turn);
                        navigating = true;
                    }
                    None => {
                        nav.stop();
                        velocity = Vec3::ZERO;
                    }
                }
            }

            AgentState::Chase => {
                if let Some(target_position) = perception.target_position {
                    nav.request_destination(target_position);
                    transform.rotation =
                        turn_towards(transform.rotation, target_position - position, max_turn);
                    navigating = true;
                }
            }

            AgentState::Attack => {
                nav.stop();
                velocity = Vec3::ZERO;

                let (Some(target_entity), Some(target_position)) = (target.get(), perception.target_position) else {
                    locomotion.set_if_neq(Locomotion { velocity });
                    continue;
                };
                let to_target = target_position - position;

                match timer {
                    // Windup: лицом к цели без ограничения скорости поворота
                    Some(timer) if timer.is_windup() => {
                        transform.rotation = face_towards(transform.rotation, to_target);
                    }
                    Some(_) => {
                        transform.rotation = turn_towards(transform.rotation, to_target, max_turn);
                    }
                    None => {
                        transform.rotation = face_towards(transform.rotation, to_target);
                        commands
                            .entity(entity)
                            .insert(AttackTimer::start(target_entity, &archetype.combat));
                        phase_events.write(AttackPhaseChanged {
                            entity,
                            phase: AttackPhaseKind::Windup,
                        });
                        logger::log(&format!(
                            "⚔️ {:?} winds up on {:?} (dist: {:.2})",
                            entity,
                            target_entity,
                            to_target.length()
                        ));
                    }
                }
            }

            AgentState::Return => {
                nav.request_destination(agent.origin);
                navigating = true;

                if path_ok {
                    transform.rotation = turn_towards(transform.rotation, agent.origin - position, max_turn);
                } else {
                    // Fallback: навигация не знает пути, идём по прямой
                    let next = step_towards(position, agent.origin, movement.move_speed * delta);
                    let travel = next - position;
                    transform.translation = next;
                    transform.rotation = face_towards(transform.rotation, travel);
                    velocity = if delta > 0.0 { travel / delta } else { Vec3::ZERO };
                }
            }
        }

        // Edge-triggered: предупреждаем один раз на каждый эпизод провала
        if !navigating || path_ok {
            nav_faults.remove(&entity);
        } else if nav_faults.insert(entity) {
            if *state == AgentState::Return {
                logger::log_warning(&format!(
                    "⚠️ {:?}: no path to origin {:?}, walking straight",
                    entity, agent.origin
                ));
            } else {
                // Patrol/Chase: стоим на месте, запрос остаётся в силе
                logger::log_warning(&format!("⚠️ {:?}: navigation has no path, holding position", entity));
            }
        }

        locomotion.set_if_neq(Locomotion { velocity });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ground_distance_ignores_height() {
        let a = Vec3::new(0.0, 0.0, 0.0);
        let b = Vec3::new(3.0, 10.0, 4.0);
        assert_eq!(ground_distance(a, b), 5.0);
    }
}

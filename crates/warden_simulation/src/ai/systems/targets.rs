//! Target resolution (weak reference validation + acquisition).

use bevy::prelude::*;

use crate::ai::{AgentState, AgentTarget};
use crate::components::{Health, Targetable};
use crate::logger;
use crate::perception::{can_see, is_descendant_of, LineOfSight, Occluders, TargetSighting, Viewpoint};
use crate::profile::{AgentArchetype, PerceptionConfig};

/// Nearest candidate within `detection_range` that `viewer` can actually see.
///
/// Кандидаты проверяются по возрастанию дистанции: ближний, но скрытый
/// (за спиной или за стеной) не заслоняет дальнего видимого.
/// Ничья по дистанции решается меньшим Entity, порядок итерации Query
/// на выбор не влияет.
///
/// `is_part_of(hit, candidate)` отвечает, принадлежит ли попавший коллайдер
/// кандидату (он сам или его потомок).
pub fn nearest_visible_candidate(
    viewer: &Viewpoint,
    config: &PerceptionConfig,
    candidates: impl Iterator<Item = (Entity, Vec3)>,
    los: &dyn LineOfSight,
    is_part_of: impl Fn(Entity, Entity) -> bool,
) -> Option<Entity> {
    let mut in_range: Vec<(Entity, f32, Vec3)> = candidates
        .filter(|(entity, _)| *entity != viewer.entity)
        .map(|(entity, position)| (entity, viewer.position.distance(position), position))
        .filter(|(_, distance, _)| *distance <= config.detection_range)
        .collect();
    in_range.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

    in_range
        .into_iter()
        .find(|(entity, _, position)| {
            let sighting = TargetSighting {
                entity: *entity,
                position: *position,
            };
            can_see(viewer, Some(&sighting), config, los, |hit| is_part_of(hit, *entity))
        })
        .map(|(entity, _, _)| entity)
}

/// Система: подтверждение / сброс / захват цели (headless `Occluders`)
///
/// Каждый тик:
/// 1. Текущая цель должна существовать (Transform) и быть жива (если есть Health).
///    Иначе — сброс (stale reference).
/// 2. В Idle/Patrol цель выбирается заново: ближайший видимый `Targetable`
///    в detection_range. Никого не видно — цель сбрасывается.
///
/// Chase/Attack цель не меняют; Return ничего не захватывает.
pub fn resolve_targets(
    mut agents: Query<(Entity, &Transform, &AgentArchetype, &AgentState, &mut AgentTarget)>,
    bodies: Query<(&Transform, Option<&Health>)>,
    candidates: Query<(Entity, &Transform, Option<&Health>), With<Targetable>>,
    parents: Query<&ChildOf>,
    occluders: Res<Occluders>,
) {
    resolve_all(&mut agents, &bodies, &candidates, &parents, &*occluders);
}

/// Система: то же что `resolve_targets`, но видимость через rapier raycast
#[cfg(feature = "rapier")]
pub fn resolve_targets_rapier(
    mut agents: Query<(Entity, &Transform, &AgentArchetype, &AgentState, &mut AgentTarget)>,
    bodies: Query<(&Transform, Option<&Health>)>,
    candidates: Query<(Entity, &Transform, Option<&Health>), With<Targetable>>,
    parents: Query<&ChildOf>,
    rapier: bevy_rapier3d::prelude::ReadRapierContext,
) {
    let Ok(context) = rapier.single() else {
        logger::log_error("resolve_targets_rapier: RapierContext не найден");
        return;
    };
    let los = crate::perception::rapier::RapierLineOfSight(context);
    resolve_all(&mut agents, &bodies, &candidates, &parents, &los);
}

fn resolve_all(
    agents: &mut Query<(Entity, &Transform, &AgentArchetype, &AgentState, &mut AgentTarget)>,
    bodies: &Query<(&Transform, Option<&Health>)>,
    candidates: &Query<(Entity, &Transform, Option<&Health>), With<Targetable>>,
    parents: &Query<&ChildOf>,
    los: &dyn LineOfSight,
) {
    for (entity, transform, archetype, state, mut target) in agents.iter_mut() {
        if state.is_dead() {
            continue;
        }

        if let Some(current) = target.get() {
            let valid = bodies
                .get(current)
                .is_ok_and(|(_, health)| health.is_none_or(|h| h.is_alive()));
            if !valid {
                logger::log(&format!("❓ {:?}: target {:?} lost", entity, current));
                target.clear();
            }
        }

        if !matches!(state, AgentState::Idle | AgentState::Patrol) {
            continue;
        }

        let viewer = Viewpoint {
            entity,
            position: transform.translation,
            forward: *transform.forward(),
        };
        let live = candidates
            .iter()
            .filter(|(_, _, health)| health.is_none_or(|h| h.is_alive()))
            .map(|(candidate, t, _)| (candidate, t.translation));

        let found = nearest_visible_candidate(&viewer, &archetype.perception, live, los, |hit, candidate| {
            is_descendant_of(hit, candidate, parents)
        });

        // Без лишних записей: change detection AgentTarget не дёргаем
        if target.get() == found {
            continue;
        }
        match found {
            Some(spotted) => {
                logger::log(&format!("👁️ {:?}: spotted {:?}", entity, spotted));
                target.set(spotted);
            }
            None => target.clear(),
        }
    }
}

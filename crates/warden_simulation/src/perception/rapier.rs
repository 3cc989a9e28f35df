//! Line-of-sight through bevy_rapier3d (feature `rapier`).
//!
//! Collision mask/groups настраиваются на стороне коллайдеров; здесь только
//! луч eye → target с исключением собственного тела наблюдателя.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{sense, LineOfSight, Perception};
use crate::ai::{AgentState, AgentTarget};
use crate::logger;
use crate::profile::AgentArchetype;

/// Borrowed rapier context used as a `LineOfSight` backend.
pub struct RapierLineOfSight<'a>(pub RapierContext<'a>);

impl LineOfSight for RapierLineOfSight<'_> {
    fn first_hit(&self, origin: Vec3, end: Vec3, ignore: Entity) -> Option<Entity> {
        let offset = end - origin;
        let length = offset.length();
        if length <= f32::EPSILON {
            return None;
        }

        let filter = QueryFilter::default()
            .exclude_rigid_body(ignore)
            .exclude_collider(ignore);

        self.0
            .cast_ray(origin, offset / length, length, true, filter)
            .map(|(entity, _toi)| entity)
    }
}

/// Система: perception через rapier raycast (заменяет `update_perception`)
pub fn update_perception_rapier(
    mut agents: Query<(Entity, &Transform, &AgentArchetype, &AgentTarget, &AgentState, &mut Perception)>,
    positions: Query<&Transform>,
    parents: Query<&ChildOf>,
    rapier: ReadRapierContext,
) {
    let Ok(context) = rapier.single() else {
        logger::log_error("update_perception_rapier: RapierContext не найден");
        return;
    };
    let los = RapierLineOfSight(context);

    for (entity, transform, archetype, target, state, mut perception) in agents.iter_mut() {
        if state.is_dead() {
            continue;
        }

        let next = sense(
            entity,
            transform,
            &archetype.perception,
            target.get(),
            &positions,
            &parents,
            &los,
        );
        perception.set_if_neq(next);
    }
}

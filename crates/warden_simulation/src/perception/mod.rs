//! Perception — range / field-of-view / occlusion test
//!
//! `can_see` — чистая функция от состояния мира: одинаковый вход → одинаковый
//! результат, без side effects. Raycast делегируется коллаборатору через
//! trait `LineOfSight` (headless `Occluders` или rapier backend).

use bevy::prelude::*;

use crate::ai::{AgentState, AgentTarget};
use crate::profile::{AgentArchetype, PerceptionConfig};

pub mod occluders;
#[cfg(feature = "rapier")]
pub mod rapier;

#[cfg(test)]
mod perception_tests;

pub use occluders::{Occluder, Occluders};

/// Collision-query collaborator.
pub trait LineOfSight {
    /// First collider hit on the segment `origin → end`, skipping `ignore`.
    ///
    /// `None` means nothing was hit (clear line).
    fn first_hit(&self, origin: Vec3, end: Vec3, ignore: Entity) -> Option<Entity>;
}

/// Observer pose used by the visibility test.
#[derive(Debug, Clone, Copy)]
pub struct Viewpoint {
    pub entity: Entity,
    pub position: Vec3,
    pub forward: Vec3,
}

/// Resolved target as seen this tick.
#[derive(Debug, Clone, Copy)]
pub struct TargetSighting {
    pub entity: Entity,
    pub position: Vec3,
}

/// Can `observer` see `target`?
///
/// Fails closed: a missing target, a target beyond `chase_range`, outside
/// the horizontal cone, or behind an obstruction all yield `false`.
/// `is_part_of_target` answers whether a hit collider belongs to the target
/// (the target itself or one of its descendants).
pub fn can_see(
    observer: &Viewpoint,
    target: Option<&TargetSighting>,
    config: &PerceptionConfig,
    los: &dyn LineOfSight,
    is_part_of_target: impl Fn(Entity) -> bool,
) -> bool {
    let Some(target) = target else {
        return false;
    };

    let to_target = target.position - observer.position;
    if to_target.length() > config.chase_range {
        return false;
    }

    if !within_field_of_view(observer.forward, to_target, config) {
        return false;
    }

    if !config.occlusion_test_enabled {
        return true;
    }

    // Луч на уровне глаз: eye → target (та же высота над origin цели)
    let eye_offset = Vec3::Y * config.eye_height_offset;
    let eye = observer.position + eye_offset;
    let aim = target.position + eye_offset;

    match los.first_hit(eye, aim, observer.entity) {
        None => true,
        Some(hit) => hit == target.entity || is_part_of_target(hit),
    }
}

/// Horizontal angle test. 360° cones and degenerate (vertical) directions pass.
pub fn within_field_of_view(forward: Vec3, to_target: Vec3, config: &PerceptionConfig) -> bool {
    if config.field_of_view_degrees >= 360.0 {
        return true;
    }

    let flat_forward = Vec2::new(forward.x, forward.z);
    let flat_to_target = Vec2::new(to_target.x, to_target.z);
    if flat_to_target.length_squared() < 1e-8 || flat_forward.length_squared() < 1e-8 {
        return true;
    }

    let angle = flat_forward.angle_to(flat_to_target).abs();
    angle <= config.half_fov_radians() + 1e-5
}

/// `true` if `hit` is `target` or sits below it in the `ChildOf` hierarchy.
pub fn is_descendant_of(hit: Entity, target: Entity, parents: &Query<&ChildOf>) -> bool {
    // Глубина иерархии у акторов маленькая; лимит защищает от циклов
    const MAX_DEPTH: usize = 32;

    let mut current = hit;
    for _ in 0..MAX_DEPTH {
        if current == target {
            return true;
        }
        match parents.get(current) {
            Ok(child_of) => current = child_of.parent(),
            Err(_) => return false,
        }
    }
    false
}

/// Per-agent perception result, refreshed every tick.
///
/// Пустой (default) когда target не задан или невалиден.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Perception {
    pub target_visible: bool,
    pub target_distance: Option<f32>,
    pub target_position: Option<Vec3>,
}

/// Evaluate one agent against its current target.
pub fn sense(
    entity: Entity,
    transform: &Transform,
    config: &PerceptionConfig,
    target: Option<Entity>,
    positions: &Query<&Transform>,
    parents: &Query<&ChildOf>,
    los: &dyn LineOfSight,
) -> Perception {
    let Some(sighting) = target.and_then(|target| {
        positions.get(target).ok().map(|t| TargetSighting {
            entity: target,
            position: t.translation,
        })
    }) else {
        return Perception::default();
    };

    let viewpoint = Viewpoint {
        entity,
        position: transform.translation,
        forward: *transform.forward(),
    };

    let visible = can_see(&viewpoint, Some(&sighting), config, los, |hit| {
        is_descendant_of(hit, sighting.entity, parents)
    });

    Perception {
        target_visible: visible,
        target_distance: Some(transform.translation.distance(sighting.position)),
        target_position: Some(sighting.position),
    }
}

/// Система: perception с headless Occluders
pub fn update_perception(
    mut agents: Query<(Entity, &Transform, &AgentArchetype, &AgentTarget, &AgentState, &mut Perception)>,
    positions: Query<&Transform>,
    parents: Query<&ChildOf>,
    occluders: Res<Occluders>,
) {
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
            &*occluders,
        );
        perception.set_if_neq(next);
    }
}

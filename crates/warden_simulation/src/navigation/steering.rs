//! Yaw-only orientation helpers and the direct-line fallback step.
//!
//! Forward = Bevy `-Z`. Yaw θ maps forward to `(-sin θ, 0, -cos θ)`.

use bevy::prelude::*;
use std::f32::consts::{PI, TAU};

/// Yaw that points forward along `direction` (XZ plane).
///
/// `None` when the horizontal part is degenerate (target straight above/below).
pub fn yaw_towards(direction: Vec3) -> Option<f32> {
    let flat = Vec2::new(direction.x, direction.z);
    if flat.length_squared() < 1e-8 {
        return None;
    }
    Some(f32::atan2(-direction.x, -direction.z))
}

/// Current yaw of a rotation, read from its forward vector.
pub fn yaw_of(rotation: Quat) -> f32 {
    let forward = rotation * Vec3::NEG_Z;
    yaw_towards(forward).unwrap_or(0.0)
}

/// Wrap an angle into `[-PI, PI)`.
pub fn wrap_angle(angle: f32) -> f32 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// Rotate toward `direction` by at most `max_radians`.
pub fn turn_towards(rotation: Quat, direction: Vec3, max_radians: f32) -> Quat {
    let Some(desired) = yaw_towards(direction) else {
        return rotation;
    };
    let current = yaw_of(rotation);
    let diff = wrap_angle(desired - current);
    let applied = diff.clamp(-max_radians, max_radians);
    Quat::from_rotation_y(current + applied)
}

/// Snap to face `direction` (windup lock, direct-line travel).
pub fn face_towards(rotation: Quat, direction: Vec3) -> Quat {
    turn_towards(rotation, direction, f32::INFINITY)
}

/// Move `position` toward `destination` by at most `max_distance`.
pub fn step_towards(position: Vec3, destination: Vec3, max_distance: f32) -> Vec3 {
    let offset = destination - position;
    let distance = offset.length();
    if distance <= max_distance || distance <= f32::EPSILON {
        destination
    } else {
        position + offset / distance * max_distance
    }
}

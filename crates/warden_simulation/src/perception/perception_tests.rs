use super::*;
use crate::perception::{Occluder, Occluders};

fn config() -> PerceptionConfig {
    PerceptionConfig {
        detection_range: 15.0,
        chase_range: 20.0,
        field_of_view_degrees: 120.0,
        eye_height_offset: 1.6,
        occlusion_test_enabled: true,
    }
}

/// Агент в origin, смотрит в +X
fn observer() -> Viewpoint {
    Viewpoint {
        entity: Entity::from_raw(1),
        position: Vec3::ZERO,
        forward: Vec3::X,
    }
}

fn target_at(position: Vec3) -> TargetSighting {
    TargetSighting {
        entity: Entity::from_raw(2),
        position,
    }
}

fn not_part(_: Entity) -> bool {
    false
}

#[test]
fn test_target_ahead_in_range_is_visible() {
    let target = target_at(Vec3::new(5.0, 0.0, 0.0));
    assert!(can_see(&observer(), Some(&target), &config(), &Occluders::default(), not_part));
}

#[test]
fn test_target_behind_is_not_visible() {
    let target = target_at(Vec3::new(-5.0, 0.0, 0.0));
    assert!(!can_see(&observer(), Some(&target), &config(), &Occluders::default(), not_part));
}

#[test]
fn test_fov_edges() {
    // Half-angle 60°: 59° видно, 61° нет
    let inside = Vec3::new(59f32.to_radians().cos(), 0.0, 59f32.to_radians().sin()) * 5.0;
    let outside = Vec3::new(61f32.to_radians().cos(), 0.0, 61f32.to_radians().sin()) * 5.0;

    assert!(within_field_of_view(Vec3::X, inside, &config()));
    assert!(!within_field_of_view(Vec3::X, outside, &config()));
}

#[test]
fn test_full_circle_fov_sees_behind() {
    let mut config = config();
    config.field_of_view_degrees = 360.0;
    let target = target_at(Vec3::new(-5.0, 0.0, 0.0));
    assert!(can_see(&observer(), Some(&target), &config, &Occluders::default(), not_part));
}

#[test]
fn test_beyond_chase_range_is_not_visible() {
    let target = target_at(Vec3::new(20.5, 0.0, 0.0));
    assert!(!can_see(&observer(), Some(&target), &config(), &Occluders::default(), not_part));

    let edge = target_at(Vec3::new(20.0, 0.0, 0.0));
    assert!(can_see(&observer(), Some(&edge), &config(), &Occluders::default(), not_part));
}

#[test]
fn test_missing_target_is_not_visible() {
    assert!(!can_see(&observer(), None, &config(), &Occluders::default(), not_part));
}

#[test]
fn test_wall_blocks_sight() {
    let wall = Occluder::new(Entity::from_raw(10), Vec3::new(2.5, 1.0, 0.0), Vec3::new(0.2, 2.0, 2.0));
    let occluders = Occluders::default().with(wall);
    let target = target_at(Vec3::new(5.0, 0.0, 0.0));

    assert!(!can_see(&observer(), Some(&target), &config(), &occluders, not_part));
}

#[test]
fn test_low_wall_under_eye_line_does_not_block() {
    // Стенка до y=1.0, луч идёт на высоте 1.6
    let wall = Occluder::new(Entity::from_raw(10), Vec3::new(2.5, 0.5, 0.0), Vec3::new(0.2, 0.5, 2.0));
    let occluders = Occluders::default().with(wall);
    let target = target_at(Vec3::new(5.0, 0.0, 0.0));

    assert!(can_see(&observer(), Some(&target), &config(), &occluders, not_part));
}

#[test]
fn test_occlusion_disabled_ignores_walls() {
    let mut config = config();
    config.occlusion_test_enabled = false;
    let wall = Occluder::new(Entity::from_raw(10), Vec3::new(2.5, 1.0, 0.0), Vec3::new(0.2, 2.0, 2.0));
    let occluders = Occluders::default().with(wall);
    let target = target_at(Vec3::new(5.0, 0.0, 0.0));

    assert!(can_see(&observer(), Some(&target), &config, &occluders, not_part));
}

#[test]
fn test_hit_on_target_body_counts_as_seen() {
    // Коллайдер самой цели
    let body = Occluder::new(Entity::from_raw(2), Vec3::new(5.0, 1.0, 0.0), Vec3::new(0.4, 1.0, 0.4));
    let occluders = Occluders::default().with(body);
    let target = target_at(Vec3::new(5.0, 0.0, 0.0));
    assert!(can_see(&observer(), Some(&target), &config(), &occluders, not_part));

    // Коллайдер дочернего entity цели
    let child = Entity::from_raw(3);
    let limb = Occluder::new(child, Vec3::new(4.8, 1.0, 0.0), Vec3::new(0.2, 1.0, 0.4));
    let occluders = Occluders::default().with(limb);
    assert!(can_see(&observer(), Some(&target), &config(), &occluders, |hit| hit == child));
    assert!(!can_see(&observer(), Some(&target), &config(), &occluders, not_part));
}

#[test]
fn test_can_see_is_pure() {
    let target = target_at(Vec3::new(5.0, 0.0, 3.0));
    let occluders = Occluders::default();
    let first = can_see(&observer(), Some(&target), &config(), &occluders, not_part);
    for _ in 0..10 {
        assert_eq!(can_see(&observer(), Some(&target), &config(), &occluders, not_part), first);
    }
}

#[test]
fn test_sense_through_world() {
    let mut world = World::new();
    let agent = world
        .spawn(Transform::from_xyz(0.0, 0.0, 0.0).looking_to(Vec3::X, Vec3::Y))
        .id();
    let target = world.spawn(Transform::from_xyz(5.0, 0.0, 0.0)).id();
    let gone = world.spawn(Transform::default()).id();
    world.despawn(gone);

    let mut state: bevy::ecs::system::SystemState<(Query<&Transform>, Query<&ChildOf>)> =
        bevy::ecs::system::SystemState::new(&mut world);
    let (positions, parents) = state.get(&world);
    let transform = *positions.get(agent).unwrap();
    let occluders = Occluders::default();

    let seen = sense(agent, &transform, &config(), Some(target), &positions, &parents, &occluders);
    assert!(seen.target_visible);
    assert_eq!(seen.target_distance, Some(5.0));

    let lost = sense(agent, &transform, &config(), Some(gone), &positions, &parents, &occluders);
    assert_eq!(lost, Perception::default());

    let none = sense(agent, &transform, &config(), None, &positions, &parents, &occluders);
    assert_eq!(none, Perception::default());
}

#[test]
fn test_descendant_lookup() {
    let mut world = World::new();
    let root = world.spawn_empty().id();
    let child = world.spawn(ChildOf(root)).id();
    let grandchild = world.spawn(ChildOf(child)).id();
    let stranger = world.spawn_empty().id();

    let mut state: bevy::ecs::system::SystemState<Query<&ChildOf>> =
        bevy::ecs::system::SystemState::new(&mut world);
    let parents = state.get(&world);

    assert!(is_descendant_of(grandchild, root, &parents));
    assert!(is_descendant_of(root, root, &parents));
    assert!(!is_descendant_of(stranger, root, &parents));
}

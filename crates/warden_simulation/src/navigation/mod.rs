//! Navigation adapter — thin seam to the external pathfinding service
//!
//! Контроллер НЕ ищет пути. Он только:
//! - запрашивает destination / stop
//! - читает обратно has_valid_path и velocity
//! - при провале пути на Return двигается по прямой (см. `steering::step_towards`)
//!
//! `HeadlessNavigationPlugin` — дефолтный коллаборатор для тестов и headless
//! бинарника: прямолинейное движение внутри `WalkableArea`.

use bevy::prelude::*;

use crate::components::{MovementCommand, MovementSpeed, NavigationState};

pub mod steering;

/// Contract consumed from the navigation service.
pub trait NavigationAdapter {
    /// Advisory: the service plans and executes the movement.
    fn request_destination(&mut self, destination: Vec3);

    /// `false` when the last requested destination is unreachable.
    fn has_valid_path(&self) -> bool;

    fn current_velocity(&self) -> Vec3;

    fn stop(&mut self);
}

/// Component-backed adapter: writes `MovementCommand`, reads `NavigationState`.
///
/// Команда пишется только если изменилась, иначе `Changed<MovementCommand>`
/// у навигационного слоя срабатывает каждый тик.
pub struct NavHandle<'a> {
    command: Mut<'a, MovementCommand>,
    state: &'a NavigationState,
}

impl<'a> NavHandle<'a> {
    pub fn new(command: Mut<'a, MovementCommand>, state: &'a NavigationState) -> Self {
        Self { command, state }
    }
}

impl NavigationAdapter for NavHandle<'_> {
    fn request_destination(&mut self, destination: Vec3) {
        self.command
            .set_if_neq(MovementCommand::MoveToPosition { target: destination });
    }

    fn has_valid_path(&self) -> bool {
        self.state.has_valid_path
    }

    fn current_velocity(&self) -> Vec3 {
        self.state.velocity
    }

    fn stop(&mut self) {
        self.command.set_if_neq(MovementCommand::Stop);
    }
}

/// Region the headless navigator can reach (XZ plane).
///
/// Destinations outside report `has_valid_path = false`.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct WalkableArea {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for WalkableArea {
    fn default() -> Self {
        Self {
            min: Vec2::splat(f32::NEG_INFINITY),
            max: Vec2::splat(f32::INFINITY),
        }
    }
}

impl WalkableArea {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.z >= self.min.y && point.z <= self.max.y
    }
}

/// Дистанция на которой headless навигатор считает цель достигнутой
pub const NAV_STOP_DISTANCE: f32 = 0.05;

/// Headless navigation service (straight-line, no obstacles)
pub struct HeadlessNavigationPlugin;

impl Plugin for HeadlessNavigationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WalkableArea>().add_systems(
            FixedUpdate,
            drive_headless_navigation.after(crate::ai::AgentSystems::Act),
        );
    }
}

/// Система: исполнение MovementCommand без движка
///
/// Двигает Transform по прямой в плоскости XZ со скоростью MovementSpeed.
/// Ориентацию не трогает — поворотом управляет контроллер.
pub fn drive_headless_navigation(
    mut query: Query<(&mut Transform, &MovementCommand, &mut NavigationState, &MovementSpeed)>,
    area: Res<WalkableArea>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut transform, command, mut nav_state, speed) in query.iter_mut() {
        let next = match *command {
            MovementCommand::MoveToPosition { target } if !area.contains(target) => NavigationState {
                has_valid_path: false,
                velocity: Vec3::ZERO,
                is_target_reached: false,
            },
            MovementCommand::MoveToPosition { target } => {
                let mut to_target = target - transform.translation;
                to_target.y = 0.0;
                let distance = to_target.length();

                if distance <= NAV_STOP_DISTANCE || delta <= 0.0 {
                    NavigationState {
                        has_valid_path: true,
                        velocity: Vec3::ZERO,
                        is_target_reached: distance <= NAV_STOP_DISTANCE,
                    }
                } else {
                    let step = (speed.speed * delta).min(distance);
                    let movement = to_target / distance * step;
                    transform.translation += movement;
                    NavigationState {
                        has_valid_path: true,
                        velocity: movement / delta,
                        is_target_reached: distance - step <= NAV_STOP_DISTANCE,
                    }
                }
            }
            MovementCommand::Idle | MovementCommand::Stop => NavigationState {
                has_valid_path: true,
                velocity: Vec3::ZERO,
                is_target_reached: false,
            },
        };

        nav_state.set_if_neq(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walkable_area_default_unbounded() {
        let area = WalkableArea::default();
        assert!(area.contains(Vec3::new(1.0e6, 0.0, -1.0e6)));
    }

    #[test]
    fn test_walkable_area_bounds_xz_only() {
        let area = WalkableArea::new(Vec2::new(-10.0, -10.0), Vec2::new(10.0, 10.0));
        assert!(area.contains(Vec3::new(5.0, 100.0, -5.0)));
        assert!(!area.contains(Vec3::new(11.0, 0.0, 0.0)));
        assert!(!area.contains(Vec3::new(0.0, 0.0, -10.5)));
    }
}

//! Movement компоненты: граница между контроллером и навигацией
//!
//! Архитектура:
//! - контроллер пишет `MovementCommand` (high-level intent)
//! - навигационный слой (headless или хост-движок) читает команду,
//!   двигает актора и пишет результат в `NavigationState`

use bevy::prelude::*;

/// Команда движения для актора (выполняется навигационным слоем)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Ничего не запрошено
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Остановиться немедленно (сбросить velocity)
    Stop,
}

/// Feedback from the navigation layer for the last command.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct NavigationState {
    /// `false` when the last destination is unreachable
    pub has_valid_path: bool,
    /// Current velocity (drives presentation speed parameters)
    pub velocity: Vec3,
    /// Destination reached for the current `MoveToPosition`
    pub is_target_reached: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self {
            has_valid_path: true,
            velocity: Vec3::ZERO,
            is_target_reached: false,
        }
    }
}

/// Скорость движения актора (метры/сек)
#[derive(Component, Clone, Copy, Debug, Reflect)]
#[reflect(Component)]
pub struct MovementSpeed {
    pub speed: f32,
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self { speed: 3.5 }
    }
}

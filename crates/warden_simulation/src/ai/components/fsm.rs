//! FSM AI components (state, target, origin anchor).

use bevy::prelude::*;

use crate::components::{Health, MovementCommand, MovementSpeed, NavigationState};
use crate::perception::Perception;

/// Behavior state of a hostile agent.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AgentState {
    /// Стоим, ждём цель или маршрут
    #[default]
    Idle,
    /// Обход маршрута с паузами на точках
    Patrol,
    /// Преследование видимой цели
    Chase,
    /// Цель в радиусе атаки: стоим, доворачиваемся, бьём
    Attack,
    /// Возврат к origin после потери цели
    Return,
    /// Terminal: ни запросов, ни переходов
    Dead,
}

impl AgentState {
    pub fn is_dead(&self) -> bool {
        matches!(self, AgentState::Dead)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentState::Idle => "Idle",
            AgentState::Patrol => "Patrol",
            AgentState::Chase => "Chase",
            AgentState::Attack => "Attack",
            AgentState::Return => "Return",
            AgentState::Dead => "Dead",
        }
    }
}

/// Hostile agent under controller.
///
/// `origin` захватывается один раз при спавне и якорит Return.
/// Остальные компоненты агента подтягиваются через Required Components.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
#[require(
    AgentState,
    AgentTarget,
    Perception,
    Locomotion,
    MovementCommand,
    NavigationState,
    MovementSpeed,
    Health
)]
pub struct HostileAgent {
    pub origin: Vec3,
}

/// Weak reference to the current target (lookup only, no ownership).
///
/// Цель может исчезнуть в любой момент: каждый тик `resolve_targets`
/// либо подтверждает её, либо сбрасывает.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct AgentTarget(Option<Entity>);

impl AgentTarget {
    pub fn new(target: Entity) -> Self {
        Self(Some(target))
    }

    pub fn get(&self) -> Option<Entity> {
        self.0
    }

    pub fn set(&mut self, target: Entity) {
        self.0 = Some(target);
    }

    pub fn clear(&mut self) {
        self.0 = None;
    }
}

/// Observable motion for presentation (speed parameters).
///
/// Навигационная velocity, либо velocity прямолинейного fallback на Return.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub velocity: Vec3,
}

//! Warden Simulation Core
//!
//! Контроллер враждебных агентов на Bevy 0.16 ECS (headless, детерминированный)
//!
//! Агент = entity с `HostileAgent` + `AgentArchetype`:
//! - FSM: Idle / Patrol / Chase / Attack / Return / Dead
//! - perception: дальность + горизонтальный FOV + occlusion raycast
//! - combat: неблокирующий таймер windup → strike → cooldown
//! - patrol: циклический маршрут с паузами
//! - navigation: только запросы к внешнему сервису, прямой fallback на Return
//!
//! Коллабораторы (навигация, raycast, здоровье цели) — за trait'ами
//! `NavigationAdapter`, `LineOfSight`, `Damageable`.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod logger;
pub mod navigation;
pub mod patrol;
pub mod perception;
pub mod profile;
pub mod spawn;

// Re-export основных типов для удобства
pub use ai::{AIPlugin, AgentDied, AgentState, AgentStateChanged, AgentSystems, AgentTarget, HostileAgent, Locomotion};
pub use combat::{AttackPhaseChanged, AttackPhaseKind, AttackTimer, CombatPlugin, DamageDealt};
pub use components::*;
pub use logger::init_logger;
pub use navigation::{HeadlessNavigationPlugin, NavigationAdapter, WalkableArea};
pub use patrol::{PatrolProgress, PatrolRoute};
pub use perception::{can_see, LineOfSight, Occluder, Occluders, Perception};
pub use profile::{AgentArchetype, AgentProfile, CombatProfile, ConfigError, MovementProfile, PerceptionConfig};
pub use spawn::{spawn_hostile_agent, DespawnAfter, HostileSpawn, Population, SpawnPlugin};

/// Частота симуляции (FixedUpdate)
pub const SIMULATION_HZ: f64 = 60.0;

/// Допуск сравнения таймеров: накопленная ошибка f32 не должна
/// откладывать удар/паузу на лишний тик.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Навигацию не добавляет: хост подключает свою, headless —
/// `HeadlessNavigationPlugin`.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            // Подсистемы
            .add_plugins((AIPlugin, CombatPlugin, SpawnPlugin));

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Длительность одного фиксированного тика
pub fn tick_duration() -> Duration {
    Duration::from_secs_f64(1.0 / SIMULATION_HZ)
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время ручное: каждый `app.update()` = ровно один фиксированный тик,
/// независимо от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick_duration()));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

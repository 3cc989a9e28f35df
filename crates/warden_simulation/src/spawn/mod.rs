//! Spawning hostile agents, population accounting, corpse cleanup.

use bevy::prelude::*;
use rand::Rng;
use std::sync::Arc;

use crate::ai::{AgentDied, AgentState, AgentSystems, HostileAgent};
use crate::components::{Health, MovementSpeed};
use crate::logger;
use crate::navigation::steering::face_towards;
use crate::patrol::{PatrolProgress, PatrolRoute};
use crate::profile::{AgentArchetype, ConfigError};

/// Everything needed to place one agent in the world.
#[derive(Debug, Clone)]
pub struct HostileSpawn {
    pub position: Vec3,
    /// Initial facing direction (XZ); `None` keeps the default `-Z`
    pub facing: Option<Vec3>,
    pub archetype: AgentArchetype,
    pub route: Option<Arc<PatrolRoute>>,
    pub health: u32,
}

impl HostileSpawn {
    pub fn new(position: Vec3, archetype: AgentArchetype) -> Self {
        Self {
            position,
            facing: None,
            archetype,
            route: None,
            health: 100,
        }
    }

    pub fn facing(mut self, direction: Vec3) -> Self {
        self.facing = Some(direction);
        self
    }

    pub fn with_route(mut self, route: Arc<PatrolRoute>) -> Self {
        self.route = Some(route);
        self
    }

    /// Random wander route around the spawn position.
    pub fn with_wander(
        mut self,
        radius: f32,
        count: usize,
        dwell_seconds: f32,
        rng: &mut impl Rng,
    ) -> Result<Self, ConfigError> {
        let route = PatrolRoute::scatter(self.position, radius, count, dwell_seconds, rng)?;
        self.route = Some(Arc::new(route));
        Ok(self)
    }

    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }
}

/// Spawn a controlled agent. `origin` is captured here, once.
pub fn spawn_hostile_agent(commands: &mut Commands, spawn: HostileSpawn) -> Entity {
    let mut transform = Transform::from_translation(spawn.position);
    if let Some(direction) = spawn.facing {
        transform.rotation = face_towards(transform.rotation, direction);
    }

    let speed = spawn.archetype.movement.move_speed;
    let mut entity = commands.spawn((
        transform,
        HostileAgent {
            origin: spawn.position,
        },
        Health::new(spawn.health),
        MovementSpeed { speed },
        spawn.archetype,
    ));

    if let Some(route) = spawn.route {
        entity.insert(PatrolProgress::new(route));
    }

    let id = entity.id();
    logger::log_info(&format!("🧟 Spawned hostile agent {:?} at {:?}", id, spawn.position));
    id
}

/// Счётчики популяции агентов
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Population {
    /// Агенты не в Dead (трупы до деспавна не считаются)
    pub alive: u32,
    pub killed: u32,
}

/// Компонент: деспавн по таймауту (трупы)
#[derive(Component, Debug, Clone, Copy)]
pub struct DespawnAfter {
    /// Время деспавна (в секундах fixed-часов)
    pub despawn_time: f32,
}

/// Система: пересчёт Population
pub fn track_population(
    agents: Query<&AgentState, With<HostileAgent>>,
    mut deaths: EventReader<AgentDied>,
    mut population: ResMut<Population>,
) {
    let alive = agents.iter().filter(|state| !state.is_dead()).count() as u32;
    let killed = population.killed + deaths.read().count() as u32;

    population.set_if_neq(Population { alive, killed });
}

/// Система: деспавн сущностей с истёкшим DespawnAfter
pub fn despawn_after_timeout(
    mut commands: Commands,
    query: Query<(Entity, &DespawnAfter)>,
    time: Res<Time<Fixed>>,
) {
    let current_time = time.elapsed_secs();

    for (entity, despawn_after) in query.iter() {
        if current_time >= despawn_after.despawn_time {
            logger::log(&format!("⚰️ Despawning entity {:?} (timeout)", entity));
            commands.entity(entity).despawn();
        }
    }
}

/// Population + corpse cleanup (в `AgentSystems::Cleanup`)
pub struct SpawnPlugin;

impl Plugin for SpawnPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Population>().add_systems(
            FixedUpdate,
            (track_population, despawn_after_timeout)
                .chain()
                .in_set(AgentSystems::Cleanup),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AgentProfile;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn archetype() -> AgentArchetype {
        AgentProfile::default().into_archetype().unwrap()
    }

    #[test]
    fn test_spawn_inserts_controller_components() {
        let mut world = World::new();
        let route = Arc::new(PatrolRoute::new(vec![Vec3::ZERO, Vec3::X * 5.0], 1.0).unwrap());
        let spawn = HostileSpawn::new(Vec3::new(2.0, 0.0, 3.0), archetype())
            .facing(Vec3::X)
            .with_route(route)
            .with_health(40);

        let entity = {
            let mut commands = world.commands();
            spawn_hostile_agent(&mut commands, spawn)
        };
        world.flush();

        let agent = world.entity(entity);
        assert_eq!(agent.get::<HostileAgent>().map(|a| a.origin), Some(Vec3::new(2.0, 0.0, 3.0)));
        assert_eq!(agent.get::<AgentState>(), Some(&AgentState::Idle));
        assert_eq!(agent.get::<Health>().map(|h| h.current), Some(40));
        assert!(agent.get::<PatrolProgress>().is_some_and(|p| p.has_route()));

        let forward = agent.get::<Transform>().map(|t| *t.forward()).unwrap();
        assert!((forward - Vec3::X).length() < 1e-4);
    }

    #[test]
    fn test_wander_route_centered_on_spawn() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let spawn = HostileSpawn::new(Vec3::new(10.0, 0.0, 10.0), archetype())
            .with_wander(4.0, 5, 0.5, &mut rng)
            .unwrap();

        let route = spawn.route.unwrap();
        assert_eq!(route.len(), 5);
        assert!(route
            .waypoints()
            .iter()
            .all(|w| w.distance(Vec3::new(10.0, 0.0, 10.0)) <= 4.0 + 1e-4));
    }
}

//! Headless симуляция Warden
//!
//! Один стражник патрулирует, игрок-мишень подходит, стражник его
//! замечает, догоняет и атакует. Печатаем переходы FSM и урон.

use bevy::prelude::*;
use std::sync::Arc;

use warden_simulation::{
    create_headless_app, logger, spawn_hostile_agent, AgentProfile, AgentState, AgentStateChanged, DamageDealt,
    HeadlessNavigationPlugin, Health, HostileSpawn, PatrolRoute, SimulationPlugin, Targetable, WalkableArea,
};

/// Игрок медленно идёт к стражнику по оси X
#[derive(Component)]
struct Walker {
    velocity: Vec3,
}

fn walk(mut walkers: Query<(&mut Transform, &Walker)>, time: Res<Time<Fixed>>) {
    for (mut transform, walker) in walkers.iter_mut() {
        transform.translation += walker.velocity * time.delta_secs();
    }
}

fn report(mut transitions: EventReader<AgentStateChanged>, mut damage: EventReader<DamageDealt>) {
    for event in transitions.read() {
        println!("  {:?}: {:?} → {:?}", event.entity, event.from, event.to);
    }
    for event in damage.read() {
        println!(
            "  {:?} hit {:?} for {} (died: {})",
            event.attacker, event.target, event.damage, event.target_died
        );
    }
}

fn main() {
    let seed = 42;
    println!("Starting Warden headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    logger::set_log_level(logger::LogLevel::Info);
    app.add_plugins((SimulationPlugin, HeadlessNavigationPlugin))
        .insert_resource(WalkableArea::new(Vec2::splat(-50.0), Vec2::splat(50.0)))
        .add_systems(FixedUpdate, walk.before(warden_simulation::AgentSystems::Combat))
        .add_systems(FixedUpdate, report.after(warden_simulation::AgentSystems::Cleanup));

    let archetype = match AgentProfile::default().into_archetype() {
        Ok(archetype) => archetype,
        Err(err) => {
            eprintln!("Invalid agent profile: {err}");
            return;
        }
    };

    let route = match PatrolRoute::new(
        vec![Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, -5.0), Vec3::new(5.0, 0.0, 5.0)],
        1.0,
    ) {
        Ok(route) => Arc::new(route),
        Err(err) => {
            eprintln!("Invalid patrol route: {err}");
            return;
        }
    };

    {
        let mut commands = app.world_mut().commands();
        spawn_hostile_agent(
            &mut commands,
            HostileSpawn::new(Vec3::new(-5.0, 0.0, -5.0), archetype).with_route(route),
        );
        commands.spawn((
            Transform::from_xyz(40.0, 0.0, 0.0),
            Health::new(50),
            Targetable,
            Walker {
                velocity: Vec3::new(-2.0, 0.0, 0.0),
            },
        ));
    }
    app.world_mut().flush();

    // Запускаем 1200 тиков симуляции (20 секунд)
    for tick in 0..1200 {
        app.update();

        if tick % 120 == 0 {
            let mut agents = app.world_mut().query::<(Entity, &AgentState, &Transform)>();
            for (entity, state, transform) in agents.iter(app.world()) {
                println!(
                    "Tick {}: {:?} {:?} at ({:.1}, {:.1})",
                    tick, entity, state, transform.translation.x, transform.translation.z
                );
            }
        }
    }

    println!("Simulation complete!");
}

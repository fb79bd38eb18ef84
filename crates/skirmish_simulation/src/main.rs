//! Headless skirmish demo
//!
//! Арена 40×40, игрок стоит на месте, три агента: патрульный по маршруту,
//! melee с damage points и ranged. Печатает поведение агентов и здоровье
//! игрока раз в секунду симуляции.

use bevy::prelude::*;
use skirmish_simulation::ai::BehaviorPhase;
use skirmish_simulation::spatial::{LAYER_ENVIRONMENT, LAYER_GROUND};
use skirmish_simulation::{
    create_headless_app, init_logger, log, log_error, spawn_block, spawn_player, spawn_roster,
    Agent, Health, Perception, Player, Roster, SimulationPlugin, TICK_RATE_HZ,
};

const ROSTER: &str = r#"[
    {
        "position": [-8, 0, -8],
        "facing": [1, 0, 0],
        "config": {
            "patrol": { "fixed_route": { "points": [[-8, 0, -8], [8, 0, -8], [8, 0, 8], [-8, 0, 8]] } },
            "forget_timer": 3
        }
    },
    {
        "position": [6, 0, 0],
        "facing": [-1, 0, 0],
        "config": {
            "melee": { "punch_distance": 1.8, "damage_points": [{ "offset": [0, 0, -1], "radius": 0.7 }] }
        }
    },
    {
        "position": [0, 0, 14],
        "config": { "kind": "ranged", "vision_distance": 12, "damage": 5 }
    }
]"#;

fn main() {
    let seed = 42;
    init_logger();
    log(&format!("Starting skirmish headless simulation (seed: {})", seed));

    let roster = match Roster::from_json_str(ROSTER) {
        Ok(roster) => roster,
        Err(err) => {
            log_error(&format!("Invalid roster: {err}"));
            return;
        }
    };

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin::default());

    {
        let mut commands = app.world_mut().commands();

        // Пол + стены по периметру
        spawn_block(
            &mut commands,
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(20.0, 0.5, 20.0),
            LAYER_GROUND,
        );
        for (center, half_extents) in [
            (Vec3::new(0.0, 1.5, -20.5), Vec3::new(20.0, 1.5, 0.5)),
            (Vec3::new(0.0, 1.5, 20.5), Vec3::new(20.0, 1.5, 0.5)),
            (Vec3::new(-20.5, 1.5, 0.0), Vec3::new(0.5, 1.5, 20.0)),
            (Vec3::new(20.5, 1.5, 0.0), Vec3::new(0.5, 1.5, 20.0)),
        ] {
            spawn_block(&mut commands, center, half_extents, LAYER_ENVIRONMENT);
        }

        spawn_player(&mut commands, Vec3::new(2.0, 0.0, 0.0));
        spawn_roster(&mut commands, &roster);
    }
    app.world_mut().flush();

    // 20 секунд симуляции
    let ticks = TICK_RATE_HZ * 20;
    for tick in 0..ticks {
        app.update();

        if tick % TICK_RATE_HZ == 0 {
            report(&mut app, tick);
        }
    }

    log("Simulation complete!");
}

fn report(app: &mut App, tick: u32) {
    let world = app.world_mut();

    let player_health = world
        .query_filtered::<&Health, With<Player>>()
        .iter(world)
        .next()
        .map_or(0.0, |health| health.current);

    let mut agents: Vec<(Entity, BehaviorPhase)> = world
        .query_filtered::<(Entity, &Perception), With<Agent>>()
        .iter(world)
        .map(|(entity, perception)| (entity, perception.behavior().phase()))
        .collect();
    agents.sort_by_key(|(entity, _)| entity.index());

    log(&format!(
        "Tick {}: player hp {:.1}, agents {:?}",
        tick, player_health, agents
    ));
}

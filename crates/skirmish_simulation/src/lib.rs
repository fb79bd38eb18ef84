//! Skirmish Simulation Core
//!
//! ECS-симуляция боевых NPC на Bevy 0.16 (headless):
//! - PerceptionSensor: vision cone + proximity
//! - AgentBehaviorState: Patrol / Chase / Attack, выводится из Perception
//! - AlertChannel: announce позиции игрока соседям
//! - MeleeResolver: damage points, один хит за окно атаки
//!
//! Физика, навмеш, анимация и звук живут снаружи, связь через SpatialQuery
//! trait, MovementCommand и presentation events.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod cues;
pub mod error;
pub mod logger;
pub mod navigation;
pub mod spatial;

// Re-export базовых компонентов для удобства
pub use ai::{AIPlugin, AgentReady, Behavior, Dormant, Perception, VisionCone, WalkTarget};
pub use combat::{
    AttackCooldown, CombatPlugin, DamageDealt, DamageRequest, MeleeAttacker, ProjectileLaunch,
};
pub use components::*;
pub use config::{AgentConfig, PatrolConfig, Roster, RosterEntry};
pub use cues::{AnimationClips, AnimationCue, AudioCue};
pub use error::{AgentError, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, set_log_level, set_logger, LogLevel,
    LogPrinter,
};
pub use navigation::NavigationPlugin;
pub use spatial::{SpatialBackend, SpatialBody, SpatialQuery, SpatialSnapshot};

/// Частота simulation tick
pub const TICK_RATE_HZ: u32 = 60;

/// Seed по умолчанию, если хост не вставил свой DeterministicRng
pub const DEFAULT_SEED: u64 = 42;

/// Радиус тела агента для spatial queries
pub const AGENT_RADIUS: f32 = 0.5;

/// Радиус тела игрока для spatial queries
pub const PLAYER_RADIUS: f32 = 0.5;

/// Фазы одного simulation tick (FixedUpdate), строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Snapshot мира, доставка announce, lifecycle, cooldowns
    Sense,
    /// AgentBrain: perception → behavior → решения
    Decide,
    /// MeleeResolver, применение урона
    Resolve,
    /// Навигация
    Move,
}

/// Главный plugin симуляции (объединяет все подсистемы)
///
/// Fixed timestep задаёт хост (`create_headless_app`: 60Hz, ручной шаг).
#[derive(Default)]
pub struct SimulationPlugin {
    pub backend: SpatialBackend,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Детерминистичный RNG (seed по умолчанию, если хост не задал свой)
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(DEFAULT_SEED));
        }

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Sense,
                SimulationSet::Decide,
                SimulationSet::Resolve,
                SimulationSet::Move,
            )
                .chain(),
        )
        .add_plugins((
            AIPlugin {
                backend: self.backend,
            },
            CombatPlugin {
                backend: self.backend,
            },
            NavigationPlugin,
        ));
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

/// Создаёт minimal Bevy App для headless симуляции (60Hz)
///
/// Время шагает вручную: каждый `app.update()` (кроме первого, у него
/// delta = 0) = ровно один FixedUpdate тик.
pub fn create_headless_app(seed: u64) -> App {
    create_stepped_app(seed, Duration::from_nanos(1_000_000_000 / TICK_RATE_HZ as u64))
}

/// То же, что `create_headless_app`, но с произвольным шагом (тесты таймингов)
pub fn create_stepped_app(seed: u64, step: Duration) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_duration(step))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step));

    app
}

/// Spawn агента: Agent + config + все коллабораторы (sensor, navigation, тело)
pub fn spawn_agent(
    commands: &mut Commands,
    position: Vec3,
    facing: Vec3,
    config: AgentConfig,
) -> Entity {
    if let Err(err) = config.validate() {
        log_warning(&format!("Spawning agent at {position} with invalid config: {err}"));
    }

    let body = SpatialBody::sphere(AGENT_RADIUS, spatial::LAYER_AGENTS);

    let mut agent = commands.spawn((
        Transform::from_translation(position).looking_to(facing, Vec3::Y),
        Agent,
        VisionCone::from_config(&config),
        MovementCommand::Idle,
        MovementSpeed {
            speed: config.move_speed,
        },
        Locomotion::default(),
        body,
    ));

    if let Some(melee) = &config.melee {
        agent.insert(MeleeAttacker::from_config(melee));
    }
    #[cfg(feature = "rapier-backend")]
    agent.insert(spatial::rapier::collider_bundle(&body));

    agent.insert(config);
    agent.id()
}

/// Spawn игрока (цель всех агентов)
pub fn spawn_player(commands: &mut Commands, position: Vec3) -> Entity {
    let body = SpatialBody::sphere(PLAYER_RADIUS, spatial::LAYER_PLAYER);

    let player = commands
        .spawn((Transform::from_translation(position), Player, body))
        .id();
    #[cfg(feature = "rapier-backend")]
    commands
        .entity(player)
        .insert(spatial::rapier::collider_bundle(&body));

    player
}

/// Spawn статичного блока уровня (пол или стена, axis-aligned)
pub fn spawn_block(
    commands: &mut Commands,
    center: Vec3,
    half_extents: Vec3,
    layer: bevy_rapier3d::prelude::Group,
) -> Entity {
    let body = SpatialBody::cuboid(half_extents, layer);

    let block = commands.spawn((Transform::from_translation(center), body)).id();
    #[cfg(feature = "rapier-backend")]
    commands
        .entity(block)
        .insert(spatial::rapier::collider_bundle(&body));

    block
}

/// Spawn всех агентов уровня из Roster
pub fn spawn_roster(commands: &mut Commands, roster: &Roster) -> Vec<Entity> {
    roster
        .agents
        .iter()
        .map(|entry| {
            let facing = entry.facing.map(Vec3::from_array).unwrap_or(Vec3::NEG_Z);
            spawn_agent(
                commands,
                Vec3::from_array(entry.position),
                facing,
                entry.config.clone(),
            )
        })
        .collect()
}

/// Snapshot компонентов мира для сравнения детерминизма
///
/// Entity сортируются по index, компоненты печатаются через Debug.
pub fn world_snapshot<T: Component + std::fmt::Debug>(world: &mut World) -> String {
    let mut query = world.query::<(Entity, &T)>();
    let mut rows: Vec<_> = query.iter(world).collect();
    rows.sort_by_key(|(entity, _)| entity.index());

    rows.into_iter()
        .map(|(entity, component)| format!("{}: {:?}\n", entity.index(), component))
        .collect()
}

//! Тик агентов: AgentBrain для каждого готового агента + запись решений в мир.

use bevy::ecs::query::QueryData;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::alert::announce;
use crate::ai::brain::{AgentBrain, AttackOrder, PlayerTarget, Surroundings};
use crate::ai::components::{AlertInbox, Perception, VisionCone, WalkTarget};
use crate::ai::events::Announcement;
use crate::ai::systems::lifecycle::AgentReady;
use crate::combat::{AttackCooldown, DamageRequest, DamageSource, ProjectileLaunch};
use crate::components::{MovementCommand, Player};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::spatial::{SpatialQuery, SpatialSnapshot};
use crate::DeterministicRng;

/// Всё состояние агента, которое читает/пишет тик
#[derive(QueryData)]
#[query_data(mutable)]
pub struct AgentQuery {
    pub entity: Entity,
    pub transform: &'static Transform,
    pub config: &'static AgentConfig,
    pub vision: &'static VisionCone,
    pub perception: &'static mut Perception,
    pub inbox: &'static mut AlertInbox,
    pub walk: &'static mut WalkTarget,
    pub cooldown: &'static mut AttackCooldown,
    pub movement: &'static mut MovementCommand,
}

/// Выходы тика (announce + атаки)
#[derive(SystemParam)]
pub struct AgentOutput<'w> {
    announcements: EventWriter<'w, Announcement>,
    damage: EventWriter<'w, DamageRequest>,
    projectiles: EventWriter<'w, ProjectileLaunch>,
}

/// Общая логика тика для любого SpatialQuery backend
///
/// Агенты обходятся по entity index: порядок расхода RNG не зависит от
/// раскладки архетипов.
pub fn tick_agents_with(
    spatial: &dyn SpatialQuery,
    agents: &mut Query<AgentQuery, With<AgentReady>>,
    player: Option<PlayerTarget>,
    rng: &mut ChaCha8Rng,
    delta: f32,
    output: &mut AgentOutput,
) {
    let mut order: Vec<Entity> = agents.iter().map(|agent| agent.entity).collect();
    order.sort_by_key(|entity| entity.index());

    let mut surroundings = Surroundings {
        spatial,
        player,
        rng,
    };

    for entity in order {
        let Ok(mut agent) = agents.get_mut(entity) else {
            continue;
        };

        let outcome = {
            let mut brain = AgentBrain {
                entity,
                transform: agent.transform,
                config: agent.config,
                vision: agent.vision,
                perception: &mut agent.perception,
                inbox: &mut agent.inbox,
                walk: &mut agent.walk,
                cooldown: &mut agent.cooldown,
            };
            brain.tick(&mut surroundings, delta)
        };

        if let Some(command) = outcome.movement {
            if *agent.movement != command {
                *agent.movement = command;
            }
        }

        if let Some(player_position) = outcome.announce {
            let sent = announce(
                spatial,
                entity,
                agent.transform.translation,
                agent.config.announce_range,
                player_position,
            );
            if !sent.is_empty() {
                crate::log(&format!(
                    "📢 {:?} announced player at {:?} to {} agent(s)",
                    entity,
                    sent[0].position,
                    sent.len()
                ));
            }
            output.announcements.write_batch(sent);
        }

        match outcome.attack {
            Some(AttackOrder::Projectile { target, damage }) => {
                output.projectiles.write(ProjectileLaunch {
                    shooter: entity,
                    target,
                    origin: agent.transform.translation,
                    target_position: player.map_or(agent.transform.translation, |p| p.position),
                    damage,
                });
                crate::log(&format!("🏹 {:?} shoots at {:?}", entity, target));
            }
            Some(AttackOrder::Direct { target, damage }) => {
                output.damage.write(DamageRequest {
                    attacker: entity,
                    target,
                    amount: damage,
                    source: DamageSource::Direct,
                });
                crate::log(&format!("⚔️ {:?} attacks {:?}", entity, target));
            }
            None => {}
        }

        match outcome.error {
            Some(AgentError::StaleTarget) => {
                crate::log_warning(&format!("{:?}: player is gone, back to patrol", entity));
            }
            Some(err) => {
                crate::log(&format!("{:?}: {err}, skipping patrol this tick", entity));
            }
            None => {}
        }
    }
}

fn player_target(players: &Query<(Entity, &Transform), With<Player>>) -> Option<PlayerTarget> {
    players
        .single()
        .ok()
        .map(|(entity, transform)| PlayerTarget {
            entity,
            position: transform.translation,
        })
}

/// Система: тик агентов (headless SpatialSnapshot)
pub fn tick_agents(
    snapshot: Res<SpatialSnapshot>,
    mut agents: Query<AgentQuery, With<AgentReady>>,
    players: Query<(Entity, &Transform), With<Player>>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut output: AgentOutput,
) {
    tick_agents_with(
        &*snapshot,
        &mut agents,
        player_target(&players),
        &mut rng.rng,
        time.delta_secs(),
        &mut output,
    );
}

/// Система: тик агентов (rapier backend)
#[cfg(feature = "rapier-backend")]
pub fn tick_agents_rapier(
    context: bevy_rapier3d::prelude::ReadRapierContext,
    mut agents: Query<AgentQuery, With<AgentReady>>,
    players: Query<(Entity, &Transform), With<Player>>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut output: AgentOutput,
) {
    let Ok(context) = context.single() else {
        return;
    };
    let spatial = crate::spatial::RapierSpatialQuery::new(&context);

    tick_agents_with(
        &spatial,
        &mut agents,
        player_target(&players),
        &mut rng.rng,
        time.delta_secs(),
        &mut output,
    );
}

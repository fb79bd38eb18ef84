//! Agent lifecycle: агент тикает только когда все коллабораторы на месте.

use bevy::prelude::*;

use crate::ai::components::VisionCone;
use crate::components::{Agent, MovementCommand, Player};
use crate::error::{AgentError, Collaborator};

/// Агенту не хватает коллабораторов: не тикает, пока не появятся
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Dormant {
    pub missing: Vec<Collaborator>,
}

/// Все коллабораторы найдены, агент участвует в симуляции
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct AgentReady;

/// Система: Dormant ↔ AgentReady для ещё не готовых агентов
///
/// Готовность проверяется один раз. После AgentReady пропавший игрок
/// уже StaleTarget (обрабатывается в тике), а не MissingCollaborator.
pub fn check_agent_collaborators(
    mut commands: Commands,
    agents: Query<
        (Entity, Has<VisionCone>, Has<MovementCommand>, Option<&Dormant>),
        (With<Agent>, Without<AgentReady>),
    >,
    players: Query<(), With<Player>>,
) {
    let has_player = !players.is_empty();

    for (entity, has_sensor, has_navigation, dormant) in agents.iter() {
        let missing: Vec<Collaborator> = [
            (has_sensor, Collaborator::Sensor),
            (has_navigation, Collaborator::Navigation),
            (has_player, Collaborator::Player),
        ]
        .into_iter()
        .filter(|(present, _)| !present)
        .map(|(_, collaborator)| collaborator)
        .collect();

        if missing.is_empty() {
            commands.entity(entity).remove::<Dormant>().insert(AgentReady);
            crate::log_info(&format!("Agent {:?} ready", entity));
            continue;
        }

        // Логируем только изменения набора, не каждый тик
        if dormant.is_some_and(|dormant| dormant.missing == missing) {
            continue;
        }
        for &collaborator in &missing {
            let err = AgentError::MissingCollaborator {
                agent: entity,
                collaborator,
            };
            crate::log_warning(&format!("{err}, agent stays dormant"));
        }
        commands.entity(entity).insert(Dormant { missing });
    }
}

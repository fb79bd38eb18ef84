//! Ошибки агентов и конфигурации.
//!
//! Все ошибки локальны для одного агента: система логирует и деградирует
//! поведение (dormant / стоит / патрулирует), симуляция не падает.

use bevy::prelude::Entity;
use thiserror::Error;

/// Внешний коллаборатор, без которого агент не может тикать
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    /// VisionCone (PerceptionSensor)
    Sensor,
    /// MovementCommand (Navigation)
    Navigation,
    /// Player entity
    Player,
}

impl std::fmt::Display for Collaborator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Collaborator::Sensor => "vision sensor",
            Collaborator::Navigation => "navigation",
            Collaborator::Player => "player",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    /// Fixed-route patrol без точек
    EmptyPatrolRoute,
    /// Random patrol не нашёл землю за `attempts` попыток
    NoWalkableGround { attempts: u32 },
    /// Random patrol range отрицательный или не конечный
    InvalidPatrolRange,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AgentError {
    #[error("agent {agent:?} is missing its {collaborator}")]
    MissingCollaborator {
        agent: Entity,
        collaborator: Collaborator,
    },

    #[error("degenerate configuration: {0:?}")]
    DegenerateConfiguration(DegenerateReason),

    #[error("player reference is no longer valid")]
    StaleTarget,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse agent config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{field}` must not be negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("vision angle must be in (0, 360] degrees (got {0})")]
    VisionAngle(f32),

    #[error("fixed patrol route has no points")]
    EmptyPatrolRoute,

    #[error("random patrol range must be finite and non-negative (got {0})")]
    PatrolRange(f32),

    #[error("melee punch distance must be positive (got {0})")]
    PunchDistance(f32),
}

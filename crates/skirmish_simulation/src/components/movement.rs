//! Movement компоненты: команды навигации, скорость, локомоция

use bevy::prelude::*;

/// Команда движения (Navigation collaborator: setDestination)
///
/// Архитектура:
/// - AI пишет MovementCommand (high-level intent)
/// - Navigation (headless система или navmesh движка) ведёт агента к цели
/// - Прибытие проверяет сам AI по дистанции (push-событий нет)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum MovementCommand {
    /// Никуда не идём (ещё не было решения)
    #[default]
    Idle,
    /// Двигаться к позиции (world coordinates)
    MoveToPosition { target: Vec3 },
    /// Остановиться немедленно
    Stop,
}

impl MovementCommand {
    pub fn destination(&self) -> Option<Vec3> {
        match self {
            MovementCommand::MoveToPosition { target } => Some(*target),
            MovementCommand::Idle | MovementCommand::Stop => None,
        }
    }
}

/// Скорость движения агента (метры/сек)
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

/// Состояние локомоции для animation cue (Idle/Run)
///
/// Cue отправляется только на ПЕРЕХОДЕ стоим ↔ бежим, не каждый тик.
#[derive(Component, Clone, Copy, Debug, Default, Reflect)]
#[reflect(Component)]
pub struct Locomotion {
    pub moving: bool,
}

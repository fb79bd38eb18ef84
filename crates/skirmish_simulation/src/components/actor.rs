//! Базовые компоненты акторов: Agent, Player, Health

use bevy::prelude::*;
use serde::Deserialize;

use crate::ai::{AlertInbox, Perception, WalkTarget};
use crate::combat::AttackCooldown;
use crate::config::AgentConfig;

/// Тип агента: определяет как исполняется атака
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// Урон наносится напрямую (или через MeleeAttacker damage points)
    #[default]
    Melee,
    /// Урон делегируется projectile коллаборатору (ProjectileLaunch)
    Ranged,
}

/// Combat-агент (NPC): базовый компонент для AI-управляемых акторов
///
/// Автоматически добавляет per-agent AI состояние через Required Components.
/// VisionCone и MovementCommand НЕ required: это внешние коллабораторы,
/// без них агент остаётся Dormant.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(AgentConfig, Perception, AlertInbox, WalkTarget, AttackCooldown)]
pub struct Agent;

/// Marker для player-controlled entity (цель всех агентов)
///
/// В single-player ровно один entity имеет этот компонент.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health)]
pub struct Player;

/// Здоровье
///
/// Инвариант: 0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Возвращает реально снятый урон (отрицательный урон игнорируется)
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        let applied = amount.max(0.0).min(self.current);
        self.current -= applied;
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100.0);

        assert_eq!(health.take_damage(30.0), 30.0);
        assert_eq!(health.current, 70.0);
        assert!(health.is_alive());

        // Не уходим в минус
        assert_eq!(health.take_damage(100.0), 70.0);
        assert_eq!(health.current, 0.0);
        assert!(!health.is_alive());
    }

    #[test]
    fn test_health_ignores_negative_damage() {
        let mut health = Health::new(50.0);
        assert_eq!(health.take_damage(-10.0), 0.0);
        assert_eq!(health.current, 50.0);
    }
}

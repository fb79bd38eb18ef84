//! Agent tunables (externally supplied, per agent instance).
//!
//! Формат: JSON через serde. Все поля имеют defaults, поэтому конфиг
//! может задавать только то, что отличается:
//!
//! ```json
//! { "kind": "ranged", "vision_angle": 120.0, "patrol": { "fixed_route": { "points": [[0,0,0],[5,0,0]] } } }
//! ```

use bevy::prelude::*;
use serde::Deserialize;

use crate::components::AgentKind;
use crate::error::ConfigError;

/// Параметры агента (ranges, timers, damage, patrol)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct AgentConfig {
    pub kind: AgentKind,
    /// Полный угол конуса обзора (градусы)
    pub vision_angle: f32,
    /// Длина vision raycast (метры)
    pub vision_distance: f32,
    /// Высота глаз над Transform.translation
    pub eye_height: f32,
    /// "Периферийное" восприятие: видим игрока в этом радиусе независимо от facing
    pub proximity_range: f32,
    pub attack_range: f32,
    pub announce_range: f32,
    /// Сколько секунд помним игрока после потери из виду
    pub forget_timer: f32,
    pub attack_cooldown: f32,
    pub damage: f32,
    pub move_speed: f32,
    pub patrol: PatrolConfig,
    /// Damage-point melee (MeleeResolver): заменяет прямой урон из Attack
    pub melee: Option<MeleeConfig>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            kind: AgentKind::Melee,
            vision_angle: 90.0,
            vision_distance: 15.0,
            eye_height: 0.0,
            proximity_range: 3.0,
            attack_range: 2.0,
            announce_range: 10.0,
            forget_timer: 5.0,
            attack_cooldown: 1.5,
            damage: 10.0,
            move_speed: 3.5,
            patrol: PatrolConfig::default(),
            melee: None,
        }
    }
}

impl AgentConfig {
    /// Ranged агенты атакуют на всю дистанцию обзора
    pub fn effective_attack_range(&self) -> f32 {
        match self.kind {
            AgentKind::Ranged => self.vision_distance,
            AgentKind::Melee => self.attack_range,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("vision_distance", self.vision_distance)?;
        non_negative("proximity_range", self.proximity_range)?;
        non_negative("attack_range", self.attack_range)?;
        non_negative("announce_range", self.announce_range)?;
        non_negative("forget_timer", self.forget_timer)?;
        non_negative("attack_cooldown", self.attack_cooldown)?;
        non_negative("damage", self.damage)?;
        non_negative("move_speed", self.move_speed)?;

        if !(self.vision_angle > 0.0 && self.vision_angle <= 360.0) {
            return Err(ConfigError::VisionAngle(self.vision_angle));
        }

        match &self.patrol {
            PatrolConfig::Random { range, probe_distance } => {
                if !(range.is_finite() && *range >= 0.0) {
                    return Err(ConfigError::PatrolRange(*range));
                }
                non_negative("patrol.probe_distance", *probe_distance)?;
            }
            PatrolConfig::FixedRoute { points } => {
                if points.is_empty() {
                    return Err(ConfigError::EmptyPatrolRoute);
                }
            }
        }

        if let Some(melee) = &self.melee {
            melee.validate()?;
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value < 0.0 || value.is_nan() {
        return Err(ConfigError::Negative { field, value });
    }
    Ok(())
}

/// Режим патруля
#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatrolConfig {
    /// Случайная точка в квадрате ±range вокруг агента, над землёй
    Random {
        range: f32,
        /// Длина downward probe для проверки земли
        probe_distance: f32,
    },
    /// Фиксированный маршрут (циклический)
    FixedRoute { points: Vec<[f32; 3]> },
}

impl Default for PatrolConfig {
    fn default() -> Self {
        Self::Random {
            range: 8.0,
            probe_distance: 2.0,
        }
    }
}

/// Melee damage-point атака
#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(default)]
pub struct MeleeConfig {
    /// Дистанция до игрока, с которой начинается удар
    pub punch_distance: f32,
    /// Пауза после закрытия окна атаки (до transition buffer)
    pub attack_speed: f32,
    /// Длительность окна атаки, если клип не найден
    pub window_duration: f32,
    /// Имя animation clip, по длине которого считается окно атаки
    pub clip: String,
    pub damage: f32,
    pub damage_points: Vec<DamagePointConfig>,
}

impl Default for MeleeConfig {
    fn default() -> Self {
        Self {
            punch_distance: 2.0,
            attack_speed: 1.0,
            window_duration: 0.5,
            clip: "Enemy Stab".to_string(),
            damage: 15.0,
            damage_points: vec![DamagePointConfig::default()],
        }
    }
}

impl MeleeConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        // 0: агент упирается в игрока и окно никогда не открывается
        if !(self.punch_distance > 0.0 && self.punch_distance.is_finite()) {
            return Err(ConfigError::PunchDistance(self.punch_distance));
        }
        non_negative("melee.attack_speed", self.attack_speed)?;
        non_negative("melee.window_duration", self.window_duration)?;
        non_negative("melee.damage", self.damage)?;
        for point in &self.damage_points {
            non_negative("melee.damage_points.radius", point.radius)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Reflect, Deserialize)]
#[serde(default)]
pub struct DamagePointConfig {
    /// Offset в local space агента (-Z = вперёд)
    pub offset: [f32; 3],
    pub radius: f32,
}

impl Default for DamagePointConfig {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0, -1.0],
            radius: 0.6,
        }
    }
}

/// Один агент уровня: где спавнить + его конфиг
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RosterEntry {
    pub position: [f32; 3],
    /// Направление взгляда при спавне (по умолчанию -Z)
    #[serde(default)]
    pub facing: Option<[f32; 3]>,
    #[serde(default)]
    pub config: AgentConfig,
}

/// Список агентов уровня
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    pub agents: Vec<RosterEntry>,
}

impl Roster {
    /// Парсит и валидирует roster (все агенты, первая ошибка возвращается)
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let roster: Roster = serde_json::from_str(json)?;
        for entry in &roster.agents {
            entry.config.validate()?;
        }
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AgentConfig::default().validate().is_ok());
    }

    #[test]
    fn test_ranged_attack_range_is_vision_distance() {
        let config = AgentConfig {
            kind: AgentKind::Ranged,
            vision_distance: 20.0,
            attack_range: 2.0,
            ..default()
        };
        assert_eq!(config.effective_attack_range(), 20.0);

        let melee = AgentConfig::default();
        assert_eq!(melee.effective_attack_range(), melee.attack_range);
    }

    #[test]
    fn test_validate_rejects_negative_range() {
        let config = AgentConfig {
            announce_range: -1.0,
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Negative { field: "announce_range", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_vision_angle() {
        for angle in [0.0, -10.0, 361.0] {
            let config = AgentConfig {
                vision_angle: angle,
                ..default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::VisionAngle(_))));
        }
    }

    #[test]
    fn test_validate_rejects_empty_route() {
        let config = AgentConfig {
            patrol: PatrolConfig::FixedRoute { points: vec![] },
            ..default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::EmptyPatrolRoute)));
    }

    #[test]
    fn test_validate_rejects_bad_patrol_range() {
        for range in [-2.0, f32::NAN, f32::INFINITY] {
            let config = AgentConfig {
                patrol: PatrolConfig::Random {
                    range,
                    probe_distance: 2.0,
                },
                ..default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::PatrolRange(_))));
        }
    }

    #[test]
    fn test_validate_rejects_zero_punch_distance() {
        let config = AgentConfig {
            melee: Some(MeleeConfig {
                punch_distance: 0.0,
                ..default()
            }),
            ..default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::PunchDistance(d)) if d == 0.0
        ));
    }

    #[test]
    fn test_roster_from_json() {
        let json = r#"[
            { "position": [0, 0, 0] },
            {
                "position": [4, 0, 2],
                "facing": [1, 0, 0],
                "config": {
                    "kind": "ranged",
                    "vision_angle": 120,
                    "patrol": { "fixed_route": { "points": [[0, 0, 0], [5, 0, 0]] } },
                    "melee": { "punch_distance": 1.5 }
                }
            }
        ]"#;

        let roster = Roster::from_json_str(json).expect("roster should parse");
        assert_eq!(roster.agents.len(), 2);
        assert_eq!(roster.agents[0].config, AgentConfig::default());

        let ranged = &roster.agents[1].config;
        assert_eq!(ranged.kind, AgentKind::Ranged);
        assert_eq!(ranged.vision_angle, 120.0);
        assert_eq!(
            ranged.patrol,
            PatrolConfig::FixedRoute {
                points: vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0]]
            }
        );
        let melee = ranged.melee.as_ref().expect("melee section");
        assert_eq!(melee.punch_distance, 1.5);
        assert_eq!(melee.clip, "Enemy Stab");
    }

    #[test]
    fn test_roster_rejects_invalid_agent() {
        let json = r#"[{ "position": [0, 0, 0], "config": { "forget_timer": -2 } }]"#;
        assert!(matches!(
            Roster::from_json_str(json),
            Err(ConfigError::Negative { field: "forget_timer", .. })
        ));
    }

    #[test]
    fn test_roster_rejects_malformed_json() {
        assert!(matches!(Roster::from_json_str("{"), Err(ConfigError::Json(_))));
    }
}

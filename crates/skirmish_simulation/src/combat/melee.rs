//! MeleeResolver: окно атаки + damage-point сферы, максимум один хит за удар.
//!
//! # Attack Flow
//!
//! ```text
//! Idle ──(видим игрока && dist ≤ punch_distance)──> Attacking(window)
//!   ↓ каждый тик окна: union overlap_sphere по damage points
//!   ↓ игрок задет && !has_hit_player → DamageRequest, has_hit_player = true
//! Attacking ──(elapsed ≥ window_duration)──> Recovering(attack_speed + buffer)
//! Recovering ──(remaining ≤ 0)──> Idle
//! ```
//!
//! Повторный старт во время Attacking/Recovering подавляется. Старт не
//! зависит от текущего Behavior агента: достаточно видеть игрока и быть
//! в punch distance.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::ai::{AgentReady, Perception};
use crate::combat::damage::{DamageRequest, DamageSource};
use crate::components::Player;
use crate::config::MeleeConfig;
use crate::cues::{AnimationClips, AnimationCue, AnimationState, AudioCue, ATTACK_LAYER, SLASH_CUE};
use crate::spatial::{SpatialQuery, SpatialSnapshot, LAYER_PLAYER};

/// Пауза на animation transition после закрытия окна (секунды)
pub const TRANSITION_BUFFER: f32 = 0.1;

/// Сфера для melee hit-теста (offset в local space агента)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamagePoint {
    pub offset: Vec3,
    pub radius: f32,
}

/// Окно атаки: живёт ровно один удар
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackWindow {
    pub elapsed: f32,
    pub duration: f32,
    /// Idempotence: true → в этом окне урон уже нанесён
    pub has_hit_player: bool,
}

impl AttackWindow {
    pub fn open(duration: f32) -> Self {
        Self {
            elapsed: 0.0,
            duration,
            has_hit_player: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeleePhase {
    #[default]
    Idle,
    Attacking(AttackWindow),
    /// Окно закрыто, ждём сброса (attack speed + transition buffer)
    Recovering { remaining: f32 },
}

/// Что произошло за один тик resolver'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeleeStep {
    pub opened: bool,
    pub hit: bool,
    pub closed: bool,
    pub ready: bool,
}

/// Melee атакующий с damage points
#[derive(Component, Debug, Clone, PartialEq)]
pub struct MeleeAttacker {
    pub damage_points: Vec<DamagePoint>,
    pub punch_distance: f32,
    pub attack_speed: f32,
    pub damage: f32,
    /// Animation clip, по длине которого считается окно
    pub clip: String,
    /// Длительность окна (clip length, resolved при инициализации)
    pub window_duration: f32,
    pub phase: MeleePhase,
}

impl MeleeAttacker {
    pub fn from_config(config: &MeleeConfig) -> Self {
        Self {
            damage_points: config
                .damage_points
                .iter()
                .map(|point| DamagePoint {
                    offset: Vec3::from_array(point.offset),
                    radius: point.radius,
                })
                .collect(),
            punch_distance: config.punch_distance,
            attack_speed: config.attack_speed,
            damage: config.damage,
            clip: config.clip.clone(),
            window_duration: config.window_duration,
            phase: MeleePhase::Idle,
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.phase, MeleePhase::Attacking(_))
    }

    pub fn window(&self) -> Option<&AttackWindow> {
        match &self.phase {
            MeleePhase::Attacking(window) => Some(window),
            _ => None,
        }
    }

    /// Старт удара: видим игрока, он в punch distance, и мы в Idle
    pub fn try_open_window(&mut self, can_see_player: bool, distance_to_player: f32) -> bool {
        if !can_see_player
            || distance_to_player > self.punch_distance
            || self.phase != MeleePhase::Idle
        {
            return false;
        }

        self.phase = MeleePhase::Attacking(AttackWindow::open(self.window_duration));
        true
    }

    /// Контакт damage point с игроком. true = урон надо нанести (первый раз за окно)
    pub fn register_contact(&mut self) -> bool {
        match &mut self.phase {
            MeleePhase::Attacking(window) if !window.has_hit_player => {
                window.has_hit_player = true;
                true
            }
            _ => false,
        }
    }

    /// Таймеры окна и recovery
    fn advance(&mut self, delta: f32, step: &mut MeleeStep) {
        match &mut self.phase {
            MeleePhase::Idle => {}
            MeleePhase::Attacking(window) => {
                window.elapsed += delta;
                if window.elapsed >= window.duration {
                    self.phase = MeleePhase::Recovering {
                        remaining: self.attack_speed + TRANSITION_BUFFER,
                    };
                    step.closed = true;
                }
            }
            MeleePhase::Recovering { remaining } => {
                *remaining -= delta;
                if *remaining <= 0.0 {
                    self.phase = MeleePhase::Idle;
                    step.ready = true;
                }
            }
        }
    }

    /// Один тик resolver'а: старт → hit-тест → таймеры
    ///
    /// `touches_player` вызывается только пока окно открыто и хит ещё не засчитан.
    pub fn resolve(
        &mut self,
        can_see_player: bool,
        distance_to_player: f32,
        delta: f32,
        touches_player: impl FnOnce(&[DamagePoint]) -> bool,
    ) -> MeleeStep {
        let mut step = MeleeStep {
            opened: self.try_open_window(can_see_player, distance_to_player),
            ..default()
        };

        let awaiting_hit = self.window().is_some_and(|window| !window.has_hit_player);
        if awaiting_hit && touches_player(&self.damage_points) {
            step.hit = self.register_contact();
        }

        self.advance(delta, &mut step);
        step
    }
}

/// Union overlap_sphere по всем damage points (world space), фильтр = игрок
pub fn damage_points_touch(
    spatial: &dyn SpatialQuery,
    transform: &Transform,
    points: &[DamagePoint],
    player: Entity,
) -> bool {
    points.iter().any(|point| {
        spatial
            .overlap_sphere(transform.transform_point(point.offset), point.radius, LAYER_PLAYER)
            .contains(&player)
    })
}

/// Выходы MeleeResolver (урон + presentation cues)
#[derive(SystemParam)]
pub struct MeleeOutput<'w> {
    damage: EventWriter<'w, DamageRequest>,
    animation: EventWriter<'w, AnimationCue>,
    audio: EventWriter<'w, AudioCue>,
}

/// Система: длительность окна из AnimationClips, один раз при добавлении
pub fn resolve_attack_windows(
    mut attackers: Query<(Entity, &mut MeleeAttacker), Added<MeleeAttacker>>,
    clips: Option<Res<AnimationClips>>,
) {
    for (entity, mut attacker) in attackers.iter_mut() {
        let Some(duration) = clips.as_ref().and_then(|clips| clips.duration(&attacker.clip)) else {
            crate::log(&format!(
                "{:?}: clip '{}' not found, window = {:.2}s (config)",
                entity, attacker.clip, attacker.window_duration
            ));
            continue;
        };
        attacker.window_duration = duration;
    }
}

/// Общая логика MeleeResolver для любого SpatialQuery backend
pub fn resolve_melee_with(
    spatial: &dyn SpatialQuery,
    attackers: &mut Query<(Entity, &Transform, &Perception, &mut MeleeAttacker), With<AgentReady>>,
    players: &Query<(Entity, &Transform), With<Player>>,
    delta: f32,
    output: &mut MeleeOutput,
) {
    let Ok((player, player_transform)) = players.single() else {
        return;
    };

    for (entity, transform, perception, mut attacker) in attackers.iter_mut() {
        let distance = transform.translation.distance(player_transform.translation);

        let step = attacker.resolve(perception.can_see_player, distance, delta, |points| {
            damage_points_touch(spatial, transform, points, player)
        });

        if step.opened {
            output.animation.write(AnimationCue {
                entity,
                state: AnimationState::StartPunch,
                layer: ATTACK_LAYER,
            });
            output.audio.write(AudioCue {
                entity,
                cue: SLASH_CUE,
            });
            crate::log(&format!("🗡️ {:?}: attack window opened ({:.2}s)", entity, attacker.window_duration));
        }

        if step.hit {
            output.damage.write(DamageRequest {
                attacker: entity,
                target: player,
                amount: attacker.damage,
                source: DamageSource::Melee,
            });
            crate::log(&format!("🗡️ {:?}: damage point hit {:?}", entity, player));
        }

        if step.closed {
            crate::log(&format!("{:?}: attack window closed", entity));
        }
    }
}

/// Система: MeleeResolver (headless SpatialSnapshot)
pub fn resolve_melee_attacks(
    snapshot: Res<SpatialSnapshot>,
    mut attackers: Query<(Entity, &Transform, &Perception, &mut MeleeAttacker), With<AgentReady>>,
    players: Query<(Entity, &Transform), With<Player>>,
    time: Res<Time<Fixed>>,
    mut output: MeleeOutput,
) {
    resolve_melee_with(
        &*snapshot,
        &mut attackers,
        &players,
        time.delta_secs(),
        &mut output,
    );
}

/// Система: MeleeResolver (rapier backend)
#[cfg(feature = "rapier-backend")]
pub fn resolve_melee_attacks_rapier(
    context: bevy_rapier3d::prelude::ReadRapierContext,
    mut attackers: Query<(Entity, &Transform, &Perception, &mut MeleeAttacker), With<AgentReady>>,
    players: Query<(Entity, &Transform), With<Player>>,
    time: Res<Time<Fixed>>,
    mut output: MeleeOutput,
) {
    let Ok(context) = context.single() else {
        return;
    };
    let spatial = crate::spatial::RapierSpatialQuery::new(&context);

    resolve_melee_with(&spatial, &mut attackers, &players, time.delta_secs(), &mut output);
}

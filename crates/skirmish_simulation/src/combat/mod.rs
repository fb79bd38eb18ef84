//! Combat module: attack cooldowns, MeleeResolver, damage application
//!
//! ECS ответственность:
//! - Game state: Health игрока, AttackCooldown, MeleeAttacker
//! - Combat rules: одно окно = максимум один хит, cooldown между атаками
//! - Events: DamageRequest → DamageDealt, ProjectileLaunch
//!
//! Хост (движок) ответственность:
//! - Анимация и звук по AnimationCue / AudioCue
//! - Полёт снаряда по ProjectileLaunch

use bevy::prelude::*;

use crate::cues::{AnimationCue, AudioCue};
use crate::spatial::SpatialBackend;
use crate::SimulationSet;

pub mod attacker;
pub mod damage;
pub mod melee;

// Re-export основных типов
pub use attacker::{tick_attack_cooldowns, AttackCooldown};
pub use damage::{DamageDealt, DamageRequest, DamageSource, ProjectileLaunch};
pub use melee::{AttackWindow, DamagePoint, MeleeAttacker, MeleePhase, TRANSITION_BUFFER};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. (Sense) tick_attack_cooldowns, resolve_attack_windows
/// 2. (Resolve) MeleeResolver → apply_damage_requests
#[derive(Default)]
pub struct CombatPlugin {
    pub backend: SpatialBackend,
}

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<DamageRequest>()
            .add_event::<DamageDealt>()
            .add_event::<ProjectileLaunch>()
            .add_event::<AnimationCue>()
            .add_event::<AudioCue>();

        app.add_systems(
            FixedUpdate,
            (tick_attack_cooldowns, melee::resolve_attack_windows).in_set(SimulationSet::Sense),
        );

        match self.backend {
            SpatialBackend::Headless => {
                app.add_systems(
                    FixedUpdate,
                    (melee::resolve_melee_attacks, damage::apply_damage_requests)
                        .chain()
                        .in_set(SimulationSet::Resolve),
                );
            }
            #[cfg(feature = "rapier-backend")]
            SpatialBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (melee::resolve_melee_attacks_rapier, damage::apply_damage_requests)
                        .chain()
                        .in_set(SimulationSet::Resolve),
                );
            }
        }
    }
}

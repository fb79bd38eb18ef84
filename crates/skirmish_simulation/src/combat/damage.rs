//! Damage application: DamageRequest → Health игрока → DamageDealt
//!
//! Агенты не трогают Health напрямую: и Attack policy (прямой урон), и
//! MeleeResolver (damage points) пишут DamageRequest. Projectile урон
//! считает внешний коллаборатор по ProjectileLaunch.

use bevy::prelude::*;

use crate::components::Health;

/// Откуда пришёл урон
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    /// Attack policy агента без damage points
    Direct,
    /// Попадание damage point в окне атаки
    Melee,
}

/// Событие: запрос урона (Player.takeDamage)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageRequest {
    pub attacker: Entity,
    pub target: Entity,
    pub amount: f32,
    pub source: DamageSource,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: f32,
    pub source: DamageSource,
    pub target_died: bool,
}

/// Событие: ranged атака делегирована projectile коллаборатору
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ProjectileLaunch {
    pub shooter: Entity,
    pub target: Entity,
    /// Откуда летит (позиция стрелка)
    pub origin: Vec3,
    /// Позиция цели в момент выстрела
    pub target_position: Vec3,
    pub damage: f32,
}

/// Система: apply damage от DamageRequest событий
///
/// 1. Читаем DamageRequest
/// 2. Применяем damage к Health (clamp в 0)
/// 3. Генерируем DamageDealt (target_died только на переходе жив → мёртв)
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut targets: Query<&mut Health>,
) {
    for request in requests.read() {
        let Ok(mut health) = targets.get_mut(request.target) else {
            crate::log_warning(&format!(
                "DamageRequest: target {:?} has no Health (despawned?)",
                request.target
            ));
            continue;
        };

        let was_alive = health.is_alive();
        let applied = health.take_damage(request.amount);
        let target_died = was_alive && !health.is_alive();

        crate::log(&format!(
            "💥 {:?} → {:?}: {:.1} damage ({:?}), health {:.1}/{:.1}",
            request.attacker, request.target, applied, request.source, health.current, health.max
        ));

        damage_dealt_events.write(DamageDealt {
            attacker: request.attacker,
            target: request.target,
            damage: applied,
            source: request.source,
            target_died,
        });

        if target_died {
            crate::log_info(&format!(
                "Entity {:?} killed by {:?}",
                request.target, request.attacker
            ));
        }
    }
}

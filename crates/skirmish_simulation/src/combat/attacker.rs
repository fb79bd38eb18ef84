//! AttackCooldown: пауза между атаками агента (Attack policy)
//!
//! Таймер тикает отдельной системой, независимо от perception: агент,
//! потерявший игрока посреди cooldown, всё равно дождётся сброса.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AttackCooldown {
    /// Секунд до следующей атаки (0 = готов)
    pub remaining: f32,
}

impl AttackCooldown {
    /// Может ли атаковать (cooldown == 0)
    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Начать атаку (сбросить cooldown)
    pub fn start(&mut self, duration: f32) {
        self.remaining = duration;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }
}

/// System: обновление attack cooldown таймеров
pub fn tick_attack_cooldowns(mut query: Query<&mut AttackCooldown>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut cooldown in query.iter_mut() {
        if !cooldown.is_ready() {
            cooldown.tick(delta);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attack_cooldown() {
        let mut cooldown = AttackCooldown::default();
        assert!(cooldown.is_ready());

        cooldown.start(1.0);
        assert!(!cooldown.is_ready());
        assert_eq!(cooldown.remaining, 1.0);

        // Simulate tick
        cooldown.tick(0.5);
        assert!(!cooldown.is_ready());

        cooldown.tick(0.75);
        assert!(cooldown.is_ready());
        assert_eq!(cooldown.remaining, 0.0);
    }
}

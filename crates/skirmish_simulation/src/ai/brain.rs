//! AgentBehaviorState: один шаг решения агента.
//!
//! Порядок внутри `tick`:
//! 1. Дренируем AlertInbox (announce с прошлого тика)
//! 2. Сенсинг: canSee (cone OR proximity), canAttack (attack range)
//! 3. Behavior = чистая функция Perception → ветка (patrol / chase / attack)
//! 4. Память убывает ВСЕГДА, независимо от ветки
//!
//! Мозг ничего не пишет в мир сам. Результат тика (`TickOutcome`) система
//! превращает в MovementCommand, Announcement и атаки.

use bevy::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::components::{AlertInbox, Behavior, Perception, VisionCone, WalkTarget};
use crate::ai::patrol::next_walk_point;
use crate::ai::sensing::sense_player;
use crate::combat::AttackCooldown;
use crate::components::{AgentKind, MovementCommand};
use crate::config::AgentConfig;
use crate::error::AgentError;
use crate::navigation::has_arrived;
use crate::spatial::SpatialQuery;

/// Живая цель (игрок) на этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTarget {
    pub entity: Entity,
    pub position: Vec3,
}

/// Всё, что агент читает из мира (кроме своих компонентов)
pub struct Surroundings<'a> {
    pub spatial: &'a dyn SpatialQuery,
    /// None = игрок despawned (StaleTarget)
    pub player: Option<PlayerTarget>,
    pub rng: &'a mut ChaCha8Rng,
}

/// Атака, начатая на этом тике
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttackOrder {
    /// Ranged: делегируем projectile коллаборатору
    Projectile { target: Entity, damage: f32 },
    /// Melee без damage points: урон напрямую игроку
    Direct { target: Entity, damage: f32 },
}

/// Результат одного тика агента
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    pub behavior: Behavior,
    /// None = команду навигации не трогаем
    pub movement: Option<MovementCommand>,
    /// Позиция игрока для announce (если видим)
    pub announce: Option<Vec3>,
    pub attack: Option<AttackOrder>,
    /// Локальная ошибка агента (логируется, симуляция продолжается)
    pub error: Option<AgentError>,
}

impl TickOutcome {
    fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            movement: None,
            announce: None,
            attack: None,
            error: None,
        }
    }
}

/// Изменяемое состояние одного агента на время тика
pub struct AgentBrain<'w> {
    pub entity: Entity,
    pub transform: &'w Transform,
    pub config: &'w AgentConfig,
    pub vision: &'w VisionCone,
    pub perception: &'w mut Perception,
    pub inbox: &'w mut AlertInbox,
    pub walk: &'w mut WalkTarget,
    pub cooldown: &'w mut AttackCooldown,
}

impl AgentBrain<'_> {
    pub fn tick(&mut self, surroundings: &mut Surroundings<'_>, delta: f32) -> TickOutcome {
        self.inbox.drain_into(self.perception);

        let stale = self.sense(surroundings);

        let behavior = self.perception.behavior();
        let mut outcome = TickOutcome::new(behavior);
        if stale {
            outcome.error = Some(AgentError::StaleTarget);
        }

        match behavior {
            Behavior::Patrol => self.patrol(surroundings, &mut outcome),
            Behavior::ChaseByAnnouncement { target } => {
                outcome.movement = Some(MovementCommand::MoveToPosition { target });

                // Информация из announce "потреблена" по прибытии
                if has_arrived(self.transform.translation, target) {
                    self.perception.consume_announcement();
                }
            }
            Behavior::ChaseByMemory => {
                // Память без живого игрока сбрасывается в sense(), сюда не попадём
                if let Some(player) = surroundings.player {
                    outcome.movement = Some(MovementCommand::MoveToPosition {
                        target: player.position,
                    });
                }
            }
            Behavior::ChaseDirect => {
                if let Some(player) = surroundings.player {
                    outcome.announce = Some(player.position);
                    outcome.movement = Some(MovementCommand::MoveToPosition {
                        target: player.position,
                    });
                }
            }
            Behavior::Attack => {
                if let Some(player) = surroundings.player {
                    outcome.announce = Some(player.position);
                    self.attack(player, &mut outcome);
                }
            }
        }

        self.perception.decay_memory(delta);

        outcome
    }

    /// Сенсинг игрока. true = игрок пропал после того, как мы его отслеживали
    fn sense(&mut self, surroundings: &Surroundings<'_>) -> bool {
        let Some(player) = surroundings.player else {
            let was_tracking = self.perception.remember_player || self.perception.can_see_player;
            self.perception.can_see_player = false;
            self.perception.can_attack_player = false;
            self.perception.remember_player = false;
            self.perception.remaining_memory = 0.0;
            return was_tracking;
        };

        let sighting = sense_player(
            surroundings.spatial,
            self.vision,
            self.config,
            self.transform,
            player.entity,
            player.position,
        );
        self.perception.can_see_player = sighting.can_see;
        self.perception.can_attack_player = sighting.can_attack;

        if sighting.can_see {
            self.perception.on_player_perceived(self.config.forget_timer);
        }

        false
    }

    fn patrol(&mut self, surroundings: &mut Surroundings<'_>, outcome: &mut TickOutcome) {
        let position = self.transform.translation;

        if !self.walk.is_set() {
            match next_walk_point(
                &self.config.patrol,
                position,
                self.walk,
                surroundings.spatial,
                &mut *surroundings.rng,
            ) {
                Ok(point) => self.walk.point = Some(point),
                Err(err) => {
                    // Fail soft: стоим, пробуем снова на следующем тике
                    outcome.movement = Some(MovementCommand::Stop);
                    outcome.error = Some(err);
                    return;
                }
            }
        }

        if let Some(point) = self.walk.point {
            outcome.movement = Some(MovementCommand::MoveToPosition { target: point });

            if has_arrived(position, point) {
                self.walk.clear();
            }
        }
    }

    /// Attack policy: стоим на месте, одна атака за cooldown
    ///
    /// Агент с damage points дожимает дистанцию до punch_distance: attack
    /// range меряется overlap'ом (с радиусом игрока), окно удара открывается
    /// по дистанции между центрами.
    fn attack(&mut self, player: PlayerTarget, outcome: &mut TickOutcome) {
        let position = self.transform.translation;
        let out_of_reach = self
            .config
            .melee
            .as_ref()
            .is_some_and(|melee| position.distance(player.position) > melee.punch_distance);

        outcome.movement = Some(MovementCommand::MoveToPosition {
            target: if out_of_reach { player.position } else { position },
        });

        if !self.cooldown.is_ready() {
            return;
        }

        let damage = self.config.damage;
        outcome.attack = match self.config.kind {
            AgentKind::Ranged => Some(AttackOrder::Projectile {
                target: player.entity,
                damage,
            }),
            // С damage points урон наносит MeleeResolver
            AgentKind::Melee if self.config.melee.is_some() => None,
            AgentKind::Melee => Some(AttackOrder::Direct {
                target: player.entity,
                damage,
            }),
        };

        self.cooldown.start(self.config.attack_cooldown);
    }
}

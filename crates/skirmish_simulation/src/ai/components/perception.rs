//! PerceptionState агента + derived behavior.
//!
//! Поведение НЕ хранится отдельным enum'ом: каждый тик оно выводится
//! чистой функцией из Perception (`Behavior::derive`), поэтому флаги и
//! "состояние" не могут разъехаться.

use bevy::prelude::*;

/// Что агент знает об игроке (пересчитывается каждый тик, принадлежит агенту)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct Perception {
    pub can_see_player: bool,
    pub can_attack_player: bool,
    /// Другой агент сообщил позицию игрока
    pub got_announced: bool,
    /// Ground-plane позиция игрока из последнего announce
    pub announced_position: Vec3,
    pub remember_player: bool,
    /// Секунды до забывания (монотонно убывает пока игрок не виден)
    pub remaining_memory: f32,
}

impl Perception {
    pub fn behavior(&self) -> Behavior {
        Behavior::derive(self)
    }

    /// Игрок увиден: сбрасываем announce, освежаем память
    pub fn on_player_perceived(&mut self, forget_timer: f32) {
        self.got_announced = false;
        self.remember_player = true;
        self.remaining_memory = forget_timer;
    }

    /// Announce доставлен (latest wins)
    pub fn receive_announcement(&mut self, ground_position: Vec3) {
        self.got_announced = true;
        self.announced_position = ground_position;
    }

    /// Дошли до announced точки: информация "потреблена"
    pub fn consume_announcement(&mut self) {
        self.got_announced = false;
        self.remember_player = false;
    }

    /// Шаг памяти (выполняется каждый тик, независимо от ветки поведения)
    ///
    /// `remember_player` становится false ровно когда таймер доходит до 0.
    pub fn decay_memory(&mut self, delta: f32) {
        if self.remaining_memory > 0.0 {
            self.remaining_memory = (self.remaining_memory - delta).max(0.0);
            if self.remaining_memory <= 0.0 {
                self.remember_player = false;
            }
        } else {
            self.remember_player = false;
        }
    }
}

/// Поведение агента на текущем тике (derived, не хранится)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Behavior {
    Patrol,
    /// Идём к последней позиции из announce
    ChaseByAnnouncement { target: Vec3 },
    /// Не видим, но помним: идём к живой позиции игрока
    ChaseByMemory,
    /// Видим, но далеко для атаки
    ChaseDirect,
    Attack,
}

impl Behavior {
    /// Приоритет: видим > announce > память > патруль
    pub fn derive(perception: &Perception) -> Self {
        if perception.can_see_player {
            if perception.can_attack_player {
                Behavior::Attack
            } else {
                Behavior::ChaseDirect
            }
        } else if perception.got_announced {
            Behavior::ChaseByAnnouncement {
                target: perception.announced_position,
            }
        } else if perception.remember_player {
            Behavior::ChaseByMemory
        } else {
            Behavior::Patrol
        }
    }

    /// Крупное состояние для UI/логов: Patrol / Chase / Attack
    pub fn phase(&self) -> BehaviorPhase {
        match self {
            Behavior::Patrol => BehaviorPhase::Patrolling,
            Behavior::ChaseByAnnouncement { .. } | Behavior::ChaseByMemory | Behavior::ChaseDirect => {
                BehaviorPhase::Chasing
            }
            Behavior::Attack => BehaviorPhase::Attacking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorPhase {
    Patrolling,
    Chasing,
    Attacking,
}

/// Inbound mailbox для announce (AlertChannel → агент)
///
/// Пишется доставкой событий, дренируется в начале тика агента.
/// Очереди нет: последнее сообщение перезаписывает предыдущее.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct AlertInbox {
    pub pending: Option<Vec3>,
}

impl AlertInbox {
    pub fn post(&mut self, ground_position: Vec3) {
        self.pending = Some(ground_position);
    }

    /// Переносит pending announce в Perception (если есть)
    pub fn drain_into(&mut self, perception: &mut Perception) -> bool {
        match self.pending.take() {
            Some(position) => {
                perception.receive_announcement(position);
                true
            }
            None => false,
        }
    }
}

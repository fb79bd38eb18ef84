//! AI Events: межагентные сообщения

use bevy::prelude::*;

/// Announce: позиция игрока для одного получателя (AlertChannel)
///
/// Пишется на тике источника, доставляется в `AlertInbox` получателя в
/// начале следующего тика (one-frame latency).
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct Announcement {
    pub source: Entity,
    pub recipient: Entity,
    /// Позиция игрока на ground plane (y = 0)
    pub position: Vec3,
}

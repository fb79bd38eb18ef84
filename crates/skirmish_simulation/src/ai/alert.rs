//! AlertChannel: fan-out позиции игрока соседним агентам.
//!
//! Прямой записи в чужие компоненты нет: announce производит
//! `Announcement` события, доставка кладёт их в `AlertInbox` получателя.

use bevy::prelude::*;

use crate::ai::components::AlertInbox;
use crate::ai::events::Announcement;
use crate::ai::systems::lifecycle::AgentReady;
use crate::spatial::{SpatialQuery, LAYER_AGENTS};

/// Позиция игрока без вертикальной компоненты (агенты думают в ground plane)
pub fn ground_position(position: Vec3) -> Vec3 {
    position.with_y(0.0)
}

/// announce(source, playerGroundPosition): все агенты в `range`, кроме источника
pub fn announce(
    spatial: &dyn SpatialQuery,
    source: Entity,
    source_position: Vec3,
    range: f32,
    player_position: Vec3,
) -> Vec<Announcement> {
    let position = ground_position(player_position);

    spatial
        .overlap_sphere(source_position, range, LAYER_AGENTS)
        .into_iter()
        .filter(|&recipient| recipient != source)
        .map(|recipient| Announcement {
            source,
            recipient,
            position,
        })
        .collect()
}

/// Система: Announcement → AlertInbox (latest wins, без очереди)
///
/// Получатель без AlertInbox (не агент, despawned) молча пропускается.
/// Dormant агенты тоже: иначе после AgentReady они побегут на старую позицию.
pub fn deliver_announcements(
    mut announcements: EventReader<Announcement>,
    mut inboxes: Query<&mut AlertInbox, With<AgentReady>>,
) {
    for announcement in announcements.read() {
        let Ok(mut inbox) = inboxes.get_mut(announcement.recipient) else {
            continue;
        };
        inbox.post(announcement.position);
    }
}

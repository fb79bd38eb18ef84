//! Patrol state: активная WalkTarget + индекс фиксированного маршрута.

use bevy::prelude::*;

/// Активная patrol-точка агента
///
/// `point == None` → на следующем Patrol тике выбирается новая
/// (random или следующая точка маршрута).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct WalkTarget {
    pub point: Option<Vec3>,
    /// Следующий индекс фиксированного маршрута (циклический)
    pub route_index: usize,
}

impl WalkTarget {
    pub fn is_set(&self) -> bool {
        self.point.is_some()
    }

    pub fn clear(&mut self) {
        self.point = None;
    }
}

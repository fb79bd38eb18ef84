//! Spatial query service (overlap + raycast по категориям).
//!
//! AI никогда не ходит в физику напрямую: PerceptionSensor, AlertChannel,
//! patrol ground probe и MeleeResolver получают `&dyn SpatialQuery`.
//!
//! Реализации:
//! - `SpatialSnapshot`: headless, аналитические тесты по `SpatialBody` (default)
//! - `RapierSpatialQuery`: поверх RapierContext (feature `rapier-backend`)

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

pub mod layers;
pub mod snapshot;

#[cfg(feature = "rapier-backend")]
pub mod rapier;

pub use layers::*;
pub use snapshot::{refresh_spatial_snapshot, BodyShape, SpatialBody, SpatialSnapshot};

#[cfg(feature = "rapier-backend")]
pub use rapier::RapierSpatialQuery;

/// Откуда AI/combat системы берут SpatialQuery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpatialBackend {
    /// SpatialSnapshot из SpatialBody (без физики)
    #[default]
    Headless,
    /// RapierContext (мир собран из rapier коллайдеров)
    #[cfg(feature = "rapier-backend")]
    Rapier,
}

/// Результат raycast: первое тело вдоль луча
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub entity: Entity,
    pub point: Vec3,
    pub distance: f32,
}

/// Внешний spatial-query сервис мира.
pub trait SpatialQuery {
    /// Все entity, чьи тела пересекают сферу и лежат в одной из категорий `filter`.
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: Group) -> Vec<Entity>;

    /// Первое попадание луча (direction нормализован) не дальше `max_distance`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: Group,
    ) -> Option<RayHit>;
}

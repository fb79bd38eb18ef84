//! VisionCone: PerceptionSensor агента (коллаборатор, не required).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use crate::config::AgentConfig;
use crate::spatial::MASK_VISION;

/// Конус обзора: forward агента, половина угла, длина луча
#[derive(Component, Debug, Clone, Copy)]
pub struct VisionCone {
    /// Полный угол (градусы)
    pub angle: f32,
    pub distance: f32,
    /// Смещение глаз от Transform.translation (world space)
    pub eye_offset: Vec3,
    /// Что ловит луч: игрок + препятствия
    pub mask: Group,
}

impl Default for VisionCone {
    fn default() -> Self {
        Self::from_config(&AgentConfig::default())
    }
}

impl VisionCone {
    pub fn from_config(config: &AgentConfig) -> Self {
        Self {
            angle: config.vision_angle,
            distance: config.vision_distance,
            eye_offset: Vec3::Y * config.eye_height,
            mask: MASK_VISION,
        }
    }

    pub fn half_angle(&self) -> f32 {
        self.angle * 0.5
    }
}

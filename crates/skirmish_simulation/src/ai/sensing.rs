//! PerceptionSensor: vision cone (raycast + угол) и proximity fallback.
//!
//! Все проверки идут через `&dyn SpatialQuery`, AI не знает о физике.

use bevy::prelude::*;

use crate::ai::components::VisionCone;
use crate::config::AgentConfig;
use crate::spatial::{SpatialQuery, LAYER_PLAYER};

/// Результат сенсинга игрока на текущем тике
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sighting {
    pub can_see: bool,
    pub can_attack: bool,
}

/// isInView: первый hit луча = сам target И угол ≤ половины конуса
///
/// Луч ограничен `vision.distance`; препятствие раньше цели → не видим.
pub fn is_in_view(
    spatial: &dyn SpatialQuery,
    vision: &VisionCone,
    transform: &Transform,
    target: Entity,
    target_point: Vec3,
) -> bool {
    let eye = transform.translation + vision.eye_offset;
    let Some(direction) = (target_point - eye).try_normalize() else {
        return false;
    };

    let Some(hit) = spatial.raycast(eye, direction, vision.distance, vision.mask) else {
        return false;
    };
    if hit.entity != target {
        return false;
    }

    let forward = transform.forward().as_vec3();
    forward.angle_between(direction).to_degrees() <= vision.half_angle()
}

/// Sphere overlap вокруг агента, фильтр = категория игрока
pub fn within_range(spatial: &dyn SpatialQuery, center: Vec3, radius: f32, target: Entity) -> bool {
    spatial
        .overlap_sphere(center, radius, LAYER_PLAYER)
        .contains(&target)
}

/// canSeePlayer = cone OR proximity; canAttackPlayer = overlap на attack range
pub fn sense_player(
    spatial: &dyn SpatialQuery,
    vision: &VisionCone,
    config: &AgentConfig,
    transform: &Transform,
    player: Entity,
    player_position: Vec3,
) -> Sighting {
    let position = transform.translation;

    let can_see = is_in_view(spatial, vision, transform, player, player_position)
        || within_range(spatial, position, config.proximity_range, player);
    let can_attack = within_range(spatial, position, config.effective_attack_range(), player);

    Sighting { can_see, can_attack }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{SpatialBody, SpatialSnapshot, LAYER_ENVIRONMENT};

    const PLAYER: Entity = Entity::from_raw(1);
    const WALL: Entity = Entity::from_raw(2);

    fn agent_facing_x() -> Transform {
        Transform::from_translation(Vec3::ZERO).looking_to(Vec3::X, Vec3::Y)
    }

    fn vision(angle: f32, distance: f32) -> VisionCone {
        VisionCone::from_config(&AgentConfig {
            vision_angle: angle,
            vision_distance: distance,
            ..default()
        })
    }

    fn world_with_player(at: Vec3) -> SpatialSnapshot {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(PLAYER, at, SpatialBody::sphere(0.5, LAYER_PLAYER));
        snapshot
    }

    #[test]
    fn test_player_in_cone_with_clear_line_of_sight() {
        let player_at = Vec3::new(5.0, 0.0, 0.0);
        let snapshot = world_with_player(player_at);

        assert!(is_in_view(&snapshot, &vision(90.0, 10.0), &agent_facing_x(), PLAYER, player_at));
    }

    #[test]
    fn test_obstruction_blocks_view() {
        let player_at = Vec3::new(5.0, 0.0, 0.0);
        let mut snapshot = world_with_player(player_at);
        snapshot.insert(
            WALL,
            Vec3::new(2.5, 0.0, 0.0),
            SpatialBody::cuboid(Vec3::new(0.25, 2.0, 2.0), LAYER_ENVIRONMENT),
        );

        assert!(!is_in_view(&snapshot, &vision(90.0, 10.0), &agent_facing_x(), PLAYER, player_at));

        // Proximity fallback срабатывает только при range ≥ 5
        let near = AgentConfig {
            proximity_range: 3.0,
            ..default()
        };
        let sighting = sense_player(&snapshot, &vision(90.0, 10.0), &near, &agent_facing_x(), PLAYER, player_at);
        assert!(!sighting.can_see);

        let far = AgentConfig {
            proximity_range: 5.0,
            ..default()
        };
        let sighting = sense_player(&snapshot, &vision(90.0, 10.0), &far, &agent_facing_x(), PLAYER, player_at);
        assert!(sighting.can_see);
    }

    #[test]
    fn test_player_outside_half_angle() {
        // 60° от forward, конус 90° (половина 45°)
        let player_at = Vec3::new(2.5, 0.0, -4.33);
        let snapshot = world_with_player(player_at);

        assert!(!is_in_view(&snapshot, &vision(90.0, 10.0), &agent_facing_x(), PLAYER, player_at));
        assert!(is_in_view(&snapshot, &vision(150.0, 10.0), &agent_facing_x(), PLAYER, player_at));
    }

    #[test]
    fn test_player_beyond_vision_distance() {
        let player_at = Vec3::new(12.0, 0.0, 0.0);
        let snapshot = world_with_player(player_at);

        assert!(!is_in_view(&snapshot, &vision(90.0, 10.0), &agent_facing_x(), PLAYER, player_at));
    }

    #[test]
    fn test_proximity_ignores_facing() {
        // Игрок за спиной, но в proximity range
        let player_at = Vec3::new(-2.0, 0.0, 0.0);
        let snapshot = world_with_player(player_at);
        let config = AgentConfig::default();

        let sighting = sense_player(&snapshot, &vision(90.0, 10.0), &config, &agent_facing_x(), PLAYER, player_at);
        assert!(sighting.can_see);
        assert!(sighting.can_attack, "attack range 2 + player radius covers 2m");
    }

    #[test]
    fn test_can_attack_uses_attack_range() {
        let player_at = Vec3::new(6.0, 0.0, 0.0);
        let snapshot = world_with_player(player_at);

        let melee = AgentConfig::default();
        let sighting = sense_player(&snapshot, &vision(90.0, 10.0), &melee, &agent_facing_x(), PLAYER, player_at);
        assert_eq!(sighting, Sighting { can_see: true, can_attack: false });

        let ranged = AgentConfig {
            kind: crate::components::AgentKind::Ranged,
            vision_distance: 10.0,
            ..default()
        };
        let sighting = sense_player(&snapshot, &vision(90.0, 10.0), &ranged, &agent_facing_x(), PLAYER, player_at);
        assert_eq!(sighting, Sighting { can_see: true, can_attack: true });
    }
}

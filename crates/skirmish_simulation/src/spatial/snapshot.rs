//! Headless SpatialQuery: snapshot тел мира, пересобирается каждый тик.
//!
//! Аналитические тесты вместо физического движка:
//! - ray vs sphere, ray vs AABB (slab)
//! - sphere vs sphere, sphere vs AABB
//!
//! Cuboid считается axis-aligned (rotation игнорируется): уровни в headless
//! тестах собраны из стен/пола без поворота.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Group;

use super::{RayHit, SpatialQuery};

const RAY_EPSILON: f32 = 1e-6;

/// Форма тела для spatial queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Тело, видимое spatial queries (центр = Transform.translation)
#[derive(Component, Debug, Clone, Copy)]
pub struct SpatialBody {
    pub shape: BodyShape,
    pub layer: Group,
}

impl SpatialBody {
    pub fn sphere(radius: f32, layer: Group) -> Self {
        Self {
            shape: BodyShape::Sphere { radius },
            layer,
        }
    }

    pub fn cuboid(half_extents: Vec3, layer: Group) -> Self {
        Self {
            shape: BodyShape::Cuboid { half_extents },
            layer,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SnapshotBody {
    entity: Entity,
    center: Vec3,
    shape: BodyShape,
    layer: Group,
}

/// Snapshot мира для headless режима
#[derive(Resource, Debug, Default, Clone)]
pub struct SpatialSnapshot {
    bodies: Vec<SnapshotBody>,
}

impl SpatialSnapshot {
    pub fn clear(&mut self) {
        self.bodies.clear();
    }

    pub fn insert(&mut self, entity: Entity, center: Vec3, body: SpatialBody) {
        self.bodies.push(SnapshotBody {
            entity,
            center,
            shape: body.shape,
            layer: body.layer,
        });
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl SpatialQuery for SpatialSnapshot {
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: Group) -> Vec<Entity> {
        self.bodies
            .iter()
            .filter(|body| body.layer.intersects(filter))
            .filter(|body| sphere_overlaps(center, radius, body))
            .map(|body| body.entity)
            .collect()
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: Group,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;

        let mut nearest: Option<(Entity, f32)> = None;
        for body in self.bodies.iter().filter(|body| body.layer.intersects(filter)) {
            let Some(toi) = ray_time_of_impact(origin, direction, max_distance, body) else {
                continue;
            };

            // Ничья по дистанции → меньший entity index (детерминизм)
            let closer = match nearest {
                None => true,
                Some((best_entity, best_toi)) => {
                    toi < best_toi || (toi == best_toi && body.entity.index() < best_entity.index())
                }
            };
            if closer {
                nearest = Some((body.entity, toi));
            }
        }

        nearest.map(|(entity, toi)| RayHit {
            entity,
            point: origin + direction * toi,
            distance: toi,
        })
    }
}

fn sphere_overlaps(center: Vec3, radius: f32, body: &SnapshotBody) -> bool {
    match body.shape {
        BodyShape::Sphere { radius: body_radius } => {
            center.distance_squared(body.center) <= (radius + body_radius).powi(2)
        }
        BodyShape::Cuboid { half_extents } => {
            let min = body.center - half_extents;
            let max = body.center + half_extents;
            let closest = center.clamp(min, max);
            center.distance_squared(closest) <= radius * radius
        }
    }
}

fn ray_time_of_impact(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    body: &SnapshotBody,
) -> Option<f32> {
    let toi = match body.shape {
        BodyShape::Sphere { radius } => ray_sphere(origin, direction, body.center, radius)?,
        BodyShape::Cuboid { half_extents } => {
            ray_aabb(origin, direction, body.center - half_extents, body.center + half_extents)?
        }
    };

    (toi <= max_distance).then_some(toi)
}

/// Луч изнутри сферы попадает в t = 0 (solid query, как у rapier)
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - radius * radius;

    if c <= 0.0 {
        return Some(0.0);
    }
    if b > 0.0 {
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    Some((-b - discriminant.sqrt()).max(0.0))
}

fn ray_aabb(origin: Vec3, direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = f32::MAX;

    for axis in 0..3 {
        let o = origin[axis];
        let d = direction[axis];

        if d.abs() < RAY_EPSILON {
            // Луч параллелен slab'у: либо внутри, либо мимо
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }

        let inv = 1.0 / d;
        let mut t1 = (min[axis] - o) * inv;
        let mut t2 = (max[axis] - o) * inv;
        if t1 > t2 {
            std::mem::swap(&mut t1, &mut t2);
        }

        t_min = t_min.max(t1);
        t_max = t_max.min(t2);
        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}

/// Система: пересобрать SpatialSnapshot из SpatialBody + Transform
///
/// Тела сортируются по entity index: порядок query между прогонами не влияет на результат.
pub fn refresh_spatial_snapshot(
    mut snapshot: ResMut<SpatialSnapshot>,
    bodies: Query<(Entity, &Transform, &SpatialBody)>,
) {
    snapshot.clear();

    let mut collected: Vec<_> = bodies.iter().collect();
    collected.sort_by_key(|(entity, _, _)| entity.index());

    for (entity, transform, body) in collected {
        snapshot.insert(entity, transform.translation, *body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{LAYER_AGENTS, LAYER_ENVIRONMENT, LAYER_GROUND, LAYER_PLAYER, MASK_VISION};

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    #[test]
    fn test_raycast_hits_nearest_body() {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(entity(1), Vec3::new(5.0, 0.0, 0.0), SpatialBody::sphere(0.5, LAYER_PLAYER));
        snapshot.insert(
            entity(2),
            Vec3::new(2.5, 0.0, 0.0),
            SpatialBody::cuboid(Vec3::new(0.25, 2.0, 2.0), LAYER_ENVIRONMENT),
        );

        let hit = snapshot
            .raycast(Vec3::ZERO, Vec3::X, 10.0, MASK_VISION)
            .expect("wall should be hit");

        assert_eq!(hit.entity, entity(2));
        assert!((hit.distance - 2.25).abs() < 1e-5, "distance = {}", hit.distance);
        assert!((hit.point.x - 2.25).abs() < 1e-5);
    }

    #[test]
    fn test_raycast_respects_filter_and_distance() {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(entity(1), Vec3::new(5.0, 0.0, 0.0), SpatialBody::sphere(0.5, LAYER_AGENTS));

        assert!(snapshot.raycast(Vec3::ZERO, Vec3::X, 10.0, LAYER_PLAYER).is_none());
        assert!(snapshot.raycast(Vec3::ZERO, Vec3::X, 4.0, LAYER_AGENTS).is_none());
        assert!(snapshot.raycast(Vec3::ZERO, Vec3::X, 4.5, LAYER_AGENTS).is_some());
    }

    #[test]
    fn test_raycast_misses_body_behind_origin() {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(entity(1), Vec3::new(-5.0, 0.0, 0.0), SpatialBody::sphere(0.5, LAYER_PLAYER));

        assert!(snapshot.raycast(Vec3::ZERO, Vec3::X, 10.0, LAYER_PLAYER).is_none());
    }

    #[test]
    fn test_ground_probe_from_surface() {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(
            entity(1),
            Vec3::new(0.0, -0.5, 0.0),
            SpatialBody::cuboid(Vec3::new(10.0, 0.5, 10.0), LAYER_GROUND),
        );

        assert!(snapshot
            .raycast(Vec3::new(3.0, 0.0, -4.0), Vec3::NEG_Y, 2.0, LAYER_GROUND)
            .is_some());
        // За краем пола: пустота
        assert!(snapshot
            .raycast(Vec3::new(12.0, 0.0, 0.0), Vec3::NEG_Y, 2.0, LAYER_GROUND)
            .is_none());
    }

    #[test]
    fn test_overlap_sphere_sphere_and_cuboid() {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(entity(1), Vec3::new(3.0, 0.0, 0.0), SpatialBody::sphere(0.5, LAYER_AGENTS));
        snapshot.insert(entity(2), Vec3::new(9.0, 0.0, 0.0), SpatialBody::sphere(0.5, LAYER_AGENTS));
        snapshot.insert(
            entity(3),
            Vec3::new(0.0, 0.0, 4.0),
            SpatialBody::cuboid(Vec3::splat(1.0), LAYER_ENVIRONMENT),
        );

        let agents = snapshot.overlap_sphere(Vec3::ZERO, 3.0, LAYER_AGENTS);
        assert_eq!(agents, vec![entity(1)]);

        let walls = snapshot.overlap_sphere(Vec3::ZERO, 3.0, LAYER_ENVIRONMENT);
        assert_eq!(walls, vec![entity(3)]);

        let none = snapshot.overlap_sphere(Vec3::ZERO, 1.0, LAYER_AGENTS | LAYER_ENVIRONMENT);
        assert!(none.is_empty());
    }
}

//! SpatialQuery поверх bevy_rapier3d (feature `rapier-backend`).
//!
//! Используется когда мир собран из rapier коллайдеров: категории берутся
//! из `CollisionGroups` коллайдеров, фильтр = memberships ∩ filter.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use super::{BodyShape, RayHit, SpatialBody, SpatialQuery};

/// Коллайдер + группы для тела (те же категории, что у headless snapshot)
pub fn collider_bundle(body: &SpatialBody) -> (Collider, CollisionGroups) {
    let collider = match body.shape {
        BodyShape::Sphere { radius } => Collider::ball(radius),
        BodyShape::Cuboid { half_extents } => {
            Collider::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    };
    (collider, CollisionGroups::new(body.layer, Group::ALL))
}

pub struct RapierSpatialQuery<'c, 'a> {
    context: &'c RapierContext<'a>,
}

impl<'c, 'a> RapierSpatialQuery<'c, 'a> {
    pub fn new(context: &'c RapierContext<'a>) -> Self {
        Self { context }
    }
}

fn query_filter(filter: Group) -> QueryFilter<'static> {
    QueryFilter::new().groups(CollisionGroups::new(Group::ALL, filter))
}

impl SpatialQuery for RapierSpatialQuery<'_, '_> {
    fn overlap_sphere(&self, center: Vec3, radius: f32, filter: Group) -> Vec<Entity> {
        let shape = Collider::ball(radius);
        let mut hits = Vec::new();

        self.context.intersections_with_shape(
            center,
            Quat::IDENTITY,
            &shape,
            query_filter(filter),
            |entity| {
                hits.push(entity);
                true // продолжаем собирать все пересечения
            },
        );

        hits
    }

    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        filter: Group,
    ) -> Option<RayHit> {
        let direction = direction.try_normalize()?;

        self.context
            .cast_ray(origin, direction, max_distance, true, query_filter(filter))
            .map(|(entity, toi)| RayHit {
                entity,
                point: origin + direction * toi,
                distance: toi,
            })
    }
}

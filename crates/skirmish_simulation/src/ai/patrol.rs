//! Patrol policy: выбор следующей WalkTarget.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::components::WalkTarget;
use crate::config::PatrolConfig;
use crate::error::{AgentError, DegenerateReason};
use crate::spatial::{SpatialQuery, MASK_GROUND_PROBE};

/// Сколько random точек пробуем за тик, прежде чем сдаться
pub const MAX_WALK_POINT_ATTEMPTS: u32 = 30;

/// Следующая patrol-точка (random с ground probe или фиксированный маршрут)
///
/// Ошибка = DegenerateConfiguration; вызывающий пропускает патруль на
/// этом тике и пробует снова на следующем.
pub fn next_walk_point(
    patrol: &PatrolConfig,
    position: Vec3,
    walk: &mut WalkTarget,
    spatial: &dyn SpatialQuery,
    rng: &mut impl Rng,
) -> Result<Vec3, AgentError> {
    match patrol {
        PatrolConfig::Random {
            range,
            probe_distance,
        } => random_walk_point(position, *range, *probe_distance, spatial, rng),
        PatrolConfig::FixedRoute { points } => {
            if points.is_empty() {
                return Err(AgentError::DegenerateConfiguration(
                    DegenerateReason::EmptyPatrolRoute,
                ));
            }

            let index = walk.route_index % points.len();
            walk.route_index = (index + 1) % points.len();
            Ok(Vec3::from_array(points[index]))
        }
    }
}

fn random_walk_point(
    position: Vec3,
    range: f32,
    probe_distance: f32,
    spatial: &dyn SpatialQuery,
    rng: &mut impl Rng,
) -> Result<Vec3, AgentError> {
    // gen_range паникует на пустом / не конечном диапазоне
    if !(range.is_finite() && range >= 0.0) {
        return Err(AgentError::DegenerateConfiguration(
            DegenerateReason::InvalidPatrolRange,
        ));
    }

    for _ in 0..MAX_WALK_POINT_ATTEMPTS {
        let offset_x = rng.gen_range(-range..=range);
        let offset_z = rng.gen_range(-range..=range);
        let candidate = position + Vec3::new(offset_x, 0.0, offset_z);

        // Под точкой должна быть земля (не пустота / не обрыв)
        if spatial
            .raycast(candidate, Vec3::NEG_Y, probe_distance, MASK_GROUND_PROBE)
            .is_some()
        {
            return Ok(candidate);
        }
    }

    Err(AgentError::DegenerateConfiguration(
        DegenerateReason::NoWalkableGround {
            attempts: MAX_WALK_POINT_ATTEMPTS,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{SpatialBody, SpatialSnapshot, LAYER_GROUND};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn floor(half_size: f32) -> SpatialSnapshot {
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(
            Entity::from_raw(1),
            Vec3::new(0.0, -0.5, 0.0),
            SpatialBody::cuboid(Vec3::new(half_size, 0.5, half_size), LAYER_GROUND),
        );
        snapshot
    }

    #[test]
    fn test_fixed_route_cycles() {
        let patrol = PatrolConfig::FixedRoute {
            points: vec![[0.0, 0.0, 0.0], [5.0, 0.0, 0.0], [5.0, 0.0, 5.0]],
        };
        let snapshot = SpatialSnapshot::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut walk = WalkTarget::default();

        let picked: Vec<Vec3> = (0..4)
            .map(|_| next_walk_point(&patrol, Vec3::ZERO, &mut walk, &snapshot, &mut rng))
            .collect::<Result<_, _>>()
            .expect("route has points");

        assert_eq!(
            picked,
            vec![
                Vec3::ZERO,
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 5.0),
                Vec3::ZERO,
            ]
        );
        assert_eq!(walk.route_index, 1);
    }

    #[test]
    fn test_empty_route_is_degenerate() {
        let patrol = PatrolConfig::FixedRoute { points: vec![] };
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = next_walk_point(
            &patrol,
            Vec3::ZERO,
            &mut WalkTarget::default(),
            &SpatialSnapshot::default(),
            &mut rng,
        );
        assert_eq!(
            result,
            Err(AgentError::DegenerateConfiguration(DegenerateReason::EmptyPatrolRoute))
        );
    }

    #[test]
    fn test_random_point_stays_in_range_over_ground() {
        let patrol = PatrolConfig::Random {
            range: 4.0,
            probe_distance: 2.0,
        };
        let snapshot = floor(50.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let origin = Vec3::new(2.0, 0.0, -3.0);

        for _ in 0..50 {
            let point = next_walk_point(&patrol, origin, &mut WalkTarget::default(), &snapshot, &mut rng)
                .expect("floor everywhere");
            assert!((point.x - origin.x).abs() <= 4.0);
            assert!((point.z - origin.z).abs() <= 4.0);
            assert_eq!(point.y, origin.y);
        }
    }

    #[test]
    fn test_random_point_gives_up_over_void() {
        let patrol = PatrolConfig::Random {
            range: 4.0,
            probe_distance: 2.0,
        };
        // Пол далеко: ни одна точка не над землёй
        let mut snapshot = SpatialSnapshot::default();
        snapshot.insert(
            Entity::from_raw(1),
            Vec3::new(100.0, -0.5, 100.0),
            SpatialBody::cuboid(Vec3::new(1.0, 0.5, 1.0), LAYER_GROUND),
        );
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let result = next_walk_point(&patrol, Vec3::ZERO, &mut WalkTarget::default(), &snapshot, &mut rng);
        assert_eq!(
            result,
            Err(AgentError::DegenerateConfiguration(DegenerateReason::NoWalkableGround {
                attempts: MAX_WALK_POINT_ATTEMPTS
            }))
        );
    }

    #[test]
    fn test_invalid_random_range_is_degenerate() {
        let snapshot = floor(50.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for range in [-2.0, f32::NAN, f32::INFINITY] {
            let patrol = PatrolConfig::Random {
                range,
                probe_distance: 2.0,
            };
            let result =
                next_walk_point(&patrol, Vec3::ZERO, &mut WalkTarget::default(), &snapshot, &mut rng);
            assert_eq!(
                result,
                Err(AgentError::DegenerateConfiguration(DegenerateReason::InvalidPatrolRange)),
                "range = {range}"
            );
        }
    }
}

//! Navigation adapter: MovementCommand → движение по ground plane.
//!
//! Headless замена navmesh агента движка: идём к цели по прямой в XZ со
//! скоростью MovementSpeed и поворачиваемся лицом по ходу движения (vision
//! cone следует за движением). Push-событий прибытия нет: AI сам проверяет
//! дистанцию через `has_arrived`.

use bevy::prelude::*;

use crate::components::{Locomotion, MovementCommand, MovementSpeed};
use crate::cues::{AnimationCue, AnimationState, LOCOMOTION_LAYER};
use crate::SimulationSet;

/// Arrival: ground-plane дистанция до точки
pub const ARRIVAL_DISTANCE: f32 = 1.0;

/// Ниже этой скорости агент считается стоящим (Idle анимация)
pub const LOCOMOTION_SPEED_THRESHOLD: f32 = 0.1;

/// Дистанция в XZ плоскости (высота не учитывается)
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    a.xz().distance(b.xz())
}

pub fn has_arrived(position: Vec3, point: Vec3) -> bool {
    planar_distance(position, point) <= ARRIVAL_DISTANCE
}

/// Один шаг к цели в XZ (высота агента сохраняется), без перелёта
pub fn step_towards(position: Vec3, target: Vec3, max_step: f32) -> Vec3 {
    let to_target = (target - position).with_y(0.0);
    let distance = to_target.length();

    if distance <= max_step {
        return Vec3::new(target.x, position.y, target.z);
    }
    position + to_target / distance * max_step
}

/// Headless навигация (последняя фаза тика)
pub struct NavigationPlugin;

impl Plugin for NavigationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnimationCue>().add_systems(
            FixedUpdate,
            follow_movement_commands.in_set(SimulationSet::Move),
        );
    }
}

/// Система: двигаем агентов по MovementCommand
pub fn follow_movement_commands(
    mut movers: Query<(
        Entity,
        &mut Transform,
        &MovementCommand,
        &MovementSpeed,
        &mut Locomotion,
    )>,
    time: Res<Time<Fixed>>,
    mut cues: EventWriter<AnimationCue>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, command, speed, mut locomotion) in movers.iter_mut() {
        let mut velocity = 0.0;

        if let Some(target) = command.destination() {
            let from = transform.translation;
            let to = step_towards(from, target, speed.speed * delta);
            let travelled = to - from;

            if travelled.length_squared() > f32::EPSILON {
                transform.translation = to;
                // Поворот лицом по ходу движения
                transform.look_to(travelled, Vec3::Y);
            }
            if delta > 0.0 {
                velocity = travelled.length() / delta;
            }
        }

        let moving = velocity > LOCOMOTION_SPEED_THRESHOLD;
        if moving != locomotion.moving {
            locomotion.moving = moving;
            cues.write(AnimationCue {
                entity,
                state: if moving {
                    AnimationState::Run
                } else {
                    AnimationState::Idle
                },
                layer: LOCOMOTION_LAYER,
            });
        }
    }
}

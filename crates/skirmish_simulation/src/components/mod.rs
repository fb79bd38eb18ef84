//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: Agent, Player, Health
//! - movement: навигация (MovementCommand, MovementSpeed, Locomotion)
//!
//! AI-состояние (Perception, WalkTarget, AlertInbox) живёт в `crate::ai`,
//! а combat (AttackCooldown, MeleeAttacker) в `crate::combat`.

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;

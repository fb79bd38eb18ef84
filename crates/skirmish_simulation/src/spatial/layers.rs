//! Collision categories: centralised constants для всего проекта.
//!
//! Категории = rapier `Group` битовые маски, чтобы headless snapshot и
//! rapier backend фильтровали одинаково:
//! - GROUP_1: Player
//! - GROUP_2: Agents (NPC)
//! - GROUP_3: Environment (стены, препятствия)
//! - GROUP_4: Ground (walkable поверхность для patrol probe)

use bevy_rapier3d::prelude::Group;

pub const LAYER_PLAYER: Group = Group::GROUP_1;

pub const LAYER_AGENTS: Group = Group::GROUP_2;

pub const LAYER_ENVIRONMENT: Group = Group::GROUP_3;

pub const LAYER_GROUND: Group = Group::GROUP_4;

/// Mask: vision raycast (игрок + то, что заслоняет обзор)
pub const MASK_VISION: Group = LAYER_PLAYER.union(LAYER_ENVIRONMENT);

/// Mask: patrol ground probe
pub const MASK_GROUND_PROBE: Group = LAYER_GROUND;

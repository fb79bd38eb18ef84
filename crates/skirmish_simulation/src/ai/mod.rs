//! AI decision-making module
//!
//! PerceptionSensor → AgentBehaviorState → (AlertChannel fan-out) →
//! Navigation / MeleeResolver. Поведение выводится из Perception каждый
//! тик, отдельного FSM state нет.

use bevy::prelude::*;

pub mod alert;
pub mod brain;
pub mod components;
pub mod events;
pub mod patrol;
pub mod sensing;
pub mod systems;


// Re-export основных типов
pub use brain::{AgentBrain, AttackOrder, PlayerTarget, Surroundings, TickOutcome};
pub use components::*;
pub use events::Announcement;
pub use systems::{AgentReady, Dormant};

use crate::spatial::{refresh_spatial_snapshot, SpatialBackend, SpatialSnapshot};
use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. (Sense) refresh snapshot → доставка announce → lifecycle
/// 2. (Decide) tick_agents: perception, behavior, announce, атаки
#[derive(Default)]
pub struct AIPlugin {
    pub backend: SpatialBackend,
}

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<Announcement>();

        match self.backend {
            SpatialBackend::Headless => {
                app.init_resource::<SpatialSnapshot>()
                    .add_systems(
                        FixedUpdate,
                        (
                            refresh_spatial_snapshot,
                            alert::deliver_announcements,
                            systems::check_agent_collaborators,
                        )
                            .chain()
                            .in_set(SimulationSet::Sense),
                    )
                    .add_systems(FixedUpdate, systems::tick_agents.in_set(SimulationSet::Decide));
            }
            #[cfg(feature = "rapier-backend")]
            SpatialBackend::Rapier => {
                app.add_systems(
                    FixedUpdate,
                    (alert::deliver_announcements, systems::check_agent_collaborators)
                        .chain()
                        .in_set(SimulationSet::Sense),
                )
                .add_systems(
                    FixedUpdate,
                    systems::tick_agents_rapier.in_set(SimulationSet::Decide),
                );
            }
        }
    }
}

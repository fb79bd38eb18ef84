//! Presentation cues: анимация и звук как fire-and-forget события.
//!
//! Симуляция не проигрывает клипы и звуки сама, она только сообщает
//! хосту (движку) что и на каком слое запустить.

use std::collections::HashMap;

use bevy::prelude::*;

/// Слой локомоции (Idle/Run)
pub const LOCOMOTION_LAYER: u32 = 0;
/// Слой атак (поверх локомоции)
pub const ATTACK_LAYER: u32 = 1;

/// Имя звука удара ножом
pub const SLASH_CUE: &str = "slash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    Idle,
    Run,
    StartPunch,
}

/// AnimationDriver.play(state, layer)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationCue {
    pub entity: Entity,
    pub state: AnimationState,
    pub layer: u32,
}

/// AudioCue.play(name)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioCue {
    pub entity: Entity,
    pub cue: &'static str,
}

/// Длительности animation clips (секунды), заполняются хостом до спавна агентов
///
/// Читается один раз при инициализации MeleeAttacker, в рантайме не нужен.
#[derive(Resource, Debug, Clone, Default)]
pub struct AnimationClips {
    durations: HashMap<String, f32>,
}

impl AnimationClips {
    pub fn with_clip(mut self, name: impl Into<String>, seconds: f32) -> Self {
        self.insert(name, seconds);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, seconds: f32) {
        self.durations.insert(name.into(), seconds);
    }

    pub fn duration(&self, name: &str) -> Option<f32> {
        self.durations.get(name).copied()
    }
}

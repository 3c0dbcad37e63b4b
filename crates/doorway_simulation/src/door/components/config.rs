//! Door authoring конфиг: тайминги, easing, audio cues, auto-close.
//!
//! Статичные данные: задаются до первого использования и не меняются
//! за время жизни двери.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tween::Easing;

/// Идентификатор audio clip'а (резолвится аудио-слоем хоста)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AudioCue(pub String);

impl AudioCue {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Конфиг перехода open/close
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Длительность поворота (секунды)
    pub duration: f32,
    pub easing: Easing,
    /// Звук в момент старта перехода
    pub audio_cue: Option<AudioCue>,
}

/// Конфиг мгновенного feedback (locked attempt, lock, unlock)
#[derive(Debug, Clone, Default, PartialEq, Reflect, Serialize, Deserialize)]
pub struct FeedbackConfig {
    pub audio_cue: Option<AudioCue>,
}

/// Параметры двери (authoring)
#[derive(Component, Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
#[serde(default)]
pub struct DoorConfig {
    pub open: TransitionConfig,
    pub close: TransitionConfig,
    pub locked_attempt: FeedbackConfig,
    pub on_lock: FeedbackConfig,
    pub on_unlock: FeedbackConfig,
    /// Auto-close через N секунд после Open (0 = выключено)
    pub auto_close_time: f32,
    /// Инвертирует знак `opening_direction`
    pub invert_open_direction: bool,
    /// Начальное состояние замка
    pub start_locked: bool,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            open: TransitionConfig {
                duration: 1.5,
                easing: Easing::EaseInOutSine,
                audio_cue: None,
            },
            close: TransitionConfig {
                duration: 0.9,
                easing: Easing::EaseOutSine,
                audio_cue: None,
            },
            locked_attempt: FeedbackConfig::default(),
            on_lock: FeedbackConfig::default(),
            on_unlock: FeedbackConfig::default(),
            auto_close_time: 0.0,
            invert_open_direction: false,
            start_locked: false,
        }
    }
}

impl DoorConfig {
    pub fn with_auto_close(mut self, seconds: f32) -> Self {
        self.auto_close_time = seconds;
        self
    }

    pub fn locked(mut self) -> Self {
        self.start_locked = true;
        self
    }

    pub fn inverted(mut self) -> Self {
        self.invert_open_direction = true;
        self
    }

    /// Auto-close включён только для положительной длительности
    pub fn auto_close_enabled(&self) -> bool {
        self.auto_close_time > 0.0
    }
}

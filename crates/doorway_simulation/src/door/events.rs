//! Door events: связь door core с хостом
//!
//! Door → хост: PlayClipAt (audio), DoorFeedback (callback sets)
//! Хост → Door: DoorCommand (внешние триггеры, скрипты)

use bevy::prelude::*;

use super::components::{AudioCue, FeedbackKind};

/// Event: проиграть clip в точке (fire-and-forget, без handle)
#[derive(Event, Debug, Clone, PartialEq)]
pub struct PlayClipAt {
    /// Дверь-источник
    pub door: Entity,
    pub cue: AudioCue,
    /// World position двери в момент перехода
    pub position: Vec3,
}

/// Event: feedback двери (multi-subscriber callback set)
///
/// Opened/Closed приходят по завершении поворота (ровно один раз на
/// незаменённый переход); LockedAttempt/Locked/Unlocked: в момент вызова.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorFeedback {
    pub door: Entity,
    pub kind: FeedbackKind,
}

/// Внешнее действие над дверью
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorAction {
    Open(i32),
    Close,
    Toggle(i32),
    SetLocked(bool),
}

/// Event: внешний триггер хочет управлять дверью
///
/// `target`: door entity или entity с `DoorHandle`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorCommand {
    pub target: Entity,
    pub action: DoorAction,
}

impl DoorCommand {
    pub fn new(target: Entity, action: DoorAction) -> Self {
        Self { target, action }
    }
}

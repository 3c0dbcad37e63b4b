//! Doorway Simulation Core
//!
//! Интерактивные двери на Bevy 0.16:
//! - Door: open/closed + locked state machine, направленное открытие,
//!   auto-close таймер, feedback events
//! - DoorHandle: прокси на дверь (коллайдер панели → door entity)
//! - InteractionProbe: raycast targeting (FixedUpdate) + rising edge
//!   invocation (Update)
//!
//! Хост (рендер, аудио, input) подключается через events и компоненты.

use bevy::prelude::*;

// Публичные модули
pub mod collision_layers;
pub mod door;
pub mod interaction;
pub mod logger;
pub mod tween;

// Re-export базовых типов для удобства
pub use door::{
    spawn_door, AudioCue, Door, DoorAction, DoorCommand, DoorConfig, DoorControl, DoorError,
    DoorFeedback, DoorHandle, DoorPanel, DoorPlugin, DoorSystems, DoorTarget, FeedbackKind,
    OpenDirection, OpenOutcome, PlayClipAt, TransitionKind,
};
pub use interaction::{
    spawn_interactor, InteractionInput, InteractionKey, InteractionPlugin, InteractionProbe,
    ProbeState,
};
pub use logger::{init_logger, log, log_error, log_info, log_warning, LogLevel};
pub use tween::{Easing, HingeAnimator, HingeTweenFinished};

/// Главный plugin (двери + interaction probe)
pub struct DoorwayPlugin;

impl Plugin for DoorwayPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для targeting (physics rate)
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins((DoorPlugin, InteractionPlugin));
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Без рендера и physics: probe'ы без rapier context остаются в NoTarget,
/// target можно поставить вручную (`InteractionProbe::set_target`).
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins((MinimalPlugins, TransformPlugin))
        .insert_resource(Time::<Fixed>::from_hz(60.0)); // 60Hz FixedUpdate

    app
}

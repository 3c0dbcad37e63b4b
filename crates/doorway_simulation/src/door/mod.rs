//! Door module
//!
//! ECS ответственность:
//! - State: Door (open/closed + locked), auto-close таймер
//! - Rules: направление открытия, отказ по замку, отмена in-flight переходов
//! - Events: PlayClipAt, DoorFeedback (наружу), DoorCommand (внутрь)
//!
//! Визуальный поворот: `tween::HingeAnimator` (rotation service).

use bevy::prelude::*;

pub mod components;
pub mod control;
pub mod error;
pub mod events;
pub mod systems;


// Re-export основных типов
pub use components::*;
pub use control::{DoorControl, DoorHandle, DoorMut, DoorRef, DoorResolver, DoorTarget, Doors, HandleMut};
pub use error::DoorError;
pub use events::{DoorAction, DoorCommand, DoorFeedback, PlayClipAt};
pub use systems::{spawn_door, DoorPanel};

use crate::tween::{advance_hinge_tweens, HingeTweenFinished};

/// System sets двери (Update), выполняются по порядку
///
/// Advance продвигает уже идущие переходы и таймеры на delta кадра,
/// Apply стартует новые. Переход, начатый в кадре, не получает delta
/// этого кадра (время до старта не засчитывается).
/// InteractionPlugin ставит invocation между ними.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DoorSystems {
    Advance,
    Apply,
}

/// Door Plugin
///
/// Порядок выполнения (Update, variable rate):
/// 1. advance_hinge_tweens: rotation service
/// 2. announce_finished_transitions: completion → DoorFeedback
/// 3. tick_auto_close: auto-close таймеры (close стартует с 0)
/// 4. apply_door_commands: внешние триггеры
pub struct DoorPlugin;

impl Plugin for DoorPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<Door>()
            .register_type::<DoorConfig>()
            .register_type::<DoorHandle>();

        // Регистрация событий
        app.add_event::<DoorCommand>()
            .add_event::<DoorFeedback>()
            .add_event::<PlayClipAt>()
            .add_event::<HingeTweenFinished>();

        app.configure_sets(Update, (DoorSystems::Advance, DoorSystems::Apply).chain());

        app.add_systems(
            Update,
            (
                advance_hinge_tweens,
                systems::announce_finished_transitions,
                systems::tick_auto_close,
            )
                .chain() // Последовательное выполнение
                .in_set(DoorSystems::Advance),
        );

        app.add_systems(Update, systems::apply_door_commands.in_set(DoorSystems::Apply));
    }
}

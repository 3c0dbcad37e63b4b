//! Interaction module
//!
//! Агент (игрок) с `InteractionProbe` смотрит вперёд, находит дверь
//! raycast'ом и по rising edge interaction input переключает её.
//!
//! Targeting идёт с physics rate (FixedUpdate), invocation с input rate
//! (Update): фазы общаются только через `ProbeState`.

use bevy::prelude::*;

pub mod probe;


pub use probe::{
    interact, probe_step, spawn_interactor, DoorProbeBackend, InteractionInput, InteractionKey,
    InteractionProbe, ProbeState,
};

use crate::door::DoorSystems;

/// Interaction Plugin
///
/// - FixedUpdate: update_probe_targets (raycast → target)
/// - Update: read_interaction_keys → invoke_interactions, между
///   DoorSystems::Advance и DoorSystems::Apply
pub struct InteractionPlugin;

impl Plugin for InteractionPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<InteractionProbe>()
            .register_type::<InteractionInput>()
            .register_type::<InteractionKey>();

        app.add_systems(FixedUpdate, probe::update_probe_targets);

        app.add_systems(
            Update,
            (probe::read_interaction_keys, probe::invoke_interactions)
                .chain()
                .after(DoorSystems::Advance)
                .before(DoorSystems::Apply),
        );
    }
}

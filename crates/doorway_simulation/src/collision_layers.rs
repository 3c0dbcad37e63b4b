//! Collision Groups Constants
//!
//! Rapier collision groups: централизованные константы для всего проекта.
//!
//! ## Архитектура:
//! - **Memberships:** на каком слое находится коллайдер
//! - **Filters:** с какими слоями коллайдер/raycast взаимодействует
//!
//! ## Groups:
//! - GROUP_1: Reserved
//! - GROUP_2: Actors (игрок, NPC)
//! - GROUP_3: Environment (стены, статика)
//! - GROUP_4: Doors (панели дверей с `DoorHandle`)

use bevy_rapier3d::prelude::{CollisionGroups, Group};

/// Actors (игрок, NPC)
pub const COLLISION_GROUP_ACTORS: Group = Group::GROUP_2;

/// Environment (стены, препятствия)
pub const COLLISION_GROUP_ENVIRONMENT: Group = Group::GROUP_3;

/// Door panels: то, во что целится InteractionProbe
pub const COLLISION_GROUP_DOORS: Group = Group::GROUP_4;

/// Filter по умолчанию для door probe: только двери
pub const DOOR_PROBE_FILTER: Group = COLLISION_GROUP_DOORS;

/// Collision groups для дверной панели
///
/// Панель коллайдит с актёрами (не пройти сквозь закрытую дверь)
/// и отвечает на door probe.
pub fn door_panel_groups() -> CollisionGroups {
    CollisionGroups::new(
        COLLISION_GROUP_DOORS,
        COLLISION_GROUP_ACTORS.union(COLLISION_GROUP_DOORS),
    )
}

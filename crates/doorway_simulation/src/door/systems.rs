//! Door systems + spawn helper.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use super::components::{Door, DoorConfig, FeedbackKind, OpenOutcome, TransitionKind};
use super::control::{DoorControl, DoorHandle, Doors};
use super::events::{DoorAction, DoorCommand, DoorFeedback};
use crate::collision_layers::door_panel_groups;
use crate::logger;
use crate::tween::{HingeAnimator, HingeTweenFinished};

/// Система: внешние DoorCommand → операции над дверью
///
/// Target может быть дверью или handle'ом. Устаревшие target'ы и отказы
/// логируются, но не являются фатальными.
pub fn apply_door_commands(mut commands: EventReader<DoorCommand>, mut doors: Doors) {
    for command in commands.read() {
        let mut door = match doors.control_entity(command.target) {
            Ok(door) => door,
            Err(err) => {
                logger::log_warning(&format!("DoorCommand {:?} ignored: {}", command.action, err));
                continue;
            }
        };

        match command.action {
            DoorAction::Open(dir) => match door.try_open(dir) {
                Ok(OpenOutcome::Opened) => {}
                Ok(OpenOutcome::DeniedByLock) => {
                    logger::log_info(&format!(
                        "DoorCommand: door {:?} is locked, open denied",
                        command.target
                    ));
                }
                Err(err) => {
                    logger::log_error(&format!("DoorCommand on {:?}: {}", command.target, err));
                }
            },
            DoorAction::Close => door.close(),
            DoorAction::Toggle(dir) => {
                if !door.toggle_state(dir) {
                    logger::log_info(&format!(
                        "DoorCommand: toggle({}) on {:?} rejected",
                        dir, command.target
                    ));
                }
            }
            DoorAction::SetLocked(locked) => door.set_locked(locked),
        }
    }
}

/// Система: auto-close таймеры (variable-rate фаза, Update)
pub fn tick_auto_close(time: Res<Time>, mut doors: Doors) {
    for door in doors.tick_auto_close(time.delta()) {
        logger::log(&format!("Door {:?} auto-closed", door));
    }
}

/// Система: completion поворота петли → OnFinished feedback двери
pub fn announce_finished_transitions(
    mut finished_events: EventReader<HingeTweenFinished>,
    doors: Query<(&Door, Option<&Name>)>,
    mut feedback_events: EventWriter<DoorFeedback>,
) {
    for finished in finished_events.read() {
        let Ok((door, name)) = doors.get(finished.door) else {
            continue;
        };

        let (kind, verb) = match finished.kind {
            TransitionKind::Open => (FeedbackKind::Opened, "opening"),
            TransitionKind::Close => (FeedbackKind::Closed, "closing"),
        };

        logger::log(&format!(
            "Door {} ({}) finished {} [{}]",
            door.id,
            name.map(Name::as_str).unwrap_or("unnamed"),
            verb,
            finished.kind.name()
        ));

        feedback_events.write(DoorFeedback {
            door: finished.door,
            kind,
        });
    }
}

/// Геометрия дверной панели
#[derive(Debug, Clone, Copy)]
pub struct DoorPanel {
    /// Половинные размеры коллайдера (ширина, высота, толщина)
    pub half_extents: Vec3,
}

impl Default for DoorPanel {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(0.5, 1.0, 0.05), // 1m x 2m x 10cm
        }
    }
}

/// Спавнит дверь: door entity → hinge (child) → panel (child hinge)
///
/// Панель несёт коллайдер и `DoorHandle`: raycast попадает в панель,
/// а состояние живёт на door entity. Петля на краю панели.
pub fn spawn_door(
    commands: &mut Commands,
    id: u32,
    transform: Transform,
    config: DoorConfig,
    panel: DoorPanel,
) -> Entity {
    let door = commands.spawn_empty().id();

    let hinge = commands
        .spawn((Name::new(format!("Door {} hinge", id)), Transform::default()))
        .id();

    let panel_entity = commands
        .spawn((
            Name::new(format!("Door {} panel", id)),
            Transform::from_xyz(panel.half_extents.x, panel.half_extents.y, 0.0),
            Collider::cuboid(
                panel.half_extents.x,
                panel.half_extents.y,
                panel.half_extents.z,
            ),
            door_panel_groups(),
            DoorHandle::new(door),
        ))
        .id();

    commands.entity(hinge).add_child(panel_entity);

    commands
        .entity(door)
        .insert((
            Name::new(format!("Door {}", id)),
            Door::new(id, &config),
            config,
            transform,
            HingeAnimator::new(hinge),
        ))
        .add_child(hinge);

    door
}

//! Door capability contract + ECS адаптер
//!
//! Архитектура:
//! - `DoorControl`: единый набор операций над дверью (lock, toggle, open,
//!   close, opening direction). InteractionProbe знает только его.
//! - `DoorHandle`: компонент-прокси: entity (обычно коллайдер панели),
//!   которая форвардит всё в реальную дверь. Своего состояния нет.
//! - `DoorTarget`: tagged union "куда смотрит вызывающий": дверь напрямую
//!   или handle → дверь.
//! - `Doors`: SystemParam, выдающий `DoorRef` (реализацию `DoorControl`)
//!   по target'у; побочные эффекты уходят в events + HingeAnimator.

use std::time::Duration;

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use super::components::{
    opening_direction, AudioCue, Door, DoorConfig, DoorEffects, FeedbackKind, OpenOutcome,
    TransitionConfig, TransitionKind,
};
use super::events::{DoorFeedback, PlayClipAt};
use super::DoorError;
use crate::logger;
use crate::tween::HingeAnimator;

/// Capability contract двери
///
/// Реализуют `DoorMut` (дверь напрямую) и `HandleMut` (через прокси).
pub trait DoorControl {
    fn is_locked(&self) -> bool;

    /// Присвоение замка; feedback срабатывает на каждое присвоение
    fn set_locked(&mut self, locked: bool);

    fn toggle_state(&mut self, dir: i32) -> bool;

    fn open(&mut self, dir: i32) -> bool;

    fn close(&mut self);

    /// -1 / +1 по взгляду агента, 0 если взгляд ортогонален двери
    fn opening_direction(&self, forward: Vec3) -> i32;
}

/// Прокси на дверь
///
/// Позволяет адресовать дверь через другую entity (коллайдер панели,
/// trigger volume), не зная, где живёт состояние.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct DoorHandle {
    door: Entity,
}

impl DoorHandle {
    pub fn new(door: Entity) -> Self {
        debug_assert!(
            door != Entity::PLACEHOLDER,
            "DoorHandle must reference a door entity"
        );
        Self { door }
    }

    pub fn door(&self) -> Entity {
        self.door
    }
}

/// Разрешённая цель: дверь напрямую или через handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum DoorTarget {
    Door(Entity),
    Handle { handle: Entity, door: Entity },
}

impl DoorTarget {
    /// Entity, владеющая состоянием двери
    pub fn door(&self) -> Entity {
        match self {
            DoorTarget::Door(door) => *door,
            DoorTarget::Handle { door, .. } => *door,
        }
    }

    /// Entity, через которую к двери обратились
    pub fn addressed(&self) -> Entity {
        match self {
            DoorTarget::Door(door) => *door,
            DoorTarget::Handle { handle, .. } => *handle,
        }
    }
}

/// Read-only резолвер entity → DoorTarget
#[derive(SystemParam)]
pub struct DoorResolver<'w, 's> {
    doors: Query<'w, 's, (), With<Door>>,
    handles: Query<'w, 's, &'static DoorHandle>,
}

impl DoorResolver<'_, '_> {
    pub fn resolve(&self, entity: Entity) -> Result<DoorTarget, DoorError> {
        if self.doors.contains(entity) {
            return Ok(DoorTarget::Door(entity));
        }

        let Ok(handle) = self.handles.get(entity) else {
            return Err(DoorError::NotADoor(entity));
        };

        if self.doors.contains(handle.door()) {
            Ok(DoorTarget::Handle {
                handle: entity,
                door: handle.door(),
            })
        } else {
            Err(DoorError::StaleReference(entity))
        }
    }

    /// Target всё ещё указывает на живую дверь (handle не перенаправлен)
    pub fn is_live(&self, target: DoorTarget) -> bool {
        self.resolve(target.addressed()) == Ok(target)
    }
}

/// SystemParam: мутабельный доступ к дверям через capability contract
#[derive(SystemParam)]
pub struct Doors<'w, 's> {
    resolver: DoorResolver<'w, 's>,
    doors: Query<
        'w,
        's,
        (
            Entity,
            &'static mut Door,
            &'static DoorConfig,
            &'static GlobalTransform,
            &'static mut HingeAnimator,
        ),
    >,
    clips: EventWriter<'w, PlayClipAt>,
    feedback: EventWriter<'w, DoorFeedback>,
}

impl<'w, 's> Doors<'w, 's> {
    pub fn resolve(&self, entity: Entity) -> Result<DoorTarget, DoorError> {
        self.resolver.resolve(entity)
    }

    pub fn is_live(&self, target: DoorTarget) -> bool {
        self.resolver.is_live(target)
    }

    /// DoorRef для уже разрешённого target'а; None если target устарел
    pub fn control(&mut self, target: DoorTarget) -> Option<DoorRef<'_, 'w>> {
        if !self.resolver.is_live(target) {
            return None;
        }

        let door = self.door_mut(target.door())?;

        Some(match target {
            DoorTarget::Door(_) => DoorRef::Door(door),
            DoorTarget::Handle { .. } => DoorRef::Handle(HandleMut { door }),
        })
    }

    /// Resolve + control одним вызовом
    pub fn control_entity(&mut self, entity: Entity) -> Result<DoorRef<'_, 'w>, DoorError> {
        let target = self.resolve(entity)?;
        self.control(target).ok_or(DoorError::StaleReference(entity))
    }

    /// Продвигает auto-close таймеры всех дверей
    ///
    /// Возвращает двери, закрывшиеся по таймеру на этом шаге.
    pub fn tick_auto_close(&mut self, delta: Duration) -> Vec<Entity> {
        let mut closed = Vec::new();

        for (entity, mut door, config, transform, mut animator) in self.doors.iter_mut() {
            if !door.has_pending_auto_close() {
                continue;
            }

            let mut effects = EcsDoorEffects {
                door: entity,
                position: transform.translation(),
                animator: &mut *animator,
                clips: &mut self.clips,
                feedback: &mut self.feedback,
            };

            if door.tick_auto_close(delta, config, &mut effects) {
                closed.push(entity);
            }
        }

        closed
    }

    fn door_mut(&mut self, entity: Entity) -> Option<DoorMut<'_, 'w>> {
        let (entity, door, config, transform, animator) = self.doors.get_mut(entity).ok()?;

        Some(DoorMut {
            door: door.into_inner(),
            config,
            forward: transform.forward().as_vec3(),
            effects: EcsDoorEffects {
                door: entity,
                position: transform.translation(),
                animator: animator.into_inner(),
                clips: &mut self.clips,
                feedback: &mut self.feedback,
            },
        })
    }
}

/// DoorEffects поверх ECS: events + HingeAnimator двери
pub struct EcsDoorEffects<'a, 'w> {
    door: Entity,
    position: Vec3,
    animator: &'a mut HingeAnimator,
    clips: &'a mut EventWriter<'w, PlayClipAt>,
    feedback: &'a mut EventWriter<'w, DoorFeedback>,
}

impl DoorEffects for EcsDoorEffects<'_, '_> {
    fn play_clip(&mut self, cue: &AudioCue) {
        self.clips.write(PlayClipAt {
            door: self.door,
            cue: cue.clone(),
            position: self.position,
        });
    }

    fn rotate_hinge(&mut self, kind: TransitionKind, angle: f32, transition: &TransitionConfig) {
        self.animator
            .rotate_to(kind, angle, transition.duration, transition.easing);
    }

    fn stop_hinge(&mut self, kind: TransitionKind) {
        self.animator.stop(kind);
    }

    fn feedback(&mut self, kind: FeedbackKind) {
        self.feedback.write(DoorFeedback {
            door: self.door,
            kind,
        });
    }
}

/// Дверь напрямую
pub struct DoorMut<'a, 'w> {
    door: &'a mut Door,
    config: &'a DoorConfig,
    /// Forward ось двери (world space)
    forward: Vec3,
    effects: EcsDoorEffects<'a, 'w>,
}

impl DoorMut<'_, '_> {
    pub fn is_open(&self) -> bool {
        self.door.is_open()
    }

    pub fn try_open(&mut self, dir: i32) -> Result<OpenOutcome, DoorError> {
        self.door.try_open(dir, self.config, &mut self.effects)
    }
}

impl DoorControl for DoorMut<'_, '_> {
    fn is_locked(&self) -> bool {
        self.door.is_locked()
    }

    fn set_locked(&mut self, locked: bool) {
        self.door.set_locked(locked, self.config, &mut self.effects);
        logger::log(&format!(
            "Door {} {}",
            self.door.id,
            if locked { "locked" } else { "unlocked" }
        ));
    }

    fn toggle_state(&mut self, dir: i32) -> bool {
        self.door.toggle_state(dir, self.config, &mut self.effects)
    }

    fn open(&mut self, dir: i32) -> bool {
        self.door.open(dir, self.config, &mut self.effects)
    }

    fn close(&mut self) {
        self.door.close(self.config, &mut self.effects);
    }

    fn opening_direction(&self, forward: Vec3) -> i32 {
        opening_direction(self.forward, forward, self.config.invert_open_direction)
    }
}

/// Дверь через прокси: чистый форвардинг, без своего состояния
pub struct HandleMut<D> {
    door: D,
}

impl<D: DoorControl> DoorControl for HandleMut<D> {
    fn is_locked(&self) -> bool {
        self.door.is_locked()
    }

    fn set_locked(&mut self, locked: bool) {
        self.door.set_locked(locked);
    }

    fn toggle_state(&mut self, dir: i32) -> bool {
        self.door.toggle_state(dir)
    }

    fn open(&mut self, dir: i32) -> bool {
        self.door.open(dir)
    }

    fn close(&mut self) {
        self.door.close();
    }

    fn opening_direction(&self, forward: Vec3) -> i32 {
        self.door.opening_direction(forward)
    }
}

/// Результат `Doors::control`: dispatch по варианту target'а
pub enum DoorRef<'a, 'w> {
    Door(DoorMut<'a, 'w>),
    Handle(HandleMut<DoorMut<'a, 'w>>),
}

impl<'a, 'w> DoorRef<'a, 'w> {
    /// Дверь, до которой дошёл вызов
    pub fn door(&self) -> &DoorMut<'a, 'w> {
        match self {
            DoorRef::Door(door) => door,
            DoorRef::Handle(handle) => &handle.door,
        }
    }

    pub fn is_open(&self) -> bool {
        self.door().is_open()
    }

    pub fn try_open(&mut self, dir: i32) -> Result<OpenOutcome, DoorError> {
        match self {
            DoorRef::Door(door) => door.try_open(dir),
            DoorRef::Handle(handle) => handle.door.try_open(dir),
        }
    }
}

impl DoorControl for DoorRef<'_, '_> {
    fn is_locked(&self) -> bool {
        match self {
            DoorRef::Door(door) => door.is_locked(),
            DoorRef::Handle(handle) => handle.is_locked(),
        }
    }

    fn set_locked(&mut self, locked: bool) {
        match self {
            DoorRef::Door(door) => door.set_locked(locked),
            DoorRef::Handle(handle) => handle.set_locked(locked),
        }
    }

    fn toggle_state(&mut self, dir: i32) -> bool {
        match self {
            DoorRef::Door(door) => door.toggle_state(dir),
            DoorRef::Handle(handle) => handle.toggle_state(dir),
        }
    }

    fn open(&mut self, dir: i32) -> bool {
        match self {
            DoorRef::Door(door) => door.open(dir),
            DoorRef::Handle(handle) => handle.open(dir),
        }
    }

    fn close(&mut self) {
        match self {
            DoorRef::Door(door) => door.close(),
            DoorRef::Handle(handle) => handle.close(),
        }
    }

    fn opening_direction(&self, forward: Vec3) -> i32 {
        match self {
            DoorRef::Door(door) => door.opening_direction(forward),
            DoorRef::Handle(handle) => handle.opening_direction(forward),
        }
    }
}

//! Hinge rotation service
//!
//! Именованные, отменяемые, ограниченные по времени повороты петли двери.
//! Имя tween'а = `TransitionKind` (open/close): старт нового tween'а с тем же
//! именем заменяет старый, `stop(kind)` отменяет in-flight tween, и его
//! completion уже никогда не придёт.
//!
//! Поворот всегда вокруг локальной оси Y hinge entity.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_math::curve::{Curve, EaseFunction};
use serde::{Deserialize, Serialize};

use crate::door::TransitionKind;

#[cfg(test)]
mod hinge_tests;

/// Easing кривые, доступные для authoring
///
/// Конвертируются в `EaseFunction` из bevy_math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    EaseInSine,
    EaseOutSine,
    #[default]
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
}

impl From<Easing> for EaseFunction {
    fn from(easing: Easing) -> Self {
        match easing {
            Easing::Linear => EaseFunction::Linear,
            Easing::EaseInSine => EaseFunction::SineIn,
            Easing::EaseOutSine => EaseFunction::SineOut,
            Easing::EaseInOutSine => EaseFunction::SineInOut,
            Easing::EaseInQuad => EaseFunction::QuadraticIn,
            Easing::EaseOutQuad => EaseFunction::QuadraticOut,
            Easing::EaseInOutQuad => EaseFunction::QuadraticInOut,
            Easing::EaseInCubic => EaseFunction::CubicIn,
            Easing::EaseOutCubic => EaseFunction::CubicOut,
            Easing::EaseInOutCubic => EaseFunction::CubicInOut,
        }
    }
}

impl Easing {
    /// Eased progress для линейного `t` (clamp в [0, 1])
    pub fn sample(self, t: f32) -> f32 {
        EaseFunction::from(self).sample_clamped(t.clamp(0.0, 1.0))
    }
}

/// Один in-flight поворот (градусы, локальный yaw)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeTween {
    from: f32,
    to: f32,
    /// Длительность (секунды)
    duration: f32,
    elapsed: f32,
    easing: Easing,
}

impl HingeTween {
    /// NaN, бесконечная и отрицательная длительность = мгновенный поворот
    pub fn new(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };

        Self {
            from,
            to,
            duration,
            elapsed: 0.0,
            easing,
        }
    }

    /// Линейный прогресс [0, 1]; zero-duration tween сразу завершён
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }

    /// Текущий угол с учётом easing
    pub fn angle(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.sample(self.progress())
    }

    pub fn advance(&mut self, delta: f32) -> f32 {
        self.elapsed += delta.max(0.0);
        self.angle()
    }
}

/// Rotation service одной двери
///
/// Живёт на door entity, вращает отдельную hinge entity (child).
/// Каждая дверь эксклюзивно владеет своими tween'ами.
#[derive(Component, Debug, Clone)]
pub struct HingeAnimator {
    /// Entity, чей локальный Transform поворачиваем
    pub hinge: Entity,
    /// Текущий yaw петли (градусы)
    angle: f32,
    tweens: HashMap<TransitionKind, HingeTween>,
}

impl HingeAnimator {
    pub fn new(hinge: Entity) -> Self {
        Self {
            hinge,
            angle: 0.0,
            tweens: HashMap::new(),
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// RotateTo: запускает tween с именем `kind` из текущего угла
    ///
    /// Tween с тем же именем заменяется (его completion не придёт).
    pub fn rotate_to(&mut self, kind: TransitionKind, angle: f32, duration: f32, easing: Easing) {
        self.tweens
            .insert(kind, HingeTween::new(self.angle, angle, duration, easing));
    }

    /// StopByName: отменяет tween; отмена отсутствующего: no-op
    pub fn stop(&mut self, kind: TransitionKind) -> bool {
        self.tweens.remove(&kind).is_some()
    }

    pub fn is_running(&self, kind: TransitionKind) -> bool {
        self.tweens.contains_key(&kind)
    }

    pub fn is_idle(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Продвигает все tween'ы на `delta` секунд
    ///
    /// Возвращает имена завершившихся tween'ов (каждый ровно один раз).
    /// Порядок обхода фиксирован (TransitionKind::ALL) для детерминизма.
    pub fn advance(&mut self, delta: f32) -> Vec<TransitionKind> {
        let mut finished = Vec::new();

        for kind in TransitionKind::ALL {
            let Some(tween) = self.tweens.get_mut(&kind) else {
                continue;
            };

            self.angle = tween.advance(delta);

            if tween.is_finished() {
                self.tweens.remove(&kind);
                finished.push(kind);
            }
        }

        finished
    }
}

/// Event: hinge tween завершился (completion callback rotation service)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HingeTweenFinished {
    pub door: Entity,
    pub kind: TransitionKind,
}

/// Система: advance hinge tweens → локальный rotation hinge entity
///
/// Работает в Update (variable rate), время = `Time` (virtual).
pub fn advance_hinge_tweens(
    time: Res<Time>,
    mut animators: Query<(Entity, &mut HingeAnimator)>,
    mut hinges: Query<&mut Transform>,
    mut finished_events: EventWriter<HingeTweenFinished>,
) {
    let delta = time.delta_secs();

    for (door, mut animator) in animators.iter_mut() {
        if animator.is_idle() {
            continue;
        }

        let finished = animator.advance(delta);

        if let Ok(mut hinge_transform) = hinges.get_mut(animator.hinge) {
            hinge_transform.rotation = Quat::from_rotation_y(animator.angle().to_radians());
        }

        for kind in finished {
            finished_events.write(HingeTweenFinished { door, kind });
        }
    }
}

//! Door state machine: Closed/Open + ортогональный флаг Locked.
//!
//! Door сам по себе не знает про ECS events/tween'ы: все побочные эффекты
//! (звук, поворот петли, feedback) идут через `DoorEffects`. ECS адаптер
//! живёт в `door::control`, тесты используют recording sink.

use std::time::Duration;

use bevy::prelude::*;

use super::config::{AudioCue, DoorConfig, FeedbackConfig, TransitionConfig};
use crate::door::DoorError;
use crate::logger;

/// Угол полностью открытой двери (градусы, умножается на направление)
pub const OPEN_ANGLE_DEGREES: f32 = 90.0;

/// Угол закрытой двери
pub const CLOSED_ANGLE_DEGREES: f32 = 0.0;

/// Вид перехода: он же имя in-flight tween'а
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum TransitionKind {
    Open,
    Close,
}

impl TransitionKind {
    pub const ALL: [TransitionKind; 2] = [TransitionKind::Open, TransitionKind::Close];

    pub fn name(self) -> &'static str {
        match self {
            TransitionKind::Open => "openDoor",
            TransitionKind::Close => "closeDoor",
        }
    }

    /// Противоположный переход (его tween останавливаем при старте)
    pub fn opposite(self) -> Self {
        match self {
            TransitionKind::Open => TransitionKind::Close,
            TransitionKind::Close => TransitionKind::Open,
        }
    }
}

/// Точки, в которых дверь дёргает callback set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum FeedbackKind {
    /// Поворот open завершился (OnFinished)
    Opened,
    /// Поворот close завершился (OnFinished)
    Closed,
    /// Попытка открыть запертую дверь
    LockedAttempt,
    /// Присвоение `locked = true`
    Locked,
    /// Присвоение `locked = false`
    Unlocked,
}

/// Направление открытия (+1 / -1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum OpenDirection {
    Positive,
    Negative,
}

impl OpenDirection {
    pub fn sign(self) -> i32 {
        match self {
            OpenDirection::Positive => 1,
            OpenDirection::Negative => -1,
        }
    }
}

impl TryFrom<i32> for OpenDirection {
    type Error = DoorError;

    fn try_from(dir: i32) -> Result<Self, Self::Error> {
        match dir {
            1 => Ok(OpenDirection::Positive),
            -1 => Ok(OpenDirection::Negative),
            other => Err(DoorError::InvalidDirection(other)),
        }
    }
}

/// Нормальные (не ошибочные) исходы Open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// Дверь заперта: состояние не менялось, сработал locked feedback
    DeniedByLock,
}

/// Побочные эффекты двери (rotation service, audio, callback sinks)
pub trait DoorEffects {
    /// PlayClipAt в позиции двери, fire-and-forget
    fn play_clip(&mut self, cue: &AudioCue);

    /// RotateTo: именованный поворот петли к `angle` (градусы)
    fn rotate_hinge(&mut self, kind: TransitionKind, angle: f32, transition: &TransitionConfig);

    /// StopByName: отмена in-flight поворота с этим именем
    fn stop_hinge(&mut self, kind: TransitionKind);

    /// Дёрнуть callback set
    fn feedback(&mut self, kind: FeedbackKind);
}

/// Направление открытия относительно взгляда агента
///
/// `agent_forward` проецируется на горизонталь (y = 0) и нормализуется,
/// затем dot с forward осью двери: dot > 0 → -1, dot < 0 → +1, иначе 0.
/// `invert` переворачивает знак.
pub fn opening_direction(door_forward: Vec3, agent_forward: Vec3, invert: bool) -> i32 {
    let flat = Vec3::new(agent_forward.x, 0.0, agent_forward.z).normalize_or_zero();
    let dot = flat.dot(door_forward);

    let dir = if dot > 0.0 {
        -1
    } else if dot < 0.0 {
        1
    } else {
        0
    };

    if invert {
        -dir
    } else {
        dir
    }
}

/// Дверь
///
/// Инварианты:
/// - `is_open` выставляется в момент старта open/close (не по завершении поворота)
/// - Open + Locked недостижимо: Open на запертой двери отклоняется
/// - максимум один auto-close таймер, им владеет только эта дверь
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Door {
    /// Debug идентификатор (логи)
    pub id: u32,
    is_open: bool,
    is_locked: bool,
    /// Последнее направление открытия (None до первого Open)
    open_direction: Option<OpenDirection>,
    #[reflect(ignore)]
    auto_close: Option<Timer>,
}

impl Door {
    /// Новая закрытая дверь; начальный замок из конфига (без feedback)
    pub fn new(id: u32, config: &DoorConfig) -> Self {
        Self {
            id,
            is_locked: config.start_locked,
            ..Default::default()
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn open_direction(&self) -> Option<OpenDirection> {
        self.open_direction
    }

    pub fn has_pending_auto_close(&self) -> bool {
        self.auto_close.is_some()
    }

    /// Open с явным результатом
    ///
    /// Ошибка только одна: невалидное направление (состояние не трогаем).
    pub fn try_open(
        &mut self,
        dir: i32,
        config: &DoorConfig,
        effects: &mut impl DoorEffects,
    ) -> Result<OpenOutcome, DoorError> {
        let direction = OpenDirection::try_from(dir)?;

        if self.is_locked {
            trigger(&config.locked_attempt, FeedbackKind::LockedAttempt, effects);
            return Ok(OpenOutcome::DeniedByLock);
        }

        self.cancel_auto_close();

        start_transition(
            TransitionKind::Open,
            OPEN_ANGLE_DEGREES * direction.sign() as f32,
            &config.open,
            effects,
        );
        self.is_open = true;
        self.open_direction = Some(direction);

        if config.auto_close_enabled() {
            // Неконвертируемое время (inf, слишком большое) = auto-close выключен
            match Duration::try_from_secs_f32(config.auto_close_time) {
                Ok(delay) => self.auto_close = Some(Timer::new(delay, TimerMode::Once)),
                Err(err) => logger::log_warning(&format!(
                    "Door {}: auto-close disabled, bad auto_close_time {}: {}",
                    self.id, config.auto_close_time, err
                )),
            }
        }

        Ok(OpenOutcome::Opened)
    }

    /// Open: true только если дверь реально начала открываться
    ///
    /// Невалидное направление логируется и поглощается.
    pub fn open(&mut self, dir: i32, config: &DoorConfig, effects: &mut impl DoorEffects) -> bool {
        match self.try_open(dir, config, effects) {
            Ok(outcome) => outcome == OpenOutcome::Opened,
            Err(err) => {
                logger::log_error(&format!("Door {}: {}", self.id, err));
                false
            }
        }
    }

    /// Close: всегда успешен, повторный Close перезапускает звук/поворот
    pub fn close(&mut self, config: &DoorConfig, effects: &mut impl DoorEffects) {
        self.cancel_auto_close();

        start_transition(TransitionKind::Close, CLOSED_ANGLE_DEGREES, &config.close, effects);
        self.is_open = false;
    }

    /// Чистый dispatch: открыта → Close (true), иначе → Open(dir)
    pub fn toggle_state(
        &mut self,
        dir: i32,
        config: &DoorConfig,
        effects: &mut impl DoorEffects,
    ) -> bool {
        if self.is_open {
            self.close(config, effects);
            true
        } else {
            self.open(dir, config, effects)
        }
    }

    /// Setter замка: feedback на КАЖДОЕ присвоение, даже того же значения
    pub fn set_locked(&mut self, locked: bool, config: &DoorConfig, effects: &mut impl DoorEffects) {
        self.is_locked = locked;

        if locked {
            trigger(&config.on_lock, FeedbackKind::Locked, effects);
        } else {
            trigger(&config.on_unlock, FeedbackKind::Unlocked, effects);
        }
    }

    /// Продвигает auto-close таймер; true если дверь закрылась по таймеру
    pub fn tick_auto_close(
        &mut self,
        delta: Duration,
        config: &DoorConfig,
        effects: &mut impl DoorEffects,
    ) -> bool {
        let Some(timer) = self.auto_close.as_mut() else {
            return false;
        };

        if !timer.tick(delta).finished() {
            return false;
        }

        self.auto_close = None;
        self.close(config, effects);
        true
    }

    /// Отмена таймера идемпотентна (отсутствующий/сработавший: no-op)
    fn cancel_auto_close(&mut self) {
        self.auto_close = None;
    }
}

/// Общий старт перехода: звук → stop противоположного tween'а → новый tween
fn start_transition(
    kind: TransitionKind,
    angle: f32,
    transition: &TransitionConfig,
    effects: &mut impl DoorEffects,
) {
    if let Some(cue) = &transition.audio_cue {
        effects.play_clip(cue);
    }
    effects.stop_hinge(kind.opposite());
    effects.rotate_hinge(kind, angle, transition);
}

fn trigger(feedback: &FeedbackConfig, kind: FeedbackKind, effects: &mut impl DoorEffects) {
    if let Some(cue) = &feedback.audio_cue {
        effects.play_clip(cue);
    }
    effects.feedback(kind);
}

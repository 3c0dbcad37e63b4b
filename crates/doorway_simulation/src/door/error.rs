//! Door error taxonomy.

use bevy::prelude::Entity;
use thiserror::Error;

/// Ошибки door core
///
/// Ни одна не фатальна: вызывающий код логирует и деградирует в no-op.
/// Отказ из-за замка (DeniedByLock): не ошибка, см. `OpenOutcome`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DoorError {
    /// Open вызван с направлением вне {+1, -1}
    #[error("opening direction must be either 1 or -1, got {0}")]
    InvalidDirection(i32),

    /// Entity не является ни дверью, ни handle'ом
    #[error("entity {0:?} is neither a door nor a door handle")]
    NotADoor(Entity),

    /// Handle/target больше не ссылается на живую дверь
    #[error("entity {0:?} no longer resolves to a live door")]
    StaleReference(Entity),
}

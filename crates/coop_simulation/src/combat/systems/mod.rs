//! Combat systems (ECS glue вокруг Weapon/Health моделей)

pub mod damage;
pub mod replication;
pub mod weapon;


// Re-export all systems
pub use damage::*;
pub use replication::*;
pub use weapon::*;

use crate::combat::{Health, OwnerState};
use crate::components::ReloadAnimation;

/// Pawn gates для оружия из компонентов актора
///
/// Нет Health → считаем живым. Мёртвый не перезаряжается.
pub fn owner_state(
    health: Option<&Health>,
    reload_blocked: bool,
    reload_animation: Option<&ReloadAnimation>,
) -> OwnerState {
    let alive = health.is_none_or(Health::is_alive);

    OwnerState {
        alive,
        can_reload: alive && !reload_blocked,
        reload_animation: reload_animation.map(|animation| animation.duration),
    }
}

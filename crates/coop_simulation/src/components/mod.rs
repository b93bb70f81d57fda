//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: pawn collaborator (Actor, Position, Aim, ReloadAnimation, ReloadBlocked)
//! - stats: combat statistics (CombatStats, StatEvent)
//! - network: authority/replica role (NetRole)
//!
//! Weapon и Health живут в `crate::combat` (это state machines, не просто данные).

pub mod actor;
pub mod network;
pub mod stats;

// Re-exports для удобного импорта
pub use actor::*;
pub use network::*;
pub use stats::*;

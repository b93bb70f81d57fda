//! Combat module: weapon state machine + health/damage authority model
//!
//! Модели (без ECS зависимостей, тестируются напрямую):
//! - ammo: clip/total counters, reload arithmetic
//! - health: clamped damage/heal, death edge, team affiliation
//! - weapon: Idle/Firing/Reloading, fire-rate pacing, authority vs replica
//! - hitscan: cone spread, ray tracing, surface classification
//! - damage: damage by surface
//! - replication: snapshot layout + bincode codec
//!
//! ECS слой (systems/): input → timers → shots → damage → death → snapshots.

use bevy::prelude::*;

pub mod ammo;
pub mod damage;
pub mod events;
pub mod health;
pub mod hitscan;
pub mod replication;
pub mod systems;
pub mod weapon;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod health_tests;

// Re-export основных типов
pub use ammo::Ammo;
pub use damage::damage_for_surface;
pub use events::*;
pub use health::{Health, HealthChange, DEATH_FLOOR, NO_TEAM};
pub use hitscan::{cone_spread, ColliderTracer, HitCollider, HitScanTrace, HitScanTracer, SurfaceType, TraceHit};
pub use replication::{HealthSnapshot, WeaponSnapshot};
pub use weapon::{OwnerState, ShotOutcome, Weapon, WeaponEvent, WeaponRequest, WeaponState, WeaponTimer};

use crate::config::{MatchRules, WeaponCatalog};
use crate::DeterministicRng;

/// Все combat системы (для `.after(CombatSystems)` у потребителей)
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombatSystems;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. process_weapon_input: WeaponInput → start/stop fire/reload
/// 2. apply_weapon_snapshots / apply_health_snapshots: replica ← authority
/// 3. tick_weapons: таймеры, выстрелы, PointDamage, FireEffects
/// 4. apply_heals / apply_point_damage: Health, HealthChanged, EntityDied, kill credit
/// 5. stop_weapons_on_death: мёртвые не стреляют
/// 6. publish_snapshots: authority → транспорт
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DeterministicRng>()
            .init_resource::<MatchRules>()
            .init_resource::<WeaponCatalog>();

        // Регистрация событий
        app.add_event::<WeaponInput>()
            .add_event::<WeaponRequestForwarded>()
            .add_event::<WeaponStateChanged>()
            .add_event::<FireEffects>()
            .add_event::<PointDamage>()
            .add_event::<HealRequest>()
            .add_event::<HealthChanged>()
            .add_event::<EntityDied>()
            .add_event::<WeaponSnapshotReceived>()
            .add_event::<HealthSnapshotReceived>()
            .add_event::<WeaponSnapshotPublished>()
            .add_event::<HealthSnapshotPublished>();

        app.add_systems(
            FixedUpdate,
            (
                // Фаза 1: Input
                systems::process_weapon_input,

                // Фаза 2: Replica ← authority
                systems::apply_weapon_snapshots,
                systems::apply_health_snapshots,

                // Фаза 3: Timers + shot resolution
                systems::tick_weapons,

                // Фаза 4: Heal, damage + death
                systems::apply_heals,
                systems::apply_point_damage,
                systems::stop_weapons_on_death,

                // Фаза 5: Authority → replicas
                systems::publish_snapshots,
            )
                .chain() // Последовательное выполнение
                .in_set(CombatSystems),
        );
    }
}

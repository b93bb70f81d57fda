//! Combat events (ECS boundary)
//!
//! Вход: WeaponInput, снапшоты от транспорта (…SnapshotReceived).
//! Выход: FireEffects (presentation), HealthChanged, EntityDied,
//! WeaponRequestForwarded / …SnapshotPublished (транспорт хоста).

use bevy::prelude::*;

use crate::combat::health::HealthChange;
use crate::combat::hitscan::{HitScanTrace, SurfaceType};
use crate::combat::replication::{HealthSnapshot, WeaponSnapshot};
use crate::combat::weapon::{WeaponRequest, WeaponState};

/// Input для оружия актора (player/AI, или форвард от replica на authority)
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponInput {
    pub actor: Entity,
    pub request: WeaponRequest,
}

/// Replica → authority request (транспорт доставит как `WeaponInput`)
#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponRequestForwarded {
    pub actor: Entity,
    pub request: WeaponRequest,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponStateChanged {
    pub actor: Entity,
    pub from: WeaponState,
    pub to: WeaponState,
}

/// Effects collaborator: tracer/impact playback, never feeds back into state.
///
/// `predicted = true`: локальный replica выстрел (без урона).
#[derive(Event, Debug, Clone, Copy)]
pub struct FireEffects {
    pub actor: Entity,
    pub trace: HitScanTrace,
    pub predicted: bool,
}

/// Resolved authoritative hit, consumed by `apply_point_damage`
#[derive(Event, Debug, Clone, Copy)]
pub struct PointDamage {
    pub target: Entity,
    pub amount: f32,
    pub instigator: Option<Entity>,
    /// Чем нанесён урон (weapon entity; здесь = актор с оружием)
    pub cause: Option<Entity>,
    pub direction: Vec3,
    pub hit_point: Vec3,
    pub surface: SurfaceType,
}

/// Heal request (powerup, аптечка), consumed by `apply_heals`
#[derive(Event, Debug, Clone, Copy)]
pub struct HealRequest {
    pub entity: Entity,
    pub amount: f32,
}

/// Exactly one per accepted damage/heal/replicated change
#[derive(Event, Debug, Clone, Copy)]
pub struct HealthChanged {
    pub entity: Entity,
    pub change: HealthChange,
}

/// Событие: entity умер (death edge)
#[derive(Event, Debug, Clone, Copy)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Компонент-маркер: entity мертв
///
/// Деспавн не автоматический: lifespan трупа: забота хоста.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Dead;

#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponSnapshotReceived {
    pub actor: Entity,
    pub snapshot: WeaponSnapshot,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct HealthSnapshotReceived {
    pub entity: Entity,
    pub snapshot: HealthSnapshot,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct WeaponSnapshotPublished {
    pub actor: Entity,
    pub snapshot: WeaponSnapshot,
}

#[derive(Event, Debug, Clone, Copy)]
pub struct HealthSnapshotPublished {
    pub entity: Entity,
    pub snapshot: HealthSnapshot,
}

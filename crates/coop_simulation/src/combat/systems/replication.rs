//! Replication systems: incoming snapshots → replicas, authority → published snapshots

use std::collections::HashMap;

use bevy::prelude::*;

use super::owner_state;
use crate::combat::{
    Dead, EntityDied, Health, HealthChanged, HealthSnapshot, HealthSnapshotPublished, HealthSnapshotReceived,
    Weapon, WeaponSnapshot, WeaponSnapshotPublished, WeaponSnapshotReceived,
};
use crate::components::{ReloadAnimation, ReloadBlocked};

/// System: WeaponSnapshotReceived → Weapon::apply_snapshot (replica)
pub fn apply_weapon_snapshots(
    time: Res<Time>,
    mut snapshots: EventReader<WeaponSnapshotReceived>,
    mut weapons: Query<(
        &mut Weapon,
        Option<&Health>,
        Has<ReloadBlocked>,
        Option<&ReloadAnimation>,
    )>,
) {
    let now = time.elapsed_secs();

    for received in snapshots.read() {
        let Ok((mut weapon, health, blocked, animation)) = weapons.get_mut(received.actor) else {
            continue;
        };

        let owner = owner_state(health, blocked, animation);
        weapon.apply_snapshot(now, &owner, &received.snapshot);
    }
}

/// System: HealthSnapshotReceived → Health::apply_snapshot (replica)
///
/// Replica видит тот же HealthChanged (damage = old − new) и death edge.
pub fn apply_health_snapshots(
    mut commands: Commands,
    mut snapshots: EventReader<HealthSnapshotReceived>,
    mut healths: Query<&mut Health>,
    mut health_changed: EventWriter<HealthChanged>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for received in snapshots.read() {
        let Ok(mut health) = healths.get_mut(received.entity) else {
            continue;
        };

        let was_dead = health.is_dead();
        let Some(change) = health.apply_snapshot(&received.snapshot) else {
            continue;
        };

        health_changed.write(HealthChanged {
            entity: received.entity,
            change,
        });

        if !was_dead && health.is_dead() {
            entity_died.write(EntityDied {
                entity: received.entity,
                killer: None,
            });

            if let Ok(mut entity_commands) = commands.get_entity(received.entity) {
                entity_commands.insert(Dead);
            }
        }
    }
}

/// System: authority publishes snapshots that changed since last tick
pub fn publish_snapshots(
    mut last_weapon: Local<HashMap<Entity, WeaponSnapshot>>,
    mut last_health: Local<HashMap<Entity, HealthSnapshot>>,
    weapons: Query<(Entity, &Weapon)>,
    healths: Query<(Entity, &Health)>,
    mut weapon_published: EventWriter<WeaponSnapshotPublished>,
    mut health_published: EventWriter<HealthSnapshotPublished>,
) {
    let mut weapon_entries: Vec<(Entity, WeaponSnapshot)> = weapons
        .iter()
        .filter(|(_, weapon)| weapon.role().is_authority())
        .map(|(entity, weapon)| (entity, weapon.snapshot()))
        .collect();
    weapon_entries.sort_unstable_by_key(|(entity, _)| *entity);

    for (actor, snapshot) in weapon_entries {
        if last_weapon.get(&actor) == Some(&snapshot) {
            continue;
        }
        last_weapon.insert(actor, snapshot);
        weapon_published.write(WeaponSnapshotPublished { actor, snapshot });
    }

    let mut health_entries: Vec<(Entity, HealthSnapshot)> = healths
        .iter()
        .filter(|(_, health)| health.role().is_authority())
        .map(|(entity, health)| (entity, health.snapshot()))
        .collect();
    health_entries.sort_unstable_by_key(|(entity, _)| *entity);

    for (entity, snapshot) in health_entries {
        if last_health.get(&entity) == Some(&snapshot) {
            continue;
        }
        last_health.insert(entity, snapshot);
        health_published.write(HealthSnapshotPublished { entity, snapshot });
    }

    // Despawned entities
    last_weapon.retain(|entity, _| weapons.contains(*entity));
    last_health.retain(|entity, _| healths.contains(*entity));
}

//! Actor spawning: pawn + health + weapon из WeaponCatalog
//!
//! Единственное "фатальное" место домена: неизвестный или невалидный
//! weapon config → warning + отказ спавнить (без retry).

use bevy::prelude::*;

use crate::combat::{Health, HitCollider, Weapon};
use crate::components::{Actor, Aim, CombatStats, NetRole, Position, ReloadAnimation};
use crate::config::WeaponCatalog;
use crate::error::SpawnError;

/// Параметры спавна актора с оружием
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSpawn {
    pub position: Vec3,
    pub aim: Aim,
    pub team_id: u8,
    pub max_health: f32,
    pub role: NetRole,
    /// `None` → актор не попадает в hit-scan (невидимый для трейсов)
    pub collider: Option<HitCollider>,
    pub reload_animation: Option<f32>,
}

impl Default for ActorSpawn {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            aim: Aim::default(),
            team_id: crate::combat::NO_TEAM,
            max_health: crate::combat::health::DEFAULT_MAX_HEALTH,
            role: NetRole::Authority,
            collider: Some(HitCollider::default()),
            reload_animation: None,
        }
    }
}

impl ActorSpawn {
    /// Актор на `position`, глаза на той же точке, смотрит на `target`.
    pub fn at(position: Vec3, target: Vec3) -> Self {
        Self {
            position,
            aim: Aim::looking_at(position, target),
            ..Self::default()
        }
    }

    pub fn team(mut self, team_id: u8) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn role(mut self, role: NetRole) -> Self {
        self.role = role;
        self
    }

    pub fn collider(mut self, collider: Option<HitCollider>) -> Self {
        self.collider = collider;
        self
    }
}

/// Spawn an actor armed with catalog weapon `weapon_id`.
pub fn spawn_armed_actor(world: &mut World, weapon_id: &str, spawn: ActorSpawn) -> Result<Entity, SpawnError> {
    let config = match world.get_resource::<WeaponCatalog>() {
        Some(catalog) => catalog.get(weapon_id).cloned(),
        None => None,
    };

    let Some(config) = config else {
        crate::logger::log_warning(&format!("Refusing to spawn actor: weapon config `{}` not found", weapon_id));
        return Err(SpawnError::MissingWeaponConfig(weapon_id.to_string()));
    };

    if let Err(source) = config.validate() {
        crate::logger::log_warning(&format!(
            "Refusing to spawn actor: weapon config `{}` is invalid ({})",
            weapon_id, source
        ));
        return Err(SpawnError::InvalidWeaponConfig {
            id: weapon_id.to_string(),
            source,
        });
    }

    let mut entity = world.spawn((
        Actor,
        Position(spawn.position),
        spawn.aim,
        Health::new(spawn.max_health)
            .with_team(spawn.team_id)
            .with_role(spawn.role),
        CombatStats::default(),
        Weapon::new(config, spawn.role),
    ));

    if let Some(collider) = spawn.collider {
        entity.insert(collider);
    }
    if let Some(duration) = spawn.reload_animation {
        entity.insert(ReloadAnimation { duration });
    }

    let id = entity.id();
    crate::logger::log(&format!(
        "Spawned actor {:?} (weapon `{}`, team {}, {:?})",
        id, weapon_id, spawn.team_id, spawn.role
    ));

    Ok(id)
}

//! Health model: clamped damage/heal, one-way death, team affiliation
//!
//! Authority: единственный writer. Replica держит тот же read API,
//! но мутирует только через `apply_snapshot`.
//!
//! Каждая принятая мутация возвращает ровно один `HealthChange` синхронно:
//! ECS слой превращает его в `HealthChanged` event.

use bevy::prelude::*;

use crate::combat::replication::HealthSnapshot;
use crate::components::NetRole;

/// Нижняя граница health (смерть = health <= DEATH_FLOOR)
pub const DEATH_FLOOR: f32 = 0.0;

/// Team id "без команды"
pub const NO_TEAM: u8 = 255;

pub const DEFAULT_MAX_HEALTH: f32 = 100.0;

/// Health-changed notification.
///
/// `damage`: реально применённое значение (после clamp); отрицательное = heal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub health: f32,
    pub damage: f32,
    pub instigator: Option<Entity>,
    pub cause: Option<Entity>,
}

/// Инвариант: DEATH_FLOOR ≤ current ≤ max, `dead` монотонен
#[derive(Component, Debug, Clone, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    current: f32,
    max: f32,
    team_id: u8,
    dead: bool,
    role: NetRole,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HEALTH)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(DEATH_FLOOR);
        Self {
            current: max,
            max,
            team_id: NO_TEAM,
            dead: max <= DEATH_FLOOR,
            role: NetRole::Authority,
        }
    }

    pub fn with_team(mut self, team_id: u8) -> Self {
        self.team_id = team_id;
        self
    }

    pub fn with_role(mut self, role: NetRole) -> Self {
        self.role = role;
        self
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn team_id(&self) -> u8 {
        self.team_id
    }

    pub fn role(&self) -> NetRole {
        self.role
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn is_alive(&self) -> bool {
        !self.dead
    }

    /// 0..=1 (для UI)
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Apply damage; `None` = rejected (replica, non-positive amount, already dead).
    pub fn apply_damage(
        &mut self,
        amount: f32,
        instigator: Option<Entity>,
        cause: Option<Entity>,
    ) -> Option<HealthChange> {
        if self.role.is_replica() {
            crate::logger::log("Health: apply_damage rejected on replica");
            return None;
        }

        if !(amount > 0.0) || self.dead {
            return None;
        }

        let previous = self.current;
        self.current = (self.current - amount).clamp(DEATH_FLOOR, self.max);
        self.dead = self.current <= DEATH_FLOOR;

        Some(HealthChange {
            health: self.current,
            damage: previous - self.current,
            instigator,
            cause,
        })
    }

    /// Apply heal; `None` = rejected (replica, non-positive amount, dead).
    ///
    /// Heal на полном health принимается с damage = 0.
    pub fn apply_heal(&mut self, amount: f32) -> Option<HealthChange> {
        if self.role.is_replica() {
            crate::logger::log("Health: apply_heal rejected on replica");
            return None;
        }

        if !(amount > 0.0) || self.dead || self.current <= DEATH_FLOOR {
            return None;
        }

        let previous = self.current;
        self.current = (self.current + amount).clamp(DEATH_FLOOR, self.max);

        Some(HealthChange {
            health: self.current,
            damage: previous - self.current,
            instigator: None,
            cause: None,
        })
    }

    /// Permissive: true if either side has no Health, or teams match.
    pub fn is_friendly(a: Option<&Health>, b: Option<&Health>) -> bool {
        match (a, b) {
            (Some(a), Some(b)) => a.team_id == b.team_id,
            _ => true,
        }
    }

    pub fn snapshot(&self) -> HealthSnapshot {
        HealthSnapshot {
            health: self.current,
            is_dead: self.dead,
        }
    }

    /// Replica: принимает authoritative значение.
    ///
    /// Возвращает change с `damage = old − new` если что-то поменялось
    /// (дубликат снапшота → `None`). Authority снапшоты игнорирует.
    pub fn apply_snapshot(&mut self, snapshot: &HealthSnapshot) -> Option<HealthChange> {
        if self.role.is_authority() {
            crate::logger::log_warning("Health: authority ignores incoming snapshot");
            return None;
        }

        let previous = self.current;
        let was_dead = self.dead;

        self.current = if snapshot.health.is_finite() {
            snapshot.health.clamp(DEATH_FLOOR, self.max)
        } else {
            self.current
        };
        self.dead = self.dead || snapshot.is_dead || self.current <= DEATH_FLOOR;

        if previous == self.current && was_dead == self.dead {
            return None;
        }

        Some(HealthChange {
            health: self.current,
            damage: previous - self.current,
            instigator: None,
            cause: None,
        })
    }
}

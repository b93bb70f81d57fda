//! Pawn-side components: Actor, Position, Aim, reload gates
//!
//! Это интерфейс pawn collaborator для оружия:
//! - alive gate → `Health` (combat::health)
//! - aim origin/direction → `Aim`
//! - длительность reload анимации → `ReloadAnimation` (нет компонента = no-anim fallback)
//! - can-reload gate → `ReloadBlocked` marker
//! - statistics sink → `CombatStats`

use bevy::prelude::*;

use crate::combat::Health;
use crate::components::CombatStats;

/// Актор (player/bot): базовый компонент для pawn, который держит оружие
///
/// Required Components: Health, Aim, Position, CombatStats.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Aim, Position, CombatStats)]
pub struct Actor;

/// World position (ECS-side; hit colliders are centered on it)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Position(pub Vec3);

/// Eye viewpoint used for hit-scan: origin + normalized direction.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Aim {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Default for Aim {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::NEG_Z,
        }
    }
}

impl Aim {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    /// Aim from `origin` towards `target`.
    pub fn looking_at(origin: Vec3, target: Vec3) -> Self {
        Self::new(origin, target - origin)
    }
}

/// Длительность reload анимации pawn (montage length × play rate)
///
/// `duration <= 0` трактуется как отсутствие анимации.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ReloadAnimation {
    pub duration: f32,
}

/// Marker: pawn сейчас не может перезаряжаться (sprint, emote, cutscene…)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct ReloadBlocked;

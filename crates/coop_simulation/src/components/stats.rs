//! Per-actor combat statistics (shots, damage, kills)
//!
//! Sink для statistics событий от оружия и damage application.
//! Пишется только на authority.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Очки за убийство по умолчанию (MatchRules может переопределить)
pub const DEFAULT_KILL_SCORE: f32 = 100.0;

/// Statistics event reported by the weapon/damage pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatEvent {
    ShotFired,
    ShotHit,
    DamageDone(f32),
    DamageTaken(f32),
    Kill { score: f32 },
}

#[derive(Component, Debug, Clone, Default, PartialEq, Reflect, Serialize, Deserialize)]
#[reflect(Component)]
pub struct CombatStats {
    pub kills: u32,
    pub score: f32,
    pub shots_fired: u32,
    pub shots_hit: u32,
    pub damage_done: f32,
    pub damage_taken: f32,
}

impl CombatStats {
    pub fn register(&mut self, event: StatEvent) {
        match event {
            StatEvent::ShotFired => self.shots_fired += 1,
            StatEvent::ShotHit => self.shots_hit += 1,
            StatEvent::DamageDone(amount) => self.damage_done += amount.max(0.0),
            StatEvent::DamageTaken(amount) => self.damage_taken += amount.max(0.0),
            StatEvent::Kill { score } => {
                self.kills += 1;
                self.score += score;
            }
        }
    }

    /// Accuracy in percent: hits / fired × 100 (0 when nothing was fired)
    pub fn accuracy(&self) -> f32 {
        if self.shots_fired == 0 {
            return 0.0;
        }

        self.shots_hit as f32 / self.shots_fired as f32 * 100.0
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accuracy_without_shots() {
        let stats = CombatStats::default();
        assert_eq!(stats.accuracy(), 0.0);
    }

    #[test]
    fn test_register_events() {
        let mut stats = CombatStats::default();

        for _ in 0..4 {
            stats.register(StatEvent::ShotFired);
        }
        stats.register(StatEvent::ShotHit);
        stats.register(StatEvent::DamageDone(20.0));
        stats.register(StatEvent::DamageTaken(7.5));
        stats.register(StatEvent::Kill { score: DEFAULT_KILL_SCORE });

        assert_eq!(stats.shots_fired, 4);
        assert_eq!(stats.shots_hit, 1);
        assert_eq!(stats.accuracy(), 25.0);
        assert_eq!(stats.damage_done, 20.0);
        assert_eq!(stats.damage_taken, 7.5);
        assert_eq!(stats.kills, 1);
        assert_eq!(stats.score, 100.0);

        stats.reset();
        assert_eq!(stats, CombatStats::default());
    }
}

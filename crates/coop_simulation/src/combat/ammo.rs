//! Ammo counters (clip + total)
//!
//! Храним `in_clip` и `total` (clip + reserve), reserve вычисляется.
//! Меняется только через Weapon (authority) или входящий snapshot (replica).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::WeaponConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect, Serialize, Deserialize)]
pub struct Ammo {
    in_clip: u32,
    total: u32,
}

impl Ammo {
    /// Initial load: полный магазин, total = per_clip × clips.
    /// `initial_clips == 0` → пустое оружие.
    pub fn initial(config: &WeaponConfig) -> Self {
        if config.initial_clips == 0 {
            return Self::default();
        }

        Self {
            in_clip: config.ammo_per_clip,
            total: config.ammo_per_clip.saturating_mul(config.initial_clips),
        }
    }

    /// Raw counters (replication); `total` raised to at least `in_clip`.
    pub fn from_counts(in_clip: u32, total: u32) -> Self {
        Self {
            in_clip,
            total: total.max(in_clip),
        }
    }

    pub fn in_clip(&self) -> u32 {
        self.in_clip
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Rounds outside the clip
    pub fn reserve(&self) -> u32 {
        self.total.saturating_sub(self.in_clip)
    }

    pub fn is_clip_full(&self, config: &WeaponConfig) -> bool {
        self.in_clip >= config.ammo_per_clip
    }

    /// Есть чем стрелять (или магазин/резерв бесконечны)
    pub fn has_rounds(&self, config: &WeaponConfig) -> bool {
        self.in_clip > 0 || config.infinite_clip || config.infinite_ammo
    }

    /// Ammo-side reload condition: clip not full and reserve available.
    pub fn can_reload(&self, config: &WeaponConfig) -> bool {
        !self.is_clip_full(config) && (self.reserve() > 0 || config.infinite_ammo)
    }

    /// Consume one round.
    ///
    /// Clip уменьшается если не `infinite_clip` (пустой clip → no-op),
    /// total: если не `infinite_ammo` (при `infinite_clip` только пока есть резерв).
    /// Никогда не уходит ниже нуля и ниже clip.
    pub fn use_ammo(&mut self, config: &WeaponConfig) {
        if !config.infinite_clip {
            if self.in_clip == 0 {
                return;
            }
            self.in_clip -= 1;
        }

        // С infinite_clip патрон берётся из резерва, пока он есть: total >= in_clip
        if !config.infinite_ammo && (!config.infinite_clip || self.reserve() > 0) {
            self.total = self.total.saturating_sub(1);
        }
    }

    /// Move rounds from reserve into the clip, returns rounds moved.
    ///
    /// - обычный режим: delta = min(per_clip − clip, reserve)
    /// - `infinite_clip`: clip доливается до полного, total поднимается до clip
    pub fn reload(&mut self, config: &WeaponConfig) -> u32 {
        let missing = config.ammo_per_clip.saturating_sub(self.in_clip);

        if config.infinite_clip {
            self.in_clip += missing;
            self.total = self.total.max(self.in_clip);
            return missing;
        }

        if config.infinite_ammo {
            // Резерв бесконечный: clip доливается целиком, total остаётся >= clip
            self.in_clip += missing;
            self.total = self.total.max(self.in_clip);
            return missing;
        }

        let delta = missing.min(self.reserve());
        self.in_clip += delta;
        delta
    }

    /// Pickup: adds to total, capped at `max_ammo` (never lowers an existing
    /// total above the cap). Returns rounds actually added.
    pub fn give(&mut self, amount: u32, config: &WeaponConfig) -> u32 {
        let cap = config.max_ammo.max(self.total);
        let new_total = self.total.saturating_add(amount).min(cap);
        let added = new_total - self.total;
        self.total = new_total;
        added
    }
}

//! Simulation configuration: tick rate, seed, match rules, weapon catalog
//!
//! Все config типы: plain data (serde), без file формата: хост сам решает,
//! откуда их грузить. Встроенные пресеты покрывают тесты и headless demo.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::DEFAULT_KILL_SCORE;
use crate::error::ConfigError;

/// Верхняя граница rate_of_fire (rpm): 100 выстрелов в секунду
pub const MAX_RATE_OF_FIRE: f32 = 6_000.0;

/// Immutable per-weapon-type data.
///
/// Defaults: 700 rpm, 20 damage (×2.5 vulnerable), 2° cone, 10000 range,
/// 100 max ammo, 20 per clip × 5 clips, 1 s no-anim reload.
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponConfig {
    /// Rounds per minute
    pub rate_of_fire: f32,
    pub base_damage: f32,
    pub vulnerable_damage_multiplier: f32,
    /// Full cone angle (градусы); разброс = половина в каждую сторону
    pub shoot_cone_angle_degrees: f32,
    pub weapon_range: f32,
    pub max_ammo: u32,
    pub ammo_per_clip: u32,
    pub initial_clips: u32,
    pub infinite_ammo: bool,
    pub infinite_clip: bool,
    /// Reload duration когда у pawn нет reload анимации (секунды)
    pub no_anim_reload_duration: f32,
}

impl Default for WeaponConfig {
    fn default() -> Self {
        Self {
            rate_of_fire: 700.0,
            base_damage: 20.0,
            vulnerable_damage_multiplier: 2.5,
            shoot_cone_angle_degrees: 2.0,
            weapon_range: 10_000.0,
            max_ammo: 100,
            ammo_per_clip: 20,
            initial_clips: 5,
            infinite_ammo: false,
            infinite_clip: false,
            no_anim_reload_duration: 1.0,
        }
    }
}

impl WeaponConfig {
    /// Штурмовая винтовка (дефолты)
    pub fn rifle() -> Self {
        Self::default()
    }

    /// Пистолет: медленнее, мелкий магазин, бесконечный резерв
    pub fn pistol() -> Self {
        Self {
            rate_of_fire: 300.0,
            base_damage: 15.0,
            shoot_cone_angle_degrees: 1.5,
            weapon_range: 5_000.0,
            max_ammo: 12,
            ammo_per_clip: 12,
            initial_clips: 1,
            infinite_ammo: true,
            no_anim_reload_duration: 0.8,
            ..Self::default()
        }
    }

    /// Снайперка: редкие мощные выстрелы, без разброса
    pub fn sniper() -> Self {
        Self {
            rate_of_fire: 40.0,
            base_damage: 90.0,
            vulnerable_damage_multiplier: 4.0,
            shoot_cone_angle_degrees: 0.0,
            weapon_range: 20_000.0,
            max_ammo: 25,
            ammo_per_clip: 5,
            initial_clips: 3,
            no_anim_reload_duration: 2.5,
            ..Self::default()
        }
    }

    /// Seconds between two consecutive shots (60 / rate_of_fire)
    pub fn time_between_shots(&self) -> f32 {
        60.0 / self.rate_of_fire
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.rate_of_fire > 0.0 && self.rate_of_fire <= MAX_RATE_OF_FIRE) {
            return Err(ConfigError::InvalidRateOfFire(self.rate_of_fire));
        }

        if self.ammo_per_clip == 0 {
            return Err(ConfigError::EmptyClip);
        }

        let non_negative = [
            ("base_damage", self.base_damage),
            ("vulnerable_damage_multiplier", self.vulnerable_damage_multiplier),
            ("shoot_cone_angle_degrees", self.shoot_cone_angle_degrees),
            ("weapon_range", self.weapon_range),
            ("no_anim_reload_duration", self.no_anim_reload_duration),
        ];

        for (field, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigError::Negative { field, value });
            }
        }

        Ok(())
    }
}

/// Fixed tick rate + seed для headless симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_hz: f64,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            seed: 42,
        }
    }
}

/// Match-rules collaborator (friendly fire, kill score)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    pub friendly_fire: bool,
    pub kill_score: f32,
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            friendly_fire: false,
            kill_score: DEFAULT_KILL_SCORE,
        }
    }
}

/// Named weapon configs (lookup by id)
///
/// Default содержит встроенные пресеты: `rifle`, `pistol`, `sniper`.
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
pub struct WeaponCatalog {
    weapons: HashMap<String, WeaponConfig>,
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::with_presets()
    }
}

impl WeaponCatalog {
    pub const RIFLE: &'static str = "rifle";
    pub const PISTOL: &'static str = "pistol";
    pub const SNIPER: &'static str = "sniper";

    pub fn empty() -> Self {
        Self {
            weapons: HashMap::new(),
        }
    }

    pub fn with_presets() -> Self {
        let mut catalog = Self::empty();
        catalog.insert(Self::RIFLE, WeaponConfig::rifle());
        catalog.insert(Self::PISTOL, WeaponConfig::pistol());
        catalog.insert(Self::SNIPER, WeaponConfig::sniper());
        catalog
    }

    /// Регистрирует (или заменяет) конфиг; возвращает предыдущий.
    pub fn insert(&mut self, id: impl Into<String>, config: WeaponConfig) -> Option<WeaponConfig> {
        self.weapons.insert(id.into(), config)
    }

    pub fn get(&self, id: &str) -> Option<&WeaponConfig> {
        self.weapons.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.weapons.contains_key(id)
    }

    /// Sorted ids (HashMap order is not deterministic)
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.weapons.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

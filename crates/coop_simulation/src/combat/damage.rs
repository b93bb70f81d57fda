//! Damage selection by surface classification

use crate::combat::hitscan::SurfaceType;
use crate::config::WeaponConfig;

/// Final damage for a hit on `surface`.
///
/// FleshVulnerable → base × vulnerable multiplier, всё остальное → base.
pub fn damage_for_surface(config: &WeaponConfig, surface: SurfaceType) -> f32 {
    match surface {
        SurfaceType::FleshVulnerable => config.base_damage * config.vulnerable_damage_multiplier,
        SurfaceType::FleshDefault | SurfaceType::Default => config.base_damage,
    }
}

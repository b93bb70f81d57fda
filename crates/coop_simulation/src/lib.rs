//! Co-op shooter simulation core
//!
//! ECS-симуляция на Bevy 0.16 (headless).
//! Ядро: weapon fire/reload/ammo state machine + authoritative health/damage.
//!
//! Хост (engine, сеть, анимации): внешние collaborators:
//! - input → `WeaponInput` events
//! - effects ← `FireEffects` events
//! - транспорт ↔ `*SnapshotReceived` / `*SnapshotPublished`, `WeaponRequestForwarded`

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod actor;
pub mod combat;
pub mod components;
pub mod config;
pub mod error;
pub mod logger;
pub mod scheduler;

// Re-export базовых типов для удобства
pub use actor::{spawn_armed_actor, ActorSpawn};
pub use combat::{
    CombatPlugin, CombatSystems, Dead, EntityDied, FireEffects, HealRequest, Health, HealthChanged, PointDamage, Weapon,
    WeaponInput, WeaponRequest, WeaponState,
};
pub use components::*;
pub use config::{MatchRules, SimulationConfig, WeaponCatalog, WeaponConfig};
pub use error::{ConfigError, SnapshotError, SpawnError};
pub use logger::{init_logger, log, log_error, log_info, log_warning};

/// Главный plugin симуляции
///
/// Fixed timestep + seed берутся из `SimulationConfig` (если нет: default 60Hz / 42).
/// Уже вставленный `DeterministicRng` (create_headless_app) не перезаписывается.
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .add_plugins(CombatPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

impl Default for DeterministicRng {
    fn default() -> Self {
        Self::new(SimulationConfig::default().seed)
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается вручную: каждый `app.update()` = ровно один тик 60Hz,
/// независимо от wall clock (детерминизм тестов).
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();

    let config = SimulationConfig {
        seed,
        ..SimulationConfig::default()
    };
    let tick = Duration::from_secs_f64(1.0 / config.tick_hz);

    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick))
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(config.tick_hz)) // 60Hz FixedUpdate
        .insert_resource(config);

    app
}

/// Snapshot мира для сравнения детерминизма
///
/// Debug-представление компонентов, отсортированное по Entity.
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}

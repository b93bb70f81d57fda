//! Headless co-op shooter simulation
//!
//! Две команды по два стрелка перестреливаются фиксированное число тиков,
//! в конце печатается статистика.

use bevy::prelude::*;
use coop_simulation::{
    create_headless_app, log_error, log_info, spawn_armed_actor, ActorSpawn, CombatStats, Health, SimulationPlugin,
    WeaponCatalog, WeaponInput, WeaponRequest,
};

const TICKS: usize = 1200;
const SEED: u64 = 42;

fn main() {
    let mut app = create_headless_app(SEED);
    log_info(&format!("Starting headless co-op simulation (seed: {})", SEED));
    app.add_plugins(SimulationPlugin);

    let lineup = [
        (WeaponCatalog::RIFLE, 1, Vec3::new(-2.0, 0.0, 0.0), Vec3::new(-2.0, 0.0, -30.0)),
        (WeaponCatalog::PISTOL, 1, Vec3::new(2.0, 0.0, 0.0), Vec3::new(2.0, 0.0, -30.0)),
        (WeaponCatalog::RIFLE, 2, Vec3::new(-2.0, 0.0, -30.0), Vec3::new(-2.0, 0.0, 0.0)),
        (WeaponCatalog::SNIPER, 2, Vec3::new(2.0, 0.0, -30.0), Vec3::new(2.0, 0.0, 0.0)),
    ];

    let mut actors = Vec::new();
    for (weapon_id, team, position, target) in lineup {
        match spawn_armed_actor(app.world_mut(), weapon_id, ActorSpawn::at(position, target).team(team)) {
            Ok(actor) => actors.push(actor),
            Err(err) => {
                log_error(&format!("Failed to spawn `{}`: {}", weapon_id, err));
                return;
            }
        }
    }

    for &actor in &actors {
        app.world_mut().send_event(WeaponInput {
            actor,
            request: WeaponRequest::StartFire,
        });
    }

    for tick in 0..TICKS {
        app.update();

        if tick % 200 == 0 {
            let alive = actors
                .iter()
                .filter(|actor| app.world().get::<Health>(**actor).is_some_and(Health::is_alive))
                .count();
            log_info(&format!("Tick {}: {} actors alive", tick, alive));
        }
    }

    for &actor in &actors {
        let (Some(health), Some(stats)) = (app.world().get::<Health>(actor), app.world().get::<CombatStats>(actor))
        else {
            continue;
        };

        log_info(&format!(
            "{:?} team {}: health {:.0}/{:.0}, shots {}, hits {} ({:.1}%), damage {:.0}/{:.0}, kills {}, score {:.0}",
            actor,
            health.team_id(),
            health.current(),
            health.max(),
            stats.shots_fired,
            stats.shots_hit,
            stats.accuracy(),
            stats.damage_done,
            stats.damage_taken,
            stats.kills,
            stats.score,
        ));
    }

    log_info("Simulation complete!");
}

//! Weapon systems: input → timers → shot resolution.

use bevy::prelude::*;

use super::owner_state;
use crate::combat::{
    ColliderTracer, FireEffects, Health, HitCollider, PointDamage, Weapon, WeaponEvent, WeaponInput,
    WeaponRequestForwarded, WeaponStateChanged,
};
use crate::components::{Aim, CombatStats, Position, ReloadAnimation, ReloadBlocked, StatEvent};
use crate::DeterministicRng;

type WeaponOwnerQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static mut Weapon,
        Option<&'static Health>,
        Has<ReloadBlocked>,
        Option<&'static ReloadAnimation>,
    ),
>;

/// System: WeaponInput → Weapon::request
pub fn process_weapon_input(
    time: Res<Time>,
    mut inputs: EventReader<WeaponInput>,
    mut weapons: WeaponOwnerQuery,
) {
    let now = time.elapsed_secs();

    for input in inputs.read() {
        let Ok((mut weapon, health, blocked, animation)) = weapons.get_mut(input.actor) else {
            crate::logger::log_warning(&format!(
                "WeaponInput {:?}: actor {:?} has no Weapon",
                input.request, input.actor
            ));
            continue;
        };

        let owner = owner_state(health, blocked, animation);
        weapon.request(input.request, now, &owner);
    }
}

/// System: advance weapon timers, resolve shots, dispatch weapon events
///
/// 1. Weapon::advance (fire tick / reload таймеры до `now`)
/// 2. ShotRequested → Weapon::fire (cone → trace → damage)
/// 3. Authority hit → PointDamage (урон применяет apply_point_damage),
///    ShotHit только по entity с Health
/// 4. Forward / StateChanged / TraceReplicated → events для хоста
#[allow(clippy::too_many_arguments)]
pub fn tick_weapons(
    time: Res<Time>,
    mut rng: ResMut<DeterministicRng>,
    mut weapons: Query<(
        Entity,
        &mut Weapon,
        &Aim,
        Option<&Health>,
        Has<ReloadBlocked>,
        Option<&ReloadAnimation>,
    )>,
    colliders: Query<(Entity, &Position, &HitCollider)>,
    damageable: Query<(), With<Health>>,
    mut stats: Query<&mut CombatStats>,
    mut point_damage: EventWriter<PointDamage>,
    mut fire_effects: EventWriter<FireEffects>,
    mut forwarded: EventWriter<WeaponRequestForwarded>,
    mut state_changed: EventWriter<WeaponStateChanged>,
) {
    let now = time.elapsed_secs();
    let tracer = ColliderTracer::from_colliders(colliders.iter());

    // Стабильный порядок для детерминизма RNG
    let mut actors: Vec<Entity> = weapons.iter().map(|(entity, ..)| entity).collect();
    actors.sort_unstable();

    for actor in actors {
        let Ok((_, mut weapon, aim, health, blocked, animation)) = weapons.get_mut(actor) else {
            continue;
        };

        let owner = owner_state(health, blocked, animation);
        weapon.advance(now, &owner);

        for event in weapon.drain_events() {
            match event {
                WeaponEvent::ShotRequested { predicted } => {
                    let Some(outcome) = weapon.fire(actor, aim, &owner, &tracer, &mut rng.rng) else {
                        continue;
                    };

                    fire_effects.write(FireEffects {
                        actor,
                        trace: outcome.trace,
                        predicted,
                    });

                    if predicted {
                        continue;
                    }

                    if let Ok(mut shooter_stats) = stats.get_mut(actor) {
                        shooter_stats.register(StatEvent::ShotFired);
                        // Попадание засчитывается только по чужому Health (не по стенам/props)
                        let hit_damageable = outcome
                            .hit
                            .is_some_and(|hit| hit.entity != actor && damageable.contains(hit.entity));
                        if hit_damageable {
                            shooter_stats.register(StatEvent::ShotHit);
                        }
                    }

                    if let Some(hit) = outcome.hit {
                        point_damage.write(PointDamage {
                            target: hit.entity,
                            amount: outcome.damage,
                            instigator: Some(actor),
                            cause: Some(actor),
                            direction: outcome.trace.direction,
                            hit_point: hit.point,
                            surface: hit.surface,
                        });
                    }
                }
                WeaponEvent::Forward(request) => {
                    forwarded.write(WeaponRequestForwarded { actor, request });
                }
                WeaponEvent::StateChanged { from, to } => {
                    crate::logger::log(&format!("Weapon {:?}: {:?} → {:?}", actor, from, to));
                    state_changed.write(WeaponStateChanged { actor, from, to });
                }
                WeaponEvent::TraceReplicated(trace) => {
                    fire_effects.write(FireEffects {
                        actor,
                        trace,
                        predicted: false,
                    });
                }
                WeaponEvent::ReloadStarted { duration } => {
                    crate::logger::log(&format!("Weapon {:?}: reload started ({:.2}s)", actor, duration));
                }
                WeaponEvent::ClipReloaded {
                    rounds,
                    in_clip,
                    reserve,
                } => {
                    crate::logger::log(&format!(
                        "Weapon {:?}: +{} rounds (clip {}, reserve {})",
                        actor, rounds, in_clip, reserve
                    ));
                }
                WeaponEvent::ReloadStopped => {}
            }
        }
    }
}

/// System: мёртвые перестают стрелять и перезаряжаться
pub fn stop_weapons_on_death(
    time: Res<Time>,
    mut deaths: EventReader<crate::combat::EntityDied>,
    mut weapons: WeaponOwnerQuery,
) {
    let now = time.elapsed_secs();

    for death in deaths.read() {
        let Ok((mut weapon, health, blocked, animation)) = weapons.get_mut(death.entity) else {
            continue;
        };

        let owner = owner_state(health, blocked, animation);
        weapon.stop_fire(now, &owner);
        weapon.stop_reload(now, &owner);
    }
}

//! Authority / replica integration test
//!
//! Один World держит обе стороны: authority стрелок + его replica копия,
//! authority цель + её replica. Тестовый "транспорт" гоняет снапшоты
//! через bincode и форвардит запросы replica → authority.
//!
//! Проверяем:
//! - replica не тратит ammo и не наносит урон (только predicted эффекты)
//! - урон наносит только authority, replica health догоняет по снапшотам
//! - replica ammo сходится с authority
//! - новый trace (replication_count) играет эффект на replica ровно один раз

use bevy::prelude::*;
use coop_simulation::combat::{
    HealthSnapshot, HealthSnapshotPublished, HealthSnapshotReceived, WeaponRequestForwarded, WeaponSnapshot,
    WeaponSnapshotPublished, WeaponSnapshotReceived,
};
use coop_simulation::*;

#[derive(Resource, Clone, Copy)]
struct Link {
    shooter: Entity,
    shooter_replica: Entity,
    target: Entity,
    target_replica: Entity,
}

#[derive(Resource, Default)]
struct Log {
    effects: Vec<FireEffects>,
    damage: Vec<PointDamage>,
    deaths: Vec<EntityDied>,
    replica_health_changes: Vec<HealthChanged>,
}

/// Транспорт: authority → replica снапшоты, replica → authority запросы
fn transport(
    link: Res<Link>,
    mut forwarded: EventReader<WeaponRequestForwarded>,
    mut weapon_published: EventReader<WeaponSnapshotPublished>,
    mut health_published: EventReader<HealthSnapshotPublished>,
    mut inputs: EventWriter<WeaponInput>,
    mut weapon_received: EventWriter<WeaponSnapshotReceived>,
    mut health_received: EventWriter<HealthSnapshotReceived>,
) {
    for request in forwarded.read() {
        if request.actor == link.shooter_replica {
            inputs.write(WeaponInput {
                actor: link.shooter,
                request: request.request,
            });
        }
    }

    for published in weapon_published.read() {
        if published.actor != link.shooter {
            continue;
        }
        let bytes = published.snapshot.encode().expect("encode weapon snapshot");
        weapon_received.write(WeaponSnapshotReceived {
            actor: link.shooter_replica,
            snapshot: WeaponSnapshot::decode(&bytes).expect("decode weapon snapshot"),
        });
    }

    for published in health_published.read() {
        if published.entity != link.target {
            continue;
        }
        let bytes = published.snapshot.encode().expect("encode health snapshot");
        health_received.write(HealthSnapshotReceived {
            entity: link.target_replica,
            snapshot: HealthSnapshot::decode(&bytes).expect("decode health snapshot"),
        });
    }
}

fn record(
    link: Res<Link>,
    mut log: ResMut<Log>,
    mut effects: EventReader<FireEffects>,
    mut damage: EventReader<PointDamage>,
    mut deaths: EventReader<EntityDied>,
    mut health_changed: EventReader<HealthChanged>,
) {
    log.effects.extend(effects.read().cloned());
    log.damage.extend(damage.read().cloned());
    log.deaths.extend(deaths.read().cloned());
    log.replica_health_changes.extend(
        health_changed
            .read()
            .filter(|event| event.entity == link.target_replica)
            .cloned(),
    );
}

fn create_replicated_app() -> (App, Link) {
    let mut app = create_headless_app(42);
    app.add_plugins(SimulationPlugin);
    app.world_mut().resource_mut::<WeaponCatalog>().insert(
        "laser",
        WeaponConfig {
            shoot_cone_angle_degrees: 0.0,
            ..WeaponConfig::default()
        },
    );

    let aim_at_target = ActorSpawn::at(Vec3::ZERO, Vec3::new(0.0, 0.0, -10.0)).team(1);

    let shooter = spawn_armed_actor(app.world_mut(), "laser", aim_at_target.clone()).expect("spawn");
    // Replica копии не участвуют в hit-scan (collider только у authority)
    let shooter_replica = spawn_armed_actor(
        app.world_mut(),
        "laser",
        aim_at_target.role(NetRole::Replica).collider(None),
    )
    .expect("spawn");

    let target_spawn = ActorSpawn::at(Vec3::new(0.0, 0.0, -10.0), Vec3::ZERO).team(2);
    let target = spawn_armed_actor(app.world_mut(), "laser", target_spawn.clone()).expect("spawn");
    let target_replica = spawn_armed_actor(
        app.world_mut(),
        "laser",
        target_spawn.role(NetRole::Replica).collider(None),
    )
    .expect("spawn");

    let link = Link {
        shooter,
        shooter_replica,
        target,
        target_replica,
    };

    app.insert_resource(link)
        .init_resource::<Log>()
        .add_systems(FixedUpdate, (transport, record).after(CombatSystems));

    (app, link)
}

fn run(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

fn weapon(app: &App, actor: Entity) -> &Weapon {
    app.world().get::<Weapon>(actor).expect("weapon")
}

fn health(app: &App, entity: Entity) -> &Health {
    app.world().get::<Health>(entity).expect("health")
}

#[test]
fn test_replica_input_is_forwarded_to_authority() {
    let (mut app, link) = create_replicated_app();

    // Игрок жмёт курок на своей (replica) копии
    app.world_mut().send_event(WeaponInput {
        actor: link.shooter_replica,
        request: WeaponRequest::StartFire,
    });
    run(&mut app, 3);

    assert!(weapon(&app, link.shooter_replica).wants_to_fire());
    assert!(weapon(&app, link.shooter).wants_to_fire());
    assert_eq!(weapon(&app, link.shooter).state(), WeaponState::Firing);

    run(&mut app, 57);

    // 100 HP / 20 за попадание = 5 попаданий; весь урон только от authority
    let log = app.world().resource::<Log>();
    assert!(!log.damage.is_empty());
    assert!(log.damage.iter().all(|hit| hit.instigator == Some(link.shooter)));
    assert!(log.damage.iter().all(|hit| hit.target == link.target));

    assert!(health(&app, link.target).is_dead());
    assert!(health(&app, link.target_replica).is_dead());
    assert_eq!(health(&app, link.target_replica).current(), 0.0);

    // Replica видит те же изменения health (damage = old − new)
    let replicated_damage: f32 = log
        .replica_health_changes
        .iter()
        .map(|event| event.change.damage)
        .sum();
    assert_eq!(replicated_damage, 100.0);

    let replica_death = log
        .deaths
        .iter()
        .find(|death| death.entity == link.target_replica)
        .expect("replica death edge");
    assert_eq!(replica_death.killer, None);
    assert!(log
        .deaths
        .iter()
        .any(|death| death.entity == link.target && death.killer == Some(link.shooter)));
}

#[test]
fn test_replica_effects_and_ammo_follow_authority() {
    let (mut app, link) = create_replicated_app();

    app.world_mut().send_event(WeaponInput {
        actor: link.shooter_replica,
        request: WeaponRequest::StartFire,
    });
    run(&mut app, 30);

    app.world_mut().send_event(WeaponInput {
        actor: link.shooter_replica,
        request: WeaponRequest::StopFire,
    });
    run(&mut app, 10);

    let authority = weapon(&app, link.shooter);
    let replica = weapon(&app, link.shooter_replica);

    assert_eq!(authority.state(), WeaponState::Idle);
    assert_eq!(replica.state(), WeaponState::Idle);
    assert!(authority.ammo_in_clip() < 20);
    assert_eq!(replica.ammo_in_clip(), authority.ammo_in_clip());
    assert_eq!(replica.ammo_reserve(), authority.ammo_reserve());
    assert_eq!(
        replica.last_trace().replication_count,
        authority.last_trace().replication_count
    );

    let log = app.world().resource::<Log>();
    let authority_shots = log
        .effects
        .iter()
        .filter(|effect| effect.actor == link.shooter)
        .count();
    let predicted = log
        .effects
        .iter()
        .filter(|effect| effect.actor == link.shooter_replica && effect.predicted)
        .count();
    let replicated: Vec<u8> = log
        .effects
        .iter()
        .filter(|effect| effect.actor == link.shooter_replica && !effect.predicted)
        .map(|effect| effect.trace.replication_count)
        .collect();

    assert_eq!(authority_shots as u32, 20 - authority.ammo_in_clip());
    assert!(predicted > 0);

    // Каждый новый authority trace доходит до replica не больше одного раза
    let mut unique = replicated.clone();
    unique.dedup();
    assert_eq!(unique, replicated);
    assert!(!replicated.is_empty());
}

#[test]
fn test_replica_reload_follows_authority() {
    let (mut app, link) = create_replicated_app();

    app.world_mut().send_event(WeaponInput {
        actor: link.shooter_replica,
        request: WeaponRequest::StartFire,
    });
    run(&mut app, 10);
    app.world_mut().send_event(WeaponInput {
        actor: link.shooter_replica,
        request: WeaponRequest::StopFire,
    });
    run(&mut app, 5);

    app.world_mut().send_event(WeaponInput {
        actor: link.shooter_replica,
        request: WeaponRequest::StartReload,
    });
    run(&mut app, 5);

    // Authority начал reload, replica получила pending_reload снапшотом
    assert_eq!(weapon(&app, link.shooter).state(), WeaponState::Reloading);
    assert_eq!(weapon(&app, link.shooter_replica).state(), WeaponState::Reloading);
    assert!(weapon(&app, link.shooter_replica).pending_reload());

    run(&mut app, 90);

    assert_eq!(weapon(&app, link.shooter).ammo_in_clip(), 20);
    assert_eq!(weapon(&app, link.shooter_replica).ammo_in_clip(), 20);
    assert_eq!(weapon(&app, link.shooter_replica).state(), WeaponState::Idle);
    assert_eq!(
        weapon(&app, link.shooter_replica).ammo_reserve(),
        weapon(&app, link.shooter).ammo_reserve()
    );
}

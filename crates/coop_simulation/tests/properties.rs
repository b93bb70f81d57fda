//! Property-based тесты (proptest) для Health / Ammo / Weapon инвариантов

use coop_simulation::combat::{Ammo, OwnerState, Weapon, WeaponRequest, WeaponState, DEATH_FLOOR};
use coop_simulation::{Health, WeaponConfig};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum HealthOp {
    Damage(f32),
    Heal(f32),
}

fn health_op() -> impl Strategy<Value = HealthOp> {
    prop_oneof![
        (-50.0_f32..250.0).prop_map(HealthOp::Damage),
        (-50.0_f32..250.0).prop_map(HealthOp::Heal),
    ]
}

fn weapon_config() -> impl Strategy<Value = WeaponConfig> {
    (1_u32..40, 0_u32..6, any::<bool>(), any::<bool>(), 60.0_f32..1200.0).prop_map(
        |(ammo_per_clip, initial_clips, infinite_ammo, infinite_clip, rate_of_fire)| WeaponConfig {
            ammo_per_clip,
            initial_clips,
            infinite_ammo,
            infinite_clip,
            rate_of_fire,
            ..WeaponConfig::default()
        },
    )
}

#[derive(Debug, Clone, Copy)]
enum WeaponOp {
    Request(WeaponRequest),
    Advance(f32),
}

fn weapon_op() -> impl Strategy<Value = WeaponOp> {
    prop_oneof![
        Just(WeaponOp::Request(WeaponRequest::StartFire)),
        Just(WeaponOp::Request(WeaponRequest::StopFire)),
        Just(WeaponOp::Request(WeaponRequest::StartReload)),
        Just(WeaponOp::Request(WeaponRequest::StopReload)),
        (0.0_f32..1.5).prop_map(WeaponOp::Advance),
    ]
}

proptest! {
    #[test]
    fn damage_decreases_by_clamped_amount(max in 1.0_f32..500.0, first in 0.0_f32..1.0, amount in 0.001_f32..1000.0) {
        let mut health = Health::new(max);
        // Стартовое повреждение, чтобы health был где угодно в (floor, max]
        health.apply_damage(first * max * 0.99, None, None);
        let before = health.current();

        let change = health.apply_damage(amount, None, None).expect("alive, positive amount");

        let expected = amount.min(before - DEATH_FLOOR);
        prop_assert!((before - health.current() - expected).abs() < 1e-3);
        prop_assert!((change.damage - expected).abs() < 1e-3);
        prop_assert!(health.current() >= DEATH_FLOOR);
    }

    #[test]
    fn health_stays_in_bounds_and_death_is_final(ops in prop::collection::vec(health_op(), 1..64)) {
        let mut health = Health::new(100.0);
        let mut died = false;

        for op in ops {
            match op {
                HealthOp::Damage(amount) => { health.apply_damage(amount, None, None); }
                HealthOp::Heal(amount) => { health.apply_heal(amount); }
            }

            prop_assert!(health.current() >= DEATH_FLOOR);
            prop_assert!(health.current() <= health.max());

            if died {
                prop_assert!(health.is_dead());
            }
            died = health.is_dead();
        }
    }

    #[test]
    fn use_ammo_never_goes_negative(config in weapon_config(), uses in 0_usize..300) {
        let mut ammo = Ammo::initial(&config);

        for _ in 0..uses {
            let before = ammo;
            ammo.use_ammo(&config);

            if before.in_clip() == 0 && !config.infinite_clip {
                prop_assert_eq!(ammo, before);
            }
            prop_assert!(ammo.in_clip() <= config.ammo_per_clip);
            prop_assert!(ammo.total() >= ammo.in_clip());
        }
    }

    #[test]
    fn weapon_invariants_hold_under_any_input(
        config in weapon_config(),
        ops in prop::collection::vec(weapon_op(), 1..80),
    ) {
        let owner = OwnerState::default();
        let mut weapon = Weapon::authority(config.clone());
        let mut now = 0.0_f32;

        for op in ops {
            match op {
                WeaponOp::Request(request) => weapon.request(request, now, &owner),
                WeaponOp::Advance(delta) => {
                    now += delta;
                    weapon.advance(now, &owner);
                }
            }

            let ammo = weapon.ammo();
            prop_assert!(ammo.in_clip() <= config.ammo_per_clip);
            prop_assert!(ammo.total() >= ammo.in_clip());
            prop_assert!(weapon.scheduled_timers() <= 3);

            match weapon.state() {
                WeaponState::Firing => prop_assert!(weapon.is_fire_tick_scheduled()),
                _ => prop_assert!(!weapon.is_fire_tick_scheduled()),
            }
            if weapon.state() == WeaponState::Reloading {
                prop_assert!(weapon.pending_reload());
            }
        }
    }

    #[test]
    fn stop_fire_twice_equals_once(config in weapon_config(), fire_for in 0.0_f32..3.0) {
        let owner = OwnerState::default();
        let mut weapon = Weapon::authority(config);

        weapon.start_fire(0.0, &owner);
        weapon.advance(fire_for, &owner);
        weapon.stop_fire(fire_for, &owner);
        weapon.drain_events();

        let state = weapon.state();
        let timers = weapon.scheduled_timers();
        let ammo = weapon.ammo();

        weapon.stop_fire(fire_for, &owner);

        prop_assert_eq!(weapon.state(), state);
        prop_assert_eq!(weapon.scheduled_timers(), timers);
        prop_assert_eq!(weapon.ammo(), ammo);
        prop_assert!(weapon.drain_events().is_empty());
    }
}

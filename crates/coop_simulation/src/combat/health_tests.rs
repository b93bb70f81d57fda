//! Tests for Health model.

#[cfg(test)]
mod tests {
    use super::super::health::*;
    use crate::combat::replication::HealthSnapshot;
    use crate::components::NetRole;
    use bevy::prelude::*;

    #[test]
    fn test_overkill_clamps_to_floor() {
        let mut health = Health::new(100.0);

        let change = health.apply_damage(150.0, None, None).expect("damage accepted");

        assert_eq!(health.current(), 0.0);
        assert!(health.is_dead());
        assert_eq!(change.health, 0.0);
        assert_eq!(change.damage, 100.0); // clamped, не 150
    }

    #[test]
    fn test_damage_then_heal() {
        let mut health = Health::new(100.0);

        health.apply_damage(30.0, None, None);
        let heal = health.apply_heal(10.0).expect("heal accepted");

        assert_eq!(health.current(), 80.0);
        assert_eq!(heal.damage, -10.0);
        assert!(health.is_alive());
    }

    #[test]
    fn test_heal_is_capped_at_max() {
        let mut health = Health::new(100.0);
        health.apply_damage(5.0, None, None);

        let change = health.apply_heal(50.0).expect("heal accepted");
        assert_eq!(health.current(), 100.0);
        assert_eq!(change.damage, -5.0);

        // Полный health: heal принимается, но damage = 0
        let change = health.apply_heal(10.0).expect("heal accepted");
        assert_eq!(change.damage, 0.0);
    }

    #[test]
    fn test_non_positive_amounts_rejected() {
        let mut health = Health::new(100.0);

        assert!(health.apply_damage(0.0, None, None).is_none());
        assert!(health.apply_damage(-5.0, None, None).is_none());
        assert!(health.apply_damage(f32::NAN, None, None).is_none());
        assert!(health.apply_heal(0.0).is_none());
        assert_eq!(health.current(), 100.0);
    }

    #[test]
    fn test_dead_cannot_be_damaged_or_healed() {
        let mut health = Health::new(50.0);
        health.apply_damage(50.0, None, None);
        assert!(health.is_dead());

        assert!(health.apply_damage(10.0, None, None).is_none());
        assert!(health.apply_heal(100.0).is_none());
        assert!(health.is_dead());
        assert_eq!(health.current(), 0.0);
    }

    #[test]
    fn test_change_carries_instigator_and_cause() {
        let mut world = World::new();
        let shooter = world.spawn_empty().id();
        let weapon = world.spawn_empty().id();

        let mut health = Health::new(100.0);
        let change = health
            .apply_damage(20.0, Some(shooter), Some(weapon))
            .expect("damage accepted");

        assert_eq!(change.instigator, Some(shooter));
        assert_eq!(change.cause, Some(weapon));
        assert_eq!(change.health, 80.0);
    }

    #[test]
    fn test_is_friendly() {
        let red = Health::new(100.0).with_team(1);
        let red_too = Health::new(100.0).with_team(1);
        let blue = Health::new(100.0).with_team(2);

        assert!(Health::is_friendly(Some(&red), Some(&red_too)));
        assert!(!Health::is_friendly(Some(&red), Some(&blue)));
        // Permissive default: нет Health → friendly
        assert!(Health::is_friendly(None, Some(&blue)));
        assert!(Health::is_friendly(Some(&red), None));
    }

    #[test]
    fn test_default_team_is_no_team() {
        let a = Health::default();
        let b = Health::default();

        assert_eq!(a.team_id(), NO_TEAM);
        assert!(Health::is_friendly(Some(&a), Some(&b)));
    }

    #[test]
    fn test_replica_rejects_mutations() {
        let mut replica = Health::new(100.0).with_role(NetRole::Replica);

        assert!(replica.apply_damage(10.0, None, None).is_none());
        assert!(replica.apply_heal(10.0).is_none());
        assert_eq!(replica.current(), 100.0);
    }

    #[test]
    fn test_replica_applies_snapshot() {
        let mut replica = Health::new(100.0).with_role(NetRole::Replica);

        let change = replica
            .apply_snapshot(&HealthSnapshot {
                health: 60.0,
                is_dead: false,
            })
            .expect("snapshot changes health");
        assert_eq!(change.damage, 40.0);
        assert_eq!(replica.current(), 60.0);

        // Дубликат → нет notification
        assert!(replica
            .apply_snapshot(&HealthSnapshot {
                health: 60.0,
                is_dead: false,
            })
            .is_none());

        replica.apply_snapshot(&HealthSnapshot {
            health: 0.0,
            is_dead: true,
        });
        assert!(replica.is_dead());

        // Death одноразовый даже через snapshot
        replica.apply_snapshot(&HealthSnapshot {
            health: 50.0,
            is_dead: false,
        });
        assert!(replica.is_dead());
    }

    #[test]
    fn test_authority_ignores_snapshot() {
        let mut health = Health::new(100.0);

        assert!(health
            .apply_snapshot(&HealthSnapshot {
                health: 1.0,
                is_dead: false,
            })
            .is_none());
        assert_eq!(health.current(), 100.0);
        assert_eq!(health.snapshot().health, 100.0);
    }
}

//! Damage application system (PointDamage → Health).

use bevy::prelude::*;

use crate::combat::{Dead, EntityDied, HealRequest, Health, HealthChanged, PointDamage};
use crate::components::{CombatStats, StatEvent};
use crate::config::MatchRules;

/// System: apply resolved hits to Health
///
/// 1. Friendly fire: при выключенном FF урон от союзника (instigator ≠ target) отбрасывается
/// 2. Health::apply_damage (clamp, death edge)
/// 3. HealthChanged: ровно один на принятый hit
/// 4. Statistics: DamageDone / DamageTaken, Kill на death edge
/// 5. EntityDied + маркер Dead
pub fn apply_point_damage(
    mut commands: Commands,
    rules: Res<MatchRules>,
    mut hits: EventReader<PointDamage>,
    mut healths: Query<&mut Health>,
    mut stats: Query<&mut CombatStats>,
    mut health_changed: EventWriter<HealthChanged>,
    mut entity_died: EventWriter<EntityDied>,
) {
    for hit in hits.read() {
        let instigator_health = hit
            .instigator
            .and_then(|instigator| healths.get(instigator).ok().cloned());

        let Ok(mut target_health) = healths.get_mut(hit.target) else {
            // Стена / prop без Health: просто impact эффект
            continue;
        };

        if !rules.friendly_fire {
            if let Some(instigator) = hit.instigator {
                if instigator != hit.target
                    && Health::is_friendly(instigator_health.as_ref(), Some(&target_health))
                {
                    crate::logger::log(&format!(
                        "Friendly fire suppressed: {:?} → {:?}",
                        instigator, hit.target
                    ));
                    continue;
                }
            }
        }

        let Some(change) = target_health.apply_damage(hit.amount, hit.instigator, hit.cause) else {
            continue;
        };
        let died = target_health.is_dead();

        health_changed.write(HealthChanged {
            entity: hit.target,
            change,
        });

        if let Ok(mut target_stats) = stats.get_mut(hit.target) {
            target_stats.register(StatEvent::DamageTaken(change.damage));
        }
        if let Some(instigator) = hit.instigator {
            if let Ok(mut instigator_stats) = stats.get_mut(instigator) {
                instigator_stats.register(StatEvent::DamageDone(change.damage));
            }
        }

        if !died {
            continue;
        }

        entity_died.write(EntityDied {
            entity: hit.target,
            killer: hit.instigator,
        });

        if let Ok(mut entity_commands) = commands.get_entity(hit.target) {
            entity_commands.insert(Dead);
        }

        // Kill credit (самоубийство не засчитывается)
        if let Some(killer) = hit.instigator.filter(|killer| *killer != hit.target) {
            if let Ok(mut killer_stats) = stats.get_mut(killer) {
                killer_stats.register(StatEvent::Kill {
                    score: rules.kill_score,
                });
            }
        }

        crate::logger::log_info(&format!(
            "Entity {:?} killed by {:?}",
            hit.target, hit.instigator
        ));
    }
}

/// System: HealRequest → Health::apply_heal
///
/// Принятый heal → HealthChanged с отрицательным damage (0 на полном health).
/// Мёртвые, replica и amount ≤ 0 отклоняются молча.
pub fn apply_heals(
    mut requests: EventReader<HealRequest>,
    mut healths: Query<&mut Health>,
    mut health_changed: EventWriter<HealthChanged>,
) {
    for request in requests.read() {
        let Ok(mut health) = healths.get_mut(request.entity) else {
            continue;
        };

        if let Some(change) = health.apply_heal(request.amount) {
            health_changed.write(HealthChanged {
                entity: request.entity,
                change,
            });
        }
    }
}

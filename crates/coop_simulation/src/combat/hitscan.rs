//! Hit-scan: cone spread, ray tracing, surface classification
//!
//! Трейсер: trait (host подставляет свой physics query).
//! `ColliderTracer`: встроенная реализация ray-vs-sphere по `HitCollider`.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::Position;

/// Surface classification on a hit point (выбирает множитель урона)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum SurfaceType {
    #[default]
    Default,
    FleshDefault,
    FleshVulnerable,
}

/// Результат одного trace
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraceHit {
    pub entity: Entity,
    pub point: Vec3,
    pub normal: Vec3,
    pub surface: SurfaceType,
    pub distance: f32,
}

/// Latest shot snapshot (effects playback + replication).
///
/// `replication_count` растёт (wrapping) на каждый authority выстрел:
/// receiver отличает новый выстрел от повторной доставки того же снапшота.
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect, Serialize, Deserialize)]
pub struct HitScanTrace {
    pub origin: Vec3,
    pub direction: Vec3,
    pub trace_end: Vec3,
    pub did_hit: bool,
    pub hit_point: Vec3,
    pub hit_normal: Vec3,
    pub surface: SurfaceType,
    pub replication_count: u8,
}

/// Ray query: first blocking hit on the segment `origin → end`, skipping `ignore`.
pub trait HitScanTracer {
    fn trace(&self, origin: Vec3, end: Vec3, ignore: &[Entity]) -> Option<TraceHit>;
}

/// Sphere hit volume centered on the entity's `Position`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
#[require(Position)]
pub struct HitCollider {
    pub radius: f32,
    pub surface: SurfaceType,
}

impl Default for HitCollider {
    fn default() -> Self {
        Self {
            radius: 0.5,
            surface: SurfaceType::FleshDefault,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SphereVolume {
    entity: Entity,
    center: Vec3,
    radius: f32,
    surface: SurfaceType,
}

/// Ray-vs-sphere tracer over a frame snapshot of colliders
#[derive(Debug, Clone, Default)]
pub struct ColliderTracer {
    volumes: Vec<SphereVolume>,
}

impl ColliderTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity, center: Vec3, radius: f32, surface: SurfaceType) {
        if radius > 0.0 {
            self.volumes.push(SphereVolume {
                entity,
                center,
                radius,
                surface,
            });
        }
    }

    pub fn from_colliders<'a>(
        colliders: impl IntoIterator<Item = (Entity, &'a Position, &'a HitCollider)>,
    ) -> Self {
        let mut tracer = Self::new();
        for (entity, position, collider) in colliders {
            tracer.add(entity, position.0, collider.radius, collider.surface);
        }
        tracer
    }

    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }
}

impl HitScanTracer for ColliderTracer {
    fn trace(&self, origin: Vec3, end: Vec3, ignore: &[Entity]) -> Option<TraceHit> {
        let segment = end - origin;
        let length = segment.length();
        if length <= f32::EPSILON {
            return None;
        }
        let direction = segment / length;

        self.volumes
            .iter()
            .filter(|volume| !ignore.contains(&volume.entity))
            .filter_map(|volume| {
                let distance = ray_sphere(origin, direction, volume.center, volume.radius)?;
                if distance > length {
                    return None;
                }

                let point = origin + direction * distance;
                let normal = (point - volume.center).try_normalize().unwrap_or(-direction);

                Some(TraceHit {
                    entity: volume.entity,
                    point,
                    normal,
                    surface: volume.surface,
                    distance,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Distance along a unit ray to the sphere surface; origin inside → 0.
fn ray_sphere(origin: Vec3, direction: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = origin - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = offset.dot(direction);
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t >= 0.0).then_some(t)
}

/// Random direction inside an elliptical cone around `direction`.
///
/// `half_yaw`/`half_pitch`: полуугла (радианы) по горизонтали и вертикали.
/// Азимут равномерный, отклонение ограничено радиусом эллипса на этом азимуте.
pub fn cone_spread<R: Rng + ?Sized>(direction: Vec3, half_yaw: f32, half_pitch: f32, rng: &mut R) -> Vec3 {
    let forward = direction.try_normalize().unwrap_or(Vec3::NEG_Z);
    if !(half_yaw > 0.0 && half_pitch > 0.0) {
        return forward;
    }

    let right = match forward.cross(Vec3::Y).try_normalize() {
        Some(right) => right,
        None => forward.any_orthonormal_pair().0,
    };
    let up = right.cross(forward);

    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let (sin, cos) = theta.sin_cos();

    // Радиус эллипса (half_yaw, half_pitch) в направлении theta
    let bound = half_yaw * half_pitch / ((half_pitch * cos).powi(2) + (half_yaw * sin).powi(2)).sqrt();
    let deflection = bound * rng.gen::<f32>().sqrt();

    let offset_axis = right * cos + up * sin;
    (forward * deflection.cos() + offset_axis * deflection.sin()).normalize_or(forward)
}

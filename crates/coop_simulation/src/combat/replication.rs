//! Replicated state layout (weapon + health snapshots)
//!
//! Минимальный wire набор: clip/total, pending reload, последний trace
//! (с replication counter), health, is_dead. Entity id в wire не попадает:
//! маппинг на entity делает транспорт хоста.
//!
//! Codec: bincode (serde, standard config).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::combat::hitscan::HitScanTrace;
use crate::error::SnapshotError;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeaponSnapshot {
    pub ammo_in_clip: u32,
    pub ammo_total: u32,
    pub pending_reload: bool,
    pub trace: HitScanTrace,
}

impl WeaponSnapshot {
    pub fn reserve(&self) -> u32 {
        self.ammo_total.saturating_sub(self.ammo_in_clip)
    }

    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        decode(bytes)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HealthSnapshot {
    pub health: f32,
    pub is_dead: bool,
}

impl HealthSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        encode(self)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        decode(bytes)
    }
}

fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, SnapshotError> {
    Ok(bincode::serde::encode_to_vec(value, bincode::config::standard())?)
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SnapshotError> {
    let (value, read) = bincode::serde::decode_from_slice::<T, _>(bytes, bincode::config::standard())?;
    if read != bytes.len() {
        return Err(SnapshotError::TrailingBytes(bytes.len() - read));
    }
    Ok(value)
}

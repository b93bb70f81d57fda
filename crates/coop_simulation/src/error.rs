//! Errors на fallible краях симуляции.
//!
//! Геймплейные операции (fire, reload, damage, heal) не возвращают ошибок:
//! невалидный запрос = no-op. `Result` только там, где хосту есть что решать:
//! конфиг оружия, спавн актора, codec снапшотов.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("rate of fire must be in (0, 6000] rounds per minute, got {0}")]
    InvalidRateOfFire(f32),

    #[error("ammo per clip must be at least 1")]
    EmptyClip,

    #[error("`{field}` must be a non-negative number, got {value}")]
    Negative { field: &'static str, value: f32 },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    #[error("weapon config `{0}` is not registered")]
    MissingWeaponConfig(String),

    #[error("weapon config `{id}` is invalid: {source}")]
    InvalidWeaponConfig {
        id: String,
        #[source]
        source: ConfigError,
    },
}

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("snapshot has {0} trailing bytes")]
    TrailingBytes(usize),
}

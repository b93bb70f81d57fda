//! Network role (authority vs replica)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Кто пишет истину для health/ammo.
///
/// - `Authority`: единственный writer (server), применяет урон и двигает ammo/reload
/// - `Replica`: read-only копия: тот же read API, мутации отклоняются,
///   состояние меняется только через входящий snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum NetRole {
    #[default]
    Authority,
    Replica,
}

impl NetRole {
    pub fn is_authority(self) -> bool {
        matches!(self, NetRole::Authority)
    }

    pub fn is_replica(self) -> bool {
        matches!(self, NetRole::Replica)
    }
}

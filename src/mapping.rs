// MIT License - Copyright (c) 2026 adt2mqtt authors

use crate::error::{BridgeError, Result};

/// Arm state of the panel as reported by the SmartThings securitySystem
/// capability, together with the host's current-state code for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArmedState {
    /// "disarmed" - host code 0
    Disarmed,
    /// "armedAway" - host code 1
    ArmedAway,
    /// "armedStay" - host code 2
    ArmedStay,
}

impl ArmedState {
    /// Decode a raw status string from the API.
    ///
    /// Anything outside the three known values is an error, never a
    /// silently-undefined code.
    pub fn from_api_status(raw: &str) -> Result<Self> {
        match raw {
            "disarmed" => Ok(Self::Disarmed),
            "armedAway" => Ok(Self::ArmedAway),
            "armedStay" => Ok(Self::ArmedStay),
            other => Err(BridgeError::UnknownStatus { value: other.to_string() }),
        }
    }

    /// The host's current-state integer code.
    pub fn code(self) -> u8 {
        match self {
            Self::Disarmed => 0,
            Self::ArmedAway => 1,
            Self::ArmedStay => 2,
        }
    }

    /// The wire string used by the API (e.g., "armedAway").
    pub fn api_value(self) -> &'static str {
        match self {
            Self::Disarmed => "disarmed",
            Self::ArmedAway => "armedAway",
            Self::ArmedStay => "armedStay",
        }
    }
}

impl std::fmt::Display for ArmedState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.api_value())
    }
}

/// Which configured scene a target-state code resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneSlot {
    Home,
    Away,
    Night,
}

impl SceneSlot {
    /// Name of the device config field holding this slot's scene id.
    pub fn config_field(self) -> &'static str {
        match self {
            Self::Home => "home_scene",
            Self::Away => "away_scene",
            Self::Night => "night_scene",
        }
    }
}

/// Host target-state code (0-3) to scene slot, by position.
/// Codes 0 and 3 both resolve to the home scene.
const TARGET_SCENE_SLOTS: [SceneSlot; 4] = [
    SceneSlot::Home,
    SceneSlot::Away,
    SceneSlot::Night,
    SceneSlot::Home,
];

/// Encode a host target-state code into the scene slot to execute.
pub fn scene_slot_for_target(code: i64) -> Result<SceneSlot> {
    usize::try_from(code)
        .ok()
        .and_then(|i| TARGET_SCENE_SLOTS.get(i))
        .copied()
        .ok_or(BridgeError::TargetOutOfRange { code })
}

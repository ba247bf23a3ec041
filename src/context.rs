// MIT License - Copyright (c) 2026 adt2mqtt authors

use uuid::Uuid;

use crate::error::{BridgeError, Result};
use crate::mapping::SceneSlot;

/// Namespace for deriving accessory ids from device identifiers.
/// Fixed so the same config entry maps to the same accessory across runs.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x8f2f_1c6a_74d5_44f0_9a3b_5ce0_21d7_6b42);

/// Immutable per-accessory configuration: which SmartThings device to read
/// status from, the API key to reach it, and the scene to execute for each
/// target state.
///
/// Validated at construction; every field must be non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceContext {
    display_name: String,
    device_id: String,
    api_key: String,
    home_scene: String,
    away_scene: String,
    night_scene: String,
}

impl DeviceContext {
    pub fn builder() -> DeviceContextBuilder {
        DeviceContextBuilder::default()
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The configured scene id for a slot.
    pub fn scene_id(&self, slot: SceneSlot) -> &str {
        match slot {
            SceneSlot::Home => &self.home_scene,
            SceneSlot::Away => &self.away_scene,
            SceneSlot::Night => &self.night_scene,
        }
    }

    /// Deterministic accessory id, derived from the device identifier.
    pub fn accessory_id(&self) -> Uuid {
        Uuid::new_v5(&ACCESSORY_NAMESPACE, self.device_id.as_bytes())
    }
}

/// Builder for DeviceContext. `build` rejects missing or empty fields.
#[derive(Debug, Clone, Default)]
pub struct DeviceContextBuilder {
    display_name: String,
    device_id: String,
    api_key: String,
    home_scene: String,
    away_scene: String,
    night_scene: String,
}

impl DeviceContextBuilder {
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn device_id(mut self, id: impl Into<String>) -> Self {
        self.device_id = id.into();
        self
    }

    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    pub fn home_scene(mut self, scene: impl Into<String>) -> Self {
        self.home_scene = scene.into();
        self
    }

    pub fn away_scene(mut self, scene: impl Into<String>) -> Self {
        self.away_scene = scene.into();
        self
    }

    pub fn night_scene(mut self, scene: impl Into<String>) -> Self {
        self.night_scene = scene.into();
        self
    }

    pub fn build(self) -> Result<DeviceContext> {
        fn require(value: &str, field: &'static str) -> Result<()> {
            if value.trim().is_empty() {
                return Err(BridgeError::MissingConfigField { field });
            }
            Ok(())
        }

        require(&self.display_name, "display_name")?;
        require(&self.device_id, "device_id")?;
        require(&self.api_key, "api_key")?;
        require(&self.home_scene, "home_scene")?;
        require(&self.away_scene, "away_scene")?;
        require(&self.night_scene, "night_scene")?;

        Ok(DeviceContext {
            display_name: self.display_name,
            device_id: self.device_id,
            api_key: self.api_key,
            home_scene: self.home_scene,
            away_scene: self.away_scene,
            night_scene: self.night_scene,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> DeviceContextBuilder {
        DeviceContext::builder()
            .display_name("Front Panel")
            .device_id("device-123")
            .api_key("token-abc")
            .home_scene("homeScene")
            .away_scene("awayScene")
            .night_scene("nightScene")
    }

    #[test]
    fn test_build_valid_context() {
        let ctx = builder().build().unwrap();
        assert_eq!(ctx.display_name(), "Front Panel");
        assert_eq!(ctx.device_id(), "device-123");
        assert_eq!(ctx.scene_id(SceneSlot::Home), "homeScene");
        assert_eq!(ctx.scene_id(SceneSlot::Away), "awayScene");
        assert_eq!(ctx.scene_id(SceneSlot::Night), "nightScene");
    }

    #[test]
    fn test_missing_fields_rejected() {
        let cases: [(DeviceContextBuilder, &str); 4] = [
            (builder().api_key(""), "api_key"),
            (builder().device_id("  "), "device_id"),
            (builder().home_scene(""), "home_scene"),
            (builder().night_scene(""), "night_scene"),
        ];
        for (b, expected) in cases {
            match b.build() {
                Err(BridgeError::MissingConfigField { field }) => assert_eq!(field, expected),
                other => panic!("expected MissingConfigField({expected}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_accessory_id_deterministic() {
        let a = builder().build().unwrap();
        let b = builder().display_name("Renamed").build().unwrap();
        // Same device id, same accessory id, regardless of other fields
        assert_eq!(a.accessory_id(), b.accessory_id());

        let c = builder().device_id("device-456").build().unwrap();
        assert_ne!(a.accessory_id(), c.accessory_id());
    }
}

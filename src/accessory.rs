// MIT License - Copyright (c) 2026 adt2mqtt authors

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::PanelApi;
use crate::context::DeviceContext;
use crate::error::Result;
use crate::host::{AccessoryInfo, SecuritySystemControl};
use crate::mapping::{scene_slot_for_target, ArmedState};

/// Metadata reported for every panel accessory.
pub const ACCESSORY_INFO: AccessoryInfo = AccessoryInfo {
    manufacturer: "Samsung",
    model: "ADT Panel",
    serial_number: "123-456-789",
};

/// Bridges one security-system accessory to the SmartThings API.
///
/// Reads go through the device-status endpoint and the armed-state table;
/// writes go through the target-state table and the scene-execution
/// endpoint. No retry, no caching; every host call is one HTTP exchange.
pub struct SecuritySystemAccessory {
    context: DeviceContext,
    api: Arc<dyn PanelApi>,
}

impl SecuritySystemAccessory {
    pub fn new(context: DeviceContext, api: Arc<dyn PanelApi>) -> Self {
        Self { context, api }
    }

    pub fn context(&self) -> &DeviceContext {
        &self.context
    }
}

#[async_trait]
impl SecuritySystemControl for SecuritySystemAccessory {
    async fn current_state(&self) -> Result<u8> {
        let raw = self
            .api
            .security_system_status(self.context.device_id())
            .await?;
        let state = ArmedState::from_api_status(&raw)?;
        debug!(
            device = self.context.display_name(),
            status = %state,
            code = state.code(),
            "current state"
        );
        Ok(state.code())
    }

    async fn set_target_state(&self, value: i64) -> Result<i64> {
        let slot = scene_slot_for_target(value)?;
        let scene_id = self.context.scene_id(slot);
        debug!(
            device = self.context.display_name(),
            target = value,
            scene = scene_id,
            "set target state"
        );
        self.api.execute_scene(scene_id).await?;
        Ok(value)
    }
}

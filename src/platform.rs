// MIT License - Copyright (c) 2026 adt2mqtt authors

use std::sync::Arc;

use tracing::{info, warn};

use crate::accessory::{SecuritySystemAccessory, ACCESSORY_INFO};
use crate::client::{PanelApi, SmartThingsClient};
use crate::context::DeviceContext;
use crate::host::{Accessory, AccessoryHost};

/// Host-lifecycle entry point: turns configured devices into registered
/// accessories once the host has finished launching.
pub struct Platform {
    devices: Vec<DeviceContext>,
}

impl Platform {
    pub fn new(devices: Vec<DeviceContext>) -> Self {
        Self { devices }
    }

    pub fn devices(&self) -> &[DeviceContext] {
        &self.devices
    }

    /// Register one accessory per configured device, skipping devices whose
    /// accessory id the host already restored from its cache. Returns the
    /// number of accessories registered.
    ///
    /// Restored accessories keep whatever inert handler the host gave them;
    /// they are warned about, not re-wired.
    pub fn launch(&self, host: &mut dyn AccessoryHost) -> usize {
        self.launch_with(host, |device| {
            Arc::new(SmartThingsClient::new(device.api_key())) as Arc<dyn PanelApi>
        })
    }

    /// `launch` with an injectable API client factory.
    pub fn launch_with<F>(&self, host: &mut dyn AccessoryHost, make_api: F) -> usize
    where
        F: Fn(&DeviceContext) -> Arc<dyn PanelApi>,
    {
        let mut registered = 0;
        for device in &self.devices {
            let id = device.accessory_id();
            if host.restored().contains(&id) {
                warn!(
                    accessory = %id,
                    device = device.display_name(),
                    "accessory restored from host cache; get/set stay unwired until re-registered"
                );
                continue;
            }

            let api = make_api(device);
            let control = Arc::new(SecuritySystemAccessory::new(device.clone(), api));
            host.register(Accessory {
                id,
                display_name: device.display_name().to_string(),
                info: ACCESSORY_INFO,
                control,
            });
            info!(accessory = %id, device = device.display_name(), "registered accessory");
            registered += 1;
        }
        registered
    }
}

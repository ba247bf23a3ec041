// MIT License - Copyright (c) 2026 adt2mqtt authors
//
//! # adt-panel-bridge
//!
//! Exposes an ADT security panel, reachable through the SmartThings cloud
//! REST API, as a virtual security-system accessory toward a smart-home
//! host.
//!
//! The host reads the panel through a single characteristic pair: a
//! current-state get (one GET against the device-status endpoint, decoded
//! through the armed-state table) and a target-state set (one POST against
//! the scene-execution endpoint, encoded through the target-scene table).
//! Every exchange is single-shot: no retry, no caching, no reconciliation.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use adt_panel_bridge::{DeviceContext, PanelApi, SecuritySystemAccessory, SmartThingsClient};
//! use adt_panel_bridge::host::SecuritySystemControl;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let context = DeviceContext::builder()
//!         .display_name("Front Panel")
//!         .device_id("2e24162e-a854-41f8-9c2b-60c9913a2bfd")
//!         .api_key("smartthings-personal-access-token")
//!         .home_scene("homeScene")
//!         .away_scene("awayScene")
//!         .night_scene("nightScene")
//!         .build()?;
//!
//!     let api: Arc<dyn PanelApi> = Arc::new(SmartThingsClient::new(context.api_key()));
//!     let accessory = SecuritySystemAccessory::new(context, api);
//!
//!     let code = accessory.current_state().await?;
//!     println!("panel state code: {code}");
//!     Ok(())
//! }
//! ```

pub mod accessory;
pub mod client;
pub mod context;
pub mod error;
pub mod host;
pub mod mapping;
pub mod platform;

// Re-exports for convenience
pub use accessory::{SecuritySystemAccessory, ACCESSORY_INFO};
pub use client::{PanelApi, SmartThingsClient, SMARTTHINGS_BASE_URL};
pub use context::{DeviceContext, DeviceContextBuilder};
pub use error::{BridgeError, Result};
pub use host::{Accessory, AccessoryHost, AccessoryInfo, SecuritySystemControl};
pub use mapping::{scene_slot_for_target, ArmedState, SceneSlot};
pub use platform::Platform;

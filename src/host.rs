// MIT License - Copyright (c) 2026 adt2mqtt authors

//! Host-runtime boundary
//!
//! The smart-home host that owns accessory lifecycle and characteristic
//! get/set traffic is an external collaborator. These traits are the seam:
//! the platform controller registers accessories into an [`AccessoryHost`],
//! and the host drives each accessory through [`SecuritySystemControl`].

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;

/// Static accessory metadata surfaced to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessoryInfo {
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub serial_number: &'static str,
}

/// The security-system characteristic entry points.
///
/// Each call is a single resolve-or-fail exchange. Concurrent calls are not
/// serialized; each resolves independently with its own request/response
/// pair.
#[async_trait]
pub trait SecuritySystemControl: Send + Sync {
    /// Live current-state code (0 disarmed, 1 armed-away, 2 armed-stay).
    async fn current_state(&self) -> Result<u8>;

    /// Apply a target-state code (0-3) and echo the requested value back.
    /// The device is not re-read after the scene executes.
    async fn set_target_state(&self, value: i64) -> Result<i64>;
}

/// One registered accessory: identity, metadata, and its live control.
#[derive(Clone)]
pub struct Accessory {
    pub id: Uuid,
    pub display_name: String,
    pub info: AccessoryInfo,
    pub control: Arc<dyn SecuritySystemControl>,
}

impl std::fmt::Debug for Accessory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Accessory")
            .field("id", &self.id)
            .field("display_name", &self.display_name)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

/// Accessory registration surface of the host runtime.
pub trait AccessoryHost {
    /// Accessory ids the host restored from its on-disk cache at startup.
    /// Restored accessories are not re-wired to live controls.
    fn restored(&self) -> &[Uuid];

    /// Register a new accessory with the host.
    fn register(&mut self, accessory: Accessory);
}

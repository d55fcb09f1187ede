// ── Device controller ──
//
// Translates percent commands into lightpad HTTP calls. The address is
// resolved right before every call and the result is cached back into the
// registry and pushed to the accessory layer.

use std::sync::Arc;

use plumly_api::LightpadClient;
use tracing::{debug, warn};

use crate::accessory::AccessoryLayer;
use crate::address::AddressResolver;
use crate::error::CommandError;
use crate::model::{
    AddressRecord, Characteristics, DeviceHandle, LightpadId, MAX_PERCENT, device_to_percent,
    percent_to_device,
};
use crate::store::DeviceRegistry;

pub struct DeviceController {
    client: LightpadClient,
    registry: Arc<DeviceRegistry>,
    resolver: Arc<AddressResolver>,
    accessory: Arc<dyn AccessoryLayer>,
}

impl DeviceController {
    pub fn new(
        client: LightpadClient,
        registry: Arc<DeviceRegistry>,
        resolver: Arc<AddressResolver>,
        accessory: Arc<dyn AccessoryLayer>,
    ) -> Self {
        Self {
            client,
            registry,
            resolver,
            accessory,
        }
    }

    /// Set the load behind `lpid` to `percent` (0-100).
    pub async fn set_level(&self, lpid: &LightpadId, percent: u8) -> Result<(), CommandError> {
        if percent > MAX_PERCENT {
            return Err(CommandError::InvalidLevel { percent });
        }
        let (handle, record) = self.target(lpid)?;
        let level = percent_to_device(percent);
        debug!(%lpid, percent, level, "setting logical load level");

        self.client
            .set_logical_load_level(
                record.endpoint(),
                &handle.context.house.access_token,
                handle.llid(),
                level,
            )
            .await
            .map_err(|e| {
                warn!(%lpid, error = %e, "set level failed");
                CommandError::from_api(lpid, &e)
            })?;

        self.cache(lpid, level, percent);
        Ok(())
    }

    /// Read the current level of the load behind `lpid`, as a percentage.
    pub async fn get_level(&self, lpid: &LightpadId) -> Result<u8, CommandError> {
        let (handle, record) = self.target(lpid)?;

        let metrics = self
            .client
            .get_logical_load_metrics(
                record.endpoint(),
                &handle.context.house.access_token,
                handle.llid(),
            )
            .await
            .map_err(|e| {
                warn!(%lpid, error = %e, "get level failed");
                CommandError::from_api(lpid, &e)
            })?;

        let percent = device_to_percent(metrics.level);
        debug!(%lpid, level = metrics.level, percent, "logical load level");
        self.cache(lpid, metrics.level, percent);
        Ok(percent)
    }

    fn target(&self, lpid: &LightpadId) -> Result<(Arc<DeviceHandle>, AddressRecord), CommandError> {
        let handle = self
            .registry
            .get(lpid)
            .ok_or_else(|| CommandError::UnknownDevice { lpid: lpid.clone() })?;
        let record = self
            .resolver
            .lookup(lpid)
            .ok_or_else(|| CommandError::Unreachable { lpid: lpid.clone() })?;
        Ok((handle, record))
    }

    fn cache(&self, lpid: &LightpadId, level: u8, percent: u8) {
        let characteristics = Characteristics::from_percent(percent);
        if self.registry.record_level(lpid, level, characteristics) {
            self.accessory.update_characteristics(lpid, characteristics);
        }
    }
}

//! Channel registry
//!
//! Hands every device identity a MIDI channel on first sight and keeps the
//! set of currently connected devices. Channels are handed out in arrival
//! order starting at 0 and are never given to another identity, even after
//! the device that first held them is gone.

use std::collections::HashMap;

use tracing::debug;

use crate::controller::{DeviceId, DeviceInfo};
use crate::mapping::MappingError;

/// Logical MIDI channel assigned to a device
pub type Channel = u32;

/// What is left of a device after it has been retired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetiredDevice {
    pub channel: Channel,
    pub info: DeviceInfo,
}

#[derive(Debug, Default, Clone)]
pub struct ChannelRegistry {
    // Every identity ever seen, active or retired
    assignments: HashMap<DeviceId, Channel>,

    // Currently connected devices
    active: HashMap<DeviceId, DeviceInfo>,

    // Highest channel ever assigned, never decremented
    high_water: Option<Channel>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the channel of `device`, assigning the next unused one if the
    /// identity has never been seen. Retired identities keep their channel.
    pub fn ensure_channel(&mut self, device: DeviceId) -> Channel {
        if let Some(channel) = self.assignments.get(&device) {
            debug!("Device {} keeps channel {}", device, channel);
            return *channel;
        }

        let channel = self.next_channel();
        self.assignments.insert(device, channel);
        self.high_water = Some(channel);
        debug!("Assigned channel {} to device {}", channel, device);
        channel
    }

    /// Channel the next unseen identity would receive
    pub fn next_channel(&self) -> Channel {
        self.high_water.map_or(0, |max| max + 1)
    }

    /// Channel of an active device
    pub fn channel(&self, device: DeviceId) -> Result<Channel, MappingError> {
        if !self.active.contains_key(&device) {
            return Err(MappingError::UnknownDevice(device));
        }
        self.assignments
            .get(&device)
            .copied()
            .ok_or(MappingError::UnknownDevice(device))
    }

    pub fn register_handle(&mut self, device: DeviceId, info: DeviceInfo) {
        if self.active.insert(device, info).is_some() {
            debug!("Replaced handle of already active device {}", device);
        }
    }

    pub fn release_handle(&mut self, device: DeviceId) -> Result<DeviceInfo, MappingError> {
        self.active
            .remove(&device)
            .ok_or(MappingError::UnknownDevice(device))
    }

    pub fn handle(&self, device: DeviceId) -> Result<&DeviceInfo, MappingError> {
        self.active
            .get(&device)
            .ok_or(MappingError::UnknownDevice(device))
    }

    /// Drops `device` from the active set. Its channel stays reserved and the
    /// high-water mark is untouched.
    pub fn retire(&mut self, device: DeviceId) -> Result<RetiredDevice, MappingError> {
        let channel = self.channel(device)?;
        let info = self.release_handle(device)?;
        Ok(RetiredDevice { channel, info })
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(registry: &mut ChannelRegistry, id: usize) -> Channel {
        let device = DeviceId(id);
        registry.register_handle(device, DeviceInfo::new(format!("pad {id}"), 4));
        registry.ensure_channel(device)
    }

    #[test]
    fn channels_follow_arrival_order() {
        let mut registry = ChannelRegistry::new();
        assert_eq!(add(&mut registry, 17), 0);
        assert_eq!(add(&mut registry, 3), 1);
        assert_eq!(add(&mut registry, 9), 2);
        assert_eq!(registry.next_channel(), 3);
    }

    #[test]
    fn removing_highest_channel_keeps_high_water_mark() {
        let mut registry = ChannelRegistry::new();
        add(&mut registry, 1);
        add(&mut registry, 2);

        let retired = registry.retire(DeviceId(2)).unwrap();
        assert_eq!(retired.channel, 1);
        assert_eq!(registry.next_channel(), 2);

        assert_eq!(add(&mut registry, 5), 2);
    }

    #[test]
    fn same_identity_gets_its_old_channel_back() {
        let mut registry = ChannelRegistry::new();
        add(&mut registry, 1);
        add(&mut registry, 2);
        registry.retire(DeviceId(1)).unwrap();

        assert_eq!(add(&mut registry, 1), 0);
        assert_eq!(registry.next_channel(), 2);
    }

    #[test]
    fn retired_device_is_unknown() {
        let mut registry = ChannelRegistry::new();
        add(&mut registry, 1);
        registry.retire(DeviceId(1)).unwrap();

        assert_eq!(
            registry.channel(DeviceId(1)),
            Err(MappingError::UnknownDevice(DeviceId(1)))
        );
        assert!(registry.handle(DeviceId(1)).is_err());
        assert!(registry.retire(DeviceId(1)).is_err());
        assert_eq!(registry.active_count(), 0);
    }

    #[test]
    fn never_added_device_is_unknown() {
        let registry = ChannelRegistry::new();
        assert_eq!(
            registry.channel(DeviceId(42)),
            Err(MappingError::UnknownDevice(DeviceId(42)))
        );
        assert_eq!(registry.next_channel(), 0);
    }
}

//! DeviceRegistry: every configured switch, addressable by name or position.
//!
//! Each entry is a fully independent [`DeviceController`] with its own
//! transport; the registry only stores them and resolves references.
//!
//! # Device references
//!
//! The host refers to a device either by its exact configured name or by its
//! 1-based position in the configuration.  A name match wins, so a device
//! literally named `"2"` is still reachable by name.

use tracing::info;

use crate::application::device_controller::DeviceController;

/// In-memory collection of device controllers, in configuration order.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceController>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a controller.  Returns `false` (and drops nothing) if a device with
    /// the same name is already registered.
    pub fn add(&mut self, controller: DeviceController) -> bool {
        if self.contains_name(controller.name()) {
            return false;
        }
        self.devices.push(controller);
        true
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Returns `true` if a device with exactly this name is registered.
    /// Positional references are not considered.
    pub fn contains_name(&self, name: &str) -> bool {
        self.devices.iter().any(|d| d.name() == name)
    }

    /// Iterates over all controllers in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = &DeviceController> {
        self.devices.iter()
    }

    /// Resolves `reference` (name, then 1-based index) to a controller.
    pub fn get(&self, reference: &str) -> Option<&DeviceController> {
        self.position(reference).map(|i| &self.devices[i])
    }

    /// Mutable variant of [`DeviceRegistry::get`].
    pub fn get_mut(&mut self, reference: &str) -> Option<&mut DeviceController> {
        self.position(reference).map(move |i| &mut self.devices[i])
    }

    /// Powers off every device whose connection is open.  Used at shutdown.
    pub fn power_off_all(&mut self) {
        for device in self.devices.iter_mut().filter(|d| d.is_powered()) {
            info!(device = %device.name(), "closing connection for shutdown");
            device.power_off();
        }
    }

    fn position(&self, reference: &str) -> Option<usize> {
        if let Some(i) = self.devices.iter().position(|d| d.name() == reference) {
            return Some(i);
        }
        reference
            .parse::<usize>()
            .ok()
            .filter(|&n| n >= 1 && n <= self.devices.len())
            .map(|n| n - 1)
    }
}

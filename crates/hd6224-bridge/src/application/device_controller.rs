//! DeviceController: power and input selection for one HD6224A.
//!
//! The controller owns one [`SerialTransport`] and maps the host's requests
//! onto it:
//!
//! | Host request       | Transport action                     |
//! |--------------------|--------------------------------------|
//! | power on           | `open()` unless already open         |
//! | power off          | `close()`                            |
//! | is powered?        | `is_open()` (local, no I/O)          |
//! | select input N     | `write("//mN\r\n")`                  |
//! | current input?     | cached value, no I/O                 |
//!
//! # Failure policy
//!
//! Transport errors stop here.  Every `Err` is logged and swallowed, so the
//! public methods return plain values and the host never sees a serial fault.
//! The host therefore cannot tell "sent" from "delivered" from "failed"; the
//! switch sends no acknowledgement to tell them apart anyway.
//!
//! # Active input
//!
//! The active input is the argument of the last [`DeviceController::select_input`]
//! call, or [`InputId::DEFAULT`] before the first one.  It is updated before
//! the write is attempted and regardless of its outcome.  It is never read
//! back from the switch, so it can drift from reality if someone presses a
//! front-panel button.

use hd6224_core::{
    AccessoryInfo, InputDescriptor, InputId, KvmCommand, SerialSettings, INPUT_COUNT,
};
use tracing::{debug, error, info, info_span, warn, Span};

use crate::application::host::{DeviceEvent, HostCapabilities};
use crate::infrastructure::serial::{SerialTransport, TransportError};

/// Everything the controller needs to know about one configured switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    /// Display name, also used as the device reference in host commands.
    pub name: String,
    pub serial: SerialSettings,
    /// Labels for inputs 1 through 4.
    pub input_labels: [String; INPUT_COUNT],
}

/// Controller for one KVM switch.
pub struct DeviceController {
    profile: DeviceProfile,
    accessory: AccessoryInfo,
    inputs: Vec<InputDescriptor>,
    transport: Box<dyn SerialTransport>,
    active_input: InputId,
    host: HostCapabilities,
    span: Span,
}

impl DeviceController {
    /// Creates a controller and immediately tries to open the connection.
    ///
    /// An open failure is logged; the controller is still returned and starts
    /// in the powered-off state.
    pub fn new(
        profile: DeviceProfile,
        transport: Box<dyn SerialTransport>,
        host: HostCapabilities,
    ) -> Self {
        let span = info_span!(parent: host.span(), "device", name = %profile.name);
        let accessory = AccessoryInfo::new(profile.name.clone(), &profile.serial.path);
        let inputs = InputDescriptor::slots(&profile.input_labels);

        span.in_scope(|| {
            info!(
                path = %profile.serial.path,
                baud_rate = profile.serial.baud_rate,
                accessory_id = %accessory.id,
                inputs = ?profile.input_labels,
                "configuring device"
            );
        });

        let mut controller = Self {
            profile,
            accessory,
            inputs,
            transport,
            active_input: InputId::DEFAULT,
            host,
            span,
        };
        controller.open_transport();
        controller
    }

    /// Opens the connection if it is not already open.
    pub fn power_on(&mut self) {
        if self.transport.is_open() {
            self.span.in_scope(|| debug!("power on requested but port already open"));
        } else {
            self.open_transport();
        }
        self.notify_power();
    }

    /// Closes the connection.
    pub fn power_off(&mut self) {
        let result = self.transport.close();
        self.span.in_scope(|| match result {
            Ok(()) => debug!("serial connection closed"),
            Err(TransportError::NotOpen(_)) => warn!("power off requested but port was not open"),
            Err(e) => error!("failed to close serial connection: {e}"),
        });
        self.notify_power();
    }

    /// The host's "Active" toggle: `true` powers on, `false` powers off.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.power_on();
        } else {
            self.power_off();
        }
        self.span.in_scope(|| info!(active, "set active"));
    }

    /// Returns whether the connection is open.  Local check only.
    pub fn is_powered(&self) -> bool {
        let powered = self.transport.is_open();
        self.span.in_scope(|| debug!(powered, "get active"));
        powered
    }

    /// Records `input` as active and sends the select command.
    ///
    /// The identifier is not range-checked; anything outside `1..=4` is
    /// logged as a warning and sent as-is.
    pub fn select_input(&mut self, input: InputId) {
        self.active_input = input;
        let command = KvmCommand::SelectInput(input);
        let result = self.transport.write(&command.to_bytes());

        self.span.in_scope(|| {
            if !input.is_in_range() {
                warn!(%input, "input identifier outside 1..=4; sending anyway");
            }
            match result {
                Ok(()) => info!(%command, "command sent"),
                Err(e) => error!(%command, "failed to send command: {e}"),
            }
        });

        self.host.notify(DeviceEvent::InputSelected {
            device: self.profile.name.clone(),
            input,
        });
    }

    /// Returns the cached active input.  Never queries the switch.
    pub fn current_input(&self) -> InputId {
        self.span
            .in_scope(|| debug!(input = %self.active_input, "get active identifier"));
        self.active_input
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    pub fn accessory(&self) -> &AccessoryInfo {
        &self.accessory
    }

    /// The four input slot descriptors, in port order.
    pub fn inputs(&self) -> &[InputDescriptor] {
        &self.inputs
    }

    /// Label configured for `input`, if it names a physical slot.
    pub fn input_label(&self, input: InputId) -> Option<&str> {
        self.inputs
            .iter()
            .find(|slot| slot.id == input)
            .map(|slot| slot.label.as_str())
    }

    fn open_transport(&mut self) {
        let result = self.transport.open();
        self.span.in_scope(|| match result {
            Ok(()) => debug!("serial connection open"),
            Err(e) => error!("failed to open serial connection: {e}"),
        });
    }

    fn notify_power(&self) {
        self.host.notify(DeviceEvent::PowerChanged {
            device: self.profile.name.clone(),
            powered: self.transport.is_open(),
        });
    }
}

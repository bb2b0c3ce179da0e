//! Capabilities the automation host hands to each device controller.
//!
//! Controllers never reach for global state.  Everything they need from the
//! host arrives in a [`HostCapabilities`] value at construction:
//!
//! - a parent `tracing` span, so every log line a controller emits is nested
//!   under whatever context the host chose;
//! - an optional notification channel on which the controller publishes a
//!   [`DeviceEvent`] after each state change.
//!
//! Notifications are best-effort.  A host that dropped its receiver simply
//! stops hearing about changes; the controller keeps working.

use hd6224_core::InputId;
use tokio::sync::mpsc;
use tracing::Span;

/// A state change the host may want to reflect in its UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A power request completed; `powered` is the connection state afterwards.
    PowerChanged { device: String, powered: bool },
    /// An input-selection command was issued.
    InputSelected { device: String, input: InputId },
}

/// Logging context and notification sink supplied by the host.
#[derive(Debug, Clone)]
pub struct HostCapabilities {
    span: Span,
    events: Option<mpsc::UnboundedSender<DeviceEvent>>,
}

impl HostCapabilities {
    /// Creates capabilities that publish events on `events`.
    pub fn new(span: Span, events: mpsc::UnboundedSender<DeviceEvent>) -> Self {
        Self {
            span,
            events: Some(events),
        }
    }

    /// Creates capabilities together with the receiving end of the event channel.
    pub fn channel(span: Span) -> (Self, mpsc::UnboundedReceiver<DeviceEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(span, tx), rx)
    }

    /// Capabilities for a host that does not listen for events.
    pub fn detached() -> Self {
        Self {
            span: Span::none(),
            events: None,
        }
    }

    /// Parent span for controller log output.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Publishes `event` if a listener is attached.  Never fails.
    pub(crate) fn notify(&self, event: DeviceEvent) {
        if let Some(tx) = &self.events {
            // A closed channel means the host stopped listening; ignore it.
            let _ = tx.send(event);
        }
    }
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self::detached()
    }
}

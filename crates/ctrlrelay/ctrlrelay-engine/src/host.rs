use crate::descriptor::DeviceDescriptor;

/// Severity of a message sent to the host's log.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Message,
    Warning,
    Error,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("host rejected device '{device}': {reason}")]
    Rejected { device: String, reason: String },
}

/// Services the host hands to the plugin at initialization.
pub trait Host {
    /// Announce the device. Called once; a failure leaves the plugin inert.
    fn register_device(&mut self, descriptor: &DeviceDescriptor) -> Result<(), RegistrationError>;

    /// Fire-and-forget message to the host's own log.
    fn log(&mut self, severity: Severity, message: &str);
}

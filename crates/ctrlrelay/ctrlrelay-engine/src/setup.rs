use crate::descriptor::{DescriptorError, DeviceDescriptor};
use ctrlrelay_config::{RelayConfig, TransportConfig};
use ctrlrelay_events::FrameLayout;
use ctrlrelay_icc::{ShmSource, SocketSource, Transport};

#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("invalid channel table")]
    Descriptor(#[from] DescriptorError),
}

pub fn descriptor_from_config(cfg: &RelayConfig) -> Result<DeviceDescriptor, SetupError> {
    Ok(DeviceDescriptor::new(
        cfg.device.id.clone(),
        cfg.device.display_name.clone(),
        cfg.channels(),
    )?)
}

/// Build the configured transport for frames of shape `layout`. Nothing is
/// opened here.
pub fn transport_from_config(transport: &TransportConfig, layout: FrameLayout) -> Transport {
    match transport {
        TransportConfig::Shm { path } => ShmSource::new(path, layout).into(),
        TransportConfig::Socket { addr, .. } => SocketSource::new(*addr, layout)
            .with_read_timeout(transport.read_timeout())
            .into(),
    }
}

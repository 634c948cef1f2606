mod config;

pub use config::{
    ConfigError, DeviceConfig, FeederConfig, HostSimConfig, RelayConfig, TransportConfig,
};

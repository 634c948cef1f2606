use ctrlrelay_events::{Channel, Profile};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct RelayConfig {
    #[serde(default = "defaults::log_level")]
    pub log_level: String,
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub device: DeviceConfig,
    #[serde(default)]
    pub transport: TransportConfig,
    /// Replaces the profile's channel table when present.
    #[serde(default)]
    pub channels: Option<Vec<Channel>>,
    #[serde(default)]
    pub feeder: FeederConfig,
    #[serde(default)]
    pub hostsim: HostSimConfig,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct DeviceConfig {
    #[serde(default = "defaults::device_id")]
    pub id: String,
    #[serde(default = "defaults::device_display_name")]
    pub display_name: String,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransportConfig {
    Shm {
        #[serde(default = "defaults::shm_path")]
        path: PathBuf,
    },
    Socket {
        #[serde(default = "defaults::socket_addr")]
        addr: SocketAddr,
        /// Unset means block until the full frame arrives.
        #[serde(default)]
        read_timeout_ms: Option<u64>,
    },
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct FeederConfig {
    #[serde(default = "defaults::feeder_interval_ms")]
    pub interval_ms: u64,
    #[serde(default = "defaults::feeder_step")]
    pub step: f32,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct HostSimConfig {
    #[serde(default = "defaults::frame_hz")]
    pub frame_hz: u32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read '{path}'")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    Parse(#[from] toml::de::Error),
}

mod defaults {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::path::PathBuf;

    pub fn log_level() -> String {
        "info".into()
    }

    pub fn device_id() -> String {
        "laneassist".into()
    }

    pub fn device_display_name() -> String {
        "ETS2 Lane Assist".into()
    }

    pub fn shm_path() -> PathBuf {
        "/dev/shm/SCSControls".into()
    }

    pub fn socket_addr() -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, 39500))
    }

    pub fn feeder_interval_ms() -> u64 {
        10
    }

    pub fn feeder_step() -> f32 {
        0.005
    }

    pub fn frame_hz() -> u32 {
        60
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::log_level(),
            profile: Profile::default(),
            device: DeviceConfig::default(),
            transport: TransportConfig::default(),
            channels: None,
            feeder: FeederConfig::default(),
            hostsim: HostSimConfig::default(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            id: defaults::device_id(),
            display_name: defaults::device_display_name(),
        }
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        TransportConfig::Shm {
            path: defaults::shm_path(),
        }
    }
}

impl Default for FeederConfig {
    fn default() -> Self {
        Self {
            interval_ms: defaults::feeder_interval_ms(),
            step: defaults::feeder_step(),
        }
    }
}

impl Default for HostSimConfig {
    fn default() -> Self {
        Self {
            frame_hz: defaults::frame_hz(),
        }
    }
}

impl TransportConfig {
    /// Socket read timeout. Zero counts as unset.
    pub fn read_timeout(&self) -> Option<Duration> {
        match self {
            TransportConfig::Socket {
                read_timeout_ms: Some(ms),
                ..
            } if *ms > 0 => Some(Duration::from_millis(*ms)),
            _ => None,
        }
    }
}

impl RelayConfig {
    pub fn load(path: impl AsRef<Path> + ToString) -> Result<Self, ConfigError> {
        let toml_to_str = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&toml_to_str)
    }

    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// The channel table in effect: the custom table if given, else the profile's.
    pub fn channels(&self) -> Vec<Channel> {
        match &self.channels {
            Some(custom) => custom.clone(),
            None => self.profile.channels(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctrlrelay_events::ChannelKind;

    #[test]
    fn empty_document_gives_defaults() {
        let cfg = RelayConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, RelayConfig::default());
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.profile, Profile::LaneAssist);
        assert_eq!(cfg.device.id, "laneassist");
        assert_eq!(
            cfg.transport,
            TransportConfig::Shm {
                path: PathBuf::from("/dev/shm/SCSControls")
            }
        );
        assert_eq!(cfg.channels().len(), 19);
        assert_eq!(cfg.hostsim.frame_hz, 60);
    }

    #[test]
    fn socket_transport_with_timeout() {
        let cfg = RelayConfig::from_toml_str(
            r#"
            profile = "steering"

            [transport]
            kind = "socket"
            addr = "127.0.0.1:4000"
            read_timeout_ms = 250
            "#,
        )
        .unwrap();

        assert_eq!(cfg.profile, Profile::Steering);
        assert_eq!(
            cfg.transport,
            TransportConfig::Socket {
                addr: "127.0.0.1:4000".parse().unwrap(),
                read_timeout_ms: Some(250),
            }
        );
        assert_eq!(
            cfg.transport.read_timeout(),
            Some(Duration::from_millis(250))
        );
    }

    #[test]
    fn socket_transport_defaults_to_blocking() {
        let cfg = RelayConfig::from_toml_str("[transport]\nkind = \"socket\"\n").unwrap();
        assert_eq!(cfg.transport.read_timeout(), None);
        match cfg.transport {
            TransportConfig::Socket { addr, .. } => assert_eq!(addr.port(), 39500),
            other => panic!("unexpected transport {other:?}"),
        }
    }

    #[test]
    fn zero_read_timeout_means_blocking() {
        let cfg = RelayConfig::from_toml_str(
            "[transport]\nkind = \"socket\"\nread_timeout_ms = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.transport.read_timeout(), None);
    }

    #[test]
    fn custom_channel_table_overrides_profile() {
        let cfg = RelayConfig::from_toml_str(
            r#"
            [device]
            id = "bench"
            display_name = "Bench Rig"

            [[channels]]
            id = "steering"
            display_name = "Rig Steering"
            kind = "float"

            [[channels]]
            id = "light"
            display_name = "Rig Lights"
            kind = "bool"
            "#,
        )
        .unwrap();

        let channels = cfg.channels();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[1].kind, ChannelKind::Bool);
        assert_eq!(cfg.device.display_name, "Bench Rig");
    }

    #[test]
    fn unknown_transport_kind_is_a_parse_error() {
        let err = RelayConfig::from_toml_str("[transport]\nkind = \"pipe\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = RelayConfig::load("/nonexistent/ctrlrelay.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}

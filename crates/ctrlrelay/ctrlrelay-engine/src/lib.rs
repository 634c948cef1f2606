//! Semantic input device: turns one snapshot of channel values per frame
//! into a sequence of indexed poll results for the host.
//!
//! ```text
//! host ──poll(flags)──▶ InputPlugin ──▶ IndexMultiplexer ──cursor == 0──▶ FrameSampler ──▶ ChannelSource
//!      ◀──(index, value) or NotFound──────────────┘
//! ```

pub mod descriptor;
pub mod flags;
pub mod host;
pub mod multiplexer;
pub mod plugin;
pub mod sampler;
pub mod setup;

pub use descriptor::{DescriptorError, DeviceCategory, DeviceDescriptor};
pub use flags::{NotFound, PollFlags};
pub use host::{Host, RegistrationError, Severity};
pub use multiplexer::IndexMultiplexer;
pub use plugin::{INPUT_API_VERSION_1_00, InitError, InputPlugin};
pub use sampler::{FrameSampler, SamplerStats};
pub use setup::{SetupError, descriptor_from_config, transport_from_config};

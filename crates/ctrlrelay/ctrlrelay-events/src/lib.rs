#![forbid(unsafe_code)]

pub mod channel;
pub mod layout;
pub mod profile;
pub mod snapshot;

pub use channel::{Channel, ChannelKind, ChannelValue, InputEvent};
pub use layout::{ByteOrder, FrameLayout, LayoutError};
pub use profile::Profile;
pub use snapshot::Snapshot;

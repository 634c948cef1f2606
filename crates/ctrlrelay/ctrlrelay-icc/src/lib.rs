mod error;
mod shm;
mod socket;
mod source;
mod transport;

pub use error::{TransportError, TransportErrorKind};
pub use shm::ShmSource;
pub use socket::SocketSource;
pub use source::ChannelSource;
pub use transport::Transport;

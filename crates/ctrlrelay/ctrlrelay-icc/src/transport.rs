use crate::error::TransportError;
use crate::shm::ShmSource;
use crate::socket::SocketSource;
use crate::source::ChannelSource;
use ctrlrelay_events::{FrameLayout, Snapshot};

/// The transport selected at startup.
pub enum Transport {
    Shm(ShmSource),
    Socket(SocketSource),
}

impl Transport {
    pub fn name(&self) -> &'static str {
        match self {
            Transport::Shm(_) => "shm",
            Transport::Socket(_) => "socket",
        }
    }
}

impl From<ShmSource> for Transport {
    fn from(src: ShmSource) -> Self {
        Transport::Shm(src)
    }
}

impl From<SocketSource> for Transport {
    fn from(src: SocketSource) -> Self {
        Transport::Socket(src)
    }
}

impl ChannelSource for Transport {
    fn open(&mut self) -> Result<(), TransportError> {
        match self {
            Transport::Shm(s) => s.open(),
            Transport::Socket(s) => s.open(),
        }
    }

    fn read(&mut self) -> Result<Snapshot, TransportError> {
        match self {
            Transport::Shm(s) => s.read(),
            Transport::Socket(s) => s.read(),
        }
    }

    fn close(&mut self) {
        match self {
            Transport::Shm(s) => s.close(),
            Transport::Socket(s) => s.close(),
        }
    }

    fn is_open(&self) -> bool {
        match self {
            Transport::Shm(s) => s.is_open(),
            Transport::Socket(s) => s.is_open(),
        }
    }

    fn layout(&self) -> FrameLayout {
        match self {
            Transport::Shm(s) => s.layout(),
            Transport::Socket(s) => s.layout(),
        }
    }

    fn endpoint(&self) -> String {
        match self {
            Transport::Shm(s) => s.endpoint(),
            Transport::Socket(s) => s.endpoint(),
        }
    }
}

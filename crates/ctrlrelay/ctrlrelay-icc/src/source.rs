use crate::error::TransportError;
use ctrlrelay_events::{FrameLayout, Snapshot};

/// Where channel values come from.
///
/// A source owns at most one open connection handle. `read` before a
/// successful `open`, or after `close`, fails; callers are expected to fall
/// back to a neutral snapshot rather than propagate the error.
pub trait ChannelSource {
    fn open(&mut self) -> Result<(), TransportError>;

    /// Fetch the current raw (unclamped) values.
    fn read(&mut self) -> Result<Snapshot, TransportError>;

    /// Release the connection handle. Safe to call when already closed.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    fn layout(&self) -> FrameLayout;

    /// Human-readable endpoint for log lines (a path or an address).
    fn endpoint(&self) -> String;
}

impl<S: ChannelSource + ?Sized> ChannelSource for Box<S> {
    fn open(&mut self) -> Result<(), TransportError> {
        (**self).open()
    }

    fn read(&mut self) -> Result<Snapshot, TransportError> {
        (**self).read()
    }

    fn close(&mut self) {
        (**self).close()
    }

    fn is_open(&self) -> bool {
        (**self).is_open()
    }

    fn layout(&self) -> FrameLayout {
        (**self).layout()
    }

    fn endpoint(&self) -> String {
        (**self).endpoint()
    }
}

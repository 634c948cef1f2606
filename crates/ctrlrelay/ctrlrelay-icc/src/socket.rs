//! Channel source over a TCP connection to a loopback peer.
//!
//! Every read pulls exactly one frame ([`FrameLayout::len`] bytes, floats
//! little-endian) with no framing or length prefix. The receive waits for
//! all bytes; a short or zero-length receive is a failure.
//!
//! # Blocking
//! `read` blocks the calling thread until the whole frame arrived or the
//! connection failed. Without a read timeout a stalled peer stalls the
//! caller indefinitely. Set one with [`SocketSource::with_read_timeout`] to
//! bound that; a timed-out receive is reported as a short read.

use crate::error::TransportError;
use crate::source::ChannelSource;
use ctrlrelay_events::{ByteOrder, FrameLayout, Snapshot};
use std::io::{ErrorKind, Read};
use std::net::{Shutdown, SocketAddr, TcpStream};
use std::time::Duration;
use tracing::{debug, info};

pub struct SocketSource {
    addr: SocketAddr,
    layout: FrameLayout,
    read_timeout: Option<Duration>,
    /// Live connection. Dropped after a failed read since the byte stream is
    /// no longer aligned to frame boundaries.
    stream: Option<TcpStream>,
    /// Set by `open`, cleared by `close`. While set, a missing stream is
    /// re-established on the next read.
    wanted: bool,
    buf: Vec<u8>,
}

impl SocketSource {
    pub fn new(addr: SocketAddr, layout: FrameLayout) -> Self {
        Self {
            addr,
            layout,
            read_timeout: None,
            stream: None,
            wanted: false,
            buf: vec![0u8; layout.len()],
        }
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn connect(&self) -> Result<TcpStream, TransportError> {
        let connect_failed = |source| TransportError::ConnectFailed {
            addr: self.addr,
            source,
        };
        let stream = TcpStream::connect(self.addr).map_err(connect_failed)?;
        stream
            .set_read_timeout(self.read_timeout)
            .map_err(connect_failed)?;
        stream.set_nodelay(true).map_err(connect_failed)?;
        info!(addr = %self.addr, "connected to control peer");
        Ok(stream)
    }

    /// Read until the buffer is full, the peer closes, or the timeout fires.
    /// Returns the number of bytes received.
    fn fill(stream: &mut TcpStream, buf: &mut [u8]) -> Result<usize, TransportError> {
        let mut filled = 0;
        while filled < buf.len() {
            match stream.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if matches!(e.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut) => {
                    break;
                }
                Err(e) => return Err(TransportError::Closed(e)),
            }
        }
        Ok(filled)
    }
}

impl ChannelSource for SocketSource {
    fn open(&mut self) -> Result<(), TransportError> {
        self.wanted = true;
        if self.stream.is_none() {
            self.stream = Some(self.connect()?);
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Snapshot, TransportError> {
        if !self.wanted {
            return Err(TransportError::NotOpen);
        }
        if self.stream.is_none() {
            self.stream = Some(self.connect()?);
        }
        let Some(stream) = self.stream.as_mut() else {
            return Err(TransportError::NotOpen);
        };

        let received = match Self::fill(stream, &mut self.buf) {
            Ok(n) => n,
            Err(e) => {
                self.stream = None;
                return Err(e);
            }
        };
        if received < self.buf.len() {
            self.stream = None;
            return Err(TransportError::ShortRead {
                expected: self.buf.len(),
                received,
            });
        }

        self.layout
            .decode(&self.buf, ByteOrder::Little)
            .map_err(|_| TransportError::ShortRead {
                expected: self.layout.len(),
                received,
            })
    }

    fn close(&mut self) {
        self.wanted = false;
        if let Some(stream) = self.stream.take() {
            // The peer may already be gone.
            let _ = stream.shutdown(Shutdown::Both);
            debug!(addr = %self.addr, "closed control connection");
        }
    }

    fn is_open(&self) -> bool {
        self.wanted && self.stream.is_some()
    }

    fn layout(&self) -> FrameLayout {
        self.layout
    }

    fn endpoint(&self) -> String {
        self.addr.to_string()
    }
}

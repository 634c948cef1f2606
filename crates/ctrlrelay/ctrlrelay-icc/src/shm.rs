//! Channel source over a named shared-memory region.
//!
//! The region is a file (on Linux, typically under `/dev/shm`) mapped with
//! `memmap2`. Its content is exactly one [`FrameLayout`] frame in host byte
//! order: the float block followed by one byte per boolean.
//!
//! # Consistency
//! There is no lock, sequence word or double buffer. A producer process may
//! be writing while we copy, so a read can observe a mix of old and new
//! values (a torn read). That is accepted: reads never block and the next
//! cycle picks up the settled values.
//!
//! A region shrunk by another process is reported as a short read. The size
//! is checked right before the copy, so a truncation landing between the
//! check and the copy can still fault; the window is a few hundred
//! nanoseconds per read.

use crate::error::TransportError;
use crate::source::ChannelSource;
use ctrlrelay_events::{ByteOrder, FrameLayout, Snapshot};
use ctrlrelay_mmap::{MmapFileMut, create_sized};
use std::path::{Path, PathBuf};
use std::ptr;
use tracing::{debug, info};

/// Reader side of the shared control region.
///
/// The consumer creates the region: `open` creates the file if it is
/// missing, sizes it to the layout and zeroes it, so a producer attaching
/// later sees neutral values until it writes its own.
pub struct ShmSource {
    /// Path naming the region.
    path: PathBuf,
    /// Shape of the frame stored in the region.
    layout: FrameLayout,
    /// The open mapping, if any. Dropping it unmaps the region.
    region: Option<MmapFileMut>,
    /// Local copy of the region, reused across reads.
    scratch: Vec<u8>,
}

impl ShmSource {
    pub fn new<P: AsRef<Path>>(path: P, layout: FrameLayout) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            layout,
            region: None,
            scratch: vec![0u8; layout.len()],
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copies the mapped bytes into `scratch` one volatile load at a time, so
    /// the compiler cannot assume the region is stable between reads.
    fn copy_region(region: &MmapFileMut, scratch: &mut [u8]) {
        let base = region.as_ptr();
        for (i, dst) in scratch.iter_mut().enumerate() {
            // SAFETY: i < scratch.len() <= region.len(), checked by the caller.
            *dst = unsafe { ptr::read_volatile(base.add(i)) };
        }
    }
}

impl ChannelSource for ShmSource {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.region.is_some() {
            return Ok(());
        }

        let file = create_sized(&self.path, self.layout.len() as u64).map_err(|source| {
            TransportError::CreateFailed {
                path: self.path.clone(),
                source,
            }
        })?;
        let mut region = MmapFileMut::map(file).map_err(|source| TransportError::MapFailed {
            path: self.path.clone(),
            source,
        })?;
        region.zero();

        info!(
            path = %self.path.display(),
            bytes = self.layout.len(),
            "opened shared control region"
        );
        self.region = Some(region);
        Ok(())
    }

    fn read(&mut self) -> Result<Snapshot, TransportError> {
        let region = self.region.as_ref().ok_or(TransportError::NotOpen)?;

        // Another process may have shrunk the file; mapped pages past its end
        // fault on access, so check the live size before copying.
        let file_len = region.file_len().map_err(TransportError::Closed)?;
        if file_len < self.scratch.len() as u64 || region.len() < self.scratch.len() {
            return Err(TransportError::ShortRead {
                expected: self.scratch.len(),
                received: file_len.min(region.len() as u64) as usize,
            });
        }

        Self::copy_region(region, &mut self.scratch);
        self.layout
            .decode(&self.scratch, ByteOrder::Native)
            .map_err(|_| TransportError::ShortRead {
                expected: self.layout.len(),
                received: self.scratch.len(),
            })
    }

    fn close(&mut self) {
        if self.region.take().is_some() {
            debug!(path = %self.path.display(), "closed shared control region");
        }
    }

    fn is_open(&self) -> bool {
        self.region.is_some()
    }

    fn layout(&self) -> FrameLayout {
        self.layout
    }

    fn endpoint(&self) -> String {
        self.path.display().to_string()
    }
}

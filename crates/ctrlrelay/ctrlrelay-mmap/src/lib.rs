use memmap2::MmapMut;
use std::{
    fs::{File, OpenOptions},
    io,
    path::Path,
};

pub struct MmapFileMut {
    file: File,
    mmap: MmapMut,
}

/// Create the file if missing and force it to exactly `size_bytes`.
///
/// The file is never truncated on open; an existing file of the right size
/// keeps its contents.
pub fn create_sized<P: AsRef<Path>>(path: P, size_bytes: u64) -> io::Result<File> {
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(path)?;
    if file.metadata()?.len() != size_bytes {
        file.set_len(size_bytes)?;
    }
    Ok(file)
}

impl MmapFileMut {
    /// Create a file of `size_bytes` (see [`create_sized`]) and map it read-write
    pub fn create_rw<P: AsRef<Path>>(path: P, size_bytes: u64) -> io::Result<Self> {
        Self::map(create_sized(path, size_bytes)?)
    }

    /// Map an already opened read-write file
    pub fn map(file: File) -> io::Result<Self> {
        let mmap = unsafe { MmapMut::map_mut(&file)? };
        Ok(Self { file, mmap })
    }

    /// Open an existing file and map it to read and write
    pub fn open_rw<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(path)?;
        Self::map(file)
    }

    /// Return raw pointer to start of memory mapped file data
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.mmap.as_mut_ptr()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const u8 {
        self.mmap.as_ptr()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// Current size of the backing file. Unlike [`len`](Self::len) this
    /// follows truncation by other processes; touching mapped pages past it
    /// raises SIGBUS.
    pub fn file_len(&self) -> io::Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Overwrite the whole mapping with zeros.
    pub fn zero(&mut self) {
        self.mmap.fill(0);
    }
}

//! Buffered file copy and existence check over an injected set of file primitives.
//!
//! The primitives mirror a small host I/O surface: `open`/`close`/`read`/`write`
//! plus combinable open flags. Callers pass a [`FileOps`] implementation in.

use crate::error::CopyError;
use log::debug;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::mem::ManuallyDrop;
use std::ops::BitOr;
use std::path::Path;

/// Capacity of the transfer buffer used by [`copy_file`].
pub const BUFFER_SIZE: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenFlags(u8);

impl OpenFlags {
    pub const RDONLY: OpenFlags = OpenFlags(0b0001);
    pub const WRONLY: OpenFlags = OpenFlags(0b0010);
    pub const CREAT: OpenFlags = OpenFlags(0b0100);
    pub const TRUNC: OpenFlags = OpenFlags(0b1000);

    pub fn contains(self, other: OpenFlags) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for OpenFlags {
    type Output = OpenFlags;

    fn bitor(self, rhs: OpenFlags) -> OpenFlags {
        OpenFlags(self.0 | rhs.0)
    }
}

/// File primitives the copy routine is written against.
pub trait FileOps {
    type Handle;

    fn open(&self, path: &Path, flags: OpenFlags) -> io::Result<Self::Handle>;
    fn close(&self, handle: Self::Handle);
    /// Returns the number of bytes read, 0 at end of file.
    fn read(&self, handle: &mut Self::Handle, buf: &mut [u8]) -> io::Result<usize>;
    fn write(&self, handle: &mut Self::Handle, buf: &[u8]) -> io::Result<usize>;
}

/// `FileOps` backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileOps;

impl FileOps for StdFileOps {
    type Handle = File;

    fn open(&self, path: &Path, flags: OpenFlags) -> io::Result<File> {
        OpenOptions::new()
            .read(flags.contains(OpenFlags::RDONLY))
            .write(flags.contains(OpenFlags::WRONLY))
            .create(flags.contains(OpenFlags::CREAT))
            .truncate(flags.contains(OpenFlags::TRUNC))
            .open(path)
    }

    fn close(&self, handle: File) {
        drop(handle);
    }

    fn read(&self, handle: &mut File, buf: &mut [u8]) -> io::Result<usize> {
        handle.read(buf)
    }

    fn write(&self, handle: &mut File, buf: &[u8]) -> io::Result<usize> {
        handle.write(buf)
    }
}

/// Open handle that is closed through its `FileOps` when dropped.
struct ScopedHandle<'a, F: FileOps> {
    ops: &'a F,
    handle: ManuallyDrop<F::Handle>,
}

impl<'a, F: FileOps> ScopedHandle<'a, F> {
    fn open(ops: &'a F, path: &Path, flags: OpenFlags) -> io::Result<Self> {
        let handle = ops.open(path, flags)?;
        Ok(Self {
            ops,
            handle: ManuallyDrop::new(handle),
        })
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            match self.ops.read(&mut self.handle, buf) {
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                result => return result,
            }
        }
    }

    fn write_all(&mut self, mut chunk: &[u8]) -> io::Result<()> {
        while !chunk.is_empty() {
            match self.ops.write(&mut self.handle, chunk) {
                Ok(0) => return Err(io::ErrorKind::WriteZero.into()),
                Ok(n) => chunk = &chunk[n..],
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl<F: FileOps> Drop for ScopedHandle<'_, F> {
    fn drop(&mut self) {
        // SAFETY: `handle` is taken exactly once, here, and never touched again.
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };
        self.ops.close(handle);
    }
}

/// Copies `source` to `destination` through a [`BUFFER_SIZE`] byte buffer.
///
/// The destination is created or truncated. Both handles are released on every
/// exit path. A failure mid-copy leaves whatever was already written in place.
/// Returns the number of bytes copied.
pub fn copy_file<F: FileOps>(ops: &F, source: &Path, destination: &Path) -> Result<u64, CopyError> {
    let mut buffer = [0u8; BUFFER_SIZE];
    copy_with_buffer(ops, source, destination, &mut buffer)
}

/// Same as [`copy_file`] with a caller-chosen buffer capacity (at least one byte).
pub fn copy_file_with_capacity<F: FileOps>(
    ops: &F,
    source: &Path,
    destination: &Path,
    capacity: usize,
) -> Result<u64, CopyError> {
    let mut buffer = vec![0u8; capacity.max(1)];
    copy_with_buffer(ops, source, destination, &mut buffer)
}

fn copy_with_buffer<F: FileOps>(
    ops: &F,
    source: &Path,
    destination: &Path,
    buffer: &mut [u8],
) -> Result<u64, CopyError> {
    let mut src = ScopedHandle::open(ops, source, OpenFlags::RDONLY).map_err(|e| CopyError::Open {
        path: source.to_path_buf(),
        source: e,
    })?;

    // `src` is dropped, and so closed, if this fails.
    let mut dst = ScopedHandle::open(ops, destination, OpenFlags::WRONLY | OpenFlags::CREAT | OpenFlags::TRUNC)
        .map_err(|e| CopyError::Open {
            path: destination.to_path_buf(),
            source: e,
        })?;

    let mut copied: u64 = 0;
    loop {
        let n = src.read(buffer).map_err(|e| CopyError::Read {
            path: source.to_path_buf(),
            source: e,
        })?;
        if n == 0 {
            break;
        }

        dst.write_all(&buffer[..n]).map_err(|e| CopyError::Write {
            path: destination.to_path_buf(),
            source: e,
        })?;
        copied += n as u64;
    }

    debug!("Copied {} bytes from {} to {}", copied, source.display(), destination.display());
    Ok(copied)
}

/// Returns whether `path` can be opened read-only. The handle is closed right away.
pub fn file_exists<F: FileOps>(ops: &F, path: &Path) -> bool {
    match ops.open(path, OpenFlags::RDONLY) {
        Ok(handle) => {
            ops.close(handle);
            true
        }
        Err(e) => {
            debug!("File check for {}: {}", path.display(), e);
            false
        }
    }
}

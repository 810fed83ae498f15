//! # Memory-Mapped Record Files
//!
//! [`MappedReader`] opens a file, maps it read-only, and exposes the
//! mapping as the input buffer for zero-copy record access. The only
//! operation that may block is the initial map; every view operation after
//! that is pointer arithmetic over the mapping.
//!
//! The mapping is exclusively owned by its reader and unmapped on drop.
//! Views and iterators borrow from the reader, so the borrow checker
//! guarantees nothing outlives the mapping.
//!
//! A mapped file is expected to contain one or more concatenated records;
//! there is no file-level framing beyond concatenation.

use std::fs::File;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Error, ErrorKind, Result};
use crate::records::view::{RecordIter, RecordView};

#[derive(Debug)]
pub struct MappedReader {
    mmap: Mmap,
}

impl MappedReader {
    /// Open and map `path` read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| {
            let kind = if e.kind() == IoErrorKind::NotFound {
                ErrorKind::FileNotFound
            } else {
                ErrorKind::FileReadError
            };
            Error::new(kind, format!("cannot open '{}': {e}", path.display()))
        })?;

        let len = file
            .metadata()
            .map_err(|e| {
                Error::new(
                    ErrorKind::FileReadError,
                    format!("cannot stat '{}': {e}", path.display()),
                )
            })?
            .len();
        if len == 0 {
            return Err(Error::new(
                ErrorKind::MappingFailed,
                format!("cannot map empty file '{}'", path.display()),
            ));
        }

        // SAFETY: Mmap::map is unsafe because the underlying file could be
        // truncated or modified by another process while mapped. This is
        // sound for our contract because:
        // 1. The mapping is read-only; we never write through it.
        // 2. Record files are write-once inputs; concurrent mutation is
        //    outside the documented contract.
        // 3. The mapping's lifetime is tied to MappedReader, and all views
        //    borrow from it, so use-after-unmap cannot compile.
        let mmap = unsafe {
            Mmap::map(&file).map_err(|e| {
                Error::new(
                    ErrorKind::MappingFailed,
                    format!("cannot map '{}': {e}", path.display()),
                )
            })?
        };

        Ok(Self { mmap })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.mmap
    }

    pub fn len(&self) -> usize {
        self.mmap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mmap.is_empty()
    }

    /// View of the record at the start of the mapping.
    pub fn view(&self) -> Result<RecordView<'_>> {
        RecordView::new(self.as_bytes())
    }

    /// Iterate the concatenated records in the mapping.
    pub fn records(&self) -> RecordIter<'_> {
        RecordIter::new(self.as_bytes())
    }
}

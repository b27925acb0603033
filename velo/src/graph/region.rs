//! Read-only byte regions backing the graph tables.

use std::fs::File;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;

use crate::error::{Result, VeloError};

enum Backing {
    Mapped(Mmap),
    Owned(Box<[u8]>),
}

/// An immutable byte buffer holding one graph table.
///
/// Tables loaded from disk are memory-mapped; tables built in memory own
/// their bytes. All multi-byte reads are big-endian.
pub struct Region {
    backing: Backing,
}

impl Region {
    /// Memory-map a file read-only.
    ///
    /// # Errors
    ///
    /// Returns [`VeloError::FileNotFound`] if the file does not exist, or
    /// [`VeloError::Io`] if it cannot be opened or mapped.
    pub fn map<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => VeloError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => VeloError::Io(e),
        })?;

        // SAFETY: Memory mapping is safe as long as the file is not modified
        // while mapped. Graph files are opened read-only and never written by
        // this crate.
        let mmap = unsafe { Mmap::map(&file)? };

        Ok(Self {
            backing: Backing::Mapped(mmap),
        })
    }

    pub(crate) fn u16_at(&self, offset: usize) -> u16 {
        u16::from_be_bytes([self[offset], self[offset + 1]])
    }

    pub(crate) fn u32_at(&self, offset: usize) -> u32 {
        u32::from_be_bytes(self.array_at(offset))
    }

    pub(crate) fn i32_at(&self, offset: usize) -> i32 {
        i32::from_be_bytes(self.array_at(offset))
    }

    /// Iterate over the region as consecutive 64-bit words, ignoring a
    /// trailing partial word.
    pub(crate) fn u64_words(&self) -> impl Iterator<Item = u64> + '_ {
        self.chunks_exact(8).map(|chunk| {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            u64::from_be_bytes(word)
        })
    }

    fn array_at<const N: usize>(&self, offset: usize) -> [u8; N] {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self[offset..offset + N]);
        bytes
    }
}

impl From<Vec<u8>> for Region {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            backing: Backing::Owned(bytes.into_boxed_slice()),
        }
    }
}

impl Deref for Region {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match &self.backing {
            Backing::Mapped(mmap) => &mmap[..],
            Backing::Owned(bytes) => &bytes[..],
        }
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.backing {
            Backing::Mapped(_) => "mapped",
            Backing::Owned(_) => "owned",
        };
        f.debug_struct("Region")
            .field("kind", &kind)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_big_endian_reads() {
        let region = Region::from(vec![0x12, 0x34, 0x56, 0x78, 0xFF, 0xFF, 0xFF, 0xFE]);
        assert_eq!(region.u16_at(0), 0x1234);
        assert_eq!(region.u16_at(2), 0x5678);
        assert_eq!(region.u32_at(0), 0x1234_5678);
        assert_eq!(region.i32_at(4), -2);
        assert_eq!(region.u64_words().collect::<Vec<_>>(), vec![0x1234_5678_FFFF_FFFE]);
    }

    #[test]
    fn test_partial_word_ignored() {
        let region = Region::from(vec![0, 0, 0, 0, 0, 0, 0, 7, 1, 2, 3]);
        assert_eq!(region.u64_words().collect::<Vec<_>>(), vec![7]);
    }

    #[test]
    fn test_map_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xAB, 0xCD]).unwrap();

        let region = Region::map(file.path()).unwrap();
        assert_eq!(region.len(), 2);
        assert_eq!(region.u16_at(0), 0xABCD);
    }

    #[test]
    fn test_map_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nodes.bin");

        match Region::map(&path) {
            Err(VeloError::FileNotFound { path: p }) => assert_eq!(p, path),
            other => panic!("Expected FileNotFound, got {other:?}"),
        }
    }
}

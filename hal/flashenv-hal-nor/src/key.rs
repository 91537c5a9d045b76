//! Storage keys
//!
//! Each map item in the partition is identified by a [`StorageKey`]: either
//! the single volume header or a file path.

use heapless::String;
use sequential_storage::map::SerializationError;

use flashenv_hal::FsError;

/// Maximum file path length in bytes
pub const MAX_PATH_LEN: usize = 32;

const TAG_VOLUME: u8 = 0;
const TAG_FILE: u8 = 1;

/// Key of an item in the flash map
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageKey {
    /// Volume header written on format
    Volume,
    /// File contents, keyed by absolute path
    File(String<MAX_PATH_LEN>),
}

impl StorageKey {
    /// Create a file key from a path
    ///
    /// Paths must be absolute (`/name`) and at most [`MAX_PATH_LEN`] bytes.
    pub fn file(path: &str) -> Result<Self, FsError> {
        if path.len() < 2 || !path.starts_with('/') {
            return Err(FsError::InvalidPath);
        }
        let path = String::try_from(path).map_err(|_| FsError::InvalidPath)?;
        Ok(StorageKey::File(path))
    }
}

impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(&self, buffer: &mut [u8]) -> Result<usize, SerializationError> {
        match self {
            StorageKey::Volume => {
                if buffer.is_empty() {
                    return Err(SerializationError::BufferTooSmall);
                }
                buffer[0] = TAG_VOLUME;
                Ok(1)
            }
            StorageKey::File(path) => {
                let len = path.len();
                if buffer.len() < len + 2 {
                    return Err(SerializationError::BufferTooSmall);
                }
                buffer[0] = TAG_FILE;
                buffer[1] = len as u8;
                buffer[2..len + 2].copy_from_slice(path.as_bytes());
                Ok(len + 2)
            }
        }
    }

    fn deserialize_from(buffer: &[u8]) -> Result<(Self, usize), SerializationError> {
        match buffer.first() {
            Some(&TAG_VOLUME) => Ok((StorageKey::Volume, 1)),
            Some(&TAG_FILE) => {
                let len = *buffer.get(1).ok_or(SerializationError::BufferTooSmall)? as usize;
                let bytes = buffer
                    .get(2..len + 2)
                    .ok_or(SerializationError::BufferTooSmall)?;
                let path = core::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| String::try_from(s).ok())
                    .ok_or(SerializationError::InvalidFormat)?;
                Ok((StorageKey::File(path), len + 2))
            }
            Some(_) => Err(SerializationError::InvalidFormat),
            None => Err(SerializationError::BufferTooSmall),
        }
    }
}

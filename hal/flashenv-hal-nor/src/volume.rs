//! Volume header
//!
//! Written once when the partition is formatted. Mounting checks it to tell
//! a formatted partition from blank or foreign flash.

use serde::{Deserialize, Serialize};

/// Magic number identifying a formatted partition ("FLEV")
pub const VOLUME_MAGIC: u32 = 0x464C_4556;

/// Current on-flash layout version
pub const VOLUME_VERSION: u8 = 1;

/// Maximum serialized header size
pub(crate) const MAX_HEADER_SIZE: usize = 16;

/// Volume header stored under [`StorageKey::Volume`](crate::StorageKey::Volume)
///
/// Serialized with postcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeHeader {
    pub magic: u32,
    pub version: u8,
}

impl VolumeHeader {
    /// Header for the current layout
    pub const fn new() -> Self {
        Self {
            magic: VOLUME_MAGIC,
            version: VOLUME_VERSION,
        }
    }

    /// Check magic and version
    pub const fn is_valid(&self) -> bool {
        self.magic == VOLUME_MAGIC && self.version == VOLUME_VERSION
    }

    /// Decode a stored header, `None` if it is not a valid one
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        postcard::from_bytes::<VolumeHeader>(bytes)
            .ok()
            .filter(VolumeHeader::is_valid)
    }
}

impl Default for VolumeHeader {
    fn default() -> Self {
        Self::new()
    }
}

//! NOR flash file store for flashenv
//!
//! A flat, mountable file store on top of any NOR flash partition. Files are
//! kept as items in a `sequential-storage` map, which takes care of wear
//! leveling and power-fail safety. The store is exposed synchronously through
//! the [`flashenv_hal::FileSystem`] trait.
//!
//! ```text
//! ┌──────────────────┐   ┌────────────────────┐   ┌──────────────────┐
//! │ Volume header    │   │ File "/config.env" │   │ File "/..."      │
//! │ magic + version  │   │ raw bytes          │   │ raw bytes        │
//! └──────────────────┘   └────────────────────┘   └──────────────────┘
//!          └──────────── sequential-storage map items ────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod fs;
pub mod key;
pub mod volume;

pub use fs::{NorFile, NorFileSystem, MAX_FILE_SIZE};
pub use key::{StorageKey, MAX_PATH_LEN};
pub use volume::{VolumeHeader, VOLUME_MAGIC, VOLUME_VERSION};

//! flashenv Hardware Abstraction Layer
//!
//! This crate defines the storage abstraction that backend crates implement
//! (NOR flash, test fakes, ...). The configuration logic in `flashenv-core`
//! only ever talks to these traits, so it runs unchanged on the device and
//! against in-memory fakes on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (flashenv-firmware, etc.)  │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  flashenv-core (ConfigStore)            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  flashenv-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ flashenv-hal- │       │   in-memory   │
//! │      nor      │       │  test fakes   │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`fs::FileSystem`] - Mountable, flat, line-oriented file storage

#![no_std]
#![deny(unsafe_code)]

pub mod fs;

// Re-export key items at crate root for convenience
pub use fs::{fit_to, valid_prefix, FileSystem, FsError, Line, OpenMode, MAX_LINE_LEN};

//! Config partition on the RP2040 flash
//!
//! The last 64KB of the 2MB flash hold the config file store. memory.x
//! keeps the program image out of this range.

use core::ops::Range;

use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;

use flashenv_hal_nor::NorFileSystem;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash
pub const CONFIG_PARTITION_SIZE: usize = 64 * 1024; // 64KB for config
pub const CONFIG_PARTITION_START: usize = FLASH_SIZE - CONFIG_PARTITION_SIZE;

/// Flash range for the config partition
pub const CONFIG_RANGE: Range<u32> = (CONFIG_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Flash driver used by the config store
pub type ConfigFlash<'d> = Flash<'d, FLASH, Async, FLASH_SIZE>;

/// File store on the config partition
pub type ConfigFileSystem<'d> = NorFileSystem<ConfigFlash<'d>>;

/// Create the file store on the config partition
///
/// Nothing is read or written until the store is mounted.
pub fn config_filesystem<'d>(
    flash: Peri<'d, FLASH>,
    dma: Peri<'d, impl Channel>,
) -> ConfigFileSystem<'d> {
    NorFileSystem::new(Flash::new(flash, dma), CONFIG_RANGE)
}

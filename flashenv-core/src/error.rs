//! Configuration errors

use flashenv_hal::FsError;

/// Errors from loading or seeding the config file
///
/// None of these are fatal: the store keeps its current values (the
/// defaults, unless a previous load succeeded) whenever one is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Storage could not be mounted
    Mount(FsError),
    /// Config file does not exist (normal on first boot)
    NotFound,
    /// Config file exists but could not be opened
    Open(FsError),
    /// Reading the config file failed part way
    Read(FsError),
    /// Writing or committing the default file failed
    Write(FsError),
}

impl ConfigError {
    /// Check if this is the expected first-boot case rather than a fault
    pub fn is_expected(&self) -> bool {
        matches!(self, ConfigError::NotFound)
    }

    /// Underlying filesystem error, if any
    pub fn fs_error(&self) -> Option<FsError> {
        match *self {
            ConfigError::Mount(e)
            | ConfigError::Open(e)
            | ConfigError::Read(e)
            | ConfigError::Write(e) => Some(e),
            ConfigError::NotFound => None,
        }
    }
}

//! Field capacities and default values

/// Path of the config file on the device filesystem
pub const CONFIG_PATH: &str = "/config.env";

/// SSID buffer size, including the C string terminator
pub const SSID_CAPACITY: usize = 32;

/// Password buffer size, including the C string terminator
pub const PASSWORD_CAPACITY: usize = 64;

/// Server URL buffer size, including the C string terminator
pub const SERVER_URL_CAPACITY: usize = 128;

/// Maximum SSID length in bytes
pub const SSID_MAX_LEN: usize = SSID_CAPACITY - 1;

/// Maximum password length in bytes
pub const PASSWORD_MAX_LEN: usize = PASSWORD_CAPACITY - 1;

/// Maximum server URL length in bytes
pub const SERVER_URL_MAX_LEN: usize = SERVER_URL_CAPACITY - 1;

/// Placeholder SSID shipped in firmware
pub const DEFAULT_SSID: &str = "COLOQUE_SEU_SSID_AQUI";

/// Placeholder password shipped in firmware
pub const DEFAULT_PASSWORD: &str = "COLOQUE_SUA_SENHA_AQUI";

/// Placeholder server URL shipped in firmware
pub const DEFAULT_SERVER_URL: &str = "http://SEU_IP_SERVIDOR:3001/api/temperature";

/// Values used when the config file or a key is missing
///
/// Passed to [`ConfigStore::new`](crate::ConfigStore::new); also used to
/// render the default config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigDefaults {
    /// WiFi network name
    pub ssid: &'static str,
    /// WiFi passphrase
    pub password: &'static str,
    /// Endpoint the device reports to
    pub server_url: &'static str,
}

impl ConfigDefaults {
    /// Create a set of defaults
    pub const fn new(ssid: &'static str, password: &'static str, server_url: &'static str) -> Self {
        Self {
            ssid,
            password,
            server_url,
        }
    }
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self::new(DEFAULT_SSID, DEFAULT_PASSWORD, DEFAULT_SERVER_URL)
    }
}

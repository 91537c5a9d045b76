//! Recognized configuration keys

use super::defaults::{PASSWORD_MAX_LEN, SERVER_URL_MAX_LEN, SSID_MAX_LEN};

/// Key of a configuration field in the env file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ConfigKey {
    /// WiFi network name
    WifiSsid = 0,
    /// WiFi passphrase
    WifiPassword = 1,
    /// Endpoint the device reports to
    ServerUrl = 2,
}

impl ConfigKey {
    /// All recognized keys, in file order
    pub const ALL: [ConfigKey; 3] = [
        ConfigKey::WifiSsid,
        ConfigKey::WifiPassword,
        ConfigKey::ServerUrl,
    ];

    /// Key name as written in the file
    pub const fn as_str(self) -> &'static str {
        match self {
            ConfigKey::WifiSsid => "WIFI_SSID",
            ConfigKey::WifiPassword => "WIFI_PASSWORD",
            ConfigKey::ServerUrl => "SERVER_URL",
        }
    }

    /// Look up a key by its exact, case-sensitive name
    pub fn from_key(name: &str) -> Option<Self> {
        match name {
            "WIFI_SSID" => Some(ConfigKey::WifiSsid),
            "WIFI_PASSWORD" => Some(ConfigKey::WifiPassword),
            "SERVER_URL" => Some(ConfigKey::ServerUrl),
            _ => None,
        }
    }

    /// Maximum stored value length in bytes
    pub const fn max_len(self) -> usize {
        match self {
            ConfigKey::WifiSsid => SSID_MAX_LEN,
            ConfigKey::WifiPassword => PASSWORD_MAX_LEN,
            ConfigKey::ServerUrl => SERVER_URL_MAX_LEN,
        }
    }

    /// Bit of this key in a [`KeySet`]
    const fn bit(self) -> u8 {
        1 << (self as u8)
    }

    /// Whether the value is a secret that must stay out of logs
    pub const fn is_secret(self) -> bool {
        matches!(self, ConfigKey::WifiPassword)
    }
}

/// Small set of [`ConfigKey`]s
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeySet(u8);

impl KeySet {
    /// Empty set
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add a key
    pub fn insert(&mut self, key: ConfigKey) {
        self.0 |= key.bit();
    }

    /// Check membership
    pub const fn contains(&self, key: ConfigKey) -> bool {
        self.0 & key.bit() != 0
    }

    /// Number of keys in the set
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Check if no key is in the set
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Check if every recognized key is in the set
    pub const fn is_complete(&self) -> bool {
        self.len() == ConfigKey::ALL.len()
    }

    /// Iterate over the keys in the set, in file order
    pub fn iter(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        ConfigKey::ALL.into_iter().filter(|key| self.contains(*key))
    }
}

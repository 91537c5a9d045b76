//! Load results

use crate::config::{ConfigKey, KeySet};

/// What a successful [`ConfigStore::load`](crate::ConfigStore::load) did
///
/// A report is returned whenever the file was read to the end, even if no
/// recognized key was found in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadReport {
    /// Keys whose field was overwritten
    pub applied: KeySet,
    /// Keys whose value did not fit and was truncated
    pub truncated: KeySet,
    /// Lines rejected as malformed (no `=`, or `=` first)
    pub skipped: u16,
    /// Well-formed lines naming a key that is not recognized
    pub unknown: u16,
}

impl LoadReport {
    /// Empty report
    pub const fn new() -> Self {
        Self {
            applied: KeySet::new(),
            truncated: KeySet::new(),
            skipped: 0,
            unknown: 0,
        }
    }

    /// Record an applied key
    pub(crate) fn record_applied(&mut self, key: ConfigKey, truncated: bool) {
        self.applied.insert(key);
        if truncated {
            self.truncated.insert(key);
        }
    }

    pub(crate) fn record_skipped(&mut self) {
        self.skipped = self.skipped.saturating_add(1);
    }

    pub(crate) fn record_unknown(&mut self) {
        self.unknown = self.unknown.saturating_add(1);
    }

    /// Check if every recognized key was found in the file
    pub fn is_complete(&self) -> bool {
        self.applied.is_complete()
    }

    /// Keys not found in the file, which keep their previous value
    pub fn missing(&self) -> impl Iterator<Item = ConfigKey> + '_ {
        ConfigKey::ALL
            .into_iter()
            .filter(|key| !self.applied.contains(*key))
    }
}

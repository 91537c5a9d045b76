//! Default config file template
//!
//! Rendered line by line from [`ConfigDefaults`] when the device seeds its
//! config file on first boot:
//!
//! ```text
//! # WiFi Configuration
//! WIFI_SSID="<ssid>"
//! WIFI_PASSWORD="<password>"
//!
//! # Server Configuration
//! SERVER_URL="<server_url>"
//! ```

use core::fmt::Write;

use flashenv_hal::{fit_to, Line};

use super::defaults::ConfigDefaults;
use super::keys::ConfigKey;

/// Number of lines in the template
pub const TEMPLATE_LINES: usize = 6;

/// Iterator over the rendered lines of the default config file
#[derive(Debug, Clone)]
pub struct DefaultTemplate<'a> {
    defaults: &'a ConfigDefaults,
    index: usize,
}

impl<'a> DefaultTemplate<'a> {
    /// Render the template for `defaults`
    pub fn new(defaults: &'a ConfigDefaults) -> Self {
        Self { defaults, index: 0 }
    }
}

impl Iterator for DefaultTemplate<'_> {
    type Item = Line;

    fn next(&mut self) -> Option<Line> {
        let mut line = Line::new();
        match self.index {
            0 => push(&mut line, "# WiFi Configuration"),
            1 => entry(&mut line, ConfigKey::WifiSsid, self.defaults.ssid),
            2 => entry(&mut line, ConfigKey::WifiPassword, self.defaults.password),
            3 => {}
            4 => push(&mut line, "# Server Configuration"),
            5 => entry(&mut line, ConfigKey::ServerUrl, self.defaults.server_url),
            _ => return None,
        }
        self.index += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = TEMPLATE_LINES.saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DefaultTemplate<'_> {}

fn push(line: &mut Line, text: &str) {
    // Template literals are far shorter than a line
    let _ = line.push_str(text);
}

/// Write `KEY="value"`, with the value cut to what the field can hold
fn entry(line: &mut Line, key: ConfigKey, value: &str) {
    // Longest entry is SERVER_URL plus 127 bytes of value, well within a line
    let _ = write!(line, "{}=\"{}\"", key.as_str(), fit_to(value, key.max_len()));
}

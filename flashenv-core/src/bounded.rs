//! Fixed-capacity strings
//!
//! [`BoundedString`] never allocates and never grows past `N` bytes.
//! Assigning a longer value truncates it.

use core::fmt;
use core::ops::Deref;

use flashenv_hal::fit_to;
use heapless::String;

/// String holding at most `N` bytes of UTF-8
///
/// `N` is the visible length: a C buffer of 32 bytes with its terminator
/// corresponds to `BoundedString<31>`.
#[derive(Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoundedString<const N: usize>(String<N>);

impl<const N: usize> BoundedString<N> {
    /// Maximum length in bytes
    pub const MAX_LEN: usize = N;

    /// Create an empty string
    pub const fn new() -> Self {
        Self(String::new())
    }

    /// Create from `src`, truncating it if needed
    pub fn from_truncated(src: &str) -> Self {
        let mut s = Self::new();
        s.copy_truncating(src);
        s
    }

    /// Replace the contents with `src`, keeping at most `N` bytes
    ///
    /// Truncation backs off to the previous char boundary, so the result may
    /// be a few bytes shorter than `N` for multi-byte input.
    /// Returns `true` if `src` did not fit and was truncated.
    pub fn copy_truncating(&mut self, src: &str) -> bool {
        let fitted = fit_to(src, N);
        self.0.clear();
        // Cannot fail: fit_to bounds the length to N
        let _ = self.0.push_str(fitted);
        fitted.len() < src.len()
    }

    /// View as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<const N: usize> Deref for BoundedString<N> {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> AsRef<str> for BoundedString<N> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<const N: usize> PartialEq<str> for BoundedString<N> {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl<const N: usize> PartialEq<&str> for BoundedString<N> {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl<const N: usize> fmt::Debug for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl<const N: usize> fmt::Display for BoundedString<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

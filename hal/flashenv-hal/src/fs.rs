//! Filesystem abstractions
//!
//! Provides the minimal capability set the configuration loader needs from
//! persistent storage: mount, existence checks, and line-oriented reads and
//! writes on open file handles.

use heapless::String;

/// Maximum line length handed out by [`FileSystem::read_line`]
///
/// Longer physical lines are cut at this length (on a char boundary) and
/// the remainder of the line is discarded.
pub const MAX_LINE_LEN: usize = 256;

/// Line buffer filled by [`FileSystem::read_line`]
pub type Line = String<MAX_LINE_LEN>;

/// How a file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OpenMode {
    /// Read from the start of an existing file
    Read,
    /// Create the file, replacing any existing one when the handle is closed
    Write,
}

/// Errors from filesystem operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FsError {
    /// Filesystem has not been mounted
    NotMounted,
    /// File does not exist
    NotFound,
    /// Path is empty, too long or not absolute
    InvalidPath,
    /// Underlying storage operation failed
    Io,
    /// No room left for the data
    Full,
    /// File is larger than the backend supports
    TooLarge,
    /// Read on a write handle or write on a read handle
    WrongMode,
    /// Stored data is corrupted or unformatted
    Corrupted,
}

/// Flat file storage trait
///
/// Implementations are synchronous and single-owner: every operation takes
/// `&mut self`, and a handle returned by [`open`](FileSystem::open) must be
/// given back to [`close`](FileSystem::close) exactly once.
pub trait FileSystem {
    /// Open file handle
    type File;

    /// Mount the filesystem
    ///
    /// # Arguments
    /// * `format_on_fail` - Format the backing storage if it cannot be
    ///   mounted as-is (first boot, corruption)
    fn mount(&mut self, format_on_fail: bool) -> Result<(), FsError>;

    /// Check if a file exists
    ///
    /// Returns `false` when the filesystem is not mounted.
    fn exists(&mut self, path: &str) -> bool;

    /// Open a file
    fn open(&mut self, path: &str, mode: OpenMode) -> Result<Self::File, FsError>;

    /// Read the next line into `line`, without the trailing newline
    ///
    /// `line` is cleared first. Returns `Ok(false)` at end of file.
    ///
    /// Lines longer than [`MAX_LINE_LEN`] are cut and the rest of the line
    /// is skipped. A line holding invalid UTF-8 yields its valid prefix.
    /// Neither case is an error.
    fn read_line(&mut self, file: &mut Self::File, line: &mut Line) -> Result<bool, FsError>;

    /// Append `line` followed by a newline
    fn write_line(&mut self, file: &mut Self::File, line: &str) -> Result<(), FsError>;

    /// Close a file, committing any buffered writes
    fn close(&mut self, file: Self::File) -> Result<(), FsError>;

    /// Release a file without committing buffered writes
    ///
    /// A file opened for writing is left as it was before `open`.
    fn discard(&mut self, file: Self::File);
}

/// Valid UTF-8 prefix of `raw`
pub fn valid_prefix(raw: &[u8]) -> &str {
    match core::str::from_utf8(raw) {
        Ok(text) => text,
        Err(e) => core::str::from_utf8(&raw[..e.valid_up_to()]).unwrap_or(""),
    }
}

/// Longest prefix of `src` that fits in `max_len` bytes without splitting a character
pub fn fit_to(src: &str, max_len: usize) -> &str {
    if src.len() <= max_len {
        return src;
    }
    let mut end = max_len;
    while !src.is_char_boundary(end) {
        end -= 1;
    }
    &src[..end]
}

//! In-memory filesystem for tests
//!
//! Behaves like the flash store (whole-file commit on close, line reads
//! capped at `MAX_LINE_LEN`) and can be told to fail specific operations.
//! Tracks open handles so tests can check that every path closes its file.

use std::collections::BTreeMap;
use std::string::{String, ToString};
use std::vec::Vec;

use flashenv_hal::{fit_to, valid_prefix, FileSystem, FsError, Line, OpenMode, MAX_LINE_LEN};

pub(crate) struct MemFile {
    path: String,
    mode: OpenMode,
    data: Vec<u8>,
    cursor: usize,
    lines_read: usize,
}

#[derive(Default)]
pub(crate) struct MemFs {
    files: BTreeMap<String, Vec<u8>>,
    mounted: bool,
    /// Mount fails even with `format_on_fail`
    pub fail_mount: bool,
    /// `open` fails with this error
    pub fail_open: Option<FsError>,
    /// `read_line` fails once this many lines have been served
    pub fail_read_after: Option<usize>,
    /// `write_line` fails once this many lines have been written
    pub fail_write_after: Option<usize>,
    /// `close` of a write handle fails
    pub fail_commit: bool,
    /// Handles currently open
    pub open_handles: usize,
    /// Successful `mount` calls that formatted
    pub formats: usize,
}

impl MemFs {
    /// Unmounted, empty filesystem
    pub fn new() -> Self {
        Self::default()
    }

    /// Filesystem already holding `path` with `contents`
    pub fn with_file(path: &str, contents: &str) -> Self {
        let mut fs = Self::new();
        fs.put(path, contents);
        fs
    }

    /// Create or replace a file directly
    pub fn put(&mut self, path: &str, contents: &str) {
        self.put_bytes(path, contents.as_bytes());
    }

    /// Create or replace a file with raw bytes
    pub fn put_bytes(&mut self, path: &str, contents: &[u8]) {
        self.files.insert(path.to_string(), contents.to_vec());
    }

    /// Contents of a file, if it exists
    pub fn contents(&self, path: &str) -> Option<&str> {
        self.files
            .get(path)
            .map(|data| core::str::from_utf8(data).unwrap())
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

impl FileSystem for MemFs {
    type File = MemFile;

    fn mount(&mut self, format_on_fail: bool) -> Result<(), FsError> {
        if self.fail_mount {
            return Err(FsError::Io);
        }
        if !self.mounted && format_on_fail && self.files.is_empty() {
            self.formats += 1;
        }
        self.mounted = true;
        Ok(())
    }

    fn exists(&mut self, path: &str) -> bool {
        self.mounted && self.files.contains_key(path)
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<MemFile, FsError> {
        if !self.mounted {
            return Err(FsError::NotMounted);
        }
        if let Some(e) = self.fail_open {
            return Err(e);
        }

        let data = match mode {
            OpenMode::Read => self.files.get(path).cloned().ok_or(FsError::NotFound)?,
            OpenMode::Write => Vec::new(),
        };

        self.open_handles += 1;
        Ok(MemFile {
            path: path.to_string(),
            mode,
            data,
            cursor: 0,
            lines_read: 0,
        })
    }

    fn read_line(&mut self, file: &mut MemFile, line: &mut Line) -> Result<bool, FsError> {
        if file.mode != OpenMode::Read {
            return Err(FsError::WrongMode);
        }
        if self.fail_read_after == Some(file.lines_read) {
            return Err(FsError::Io);
        }
        line.clear();

        let remaining = &file.data[file.cursor..];
        if remaining.is_empty() {
            return Ok(false);
        }

        let (raw, consumed) = match remaining.iter().position(|&b| b == b'\n') {
            Some(pos) => (&remaining[..pos], pos + 1),
            None => (remaining, remaining.len()),
        };
        file.cursor += consumed;
        file.lines_read += 1;

        line.push_str(fit_to(valid_prefix(raw), MAX_LINE_LEN)).unwrap();
        Ok(true)
    }

    fn write_line(&mut self, file: &mut MemFile, line: &str) -> Result<(), FsError> {
        if file.mode != OpenMode::Write {
            return Err(FsError::WrongMode);
        }
        let written = file.data.iter().filter(|&&b| b == b'\n').count();
        if self.fail_write_after == Some(written) {
            return Err(FsError::Full);
        }
        file.data.extend_from_slice(line.as_bytes());
        file.data.push(b'\n');
        Ok(())
    }

    fn close(&mut self, file: MemFile) -> Result<(), FsError> {
        self.open_handles -= 1;
        match file.mode {
            OpenMode::Read => Ok(()),
            OpenMode::Write if self.fail_commit => Err(FsError::Io),
            OpenMode::Write => {
                self.files.insert(file.path, file.data);
                Ok(())
            }
        }
    }

    fn discard(&mut self, _file: MemFile) {
        self.open_handles -= 1;
    }
}

//! Scoped file handles
//!
//! [`OpenFile`] pairs an open handle with its filesystem. Only
//! [`finish`](OpenFile::finish) commits; a guard dropped on an early return
//! discards the handle, so a failed write never leaves a partial file.

use flashenv_hal::{FileSystem, FsError, Line, OpenMode};

/// Open file that is discarded on drop unless finished
pub(crate) struct OpenFile<'a, F: FileSystem> {
    fs: &'a mut F,
    file: Option<F::File>,
}

impl<'a, F: FileSystem> OpenFile<'a, F> {
    /// Open `path` on `fs`
    pub(crate) fn open(fs: &'a mut F, path: &str, mode: OpenMode) -> Result<Self, FsError> {
        let file = fs.open(path, mode)?;
        Ok(Self {
            fs,
            file: Some(file),
        })
    }

    /// Read the next line, `Ok(false)` at end of file
    pub(crate) fn read_line(&mut self, line: &mut Line) -> Result<bool, FsError> {
        match self.file.as_mut() {
            Some(file) => self.fs.read_line(file, line),
            None => Ok(false),
        }
    }

    /// Append a line
    pub(crate) fn write_line(&mut self, line: &str) -> Result<(), FsError> {
        match self.file.as_mut() {
            Some(file) => self.fs.write_line(file, line),
            None => Err(FsError::WrongMode),
        }
    }

    /// Close the file and report the result
    pub(crate) fn finish(mut self) -> Result<(), FsError> {
        match self.file.take() {
            Some(file) => self.fs.close(file),
            None => Ok(()),
        }
    }
}

impl<F: FileSystem> Drop for OpenFile<'_, F> {
    fn drop(&mut self) {
        if let Some(file) = self.file.take() {
            self.fs.discard(file);
        }
    }
}

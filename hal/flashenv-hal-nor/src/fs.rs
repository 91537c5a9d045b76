//! NOR flash filesystem
//!
//! Implements [`FileSystem`] on a flash range using sequential-storage's map.
//! Whole files are stored as single items, so reads load the file into the
//! handle and writes are buffered in the handle until [`close`](FileSystem::close).

use core::ops::Range;

use embassy_futures::block_on;
use embedded_storage_async::nor_flash::NorFlash;
use heapless::{String, Vec};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

use flashenv_hal::{fit_to, valid_prefix, FileSystem, FsError, Line, OpenMode, MAX_LINE_LEN};

use crate::key::{StorageKey, MAX_PATH_LEN};
use crate::volume::{VolumeHeader, MAX_HEADER_SIZE};

/// Maximum file size in bytes
pub const MAX_FILE_SIZE: usize = 1024;

/// Scratch buffer for map items (file data plus item header and key)
const DATA_BUFFER_SIZE: usize = MAX_FILE_SIZE + 64;

/// Open file handle
///
/// Read handles hold the whole file and a cursor; write handles accumulate
/// lines until closed.
#[derive(Debug)]
pub struct NorFile {
    mode: OpenMode,
    path: String<MAX_PATH_LEN>,
    data: Vec<u8, MAX_FILE_SIZE>,
    cursor: usize,
}

impl NorFile {
    /// Path this handle was opened with
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// File store on a NOR flash partition
pub struct NorFileSystem<S: NorFlash> {
    flash: S,
    range: Range<u32>,
    mounted: bool,
    data_buffer: [u8; DATA_BUFFER_SIZE],
}

impl<S: NorFlash> NorFileSystem<S> {
    /// Create a file store over `range` of `flash`
    ///
    /// The range must be aligned to the flash erase size and span at least
    /// two erase pages. Nothing is touched until [`mount`](FileSystem::mount).
    pub fn new(flash: S, range: Range<u32>) -> Self {
        Self {
            flash,
            range,
            mounted: false,
            data_buffer: [0u8; DATA_BUFFER_SIZE],
        }
    }

    /// Check if the store is mounted
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Consume the store and return the underlying flash
    pub fn into_flash(self) -> S {
        self.flash
    }

    /// Erase the partition and write a fresh volume header
    ///
    /// All files are lost. Leaves the store mounted on success.
    pub fn format(&mut self) -> Result<(), FsError> {
        self.mounted = false;

        block_on(sequential_storage::erase_all(&mut self.flash, self.range.clone()))
            .map_err(|_| FsError::Io)?;

        let mut header_buffer = [0u8; MAX_HEADER_SIZE];
        let header = postcard::to_slice(&VolumeHeader::new(), &mut header_buffer)
            .map_err(|_| FsError::Io)?;
        let header: &[u8] = header;

        self.store(&StorageKey::Volume, header)?;
        self.mounted = true;
        Ok(())
    }

    /// Check the volume header, `Ok(false)` for blank or foreign data
    fn has_valid_header(&mut self) -> Result<bool, FsError> {
        let stored = block_on(map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            &StorageKey::Volume,
        ))
        .map_err(map_storage_error)?;

        Ok(stored.and_then(VolumeHeader::decode).is_some())
    }

    /// Fetch an item into `out`, `Ok(false)` if the key is absent
    fn fetch(&mut self, key: &StorageKey, out: &mut Vec<u8, MAX_FILE_SIZE>) -> Result<bool, FsError> {
        let stored = block_on(map::fetch_item::<StorageKey, &[u8], _>(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            key,
        ))
        .map_err(map_storage_error)?;

        match stored {
            Some(data) => {
                out.clear();
                out.extend_from_slice(data).map_err(|_| FsError::TooLarge)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn store(&mut self, key: &StorageKey, data: &[u8]) -> Result<(), FsError> {
        block_on(map::store_item(
            &mut self.flash,
            self.range.clone(),
            &mut NoCache::new(),
            &mut self.data_buffer,
            key,
            &data,
        ))
        .map_err(map_storage_error)
    }

    fn ensure_mounted(&self) -> Result<(), FsError> {
        if self.mounted {
            Ok(())
        } else {
            Err(FsError::NotMounted)
        }
    }
}

impl<S: NorFlash> FileSystem for NorFileSystem<S> {
    type File = NorFile;

    fn mount(&mut self, format_on_fail: bool) -> Result<(), FsError> {
        if self.mounted {
            return Ok(());
        }

        match self.has_valid_header() {
            Ok(true) => {
                self.mounted = true;
                Ok(())
            }
            Ok(false) | Err(_) if format_on_fail => self.format(),
            Ok(false) => Err(FsError::Corrupted),
            Err(e) => Err(e),
        }
    }

    fn exists(&mut self, path: &str) -> bool {
        if !self.mounted {
            return false;
        }
        let Ok(key) = StorageKey::file(path) else {
            return false;
        };

        matches!(
            block_on(map::fetch_item::<StorageKey, &[u8], _>(
                &mut self.flash,
                self.range.clone(),
                &mut NoCache::new(),
                &mut self.data_buffer,
                &key,
            )),
            Ok(Some(_))
        )
    }

    fn open(&mut self, path: &str, mode: OpenMode) -> Result<NorFile, FsError> {
        self.ensure_mounted()?;
        let key = StorageKey::file(path)?;

        let mut file = NorFile {
            mode,
            path: String::new(),
            data: Vec::new(),
            cursor: 0,
        };

        if mode == OpenMode::Read && !self.fetch(&key, &mut file.data)? {
            return Err(FsError::NotFound);
        }
        if let StorageKey::File(path) = key {
            file.path = path;
        }
        Ok(file)
    }

    fn read_line(&mut self, file: &mut NorFile, line: &mut Line) -> Result<bool, FsError> {
        if file.mode != OpenMode::Read {
            return Err(FsError::WrongMode);
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

        // Cannot fail: fit_to bounds the length to the buffer capacity
        let _ = line.push_str(fit_to(valid_prefix(raw), MAX_LINE_LEN));
        Ok(true)
    }

    fn write_line(&mut self, file: &mut NorFile, line: &str) -> Result<(), FsError> {
        if file.mode != OpenMode::Write {
            return Err(FsError::WrongMode);
        }
        if file.data.len() + line.len() + 1 > MAX_FILE_SIZE {
            return Err(FsError::Full);
        }
        file.data
            .extend_from_slice(line.as_bytes())
            .map_err(|_| FsError::Full)?;
        file.data.push(b'\n').map_err(|_| FsError::Full)
    }

    fn close(&mut self, file: NorFile) -> Result<(), FsError> {
        match file.mode {
            OpenMode::Read => Ok(()),
            OpenMode::Write => {
                self.ensure_mounted()?;
                let key = StorageKey::File(file.path);
                self.store(&key, &file.data)
            }
        }
    }

    fn discard(&mut self, _file: NorFile) {}
}

/// Map sequential-storage errors to filesystem errors
fn map_storage_error<E>(error: sequential_storage::Error<E>) -> FsError {
    match error {
        sequential_storage::Error::FullStorage => FsError::Full,
        sequential_storage::Error::Corrupted { .. } => FsError::Corrupted,
        sequential_storage::Error::ItemTooBig => FsError::TooLarge,
        _ => FsError::Io,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_storage_async::nor_flash::{
        ErrorType, MultiwriteNorFlash, NorFlashError, NorFlashErrorKind, ReadNorFlash,
    };

    const PAGE_SIZE: usize = 4096;
    const PAGES: usize = 4;
    const FLASH_SIZE: usize = PAGE_SIZE * PAGES;

    /// RAM-backed NOR flash: erase sets 0xFF, writes can only clear bits
    struct RamFlash {
        memory: [u8; FLASH_SIZE],
    }

    impl RamFlash {
        fn new() -> Self {
            Self {
                memory: [0xFF; FLASH_SIZE],
            }
        }
    }

    #[derive(Debug)]
    struct RamFlashError;

    impl NorFlashError for RamFlashError {
        fn kind(&self) -> NorFlashErrorKind {
            NorFlashErrorKind::OutOfBounds
        }
    }

    impl ErrorType for RamFlash {
        type Error = RamFlashError;
    }

    impl ReadNorFlash for RamFlash {
        const READ_SIZE: usize = 1;

        async fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            let end = start + bytes.len();
            if end > FLASH_SIZE {
                return Err(RamFlashError);
            }
            bytes.copy_from_slice(&self.memory[start..end]);
            Ok(())
        }

        fn capacity(&self) -> usize {
            FLASH_SIZE
        }
    }

    impl NorFlash for RamFlash {
        const WRITE_SIZE: usize = 4;
        const ERASE_SIZE: usize = PAGE_SIZE;

        async fn erase(&mut self, from: u32, to: u32) -> Result<(), Self::Error> {
            let (from, to) = (from as usize, to as usize);
            if to > FLASH_SIZE || from > to {
                return Err(RamFlashError);
            }
            self.memory[from..to].fill(0xFF);
            Ok(())
        }

        async fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
            let start = offset as usize;
            let end = start + bytes.len();
            if end > FLASH_SIZE {
                return Err(RamFlashError);
            }
            for (cell, byte) in self.memory[start..end].iter_mut().zip(bytes) {
                *cell &= *byte;
            }
            Ok(())
        }
    }

    impl MultiwriteNorFlash for RamFlash {}

    fn new_fs() -> NorFileSystem<RamFlash> {
        NorFileSystem::new(RamFlash::new(), 0..FLASH_SIZE as u32)
    }

    fn write_file(fs: &mut NorFileSystem<RamFlash>, path: &str, lines: &[&str]) {
        let mut file = fs.open(path, OpenMode::Write).unwrap();
        for line in lines {
            fs.write_line(&mut file, line).unwrap();
        }
        fs.close(file).unwrap();
    }

    #[test]
    fn test_operations_require_mount() {
        let mut fs = new_fs();
        assert!(!fs.is_mounted());
        assert!(!fs.exists("/config.env"));
        assert!(matches!(
            fs.open("/config.env", OpenMode::Read),
            Err(FsError::NotMounted)
        ));
    }

    #[test]
    fn test_mount_blank_flash_without_format_fails() {
        let mut fs = new_fs();
        assert_eq!(fs.mount(false), Err(FsError::Corrupted));
        assert!(!fs.is_mounted());
    }

    #[test]
    fn test_mount_blank_flash_with_format() {
        let mut fs = new_fs();
        assert_eq!(fs.mount(true), Ok(()));
        assert!(fs.is_mounted());
        assert!(!fs.exists("/config.env"));
    }

    #[test]
    fn test_remount_keeps_files() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        write_file(&mut fs, "/config.env", &["WIFI_SSID=\"MyNet\""]);

        // Simulate a reboot on the same flash
        let mut fs = NorFileSystem::new(fs.into_flash(), 0..FLASH_SIZE as u32);
        assert_eq!(fs.mount(false), Ok(()));
        assert!(fs.exists("/config.env"));
    }

    #[test]
    fn test_write_then_read_lines() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        write_file(&mut fs, "/config.env", &["# net", "WIFI_SSID=MyNet", ""]);

        let mut file = fs.open("/config.env", OpenMode::Read).unwrap();
        assert_eq!(file.path(), "/config.env");
        let mut line = Line::new();

        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.as_str(), "# net");
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.as_str(), "WIFI_SSID=MyNet");
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.as_str(), "");
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(false));
        assert!(line.is_empty());

        fs.close(file).unwrap();
    }

    #[test]
    fn test_rewrite_replaces_contents() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        write_file(&mut fs, "/config.env", &["A=1", "B=2"]);
        write_file(&mut fs, "/config.env", &["C=3"]);

        let mut file = fs.open("/config.env", OpenMode::Read).unwrap();
        let mut line = Line::new();
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.as_str(), "C=3");
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(false));
        fs.close(file).unwrap();
    }

    #[test]
    fn test_write_not_visible_until_close() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();

        let mut file = fs.open("/config.env", OpenMode::Write).unwrap();
        fs.write_line(&mut file, "A=1").unwrap();
        assert!(!fs.exists("/config.env"));

        fs.close(file).unwrap();
        assert!(fs.exists("/config.env"));
    }

    #[test]
    fn test_open_missing_file() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        assert!(matches!(
            fs.open("/missing.env", OpenMode::Read),
            Err(FsError::NotFound)
        ));
    }

    #[test]
    fn test_open_invalid_path() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        assert!(matches!(
            fs.open("config.env", OpenMode::Write),
            Err(FsError::InvalidPath)
        ));
        assert!(!fs.exists("config.env"));
    }

    #[test]
    fn test_wrong_mode() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        let mut line = Line::new();

        let mut file = fs.open("/config.env", OpenMode::Write).unwrap();
        assert_eq!(fs.read_line(&mut file, &mut line), Err(FsError::WrongMode));
        fs.write_line(&mut file, "A=1").unwrap();
        fs.close(file).unwrap();

        let mut file = fs.open("/config.env", OpenMode::Read).unwrap();
        assert_eq!(fs.write_line(&mut file, "B=2"), Err(FsError::WrongMode));
        fs.close(file).unwrap();
    }

    #[test]
    fn test_write_overflow_is_full() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();

        let chunk = [b'x'; 100];
        let chunk = core::str::from_utf8(&chunk).unwrap();
        let mut file = fs.open("/big.env", OpenMode::Write).unwrap();
        // 10 lines of 101 bytes fit in 1024, the 11th does not
        for _ in 0..10 {
            fs.write_line(&mut file, chunk).unwrap();
        }
        assert_eq!(fs.write_line(&mut file, chunk), Err(FsError::Full));
        fs.close(file).unwrap();
    }

    #[test]
    fn test_long_line_is_cut_to_line_buffer() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();

        let long = [b'a'; MAX_LINE_LEN + 40];
        let long = core::str::from_utf8(&long).unwrap();
        write_file(&mut fs, "/long.env", &[long, "NEXT=1"]);

        let mut file = fs.open("/long.env", OpenMode::Read).unwrap();
        let mut line = Line::new();
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.len(), MAX_LINE_LEN);
        // Rest of the long line is dropped, not served as a new line
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.as_str(), "NEXT=1");
        fs.close(file).unwrap();
    }

    #[test]
    fn test_discard_leaves_file_untouched() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();

        let mut file = fs.open("/config.env", OpenMode::Write).unwrap();
        fs.write_line(&mut file, "A=1").unwrap();
        fs.discard(file);
        assert!(!fs.exists("/config.env"));

        write_file(&mut fs, "/config.env", &["A=1"]);
        let mut file = fs.open("/config.env", OpenMode::Write).unwrap();
        fs.write_line(&mut file, "B=2").unwrap();
        fs.discard(file);

        let mut file = fs.open("/config.env", OpenMode::Read).unwrap();
        let mut line = Line::new();
        assert_eq!(fs.read_line(&mut file, &mut line), Ok(true));
        assert_eq!(line.as_str(), "A=1");
        fs.close(file).unwrap();
    }

    #[test]
    fn test_format_erases_files() {
        let mut fs = new_fs();
        fs.mount(true).unwrap();
        write_file(&mut fs, "/config.env", &["A=1"]);

        fs.format().unwrap();
        assert!(fs.is_mounted());
        assert!(!fs.exists("/config.env"));
    }
}

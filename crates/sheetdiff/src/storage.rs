//! Document storage used by comparison runs
//!
//! A run needs to open documents, save the highlighted result, duplicate
//! the source file as an output base and write the text log. [`FsStorage`]
//! does this on disk through the XLSX codec; [`MemoryStorage`] keeps
//! everything in memory for tests and embedders.

use std::path::{Path, PathBuf};

use ahash::AHashMap;
use sheetdiff_core::Workbook;
use sheetdiff_xlsx::{XlsxError, XlsxReader, XlsxWriter};
use thiserror::Error;

/// Errors raised by a [`Storage`] backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot decode or encode '{}': {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: XlsxError,
    },
}

/// Where documents and logs live
pub trait Storage {
    /// Open a document
    fn open(&self, path: &Path) -> Result<Workbook, StorageError>;

    /// Save a document, replacing whatever is at `path`
    fn save(&mut self, workbook: &Workbook, path: &Path) -> Result<(), StorageError>;

    /// Duplicate a stored document byte for byte
    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), StorageError>;

    /// Write the text change log
    fn write_log(&mut self, path: &Path, contents: &[u8]) -> Result<(), StorageError>;
}

/// Filesystem storage for `.xlsx` documents
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl FsStorage {
    pub fn new() -> Self {
        Self
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    if source.kind() == std::io::ErrorKind::NotFound {
        StorageError::NotFound(path.to_path_buf())
    } else {
        StorageError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl Storage for FsStorage {
    fn open(&self, path: &Path) -> Result<Workbook, StorageError> {
        XlsxReader::read_file(path).map_err(|source| match source {
            XlsxError::Io(io) => io_error(path, io),
            source => StorageError::Codec {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn save(&mut self, workbook: &Workbook, path: &Path) -> Result<(), StorageError> {
        XlsxWriter::write_file(workbook, path).map_err(|source| match source {
            XlsxError::Io(io) => io_error(path, io),
            source => StorageError::Codec {
                path: path.to_path_buf(),
                source,
            },
        })
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), StorageError> {
        std::fs::copy(from, to).map_err(|e| io_error(from, e))?;
        Ok(())
    }

    fn write_log(&mut self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        std::fs::write(path, contents).map_err(|e| io_error(path, e))
    }
}

/// In-memory storage keyed by path
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    workbooks: AHashMap<PathBuf, Workbook>,
    logs: AHashMap<PathBuf, Vec<u8>>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document under `path`
    pub fn insert_workbook<P: Into<PathBuf>>(&mut self, path: P, workbook: Workbook) {
        self.workbooks.insert(path.into(), workbook);
    }

    /// A stored document
    pub fn workbook<P: AsRef<Path>>(&self, path: P) -> Option<&Workbook> {
        self.workbooks.get(path.as_ref())
    }

    /// A written log, as text
    pub fn log<P: AsRef<Path>>(&self, path: P) -> Option<&str> {
        self.logs
            .get(path.as_ref())
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn open(&self, path: &Path) -> Result<Workbook, StorageError> {
        self.workbooks
            .get(path)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(path.to_path_buf()))
    }

    fn save(&mut self, workbook: &Workbook, path: &Path) -> Result<(), StorageError> {
        self.workbooks.insert(path.to_path_buf(), workbook.clone());
        self.saves += 1;
        Ok(())
    }

    fn copy(&mut self, from: &Path, to: &Path) -> Result<(), StorageError> {
        let workbook = self.open(from)?;
        self.workbooks.insert(to.to_path_buf(), workbook);
        Ok(())
    }

    fn write_log(&mut self, path: &Path, contents: &[u8]) -> Result<(), StorageError> {
        self.logs.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

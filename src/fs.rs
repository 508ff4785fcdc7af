//! Filesystem capability
//!
//! Everything the explorer knows about the disk goes through [`FileSystem`]: single-level
//! listings, existence checks, and whole-file text reads and writes. Listings and reads of
//! missing paths are empty rather than errors.

use std::fs;
use std::io::{self, ErrorKind};
use std::path::Path;
use walkdir::WalkDir;

/// Read/write access to the workspace on disk.
pub trait FileSystem {
    /// Names of the immediate subdirectories of `path`, sorted byte-wise.
    fn list_directories(&self, path: &Path) -> io::Result<Vec<String>>;

    /// Names of the immediate non-directory entries of `path`, sorted byte-wise.
    fn list_files(&self, path: &Path) -> io::Result<Vec<String>>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Whole-file text read. `Ok(None)` when the file does not exist.
    ///
    /// Invalid UTF-8 sequences decode as U+FFFD rather than failing the read.
    fn read_text_file(&self, path: &Path) -> io::Result<Option<String>>;

    /// Replace the file contents, creating parent directories as needed.
    fn write_text_file(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// [`FileSystem`] backed by the local disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }

    fn list_entries(&self, path: &Path, directories: bool) -> io::Result<Vec<String>> {
        let walker = WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        let mut names = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() == 0 && is_not_found(&err) => return Ok(Vec::new()),
                Err(err) => return Err(io::Error::from(err)),
            };
            // Symlinks are not followed, so a link to a directory lists as a file.
            if entry.file_type().is_dir() == directories {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        Ok(names)
    }
}

fn is_not_found(err: &walkdir::Error) -> bool {
    err.io_error()
        .map(|io| io.kind() == ErrorKind::NotFound)
        .unwrap_or(false)
}

impl FileSystem for LocalFileSystem {
    fn list_directories(&self, path: &Path) -> io::Result<Vec<String>> {
        self.list_entries(path, true)
    }

    fn list_files(&self, path: &Path) -> io::Result<Vec<String>> {
        self.list_entries(path, false)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn read_text_file(&self, path: &Path) -> io::Result<Option<String>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn write_text_file(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}

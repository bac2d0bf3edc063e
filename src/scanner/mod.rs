pub mod error;
pub mod extension_table;
pub mod walker;

pub use error::ScanError;
pub use extension_table::ExtensionTable;
pub use walker::{FileSource, OsFileSource, RootKind, WalkError, WalkItem};

use std::io;
use std::path::{Path, PathBuf};
use log::{debug, trace};

/// What to scan. Built once from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub root: PathBuf,
    pub recursive: bool,
    /// Order entries by file name within each directory.
    pub sorted: bool,
}

impl ScanRequest {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            recursive: false,
            sorted: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn sorted(mut self, sorted: bool) -> Self {
        self.sorted = sorted;
        self
    }
}

/// A file whose extension is in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub path: PathBuf,
    pub label: &'static str,
}

pub struct Scanner<'t, S: FileSource = OsFileSource> {
    table: &'t ExtensionTable,
    source: S,
}

impl Scanner<'static, OsFileSource> {
    /// Scanner over the real filesystem with the built-in table.
    pub fn new() -> Self {
        Self::with_source(ExtensionTable::builtin(), OsFileSource::new())
    }
}

impl Default for Scanner<'static, OsFileSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'t, S: FileSource> Scanner<'t, S> {
    pub fn with_source(table: &'t ExtensionTable, source: S) -> Self {
        Self { table, source }
    }

    /// Start a scan. Each call walks the tree afresh.
    ///
    /// Fails up front when the root is not a directory. Everything after that
    /// arrives through the returned iterator: matches, per-file warnings, and at
    /// most one fatal error after which the iterator is exhausted.
    pub fn scan<'a>(&'a self, request: &'a ScanRequest) -> Result<Scan<'a>, ScanError> {
        let root = request.root.as_path();

        match self.source.root_kind(root) {
            Ok(RootKind::Directory) => {}
            Ok(RootKind::NotDirectory) | Ok(RootKind::Missing) => {
                return Err(ScanError::InvalidInput { path: root.to_path_buf() });
            }
            Err(source) => return Err(root_error(root, source)),
        }

        debug!(
            "Scanning {} ({})",
            root.display(),
            if request.recursive { "recursive" } else { "flat" }
        );

        Ok(Scan {
            table: self.table,
            files: self.source.files(root, request.recursive, request.sorted),
            done: false,
        })
    }
}

/// Lazy sequence of scan outcomes.
pub struct Scan<'a> {
    table: &'a ExtensionTable,
    files: Box<dyn Iterator<Item = WalkItem> + 'a>,
    done: bool,
}

impl<'a> Iterator for Scan<'a> {
    type Item = Result<MatchResult, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.files.next()? {
                Ok(path) => {
                    if let Some(label) = self.table.label_for(&path) {
                        return Some(Ok(MatchResult { path, label }));
                    }
                    trace!("Skipping {}", path.display());
                }
                Err(err) if err.at_root() => {
                    self.done = true;
                    return Some(Err(root_error(&err.path, err.source)));
                }
                Err(err) => {
                    return Some(Err(ScanError::PerFile {
                        path: err.path,
                        source: err.source,
                    }));
                }
            }
        }
    }
}

fn root_error(root: &Path, source: io::Error) -> ScanError {
    match source.kind() {
        io::ErrorKind::NotFound => ScanError::InvalidInput { path: root.to_path_buf() },
        _ => ScanError::PermissionDenied { path: root.to_path_buf(), source },
    }
}

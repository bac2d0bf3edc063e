//! Traversal strategies behind the scanner.

use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// What the root of a scan turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootKind {
    Directory,
    NotDirectory,
    Missing,
}

/// Failure while enumerating; `depth == 0` means the root itself.
#[derive(Debug)]
pub struct WalkError {
    pub path: PathBuf,
    pub depth: usize,
    pub source: io::Error,
}

impl WalkError {
    pub fn at_root(&self) -> bool {
        self.depth == 0
    }
}

pub type WalkItem = Result<PathBuf, WalkError>;

/// Something a scan can enumerate files from.
///
/// `files` yields regular files only. Directories reached through symlinks
/// are never entered.
pub trait FileSource {
    fn root_kind(&self, root: &Path) -> io::Result<RootKind>;

    fn files<'a>(&'a self, root: &'a Path, recursive: bool, sorted: bool)
        -> Box<dyn Iterator<Item = WalkItem> + 'a>;
}

/// The real filesystem, walked with `walkdir`.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileSource;

impl OsFileSource {
    pub fn new() -> Self {
        Self
    }
}

impl FileSource for OsFileSource {
    fn root_kind(&self, root: &Path) -> io::Result<RootKind> {
        match std::fs::metadata(root) {
            Ok(meta) if meta.is_dir() => Ok(RootKind::Directory),
            Ok(_) => Ok(RootKind::NotDirectory),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(RootKind::Missing),
            Err(e) => Err(e),
        }
    }

    fn files<'a>(&'a self, root: &'a Path, recursive: bool, sorted: bool)
        -> Box<dyn Iterator<Item = WalkItem> + 'a>
    {
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .follow_links(false);

        if !recursive {
            walker = walker.max_depth(1);
        }
        if sorted {
            walker = walker.sort_by_file_name();
        }

        Box::new(walker.into_iter().filter_map(move |entry| match entry {
            Ok(entry) => {
                let file_type = entry.file_type();
                if file_type.is_file() {
                    Some(Ok(entry.into_path()))
                } else if file_type.is_symlink() {
                    resolve_symlink(entry.path(), entry.depth())
                } else {
                    None
                }
            }
            Err(err) => Some(Err(walk_error(root, err))),
        }))
    }
}

/// Symlinks count when they point at a regular file.
fn resolve_symlink(path: &Path, depth: usize) -> Option<WalkItem> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Some(Ok(path.to_path_buf())),
        Ok(_) => None,
        Err(source) => Some(Err(WalkError {
            path: path.to_path_buf(),
            depth,
            source,
        })),
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> WalkError {
    let depth = err.depth();
    let path = err
        .path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| root.to_path_buf());
    let source = match err.into_io_error() {
        Some(io_err) => io_err,
        // Only loops land here, and those need followed links.
        None => io::Error::new(io::ErrorKind::Other, "filesystem loop detected"),
    };

    WalkError { path, depth, source }
}

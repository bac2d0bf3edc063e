use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures a scan can report.
///
/// `InvalidInput` and `PermissionDenied` end the run; `PerFile` is a warning
/// and the scan keeps going.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("'{}' is not a valid directory", path.display())]
    InvalidInput { path: PathBuf },

    #[error("Permission denied accessing '{}'", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not process '{}': {source}", path.display())]
    PerFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ScanError {
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScanError::PerFile { .. })
    }
}

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Mode-000 directory, made readable again when dropped.
pub struct LockedDir {
    path: PathBuf,
}

impl LockedDir {
    /// Lock `path`, or `None` when the current user can read it anyway (e.g. root).
    pub fn lock(path: &Path) -> Option<Self> {
        fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
        let guard = LockedDir { path: path.to_path_buf() };

        if fs::read_dir(path).is_ok() {
            eprintln!(
                "note: {} stays readable without permissions for this user; permission assertions skipped",
                path.display()
            );
            return None;
        }
        Some(guard)
    }
}

impl Drop for LockedDir {
    fn drop(&mut self) {
        let _ = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o755));
    }
}

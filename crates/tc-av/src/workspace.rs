//! Mount context for one encode.
//!
//! A [`MountContext`] is the deepest existing directory that contains every
//! input and the output. It is the only host directory exposed to a
//! sandboxed encoder, the working directory of a local one, and the home of
//! the scratch files (FFMETADATA, concat list) the encoder reads.

use std::io::Write;
use std::path::{Component, Path, PathBuf};

use tempfile::NamedTempFile;
use tc_core::{Error, Result};

/// Prefix of every scratch file created inside a mount.
const SCRATCH_PREFIX: &str = ".tomecat-";

/// The common ancestor directory of a set of paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountContext {
    dir: PathBuf,
}

impl MountContext {
    /// Compute the deepest common ancestor of the parents of `paths`.
    ///
    /// All paths must be absolute.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCommonDirectory`] when `paths` is empty, the paths
    /// share no ancestor, or the ancestor is not an existing directory.
    pub fn resolve<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut parents = paths
            .iter()
            .map(|p| p.as_ref().parent().unwrap_or(p.as_ref()));

        let first = parents.next().ok_or(Error::NoCommonDirectory)?;
        let mut common: Vec<Component<'_>> = first.components().collect();

        for parent in parents {
            let shared = common
                .iter()
                .zip(parent.components())
                .take_while(|(a, b)| *a == b)
                .count();
            common.truncate(shared);
        }

        let dir: PathBuf = common.iter().collect();
        if dir.as_os_str().is_empty() || !dir.is_dir() {
            return Err(Error::NoCommonDirectory);
        }

        tracing::debug!("mount directory: {}", dir.display());
        Ok(Self { dir })
    }

    /// The mounted directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `path` relative to the mount, as a string argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PathResolution`] if `path` is not inside the mount.
    pub fn relative(&self, path: &Path) -> Result<String> {
        let rel = path.strip_prefix(&self.dir).map_err(|_| Error::PathResolution {
            path: path.to_path_buf(),
            message: format!("not inside {}", self.dir.display()),
        })?;
        Ok(rel.to_string_lossy().into_owned())
    }

    /// Write `contents` to a fresh hidden file inside the mount.
    ///
    /// The file is deleted when the returned handle is dropped, whether the
    /// encode succeeded or not.
    pub fn scratch_file(&self, label: &str, contents: &str) -> Result<NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .suffix(&format!(".{label}"))
            .tempfile_in(&self.dir)
            .map_err(|e| Error::io(&self.dir, e))?;

        file.write_all(contents.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| Error::io(file.path(), e))?;

        tracing::debug!("wrote scratch file {}", file.path().display());
        Ok(file)
    }
}

//! Input discovery.
//!
//! Expands the user's paths into an ordered list of audio files. Directories
//! are walked recursively in name order; every path visited (directories
//! included) counts against a global cap.

use std::path::{Path, PathBuf};

use tc_core::config::MAX_VISITED_PATHS;
use tc_core::{natural, paths, Error, FileDescriptor, Result};

/// Walks input paths and collects supported audio files.
#[derive(Debug)]
pub struct PathCollector {
    visited: usize,
    limit: usize,
    files: Vec<FileDescriptor>,
}

impl Default for PathCollector {
    fn default() -> Self {
        Self::with_limit(MAX_VISITED_PATHS)
    }
}

impl PathCollector {
    /// A collector with a custom visit cap.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            visited: 0,
            limit,
            files: Vec::new(),
        }
    }

    /// Collect the audio files under `inputs` with the default cap.
    pub fn collect(inputs: &[PathBuf]) -> Result<Vec<FileDescriptor>> {
        Self::default().run(inputs)
    }

    /// Walk `inputs` and return the accepted files in natural order.
    ///
    /// The sort key is the whole absolute path rather than the base name, so
    /// files from different directories stay grouped by directory instead of
    /// interleaving by track number. Paths are absolute with `.` and `..`
    /// removed.
    ///
    /// # Errors
    ///
    /// - [`Error::NoInputs`] when `inputs` is empty.
    /// - [`Error::TooManyFiles`] once more than the cap of paths is visited.
    /// - [`Error::Io`] when a path cannot be read.
    /// - [`Error::NoAudioFiles`] when nothing passes the extension filter.
    pub fn run(mut self, inputs: &[PathBuf]) -> Result<Vec<FileDescriptor>> {
        if inputs.is_empty() {
            return Err(Error::NoInputs);
        }
        for input in inputs {
            self.visit(input)?;
        }
        if self.files.is_empty() {
            return Err(Error::NoAudioFiles);
        }

        let mut files = self.files;
        files.sort_by_cached_key(|f| natural::sort_key(&f.path.to_string_lossy()));
        tracing::debug!("collected {} audio files ({} paths visited)", files.len(), self.visited);
        Ok(files)
    }

    fn visit(&mut self, path: &Path) -> Result<()> {
        self.visited += 1;
        if self.visited > self.limit {
            return Err(Error::TooManyFiles { limit: self.limit });
        }

        let meta = std::fs::metadata(path).map_err(|e| Error::io(path, e))?;
        let path = paths::absolute(path).map_err(|e| Error::io(path, e))?;

        if meta.is_dir() {
            tracing::debug!("add directory: {}", path.display());
            let mut children = std::fs::read_dir(&path)
                .map_err(|e| Error::io(&path, e))?
                .map(|entry| entry.map(|e| e.path()))
                .collect::<std::io::Result<Vec<_>>>()
                .map_err(|e| Error::io(&path, e))?;
            children.sort();
            for child in &children {
                self.visit(child)?;
            }
            return Ok(());
        }

        if let Some(ext) = tc_core::audio_extension(&path) {
            tracing::debug!("add audio file: {}", path.display());
            self.files.push(FileDescriptor::new(path, ext));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::fs;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"").unwrap();
    }

    fn names(files: &[FileDescriptor]) -> Vec<&str> {
        files.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn natural_order_within_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["track1.mp3", "track10.mp3", "track2.mp3"] {
            touch(&dir.path().join(name));
        }

        let files = PathCollector::collect(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(names(&files), ["track1", "track2", "track10"]);
        assert!(files.iter().all(|f| f.path.is_absolute()));
    }

    #[test]
    fn filters_by_extension_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.MP3"));
        touch(&dir.path().join("b.m4b"));
        touch(&dir.path().join("cover.jpg"));
        touch(&dir.path().join("notes.txt"));

        let files = PathCollector::collect(&[dir.path().to_path_buf()]).unwrap();
        assert_eq!(names(&files), ["a", "b"]);
        assert_eq!(files[0].extension, ".MP3");
    }

    #[test]
    fn recurses_into_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("disc2/01.mp3"));
        touch(&dir.path().join("disc1/02.mp3"));
        touch(&dir.path().join("disc1/01.mp3"));

        let files = PathCollector::collect(&[dir.path().to_path_buf()]).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            [
                PathBuf::from("disc1/01.mp3"),
                PathBuf::from("disc1/02.mp3"),
                PathBuf::from("disc2/01.mp3"),
            ]
        );
    }

    #[test]
    fn explicit_files_are_sorted_too() {
        let dir = tempfile::tempdir().unwrap();
        let b = dir.path().join("b.opus");
        let a = dir.path().join("a.opus");
        touch(&a);
        touch(&b);

        let files = PathCollector::collect(&[b, a]).unwrap();
        assert_eq!(names(&files), ["a", "b"]);
    }

    #[test]
    fn parent_components_are_removed() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("work")).unwrap();
        touch(&dir.path().join("book/01.mp3"));

        let files = PathCollector::collect(&[dir.path().join("work/../book")]).unwrap();
        assert_eq!(files[0].path, dir.path().join("book/01.mp3"));
        assert!(files[0]
            .path
            .components()
            .all(|c| !matches!(c, std::path::Component::ParentDir | std::path::Component::CurDir)));
    }

    #[test]
    fn directories_given_as_inputs_stay_grouped() {
        let dir = tempfile::tempdir().unwrap();
        for rel in ["disc1/01.mp3", "disc1/02.mp3", "disc2/01.mp3", "disc2/02.mp3"] {
            touch(&dir.path().join(rel));
        }

        let inputs = [dir.path().join("disc2"), dir.path().join("disc1")];
        let files = PathCollector::collect(&inputs).unwrap();
        let rel: Vec<_> = files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            rel,
            [
                PathBuf::from("disc1/01.mp3"),
                PathBuf::from("disc1/02.mp3"),
                PathBuf::from("disc2/01.mp3"),
                PathBuf::from("disc2/02.mp3"),
            ]
        );
    }

    #[test]
    fn empty_input_list() {
        assert_matches!(PathCollector::collect(&[]), Err(Error::NoInputs));
    }

    #[test]
    fn no_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("readme.txt"));
        assert_matches!(
            PathCollector::collect(&[dir.path().to_path_buf()]),
            Err(Error::NoAudioFiles)
        );
    }

    #[test]
    fn missing_path_is_an_io_error() {
        let err = PathCollector::collect(&[PathBuf::from("/nonexistent_tomecat/x.mp3")]).unwrap_err();
        assert_matches!(err, Error::Io { ref path, .. } if path.ends_with("x.mp3"));
    }

    #[test]
    fn visit_cap_counts_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("1.mp3"));
        touch(&dir.path().join("2.mp3"));

        // The directory itself plus two files.
        let input = [dir.path().to_path_buf()];
        assert!(PathCollector::with_limit(3).run(&input).is_ok());
        assert_matches!(
            PathCollector::with_limit(2).run(&input),
            Err(Error::TooManyFiles { limit: 2 })
        );
    }

    #[test]
    fn ineligible_files_count_toward_the_cap() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.mp3"));
        touch(&dir.path().join("b.txt"));
        touch(&dir.path().join("c.txt"));

        let input = [dir.path().to_path_buf()];
        assert_matches!(
            PathCollector::with_limit(3).run(&input),
            Err(Error::TooManyFiles { .. })
        );
    }
}

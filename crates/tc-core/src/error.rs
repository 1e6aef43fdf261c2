//! Unified error type for tomecat.
//!
//! Every pipeline stage funnels its failures into [`Error`]. The variants
//! mirror the stages: discovery, probing, mount/output resolution, and the
//! final encode. All of them are fatal for a run.

use std::path::{Path, PathBuf};

/// Unified error type covering all failure modes of a merge run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No input paths were supplied.
    #[error("no input files provided")]
    NoInputs,

    /// Inputs were supplied but none of them is a supported audio file.
    #[error("no audio files found in the provided inputs")]
    NoAudioFiles,

    /// Discovery visited more paths than allowed.
    #[error("too many files: more than {limit} paths visited")]
    TooManyFiles {
        /// The visit cap that was exceeded.
        limit: usize,
    },

    /// The prober failed or produced unusable output for a file.
    #[error("probe failed for {}: {message}", path.display())]
    Probe {
        /// The file being probed.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// Inputs and output share no common existing directory.
    #[error("files have no common directory")]
    NoCommonDirectory,

    /// The output target could not be made absolute.
    #[error("failed to resolve output path {}: {message}", path.display())]
    PathResolution {
        /// The path that failed to resolve.
        path: PathBuf,
        /// Human-readable error description.
        message: String,
    },

    /// The encoder exited unsuccessfully; carries its diagnostic output.
    #[error("encoder failed:\n{}", .0.trim_end())]
    Encode(String),

    /// An external tool could not be located or spawned.
    #[error("Tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// An I/O operation on a specific path failed.
    #[error("IO error on {}: {source}", path.display())]
    Io {
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Configuration could not be parsed or is invalid.
    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    /// Convenience constructor for [`Error::Probe`].
    pub fn probe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Probe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Io`].
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        Error::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Short name of the failure class, used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NoInputs => "no_inputs",
            Error::NoAudioFiles => "no_audio_files",
            Error::TooManyFiles { .. } => "too_many_files",
            Error::Probe { .. } => "probe",
            Error::NoCommonDirectory => "no_common_directory",
            Error::PathResolution { .. } => "path_resolution",
            Error::Encode(_) => "encode",
            Error::Tool { .. } => "tool",
            Error::Io { .. } => "io",
            Error::Config(_) => "config",
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_many_files_display() {
        let err = Error::TooManyFiles { limit: 1000 };
        assert_eq!(err.to_string(), "too many files: more than 1000 paths visited");
        assert_eq!(err.kind(), "too_many_files");
    }

    #[test]
    fn probe_display() {
        let err = Error::probe("/music/a.mp3", "exit status 1");
        assert_eq!(err.to_string(), "probe failed for /music/a.mp3: exit status 1");
    }

    #[test]
    fn encode_carries_diagnostics_verbatim() {
        let err = Error::Encode("Unknown encoder 'libfdk_aac'\n".into());
        assert!(matches!(err, Error::Encode(ref text) if text.ends_with('\n')));
        assert!(err.to_string().ends_with("Unknown encoder 'libfdk_aac'"));
    }

    #[test]
    fn tool_display() {
        let err = Error::tool("ffmpeg", "not found");
        assert_eq!(err.to_string(), "Tool error [ffmpeg]: not found");
    }

    #[test]
    fn io_display_names_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err = Error::io(Path::new("/nope"), source);
        assert!(err.to_string().contains("/nope"));
        assert_eq!(err.kind(), "io");
    }

    #[test]
    fn result_alias() {
        fn err_fn() -> Result<i32> {
            Err(Error::NoInputs)
        }
        assert!(err_fn().is_err());
    }
}

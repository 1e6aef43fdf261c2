//! Media data model: input file descriptors, tags, chapters, and the
//! aggregated output metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Extensions accepted during discovery (lowercase, with leading dot).
pub const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".m4a", ".m4b", ".opus"];

/// Return the allow-listed extension of `path` as it appears in the file
/// name, or `None` if the file is not a supported audio file.
///
/// Matching is case-insensitive; the returned slice keeps the original case
/// so it can be stripped from the file name.
pub fn audio_extension(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    AUDIO_EXTENSIONS.iter().find_map(|ext| {
        let split = file_name.len().checked_sub(ext.len()).filter(|&i| i > 0)?;
        let suffix = file_name.get(split..)?;
        suffix.eq_ignore_ascii_case(ext).then(|| suffix.to_string())
    })
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Per-file tags reported by the prober. Absent tags are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tags {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub date: String,
}

// ---------------------------------------------------------------------------
// FileDescriptor
// ---------------------------------------------------------------------------

/// What the prober learned about a single file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeReport {
    /// Duration in milliseconds; zero when the prober reported none.
    pub duration_ms: u64,
    /// Bitrate as reported by the prober, if any.
    pub bitrate: Option<u64>,
    pub tags: Tags,
}

/// A candidate input file.
///
/// Discovery fills in the path, name, and extension; probing completes the
/// duration, bitrate, and tags via [`FileDescriptor::with_probe`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// File name without the extension.
    pub name: String,
    /// Extension including the leading dot.
    pub extension: String,
    pub duration_ms: u64,
    pub tags: Tags,
    pub bitrate: Option<u64>,
}

impl FileDescriptor {
    /// Build an unprobed descriptor for an absolute path with a known
    /// audio extension.
    pub fn new(path: PathBuf, extension: String) -> Self {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(extension.as_str())
            .unwrap_or(&file_name)
            .to_string();
        Self {
            path,
            name,
            extension,
            duration_ms: 0,
            tags: Tags::default(),
            bitrate: None,
        }
    }

    /// Complete the descriptor with probe results.
    pub fn with_probe(self, report: ProbeReport) -> Self {
        Self {
            duration_ms: report.duration_ms,
            bitrate: report.bitrate,
            tags: report.tags,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// Output metadata
// ---------------------------------------------------------------------------

/// A chapter marker with millisecond offsets into the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub start_ms: u64,
    pub end_ms: u64,
    pub title: String,
}

/// Metadata aggregated across all inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputMetadata {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub date: String,
    pub total_duration_ms: u64,
    /// Chosen output bitrate in kbit/s.
    pub bitrate_kbps: u32,
    /// Lowest bitrate reported by any input, in kbit/s.
    pub source_bitrate_kbps: Option<u32>,
    pub chapters: Vec<Chapter>,
}

/// Where the encoder writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// An absolute file path.
    File(PathBuf),
    /// The encoder's stdout, forwarded to ours.
    Pipe,
}

impl OutputTarget {
    /// The output file path, or `None` when piping.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(p) => Some(p),
            Self::Pipe => None,
        }
    }
}

impl fmt::Display for OutputTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(p) => write!(f, "{}", p.display()),
            Self::Pipe => write!(f, "stdout"),
        }
    }
}

/// Format milliseconds as `H:MM:SS.mmm` for log lines.
pub fn format_millis(ms: u64) -> String {
    let secs = ms / 1000;
    format!(
        "{}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        ms % 1000
    )
}

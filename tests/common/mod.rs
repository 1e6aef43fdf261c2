//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tc_av::Prober;
use tc_core::{Error, ProbeReport, Result, Tags};

/// A prober answering from a table keyed by file name.
///
/// Files missing from the table probe as zero-length and untagged.
#[derive(Default)]
pub struct StubProber {
    reports: HashMap<String, ProbeReport>,
    failing: Option<String>,
    calls: AtomicUsize,
}

impl StubProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, file_name: &str, duration_ms: u64, bitrate: Option<u64>, tags: Tags) -> Self {
        self.reports.insert(
            file_name.to_string(),
            ProbeReport {
                duration_ms,
                bitrate,
                tags,
            },
        );
        self
    }

    /// Make probing `file_name` fail.
    pub fn failing_on(mut self, file_name: &str) -> Self {
        self.failing = Some(file_name.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Prober for StubProber {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn probe(&self, path: &Path) -> Result<ProbeReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.failing.as_deref() == Some(name.as_str()) {
            return Err(Error::probe(path, "exit status: 1"));
        }
        Ok(self.reports.get(&name).cloned().unwrap_or_default())
    }
}

pub fn tags(title: &str, artist: &str, album: &str) -> Tags {
    Tags {
        title: title.into(),
        artist: artist.into(),
        album: album.into(),
        ..Tags::default()
    }
}

/// Create empty files named `names` inside `dir`.
pub fn touch_all(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            std::fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}

/// Write an executable shell script.
#[cfg(unix)]
pub fn script(path: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_path_buf()
}

/// An ffmpeg stand-in: reports progress on stderr and creates the output
/// file named by its second-to-last argument.
pub const FAKE_FFMPEG: &str = r#"for a in "$@"; do prev="$cur"; cur="$a"; done
printf 'size=1kB time=00:00:01.00 bitrate=1k\r' >&2
printf 'size=2kB time=00:00:03.00 bitrate=1k\n' >&2
: > "$prev""#;

/// An ffprobe stand-in reporting a 1.5s, 64 kbit/s tagged track.
pub const FAKE_FFPROBE: &str = r#"cat <<'JSON'
{"streams": [{"codec_type": "audio"}],
 "format": {"duration": "1.500000", "bit_rate": "64000",
            "tags": {"artist": "Jane Author", "album": "Road Trip"}}}
JSON"#;

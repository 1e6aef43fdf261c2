//! FFprobe-based [`Prober`] implementation.
//!
//! Shells out to `ffprobe -v quiet -print_format json -show_format -show_streams`
//! and maps the JSON output into a [`ProbeReport`].

use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tc_core::{Error, ProbeReport, Result, Tags};

use super::Prober;
use crate::tools::{Tool, ToolRegistry};

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeProber {
    tools: ToolRegistry,
}

impl FfprobeProber {
    /// Create a new prober that resolves ffprobe through `tools`.
    pub fn new(tools: ToolRegistry) -> Self {
        Self { tools }
    }
}

#[async_trait]
impl Prober for FfprobeProber {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    async fn probe(&self, path: &Path) -> Result<ProbeReport> {
        let dir = path.parent().unwrap_or(path);
        let mut cmd = self.tools.command(Tool::Ffprobe, dir)?;
        cmd.args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ]);
        cmd.arg(path.to_string_lossy().as_ref());

        tracing::debug!("probe audio file: {}", path.display());
        let output = cmd
            .execute()
            .await
            .map_err(|e| Error::probe(path, e.to_string()))?;

        parse_ffprobe_output(path, &output.stdout)
    }
}

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
    bit_rate: Option<String>,
    #[serde(default)]
    tags: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
}

// ---------------------------------------------------------------------------
// Parsing helpers
// ---------------------------------------------------------------------------

fn parse_ffprobe_output(path: &Path, stdout: &str) -> Result<ProbeReport> {
    let output: FfprobeOutput = serde_json::from_str(stdout)
        .map_err(|e| Error::probe(path, format!("ffprobe JSON parse error: {e}")))?;

    if !output
        .streams
        .iter()
        .any(|s| s.codec_type.as_deref() == Some("audio"))
    {
        return Err(Error::probe(path, "no audio stream found"));
    }

    let duration_ms = match output.format.duration.as_deref().and_then(parse_duration_ms) {
        Some(ms) => ms,
        None => {
            tracing::warn!("cannot find duration for: {}", path.display());
            0
        }
    };

    let bitrate = output
        .format
        .bit_rate
        .as_deref()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|&b| b > 0);

    let tags = &output.format.tags;
    Ok(ProbeReport {
        duration_ms,
        bitrate,
        tags: Tags {
            title: tag(tags, "title"),
            artist: tag(tags, "artist"),
            album: tag(tags, "album"),
            genre: tag(tags, "genre"),
            date: tag(tags, "date"),
        },
    })
}

/// Decimal seconds to whole milliseconds, rounded.
fn parse_duration_ms(s: &str) -> Option<u64> {
    let secs = s.trim().parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some((secs * 1000.0).round() as u64)
}

/// Case-insensitive tag lookup; some containers report upper-case keys.
fn tag(tags: &BTreeMap<String, serde_json::Value>, key: &str) -> String {
    tags.iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .and_then(|(_, v)| v.as_str())
        .unwrap_or_default()
        .to_string()
}

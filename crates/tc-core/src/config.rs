//! Run configuration.
//!
//! A [`Config`] is built once per run (defaults, then an optional TOML file,
//! then command-line overrides) and handed to every stage by reference.
//! Every section defaults sensibly so an empty file is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Result;
use crate::Error;

/// Output token that selects the pipe sentinel instead of a file.
pub const STDOUT_TOKEN: &str = "stdout";

/// Maximum number of paths visited during input discovery.
pub const MAX_VISITED_PATHS: usize = 1000;

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Audio files and directories to merge. Usually supplied on the CLI.
    pub inputs: Vec<PathBuf>,
    /// Output path; empty for auto-naming, `stdout` to pipe.
    pub output: String,
    /// Container format used when piping to stdout.
    pub output_format: String,
    /// Extension used for synthesized output names.
    pub output_type: String,
    /// Output bitrate ceiling in kbit/s.
    pub max_bitrate: u32,
    /// Emit ID3v2.3 + ID3v1 tags for legacy players.
    pub legacy_id3: bool,
    /// Debug logging and verbose encoder diagnostics.
    pub debug: bool,
    /// Run the external tools inside docker even if installed locally.
    pub sandbox: bool,
    /// Docker image providing ffmpeg and ffprobe.
    pub sandbox_image: String,
    pub encoder: EncoderConfig,
    pub tools: ToolsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output: String::new(),
            output_format: "adts".into(),
            output_type: "m4a".into(),
            max_bitrate: 48,
            legacy_id3: false,
            debug: false,
            sandbox: false,
            sandbox_image: "linuxserver/ffmpeg".into(),
            encoder: EncoderConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Deserialize a `Config` from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| Error::Config(format!("parse error: {e}")))
    }

    /// Whether the output goes to stdout rather than a file.
    pub fn is_pipe_output(&self) -> bool {
        self.output == STDOUT_TOKEN
    }

    /// Return a list of validation warnings (non-fatal issues).
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.max_bitrate == 0 {
            warnings.push("max_bitrate is 0; the encoder will pick its own default".into());
        }
        if self.output_type.is_empty() {
            warnings.push("output_type is empty; synthesized names will end in '.'".into());
        }
        if self.output_type.starts_with('.') {
            warnings.push(format!(
                "output_type '{}' should not start with a dot",
                self.output_type
            ));
        }
        if self.encoder.channels == 0 {
            warnings.push("encoder.channels is 0".into());
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// How the encoder is told to concatenate inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcatMode {
    /// `concat:a|b|c` protocol input.
    #[default]
    Protocol,
    /// Concat demuxer reading a generated file list.
    List,
}

/// Audio encoder settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub codec: String,
    /// Codec profile; omitted from the invocation when `None`.
    pub profile: Option<String>,
    pub channels: u32,
    pub concat: ConcatMode,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            codec: "libfdk_aac".into(),
            profile: Some("aac_he_v2".into()),
            channels: 2,
            concat: ConcatMode::Protocol,
        }
    }
}

/// Paths to external CLI tools.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolsConfig {
    pub ffmpeg_path: Option<PathBuf>,
    pub ffprobe_path: Option<PathBuf>,
    pub docker_path: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let cfg = Config::default();
        assert_eq!(cfg.output_format, "adts");
        assert_eq!(cfg.output_type, "m4a");
        assert_eq!(cfg.max_bitrate, 48);
        assert_eq!(cfg.encoder.codec, "libfdk_aac");
        assert_eq!(cfg.encoder.profile.as_deref(), Some("aac_he_v2"));
        assert_eq!(cfg.encoder.concat, ConcatMode::Protocol);
        assert!(!cfg.sandbox);
    }

    #[test]
    fn default_config_no_warnings() {
        let warnings = Config::default().validate();
        assert!(warnings.is_empty(), "unexpected warnings: {:?}", warnings);
    }

    #[test]
    fn parse_empty_toml_uses_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.max_bitrate, 48);
        assert!(cfg.inputs.is_empty());
    }

    #[test]
    fn parse_toml_sections() {
        let cfg = Config::from_toml(
            r#"
            max_bitrate = 64
            output = "stdout"

            [encoder]
            codec = "aac"
            concat = "list"

            [tools]
            ffprobe_path = "/opt/ff/ffprobe"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.max_bitrate, 64);
        assert!(cfg.is_pipe_output());
        assert_eq!(cfg.encoder.codec, "aac");
        assert_eq!(cfg.encoder.profile.as_deref(), Some("aac_he_v2"));
        assert_eq!(cfg.encoder.concat, ConcatMode::List);
        assert_eq!(cfg.tools.ffprobe_path, Some(PathBuf::from("/opt/ff/ffprobe")));
    }

    #[test]
    fn parse_invalid_toml() {
        let err = Config::from_toml("max_bitrate = \"lots\"").unwrap_err();
        assert!(err.to_string().starts_with("Config error"));
    }

    #[test]
    fn dotted_output_type_warns() {
        let mut cfg = Config::default();
        cfg.output_type = ".m4b".into();
        assert!(cfg.validate().iter().any(|w| w.contains("dot")));
    }
}

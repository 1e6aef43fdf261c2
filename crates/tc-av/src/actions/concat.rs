//! Concatenate-and-re-encode via ffmpeg.

use tc_core::config::{Config, ConcatMode, EncoderConfig};
use tc_core::{Error, FileDescriptor, OutputMetadata, OutputTarget, Result};

use crate::ffmetadata;
use crate::progress::ProgressMonitor;
use crate::tools::{Tool, ToolRegistry};
use crate::workspace::MountContext;

/// Placeholder names shown by [`EncodePlan::preview_args`].
const METADATA_PLACEHOLDER: &str = "<ffmetadata>";
const FILE_LIST_PLACEHOLDER: &str = "<file-list>";

/// A fully resolved encoder invocation.
///
/// Every path the encoder sees is relative to the [`MountContext`], which
/// is also the encoder's working directory.
#[derive(Debug, Clone)]
pub struct EncodePlan {
    mount: MountContext,
    inputs: Vec<String>,
    /// Relative output path; `None` pipes to stdout.
    output: Option<String>,
    output_format: String,
    metadata: OutputMetadata,
    encoder: EncoderConfig,
    legacy_id3: bool,
    verbose: bool,
}

impl EncodePlan {
    /// Resolve the mount and relative paths for encoding `files` into
    /// `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoCommonDirectory`] if the inputs and output share
    /// no existing ancestor directory.
    pub fn new(
        config: &Config,
        files: &[FileDescriptor],
        metadata: OutputMetadata,
        output: &OutputTarget,
    ) -> Result<Self> {
        let mut paths: Vec<&std::path::Path> = files.iter().map(|f| f.path.as_path()).collect();
        if let Some(out) = output.path() {
            paths.push(out);
        }
        let mount = MountContext::resolve(&paths)?;

        let inputs = files
            .iter()
            .map(|f| mount.relative(&f.path))
            .collect::<Result<Vec<_>>>()?;
        let output = output.path().map(|p| mount.relative(p)).transpose()?;

        Ok(Self {
            mount,
            inputs,
            output,
            output_format: config.output_format.clone(),
            metadata,
            encoder: config.encoder.clone(),
            legacy_id3: config.legacy_id3,
            verbose: config.debug,
        })
    }

    pub fn mount(&self) -> &MountContext {
        &self.mount
    }

    pub fn metadata(&self) -> &OutputMetadata {
        &self.metadata
    }

    /// Input paths relative to the mount, in encode order.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// The FFMETADATA1 document for this encode.
    pub fn metadata_text(&self) -> String {
        ffmetadata::render(&self.metadata)
    }

    /// Concat demuxer file list, one `file '<path>'` line per input.
    pub fn file_list_text(&self) -> String {
        self.inputs
            .iter()
            .map(|p| format!("file '{}'\n", p.replace('\'', r"'\''")))
            .collect()
    }

    /// Encoder arguments.
    ///
    /// `metadata_file` and `file_list` are paths relative to the mount.
    /// A `file_list` selects the concat demuxer; without one the inputs are
    /// joined with the concat protocol.
    pub fn args(&self, metadata_file: &str, file_list: Option<&str>) -> Vec<String> {
        let loglevel = if self.verbose { "verbose" } else { "info" };
        let mut args: Vec<String> = vec!["-hide_banner".into(), "-loglevel".into(), loglevel.into()];

        match file_list {
            Some(list) => {
                args.extend(["-f", "concat", "-safe", "0", "-i", list].map(String::from));
            }
            None => {
                args.push("-i".into());
                args.push(format!("concat:{}", self.inputs.join("|")));
            }
        }

        args.extend(["-i", metadata_file, "-map_metadata", "1"].map(String::from));
        args.extend(["-vn", "-c:a", self.encoder.codec.as_str()].map(String::from));
        if let Some(ref profile) = self.encoder.profile {
            args.push("-profile:a".into());
            args.push(profile.clone());
        }
        args.push("-b:a".into());
        args.push(format!("{}k", self.metadata.bitrate_kbps));
        args.push("-ac".into());
        args.push(self.encoder.channels.to_string());

        if self.legacy_id3 {
            args.extend(["-id3v2_version", "3", "-write_id3v1", "1"].map(String::from));
        }

        match self.output {
            Some(ref out) => {
                args.push(out.clone());
                args.push("-y".into());
            }
            None => {
                args.push("-f".into());
                args.push(self.output_format.clone());
                args.push("pipe:1".into());
            }
        }
        args
    }

    /// Arguments with placeholders in place of the scratch files, for
    /// dry runs.
    pub fn preview_args(&self) -> Vec<String> {
        let list = (self.encoder.concat == ConcatMode::List).then_some(FILE_LIST_PLACEHOLDER);
        self.args(METADATA_PLACEHOLDER, list)
    }

    /// Write the scratch files, run the encoder and wait for it.
    ///
    /// The monitor consumes the encoder's stderr for the whole run. Scratch
    /// files are removed before this returns, on success and on failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encode`] with the encoder's diagnostics on a
    /// non-zero exit, or [`Error::Tool`] if it cannot be started.
    pub async fn execute(&self, tools: &ToolRegistry, monitor: ProgressMonitor) -> Result<()> {
        let metadata_file = self.mount.scratch_file("ffmeta", &self.metadata_text())?;
        let file_list = match self.encoder.concat {
            ConcatMode::List => Some(self.mount.scratch_file("list", &self.file_list_text())?),
            ConcatMode::Protocol => None,
        };

        let metadata_arg = self.mount.relative(metadata_file.path())?;
        let list_arg = file_list
            .as_ref()
            .map(|f| self.mount.relative(f.path()))
            .transpose()?;

        let mut cmd = tools.command(Tool::Ffmpeg, self.mount.dir())?;
        cmd.args(self.args(&metadata_arg, list_arg.as_deref()));
        cmd.current_dir(self.mount.dir());
        if self.output.is_none() {
            cmd.inherit_stdout();
        }

        tracing::debug!("encoder command: {}", cmd.display());
        let output = cmd.execute_with_stderr_monitor(monitor).await?;

        if !output.status.success() {
            return Err(Error::Encode(if output.stderr.trim().is_empty() {
                format!("ffmpeg exited with {}", output.status)
            } else {
                output.stderr
            }));
        }

        tracing::debug!("encoder diagnostics:\n{}", output.stderr.trim_end());
        Ok(())
    }
}

//! Output target resolution.

use std::path::{Path, PathBuf};

use tc_core::{paths, Config, Error, FileDescriptor, OutputMetadata, OutputTarget, Result};

/// Decide where the encoder writes.
///
/// An explicit `config.output` wins (`stdout` pipes). Otherwise a name is
/// synthesized from the aggregated author and title, or from the first
/// input's base name when either is missing. File targets are made absolute
/// against the current directory, with `.` and `..` removed.
///
/// # Errors
///
/// Returns [`Error::PathResolution`] if the path cannot be made absolute.
pub fn resolve_output(
    config: &Config,
    files: &[FileDescriptor],
    metadata: &OutputMetadata,
) -> Result<OutputTarget> {
    if config.is_pipe_output() {
        return Ok(OutputTarget::Pipe);
    }

    let path = if config.output.is_empty() {
        PathBuf::from(default_name(config, files, metadata))
    } else {
        PathBuf::from(&config.output)
    };

    absolute(&path).map(OutputTarget::File)
}

/// `"{author} - {title}.{type}"`, or the first input's name, with any `/`
/// replaced by a space.
pub fn default_name(config: &Config, files: &[FileDescriptor], metadata: &OutputMetadata) -> String {
    let stem = if !metadata.author.is_empty() && !metadata.title.is_empty() {
        format!("{} - {}", metadata.author, metadata.title)
    } else {
        files.first().map(|f| f.name.clone()).unwrap_or_default()
    };
    format!("{stem}.{}", config.output_type).replace('/', " ")
}

fn absolute(path: &Path) -> Result<PathBuf> {
    paths::absolute(path).map_err(|e| Error::PathResolution {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

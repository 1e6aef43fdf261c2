//! External tool detection and sandbox selection.
//!
//! The [`ToolRegistry`] discovers the locations of ffmpeg, ffprobe and
//! docker once per run and hands out [`ToolCommand`]s that either invoke a
//! tool directly or wrap it in `docker run` with a single bind mount.

use std::fmt;
use std::path::{Path, PathBuf};

use tc_core::config::{Config, ToolsConfig};
use tc_core::{Error, Result};

use crate::command::ToolCommand;

/// Tools the pipeline invokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Ffmpeg,
    Ffprobe,
}

impl Tool {
    /// Executable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Ffmpeg => "ffmpeg",
            Self::Ffprobe => "ffprobe",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registry holding discovered tool locations and the sandbox policy.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
    docker: Option<PathBuf>,
    force_sandbox: bool,
    image: String,
}

impl ToolRegistry {
    /// Discover tools by searching `PATH` (or using overrides from config).
    ///
    /// For each tool, a configured path is used when it exists; otherwise
    /// [`which::which`] is used to locate the tool in `PATH`. Tools that are
    /// not found are recorded as missing.
    pub fn discover(config: &Config) -> Self {
        let tools: &ToolsConfig = &config.tools;
        let registry = Self {
            ffmpeg: resolve("ffmpeg", tools.ffmpeg_path.as_deref()),
            ffprobe: resolve("ffprobe", tools.ffprobe_path.as_deref()),
            docker: resolve("docker", tools.docker_path.as_deref()),
            force_sandbox: config.sandbox,
            image: config.sandbox_image.clone(),
        };
        tracing::debug!(
            ffmpeg = ?registry.ffmpeg,
            ffprobe = ?registry.ffprobe,
            docker = ?registry.docker,
            sandbox = registry.force_sandbox,
            "tool discovery complete"
        );
        registry
    }

    fn local(&self, tool: Tool) -> Option<&PathBuf> {
        match tool {
            Tool::Ffmpeg => self.ffmpeg.as_ref(),
            Tool::Ffprobe => self.ffprobe.as_ref(),
        }
    }

    /// Whether `tool` runs inside the sandbox image.
    ///
    /// True when the sandbox is forced by configuration or the tool is not
    /// installed locally.
    pub fn is_sandboxed(&self, tool: Tool) -> bool {
        self.force_sandbox || self.local(tool).is_none()
    }

    /// Build a command for `tool`.
    ///
    /// In sandbox mode `mount_dir` is the only host directory made visible
    /// to the container; it is mounted at the same path and used as the
    /// working directory, so host paths inside it stay valid.
    ///
    /// # Errors
    ///
    /// Returns [`tc_core::Error::Tool`] if neither the tool nor docker can be
    /// found.
    pub fn command(&self, tool: Tool, mount_dir: &Path) -> Result<ToolCommand> {
        if !self.is_sandboxed(tool) {
            if let Some(path) = self.local(tool) {
                return Ok(ToolCommand::new(path.clone()));
            }
        }

        let docker = self.docker.as_ref().ok_or_else(|| {
            let message = if self.force_sandbox {
                "sandbox requested but docker was not found".to_string()
            } else {
                format!("{tool} not found; install it or make docker available")
            };
            Error::tool(tool.name(), message)
        })?;

        let dir = mount_dir.to_string_lossy();
        let mut cmd = ToolCommand::new(docker.clone());
        cmd.args(["run", "--rm"]);
        cmd.args(["-v".to_string(), format!("{dir}:{dir}")]);
        cmd.args(["-w".to_string(), dir.to_string()]);
        cmd.args(["--entrypoint", tool.name()]);
        cmd.arg(self.image.as_str());
        Ok(cmd)
    }
}

fn resolve(name: &str, custom: Option<&Path>) -> Option<PathBuf> {
    match custom {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => {
            tracing::warn!("configured {name} path {} does not exist; searching PATH", p.display());
            which::which(name).ok()
        }
        None => which::which(name).ok(),
    }
}

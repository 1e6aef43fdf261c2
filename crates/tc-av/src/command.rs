//! Builder for executing external tool commands.
//!
//! Short-lived tools (ffprobe) run through [`ToolCommand::execute`], which
//! captures both output streams and enforces a timeout. The encoder runs
//! through [`ToolCommand::execute_with_stderr_monitor`], which streams stderr
//! into a [`ProgressMonitor`] while the process runs and never times out.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tc_core::{Error, Result};
use tokio::process::Command;

use crate::progress::ProgressMonitor;

/// Default command timeout: 5 minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8). Empty when stdout was not
    /// captured.
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use tc_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> tc_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffprobe"))
///     .arg("-v").arg("quiet")
///     .arg("-print_format").arg("json")
///     .arg("-show_format")
///     .arg("/path/to/track.mp3")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    current_dir: Option<PathBuf>,
    inherit_stdout: bool,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            current_dir: None,
            inherit_stdout: false,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time for [`ToolCommand::execute`].
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Run the process from the given working directory.
    pub fn current_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Forward the process's stdout to ours in monitored mode.
    pub fn inherit_stdout(&mut self) -> &mut Self {
        self.inherit_stdout = true;
        self
    }

    /// The arguments collected so far.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Short program name for error messages.
    pub fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Render the full command line for logging.
    pub fn display(&self) -> String {
        let mut line = self.program.to_string_lossy().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(ref dir) = self.current_dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());
        cmd.kill_on_drop(true);
        cmd
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - Returns [`tc_core::Error::Tool`] if the process times out (message
    ///   includes the timeout duration).
    /// - Returns [`tc_core::Error::Tool`] if the process exits with a non-zero
    ///   status (message includes stderr).
    /// - Returns [`tc_core::Error::Tool`] if spawning the process fails.
    pub async fn execute(&self) -> Result<ToolOutput> {
        let program_name = self.program_name();

        let mut cmd = self.command();
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        let child = cmd
            .spawn()
            .map_err(|e| Error::tool(program_name.clone(), format!("failed to spawn: {e}")))?;

        // The child is killed if the timeout drops the wait future.
        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(output)) => {
                let tool_output = ToolOutput {
                    status: output.status,
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                if !output.status.success() {
                    return Err(Error::tool(
                        program_name,
                        format!(
                            "exited with status {}: {}",
                            output.status,
                            tool_output.stderr.trim()
                        ),
                    ));
                }

                Ok(tool_output)
            }
            Ok(Err(e)) => Err(Error::tool(
                program_name,
                format!("I/O error waiting for process: {e}"),
            )),
            Err(_elapsed) => Err(Error::tool(
                program_name,
                format!("timed out after {:?}", self.timeout),
            )),
        }
    }

    /// Execute the command while a [`ProgressMonitor`] consumes its stderr.
    ///
    /// The monitor runs as its own task for the lifetime of the process.
    /// Unlike [`ToolCommand::execute`] a non-zero exit is not an error here:
    /// the caller inspects `status` and decides how to report the buffered
    /// diagnostics in `stderr`. No timeout applies.
    pub async fn execute_with_stderr_monitor(&self, monitor: ProgressMonitor) -> Result<ToolOutput> {
        let program_name = self.program_name();

        let mut cmd = self.command();
        cmd.stdout(if self.inherit_stdout {
            Stdio::inherit()
        } else {
            Stdio::null()
        });
        cmd.stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .map_err(|e| Error::tool(program_name.clone(), format!("failed to spawn: {e}")))?;

        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::tool(program_name.clone(), "stderr was not captured"))?;
        let reader = tokio::spawn(monitor.consume(stderr));

        let status = child.wait().await.map_err(|e| {
            Error::tool(program_name.clone(), format!("I/O error waiting for process: {e}"))
        })?;

        let diagnostics = reader.await.map_err(|e| {
            Error::tool(program_name.clone(), format!("stderr reader failed: {e}"))
        })?;

        Ok(ToolOutput {
            status,
            stdout: String::new(),
            stderr: String::from_utf8_lossy(&diagnostics).to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn execute_echo() {
        // `echo` should be universally available.
        let output = ToolCommand::new(PathBuf::from("echo"))
            .arg("hello")
            .execute()
            .await;

        match output {
            Ok(out) => {
                assert!(out.status.success());
                assert!(out.stdout.trim().contains("hello"));
            }
            Err(_) => {
                // On some minimal environments echo may not exist; skip.
            }
        }
    }

    #[tokio::test]
    async fn execute_nonexistent_tool() {
        let result = ToolCommand::new(PathBuf::from("nonexistent_tool_xyz_12345"))
            .execute()
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("failed to spawn"), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn timeout_fires() {
        let result = ToolCommand::new(PathBuf::from("sleep"))
            .arg("10")
            .timeout(Duration::from_millis(100))
            .execute()
            .await;
        let err = result.unwrap_err().to_string();
        assert!(err.contains("timed out"), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_reports_stderr() {
        let err = ToolCommand::new(PathBuf::from("sh"))
            .args(["-c", "echo broken >&2; exit 2"])
            .execute()
            .await
            .unwrap_err()
            .to_string();
        assert!(err.contains("broken"), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn monitored_execution_buffers_stderr_and_tracks_progress() {
        let monitor = ProgressMonitor::new(10_000);
        let handle = monitor.handle();

        let output = ToolCommand::new(PathBuf::from("sh"))
            .args([
                "-c",
                "printf 'size=1kB time=00:00:02.50 bitrate=1k\\r' >&2; \
                 printf 'size=2kB time=00:00:05.00 bitrate=1k\\n' >&2; \
                 echo 'fatal: disk full' >&2; exit 3",
            ])
            .execute_with_stderr_monitor(monitor)
            .await
            .unwrap();

        assert!(!output.status.success());
        assert!(output.stderr.contains("fatal: disk full"));
        assert!(output.stderr.contains("time=00:00:02.50"));
        assert_eq!(handle.elapsed_ms(), 5_000);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn monitored_execution_respects_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let output = ToolCommand::new(PathBuf::from("sh"))
            .args(["-c", "pwd >&2"])
            .current_dir(dir.path())
            .execute_with_stderr_monitor(ProgressMonitor::new(0))
            .await
            .unwrap();
        assert!(output.status.success());
        let reported = PathBuf::from(output.stderr.trim());
        assert_eq!(
            reported.canonicalize().unwrap(),
            dir.path().canonicalize().unwrap()
        );
    }

    #[test]
    fn display_joins_program_and_args() {
        let mut cmd = ToolCommand::new(PathBuf::from("/usr/bin/ffmpeg"));
        cmd.args(["-hide_banner", "-y"]);
        assert_eq!(cmd.display(), "/usr/bin/ffmpeg -hide_banner -y");
        assert_eq!(cmd.program_name(), "ffmpeg");
        assert_eq!(cmd.get_args(), ["-hide_banner", "-y"]);
    }
}

//! The merge pipeline.
//!
//! A run moves through the stages of [`Stage`] strictly in order:
//! discovery, probing, aggregation, output resolution, and building the
//! encoder plan happen in [`Pipeline::prepare`]; the encode itself happens
//! in [`Pipeline::execute`]. Any error moves the pipeline to
//! [`Stage::Failed`] and is returned unchanged.

use std::fmt;

use tc_av::{EncodePlan, Prober, ProgressMonitor, ToolRegistry};
use tc_core::{format_millis, Config, Error, FileDescriptor, OutputTarget, Result};

use crate::aggregate::aggregate;
use crate::collector::PathCollector;
use crate::output::resolve_output;

/// Pipeline progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Collecting,
    Probing,
    Aggregating,
    Resolving,
    Building,
    Executing,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::Collecting => "collecting",
            Stage::Probing => "probing",
            Stage::Aggregating => "aggregating",
            Stage::Resolving => "resolving",
            Stage::Building => "building",
            Stage::Executing => "executing",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Everything decided before the encoder starts.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    /// Probed inputs in encode order.
    pub files: Vec<FileDescriptor>,
    pub output: OutputTarget,
    pub plan: EncodePlan,
}

/// Drives one merge run.
pub struct Pipeline<'a> {
    config: &'a Config,
    prober: &'a dyn Prober,
    stage: Stage,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, prober: &'a dyn Prober) -> Self {
        Self {
            config,
            prober,
            stage: Stage::Idle,
        }
    }

    /// The current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn advance(&mut self, next: Stage) {
        tracing::debug!("pipeline: {} -> {}", self.stage, next);
        self.stage = next;
    }

    fn fail(&mut self, err: Error) -> Error {
        tracing::error!(stage = %self.stage, kind = err.kind(), "pipeline failed: {err}");
        self.stage = Stage::Failed;
        err
    }

    /// Collect, probe, aggregate, resolve the output and build the encoder
    /// plan.
    pub async fn prepare(&mut self) -> Result<PreparedRun> {
        match self.prepare_stages().await {
            Ok(run) => Ok(run),
            Err(e) => Err(self.fail(e)),
        }
    }

    async fn prepare_stages(&mut self) -> Result<PreparedRun> {
        self.advance(Stage::Collecting);
        let files = PathCollector::collect(&self.config.inputs)?;

        self.advance(Stage::Probing);
        let mut probed = Vec::with_capacity(files.len());
        for file in files {
            tracing::debug!(prober = self.prober.name(), "probe {}", file.path.display());
            let report = self.prober.probe(&file.path).await?;
            probed.push(file.with_probe(report));
        }

        self.advance(Stage::Aggregating);
        let metadata = aggregate(&probed, self.config.max_bitrate);
        tracing::info!(
            "Input '{}' by '{}' (#{} tracks, {} total, bitrate {} -> {}k)",
            metadata.title,
            metadata.author,
            probed.len(),
            format_millis(metadata.total_duration_ms),
            metadata
                .source_bitrate_kbps
                .map_or_else(|| "unknown".to_string(), |k| format!("{k}k")),
            metadata.bitrate_kbps,
        );
        for (i, chapter) in metadata.chapters.iter().enumerate() {
            tracing::info!(
                "[#{:3}] {} ({})",
                i + 1,
                chapter.title,
                format_millis(chapter.end_ms - chapter.start_ms)
            );
        }

        self.advance(Stage::Resolving);
        let output = resolve_output(self.config, &probed, &metadata)?;
        tracing::info!("Output to '{output}'");

        self.advance(Stage::Building);
        let plan = EncodePlan::new(self.config, &probed, metadata, &output)?;
        tracing::info!(
            "Input files #{} under '{}'",
            plan.inputs().len(),
            plan.mount().dir().display()
        );

        Ok(PreparedRun {
            files: probed,
            output,
            plan,
        })
    }

    /// Run the encoder for a prepared run.
    ///
    /// `monitor` receives the encoder's diagnostic stream; keep a handle to
    /// it to display progress.
    pub async fn execute(
        &mut self,
        run: &PreparedRun,
        tools: &ToolRegistry,
        monitor: ProgressMonitor,
    ) -> Result<()> {
        self.advance(Stage::Executing);
        match run.plan.execute(tools, monitor).await {
            Ok(()) => {
                self.advance(Stage::Done);
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_names() {
        assert_eq!(Stage::Collecting.to_string(), "collecting");
        assert_eq!(Stage::Failed.to_string(), "failed");
    }
}

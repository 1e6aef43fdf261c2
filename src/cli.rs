use clap::Parser;
use std::path::PathBuf;
use tc_core::config::ConcatMode;
use tc_core::Config;

#[derive(Parser)]
#[command(name = "tomecat")]
#[command(author, version, about = "Merge audio files into a single chaptered audiobook")]
pub struct Cli {
    /// Audio files or directories to merge
    pub inputs: Vec<PathBuf>,

    /// Output file; "stdout" pipes the encoded stream
    #[arg(short, long)]
    pub output: Option<String>,

    /// Container format used when writing to stdout
    #[arg(long)]
    pub output_format: Option<String>,

    /// Extension for automatically named output files
    #[arg(long)]
    pub output_type: Option<String>,

    /// Maximum output bitrate in kbit/s
    #[arg(long)]
    pub max_bitrate: Option<u32>,

    /// Write ID3v2.3 and ID3v1 tags for older players
    #[arg(long)]
    pub windows: bool,

    /// Run ffmpeg and ffprobe through docker
    #[arg(long)]
    pub docker: bool,

    /// Docker image providing ffmpeg and ffprobe
    #[arg(long)]
    pub image: Option<String>,

    /// Feed inputs through a concat file list instead of the concat protocol
    #[arg(long)]
    pub concat_list: bool,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Show what would be done without encoding
    #[arg(long)]
    pub dry_run: bool,
}

impl Cli {
    /// Override `config` with the flags given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if !self.inputs.is_empty() {
            config.inputs = self.inputs.clone();
        }
        if let Some(ref output) = self.output {
            config.output = output.clone();
        }
        if let Some(ref format) = self.output_format {
            config.output_format = format.clone();
        }
        if let Some(ref output_type) = self.output_type {
            config.output_type = output_type.clone();
        }
        if let Some(bitrate) = self.max_bitrate {
            config.max_bitrate = bitrate;
        }
        if let Some(ref image) = self.image {
            config.sandbox_image = image.clone();
        }
        if self.concat_list {
            config.encoder.concat = ConcatMode::List;
        }
        config.legacy_id3 |= self.windows;
        config.sandbox |= self.docker;
        config.debug |= self.verbose;
    }
}

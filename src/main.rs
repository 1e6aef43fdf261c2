mod cli;
mod display;

use tomecat::config;
use tomecat::pipeline::{Pipeline, PreparedRun};

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use tc_av::{FfprobeProber, ProgressMonitor, ToolRegistry};
use tc_core::format_millis;

async fn run(cli: Cli) -> Result<()> {
    let mut config = config::load_config_or_default(cli.config.as_deref())?;
    cli.apply(&mut config);

    for warning in config.validate() {
        tracing::warn!("config: {warning}");
    }

    let tools = ToolRegistry::discover(&config);
    let prober = FfprobeProber::new(tools.clone());
    let mut pipeline = Pipeline::new(&config, &prober);

    let prepared = pipeline.prepare().await?;

    if cli.dry_run {
        print_plan(&prepared);
        println!("\n[DRY RUN] Nothing encoded");
        return Ok(());
    }

    let total_ms = prepared.plan.metadata().total_duration_ms;
    let monitor = ProgressMonitor::new(total_ms);
    let handle = monitor.handle();
    let bar = display::encode_bar(total_ms);
    let ticker = display::spawn(handle.clone(), bar.clone());

    let result = pipeline.execute(&prepared, &tools, monitor).await;
    ticker.abort();

    match result {
        Ok(()) => {
            bar.finish_and_clear();
            tracing::info!(
                "Wrote {} ({} encoded)",
                prepared.output,
                format_millis(handle.elapsed_ms())
            );
            Ok(())
        }
        Err(e) => {
            bar.abandon();
            Err(e).with_context(|| format!("Failed to encode {}", prepared.output))
        }
    }
}

fn print_plan(prepared: &PreparedRun) {
    let metadata = prepared.plan.metadata();
    println!("Title: {}", metadata.title);
    println!("Author: {}", metadata.author);
    println!("Duration: {}", format_millis(metadata.total_duration_ms));
    println!("Bitrate: {}k", metadata.bitrate_kbps);

    println!("\nChapters: {}", metadata.chapters.len());
    for (i, (chapter, file)) in metadata.chapters.iter().zip(&prepared.files).enumerate() {
        println!(
            "  [{:3}] {} - {}  {}",
            i + 1,
            format_millis(chapter.start_ms),
            format_millis(chapter.end_ms),
            chapter.title
        );
        println!("        {}", file.path.display());
    }

    println!("\nOutput: {}", prepared.output);
    println!("Mount: {}", prepared.plan.mount().dir().display());
    println!("Command: ffmpeg {}", prepared.plan.preview_args().join(" "));
    println!("\n{}", prepared.plan.metadata_text().trim_end());
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "tomecat=debug,tc_av=debug,tc_core=debug".to_string()
        } else {
            "tomecat=info,tc_av=info,tc_core=info".to_string()
        }
    });

    // stdout may carry the encoded stream, so logs always go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(cli))
}

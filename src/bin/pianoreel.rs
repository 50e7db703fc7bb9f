use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pianoreel", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Precompute the smoke dot cache.
    Cache(CacheArgs),
    /// Render the video (MP4 requires `ffmpeg` on PATH).
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct Inputs {
    /// Render settings JSON.
    #[arg(long)]
    settings: PathBuf,

    /// Note events JSON (`[[note, start, end], ...]`).
    #[arg(long)]
    notes: PathBuf,
}

#[derive(Parser, Debug)]
struct CacheArgs {
    #[command(flatten)]
    inputs: Inputs,

    /// Cache directory.
    #[arg(long, default_value = "cache/smoke.dots")]
    cache_dir: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    inputs: Inputs,

    /// Output MP4 path.
    #[arg(long, conflicts_with = "png_dir", required_unless_present = "png_dir")]
    out: Option<PathBuf>,

    /// Write a PNG sequence into this directory instead of an MP4.
    #[arg(long)]
    png_dir: Option<PathBuf>,

    /// Cache directory for smoke dots.
    #[arg(long, default_value = "cache/smoke.dots")]
    cache_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Cache(args) => cmd_cache(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn load_inputs(
    inputs: &Inputs,
) -> anyhow::Result<(pianoreel::RenderSettings, pianoreel::NoteList)> {
    let settings = pianoreel::RenderSettings::from_path(&inputs.settings)
        .with_context(|| format!("load settings '{}'", inputs.settings.display()))?;
    let notes = pianoreel::NoteList::from_path(&inputs.notes)
        .with_context(|| format!("load notes '{}'", inputs.notes.display()))?;
    Ok((settings, notes))
}

fn cmd_cache(args: CacheArgs) -> anyhow::Result<()> {
    let (settings, notes) = load_inputs(&args.inputs)?;
    let mut progress = pianoreel::TracingProgress::new("caching smoke dots");
    match pianoreel::cache::build(&settings, &notes, &args.cache_dir, &mut progress)? {
        Some(summary) => eprintln!(
            "cached {} notes ({} dots) in {}",
            summary.events,
            summary.dots,
            summary.dir.display()
        ),
        None => eprintln!("smoke dots are disabled, nothing to cache"),
    }
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let (settings, notes) = load_inputs(&args.inputs)?;

    let mut progress = pianoreel::TracingProgress::new("caching smoke dots");
    let smoke_cache =
        pianoreel::cache::build(&settings, &notes, &args.cache_dir, &mut progress)?
            .map(|summary| pianoreel::DotCache::open(summary.dir))
            .transpose()?;

    let timeline = pianoreel::Timeline::from_notes(&settings, &notes)?;
    let mut ctx = pianoreel::RenderContext::new(Arc::new(settings), timeline)?;
    pianoreel::register_builtin(&mut ctx, &notes, smoke_cache.as_ref())?;

    let mut progress = pianoreel::TracingProgress::new("rendering video");
    match (args.out, args.png_dir) {
        (_, Some(dir)) => {
            let mut sink = pianoreel::PngSequenceSink::new(&dir);
            pianoreel::export(&mut ctx, &mut sink, &mut progress)?;
            eprintln!("wrote {} png frames to {}", sink.written(), dir.display());
        }
        (Some(out), None) => {
            let mut sink = pianoreel::FfmpegSink::new(pianoreel::FfmpegSinkOpts::new(&out));
            let stats = pianoreel::export(&mut ctx, &mut sink, &mut progress)?;
            eprintln!("wrote {} frames to {}", stats.frames_written, out.display());
        }
        (None, None) => anyhow::bail!("either --out or --png-dir is required"),
    }
    Ok(())
}

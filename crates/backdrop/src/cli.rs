use std::path::PathBuf;

use clap::{Parser, Subcommand};
use renderer::PainterBackend;

#[derive(Parser, Debug)]
#[command(
    name = "backdrop",
    author,
    version,
    about = "Animated procedural background engine",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Scene to render (`drift`, `plasma`, or `halftone`).
    #[arg(value_name = "SCENE")]
    pub scene: Option<String>,

    /// Configuration file; defaults to the per-user config directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Window size in logical pixels (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap (0 = render every refresh).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Field evaluation backend: `cpu` or `gpu`.
    #[arg(long, value_name = "BACKEND", value_parser = parse_backend)]
    pub backend: Option<PainterBackend>,

    /// Seed for blob placement in the drift scene.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Replay the first-run entrance fade even if it has already played.
    #[arg(long)]
    pub replay_intro: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List available scenes and their default backends.
    Scenes,
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width: u32 = width
        .trim()
        .parse()
        .map_err(|_| format!("invalid width in '{value}'"))?;
    let height: u32 = height
        .trim()
        .parse()
        .map_err(|_| format!("invalid height in '{value}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("size must be non-zero, got '{value}'"));
    }
    Ok((width, height))
}

fn parse_backend(value: &str) -> Result<PainterBackend, String> {
    match value.to_lowercase().as_str() {
        "cpu" => Ok(PainterBackend::Cpu),
        "gpu" => Ok(PainterBackend::Gpu),
        other => Err(format!("unknown backend '{other}' (expected cpu or gpu)")),
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}

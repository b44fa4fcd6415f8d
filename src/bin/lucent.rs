use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lucent", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite a foreground over a background and write a PNG.
    Overlay(OverlayArgs),
    /// Print size, bit depth and color space of an image.
    Info(InfoArgs),
}

#[derive(Parser, Debug)]
struct OverlayArgs {
    /// Foreground image with alpha.
    #[arg(long)]
    foreground: PathBuf,

    /// Background image.
    #[arg(long)]
    background: PathBuf,

    /// Displacement map; its red/green channels select background coordinates.
    #[arg(long)]
    map: Option<PathBuf>,

    /// Blur mask; luminance drives the per-pixel background blur.
    #[arg(long)]
    blur: Option<PathBuf>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct InfoArgs {
    /// Image to inspect.
    image: PathBuf,
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
        Command::Overlay(args) => cmd_overlay(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn cmd_overlay(args: OverlayArgs) -> anyhow::Result<()> {
    let cfg = match &args.config {
        Some(path) => lucent::LucentConfig::from_path(path)?,
        None => lucent::LucentConfig::default(),
    };
    let ctx = lucent::RenderContext::from_config(&cfg).context("create render context")?;
    tracing::info!(adapter = %ctx.adapter_info().name, "using gpu adapter");

    let open = |path: &PathBuf| lucent::SourceImage::open(path);
    let foreground = open(&args.foreground)?;
    let background = open(&args.background)?;
    let map = args.map.as_ref().map(open).transpose()?;
    let blur = args.blur.as_ref().map(open).transpose()?;

    let out = lucent::try_render_overlay(&ctx, foreground, background, map, blur)
        .context("composite overlay")?;
    out.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let image = lucent::SourceImage::open(&args.image)?;
    let bit_depth = image
        .bit_depth()
        .map(|b| b.to_string())
        .unwrap_or_else(|e| format!("unsupported ({e})"));
    println!("path:        {}", args.image.display());
    println!("size:        {}", image.size());
    println!("bits/comp:   {}", image.bits_per_component());
    println!("bit depth:   {bit_depth}");
    println!("color space: {}", image.color_space_id());
    Ok(())
}

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use anaglyph::{FilterPreset, PlayerOpts};

#[derive(Parser, Debug)]
#[command(name = "anaglyph", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a side-by-side still image to an anaglyph PNG.
    Convert(ConvertArgs),
    /// Convert the frame at a timestamp of a side-by-side video (requires `ffmpeg` on PATH).
    Snapshot(SnapshotArgs),
    /// Play a side-by-side video as anaglyph in a window (requires `ffmpeg` on PATH).
    Play(PlayArgs),
    /// List the built-in filter presets.
    Presets,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input side-by-side image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Filter preset.
    #[arg(long, default_value_t = FilterPreset::RedCyan)]
    preset: FilterPreset,
}

#[derive(Parser, Debug)]
struct SnapshotArgs {
    /// Input side-by-side video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Timestamp in seconds.
    #[arg(long, default_value_t = 0.0)]
    at: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Filter preset.
    #[arg(long, default_value_t = FilterPreset::RedCyan)]
    preset: FilterPreset,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input side-by-side video.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Player options JSON; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Filter preset selected at startup.
    #[arg(long)]
    preset: Option<FilterPreset>,

    /// Compose frames on the rayon pool.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Open paused instead of starting playback.
    #[arg(long, default_value_t = false)]
    paused: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::Play(args) => cmd_play(args),
        Command::Presets => cmd_presets(),
    }
}

fn save_png(out: &Path, frame: &image::RgbaImage) -> anyhow::Result<()> {
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        out,
        frame.as_raw(),
        frame.width(),
        frame.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let sbs = image::open(&args.in_path)
        .with_context(|| format!("open image '{}'", args.in_path.display()))?
        .to_rgba8();
    let frame = anaglyph::convert_still(sbs, args.preset, &PlayerOpts::default())?;
    save_png(&args.out, &frame)
}

#[cfg(feature = "media-ffmpeg")]
fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let mut stream = anaglyph::FfmpegStream::open(&args.in_path)?;
    let duration = stream.info().duration_sec;
    if !(args.at >= 0.0 && (duration <= 0.0 || args.at <= duration)) {
        anyhow::bail!(
            "--at {}s is outside '{}' (duration {duration:.3}s)",
            args.at,
            args.in_path.display()
        );
    }
    let sbs = stream
        .frame_at(args.at)
        .with_context(|| format!("decode frame at {}s", args.at))?;
    let frame = anaglyph::convert_still(sbs, args.preset, &PlayerOpts::default())?;
    save_png(&args.out, &frame)
}

#[cfg(not(feature = "media-ffmpeg"))]
fn cmd_snapshot(_args: SnapshotArgs) -> anyhow::Result<()> {
    anyhow::bail!("video input requires the 'media-ffmpeg' feature")
}

fn play_opts(args: &PlayArgs) -> anyhow::Result<PlayerOpts> {
    let mut opts = match &args.config {
        Some(path) => PlayerOpts::from_path(path)?,
        None => PlayerOpts::default(),
    };
    if let Some(preset) = args.preset {
        opts.preset = preset;
    }
    opts.parallel |= args.parallel;
    opts.autoplay = !args.paused;
    Ok(opts)
}

#[cfg(all(feature = "media-ffmpeg", feature = "window"))]
fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let opts = play_opts(&args)?;
    let stream = anaglyph::FfmpegStream::open(&args.in_path)?;
    let player = anaglyph::Player::new(stream, &opts);
    anaglyph::run_window(player)?;
    Ok(())
}

#[cfg(not(all(feature = "media-ffmpeg", feature = "window")))]
fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    play_opts(&args)?;
    anyhow::bail!("live playback requires the 'media-ffmpeg' and 'window' features")
}

fn cmd_presets() -> anyhow::Result<()> {
    println!("{:<14} {:<14} {:<10} {:<10}", "id", "name", "left", "right");
    for preset in FilterPreset::ALL {
        let m = preset.masks();
        println!(
            "{:<14} {:<14} {:<10} {:<10}",
            preset.id(),
            preset.label(),
            format!("{:?}", m.left),
            format!("{:?}", m.right)
        );
    }
    Ok(())
}

use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "kaleido", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Turn the painting in a PNG into a radial pattern.
    Apply(ApplyArgs),
    /// Write guide geometry for a canvas size as JSON.
    Guides(GuidesArgs),
}

#[derive(Parser, Debug)]
struct ApplyArgs {
    /// Input PNG, loaded as the source layer.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output PNG path (flattened document).
    #[arg(long)]
    out: PathBuf,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of sectors; the base wedge becomes one step clockwise from 180°.
    #[arg(long)]
    fold_count: Option<u32>,

    /// Override the fold policy.
    #[arg(long, value_enum)]
    policy: Option<PolicyChoice>,

    /// Add a ring to the guides.
    #[arg(long)]
    ring: bool,

    /// Also write the guide overlay as JSON.
    #[arg(long)]
    overlay_out: Option<PathBuf>,

    /// Snapshot the input document to this directory before running.
    #[arg(long)]
    backup_dir: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct GuidesArgs {
    /// Canvas width in pixels.
    #[arg(long)]
    width: u32,

    /// Canvas height in pixels.
    #[arg(long)]
    height: u32,

    /// Engine configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Add a ring to the guides.
    #[arg(long)]
    ring: bool,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyChoice {
    Tolerant,
    Strict,
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
        Command::Apply(args) => cmd_apply(args),
        Command::Guides(args) => cmd_guides(args),
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<kaleido::SymmetryConfig> {
    match path {
        Some(p) => Ok(kaleido::SymmetryConfig::from_path(p)?),
        None => Ok(kaleido::SymmetryConfig::default()),
    }
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    Ok(())
}

fn write_overlay(path: &Path, overlay: &kaleido::GuideOverlay) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let f = File::create(path).with_context(|| format!("create '{}'", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(f), overlay)
        .with_context(|| format!("write overlay JSON '{}'", path.display()))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn cmd_apply(args: ApplyArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(n) = args.fold_count {
        anyhow::ensure!(n >= 2, "--fold-count must be at least 2");
        let step = 360.0 / f64::from(n);
        cfg.fold_count = n;
        cfg.base_wedge = kaleido::WedgeSpec::new(180.0, 180.0 - step)?;
    }
    if let Some(p) = args.policy {
        cfg.fold_policy = match p {
            PolicyChoice::Tolerant => kaleido::FoldPolicy::Tolerant,
            PolicyChoice::Strict => kaleido::FoldPolicy::Strict,
        };
    }
    cfg.ring_enabled |= args.ring;
    let engine = kaleido::Symmetry::new(cfg)?;

    let img = image::open(&args.in_path)
        .with_context(|| format!("open png '{}'", args.in_path.display()))?
        .to_rgba8();
    let canvas = kaleido::Canvas::new(img.width(), img.height())?;
    let doc_name = args
        .in_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string());
    let mut doc = kaleido::Document::new(doc_name, canvas)?;
    doc.push_layer(kaleido::Layer::from_rgba_image(
        engine.config().source_layer.as_str(),
        &img,
    )?)?;

    let mut workspace = kaleido::Workspace::with_document(doc);
    if let Some(dir) = &args.backup_dir {
        workspace.snapshot(&mut kaleido::PngBackup::new(dir))?;
    }

    let report = engine.run(&mut workspace)?;
    if let kaleido::RunOutcome::NothingToExpand(reason) = report.outcome {
        eprintln!("nothing to expand ({reason:?}); writing the document unchanged");
    }

    let doc = workspace.document()?;
    let img = doc.flatten()?.to_rgba_image()?;
    ensure_parent(&args.out)?;
    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;
    eprintln!("wrote {}", args.out.display());

    if let Some(path) = &args.overlay_out {
        match doc.overlay() {
            Some(overlay) => write_overlay(path, overlay)?,
            None => eprintln!("no overlay to write; enable show_overlay"),
        }
    }
    Ok(())
}

fn cmd_guides(args: GuidesArgs) -> anyhow::Result<()> {
    let mut cfg = load_config(args.config.as_deref())?;
    cfg.ring_enabled |= args.ring;
    cfg.validate()?;
    let canvas = kaleido::Canvas::new(args.width, args.height)?;
    let overlay = kaleido::build_overlay(&canvas, &cfg.overlay_options(), &cfg.overlay_name);
    write_overlay(&args.out, &overlay)
}

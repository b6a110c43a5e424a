use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "jigsaw", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Cut a puzzle and print its pieces.
    Layout(LayoutArgs),
    /// Render the board to a PNG.
    Render(RenderArgs),
    /// Solve a scattered puzzle with synthetic pointer events.
    Autoplay(AutoplayArgs),
    /// Print a score payload as a table.
    Scores(ScoresArgs),
}

#[derive(Args, Debug)]
struct SessionArgs {
    /// easy | medium | hard | insane (overrides the config file).
    #[arg(long)]
    difficulty: Option<jigsaw::Difficulty>,

    /// Viewport size, WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x720")]
    canvas: jigsaw::Canvas,

    /// Session options JSON (difficulty, scaler, seed).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct LayoutArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Video frame size the board is fitted to, WIDTHxHEIGHT.
    #[arg(long, default_value = "640x480")]
    video: jigsaw::Canvas,

    /// Scatter the pieces before printing.
    #[arg(long)]
    scatter: bool,

    /// Print JSON instead of one line per piece.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Image standing in for the camera; pieces are filled with their colour tags without it.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Video frame size used when no image is given, WIDTHxHEIGHT.
    #[arg(long, default_value = "640x480")]
    video: jigsaw::Canvas,

    /// Scatter the pieces before rendering.
    #[arg(long)]
    scatter: bool,
}

#[derive(Args, Debug)]
struct AutoplayArgs {
    #[command(flatten)]
    session: SessionArgs,

    /// Video frame size the board is fitted to, WIDTHxHEIGHT.
    #[arg(long, default_value = "640x480")]
    video: jigsaw::Canvas,

    /// Simulated milliseconds between pointer events.
    #[arg(long, default_value_t = 250)]
    step_ms: u64,
}

#[derive(Args, Debug)]
struct ScoresArgs {
    /// Score payload JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Layout(args) => cmd_layout(args),
        Command::Render(args) => cmd_render(args),
        Command::Autoplay(args) => cmd_autoplay(args),
        Command::Scores(args) => cmd_scores(args),
    }
}

fn read_opts_json(path: &Path) -> anyhow::Result<jigsaw::SessionOpts> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    let opts = jigsaw::SessionOpts::from_json(&text)
        .with_context(|| format!("parse config '{}'", path.display()))?;
    Ok(opts)
}

fn session_opts(args: &SessionArgs) -> anyhow::Result<jigsaw::SessionOpts> {
    let mut opts = match &args.config {
        Some(path) => read_opts_json(path)?,
        None => jigsaw::SessionOpts::default(),
    };
    if let Some(difficulty) = args.difficulty {
        opts.difficulty = difficulty;
    }
    if let Ok(seed) = std::env::var("JIGSAW_SEED") {
        opts.seed = seed
            .trim()
            .parse()
            .with_context(|| format!("parse JIGSAW_SEED '{seed}'"))?;
    }
    Ok(opts)
}

fn blank_video(size: jigsaw::Canvas) -> anyhow::Result<jigsaw::StillImageSource> {
    let frame = jigsaw::VideoFrame::solid(size.width(), size.height(), [0, 0, 0, 255])?;
    Ok(jigsaw::StillImageSource::from_frame(frame))
}

fn cmd_layout(args: LayoutArgs) -> anyhow::Result<()> {
    let opts = session_opts(&args.session)?;
    let video = blank_video(args.video)?;
    let mut session = jigsaw::Session::new(
        opts,
        args.session.canvas.size(),
        &video,
        jigsaw::NullSounds,
    )?;
    if args.scatter {
        session.restart(0);
    }

    let pieces = session.board().pieces();
    if args.json {
        let json = serde_json::to_string_pretty(pieces).context("serialize pieces")?;
        println!("{json}");
        return Ok(());
    }

    for p in pieces {
        println!(
            "{} correct=({:.1},{:.1}) current=({:.1},{:.1}) size={:.1}x{:.1} edges=[{} {} {} {}]",
            p.id,
            p.correct.x,
            p.correct.y,
            p.current.x,
            p.current.y,
            p.width(),
            p.height(),
            fmt_tab(p.edges.top),
            fmt_tab(p.edges.right),
            fmt_tab(p.edges.bottom),
            fmt_tab(p.edges.left),
        );
    }
    Ok(())
}

fn fmt_tab(tab: Option<jigsaw::Tab>) -> String {
    match tab {
        Some(t) => format!("{:+.3}", t.value()),
        None => "flat".to_string(),
    }
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let opts = session_opts(&args.session)?;
    let (video, source) = match &args.image {
        Some(path) => (
            jigsaw::StillImageSource::from_path(path)?,
            jigsaw::RenderSource::CameraFill,
        ),
        None => (blank_video(args.video)?, jigsaw::RenderSource::SolidFill),
    };

    let mut session = jigsaw::Session::new(
        opts,
        args.session.canvas.size(),
        &video,
        jigsaw::NullSounds,
    )?;
    if args.scatter {
        session.restart(0);
    }

    let settings = jigsaw::RenderSettings {
        clear_rgba: Some([18, 20, 28, 255]),
    };
    let mut renderer = jigsaw::CpuRenderer::new(settings);
    let frame = renderer.render(
        session.board(),
        args.session.canvas,
        source,
        Some(jigsaw::VideoSource::frame(&video)?),
    )?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame.save_png(&args.out)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_autoplay(args: AutoplayArgs) -> anyhow::Result<()> {
    use jigsaw::{Outcome, PointerEvent};

    let opts = session_opts(&args.session)?;
    let canvas = args.session.canvas.size();
    let video = blank_video(args.video)?;
    let mut session = jigsaw::Session::new(
        opts,
        canvas,
        &video,
        jigsaw::RecordingSounds::default(),
    )?;

    let mut now = 0u64;
    session.restart(now);

    // Park every piece off the right edge of the canvas, topmost first, so nothing covers the
    // pieces still waiting underneath.
    let count = session.board().len();
    let piece_size = session.board().config().piece_size();
    for k in 0..count {
        let piece = &session.board().pieces()[count - 1 - k];
        let id = piece.id;
        let grab = piece.bounds().center();
        let offset = grab - piece.current;
        let parked = jigsaw::Point::new(
            canvas.width + piece_size.width * (1.5 * k as f64 + 1.0),
            piece_size.height,
        );
        now += args.step_ms;
        expect_outcome(
            session.handle(PointerEvent::Down(grab), now, None),
            Outcome::PickedUp(id),
        )?;
        session.handle(PointerEvent::Move(parked + offset), now, None);
        session.handle(PointerEvent::Up, now, None);
    }

    // Then carry each one home.
    let mut completed = None;
    for id in session.board().z_order() {
        let piece = session
            .board()
            .piece(id)
            .context("piece vanished from the board")?;
        let grab = piece.bounds().center();
        let home = piece.correct + (grab - piece.current);
        now += args.step_ms;
        expect_outcome(
            session.handle(PointerEvent::Down(grab), now, None),
            Outcome::PickedUp(id),
        )?;
        session.handle(PointerEvent::Move(home), now, None);
        if let Outcome::Completed { elapsed_ms, .. } = session.handle(PointerEvent::Up, now, None)
        {
            completed = Some(elapsed_ms);
        }
    }

    let elapsed_ms = completed.context("autoplay finished without completing the puzzle")?;
    println!(
        "solved {} pieces in {} ({} snaps, score {})",
        count,
        jigsaw::format_elapsed(elapsed_ms),
        session.sounds().snaps,
        jigsaw::score_seconds(elapsed_ms),
    );
    Ok(())
}

fn expect_outcome(got: jigsaw::Outcome, want: jigsaw::Outcome) -> anyhow::Result<()> {
    anyhow::ensure!(got == want, "expected {want:?}, got {got:?}");
    Ok(())
}

fn cmd_scores(args: ScoresArgs) -> anyhow::Result<()> {
    let backend = jigsaw::JsonFileScores {
        path: args.in_path,
    };
    let board = jigsaw::ScoreBackend::fetch(&backend)?;
    println!("{}", jigsaw::format_scores(&board));
    Ok(())
}

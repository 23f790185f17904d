use std::{
    io::{BufRead as _, IsTerminal as _, Write as _},
    path::PathBuf,
    sync::mpsc,
    time::{Duration, Instant},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use racechart::{
    Canvas, ChartStyle, ChartView, Dataset, FfmpegSink, FfmpegSinkOpts, Fps, FrameSink,
    PngSequenceSink, RaceSession, RaceSessionOpts, RankingComputer, SpeedPreset, SvgBackend,
    SvgRasterizer, TextRenderer, TransportCommand, TransportScript, format_gain, format_points,
    load_dataset, write_png,
};

#[derive(Parser, Debug)]
#[command(name = "racechart", version, about = "Animated bar chart races for league standings")]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the standings, gains and top performer of one round.
    Table(TableArgs),
    /// Render one round as a PNG.
    Frame(FrameArgs),
    /// Replay a transport script into an MP4 (requires `ffmpeg` on PATH) or a PNG sequence.
    Render(RenderArgs),
    /// Interactive playback in the terminal, driven by commands on stdin.
    Play(PlayArgs),
}

#[derive(Args, Debug)]
struct DataArg {
    /// Dataset JSON.
    #[arg(long)]
    data: PathBuf,
}

#[derive(Args, Debug)]
struct CanvasArgs {
    /// Output width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,
    /// Output height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,
    /// Extra directory of font files for chart text.
    #[arg(long)]
    fonts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TableArgs {
    #[command(flatten)]
    data: DataArg,
    /// Round index (0-based); defaults to the last round.
    #[arg(long)]
    round: Option<usize>,
    /// Print the derived chart view as JSON instead of a table.
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    data: DataArg,
    /// Round index (0-based).
    #[arg(long)]
    round: usize,
    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
    #[command(flatten)]
    canvas: CanvasArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    data: DataArg,
    /// Output MP4 path, or a directory with `--png-sequence`.
    #[arg(long)]
    out: PathBuf,
    /// Transport script JSON; defaults to pressing play at t = 0.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Output frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,
    /// Milliseconds per round.
    #[arg(long, default_value_t = 1000)]
    speed: u64,
    /// Write numbered PNG files into `--out` instead of encoding an MP4.
    #[arg(long)]
    png_sequence: bool,
    /// Fail instead of replacing an existing MP4.
    #[arg(long)]
    no_overwrite: bool,
    /// Seconds the final state stays on screen.
    #[arg(long, default_value_t = 1.5)]
    tail_hold: f64,
    /// Upper bound on the rendered duration in seconds.
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f64,
    /// Render every frame even when nothing changed.
    #[arg(long)]
    no_elision: bool,
    #[command(flatten)]
    canvas: CanvasArgs,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    #[command(flatten)]
    data: DataArg,
    /// Milliseconds per round.
    #[arg(long, default_value_t = 1000)]
    speed: u64,
    /// Redraws per second.
    #[arg(long, default_value_t = 20)]
    fps: u32,
    /// Character cells of a full bar.
    #[arg(long, default_value_t = 40)]
    bar_width: usize,
    /// Disable ANSI colors and screen clearing.
    #[arg(long)]
    no_color: bool,
    /// Start playing immediately.
    #[arg(long)]
    autoplay: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Table(args) => cmd_table(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load(data: &DataArg) -> anyhow::Result<Dataset> {
    load_dataset(&data.data).with_context(|| format!("load dataset '{}'", data.data.display()))
}

fn style_from(canvas: &CanvasArgs) -> anyhow::Result<ChartStyle> {
    let style = ChartStyle {
        canvas: Canvas::new(canvas.width, canvas.height)?,
        ..ChartStyle::default()
    };
    style.validate()?;
    Ok(style)
}

fn backend_from(canvas: &CanvasArgs, style: &ChartStyle) -> anyhow::Result<SvgBackend> {
    let rasterizer = SvgRasterizer::new(canvas.fonts.as_deref());
    if rasterizer.font_faces() == 0 {
        tracing::warn!("no fonts found; chart text will not be drawn");
    }
    Ok(SvgBackend::new(style.clone(), rasterizer)?)
}

fn seconds(v: f64, what: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(v).with_context(|| format!("invalid {what} '{v}'"))
}

fn cmd_table(args: TableArgs) -> anyhow::Result<()> {
    let dataset = load(&args.data)?;
    let round = dataset.clamp_round(args.round.unwrap_or(dataset.last_round()));
    let mut session = RaceSession::new(
        dataset,
        &ChartStyle::default(),
        RaceSessionOpts::default(),
    )?;
    session.apply(TransportCommand::Scrub { round });
    let view = session.view();

    let mut out = std::io::stdout().lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &view).context("serialize chart view")?;
        writeln!(out)?;
        return Ok(());
    }

    let ranking = RankingComputer::new(session.dataset());
    writeln!(out, "{} | {}", view.title, view.round_label)?;
    writeln!(out, "{:<4} {:<20} {:>8} {:>8}", "rank", "name", "points", "gain")?;
    for entry in &view.entries {
        let gain = ranking.delta(round as i64, &entry.name);
        writeln!(
            out,
            "{:<4} {:<20} {:>8} {:>8}",
            entry.rank,
            entry.name,
            format_points(entry.score),
            format_gain(gain)
        )?;
    }
    match &view.top_performer {
        Some(top) => writeln!(
            out,
            "Top performer: {} ({} points)",
            top.name,
            format_gain(top.delta)
        )?,
        None => writeln!(out, "Top performer: none")?,
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let dataset = load(&args.data)?;
    let style = style_from(&args.canvas)?;
    let mut backend = backend_from(&args.canvas, &style)?;
    let mut session = RaceSession::new(dataset, &style, RaceSessionOpts::default())?;

    let frame = session.render_round(args.round, &mut backend)?;
    write_png(&args.out, &frame, style.background)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let dataset = load(&args.data)?;
    let script = match &args.script {
        Some(path) => TransportScript::load(path)?,
        None => TransportScript::autoplay(),
    };
    let style = style_from(&args.canvas)?;
    let mut backend = backend_from(&args.canvas, &style)?;
    let opts = RaceSessionOpts {
        fps: Fps::new(args.fps, 1)?,
        speed_ms: args.speed,
        tail_hold: seconds(args.tail_hold, "tail hold")?,
        max_duration: seconds(args.max_seconds, "max seconds")?,
        static_frame_elision: !args.no_elision,
    };
    let mut session = RaceSession::new(dataset, &style, opts)?;

    let mut sink: Box<dyn FrameSink> = if args.png_sequence {
        Box::new(PngSequenceSink::new(&args.out, style.background))
    } else {
        Box::new(FfmpegSink::new(FfmpegSinkOpts {
            out_path: args.out.clone(),
            overwrite: !args.no_overwrite,
            bg: style.background,
        }))
    };
    let stats = session.render_script(&script, &mut backend, sink.as_mut())?;

    eprintln!(
        "wrote {} ({} frames, {} rendered)",
        args.out.display(),
        stats.frames_total,
        stats.frames_rendered
    );
    Ok(())
}

enum Input {
    Command(TransportCommand),
    Invalid(String),
    Quit,
    Eof,
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let dataset = load(&args.data)?;
    let fps = Fps::new(args.fps, 1)?;
    let opts = RaceSessionOpts {
        fps,
        speed_ms: args.speed,
        ..RaceSessionOpts::default()
    };
    let mut session = RaceSession::new(dataset, &ChartStyle::default(), opts)?;
    let ansi = !args.no_color && std::io::stdout().is_terminal();
    let renderer = TextRenderer {
        bar_cells: args.bar_width.max(1),
        ansi,
    };

    let (tx, rx) = mpsc::channel::<Input>();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let input = if matches!(line, "q" | "quit" | "exit") {
                Input::Quit
            } else {
                match line.parse::<TransportCommand>() {
                    Ok(cmd) => Input::Command(cmd),
                    Err(e) => Input::Invalid(e.to_string()),
                }
            };
            let quit = matches!(input, Input::Quit);
            if tx.send(input).is_err() || quit {
                return;
            }
        }
        let _ = tx.send(Input::Eof);
    });

    eprintln!(
        "commands: p (play/pause), r (reset), s N (scrub), {} | speed MS, q (quit)",
        SpeedPreset::ALL.map(|p| p.label().to_ascii_lowercase()).join(" | ")
    );
    if args.autoplay {
        session.apply(TransportCommand::TogglePlay);
    }

    let frame_interval = fps.frame_time(1);
    let mut screen = Screen {
        ansi,
        renderer,
        last_view: None,
        last_text: String::new(),
    };
    screen.draw(&session)?;

    let mut last = Instant::now();
    let mut eof = false;
    loop {
        let input = match rx.recv_timeout(frame_interval) {
            Ok(input) => Some(input),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Some(Input::Eof),
        };
        let now = Instant::now();
        session.advance(now - last);
        last = now;

        match input {
            Some(Input::Command(cmd)) => session.apply(cmd),
            Some(Input::Invalid(msg)) => eprintln!("{msg}"),
            Some(Input::Quit) => break,
            Some(Input::Eof) => eof = true,
            None => {}
        }
        screen.draw(&session)?;

        if eof && session.is_settled() {
            break;
        }
    }
    Ok(())
}

struct Screen {
    ansi: bool,
    renderer: TextRenderer,
    last_view: Option<ChartView>,
    last_text: String,
}

impl Screen {
    /// Redraw in place with ANSI output; otherwise print each distinct state once.
    fn draw(&mut self, session: &RaceSession) -> anyhow::Result<()> {
        let mut out = std::io::stdout().lock();
        if self.ansi {
            let text = session.render_text(&self.renderer)?;
            if text != self.last_text {
                write!(out, "\x1b[2J\x1b[H{text}")?;
                out.flush()?;
                self.last_text = text;
            }
        } else {
            let view = session.view();
            if self.last_view.as_ref() != Some(&view) {
                writeln!(out, "{}", session.render_text(&self.renderer)?)?;
                out.flush()?;
                self.last_view = Some(view);
            }
        }
        Ok(())
    }
}

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

use irisgate::{
    FixedStepScheduler, IntroOpts, IntroSession, Phase, PngSequenceSink, dolly_curve,
    fade_to_black, fov_multiplier, opening_curve, red_flash, zoom_scale,
};

#[derive(Parser, Debug)]
#[command(name = "irisgate", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the cinematic at one timestamp as a PNG.
    Frame(FrameArgs),
    /// Render the whole cinematic as a numbered PNG sequence.
    Sequence(SequenceArgs),
    /// Dump the opening and dolly progress curves as JSON samples.
    Curves(CurvesArgs),
}

#[derive(Parser, Debug)]
struct FrameArgs {
    /// Timestamp to render, in milliseconds from the first tick.
    #[arg(long, conflicts_with_all = ["phase", "raw"])]
    at_ms: Option<f64>,

    /// Force a phase and render it at `--raw` instead of a timestamp.
    #[arg(long, value_enum, requires = "raw")]
    phase: Option<PhaseChoice>,

    /// Raw phase progress in [0, 1], paired with `--phase`.
    #[arg(long, requires = "phase")]
    raw: Option<f64>,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// Tick rate used to reach the timestamp.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Logical surface width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Logical surface height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Scene seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Dust mote count.
    #[arg(long, default_value_t = 90)]
    particles: usize,
}

#[derive(Parser, Debug)]
struct SequenceArgs {
    /// Output directory for the numbered frames.
    #[arg(long)]
    out_dir: PathBuf,

    /// JSON options file; replaces the surface/seed flags when given.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hard cap on rendered frames; derived from the timeline when omitted.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Frames per second.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Logical surface width.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Logical surface height.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Device pixel ratio.
    #[arg(long, default_value_t = 1.0)]
    scale: f64,

    /// Scene seed.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Dust mote count.
    #[arg(long, default_value_t = 90)]
    particles: usize,
}

#[derive(Parser, Debug)]
struct CurvesArgs {
    /// Number of samples per curve.
    #[arg(long, default_value_t = 100)]
    samples: usize,

    /// Output JSON path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PhaseChoice {
    Opening,
    Transition,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Sequence(args) => cmd_sequence(args),
        Command::Curves(args) => cmd_curves(args),
    }
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    if !args.fps.is_finite() || args.fps <= 0.0 {
        anyhow::bail!("fps must be finite and > 0");
    }

    let opts = IntroOpts {
        width: args.width,
        height: args.height,
        device_pixel_ratio: args.scale,
        seed: args.seed,
        particle_count: args.particles,
        ..IntroOpts::default()
    };
    let mut session = IntroSession::new(opts)?;

    let tick = match (args.at_ms, args.phase, args.raw) {
        (Some(at_ms), None, None) => {
            if !at_ms.is_finite() || at_ms < 0.0 {
                anyhow::bail!("at_ms must be finite and >= 0");
            }
            // Tick through the cinematic at the requested rate so accumulator
            // state (particle drift, iris rotation) matches a played-back run.
            let mut k = 0u64;
            loop {
                let t = (k as f64 * 1000.0 / args.fps).min(at_ms);
                let tick = session.tick(t)?;
                if t >= at_ms {
                    break tick;
                }
                k += 1;
            }
        }
        (None, Some(phase), Some(raw)) => {
            if !(0.0..=1.0).contains(&raw) {
                anyhow::bail!("raw must be in [0, 1]");
            }
            match phase {
                PhaseChoice::Opening => {
                    session.set_phase(Phase::opening(), 0.0);
                    session.tick(raw * opts.opening_ms)?
                }
                PhaseChoice::Transition => {
                    // Play the opening out first so the forced dolly frame
                    // shows an open eye, as in a sequenced run.
                    session.set_phase(Phase::opening(), 0.0);
                    session.tick(opts.opening_ms)?;
                    session.set_phase(Phase::transitioning(), opts.opening_ms);
                    session.tick(opts.opening_ms + raw * opts.transition_ms)?
                }
            }
        }
        _ => anyhow::bail!("pass either --at-ms or --phase with --raw"),
    };

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    // PNG stores straight alpha; the renderer emits premultiplied pixels.
    let data = tick.frame.straight_alpha_data();
    image::save_buffer_with_format(
        &args.out,
        &data,
        tick.frame.width,
        tick.frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_sequence(args: SequenceArgs) -> anyhow::Result<()> {
    let opts: IntroOpts = match &args.config {
        Some(path) => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("open config '{}'", path.display()))?;
            serde_json::from_reader(file)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => IntroOpts {
            width: args.width,
            height: args.height,
            device_pixel_ratio: args.scale,
            seed: args.seed,
            particle_count: args.particles,
            ..IntroOpts::default()
        },
    };
    let mut session = IntroSession::new(opts)?;

    // One frame past the total duration so the completing tick is included.
    let max_frames = args
        .max_frames
        .unwrap_or_else(|| (opts.total_duration_ms() / 1000.0 * args.fps).ceil() as u64 + 1);
    let mut scheduler = FixedStepScheduler::new(args.fps, max_frames)?;
    let mut sink = PngSequenceSink::new(&args.out_dir);

    let stats = session.run(&mut scheduler, &mut sink)?;
    eprintln!(
        "wrote {} frames to {}",
        stats.frames_rendered,
        args.out_dir.display()
    );
    Ok(())
}

#[derive(serde::Serialize)]
struct CurveSample {
    raw: f64,
    value: f64,
}

#[derive(serde::Serialize)]
struct DollySample {
    raw: f64,
    value: f64,
    zoom_scale: f64,
    fov_multiplier: f64,
    red_flash: f64,
    fade_to_black: f64,
}

#[derive(serde::Serialize)]
struct CurveDump {
    opening: Vec<CurveSample>,
    dolly: Vec<DollySample>,
}

fn cmd_curves(args: CurvesArgs) -> anyhow::Result<()> {
    if args.samples < 2 {
        anyhow::bail!("samples must be >= 2");
    }

    let raw_at = |i: usize| i as f64 / (args.samples - 1) as f64;
    let opening = opening_curve();
    let dolly = dolly_curve();
    let dump = CurveDump {
        opening: (0..args.samples)
            .map(|i| {
                let raw = raw_at(i);
                CurveSample {
                    raw,
                    value: opening.value_at(raw),
                }
            })
            .collect(),
        dolly: (0..args.samples)
            .map(|i| {
                let raw = raw_at(i);
                let dp = dolly.value_at(raw);
                DollySample {
                    raw,
                    value: dp,
                    zoom_scale: zoom_scale(dp),
                    fov_multiplier: fov_multiplier(dp),
                    red_flash: red_flash(dp),
                    fade_to_black: fade_to_black(dp),
                }
            })
            .collect(),
    };

    let json = serde_json::to_string_pretty(&dump).context("serialize curve dump")?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("write '{}'", path.display()))?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

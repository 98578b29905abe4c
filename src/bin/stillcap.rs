use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use stillcap::{CaptionJob, Fps, ImageFilter, RenderOutcome, Rgba8, TextAlign, TextPosition};

#[derive(Parser, Debug)]
#[command(name = "stillcap", version, about = "Caption a still image into a video")]
struct Cli {
    /// Log debug details (resolved fonts, caption layout, ffmpeg invocation).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render an MP4 video (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render only the captioned frame as a PNG.
    Frame(FrameArgs),
    /// Print width, height, frame count and frame rate of a video (requires `ffprobe`).
    Probe(ProbeArgs),
    /// Write a sample image and render a set of illustrative videos from it.
    Demo(DemoArgs),
}

#[derive(Args, Debug)]
struct CaptionArgs {
    /// Source image.
    #[arg(long, required_unless_present = "job")]
    image: Option<PathBuf>,

    /// Caption text; `\n` sequences start new lines.
    #[arg(long, required_unless_present = "job")]
    text: Option<String>,

    /// Job description JSON; replaces the other caption options.
    #[arg(long, conflicts_with_all = ["image", "text"])]
    job: Option<PathBuf>,

    /// Anchor name (`center`, `top_left`, ... `bottom_right`) or explicit `x,y`.
    #[arg(long, default_value = "center")]
    position: TextPosition,

    /// Font file tried before the default family.
    #[arg(long)]
    font: Option<PathBuf>,

    /// Font size in pixels.
    #[arg(long, default_value_t = 50)]
    font_size: u32,

    /// Text color: `#RRGGBB`, `#RRGGBBAA` or `r,g,b[,a]`.
    #[arg(long, default_value = "#FFFFFF")]
    color: Rgba8,

    /// Background box color; no box when omitted.
    #[arg(long)]
    bg_color: Option<Rgba8>,

    /// Background padding and edge margin in pixels.
    #[arg(long, default_value_t = 10)]
    padding: u32,

    /// Line alignment inside the caption block: left, center or right.
    #[arg(long, default_value = "left")]
    align: TextAlign,

    /// Image filter applied before captioning.
    #[arg(long, default_value = "none")]
    filter: ImageFilter,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Output MP4 path.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Video length in seconds.
    #[arg(long)]
    duration: Option<f64>,

    /// Frames per second.
    #[arg(long)]
    fps: Option<u32>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    caption: CaptionArgs,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Args, Debug)]
struct ProbeArgs {
    /// Video to inspect.
    path: PathBuf,
}

#[derive(Args, Debug)]
struct DemoArgs {
    /// Directory receiving the sample image and videos.
    #[arg(long, default_value = "stillcap-demo")]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Frame(args) => cmd_frame(args),
        Command::Probe(args) => cmd_probe(args),
        Command::Demo(args) => cmd_demo(args),
    }
}

fn build_job(args: CaptionArgs) -> anyhow::Result<CaptionJob> {
    if let Some(path) = &args.job {
        return Ok(CaptionJob::from_path(path)?);
    }
    let image = args.image.context("--image is required without --job")?;
    let text = args.text.context("--text is required without --job")?;

    let mut job = CaptionJob::new(image, text.replace("\\n", "\n"));
    job.filter = args.filter;
    job.style.position = args.position;
    job.style.font = args.font;
    job.style.font_size = args.font_size;
    job.style.color = args.color;
    job.style.bg_color = args.bg_color;
    job.style.padding = args.padding;
    job.style.align = args.align;
    Ok(job)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut job = build_job(args.caption)?;
    if let Some(out) = args.out {
        job.output = out;
    }
    if let Some(duration) = args.duration {
        job.duration = duration;
    }
    if let Some(fps) = args.fps {
        job.fps = Fps::whole(fps)?;
    }
    report(&stillcap::create_video(&job))
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let job = build_job(args.caption)?;
    let mut compositor = stillcap::compositor_for_image(&job.image);
    let frame = compositor.render_caption_frame(&job.image, job.filter, &job.style)?;
    if frame.caption.is_none() {
        tracing::warn!("no usable font found; frame has no caption");
    }

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    frame
        .image
        .save_with_format(&args.out, image::ImageFormat::Png)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let info = stillcap::probe_video(&args.path)?;
    println!("path: {}", info.path.display());
    println!("size: {}x{}", info.width, info.height);
    println!("frames: {}", info.frame_count);
    println!("fps: {}", info.fps);
    Ok(())
}

fn report(outcome: &RenderOutcome) -> anyhow::Result<()> {
    match outcome {
        RenderOutcome::Success(s) => {
            eprintln!(
                "wrote {} ({}x{}, {} frames @ {} fps)",
                s.output.display(),
                s.width,
                s.height,
                s.frame_count,
                s.fps
            );
            Ok(())
        }
        RenderOutcome::Failure(f) => {
            if let Some(out) = &f.output {
                eprintln!("partial result: {}", out.display());
            }
            anyhow::bail!("{:?}: {}", f.kind, f.message)
        }
    }
}

fn cmd_demo(args: DemoArgs) -> anyhow::Result<()> {
    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create demo dir '{}'", args.out_dir.display()))?;
    let sample = args.out_dir.join("sample_image.png");
    write_sample_image(&sample)?;
    eprintln!("created sample image: {}", sample.display());

    let out = |name: &str| args.out_dir.join(name);
    let mut jobs = Vec::new();

    let mut job = CaptionJob::new(&sample, "Hello from stillcap!\nCentered Text");
    job.output = out("output_center_bg.mp4");
    job.style.font_size = 60;
    job.style.color = Rgba8::rgb(0, 0, 139);
    job.style.bg_color = Some(Rgba8::rgba(200, 200, 200, 180));
    job.style.padding = 15;
    job.style.align = TextAlign::Center;
    jobs.push(("centered text with background", job));

    let mut job = CaptionJob::new(&sample, "Top-Left Text\nNo Background\nCustom Font (maybe)");
    job.output = out("output_topleft_customfont.mp4");
    job.duration = 4.0;
    job.style.position = TextPosition::from_name("top_left");
    job.style.font = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
        "/Library/Fonts/Arial.ttf",
        "C:/Windows/Fonts/arial.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.is_file());
    job.style.font_size = 40;
    job.style.color = Rgba8::rgba(50, 50, 50, 200);
    job.style.padding = 20;
    jobs.push(("top-left text, custom font if present", job));

    let mut job = CaptionJob::new(
        &sample,
        "Bottom-Right Aligned\nLine 2 here\nAnd a third line.",
    );
    job.output = out("output_bottomright_coords.mp4");
    job.style.position = TextPosition::At { x: 400.0, y: 350.0 };
    job.style.font_size = 30;
    job.style.color = Rgba8::rgb(0, 100, 0);
    job.style.bg_color = Some(Rgba8::rgba(220, 255, 220, 100));
    job.style.padding = 5;
    job.style.align = TextAlign::Right;
    jobs.push(("explicit coordinates, right aligned", job));

    let mut job = CaptionJob::new(
        &sample,
        "Center Left Position\nText aligned right within block.",
    );
    job.output = out("output_centerleft_rightalign.mp4");
    job.duration = 4.0;
    job.style.position = TextPosition::from_name("center_left");
    job.style.font_size = 35;
    job.style.bg_color = Some(Rgba8::rgba(0, 0, 0, 128));
    job.style.align = TextAlign::Right;
    jobs.push(("center-left, right aligned", job));

    let mut job = CaptionJob::new(out("non_existent_image.png"), "This should fail.");
    job.output = out("output_error_img.mp4");
    jobs.push(("missing image (expected failure)", job));

    let mut job = CaptionJob::new(&sample, "This might use fallback font.");
    job.output = out("output_error_font.mp4");
    job.style.font = Some(PathBuf::from("/tmp/non_existent_font.ttf"));
    jobs.push(("missing font file (falls back)", job));

    let mut job = CaptionJob::new(&sample, "Sepia");
    job.output = out("output_sepia.mp4");
    job.duration = 2.0;
    job.filter = ImageFilter::Sepia;
    job.style.position = TextPosition::from_name("bottom_center");
    jobs.push(("sepia filter", job));

    let mut failures = 0usize;
    for (name, job) in &jobs {
        eprintln!("--- {name} ---");
        if let Err(e) = report(&stillcap::create_video(job)) {
            eprintln!("{e}");
            failures += 1;
        }
    }
    eprintln!("{} of {} demo jobs succeeded", jobs.len() - failures, jobs.len());
    Ok(())
}

fn write_sample_image(path: &Path) -> anyhow::Result<()> {
    let img = image::RgbImage::from_fn(800, 600, |x, y| {
        // Sky blue with a soft vertical gradient and a darker band for contrast checks.
        let shade = (y * 40 / 600) as u8;
        if (100..140).contains(&y) && (100..500).contains(&x) {
            image::Rgb([40, 60, 90])
        } else {
            image::Rgb([135 - shade, 206 - shade, 235 - shade / 2])
        }
    });
    img.save(path)
        .with_context(|| format!("write sample image '{}'", path.display()))?;
    Ok(())
}

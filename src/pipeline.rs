use std::path::{Path, PathBuf};

use crate::{
    assets::font::FontResolver,
    encode::{
        ffmpeg::{FfmpegSink, FfmpegSinkOpts},
        sink::FrameSink,
        still::encode_still,
    },
    foundation::core::Fps,
    foundation::error::{CaptionError, CaptionResult},
    model::CaptionJob,
    render::compositor::{Compositor, DrawnCaption},
};

/// Directory, next to the source image, searched for bundled fonts.
pub const BUNDLED_FONT_DIR: &str = "fonts";

/// What a finished job produced.
#[derive(Clone, Debug, PartialEq)]
pub struct VideoSummary {
    /// Written video file.
    pub output: PathBuf,
    /// Number of identical frames in the video.
    pub frame_count: u64,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Frame rate.
    pub fps: Fps,
    /// Caption placement and font, `None` if the text could not be drawn.
    pub caption: Option<DrawnCaption>,
}

/// Classification of a failed job.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureKind {
    /// The source image does not exist.
    SourceNotFound,
    /// No font could be loaded; a textless video may still have been written.
    FontLoadFailure,
    /// The source image could not be decoded.
    Decode,
    /// The job contained unusable values.
    Validation,
    /// Writing the video failed.
    EncodeFailure,
    /// Anything else, such as I/O errors.
    Other,
}

impl From<&CaptionError> for FailureKind {
    fn from(e: &CaptionError) -> Self {
        match e {
            CaptionError::SourceNotFound(_) => Self::SourceNotFound,
            CaptionError::FontUnavailable(_) => Self::FontLoadFailure,
            CaptionError::Decode(_) => Self::Decode,
            CaptionError::Validation(_) => Self::Validation,
            CaptionError::Encode(_) => Self::EncodeFailure,
            CaptionError::Other(_) => Self::Other,
        }
    }
}

/// Details of a failed job.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderFailure {
    /// Failure class.
    pub kind: FailureKind,
    /// Human readable description.
    pub message: String,
    /// Video that was still written (textless), if any.
    pub output: Option<PathBuf>,
}

/// Result of [`create_video`].
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// The video was written with its caption.
    Success(VideoSummary),
    /// The job failed; see [`RenderFailure::output`] for partial results.
    Failure(RenderFailure),
}

impl RenderOutcome {
    /// Whether the job fully succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Render `job` to a video file. Never panics; every problem becomes [`RenderOutcome::Failure`].
#[tracing::instrument(skip(job), fields(image = %job.image.display(), output = %job.output.display()))]
pub fn create_video(job: &CaptionJob) -> RenderOutcome {
    outcome_of(render_job(job))
}

/// Like [`create_video`], but with a caller-provided compositor and frame sink.
pub fn create_video_with(
    job: &CaptionJob,
    compositor: &mut Compositor,
    sink: &mut dyn FrameSink,
) -> RenderOutcome {
    outcome_of(render_job_to_sink(job, compositor, sink))
}

/// Like [`create_video`], but as a `Result`.
///
/// A missing font yields [`CaptionError::FontUnavailable`] even though the textless video exists.
pub fn try_create_video(job: &CaptionJob) -> CaptionResult<VideoSummary> {
    render_job(job).and_then(require_caption)
}

/// Like [`try_create_video`], but with a caller-provided compositor and frame sink.
pub fn try_create_video_with(
    job: &CaptionJob,
    compositor: &mut Compositor,
    sink: &mut dyn FrameSink,
) -> CaptionResult<VideoSummary> {
    render_job_to_sink(job, compositor, sink).and_then(require_caption)
}

fn outcome_of(result: CaptionResult<VideoSummary>) -> RenderOutcome {
    match result {
        Ok(summary) if summary.caption.is_some() => {
            tracing::info!(
                frames = summary.frame_count,
                "video written to {}",
                summary.output.display()
            );
            RenderOutcome::Success(summary)
        }
        Ok(summary) => {
            let message = textless_message(&summary);
            tracing::error!("{message}");
            RenderOutcome::Failure(RenderFailure {
                kind: FailureKind::FontLoadFailure,
                message,
                output: Some(summary.output),
            })
        }
        Err(e) => {
            tracing::error!("video creation failed: {e}");
            RenderOutcome::Failure(RenderFailure {
                kind: FailureKind::from(&e),
                message: e.to_string(),
                output: None,
            })
        }
    }
}

fn require_caption(summary: VideoSummary) -> CaptionResult<VideoSummary> {
    if summary.caption.is_none() {
        return Err(CaptionError::font_unavailable(textless_message(&summary)));
    }
    Ok(summary)
}

fn textless_message(summary: &VideoSummary) -> String {
    format!(
        "no font could be loaded; video written to '{}' without caption",
        summary.output.display()
    )
}

/// Composite the frame for `job` and replicate it into `sink`.
pub fn render_job_to_sink(
    job: &CaptionJob,
    compositor: &mut Compositor,
    sink: &mut dyn FrameSink,
) -> CaptionResult<VideoSummary> {
    job.validate()?;
    let frame = compositor.render_caption_frame(&job.image, job.filter, &job.style)?;
    let frame_count = encode_still(&frame.image, job.duration, job.fps, sink)?;
    let (width, height) = frame.image.dimensions();
    Ok(VideoSummary {
        output: job.output.clone(),
        frame_count,
        width,
        height,
        fps: job.fps,
        caption: frame.caption,
    })
}

/// Font resolver for a job: system fonts plus the bundled directory next to the image.
pub fn resolver_for_image(image: &Path) -> FontResolver {
    let dir = image
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(BUNDLED_FONT_DIR);
    FontResolver::new().with_bundled_dir(dir)
}

/// Compositor used by [`create_video`] for a job whose source image is `image`.
pub fn compositor_for_image(image: &Path) -> Compositor {
    Compositor::with_resolver(resolver_for_image(image))
}

fn render_job(job: &CaptionJob) -> CaptionResult<VideoSummary> {
    // Declared before the sink so ffmpeg is reaped before the file is removed.
    let mut guard = PartialOutputGuard(None);
    if !job.output.exists() {
        guard.0 = Some(job.output.clone());
    }
    let mut compositor = compositor_for_image(&job.image);
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(&job.output));

    let summary = render_job_to_sink(job, &mut compositor, &mut sink)?;
    guard.0 = None;
    Ok(summary)
}

/// Removes a freshly created output file unless disarmed.
struct PartialOutputGuard(Option<PathBuf>);

impl Drop for PartialOutputGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take()
            && path.exists()
        {
            tracing::warn!("removing partial output '{}'", path.display());
            let _ = std::fs::remove_file(path);
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;

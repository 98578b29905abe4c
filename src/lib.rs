//! stillcap turns a still image and a text caption into a fixed-duration video.
//!
//! The work happens in two stages:
//!
//! - Composite: decode the image, apply an optional [`ImageFilter`], resolve a font through an
//!   ordered fallback chain, lay out and place the caption, draw it (with an optional background
//!   box) and flatten to one opaque RGB frame.
//! - Encode: push that frame `floor(duration × fps)` times (at least once) into a [`FrameSink`];
//!   [`FfmpegSink`] writes an H.264 MP4 through the system `ffmpeg`.
//!
//! [`create_video`] runs both stages for a [`CaptionJob`] and reports a [`RenderOutcome`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod encode;
mod foundation;
mod layout;
mod model;
mod pipeline;
mod render;

pub use crate::assets::color::Rgba8;
pub use crate::assets::decode::{MAX_DIMENSION, SourceImage, decode_image, load_source_image};
pub use crate::assets::filter::ImageFilter;
pub use crate::assets::font::{
    DEFAULT_FAMILIES, FontResolver, FontSource, ResolvedFont, default_chain, resolve_font,
};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, encode_args, is_ffmpeg_on_path, is_ffprobe_on_path,
    output_pix_fmt,
};
pub use crate::encode::probe::{VideoInfo, decode_video_frames_rgb8, probe_video};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::encode::still::{encode_still, frame_count};
pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect};
pub use crate::foundation::error::{CaptionError, CaptionResult};
pub use crate::layout::position::{
    Anchor, BlockSize, CaptionLayout, TextPosition, place_caption, resolve_origin,
};
pub use crate::layout::text::{LINE_SPACING_PX, ShapedCaption, TextAlign, TextLayoutEngine};
pub use crate::model::{CaptionJob, CaptionStyle};
pub use crate::pipeline::{
    BUNDLED_FONT_DIR, FailureKind, RenderFailure, RenderOutcome, VideoSummary,
    compositor_for_image, create_video, create_video_with, render_job_to_sink, resolver_for_image,
    try_create_video, try_create_video_with,
};
pub use crate::render::compositor::{Compositor, DrawnCaption, RenderedFrame, render_caption_frame};

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::CaptionResult;

/// Number of frames for a still of `duration_secs`: `floor(duration × fps)`, at least 1.
pub fn frame_count(duration_secs: f64, fps: Fps) -> u64 {
    let n = fps.secs_to_frames_floor(duration_secs);
    if n == 0 {
        tracing::warn!(
            duration_secs,
            %fps,
            "duration yields no whole frame, writing a single frame"
        );
        return 1;
    }
    n
}

/// Push `frame` into `sink` [`frame_count`] times and finish the sink.
///
/// Returns the number of frames written.
pub fn encode_still(
    frame: &image::RgbImage,
    duration_secs: f64,
    fps: Fps,
    sink: &mut dyn FrameSink,
) -> CaptionResult<u64> {
    let frames = frame_count(duration_secs, fps);
    let (width, height) = frame.dimensions();
    sink.begin(SinkConfig { width, height, fps })?;
    for i in 0..frames {
        sink.push_frame(FrameIndex(i), frame)?;
    }
    sink.end()?;
    tracing::debug!(frames, "encoded still");
    Ok(frames)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/still.rs"]
mod tests;

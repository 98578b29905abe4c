use std::path::{Path, PathBuf};
use std::process::Command;

use crate::foundation::core::Fps;
use crate::foundation::error::{CaptionError, CaptionResult};

/// Properties of an encoded video as reported by `ffprobe`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoInfo {
    /// Probed file.
    pub path: PathBuf,
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Number of decoded frames.
    pub frame_count: u64,
    /// Stream frame rate.
    pub fps: Fps,
}

/// Probe the first video stream of `path`, counting frames by decoding them.
pub fn probe_video(path: &Path) -> CaptionResult<VideoInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        width: Option<u32>,
        height: Option<u32>,
        nb_read_frames: Option<String>,
        r_frame_rate: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
    }

    let out = Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-count_frames",
            "-select_streams",
            "v:0",
            "-show_entries",
            "stream=width,height,nb_read_frames,r_frame_rate",
            "-print_format",
            "json",
        ])
        .arg(path)
        .output()
        .map_err(|e| CaptionError::encode(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(CaptionError::encode(format!(
            "ffprobe failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout)
        .map_err(|e| CaptionError::encode(format!("ffprobe json parse failed: {e}")))?;
    let stream = parsed
        .streams
        .first()
        .ok_or_else(|| CaptionError::encode("no video stream found"))?;
    let width = stream
        .width
        .ok_or_else(|| CaptionError::encode("missing video width from ffprobe"))?;
    let height = stream
        .height
        .ok_or_else(|| CaptionError::encode("missing video height from ffprobe"))?;
    let frame_count = stream
        .nb_read_frames
        .as_deref()
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| CaptionError::encode("missing frame count from ffprobe"))?;
    let fps = stream
        .r_frame_rate
        .as_deref()
        .ok_or_else(|| CaptionError::encode("missing frame rate from ffprobe"))
        .and_then(parse_rate)?;

    Ok(VideoInfo {
        path: path.to_path_buf(),
        width,
        height,
        frame_count,
        fps,
    })
}

/// Decode every frame of a probed video as RGB8.
pub fn decode_video_frames_rgb8(info: &VideoInfo) -> CaptionResult<Vec<image::RgbImage>> {
    let out = Command::new("ffmpeg")
        .args(["-v", "error", "-i"])
        .arg(&info.path)
        .args(["-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
        .output()
        .map_err(|e| {
            CaptionError::encode(format!("failed to run ffmpeg for video decode: {e}"))
        })?;
    if !out.status.success() {
        return Err(CaptionError::encode(format!(
            "ffmpeg video decode failed for '{}': {}",
            info.path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let frame_len = info.width as usize * info.height as usize * 3;
    if frame_len == 0 {
        return Err(CaptionError::encode(
            "decoded video frame size is zero (invalid dimensions)",
        ));
    }
    if !out.stdout.len().is_multiple_of(frame_len) {
        return Err(CaptionError::encode(format!(
            "decoded video has invalid size: got {} bytes, expected multiples of {frame_len}",
            out.stdout.len()
        )));
    }

    out.stdout
        .chunks_exact(frame_len)
        .map(|chunk| {
            image::RgbImage::from_raw(info.width, info.height, chunk.to_vec())
                .ok_or_else(|| CaptionError::encode("decoded frame buffer size mismatch"))
        })
        .collect()
}

/// Parse an ffprobe rate such as `24/1` or `30000/1001`.
fn parse_rate(s: &str) -> CaptionResult<Fps> {
    let (num, den) = s.split_once('/').unwrap_or((s, "1"));
    let num = num
        .trim()
        .parse::<u32>()
        .map_err(|_| CaptionError::encode(format!("invalid frame rate '{s}'")))?;
    let den = den
        .trim()
        .parse::<u32>()
        .map_err(|_| CaptionError::encode(format!("invalid frame rate '{s}'")))?;
    Fps::new(num, den)
}

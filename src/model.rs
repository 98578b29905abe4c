use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    assets::{color::Rgba8, filter::ImageFilter},
    foundation::core::Fps,
    foundation::error::{CaptionError, CaptionResult},
    layout::{position::TextPosition, text::TextAlign},
};

/// How the caption looks and where it goes.
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct CaptionStyle {
    /// Caption text; `\n` starts a new line.
    pub text: String,
    /// Font file to try first. `None` goes straight to the default family.
    #[serde(default, alias = "font_path")]
    pub font: Option<PathBuf>,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: u32,
    /// Text color.
    #[serde(default = "default_color", alias = "text_color")]
    pub color: Rgba8,
    /// Optional background box color.
    #[serde(default)]
    pub bg_color: Option<Rgba8>,
    /// Background padding, also the margin for edge anchors.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Caption placement.
    #[serde(default)]
    pub position: TextPosition,
    /// Line alignment inside the caption block.
    #[serde(default, alias = "text_align")]
    pub align: TextAlign,
}

impl CaptionStyle {
    /// Style with default settings for `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font: None,
            font_size: default_font_size(),
            color: default_color(),
            bg_color: None,
            padding: default_padding(),
            position: TextPosition::default(),
            align: TextAlign::default(),
        }
    }

    /// Check values that cannot be rendered.
    pub fn validate(&self) -> CaptionResult<()> {
        if self.font_size == 0 {
            return Err(CaptionError::validation("font_size must be > 0"));
        }
        Ok(())
    }
}

/// A complete still-to-video job.
///
/// Loads from JSON, with the caption fields at the top level:
///
/// ```json
/// { "image": "photo.jpg", "text": "Hello", "position": "bottom_center", "bg_color": "#00000080" }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct CaptionJob {
    /// Source image.
    #[serde(alias = "image_path")]
    pub image: PathBuf,
    /// Output video path.
    #[serde(default = "default_output", alias = "output_path")]
    pub output: PathBuf,
    /// Video length in seconds; may be fractional.
    #[serde(default = "default_duration")]
    pub duration: f64,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: Fps,
    /// Filter applied to the source before captioning.
    #[serde(default)]
    pub filter: ImageFilter,
    /// Caption settings.
    #[serde(flatten)]
    pub style: CaptionStyle,
}

impl CaptionJob {
    /// Job with default settings.
    pub fn new(image: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            output: default_output(),
            duration: default_duration(),
            fps: default_fps(),
            filter: ImageFilter::None,
            style: CaptionStyle::new(text),
        }
    }

    /// Parse a job from JSON.
    pub fn from_reader(reader: impl std::io::Read) -> CaptionResult<Self> {
        serde_json::from_reader(reader)
            .map_err(|e| CaptionError::validation(format!("invalid job json: {e}")))
    }

    /// Parse a job from a JSON file.
    pub fn from_path(path: &Path) -> CaptionResult<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("open job file '{}'", path.display()))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Check values that cannot be rendered or encoded.
    ///
    /// Non-positive durations are accepted; the encoder clamps them to one frame.
    pub fn validate(&self) -> CaptionResult<()> {
        if self.output.as_os_str().is_empty() {
            return Err(CaptionError::validation("output path must be non-empty"));
        }
        if !self.duration.is_finite() {
            return Err(CaptionError::validation("duration must be finite"));
        }
        if self.fps.num == 0 || self.fps.den == 0 {
            return Err(CaptionError::validation("fps must have num>0 and den>0"));
        }
        self.style.validate()
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("output.mp4")
}

fn default_duration() -> f64 {
    5.0
}

fn default_fps() -> Fps {
    Fps { num: 24, den: 1 }
}

fn default_font_size() -> u32 {
    50
}

fn default_color() -> Rgba8 {
    Rgba8::WHITE
}

fn default_padding() -> u32 {
    10
}

#[cfg(test)]
#[path = "../tests/unit/model.rs"]
mod tests;

use crate::foundation::core::{Canvas, Rect};

/// One of the nine named caption anchors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Anchor {
    /// Centered on both axes; ignores padding.
    Center,
    /// Top-left corner.
    TopLeft,
    /// Horizontally centered along the top edge.
    TopCenter,
    /// Top-right corner.
    TopRight,
    /// Vertically centered along the left edge.
    CenterLeft,
    /// Vertically centered along the right edge.
    CenterRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Horizontally centered along the bottom edge.
    BottomCenter,
    /// Bottom-right corner.
    BottomRight,
}

impl Anchor {
    /// All anchors.
    pub const ALL: [Anchor; 9] = [
        Self::Center,
        Self::TopLeft,
        Self::TopCenter,
        Self::TopRight,
        Self::CenterLeft,
        Self::CenterRight,
        Self::BottomLeft,
        Self::BottomCenter,
        Self::BottomRight,
    ];

    /// Snake_case name of the anchor.
    pub fn name(self) -> &'static str {
        match self {
            Self::Center => "center",
            Self::TopLeft => "top_left",
            Self::TopCenter => "top_center",
            Self::TopRight => "top_right",
            Self::CenterLeft => "center_left",
            Self::CenterRight => "center_right",
            Self::BottomLeft => "bottom_left",
            Self::BottomCenter => "bottom_center",
            Self::BottomRight => "bottom_right",
        }
    }

    /// Look up an anchor by its exact name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

/// Where the caption block goes: a named anchor or an explicit top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextPosition {
    /// Derived from image size, block size and padding.
    Anchor(Anchor),
    /// Top-left corner of the block in image pixels, used verbatim.
    At {
        /// Horizontal offset from the left edge.
        x: f64,
        /// Vertical offset from the top edge.
        y: f64,
    },
}

impl Default for TextPosition {
    fn default() -> Self {
        Self::Anchor(Anchor::Center)
    }
}

impl TextPosition {
    /// Parse an anchor name. Unknown names fall back to `top_left` with a warning.
    pub fn from_name(name: &str) -> Self {
        match Anchor::from_name(name) {
            Some(anchor) => Self::Anchor(anchor),
            None => {
                tracing::warn!("unknown text position '{name}', defaulting to top_left");
                Self::Anchor(Anchor::TopLeft)
            }
        }
    }

    /// Interpret a loosely typed JSON value.
    ///
    /// Strings are anchor names (see [`TextPosition::from_name`]); a two-element numeric array
    /// is an explicit `(x, y)`; anything else falls back to `center` with a warning.
    pub fn from_json(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(name) => Self::from_name(name),
            serde_json::Value::Array(items) if items.len() == 2 => {
                match (items[0].as_f64(), items[1].as_f64()) {
                    (Some(x), Some(y)) => Self::At { x, y },
                    _ => Self::invalid(value),
                }
            }
            _ => Self::invalid(value),
        }
    }

    fn invalid(value: &serde_json::Value) -> Self {
        tracing::warn!("invalid text position {value}, defaulting to center");
        Self::Anchor(Anchor::Center)
    }
}

impl std::fmt::Display for TextPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anchor(a) => f.write_str(a.name()),
            Self::At { x, y } => write!(f, "({x}, {y})"),
        }
    }
}

/// Command-line form: `x,y` for explicit coordinates, otherwise an anchor name.
impl std::str::FromStr for TextPosition {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some((x, y)) = s.split_once(',')
            && let (Ok(x), Ok(y)) = (x.trim().parse::<f64>(), y.trim().parse::<f64>())
        {
            return Ok(Self::At { x, y });
        }
        Ok(Self::from_name(s))
    }
}

impl<'de> serde::Deserialize<'de> for TextPosition {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

/// Size of the caption block in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockSize {
    /// Width of the widest line.
    pub width: f64,
    /// Height of the whole block, including line spacing.
    pub height: f64,
}

/// Final placement of the caption block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CaptionLayout {
    /// Left edge, truncated to whole pixels.
    pub x: i32,
    /// Top edge, truncated to whole pixels.
    pub y: i32,
    /// Block size.
    pub block: BlockSize,
}

impl CaptionLayout {
    /// Background rectangle: the block grown by `padding` on every side.
    pub fn background_rect(&self, padding: u32) -> Rect {
        let p = f64::from(padding);
        let x = f64::from(self.x);
        let y = f64::from(self.y);
        Rect::new(
            x - p,
            y - p,
            x + self.block.width + p,
            y + self.block.height + p,
        )
    }
}

/// Top-left corner of the block before truncation.
///
/// Placement is best effort: results may be negative or push the block off-canvas.
pub fn resolve_origin(
    canvas: Canvas,
    block: BlockSize,
    padding: u32,
    position: TextPosition,
) -> (f64, f64) {
    let anchor = match position {
        TextPosition::At { x, y } => return (x, y),
        TextPosition::Anchor(a) => a,
    };

    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let p = f64::from(padding);
    let center_x = (w - block.width) / 2.0;
    let center_y = (h - block.height) / 2.0;
    let right = w - block.width - p;
    let bottom = h - block.height - p;

    match anchor {
        Anchor::Center => (center_x, center_y),
        Anchor::TopLeft => (p, p),
        Anchor::TopCenter => (center_x, p),
        Anchor::TopRight => (right, p),
        Anchor::CenterLeft => (p, center_y),
        Anchor::CenterRight => (right, center_y),
        Anchor::BottomLeft => (p, bottom),
        Anchor::BottomCenter => (center_x, bottom),
        Anchor::BottomRight => (right, bottom),
    }
}

/// Resolve and truncate the block origin toward zero.
pub fn place_caption(
    canvas: Canvas,
    block: BlockSize,
    padding: u32,
    position: TextPosition,
) -> CaptionLayout {
    let (x, y) = resolve_origin(canvas, block, padding, position);
    CaptionLayout {
        x: x.trunc() as i32,
        y: y.trunc() as i32,
        block,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/position.rs"]
mod tests;

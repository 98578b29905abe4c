use std::sync::Arc;

use crate::{
    assets::{color::Rgba8, font::ResolvedFont},
    foundation::error::{CaptionError, CaptionResult},
    layout::position::BlockSize,
};

/// Extra vertical gap between consecutive caption lines, in pixels.
pub const LINE_SPACING_PX: f32 = 4.0;

/// Horizontal alignment of lines inside the caption block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    /// Flush with the block's left edge.
    #[default]
    Left,
    /// Centered within the block.
    Center,
    /// Flush with the block's right edge.
    Right,
}

impl TextAlign {
    /// Horizontal offset of a line of `line_width` inside a block of `block_width`.
    pub fn offset(self, block_width: f32, line_width: f32) -> f32 {
        match self {
            Self::Left => 0.0,
            Self::Center => (block_width - line_width) / 2.0,
            Self::Right => block_width - line_width,
        }
    }
}

impl std::str::FromStr for TextAlign {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "center" => Ok(Self::Center),
            "right" => Ok(Self::Right),
            other => Err(format!(
                "unknown text alignment '{other}' (expected left, center or right)"
            )),
        }
    }
}

/// Straight-alpha RGBA8 brush attached to shaped glyph runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct TextBrushRgba8 {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Caption text shaped with one font, ready to be drawn.
pub struct ShapedCaption {
    pub(crate) layout: parley::Layout<TextBrushRgba8>,
    line_widths: Vec<f32>,
    width: f32,
    height: f32,
}

impl ShapedCaption {
    /// Size of the whole block; lines are separated by [`LINE_SPACING_PX`].
    pub fn block(&self) -> BlockSize {
        BlockSize {
            width: f64::from(self.width),
            height: f64::from(self.height),
        }
    }

    /// Advance width of each line, top to bottom.
    pub fn line_widths(&self) -> &[f32] {
        &self.line_widths
    }

    /// Number of laid out lines.
    pub fn line_count(&self) -> usize {
        self.line_widths.len()
    }
}

impl std::fmt::Debug for ShapedCaption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShapedCaption")
            .field("line_widths", &self.line_widths)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Reusable Parley contexts for shaping captions.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    registered: Vec<RegisteredFont>,
}

/// Font bytes already added to the Parley collection, and the family picked from them.
struct RegisteredFont {
    data: Arc<Vec<u8>>,
    index: u32,
    family_name: String,
}

impl RegisteredFont {
    fn matches(&self, font: &ResolvedFont) -> bool {
        self.index == font.index
            && (Arc::ptr_eq(&self.data, &font.data) || self.data == font.data)
    }
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            registered: Vec::new(),
        }
    }

    /// Shape `text` with `font` at `size_px`. Lines break only at `\n`.
    pub fn shape(
        &mut self,
        text: &str,
        font: &ResolvedFont,
        size_px: f32,
        color: Rgba8,
    ) -> CaptionResult<ShapedCaption> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(CaptionError::validation(
                "font size must be finite and > 0",
            ));
        }

        let family_name = self.family_for(font)?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::from(
            color,
        )));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);

        let mut line_widths = Vec::new();
        let mut height = 0.0f32;
        for line in layout.lines() {
            let m = line.metrics();
            line_widths.push(m.advance);
            height += m.line_height;
        }
        if line_widths.len() > 1 {
            height += LINE_SPACING_PX * (line_widths.len() - 1) as f32;
        }
        let width = line_widths.iter().copied().fold(0.0f32, f32::max);

        Ok(ShapedCaption {
            layout,
            line_widths,
            width,
            height,
        })
    }

    /// Register `font` with Parley once and return the family name used to select it.
    fn family_for(&mut self, font: &ResolvedFont) -> CaptionResult<String> {
        if let Some(known) = self.registered.iter().find(|r| r.matches(font)) {
            return Ok(known.family_name.clone());
        }

        let families = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.data.as_ref().clone()),
            None,
        );
        // Collections register several families; prefer the one that was resolved.
        let mut family_name: Option<String> = None;
        for (id, _) in &families {
            let Some(name) = self.font_ctx.collection.family_name(*id) else {
                continue;
            };
            if name == font.family {
                family_name = Some(name.to_string());
                break;
            }
            if family_name.is_none() {
                family_name = Some(name.to_string());
            }
        }
        let family_name = family_name.ok_or_else(|| {
            CaptionError::font_unavailable(format!(
                "font '{}' registered no named family",
                font.family
            ))
        })?;

        self.registered.push(RegisteredFont {
            data: Arc::clone(&font.data),
            index: font.index,
            family_name: family_name.clone(),
        });
        Ok(family_name)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;

//! Still-frame compositing: source image, optional background box, caption text.
//!
//! The caption is rasterized with `vello_cpu` into a transparent overlay which is then composited
//! over the decoded source, so pixels outside the caption are carried through untouched.

use std::path::Path;

use crate::{
    assets::{
        decode::{SourceImage, load_source_image},
        filter::ImageFilter,
        font::{FontResolver, FontSource, ResolvedFont, default_chain, resolve_font},
    },
    foundation::core::{Canvas, Rect},
    foundation::error::{CaptionError, CaptionResult},
    foundation::math::{flatten_premul_rgba8_to_rgb8, over_in_place},
    layout::{
        position::{CaptionLayout, place_caption},
        text::{LINE_SPACING_PX, ShapedCaption, TextLayoutEngine},
    },
    model::CaptionStyle,
};

/// The finished opaque frame plus what was drawn on it.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    /// Opaque RGB8 raster, same size as the source image.
    pub image: image::RgbImage,
    /// Caption details, or `None` when no font could be loaded and the text was skipped.
    pub caption: Option<DrawnCaption>,
}

/// Where and with which font the caption was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawnCaption {
    /// Final block placement.
    pub layout: CaptionLayout,
    /// Family name of the font used.
    pub font_family: String,
    /// Fallback strategy that produced the font.
    pub font_source: FontSource,
}

/// Reusable compositor state: font database and shaping contexts.
#[derive(Default)]
pub struct Compositor {
    fonts: FontResolver,
    text: TextLayoutEngine,
    chain: Option<Vec<FontSource>>,
}

impl Compositor {
    /// Compositor backed by the system font database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compositor using a preconfigured font resolver.
    pub fn with_resolver(fonts: FontResolver) -> Self {
        Self {
            fonts,
            ..Self::default()
        }
    }

    /// Font resolver consulted for every render.
    pub fn resolver(&self) -> &FontResolver {
        &self.fonts
    }

    /// Replace the standard fallback chain for every subsequent render.
    pub fn with_font_chain(mut self, chain: Vec<FontSource>) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Load `image_path`, apply `filter` and draw the caption described by `style`.
    ///
    /// A missing font is not an error here: the frame comes back without text and
    /// [`RenderedFrame::caption`] is `None`.
    #[tracing::instrument(skip(self, style), fields(text = %style.text))]
    pub fn render_caption_frame(
        &mut self,
        image_path: &Path,
        filter: ImageFilter,
        style: &CaptionStyle,
    ) -> CaptionResult<RenderedFrame> {
        style.validate()?;
        let source = load_source_image(image_path, filter)?;
        self.composite(source, style)
    }

    /// Draw the caption over an already decoded source.
    pub fn composite(
        &mut self,
        mut source: SourceImage,
        style: &CaptionStyle,
    ) -> CaptionResult<RenderedFrame> {
        let canvas = Canvas {
            width: source.width,
            height: source.height,
        };

        let chain = match &self.chain {
            Some(chain) => chain.clone(),
            None => default_chain(style.font.as_deref()),
        };
        let caption = match resolve_font(&mut self.fonts, &chain) {
            Some(font) => {
                let shaped =
                    self.text
                        .shape(&style.text, &font, style.font_size as f32, style.color)?;
                let layout = place_caption(canvas, shaped.block(), style.padding, style.position);
                tracing::debug!(
                    x = layout.x,
                    y = layout.y,
                    width = layout.block.width,
                    height = layout.block.height,
                    lines = shaped.line_count(),
                    "caption layout"
                );
                let overlay = rasterize_caption(canvas, &shaped, &font, &layout, style)?;
                over_in_place(&mut source.rgba8_premul, &overlay)?;
                Some(DrawnCaption {
                    layout,
                    font_family: font.family.clone(),
                    font_source: font.source.clone(),
                })
            }
            None => {
                tracing::warn!("no usable font found; rendering frame without caption");
                None
            }
        };

        let mut rgb = vec![0u8; (canvas.width as usize) * (canvas.height as usize) * 3];
        flatten_premul_rgba8_to_rgb8(&mut rgb, &source.rgba8_premul, [0, 0, 0]);
        let image = image::RgbImage::from_raw(canvas.width, canvas.height, rgb)
            .ok_or_else(|| CaptionError::validation("rgb frame buffer size mismatch"))?;

        Ok(RenderedFrame { image, caption })
    }
}

/// One-shot helper around [`Compositor::render_caption_frame`].
pub fn render_caption_frame(
    image_path: &Path,
    filter: ImageFilter,
    style: &CaptionStyle,
) -> CaptionResult<RenderedFrame> {
    Compositor::new().render_caption_frame(image_path, filter, style)
}

/// Background box and glyphs on a transparent canvas, as premultiplied RGBA8.
fn rasterize_caption(
    canvas: Canvas,
    shaped: &ShapedCaption,
    font: &ResolvedFont,
    layout: &CaptionLayout,
    style: &CaptionStyle,
) -> CaptionResult<Vec<u8>> {
    let w: u16 = canvas
        .width
        .try_into()
        .map_err(|_| CaptionError::validation("frame width exceeds u16"))?;
    let h: u16 = canvas
        .height
        .try_into()
        .map_err(|_| CaptionError::validation("frame height exceeds u16"))?;

    let mut ctx = vello_cpu::RenderContext::new(w, h);

    if let Some(bg) = style.bg_color {
        ctx.set_paint(bg.to_peniko());
        ctx.fill_rect(&rect_to_cpu(layout.background_rect(style.padding)));
    }

    let font_data = vello_cpu::peniko::FontData::new(
        vello_cpu::peniko::Blob::from(font.data.as_ref().clone()),
        font.index,
    );
    let block_width = layout.block.width as f32;
    let (ox, oy) = (layout.x as f32, layout.y as f32);

    for (i, line) in shaped.layout.lines().enumerate() {
        let dx = style.align.offset(block_width, line.metrics().advance);
        let dy = i as f32 * LINE_SPACING_PX;
        for item in line.items() {
            let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                continue;
            };
            let brush = run.style().brush;
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                brush.r, brush.g, brush.b, brush.a,
            ));
            let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                id: g.id,
                x: g.x + ox + dx,
                y: g.y + oy + dy,
            });
            ctx.glyph_run(&font_data)
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }

    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(w, h);
    ctx.render_to_pixmap(&mut pixmap);
    Ok(pixmap.data_as_u8_slice().to_vec())
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;

use std::path::PathBuf;

use super::*;
use crate::assets::color::Rgba8;
use crate::layout::position::{Anchor, TextPosition};

fn write_png(name: &str, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
    let dir = PathBuf::from("target/unit_compositor");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    image::RgbImage::from_pixel(width, height, image::Rgb(rgb))
        .save(&path)
        .unwrap();
    path
}

fn has_fonts() -> bool {
    FontResolver::new().load(&FontSource::AnyInstalled).is_ok()
}

#[test]
fn missing_source_is_source_not_found() {
    let err = render_caption_frame(
        Path::new("target/unit_compositor/missing.png"),
        ImageFilter::None,
        &CaptionStyle::new("x"),
    )
    .unwrap_err();
    assert!(matches!(err, CaptionError::SourceNotFound(_)));
}

#[test]
fn without_fonts_frame_equals_source() {
    let path = write_png("plain.png", 31, 17, [12, 200, 90]);
    let mut style = CaptionStyle::new("never drawn");
    style.bg_color = Some(Rgba8::rgb(255, 0, 0));

    let frame = Compositor::new()
        .with_font_chain(vec![])
        .render_caption_frame(&path, ImageFilter::None, &style)
        .unwrap();

    assert!(frame.caption.is_none());
    assert_eq!(frame.image.dimensions(), (31, 17));
    assert!(frame.image.pixels().all(|p| p.0 == [12, 200, 90]));
}

#[test]
fn filter_is_applied_before_caption() {
    let path = write_png("filtered.png", 8, 8, [10, 20, 30]);
    let frame = Compositor::new()
        .with_font_chain(vec![])
        .render_caption_frame(&path, ImageFilter::Invert, &CaptionStyle::new(""))
        .unwrap();
    assert!(frame.image.pixels().all(|p| p.0 == [245, 235, 225]));
}

#[test]
fn zero_font_size_is_rejected() {
    let path = write_png("zero_size.png", 8, 8, [0, 0, 0]);
    let mut style = CaptionStyle::new("x");
    style.font_size = 0;
    let err = Compositor::new()
        .render_caption_frame(&path, ImageFilter::None, &style)
        .unwrap_err();
    assert!(matches!(err, CaptionError::Validation(_)));
}

#[test]
fn caption_and_background_change_only_the_padded_box() {
    if !has_fonts() {
        eprintln!("skipping: no fonts installed");
        return;
    }
    let path = write_png("boxed.png", 200, 150, [0, 0, 255]);
    let mut style = CaptionStyle::new("Basic Test");
    style.font_size = 20;
    style.bg_color = Some(Rgba8::rgb(0, 0, 0));
    style.padding = 6;
    style.position = TextPosition::Anchor(Anchor::TopLeft);

    let frame = Compositor::new()
        .render_caption_frame(&path, ImageFilter::None, &style)
        .unwrap();
    let caption = frame.caption.expect("caption drawn");
    assert_eq!(frame.image.dimensions(), (200, 150));
    assert_eq!((caption.layout.x, caption.layout.y), (6, 6));

    let bg = caption.layout.background_rect(style.padding);
    // Just inside the box corner: background color.
    assert_eq!(frame.image.get_pixel(1, 1).0, [0, 0, 0]);
    // Well outside the box: untouched source.
    let (fx, fy) = ((bg.x1 as u32 + 5).min(199), (bg.y1 as u32 + 5).min(149));
    assert_eq!(frame.image.get_pixel(fx, fy).0, [0, 0, 255]);
    assert_eq!(frame.image.get_pixel(199, 149).0, [0, 0, 255]);
}

#[test]
fn explicit_position_places_block_verbatim() {
    if !has_fonts() {
        eprintln!("skipping: no fonts installed");
        return;
    }
    let path = write_png("explicit.png", 200, 150, [40, 40, 40]);
    let mut style = CaptionStyle::new("Hi");
    style.font_size = 16;
    style.padding = 30;
    style.position = TextPosition::At { x: 75.0, y: 75.0 };

    let frame = Compositor::new()
        .render_caption_frame(&path, ImageFilter::None, &style)
        .unwrap();
    let caption = frame.caption.expect("caption drawn");
    assert_eq!((caption.layout.x, caption.layout.y), (75, 75));
    // White text lands somewhere inside the block.
    let changed = frame.image.enumerate_pixels().any(|(x, y, p)| {
        (75..75 + caption.layout.block.width as u32 + 1).contains(&x)
            && (75..75 + caption.layout.block.height as u32 + 1).contains(&y)
            && p.0 != [40, 40, 40]
    });
    assert!(changed);
}

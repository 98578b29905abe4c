use std::io::Cursor;

use super::*;

fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_image_png_dimensions_and_premul() {
    let prepared = decode_image(&png_bytes(1, 1, [100, 50, 200, 128]), ImageFilter::None).unwrap();
    assert_eq!(prepared.width, 1);
    assert_eq!(prepared.height, 1);
    assert_eq!(
        prepared.rgba8_premul.as_slice(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn decode_applies_filter_before_premultiplying() {
    let prepared = decode_image(&png_bytes(2, 3, [10, 20, 30, 255]), ImageFilter::Invert).unwrap();
    assert_eq!((prepared.width, prepared.height), (2, 3));
    assert_eq!(&prepared.rgba8_premul[..4], &[245, 235, 225, 255]);
    assert_eq!(prepared.rgba8_premul.len(), 2 * 3 * 4);
}

#[test]
fn decode_rejects_garbage() {
    let err = decode_image(b"definitely not an image", ImageFilter::None).unwrap_err();
    assert!(matches!(err, CaptionError::Decode(_)));
}

#[test]
fn missing_path_is_source_not_found() {
    let err = load_source_image(
        Path::new("target/does/not/exist/source.png"),
        ImageFilter::None,
    )
    .unwrap_err();
    assert!(matches!(err, CaptionError::SourceNotFound(_)));
}

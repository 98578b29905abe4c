use crate::foundation::error::{CaptionError, CaptionResult};

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u16(px[0] as u16, a) as u8;
        px[1] = mul_div255_u16(px[1] as u16, a) as u8;
        px[2] = mul_div255_u16(px[2] as u16, a) as u8;
    }
}

/// Flatten premultiplied RGBA8 over an opaque background into tightly packed RGB8.
pub(crate) fn flatten_premul_rgba8_to_rgb8(dst: &mut [u8], src_premul: &[u8], bg_rgb: [u8; 3]) {
    debug_assert_eq!(dst.len() / 3, src_premul.len() / 4);

    for (d, s) in dst.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        let a = s[3] as u16;
        if a == 255 {
            d.copy_from_slice(&s[..3]);
            continue;
        }
        let inv = 255u16 - a;
        for c in 0..3 {
            let v = s[c] as u16 + mul_div255_u16(bg_rgb[c] as u16, inv);
            d[c] = v.min(255) as u8;
        }
    }
}

/// Composite a premultiplied RGBA8 layer over `dst` (source-over), in place.
pub(crate) fn over_in_place(dst: &mut [u8], src: &[u8]) -> CaptionResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CaptionError::validation(
            "over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = u16::from(s[3]);
        if sa == 0 {
            continue;
        }
        let inv = 255 - sa;
        for c in 0..4 {
            let v = u16::from(s[c]) + mul_div255_u16(u16::from(d[c]), inv);
            d[c] = v.min(255) as u8;
        }
    }
    Ok(())
}

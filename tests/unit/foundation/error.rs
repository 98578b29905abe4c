use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptionError::source_not_found("missing.png")
            .to_string()
            .contains("source image not found: missing.png")
    );
    assert!(
        CaptionError::font_unavailable("x")
            .to_string()
            .contains("font unavailable:")
    );
    assert!(CaptionError::decode("x").to_string().contains("decode error:"));
    assert!(
        CaptionError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(CaptionError::encode("x").to_string().contains("encode error:"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptionError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

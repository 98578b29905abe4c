//! Per-pixel color filters applied to the source image before the caption is drawn.

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];
const POSTERIZE_LEVELS: f32 = 4.0;
const SOLARIZE_THRESHOLD: u8 = 128;

/// Color filter for the source image.
///
/// Filters operate on straight (non-premultiplied) RGB and never touch alpha.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFilter {
    /// Leave the image untouched.
    #[default]
    None,
    /// `255 - c` on every channel.
    Invert,
    /// Classic sepia tone matrix.
    Sepia,
    /// Zero the red channel.
    RemoveRedChannel,
    /// Zero the green channel.
    RemoveGreenChannel,
    /// Zero the blue channel.
    RemoveBlueChannel,
    /// `(r, g, b) -> (g, r, b)`.
    PermuteRgbGrb,
    /// `(r, g, b) -> (b, g, r)`.
    PermuteRgbBrg,
    /// Quantize each channel to four levels.
    Posterize,
    /// Invert channels brighter than the threshold.
    Solarize,
}

impl ImageFilter {
    /// All filters, in presentation order.
    pub const ALL: [ImageFilter; 10] = [
        Self::None,
        Self::Invert,
        Self::Sepia,
        Self::RemoveRedChannel,
        Self::RemoveGreenChannel,
        Self::RemoveBlueChannel,
        Self::PermuteRgbGrb,
        Self::PermuteRgbBrg,
        Self::Posterize,
        Self::Solarize,
    ];

    /// Stable snake_case name, as accepted by [`str::parse`].
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Invert => "invert",
            Self::Sepia => "sepia",
            Self::RemoveRedChannel => "remove_red_channel",
            Self::RemoveGreenChannel => "remove_green_channel",
            Self::RemoveBlueChannel => "remove_blue_channel",
            Self::PermuteRgbGrb => "permute_rgb_grb",
            Self::PermuteRgbBrg => "permute_rgb_brg",
            Self::Posterize => "posterize",
            Self::Solarize => "solarize",
        }
    }

    /// Apply the filter in place to straight RGBA8 pixels.
    pub fn apply_rgba8(self, rgba: &mut [u8]) {
        if self == Self::None {
            return;
        }
        for px in rgba.chunks_exact_mut(4) {
            let [r, g, b] = [px[0], px[1], px[2]];
            let out = match self {
                Self::None => [r, g, b],
                Self::Invert => [255 - r, 255 - g, 255 - b],
                Self::Sepia => SEPIA.map(|row| {
                    let v = row[0] * f32::from(r) + row[1] * f32::from(g) + row[2] * f32::from(b);
                    v.round().min(255.0) as u8
                }),
                Self::RemoveRedChannel => [0, g, b],
                Self::RemoveGreenChannel => [r, 0, b],
                Self::RemoveBlueChannel => [r, g, 0],
                Self::PermuteRgbGrb => [g, r, b],
                Self::PermuteRgbBrg => [b, g, r],
                Self::Posterize => [r, g, b].map(posterize),
                Self::Solarize => [r, g, b].map(|c| {
                    if c > SOLARIZE_THRESHOLD {
                        255 - c
                    } else {
                        c
                    }
                }),
            };
            px[..3].copy_from_slice(&out);
        }
    }
}

fn posterize(c: u8) -> u8 {
    let step = 255.0 / (POSTERIZE_LEVELS - 1.0);
    ((f32::from(c) / step).round() * step).round() as u8
}

impl std::fmt::Display for ImageFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for ImageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|f| f.name()).collect();
                format!("unknown filter '{s}' (expected one of: {})", names.join(", "))
            })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/filter.rs"]
mod tests;

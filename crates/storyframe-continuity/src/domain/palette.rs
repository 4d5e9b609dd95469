//! Deterministic colour palettes.
//!
//! A character's palette is a pure function of its name and first
//! description: a SHA-256 digest seeds hue, saturation and lightness for
//! each swatch, so identical input always yields identical colours.

use sha2::{Digest, Sha256};

/// Converts HSL (hue in degrees, saturation and lightness in percent) to a
/// `#rrggbb` string.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
pub fn hsl_to_hex(hue: u16, saturation: u8, lightness: u8) -> String {
    let h = f64::from(hue % 360) / 60.0;
    let s = f64::from(saturation.min(100)) / 100.0;
    let l = f64::from(lightness.min(100)) / 100.0;

    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = chroma * (1.0 - (h % 2.0 - 1.0).abs());
    let (r, g, b) = match h {
        h if h < 1.0 => (chroma, x, 0.0),
        h if h < 2.0 => (x, chroma, 0.0),
        h if h < 3.0 => (0.0, chroma, x),
        h if h < 4.0 => (0.0, x, chroma),
        h if h < 5.0 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = l - chroma / 2.0;
    let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    format!("#{:02x}{:02x}{:02x}", channel(r), channel(g), channel(b))
}

/// Derives up to `size` swatches from `name` and `description`; one digest
/// yields at most [`storyframe_core::config::MAX_CHARACTER_PALETTE`] of them.
#[must_use]
pub fn derived_swatches(name: &str, description: &str, size: usize) -> Vec<String> {
    let digest = Sha256::digest(format!("{}|{}", name.to_lowercase(), description).as_bytes());
    digest
        .chunks_exact(4)
        .take(size)
        .map(|chunk| {
            let hue = u16::from_be_bytes([chunk[0], chunk[1]]) % 360;
            let saturation = 35 + chunk[2] % 41;
            let lightness = 30 + chunk[3] % 36;
            hsl_to_hex(hue, saturation, lightness)
        })
        .collect()
}

/// Builds a character palette: explicit colours first, then derived
/// swatches, without duplicates and capped at `size`.
#[must_use]
pub fn character_palette(
    name: &str,
    description: &str,
    explicit: &[&str],
    size: usize,
) -> Vec<String> {
    let mut palette: Vec<String> = Vec::with_capacity(size);
    let derived = derived_swatches(name, description, size);
    for color in explicit
        .iter()
        .map(|hex| (*hex).to_owned())
        .chain(derived)
    {
        if palette.len() == size {
            break;
        }
        if !palette.contains(&color) {
            palette.push(color);
        }
    }
    palette
}

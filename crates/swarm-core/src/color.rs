//! Particle palette handling.
//!
//! Colors come in as `#rrggbb` strings (the sauce colors mixed in earlier
//! stages). Short palettes are widened with lighter and darker variants so the
//! swarm never looks flat.

use bytemuck::{Pod, Zeroable};
use rand::Rng;

use crate::error::SwarmError;

pub const DEFAULT_PALETTE: [&str; 2] = ["#fbbf24", "#ef4444"];

/// Palettes shorter than this are expanded with lightness variants.
const MIN_PALETTE: usize = 5;
const VARIANT_LIGHTNESS: f32 = 0.1;
const PARTICLE_LIGHTNESS_JITTER: f32 = 0.05;

/// Linear 0..1 RGB triple, laid out for direct upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` (leading `#` optional).
    pub fn from_hex(hex: &str) -> Result<Self, SwarmError> {
        let digits = hex.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(SwarmError::InvalidColor(hex.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| SwarmError::InvalidColor(hex.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Shift HSL lightness by `delta`, clamped to `[0, 1]`.
    pub fn offset_lightness(self, delta: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        Self::from_hsl(h, s, (l + delta).clamp(0.0, 1.0))
    }

    fn to_hsl(self) -> (f32, f32, f32) {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (max + min) * 0.5;
        if (max - min).abs() < f32::EPSILON {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == self.r {
            (self.g - self.b) / d + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / d + 2.0
        } else {
            (self.r - self.g) / d + 4.0
        };
        (h / 6.0, s, l)
    }

    fn from_hsl(h: f32, s: f32, l: f32) -> Self {
        if s <= 0.0 {
            return Self::new(l, l, l);
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Self {
            r: hue_to_channel(p, q, h + 1.0 / 3.0),
            g: hue_to_channel(p, q, h),
            b: hue_to_channel(p, q, h - 1.0 / 3.0),
        }
    }
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Build the particle palette from hex strings.
///
/// An empty input falls back to [`DEFAULT_PALETTE`]. Palettes with fewer than
/// five entries get a lighter and a darker variant per color.
pub fn build_palette<S: AsRef<str>>(hex_colors: &[S]) -> Result<Vec<Rgb>, SwarmError> {
    let base: Vec<Rgb> = if hex_colors.is_empty() {
        DEFAULT_PALETTE.iter().map(|h| Rgb::from_hex(h)).collect::<Result<_, _>>()?
    } else {
        hex_colors
            .iter()
            .map(|h| Rgb::from_hex(h.as_ref()))
            .collect::<Result<_, _>>()?
    };

    if base.len() >= MIN_PALETTE {
        return Ok(base);
    }

    let mut expanded = Vec::with_capacity(base.len() * 3);
    for color in base {
        expanded.push(color);
        expanded.push(color.offset_lightness(VARIANT_LIGHTNESS));
        expanded.push(color.offset_lightness(-VARIANT_LIGHTNESS));
    }
    Ok(expanded)
}

/// Pick a palette entry and nudge its lightness slightly.
pub fn pick_particle_color<R: Rng + ?Sized>(palette: &[Rgb], rng: &mut R) -> Rgb {
    if palette.is_empty() {
        return Rgb::WHITE;
    }
    let base = palette[rng.gen_range(0..palette.len())];
    let jitter = (rng.gen::<f32>() - 0.5) * PARTICLE_LIGHTNESS_JITTER;
    base.offset_lightness(jitter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_parse_hex() {
        let c = Rgb::from_hex("#ff0080").unwrap();
        assert!((c.r - 1.0).abs() < 1e-6);
        assert_eq!(c.g, 0.0);
        assert!((c.b - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#gg0000").is_err());
        assert!(Rgb::from_hex("").is_err());
    }

    #[test]
    fn test_lightness_round_trip_keeps_hue() {
        let red = Rgb::new(1.0, 0.0, 0.0);
        let lighter = red.offset_lightness(0.1);
        assert!((lighter.r - 1.0).abs() < 1e-4);
        assert!((lighter.g - lighter.b).abs() < 1e-4);
        assert!(lighter.g > 0.15 && lighter.g < 0.25, "g = {}", lighter.g);
    }

    #[test]
    fn test_short_palette_expanded() {
        let palette = build_palette(&["#fbbf24"]).unwrap();
        assert_eq!(palette.len(), 3);
    }

    #[test]
    fn test_empty_palette_uses_default() {
        let empty: [&str; 0] = [];
        let palette = build_palette(&empty).unwrap();
        assert_eq!(palette.len(), DEFAULT_PALETTE.len() * 3);
    }

    #[test]
    fn test_long_palette_untouched() {
        let colors = ["#000000", "#111111", "#222222", "#333333", "#444444"];
        assert_eq!(build_palette(&colors).unwrap().len(), 5);
    }

    #[test]
    fn test_pick_stays_in_unit_range() {
        let palette = build_palette(&["#ffffff", "#000000"]).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let c = pick_particle_color(&palette, &mut rng);
            for v in [c.r, c.g, c.b] {
                assert!((0.0..=1.0).contains(&v), "channel {v} out of range");
            }
        }
    }
}

//! Color assignment for series, entities, and the no-data treatment.
//!
//! - Y series: Microsoft Office (2013+) palette, by series index.
//! - Entities: a categorical value from the color column (e.g. a continent) is hashed to a
//!   stable hue, so the same category always gets the same color.
//! - Placeholders and the no-data banner use a neutral gray.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 8-bit RGB color, serialized as a `#RRGGBB` string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Parse `#RRGGBB` or `RRGGBB` (case-insensitive).
    pub fn from_hex(s: &str) -> Option<Self> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&s[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb8 {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb8 {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Rgb8::from_hex(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {s:?}")))
    }
}

/// Order: Blue, Orange, Gray, Gold, Light Blue, Green, Dark Blue, Dark Orange, Dark Gray, Brownish Gold.
const OFFICE10: [Rgb8; 10] = [
    Rgb8::new(68, 114, 196),  // #4472C4
    Rgb8::new(237, 125, 49),  // #ED7D31
    Rgb8::new(165, 165, 165), // #A5A5A5
    Rgb8::new(255, 192, 0),   // #FFC000
    Rgb8::new(91, 155, 213),  // #5B9BD5
    Rgb8::new(112, 173, 71),  // #70AD47
    Rgb8::new(38, 68, 120),   // #264478
    Rgb8::new(158, 72, 14),   // #9E480E
    Rgb8::new(99, 99, 99),    // #636363
    Rgb8::new(153, 115, 0),   // #997300
];

/// Fill for placeholder columns, the no-data banner, and labels of entities without bars.
pub const NO_DATA_GRAY: Rgb8 = Rgb8::new(0xA1, 0xA1, 0xA1);

/// Color of the y series at position `idx`.
#[inline]
pub fn series_color(idx: usize) -> Rgb8 {
    OFFICE10[idx % OFFICE10.len()]
}

/// Stable color for a categorical value (same input, same color).
pub fn category_color(category: &str) -> Rgb8 {
    let h = stable_hash64(category);
    hsl_to_rgb8((h % 360) as f64, 0.55, 0.50)
}

/// 64-bit FNV-1a over the UTF-8 bytes; fixed constants, so colors do not move between builds.
fn stable_hash64(s: &str) -> u64 {
    const OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;
    s.bytes()
        .fold(OFFSET, |h, b| (h ^ u64::from(b)).wrapping_mul(PRIME))
}

fn hsl_to_rgb8(h_deg: f64, s: f64, l: f64) -> Rgb8 {
    let h = (h_deg % 360.0) / 360.0;
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        let v = (l * 255.0).round() as u8;
        return Rgb8::new(v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 1.0 / 2.0 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        }
    }

    let to_u8 = |v: f64| (v * 255.0).round() as u8;
    Rgb8::new(
        to_u8(hue_to_rgb(p, q, h + 1.0 / 3.0)),
        to_u8(hue_to_rgb(p, q, h)),
        to_u8(hue_to_rgb(p, q, h - 1.0 / 3.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parses_with_and_without_hash() {
        assert_eq!(Rgb8::from_hex("#4472C4"), Some(Rgb8::new(68, 114, 196)));
        assert_eq!(Rgb8::from_hex("ed7d31"), Some(Rgb8::new(237, 125, 49)));
        assert_eq!(Rgb8::from_hex("#12345"), None);
        assert_eq!(Rgb8::from_hex("zzzzzz"), None);
    }

    #[test]
    fn palette_wraps_around() {
        assert_eq!(series_color(0), series_color(10));
        assert_ne!(series_color(0), series_color(1));
    }

    #[test]
    fn category_colors_are_deterministic() {
        assert_eq!(category_color("Europe"), category_color("Europe"));
        assert_ne!(category_color("Europe"), category_color("Asia"));
    }

    #[test]
    fn category_hash_is_pinned() {
        assert_eq!(stable_hash64(""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(stable_hash64("Europe"), 0x0275_e1d6_bb36_3367);
        assert_eq!(stable_hash64("Europe") % 360, 143);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let s = serde_json::to_string(&Rgb8::new(1, 2, 255)).unwrap();
        assert_eq!(s, "\"#0102FF\"");
        let c: Rgb8 = serde_json::from_str("\"#0102ff\"").unwrap();
        assert_eq!(c, Rgb8::new(1, 2, 255));
    }
}

//! Text measurement and truncation.
//!
//! Layout runs without a font backend, so label extents come from a [`TextMeasurer`].
//! Callers with real shaping can plug their own in; [`HeuristicTextMeasurer`] is the default.

/// Returns `(width, height)` of `text` in pixels.
pub trait TextMeasurer {
    fn measure(&self, text: &str, font_px: f64) -> (f64, f64);
}

/// Average glyph width of ~0.6em, height of 1em.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, font_px: f64) -> (f64, f64) {
        (estimate_text_width_px(text, font_px), font_px)
    }
}

pub fn estimate_text_width_px(text: &str, font_px: f64) -> f64 {
    text.chars().count() as f64 * font_px * 0.60
}

/// Truncate to fit `max_px` and add a single ellipsis if needed.
pub fn truncate_to_width(text: &str, font_px: f64, max_px: f64) -> String {
    if estimate_text_width_px(text, font_px) <= max_px {
        return text.to_string();
    }
    let mut out: String = String::new();
    for ch in text.chars() {
        let candidate = format!("{out}{ch}…");
        if estimate_text_width_px(&candidate, font_px) > max_px {
            break;
        }
        out.push(ch);
    }
    if out.is_empty() {
        return String::new();
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_width_scales_with_chars() {
        let m = HeuristicTextMeasurer;
        assert_eq!(m.measure("abcde", 10.0), (30.0, 10.0));
        assert_eq!(m.measure("", 10.0).0, 0.0);
    }

    #[test]
    fn truncation_adds_ellipsis() {
        assert_eq!(truncate_to_width("short", 10.0, 100.0), "short");
        // 6px per char: "abc…" is 24px
        assert_eq!(truncate_to_width("abcdefgh", 10.0, 25.0), "abc…");
        assert_eq!(truncate_to_width("abcdefgh", 10.0, 5.0), "");
    }
}

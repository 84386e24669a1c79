//! Rendering a computed layout to **SVG** or **PNG** with plotters.
//!
//! The layout is already in pixel space, so drawing happens directly on the root area:
//! columns and placeholders in paint order, the no-data banner, surviving labels, axes
//! with locale-aware tick labels, and a series legend below the x axis.

use crate::labels::Bounds;
use crate::layout::{MarimekkoLayout, RectKind};
use crate::placement::Z_BACKGROUND;
use crate::style::Rgb8;
use crate::text::truncate_to_width;
use anyhow::{Result, anyhow};
use num_format::{Locale, ToFormattedString};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontFamily, FontTransform};
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::path::Path;
use std::sync::Once;

const MARGIN_LEFT: f64 = 72.0;
const MARGIN_RIGHT: f64 = 24.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 80.0;
const TICK_FONT_PX: u32 = 12;
const TITLE_FONT_PX: u32 = 20;
const LEGEND_FONT_PX: u32 = 13;

/// `ab_glyph` does not discover OS fonts, so "sans-serif" is registered from the bundled asset.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        if plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../assets/DejaVuSans.ttf"),
        )
        .is_err()
        {
            log::warn!("bundled font could not be parsed; bitmap text will fail to draw");
        }
    });
}

/// Plot rectangle for a canvas of `width` x `height`, leaving room for title, ticks and legend.
pub fn plot_bounds(width: u32, height: u32) -> Bounds {
    let w = (width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let h = (height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);
    Bounds::new(MARGIN_LEFT, MARGIN_TOP, w, h)
}

/// Map a user-provided locale tag to a `num_format::Locale`. Defaults to English.
pub fn map_locale(tag: &str) -> &'static Locale {
    match tag.to_lowercase().as_str() {
        "de" | "de_de" | "german" => &Locale::de,
        "fr" | "fr_fr" => &Locale::fr,
        "es" | "es_es" => &Locale::es,
        "it" | "it_it" => &Locale::it,
        "pt" | "pt_pt" | "pt_br" => &Locale::pt,
        "nl" | "nl_nl" => &Locale::nl,
        _ => &Locale::en,
    }
}

/// Pick a scale and its word for large magnitudes, e.g. `(1e6, "millions")`.
pub fn choose_axis_scale(max_abs: f64) -> (f64, &'static str) {
    if max_abs >= 1.0e12 {
        (1.0e12, "trillions")
    } else if max_abs >= 1.0e9 {
        (1.0e9, "billions")
    } else if max_abs >= 1.0e6 {
        (1.0e6, "millions")
    } else if max_abs >= 1.0e3 {
        (1.0e3, "thousands")
    } else {
        (1.0, "")
    }
}

/// Tick text: thousands separators for large values, up to two decimals for small ones.
pub fn format_tick(v: f64, locale: &Locale) -> String {
    let a = v.abs();
    if a >= 1000.0 {
        return (v.round() as i64).to_formatted_string(locale);
    }
    let prec = if a >= 100.0 || v.fract() == 0.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.r, c.g, c.b)
}

fn px(v: f64) -> i32 {
    v.round() as i32
}

/// Draw `layout` to `out_path`; `.svg` uses the SVG backend, anything else the bitmap one.
pub fn render_layout<P: AsRef<Path>>(
    layout: &MarimekkoLayout,
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
    locale_tag: &str,
) -> Result<()> {
    let out_path = out_path.as_ref();
    let path_string = out_path.to_string_lossy().into_owned();
    let locale = map_locale(locale_tag);
    ensure_fonts_registered();

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_layout(&root, layout, title, locale)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        let root = BitMapBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
        draw_layout(&root, layout, title, locale)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_layout<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &MarimekkoLayout,
    title: &str,
    locale: &Locale,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let plot = layout.plot;

    if !title.trim().is_empty() {
        let style = TextStyle::from((FontFamily::SansSerif, TITLE_FONT_PX))
            .pos(Pos::new(HPos::Left, VPos::Top));
        root.draw(&Text::new(title.trim().to_string(), (px(plot.x), 12), style))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    // Columns
    for r in layout.rects_in_paint_order() {
        let b = r.bounds;
        let corners = [(px(b.x), px(b.y)), (px(b.right()), px(b.bottom()))];
        let fill = match r.kind {
            RectKind::Bar if r.z_index == Z_BACKGROUND => rgb(r.color).mix(0.35).filled(),
            RectKind::Bar | RectKind::Placeholder => rgb(r.color).mix(1.0).filled(),
            RectKind::NoDataBanner => rgb(r.color).mix(0.25).filled(),
        };
        root.draw(&Rectangle::new(corners, fill))
            .map_err(|e| anyhow!("{:?}", e))?;
        if r.kind != RectKind::NoDataBanner {
            root.draw(&Rectangle::new(corners, WHITE.stroke_width(1)))
                .map_err(|e| anyhow!("{:?}", e))?;
        }
    }

    if let Some(region) = &layout.no_data {
        let style = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
            .pos(Pos::new(HPos::Center, VPos::Center))
            .transform(FontTransform::Rotate270);
        let (cx, cy) = region.label_anchor;
        root.draw(&Text::new(region.label.clone(), (px(cx), px(cy)), style))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    // Labels
    let label_font = layout_label_font_px(layout);
    for l in &layout.labels {
        let color = rgb(l.color);
        let style = TextStyle::from((FontFamily::SansSerif, label_font))
            .pos(Pos::new(HPos::Left, VPos::Top))
            .color(&color);
        root.draw(&Text::new(
            l.text.clone(),
            (px(l.bounds.x), px(l.bounds.y)),
            style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    draw_axes(root, layout, locale)?;
    draw_legend(root, layout)?;
    Ok(())
}

fn layout_label_font_px(layout: &MarimekkoLayout) -> u32 {
    layout
        .labels
        .first()
        .map(|l| l.bounds.height.round().max(1.0) as u32)
        .unwrap_or(TICK_FONT_PX)
}

fn draw_axes<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &MarimekkoLayout,
    locale: &Locale,
) -> Result<()> {
    let plot = layout.plot;
    let baseline = px(layout.baseline_y());
    let axis_style = BLACK.stroke_width(1);

    root.draw(&PathElement::new(
        vec![(px(plot.x), baseline), (px(plot.right()), baseline)],
        axis_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;
    root.draw(&PathElement::new(
        vec![(px(plot.x), px(plot.y)), (px(plot.x), baseline)],
        axis_style,
    ))
    .map_err(|e| anyhow!("{:?}", e))?;

    let (xscale, xword) = choose_axis_scale(layout.x_axis.domain.1.abs());
    let top_center = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
        .pos(Pos::new(HPos::Center, VPos::Top));
    for t in layout.x_axis.ticks(5) {
        let x = px(layout.x_axis.place(t));
        root.draw(&PathElement::new(vec![(x, baseline), (x, baseline + 4)], axis_style))
            .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            format_tick(t / xscale, locale),
            (x, baseline + 6),
            top_center.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    if !xword.is_empty() {
        let style = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
            .pos(Pos::new(HPos::Right, VPos::Top));
        root.draw(&Text::new(
            format!("({xword})"),
            (px(plot.right()), baseline + 22),
            style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    let right_center = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
        .pos(Pos::new(HPos::Right, VPos::Center));
    for t in layout.y_axis.ticks(5) {
        let y = px(layout.y_axis.place(t));
        root.draw(&PathElement::new(
            vec![(px(plot.x) - 4, y), (px(plot.x), y)],
            axis_style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        root.draw(&Text::new(
            format_tick(t, locale),
            (px(plot.x) - 6, y),
            right_center.clone(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    layout: &MarimekkoLayout,
) -> Result<()> {
    if layout.legend.is_empty() {
        return Ok(());
    }
    let plot = layout.plot;
    let y = px(layout.baseline_y()) + 44;
    let swatch = 10;
    let slot = (plot.width / layout.legend.len() as f64).max(60.0);
    let text_cap = (slot - f64::from(swatch) - 12.0).max(20.0);
    let style = TextStyle::from((FontFamily::SansSerif, LEGEND_FONT_PX))
        .pos(Pos::new(HPos::Left, VPos::Center));

    for (i, entry) in layout.legend.iter().enumerate() {
        let x = px(plot.x + slot * i as f64);
        root.draw(&Rectangle::new(
            [(x, y - swatch / 2), (x + swatch, y + swatch / 2)],
            rgb(entry.color).filled(),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
        let text = truncate_to_width(&entry.series_name, f64::from(LEGEND_FONT_PX), text_cap);
        root.draw(&Text::new(text, (x + swatch + 6, y), style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }
    Ok(())
}

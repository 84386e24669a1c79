use mekko_rs::layout::{RectKind, Z_NO_DATA_BANNER};
use mekko_rs::models::Observation;
use mekko_rs::no_data::NO_DATA_LABEL;
use mekko_rs::{Bar, Bounds, MarimekkoConfig, Table, compute};

fn table(rows: &[(&str, i32, &str, f64)]) -> Table {
    Table::from_observations(
        rows.iter()
            .map(|(e, t, c, v)| Observation::number(e, *t, c, *v)),
    )
}

#[test]
fn second_series_sits_on_the_first() {
    let t = table(&[
        ("medium", 2001, "pop", 4000.0),
        ("medium", 2001, "gdp", 4.0),
        ("medium", 2001, "gdp2", 8.5),
        ("big", 2001, "pop", 5000.0),
        ("big", 2001, "gdp", 8.0),
        ("big", 2001, "gdp2", 1.0),
    ]);
    let cfg = MarimekkoConfig::new("pop", &["gdp", "gdp2"]);
    let layout = compute(&t, &cfg, Bounds::new(0.0, 0.0, 1000.0, 500.0)).unwrap();

    let medium = layout
        .placed_items
        .iter()
        .find(|p| p.item.entity_name == "medium")
        .unwrap();
    let bars = &medium.item.bars;
    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].y_point.value_offset, 0.0);
    assert_eq!(bars[0].y_point.value, 4.0);
    assert_eq!(bars[1].column_slug, "gdp2");
    assert_eq!(bars[1].y_point.value_offset, 4.0);
    assert_eq!(bars[1].y_point.value, 8.5);
    assert_eq!(medium.item.total(), 12.5);

    // medium (12.5) outranks big (9.0) by total
    assert_eq!(layout.placed_items[0].item.entity_name, "medium");
    assert_eq!(layout.legend.len(), 2);
    assert_ne!(layout.legend[0].color, layout.legend[1].color);
}

#[test]
fn missing_series_is_skipped_not_zeroed() {
    let t = table(&[
        ("a", 2000, "pop", 1.0),
        ("a", 2000, "s2", 3.0),
        ("b", 2000, "pop", 1.0),
        ("b", 2000, "s1", 1.0),
        ("b", 2000, "s2", 1.0),
    ]);
    let cfg = MarimekkoConfig::new("pop", &["s1", "s2"]);
    let layout = compute(&t, &cfg, Bounds::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    let a = layout
        .placed_items
        .iter()
        .find(|p| p.item.entity_name == "a")
        .unwrap();
    assert_eq!(a.item.bars.len(), 1);
    assert_eq!(a.item.bars[0].column_slug, "s2");
    assert_eq!(a.item.bars[0].y_point.value_offset, 0.0);
}

#[test]
fn entity_without_y_gets_placeholder_and_banner() {
    let t = table(&[
        ("medium", 2001, "pop", 4000.0),
        ("big", 2001, "pop", 5000.0),
        ("big", 2001, "gdp", 8.0),
        ("small", 2001, "pop", 1000.0),
        ("small", 2001, "gdp", 3.0),
    ]);
    let cfg = MarimekkoConfig::new("pop", &["gdp"]);
    let plot = Bounds::new(0.0, 0.0, 1000.0, 500.0);
    let layout = compute(&t, &cfg, plot).unwrap();

    let names: Vec<&str> = layout
        .placed_items
        .iter()
        .map(|p| p.item.entity_name.as_str())
        .collect();
    assert_eq!(names, ["big", "small", "medium"]);

    let medium = &layout.placed_items[2];
    assert!(medium.item.bars.is_empty());
    match medium.item.render_bars(cfg.no_data_height).as_slice() {
        [Bar::BarPlaceholder(ph)] => assert_eq!(ph.height, cfg.no_data_height),
        other => panic!("expected one placeholder, got {other:?}"),
    }

    let placeholder = layout
        .rects
        .iter()
        .find(|r| r.kind == RectKind::Placeholder)
        .unwrap();
    assert_eq!(placeholder.bounds.height, cfg.no_data_height);
    assert_eq!(placeholder.bounds.bottom(), plot.bottom());

    let region = layout.no_data.as_ref().unwrap();
    assert_eq!(region.label, NO_DATA_LABEL);
    assert_eq!(region.first_index, 2);
    assert_eq!(region.entity_count, 1);
    assert!((region.bounds.x - 600.0).abs() < 1e-9);
    assert!((region.bounds.right() - 1000.0).abs() < 1e-9);

    let banner = layout
        .rects
        .iter()
        .find(|r| r.kind == RectKind::NoDataBanner)
        .unwrap();
    assert_eq!(banner.z_index, Z_NO_DATA_BANNER);
}

#[test]
fn no_data_entities_trail_in_ascending_sort_too() {
    let t = table(&[
        ("none", 2000, "pop", 10.0),
        ("low", 2000, "pop", 10.0),
        ("low", 2000, "gdp", 1.0),
        ("high", 2000, "pop", 10.0),
        ("high", 2000, "gdp", 9.0),
    ]);
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.sort.sort_order = mekko_rs::SortOrder::Asc;
    let layout = compute(&t, &cfg, Bounds::new(0.0, 0.0, 300.0, 100.0)).unwrap();
    let names: Vec<&str> = layout
        .placed_items
        .iter()
        .map(|p| p.item.entity_name.as_str())
        .collect();
    assert_eq!(names, ["low", "high", "none"]);
}

#[test]
fn banner_can_be_turned_off() {
    let t = table(&[
        ("a", 2000, "pop", 1.0),
        ("a", 2000, "gdp", 1.0),
        ("b", 2000, "pop", 1.0),
    ]);
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.show_no_data_area = false;
    let layout = compute(&t, &cfg, Bounds::new(0.0, 0.0, 100.0, 100.0)).unwrap();
    assert!(layout.no_data.is_none());
    assert!(layout.rects.iter().all(|r| r.kind != RectKind::NoDataBanner));
    assert!(layout.rects.iter().any(|r| r.kind == RectKind::Placeholder));
}

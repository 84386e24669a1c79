use mekko_rs::models::Observation;
use mekko_rs::{Bounds, MarimekkoConfig, ScaleType, Table, compute};

fn table(rows: &[(&str, i32, &str, f64)]) -> Table {
    Table::from_observations(
        rows.iter()
            .map(|(e, t, c, v)| Observation::number(e, *t, c, *v)),
    )
}

fn three_countries() -> Table {
    table(&[
        ("medium", 2001, "pop", 4000.0),
        ("medium", 2001, "gdp", 4.0),
        ("big", 2001, "pop", 5000.0),
        ("big", 2001, "gdp", 8.0),
        ("small", 2001, "pop", 1000.0),
        ("small", 2001, "gdp", 3.0),
    ])
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1.0
}

#[test]
fn columns_sorted_by_total_and_proportional() {
    let plot = Bounds::new(0.0, 0.0, 1000.0, 500.0);
    let cfg = MarimekkoConfig::new("pop", &["gdp"]);
    let layout = compute(&three_countries(), &cfg, plot).unwrap();

    let names: Vec<&str> = layout
        .placed_items
        .iter()
        .map(|p| p.item.entity_name.as_str())
        .collect();
    assert_eq!(names, ["big", "medium", "small"]);
    assert_eq!(layout.end_time, 2001);

    let xs: Vec<f64> = layout.placed_items.iter().map(|p| p.x_position).collect();
    assert!(approx(xs[0], 0.0));
    assert!(approx(xs[1], 500.0));
    assert!(approx(xs[2], 900.0));
}

#[test]
fn columns_are_contiguous_and_fill_the_range() {
    let plot = Bounds::new(40.0, 10.0, 800.0, 400.0);
    let cfg = MarimekkoConfig::new("pop", &["gdp"]);
    let layout = compute(&three_countries(), &cfg, plot).unwrap();

    assert_eq!(layout.placed_items[0].x_position, 0.0);
    for pair in layout.placed_items.windows(2) {
        assert!((pair[0].right() - pair[1].x_position).abs() < 1e-9);
    }
    let last = layout.placed_items.last().unwrap();
    assert!((last.right() - plot.width).abs() < 1e-6);

    // Rects are in absolute pixels, offset by the plot origin.
    let first_rect = &layout.rects[0];
    assert_eq!(first_rect.bounds.x, plot.x);
    assert!((first_rect.bounds.bottom() - plot.bottom()).abs() < 1e-9);
}

#[test]
fn zero_x_value_gives_zero_width_column() {
    let t = table(&[
        ("a", 2000, "pop", 10.0),
        ("a", 2000, "gdp", 1.0),
        ("b", 2000, "pop", 0.0),
        ("b", 2000, "gdp", 2.0),
    ]);
    let layout = compute(
        &t,
        &MarimekkoConfig::new("pop", &["gdp"]),
        Bounds::new(0.0, 0.0, 100.0, 100.0),
    )
    .unwrap();
    let b = layout
        .placed_items
        .iter()
        .find(|p| p.item.entity_name == "b")
        .unwrap();
    assert_eq!(b.bar_width, 0.0);
}

#[test]
fn log_axis_keeps_order_and_contiguity() {
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.x_scale = ScaleType::Log;
    let plot = Bounds::new(0.0, 0.0, 1000.0, 500.0);
    let layout = compute(&three_countries(), &cfg, plot).unwrap();

    assert_eq!(layout.x_axis.scale_type, ScaleType::Log);
    assert!(layout.x_axis.domain.0 > 0.0);
    let names: Vec<&str> = layout
        .placed_items
        .iter()
        .map(|p| p.item.entity_name.as_str())
        .collect();
    assert_eq!(names, ["big", "medium", "small"]);
    assert_eq!(layout.placed_items[0].x_position, 0.0);
    for pair in layout.placed_items.windows(2) {
        assert!((pair[0].right() - pair[1].x_position).abs() < 1e-9);
    }
    assert!(layout.placed_items.iter().all(|p| p.bar_width > 0.0));
    let last = layout.placed_items.last().unwrap();
    assert!(last.right() <= plot.width + 1e-9);
    assert!((last.right() - plot.width).abs() < 1e-6);
    assert!(layout.rects.iter().all(|r| r.bounds.right() <= plot.right() + 1e-6));
}

#[test]
fn log_axis_with_a_single_entity_fills_the_plot() {
    let t = table(&[("only", 2000, "pop", 42.0), ("only", 2000, "gdp", 1.0)]);
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.x_scale = ScaleType::Log;
    let layout = compute(&t, &cfg, Bounds::new(0.0, 0.0, 300.0, 100.0)).unwrap();
    assert!((layout.placed_items[0].bar_width - 300.0).abs() < 1e-6);
}

#[test]
fn same_inputs_give_identical_layouts() {
    let plot = Bounds::new(0.0, 0.0, 640.0, 480.0);
    let cfg = MarimekkoConfig::new("pop", &["gdp"]);
    let t = three_countries();
    let a = compute(&t, &cfg, plot).unwrap();
    let b = compute(&t, &cfg, plot).unwrap();
    assert_eq!(a, b);
}

#[test]
fn focus_sets_paint_order() {
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.focused_entities = vec!["small".into()];
    let layout = compute(
        &three_countries(),
        &cfg,
        Bounds::new(0.0, 0.0, 1000.0, 500.0),
    )
    .unwrap();

    let order: Vec<&str> = layout
        .rects_in_paint_order()
        .iter()
        .filter_map(|r| r.entity_name.as_deref())
        .collect();
    assert_eq!(order.last(), Some(&"small"));
    let small = layout
        .placed_items
        .iter()
        .find(|p| p.item.entity_name == "small")
        .unwrap();
    assert!(small.item.focus);
    assert!(
        layout
            .placed_items
            .iter()
            .filter(|p| p.item.entity_name != "small")
            .all(|p| p.z_index < small.z_index)
    );
}

#[test]
fn selection_restricts_entities() {
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.selected_entities = Some(vec!["big".into(), "small".into()]);
    let layout = compute(
        &three_countries(),
        &cfg,
        Bounds::new(0.0, 0.0, 600.0, 300.0),
    )
    .unwrap();
    assert_eq!(layout.placed_items.len(), 2);
    // big 5000 of 6000
    assert!(approx(layout.placed_items[1].x_position, 500.0));
}

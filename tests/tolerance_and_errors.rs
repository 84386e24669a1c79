use mekko_rs::models::Observation;
use mekko_rs::summary::entity_summaries;
use mekko_rs::{
    Bounds, ColumnDef, LayoutError, MarimekkoConfig, Table, ToleranceStrategy, compute,
};

fn table(rows: &[(&str, i32, &str, f64)]) -> Table {
    Table::from_observations(
        rows.iter()
            .map(|(e, t, c, v)| Observation::number(e, *t, c, *v)),
    )
}

fn plot() -> Bounds {
    Bounds::new(0.0, 0.0, 400.0, 200.0)
}

fn gappy() -> Table {
    table(&[
        ("A", 2000, "pop", 10.0),
        ("A", 2000, "gdp", 1.0),
        ("B", 1998, "pop", 30.0),
        ("B", 2003, "gdp", 2.0),
    ])
}

#[test]
fn entities_outside_tolerance_are_dropped() {
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.end_time = Some(2000);
    let layout = compute(&gappy(), &cfg, plot()).unwrap();
    assert_eq!(layout.placed_items.len(), 1);
    assert_eq!(layout.placed_items[0].item.entity_name, "A");
}

#[test]
fn column_tolerance_pulls_in_nearby_years() {
    let t = gappy()
        .with_column(ColumnDef::new("pop").with_tolerance(2))
        .with_column(ColumnDef::new("gdp").with_tolerance(3));
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.end_time = Some(2000);
    let layout = compute(&t, &cfg, plot()).unwrap();

    let b = layout
        .placed_items
        .iter()
        .find(|p| p.item.entity_name == "B")
        .unwrap();
    assert_eq!(b.item.x_point.as_ref().unwrap().time, 1998);
    assert_eq!(b.item.bars[0].y_point.time, 2003);

    let summaries = entity_summaries(&layout);
    let sb = summaries.iter().find(|s| s.entity == "B").unwrap();
    assert!(sb.interpolated);
    assert_eq!(sb.x_share, Some(0.75));
    let sa = summaries.iter().find(|s| s.entity == "A").unwrap();
    assert!(!sa.interpolated);
}

#[test]
fn backwards_strategy_ignores_later_years() {
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.end_time = Some(2000);
    cfg.tolerance = Some(5);
    cfg.tolerance_strategy = ToleranceStrategy::Backwards;
    let layout = compute(&gappy(), &cfg, plot()).unwrap();
    let b = layout
        .placed_items
        .iter()
        .find(|p| p.item.entity_name == "B")
        .unwrap();
    // x from 1998 is fine, gdp only exists in 2003
    assert!(b.item.bars.is_empty());
}

#[test]
fn end_time_defaults_to_latest_x_time() {
    let t = table(&[
        ("A", 1990, "pop", 1.0),
        ("A", 1995, "pop", 2.0),
        ("A", 1995, "gdp", 3.0),
    ]);
    let layout = compute(&t, &MarimekkoConfig::new("pop", &["gdp"]), plot()).unwrap();
    assert_eq!(layout.end_time, 1995);
}

#[test]
fn missing_x_column() {
    let mut cfg = MarimekkoConfig::default();
    cfg.y_columns = vec!["gdp".into()];
    let err = compute(&gappy(), &cfg, plot()).unwrap_err();
    assert_eq!(err, LayoutError::MissingXColumn);
    assert_eq!(err.reason(), "Missing X column");
}

#[test]
fn missing_y_column() {
    let cfg = MarimekkoConfig::new("pop", &[]);
    let err = compute(&gappy(), &cfg, plot()).unwrap_err();
    assert_eq!(err, LayoutError::MissingYColumn);
}

#[test]
fn unknown_column() {
    let cfg = MarimekkoConfig::new("pop", &["nope"]);
    let err = compute(&gappy(), &cfg, plot()).unwrap_err();
    assert_eq!(err, LayoutError::UnknownColumn("nope".into()));
}

#[test]
fn no_matching_data() {
    let mut cfg = MarimekkoConfig::new("pop", &["gdp"]);
    cfg.end_time = Some(1900);
    let err = compute(&gappy(), &cfg, plot()).unwrap_err();
    assert_eq!(err, LayoutError::NoMatchingData);
    assert_eq!(err.reason(), "No matching data");
}

#[test]
fn no_y_values_at_all_is_no_matching_data() {
    let t = table(&[("A", 2000, "pop", 1.0), ("B", 2000, "gdp", 1.0)]);
    let err = compute(&t, &MarimekkoConfig::new("pop", &["gdp"]), plot()).unwrap_err();
    assert_eq!(err, LayoutError::NoMatchingData);
}

#[test]
fn invalid_bounds_and_config() {
    let cfg = MarimekkoConfig::new("pop", &["gdp"]);
    let err = compute(&gappy(), &cfg, Bounds::new(0.0, 0.0, 0.0, 100.0)).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidBounds { .. }));

    let mut cfg = cfg;
    cfg.no_data_height = -1.0;
    let err = compute(&gappy(), &cfg, plot()).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidConfig(_)));
}

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use mekko_rs::{
    MarimekkoConfig, MarimekkoLayout, ScaleType, SortBy, SortOrder, ToleranceStrategy, compute,
};
use mekko_rs::{render, storage, summary};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "mekko",
    version,
    about = "Lay out, render & summarize Marimekko (variable-width stacked bar) charts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute the layout and draw it (and optionally export it).
    Render(RenderArgs),
    /// Compute the layout and print one line per placed entity.
    Summary(SummaryArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    Total,
    Column,
    Name,
    Custom,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OrderArg {
    Asc,
    Desc,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum StrategyArg {
    Closest,
    Backwards,
    Forwards,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Input table (.csv wide/long or .json observations).
    input: PathBuf,
    /// JSON config file; command-line flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// JSON array of column definitions (name, unit, tolerance, color).
    #[arg(long)]
    columns: Option<PathBuf>,
    /// Column used for column widths.
    #[arg(short, long)]
    x: Option<String>,
    /// Stacked columns separated by comma or semicolon, bottom first.
    #[arg(short, long)]
    y: Option<String>,
    /// Categorical column used to color entities.
    #[arg(long)]
    color: Option<String>,
    /// Time to show (defaults to the latest time of the x column).
    #[arg(short = 't', long)]
    time: Option<i32>,
    /// Tolerance in time units applied to every column.
    #[arg(long)]
    tolerance: Option<u32>,
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    /// Series used by `--sort column`.
    #[arg(long)]
    sort_column: Option<String>,
    #[arg(long, value_enum)]
    order: Option<OrderArg>,
    /// Use a logarithmic x axis.
    #[arg(long, default_value_t = false)]
    log_x: bool,
    /// Only chart these entities (comma or semicolon separated).
    #[arg(long)]
    entities: Option<String>,
    /// Draw these entities in front, the rest faded.
    #[arg(long)]
    focus: Option<String>,
    /// Width of the chart (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the chart (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct RenderArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Output chart path (.svg or .png).
    #[arg(short, long)]
    out: PathBuf,
    #[arg(long, default_value = "")]
    title: String,
    /// Locale for tick labels (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
    /// Also write the full layout as JSON.
    #[arg(long)]
    layout_json: Option<PathBuf>,
    /// Also write placed columns as CSV.
    #[arg(long)]
    placed_csv: Option<PathBuf>,
    /// Print the per-entity summary to stdout.
    #[arg(long, default_value_t = false)]
    stats: bool,
}

#[derive(Args, Debug)]
struct SummaryArgs {
    #[command(flatten)]
    chart: ChartArgs,
    /// Locale for x values (en, de, fr, es, it, pt, nl).
    #[arg(long, default_value = "en")]
    locale: String,
}

fn fmt_opt(v: Option<f64>) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let s = format!("{:.4}", x);
            s.trim_end_matches('0').trim_end_matches('.').to_string()
        }
        _ => "NA".to_string(),
    }
}

fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

fn build_config(args: &ChartArgs) -> Result<MarimekkoConfig> {
    let mut cfg = match &args.config {
        Some(p) => MarimekkoConfig::from_json_file(p)?,
        None => MarimekkoConfig::default(),
    };
    if let Some(x) = &args.x {
        cfg.x_column = Some(x.clone());
    }
    if let Some(y) = &args.y {
        cfg.y_columns = parse_list(y);
    }
    if let Some(c) = &args.color {
        cfg.color_column = Some(c.clone());
    }
    if args.time.is_some() {
        cfg.end_time = args.time;
    }
    if args.tolerance.is_some() {
        cfg.tolerance = args.tolerance;
    }
    if let Some(s) = args.strategy {
        cfg.tolerance_strategy = match s {
            StrategyArg::Closest => ToleranceStrategy::Closest,
            StrategyArg::Backwards => ToleranceStrategy::Backwards,
            StrategyArg::Forwards => ToleranceStrategy::Forwards,
        };
    }
    if let Some(s) = args.sort {
        cfg.sort.sort_by = match s {
            SortArg::Total => SortBy::Total,
            SortArg::Column => SortBy::Column,
            SortArg::Name => SortBy::EntityName,
            SortArg::Custom => SortBy::Custom,
        };
    }
    if let Some(c) = &args.sort_column {
        cfg.sort.sort_column_slug = Some(c.clone());
    }
    if let Some(o) = args.order {
        cfg.sort.sort_order = match o {
            OrderArg::Asc => SortOrder::Asc,
            OrderArg::Desc => SortOrder::Desc,
        };
    }
    if args.log_x {
        cfg.x_scale = ScaleType::Log;
    }
    if let Some(e) = &args.entities {
        cfg.selected_entities = Some(parse_list(e));
    }
    if let Some(f) = &args.focus {
        cfg.focused_entities = parse_list(f);
    }
    Ok(cfg)
}

fn layout_for(args: &ChartArgs) -> Result<MarimekkoLayout> {
    let mut table = storage::load_table(&args.input)?;
    if let Some(p) = &args.columns {
        storage::apply_column_defs(&mut table, p)?;
    }
    let cfg = build_config(args)?;
    let plot = render::plot_bounds(args.width, args.height);
    let layout = compute(&table, &cfg, plot)
        .with_context(|| format!("cannot lay out {}", args.input.display()))?;
    Ok(layout)
}

fn print_summary(layout: &MarimekkoLayout, locale_tag: &str) {
    let locale = render::map_locale(locale_tag);
    println!("time={}", layout.end_time);
    for s in summary::entity_summaries(layout) {
        println!(
            "{}  x={} share={} y_total={} bars={} pos={} width={}{}",
            s.entity,
            s.x_value
                .map(|v| render::format_tick(v, locale))
                .unwrap_or_else(|| "NA".to_string()),
            fmt_opt(s.x_share),
            fmt_opt(Some(s.y_total)),
            s.bar_count,
            fmt_opt(Some(s.x_position)),
            fmt_opt(Some(s.bar_width)),
            if s.interpolated { "  (interpolated)" } else { "" }
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Summary(args) => {
            let layout = layout_for(&args.chart)?;
            print_summary(&layout, &args.locale);
            Ok(())
        }
    }
}

fn cmd_render(args: RenderArgs) -> Result<()> {
    let layout = layout_for(&args.chart)?;

    render::render_layout(
        &layout,
        &args.out,
        args.chart.width,
        args.chart.height,
        &args.title,
        &args.locale,
    )?;
    eprintln!("Wrote chart to {}", args.out.display());

    if let Some(path) = args.layout_json.as_ref() {
        storage::save_layout_json(&layout, path)?;
        eprintln!("Saved layout to {}", path.display());
    }
    if let Some(path) = args.placed_csv.as_ref() {
        storage::save_placed_csv(&layout, path)?;
        eprintln!(
            "Saved {} columns to {}",
            layout.placed_items.len(),
            path.display()
        );
    }
    if args.stats {
        print_summary(&layout, &args.locale);
    }
    Ok(())
}

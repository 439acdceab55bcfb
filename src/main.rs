use digital_fov::config::Config;
use digital_fov::layout::{self, Layout};
use digital_fov::query_log::QueryLog;
use digital_fov::{Fov, Point, VisibilityMap};
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
Usage:
  digital-fov [LAYOUT]                    field of vision from the layout's observer
  digital-fov [LAYOUT] --los X1 Y1 X2 Y2  line of sight between two cells
  digital-fov --test [DIR]                check every layout fixture in DIR";

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Visible open cells, the form layout fixtures record
fn visible_open_cells(layout: &Layout, out: &VisibilityMap) -> HashSet<Point> {
    out.iter_visible()
        .filter(|p| !layout.grid.is_blocked(p.x, p.y))
        .collect()
}

/// Check every layout fixture in a directory; returns the number of failures
fn run_fixtures(dir: &Path, fov: &Fov, default_radius: i32) -> Result<usize, Box<dyn Error>> {
    let mut passed = 0;
    let mut failures = Vec::new();
    let max_radius = fov.options().max_radius;
    let mut out = VisibilityMap::new(0);

    let mut entries: Vec<_> = fs::read_dir(dir)?.filter_map(Result::ok).collect();
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() || path.extension().and_then(|s| s.to_str()) == Some("md") {
            continue;
        }
        let test_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("unknown").to_string();

        let layout = match layout::load(&path) {
            Ok(layout) => layout,
            Err(e) => {
                println!("✗ {} (parse error: {})", test_name, e);
                failures.push(test_name);
                continue;
            }
        };
        let observer = match layout.observer {
            Some(p) => p,
            None => {
                println!("✗ {} (no observer)", test_name);
                failures.push(test_name);
                continue;
            }
        };

        let radius = match layout.radius_within(default_radius, max_radius) {
            Ok(radius) => radius,
            Err(e) => {
                println!("✗ {} ({})", test_name, e);
                failures.push(test_name);
                continue;
            }
        };
        out.reshape(radius);
        if let Err(e) = fov.compute(&layout.grid, observer, radius, &mut out) {
            println!("✗ {} ({})", test_name, e);
            failures.push(test_name);
            continue;
        }

        let actual = visible_open_cells(&layout, &out);
        let missing = layout.expected_visible.difference(&actual).count();
        let extra = actual.difference(&layout.expected_visible).count();
        if missing == 0 && extra == 0 {
            passed += 1;
            println!("✓ {}", test_name);
        } else {
            println!("✗ {} (missing: {}, extra: {})", test_name, missing, extra);
            failures.push(test_name);
        }
    }

    println!("\n========================================");
    println!("Layout Results: {} passed, {} failed", passed, failures.len());
    println!("========================================");
    if !failures.is_empty() {
        println!("\nFailed layouts:");
        for name in &failures {
            println!("  - {}", name);
        }
    }

    Ok(failures.len())
}

fn parse_coords(args: &[String]) -> Result<(Point, Point), Box<dyn Error>> {
    if args.len() != 4 {
        return Err(format!("--los needs 4 coordinates\n{}", USAGE).into());
    }
    let mut values = [0i32; 4];
    for (value, arg) in values.iter_mut().zip(args) {
        *value = arg.parse().map_err(|_| format!("bad coordinate {:?}", arg))?;
    }
    Ok((Point::new(values[0], values[1]), Point::new(values[2], values[3])))
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = Config::load();
    init_tracing(&config);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.first().map(String::as_str) == Some("--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let fov = Fov::new(config.fov.options());

    if args.first().map(String::as_str) == Some("--test") {
        let dir = args.get(1).map(String::as_str).unwrap_or("./test_data/standard");
        let failed = run_fixtures(Path::new(dir), &fov, config.fov.radius)?;
        if failed > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    let (layout_path, rest) = match args.first() {
        Some(first) if !first.starts_with("--") => (first.clone(), &args[1..]),
        _ => (config.layout.path.clone(), &args[..]),
    };
    let layout = layout::load(&layout_path)?;
    info!(path = %layout_path, cols = layout.grid.cols, rows = layout.grid.rows, "layout loaded");

    let mut log = QueryLog::new();

    if rest.first().map(String::as_str) == Some("--los") {
        let (from, to) = parse_coords(&rest[1..])?;
        let visible = log.los(&layout.grid, from, to)?;
        println!(
            "({}, {}) {} ({}, {})",
            to.x,
            to.y,
            if visible { "is visible from" } else { "is hidden from" },
            from.x,
            from.y
        );
    } else {
        let observer = match (config.observer.x, config.observer.y, layout.observer) {
            (Some(x), Some(y), _) => Point::new(x, y),
            (_, _, Some(p)) => p,
            _ => return Err("layout has no observer 's' and config sets none".into()),
        };
        let radius = layout.radius_within(config.fov.radius, fov.options().max_radius)?;
        let mut out = VisibilityMap::new(radius);
        log.fov(&fov, &layout.grid, observer, radius, &mut out)?;

        print!("{}", layout::render(&layout.grid, &out));
        println!(
            "Observer: ({}, {})  Radius: {}  Visible cells: {}",
            observer.x,
            observer.y,
            radius,
            out.count_visible()
        );
    }

    if config.logging.enable_query_log {
        match log.save_to_file(&config.logging.query_log_path) {
            Ok(()) => info!(path = %config.logging.query_log_path, "query log saved"),
            Err(e) => warn!(error = %e, "failed to save query log"),
        }
        println!("{}", log.summary());
    }

    Ok(())
}

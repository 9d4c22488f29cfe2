use anyhow::{Context, Result};
use geoipmap::{AddressList, GeoStore, MatchReport, Matcher, Strategy, TracingObserver};
use serde_json::json;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::cli_utils::{format_number, GeometryArgs};

pub struct MatchOptions {
    pub iplist: PathBuf,
    pub geodb: PathBuf,
    pub geometry: GeometryArgs,
    pub sequential: bool,
    pub splits: Option<i64>,
    pub workers: Option<i64>,
    pub format: String,
    pub show_stats: bool,
}

pub fn cmd_match(opts: MatchOptions) -> Result<()> {
    let format = opts.format.to_lowercase();
    if !matches!(format.as_str(), "json" | "csv" | "text" | "summary") {
        anyhow::bail!(
            "Invalid format: '{}'. Must be: json, csv, text, or summary",
            opts.format
        );
    }

    let geometry = opts.geometry.to_geometry()?;
    let strategy = Strategy::from_selection(opts.sequential, opts.splits, opts.workers)?;

    if opts.show_stats {
        eprintln!("[INFO] Mode: {}", strategy.effective());
        eprintln!(
            "[INFO] Map: {}x{} px, west {} east {} south {}",
            geometry.width(),
            geometry.height(),
            geometry.west_deg(),
            geometry.east_deg(),
            geometry.south_deg()
        );
    }

    let load_start = Instant::now();
    let store = GeoStore::load(&opts.geodb)
        .with_context(|| format!("Failed to load database: {}", opts.geodb.display()))?;
    let addresses = AddressList::load(&opts.iplist)
        .with_context(|| format!("Failed to load address list: {}", opts.iplist.display()))?;
    let load_time = load_start.elapsed();

    if opts.show_stats {
        eprintln!(
            "[INFO] Loaded database: {} ({} records)",
            opts.geodb.display(),
            format_number(store.len())
        );
        eprintln!(
            "[INFO] Loaded address list: {} ({} entries)",
            opts.iplist.display(),
            format_number(addresses.len())
        );
        eprintln!("[INFO] Load time: {:.2}ms", load_time.as_secs_f64() * 1000.0);
    }

    let report = Matcher::new(&store, &addresses, geometry)
        .strategy(strategy)
        .observer(Arc::new(TracingObserver))
        .run_with_stats()
        .context("Matching failed")?;

    if opts.show_stats {
        print_stats(&report);
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match format.as_str() {
        "summary" => {
            let summary = json!({
                "strategy": report.strategy,
                "stats": report.stats,
                "elapsed_ms": report.elapsed.as_secs_f64() * 1000.0,
                "map": geometry,
                "marker_radius": geometry.default_marker_radius(),
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
        }
        "csv" => {
            let mut writer = csv::Writer::from_writer(&mut out);
            writer.write_record(["x", "y"])?;
            for point in report.coordinates.into_sorted_vec() {
                writer.serialize((point.x, point.y))?;
            }
            writer.flush()?;
        }
        "text" => {
            for point in report.coordinates.into_sorted_vec() {
                writeln!(out, "{}\t{}", point.x, point.y)?;
            }
        }
        _ => {
            for point in report.coordinates.into_sorted_vec() {
                writeln!(out, "{}", serde_json::to_string(&point)?)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn print_stats(report: &MatchReport) {
    let stats = &report.stats;
    eprintln!();
    eprintln!("[INFO] === Matching Complete ===");
    eprintln!("[INFO] Strategy: {}", report.strategy);
    eprintln!("[INFO] Partitions: {}", stats.partitions);
    eprintln!(
        "[INFO] Records scanned: {}",
        format_number(stats.records_scanned)
    );
    eprintln!(
        "[INFO] Addresses scanned: {} ({} invalid, skipped)",
        format_number(stats.addresses_scanned),
        format_number(stats.invalid_addresses)
    );
    eprintln!("[INFO] Pairs tested: {}", format_number(stats.pairs_tested));
    eprintln!(
        "[INFO] Matching pairs: {} ({:.4}%)",
        format_number(stats.matching_pairs),
        stats.hit_rate()
    );
    eprintln!(
        "[INFO] Distinct coordinates: {}",
        format_number(stats.distinct_coordinates)
    );
    eprintln!(
        "[INFO] Match time: {:.2}ms",
        report.elapsed.as_secs_f64() * 1000.0
    );
}

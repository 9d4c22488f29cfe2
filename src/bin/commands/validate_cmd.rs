use anyhow::Result;
use geoipmap::GeoStore;
use serde_json::json;
use std::path::PathBuf;
use std::time::Instant;

use crate::cli_utils::format_number;

pub fn cmd_validate(database: PathBuf, json_output: bool) -> Result<()> {
    let start = Instant::now();
    let loaded = GeoStore::load(&database);
    let duration = start.elapsed();

    // Records at or beyond a pole project to a non-finite y
    let (records, polar) = match &loaded {
        Ok(store) => (
            store.len(),
            store
                .records()
                .iter()
                .filter(|r| r.lat.is_nan() || r.lat.abs() >= 90.0 || !r.lon.is_finite())
                .count(),
        ),
        Err(_) => (0, 0),
    };

    if json_output {
        let output = json!({
            "database": database.display().to_string(),
            "is_valid": loaded.is_ok(),
            "duration_ms": duration.as_millis(),
            "error": loaded.as_ref().err().map(|e| e.to_string()),
            "records": records,
            "unprojectable_records": polar,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Validating: {}", database.display());
        println!();

        match &loaded {
            Ok(_) => {
                println!("Statistics:");
                println!("  Records: {}", format_number(records));
                println!("  Load time: {:.2}ms", duration.as_secs_f64() * 1000.0);
                println!();
                if polar > 0 {
                    println!(
                        "⚠️  {} record(s) have a pole or non-finite location and can't be projected",
                        format_number(polar)
                    );
                    println!();
                }
                println!("✅ VALIDATION PASSED");
            }
            Err(e) => {
                println!("❌ ERROR: {}", e);
                println!();
                println!("❌ VALIDATION FAILED");
            }
        }
    }

    if loaded.is_ok() {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

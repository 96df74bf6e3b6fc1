//! Writes `sample_data.csv`: a small sales table with a categorical region
//! column, a few exact duplicate rows and scattered numeric gaps, so every
//! dashboard mode has something to show.

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

const OUTPUT_PATH: &str = "sample_data.csv";
const ROWS_PER_REGION: usize = 40;
const DUPLICATES: usize = 5;
const GAP_PROBABILITY: f64 = 0.05;

/// Region name and mean unit price.
const REGIONS: [(&str, f64); 4] = [("North", 12.0), ("South", 9.5), ("East", 11.0), ("West", 14.0)];

fn main() -> Result<()> {
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 1.5).context("building noise distribution")?;
    let mut rows: Vec<[String; 5]> = Vec::new();

    for (region, base_price) in REGIONS {
        for _ in 0..ROWS_PER_REGION {
            let advertising: f64 = rng.random_range(1.0..20.0);
            let price = base_price + noise.sample(&mut rng);
            // units respond to advertising and price, plus noise
            let units = (120.0 + 6.0 * advertising - 4.0 * price + 3.0 * noise.sample(&mut rng))
                .round()
                .max(0.0);
            let revenue = units * price;

            rows.push([
                region.to_string(),
                format!("{advertising:.2}"),
                format!("{price:.2}"),
                format!("{units}"),
                format!("{revenue:.2}"),
            ]);
        }
    }

    // Punch gaps into the numeric fields.
    for row in &mut rows {
        for field in &mut row[1..] {
            if rng.random_bool(GAP_PROBABILITY) {
                field.clear();
            }
        }
    }

    // Repeat a few rows verbatim.
    for _ in 0..DUPLICATES {
        let i = rng.random_range(0..rows.len());
        let copy = rows[i].clone();
        rows.push(copy);
    }

    let mut writer = csv::Writer::from_path(OUTPUT_PATH)
        .with_context(|| format!("creating {OUTPUT_PATH}"))?;
    writer.write_record(["region", "advertising", "price", "units", "revenue"])?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush().context("flushing CSV")?;

    println!(
        "Wrote {} rows ({} duplicates) to {OUTPUT_PATH}",
        rows.len(),
        DUPLICATES
    );
    Ok(())
}

//! Writes a synthetic washing-machine catalog as `sample_catalog.csv` and
//! `sample_catalog.parquet` for trying the dashboard without real data.

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{BooleanArray, Float64Array, StringArray, UInt32Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

use washer_insights::data::model::{Heater, ProductRecord};

const FUNCTION_TYPES: [&str; 4] = [
    "Fully Automatic Front Load",
    "Fully Automatic Top Load",
    "Semi Automatic Top Load",
    "Fully Automatic Front Load with Dryer",
];

/// (brand, model prefix, price multiplier)
const BRANDS: [(&str, &str, f64); 6] = [
    ("SAMSUNG", "WW", 1.10),
    ("LG", "FHM", 1.15),
    ("WHIRLPOOL", "WM", 0.95),
    ("IFB", "Senator", 1.25),
    ("HAIER", "HW", 0.85),
    ("ONIDA", "T", 0.75),
];

const CAPACITIES_LB: [f64; 6] = [13.2, 14.3, 15.4, 16.5, 17.6, 19.8];
const SPIN_SPEEDS: [f64; 5] = [700.0, 800.0, 1000.0, 1200.0, 1400.0];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn generate_listing(
    rng: &mut SimpleRng,
    brand: &str,
    prefix: &str,
    factor: f64,
    n: usize,
) -> ProductRecord {
    let capacity_lb = *rng.pick(&CAPACITIES_LB);
    let spin_rpm = *rng.pick(&SPIN_SPEEDS);
    let function_type = *rng.pick(&FUNCTION_TYPES);
    let front_load = function_type.contains("Front Load");
    let has_heater = if front_load && rng.next_f64() < 0.6 {
        Heater::Yes
    } else {
        Heater::No
    };

    let mut price = 60.0 + capacity_lb * 9.0 + (spin_rpm - 700.0) * 0.12;
    if front_load {
        price += 80.0;
    }
    if has_heater.is_yes() {
        price += 45.0;
    }
    price *= factor * rng.range(0.85, 1.15);

    ProductRecord {
        brand: brand.to_string(),
        model_name: format!("{prefix}{:03}{}", 60 + n * 7, capacity_lb.round() as u32),
        avg_price_usd: (price * 100.0).round() / 100.0,
        rating: (rng.range(3.6, 4.8) * 10.0).round() / 10.0,
        capacity_lb,
        spin_rpm,
        function_type: function_type.to_string(),
        has_heater,
        listings: rng.range(1.0, 60.0) as u32,
    }
}

fn write_csv(records: &[ProductRecord], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for r in records {
        writer.serialize(r).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(records: &[ProductRecord], path: &str) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("brand", DataType::Utf8, false),
        Field::new("model_name", DataType::Utf8, false),
        Field::new("avg_price_usd", DataType::Float64, false),
        Field::new("rating", DataType::Float64, false),
        Field::new("capacity_lb", DataType::Float64, false),
        Field::new("spin_rpm", DataType::Float64, false),
        Field::new("function_type", DataType::Utf8, false),
        Field::new("has_heater", DataType::Boolean, false),
        Field::new("listings", DataType::UInt32, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(records.iter().map(|r| r.brand.as_str()))),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.model_name.as_str()),
            )),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.avg_price_usd))),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.rating))),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.capacity_lb))),
            Arc::new(Float64Array::from_iter_values(records.iter().map(|r| r.spin_rpm))),
            Arc::new(StringArray::from_iter_values(
                records.iter().map(|r| r.function_type.as_str()),
            )),
            Arc::new(BooleanArray::from(
                records.iter().map(|r| r.has_heater.is_yes()).collect::<Vec<_>>(),
            )),
            Arc::new(UInt32Array::from_iter_values(records.iter().map(|r| r.listings))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rng = SimpleRng::new(42);

    let mut records = Vec::new();
    for &(brand, prefix, factor) in &BRANDS {
        for n in 0..12 {
            records.push(generate_listing(&mut rng, brand, prefix, factor, n));
        }
    }

    let csv_path = "sample_catalog.csv";
    let parquet_path = "sample_catalog.parquet";
    write_csv(&records, csv_path)?;
    log::info!("Wrote {csv_path}");
    write_parquet(&records, parquet_path)?;
    log::info!("Wrote {parquet_path}");

    println!(
        "Wrote {} listings from {} brands to {csv_path} and {parquet_path}",
        records.len(),
        BRANDS.len()
    );
    Ok(())
}

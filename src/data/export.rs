use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::model::{Heater, ProductRecord};

/// File name offered by the save dialog.
pub const DEFAULT_EXPORT_FILE: &str = "washing_machine_analysis.csv";

/// One exported table row: the listing plus its two headline metrics.
#[derive(Serialize)]
struct ExportRow<'a> {
    #[serde(rename = "Brand")]
    brand: &'a str,
    #[serde(rename = "Model")]
    model_name: &'a str,
    #[serde(rename = "Price (USD)")]
    price: String,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "Capacity (lb)")]
    capacity_lb: f64,
    #[serde(rename = "Spin RPM")]
    spin_rpm: f64,
    #[serde(rename = "Type")]
    function_type: &'a str,
    #[serde(rename = "Heater")]
    has_heater: Heater,
    #[serde(rename = "Listings")]
    listings: u32,
    /// Empty when the price is zero.
    #[serde(rename = "Value Score")]
    value_score: String,
    #[serde(rename = "Efficiency Rating")]
    efficiency_rating: String,
}

impl<'a> From<&'a ProductRecord> for ExportRow<'a> {
    fn from(r: &'a ProductRecord) -> Self {
        ExportRow {
            brand: &r.brand,
            model_name: &r.model_name,
            price: format!("{:.2}", r.avg_price_usd),
            rating: r.rating,
            capacity_lb: r.capacity_lb,
            spin_rpm: r.spin_rpm,
            function_type: &r.function_type,
            has_heater: r.has_heater,
            listings: r.listings,
            value_score: r.value_score().map(|v| format!("{v:.2}")).unwrap_or_default(),
            efficiency_rating: r
                .efficiency_rating()
                .map(|v| format!("{v:.0}"))
                .unwrap_or_default(),
        }
    }
}

/// Shape of a row when an export is read back.
#[derive(Deserialize)]
struct ImportRow {
    #[serde(rename = "Brand")]
    brand: String,
    #[serde(rename = "Model")]
    model_name: String,
    #[serde(rename = "Price (USD)")]
    price: f64,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "Capacity (lb)")]
    capacity_lb: f64,
    #[serde(rename = "Spin RPM")]
    spin_rpm: f64,
    #[serde(rename = "Type")]
    function_type: String,
    #[serde(rename = "Heater")]
    has_heater: Heater,
    #[serde(rename = "Listings")]
    listings: u32,
}

/// Write `rows` in table order. Text cells are quoted only when they contain a
/// delimiter, quote or newline.
pub fn write_csv<W: Write>(writer: W, rows: &[&ProductRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    for r in rows {
        wtr.serialize(ExportRow::from(*r))
            .with_context(|| format!("writing export row for {} {}", r.brand, r.model_name))?;
    }
    wtr.flush().context("flushing CSV export")?;
    Ok(())
}

/// Export to a file, logging the row count.
pub fn export_to_path(path: &Path, rows: &[&ProductRecord]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating export file {}", path.display()))?;
    write_csv(file, rows)?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Parse an export back into listings. The metric columns are ignored; they
/// are recomputed from the listing fields.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ProductRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line_num, result) in rdr.deserialize().enumerate() {
        let row: ImportRow =
            result.with_context(|| format!("export parse error at line {}", line_num + 2))?;
        records.push(ProductRecord {
            brand: row.brand,
            model_name: row.model_name,
            avg_price_usd: row.price,
            rating: row.rating,
            capacity_lb: row.capacity_lb,
            spin_rpm: row.spin_rpm,
            function_type: row.function_type,
            has_heater: row.has_heater,
            listings: row.listings,
        });
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    fn export(rows: &[&ProductRecord]) -> String {
        let mut buf = Vec::new();
        write_csv(&mut buf, rows).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn header_and_metric_columns() {
        let mut r = record("SAMSUNG", "WW70T", 200.0, 4.4);
        r.spin_rpm = 1200.0;
        r.capacity_lb = 16.0;
        let text = export(&[&r]);
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Brand,Model,Price (USD),Rating,Capacity (lb),Spin RPM,Type,Heater,Listings,Value Score,Efficiency Rating"
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("SAMSUNG,WW70T,200.00,4.4,"));
        assert!(row.ends_with(",No,10,2.20,75"));
    }

    #[test]
    fn delimiters_in_text_are_quoted() {
        let mut r = record("LG", "FHM1207, Steam", 249.0, 4.3);
        r.function_type = "Front Load, Inverter".to_string();
        let text = export(&[&r]);
        assert!(text.contains("\"FHM1207, Steam\""));
        assert!(text.contains("\"Front Load, Inverter\""));

        let back = read_csv(text.as_bytes()).unwrap();
        assert_eq!(back[0].model_name, "FHM1207, Steam");
        assert_eq!(back[0].function_type, "Front Load, Inverter");
    }

    #[test]
    fn export_file_reads_back() {
        let mut heated = record("LG", "Steam", 249.99, 4.3);
        heated.has_heater = Heater::Yes;
        heated.spin_rpm = 1400.0;
        let plain = record("IFB", "Promo", 0.0, 4.0);

        let path = std::env::temp_dir().join(format!(
            "washer-export-{}-{DEFAULT_EXPORT_FILE}",
            std::process::id()
        ));
        export_to_path(&path, &[&heated, &plain]).unwrap();
        let back = read_csv(std::fs::File::open(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back, vec![heated, plain]);
    }

    #[test]
    fn zero_price_writes_empty_value_score() {
        let r = record("IFB", "Promo", 0.0, 4.0);
        let text = export(&[&r]);
        let row = text.lines().nth(1).unwrap();
        // value score cell is empty, efficiency is still present
        assert!(row.ends_with(",10,,67"));
    }
}

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray, UInt32Array, UInt64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Catalog, Heater, ProductRecord};

/// Brands kept when no allow-list is configured.
pub const DEFAULT_BRANDS: [&str; 4] = ["SAMSUNG", "LG", "WHIRLPOOL", "IFB"];

const BRAND: &str = "brand";
const MODEL_NAME: &str = "model_name";
const PRICE: &str = "avg_price_usd";
const RATING: &str = "rating";
const CAPACITY: &str = "capacity_lb";
const SPIN: &str = "spin_rpm";
const FUNCTION_TYPE: &str = "function_type";
const HAS_HEATER: &str = "has_heater";
const LISTINGS: &str = "listings";

const REQUIRED_COLUMNS: [&str; 9] = [
    BRAND,
    MODEL_NAME,
    PRICE,
    RATING,
    CAPACITY,
    SPIN,
    FUNCTION_TYPE,
    HAS_HEATER,
    LISTINGS,
];

// ---------------------------------------------------------------------------
// Load options
// ---------------------------------------------------------------------------

/// Which brands survive loading. An empty allow-list keeps every brand.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub allowed_brands: Vec<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            allowed_brands: DEFAULT_BRANDS.iter().map(|b| b.to_string()).collect(),
        }
    }
}

impl LoadOptions {
    /// Options that keep every brand in the file.
    pub fn all_brands() -> Self {
        Self {
            allowed_brands: Vec::new(),
        }
    }

    pub fn accepts(&self, brand: &str) -> bool {
        self.allowed_brands.is_empty() || self.allowed_brands.iter().any(|b| b == brand)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a catalog from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the listing columns (the dashboard's native format)
/// * `.json`    – `[{ "brand": "LG", "model_name": "...", ... }, ...]`
/// * `.parquet` – one column per listing field
pub fn load_file(path: &Path, options: &LoadOptions) -> Result<Catalog> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening CSV {}", path.display()))?;
            load_csv(file, options)?
        }
        "json" => {
            let text = std::fs::read_to_string(path).context("reading JSON file")?;
            load_json(&text, options)?
        }
        "parquet" | "pq" => load_parquet(path, options)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::info!(
        "Loaded {} listings from {} (allow-list: {:?})",
        records.len(),
        path.display(),
        options.allowed_brands
    );
    Ok(Catalog::from_records(records))
}

// ---------------------------------------------------------------------------
// Shared row assembly
// ---------------------------------------------------------------------------

/// Cells of one row after numeric coercion, before validation.
struct RowFields {
    brand: String,
    model_name: String,
    avg_price_usd: f64,
    rating: f64,
    capacity_lb: f64,
    spin_rpm: f64,
    function_type: String,
    has_heater: Heater,
    listings: f64,
}

/// Apply the non-empty and allow-list rules. `None` means the row is dropped.
fn finish_row(fields: RowFields, row: usize, options: &LoadOptions) -> Option<ProductRecord> {
    if fields.brand.is_empty() || fields.model_name.is_empty() {
        log::warn!("Row {row}: missing brand or model name, skipped");
        return None;
    }
    if !options.accepts(&fields.brand) {
        return None;
    }
    Some(ProductRecord {
        brand: fields.brand,
        model_name: fields.model_name,
        avg_price_usd: fields.avg_price_usd,
        rating: fields.rating,
        capacity_lb: fields.capacity_lb,
        spin_rpm: fields.spin_rpm,
        function_type: fields.function_type,
        has_heater: fields.has_heater,
        listings: listings_from_f64(fields.listings),
    })
}

fn listings_from_f64(v: f64) -> u32 {
    if v.is_finite() && v > 0.0 {
        v.round().min(u32::MAX as f64) as u32
    } else {
        0
    }
}

/// Best-effort numeric coercion: strips a leading `$`, malformed → 0.
fn coerce_f64(raw: &str, row: usize, col: &str) -> f64 {
    let cleaned = raw.trim().trim_start_matches('$').trim();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            if !cleaned.is_empty() {
                log::debug!("Row {row}, {col}: '{raw}' is not a number, using 0");
            }
            0.0
        }
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row naming the listing columns (any order, extra
/// columns ignored). Short rows are tolerated; missing cells read as empty.
pub fn load_csv<R: Read>(reader: R, options: &LoadOptions) -> Result<Vec<ProductRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut idx = [0usize; 9];
    for (slot, col) in idx.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == col)
            .with_context(|| format!("CSV missing '{col}' column"))?;
    }
    let [brand, model, price, rating, capacity, spin, ftype, heater, listings] = idx;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let cell = |i: usize| record.get(i).unwrap_or("");

        let fields = RowFields {
            brand: cell(brand).to_string(),
            model_name: cell(model).to_string(),
            avg_price_usd: coerce_f64(cell(price), row_no, PRICE),
            rating: coerce_f64(cell(rating), row_no, RATING),
            capacity_lb: coerce_f64(cell(capacity), row_no, CAPACITY),
            spin_rpm: coerce_f64(cell(spin), row_no, SPIN),
            function_type: cell(ftype).to_string(),
            has_heater: Heater::parse_lenient(cell(heater)),
            listings: coerce_f64(cell(listings), row_no, LISTINGS),
        };
        records.extend(finish_row(fields, row_no, options));
    }

    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented):
///
/// ```json
/// [
///   { "brand": "LG", "model_name": "FHM1207", "avg_price_usd": "$249.99",
///     "rating": 4.3, "capacity_lb": 15.4, "spin_rpm": 1200,
///     "function_type": "Fully Automatic Front Load", "has_heater": "Yes",
///     "listings": 31 },
///   ...
/// ]
/// ```
///
/// Numbers may also arrive as strings; `has_heater` may be a boolean.
pub fn load_json(text: &str, options: &LoadOptions) -> Result<Vec<ProductRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, rec) in rows.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        let str_of = |col: &str| json_text(obj.get(col));
        let num = |col: &str| json_f64(obj.get(col), i, col);

        let has_heater = match obj.get(HAS_HEATER) {
            Some(JsonValue::Bool(true)) => Heater::Yes,
            other => Heater::parse_lenient(&json_text(other)),
        };

        let fields = RowFields {
            brand: str_of(BRAND),
            model_name: str_of(MODEL_NAME),
            avg_price_usd: num(PRICE),
            rating: num(RATING),
            capacity_lb: num(CAPACITY),
            spin_rpm: num(SPIN),
            function_type: str_of(FUNCTION_TYPE),
            has_heater,
            listings: num(LISTINGS),
        };
        records.extend(finish_row(fields, i, options));
    }

    Ok(records)
}

fn json_text(val: Option<&JsonValue>) -> String {
    match val {
        Some(JsonValue::String(s)) => s.trim().to_string(),
        Some(JsonValue::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

fn json_f64(val: Option<&JsonValue>, row: usize, col: &str) -> f64 {
    match val {
        Some(JsonValue::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(JsonValue::String(s)) => coerce_f64(s, row, col),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per listing field.
///
/// Numeric columns may be any of Int32/Int64/UInt32/UInt64/Float32/Float64 or
/// strings; `has_heater` may be Utf8 or Boolean. Works with files written by
/// Pandas (`df.to_parquet()`) and Polars (`df.write_parquet()`).
fn load_parquet(path: &Path, options: &LoadOptions) -> Result<Vec<ProductRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    let mut row_offset = 0usize;

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let mut cols: Vec<&Arc<dyn Array>> = Vec::with_capacity(REQUIRED_COLUMNS.len());
        for col in REQUIRED_COLUMNS {
            let i = schema
                .index_of(col)
                .map_err(|_| anyhow::anyhow!("Parquet file missing '{col}' column"))?;
            cols.push(batch.column(i));
        }
        let [brand, model, price, rating, capacity, spin, ftype, heater, listings] = [
            cols[0], cols[1], cols[2], cols[3], cols[4], cols[5], cols[6], cols[7], cols[8],
        ];

        for row in 0..batch.num_rows() {
            let row_no = row_offset + row;
            let has_heater = match heater.data_type() {
                DataType::Boolean => {
                    let arr = heater
                        .as_any()
                        .downcast_ref::<BooleanArray>()
                        .context("expected BooleanArray")?;
                    if !arr.is_null(row) && arr.value(row) {
                        Heater::Yes
                    } else {
                        Heater::No
                    }
                }
                _ => Heater::parse_lenient(&extract_text(heater, row)),
            };

            let fields = RowFields {
                brand: extract_text(brand, row),
                model_name: extract_text(model, row),
                avg_price_usd: extract_f64(price, row, row_no, PRICE),
                rating: extract_f64(rating, row, row_no, RATING),
                capacity_lb: extract_f64(capacity, row, row_no, CAPACITY),
                spin_rpm: extract_f64(spin, row, row_no, SPIN),
                function_type: extract_text(ftype, row),
                has_heater,
                listings: extract_f64(listings, row, row_no, LISTINGS),
            };
            records.extend(finish_row(fields, row_no, options));
        }
        row_offset += batch.num_rows();
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Read a string cell; nulls and non-string columns read as empty.
fn extract_text(col: &Arc<dyn Array>, row: usize) -> String {
    if col.is_null(row) {
        return String::new();
    }
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).trim().to_string())
            .unwrap_or_default(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).trim().to_string(),
        _ => String::new(),
    }
}

/// Read a numeric cell, coercing strings and nulls the same way the CSV path does.
fn extract_f64(col: &Arc<dyn Array>, row: usize, row_no: usize, name: &str) -> f64 {
    if col.is_null(row) {
        return 0.0;
    }
    let any = col.as_any();
    let value = match col.data_type() {
        DataType::Float64 => any.downcast_ref::<Float64Array>().map(|a| a.value(row)),
        DataType::Float32 => any
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Int64 => any.downcast_ref::<Int64Array>().map(|a| a.value(row) as f64),
        DataType::Int32 => any.downcast_ref::<Int32Array>().map(|a| a.value(row) as f64),
        DataType::UInt64 => any
            .downcast_ref::<UInt64Array>()
            .map(|a| a.value(row) as f64),
        DataType::UInt32 => any
            .downcast_ref::<UInt32Array>()
            .map(|a| a.value(row) as f64),
        DataType::Utf8 | DataType::LargeUtf8 => {
            Some(coerce_f64(&extract_text(col, row), row_no, name))
        }
        other => {
            log::debug!("Row {row_no}, {name}: unsupported column type {other:?}, using 0");
            None
        }
    };
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_CSV: &str = "\
brand,model_name,avg_price_usd,rating,capacity_lb,spin_rpm,function_type,has_heater,listings
SAMSUNG,WW70T4020EE,$219.99,4.4,15.4,1200,Fully Automatic Front Load,Yes,52
LG,T70SJSF1Z,$164.50,4.3,15.4,700,Fully Automatic Top Load,No,38
ONIDA,T65CGN,$120.00,3.9,14.3,680,Fully Automatic Top Load,No,12
IFB,Senator WSS,n/a,4.5,18.7,1400,Fully Automatic Front Load,yes,
WHIRLPOOL,,$180.00,4.1,15.4,740,Fully Automatic Top Load,No,9
";

    #[test]
    fn csv_applies_allow_list_and_coercion() {
        let records = load_csv(SAMPLE_CSV.as_bytes(), &LoadOptions::default()).unwrap();
        // ONIDA is not allow-listed; the WHIRLPOOL row has no model name.
        assert_eq!(records.len(), 3);

        let samsung = &records[0];
        assert_eq!(samsung.brand, "SAMSUNG");
        assert!((samsung.avg_price_usd - 219.99).abs() < 1e-9);
        assert_eq!(samsung.has_heater, Heater::Yes);
        assert_eq!(samsung.listings, 52);

        let ifb = &records[2];
        assert_eq!(ifb.avg_price_usd, 0.0);
        assert_eq!(ifb.listings, 0);
        assert_eq!(ifb.has_heater, Heater::Yes);
    }

    #[test]
    fn csv_without_allow_list_keeps_every_brand() {
        let records = load_csv(SAMPLE_CSV.as_bytes(), &LoadOptions::all_brands()).unwrap();
        assert_eq!(records.len(), 4);
        assert!(records.iter().any(|r| r.brand == "ONIDA"));
    }

    #[test]
    fn csv_missing_column_is_an_error() {
        let csv = "brand,model_name,rating\nLG,X,4.0\n";
        let err = load_csv(csv.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("avg_price_usd"));
    }

    #[test]
    fn csv_tolerates_short_rows() {
        let csv = "\
brand,model_name,avg_price_usd,rating,capacity_lb,spin_rpm,function_type,has_heater,listings
LG,Short,150,4.0
";
        let records = load_csv(csv.as_bytes(), &LoadOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].capacity_lb, 0.0);
        assert_eq!(records[0].has_heater, Heater::No);
    }

    #[test]
    fn json_accepts_numbers_and_strings() {
        let text = r#"[
            {"brand": "LG", "model_name": "FHM1207", "avg_price_usd": "$249.99",
             "rating": 4.3, "capacity_lb": 15.4, "spin_rpm": 1200,
             "function_type": "Fully Automatic Front Load", "has_heater": true,
             "listings": 31},
            {"brand": "HAIER", "model_name": "HW70", "avg_price_usd": 150,
             "rating": 4.0, "capacity_lb": 15.4, "spin_rpm": 800,
             "function_type": "Fully Automatic Top Load", "has_heater": "No",
             "listings": 3}
        ]"#;
        let records = load_json(text, &LoadOptions::default()).unwrap();
        assert_eq!(records.len(), 1);
        assert!((records[0].avg_price_usd - 249.99).abs() < 1e-9);
        assert_eq!(records[0].has_heater, Heater::Yes);
        assert_eq!(records[0].listings, 31);
    }

    #[test]
    fn json_rejects_non_array() {
        assert!(load_json("{\"brand\": \"LG\"}", &LoadOptions::default()).is_err());
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("washer-loader-{}-{name}", std::process::id()))
    }

    /// Two listings with integer spin/listings columns and a boolean heater.
    fn write_parquet(path: &Path) {
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(BRAND, DataType::Utf8, false),
            Field::new(MODEL_NAME, DataType::Utf8, false),
            Field::new(PRICE, DataType::Utf8, false),
            Field::new(RATING, DataType::Float32, false),
            Field::new(CAPACITY, DataType::Float64, false),
            Field::new(SPIN, DataType::Int64, false),
            Field::new(FUNCTION_TYPE, DataType::Utf8, false),
            Field::new(HAS_HEATER, DataType::Boolean, false),
            Field::new(LISTINGS, DataType::Int64, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["LG", "ONIDA"])),
                Arc::new(StringArray::from(vec!["FHM1207", "T65CGN"])),
                Arc::new(StringArray::from(vec!["$249.50", "120"])),
                Arc::new(Float32Array::from(vec![4.5, 3.9])),
                Arc::new(Float64Array::from(vec![17.6, 14.3])),
                Arc::new(Int64Array::from(vec![1400, 680])),
                Arc::new(StringArray::from(vec![
                    "Fully Automatic Front Load",
                    "Fully Automatic Top Load",
                ])),
                Arc::new(BooleanArray::from(vec![true, false])),
                Arc::new(Int64Array::from(vec![42, 12])),
            ],
        )
        .unwrap();

        let file = std::fs::File::create(path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();
    }

    #[test]
    fn parquet_reads_mixed_column_types() {
        let path = temp_path("catalog.parquet");
        write_parquet(&path);
        let catalog = load_file(&path, &LoadOptions::default());
        let everything = load_file(&path, &LoadOptions::all_brands());
        std::fs::remove_file(&path).ok();

        let catalog = catalog.unwrap();
        assert_eq!(catalog.len(), 1);
        let lg = &catalog.records[0];
        assert_eq!(lg.brand, "LG");
        assert_eq!(lg.avg_price_usd, 249.5);
        assert!((lg.rating - 4.5).abs() < 1e-6);
        assert_eq!(lg.spin_rpm, 1400.0);
        assert_eq!(lg.has_heater, Heater::Yes);
        assert_eq!(lg.listings, 42);

        let everything = everything.unwrap();
        assert_eq!(everything.brands, vec!["LG", "ONIDA"]);
        assert_eq!(everything.records[1].has_heater, Heater::No);
    }

    #[test]
    fn load_file_dispatches_csv_and_json() {
        let csv_path = temp_path("catalog.csv");
        let json_path = temp_path("catalog.json");
        std::fs::write(&csv_path, SAMPLE_CSV).unwrap();
        std::fs::write(
            &json_path,
            r#"[{"brand": "IFB", "model_name": "Senator", "avg_price_usd": 330,
                 "rating": 4.6, "capacity_lb": 19.8, "spin_rpm": "1400",
                 "function_type": "Fully Automatic Front Load", "has_heater": "Yes",
                 "listings": 14}]"#,
        )
        .unwrap();

        let from_csv = load_file(&csv_path, &LoadOptions::default());
        let from_json = load_file(&json_path, &LoadOptions::default());
        std::fs::remove_file(&csv_path).ok();
        std::fs::remove_file(&json_path).ok();

        let from_csv = from_csv.unwrap();
        assert_eq!(from_csv.len(), 3);
        assert_eq!(from_csv.brands, vec!["IFB", "LG", "SAMSUNG"]);

        let from_json = from_json.unwrap();
        assert_eq!(from_json.len(), 1);
        assert_eq!(from_json.records[0].spin_rpm, 1400.0);
        assert_eq!(from_json.records[0].has_heater, Heater::Yes);
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_file(Path::new("catalog.xlsx"), &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains(".xlsx"));
    }
}

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::str::FromStr;

use super::model::{Catalog, Heater, ProductRecord};
use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// Query building blocks
// ---------------------------------------------------------------------------

/// Heater filter: `Any` skips the check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeaterMode {
    #[default]
    Any,
    Yes,
    No,
}

impl HeaterMode {
    fn admits(self, heater: Heater) -> bool {
        match self {
            HeaterMode::Any => true,
            HeaterMode::Yes => heater == Heater::Yes,
            HeaterMode::No => heater == Heater::No,
        }
    }
}

/// Inclusive numeric range; a missing bound defaults to `[0, +inf)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ValueRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ValueRange {
    pub fn new(min: Option<f64>, max: Option<f64>) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min.unwrap_or(0.0) && v <= self.max.unwrap_or(f64::INFINITY)
    }
}

/// Quick filters applied on top of the regular predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    BestValue,
    Premium,
    Budget,
    HighCapacity,
    HighSpeed,
    TopRated,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::BestValue,
        Preset::Premium,
        Preset::Budget,
        Preset::HighCapacity,
        Preset::HighSpeed,
        Preset::TopRated,
    ];

    pub fn matches(self, r: &ProductRecord) -> bool {
        match self {
            Preset::BestValue => r.value_score().is_some_and(|v| v > 2.5),
            Preset::Premium => r.avg_price_usd > 200.0 || r.rating >= 4.4 || r.has_heater.is_yes(),
            Preset::Budget => r.avg_price_usd < 150.0,
            Preset::HighCapacity => r.capacity_lb >= 17.0,
            Preset::HighSpeed => r.spin_rpm >= 1300.0,
            Preset::TopRated => r.rating >= 4.4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::BestValue => "Best Value",
            Preset::Premium => "Premium",
            Preset::Budget => "Budget",
            Preset::HighCapacity => "High Capacity",
            Preset::HighSpeed => "High Speed",
            Preset::TopRated => "Top Rated",
        }
    }

    /// Range inputs the filter panel pre-fills when the preset is chosen.
    pub fn price_range(self) -> ValueRange {
        match self {
            Preset::Budget => ValueRange::new(None, Some(150.0)),
            _ => ValueRange::default(),
        }
    }

    pub fn capacity_range(self) -> ValueRange {
        match self {
            Preset::HighCapacity => ValueRange::new(Some(17.0), None),
            _ => ValueRange::default(),
        }
    }
}

impl FromStr for Preset {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "best-value" => Ok(Preset::BestValue),
            "premium" => Ok(Preset::Premium),
            "budget" => Ok(Preset::Budget),
            "high-capacity" => Ok(Preset::HighCapacity),
            "high-speed" => Ok(Preset::HighSpeed),
            "top-rated" => Ok(Preset::TopRated),
            other => Err(EngineError::UnknownPreset(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Rating,
    Price,
    Capacity,
    Spin,
}

impl SortKey {
    pub fn value(self, r: &ProductRecord) -> f64 {
        match self {
            SortKey::Rating => r.rating,
            SortKey::Price => r.avg_price_usd,
            SortKey::Capacity => r.capacity_lb,
            SortKey::Spin => r.spin_rpm,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Rating => "rating",
            SortKey::Price => "price",
            SortKey::Capacity => "capacity",
            SortKey::Spin => "spin",
        }
    }
}

impl FromStr for SortKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "rating" => Ok(SortKey::Rating),
            "price" | "avg_price_usd" => Ok(SortKey::Price),
            "capacity" | "capacity_lb" => Ok(SortKey::Capacity),
            "spin" | "spin_rpm" => Ok(SortKey::Spin),
            other => Err(EngineError::UnknownSortKey(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            other => Err(EngineError::UnknownSortDirection(other.to_string())),
        }
    }
}

/// Sort key plus direction, written `"<key>-<dir>"` in the sort selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            key: SortKey::Rating,
            direction: SortDirection::Desc,
        }
    }
}

impl SortSpec {
    pub const CHOICES: [(&'static str, &'static str); 8] = [
        ("rating-desc", "Rating (high → low)"),
        ("rating-asc", "Rating (low → high)"),
        ("price-asc", "Price (low → high)"),
        ("price-desc", "Price (high → low)"),
        ("capacity-desc", "Capacity (large → small)"),
        ("capacity-asc", "Capacity (small → large)"),
        ("spin-desc", "Spin RPM (fast → slow)"),
        ("spin-asc", "Spin RPM (slow → fast)"),
    ];
}

impl FromStr for SortSpec {
    type Err = EngineError;

    /// `"price-asc"`; a bare key sorts descending.
    fn from_str(s: &str) -> Result<Self> {
        let (key, dir) = s.rsplit_once('-').unwrap_or((s, "desc"));
        Ok(SortSpec {
            key: key.parse()?,
            direction: dir.parse()?,
        })
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Everything a single filter/sort action asks for. Rebuilt per action.
#[derive(Debug, Clone, Default)]
pub struct Query {
    pub brands: BTreeSet<String>,
    pub function_types: BTreeSet<String>,
    pub heater: HeaterMode,
    pub price: ValueRange,
    pub capacity: ValueRange,
    /// Case-insensitive substring of brand or model name; empty matches all.
    pub search: String,
    pub preset: Option<Preset>,
    pub sort: SortSpec,
}

impl Query {
    /// A query that admits every record of `catalog`.
    pub fn all_of(catalog: &Catalog) -> Self {
        Query {
            brands: catalog.brands.iter().cloned().collect(),
            function_types: catalog.function_types.iter().cloned().collect(),
            ..Default::default()
        }
    }

    /// Whether a record passes every active predicate.
    ///
    /// An empty brand or type selection admits nothing.
    pub fn matches(&self, r: &ProductRecord) -> bool {
        if !self.brands.contains(&r.brand) {
            return false;
        }
        if !self.function_types.contains(&r.function_type) {
            return false;
        }
        if !self.heater.admits(r.has_heater) {
            return false;
        }
        if !self.price.contains(r.avg_price_usd) || !self.capacity.contains(r.capacity_lb) {
            return false;
        }
        if !matches_search(r, &self.search) {
            return false;
        }
        self.preset.map_or(true, |p| p.matches(r))
    }
}

fn matches_search(r: &ProductRecord, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty()
        || r.brand.to_lowercase().contains(&needle)
        || r.model_name.to_lowercase().contains(&needle)
}

// ---------------------------------------------------------------------------
// Engine entry points
// ---------------------------------------------------------------------------

/// Records passing every predicate of `query`, in input order.
pub fn filter<'a>(records: &[&'a ProductRecord], query: &Query) -> Vec<&'a ProductRecord> {
    records.iter().copied().filter(|r| query.matches(r)).collect()
}

/// Stable sort by `key`; ties keep their input order in both directions.
pub fn sort<'a>(
    records: &[&'a ProductRecord],
    key: SortKey,
    direction: SortDirection,
) -> Vec<&'a ProductRecord> {
    let mut out = records.to_vec();
    out.sort_by(|a, b| compare(key.value(a), key.value(b), direction));
    out
}

fn compare(a: f64, b: f64, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => a.total_cmp(&b),
        SortDirection::Desc => b.total_cmp(&a),
    }
}

/// Indices into `catalog.records` of the filtered, sorted view.
pub fn filtered_indices(catalog: &Catalog, query: &Query) -> Vec<usize> {
    let mut indices: Vec<usize> = catalog
        .records
        .iter()
        .enumerate()
        .filter(|(_, r)| query.matches(r))
        .map(|(i, _)| i)
        .collect();
    let SortSpec { key, direction } = query.sort;
    indices.sort_by(|&a, &b| {
        compare(
            key.value(&catalog.records[a]),
            key.value(&catalog.records[b]),
            direction,
        )
    });
    indices
}

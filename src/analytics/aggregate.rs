//! Aggregates over a view: KPI strip, extremal picks and the grouped
//! datasets every chart is drawn from.
//!
//! All chart reshaping goes through [`group_and_aggregate`]; a new chart is a
//! new `(key, reducer)` pair, not a new traversal.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::data::model::{Heater, ProductRecord};
use crate::error::{EngineError, Result};

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Summary strip shown above the charts. All zero for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub count: usize,
    pub mean_rating: f64,
    pub mean_price: f64,
    pub distinct_brands: usize,
}

pub fn compute_kpis(records: &[&ProductRecord]) -> Kpis {
    let brands: BTreeSet<&str> = records.iter().map(|r| r.brand.as_str()).collect();
    Kpis {
        count: records.len(),
        mean_rating: mean(records.iter().map(|r| r.rating)),
        mean_price: mean(records.iter().map(|r| r.avg_price_usd)),
        distinct_brands: brands.len(),
    }
}

/// Arithmetic mean; 0 for an empty input.
pub fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

// ---------------------------------------------------------------------------
// Extremal picks
// ---------------------------------------------------------------------------

/// The record with the highest score. The first record wins ties.
///
/// `what` names the ranking in the `EmptyInput` error.
pub fn rank_by<'a, F>(
    records: &[&'a ProductRecord],
    what: &'static str,
    score: F,
) -> Result<&'a ProductRecord>
where
    F: Fn(&ProductRecord) -> f64,
{
    let mut iter = records.iter().copied();
    let first = iter.next().ok_or(EngineError::EmptyInput(what))?;
    let mut best = (first, score(first));
    for r in iter {
        let s = score(r);
        if s > best.1 {
            best = (r, s);
        }
    }
    Ok(best.0)
}

/// Best rating per dollar; zero-priced listings never win over priced ones.
pub fn best_value<'a>(records: &[&'a ProductRecord]) -> Result<&'a ProductRecord> {
    rank_by(records, "best value", |r| {
        r.value_score().unwrap_or(f64::NEG_INFINITY)
    })
}

pub fn top_rated<'a>(records: &[&'a ProductRecord]) -> Result<&'a ProductRecord> {
    rank_by(records, "top rated", |r| r.rating)
}

pub fn most_listed<'a>(records: &[&'a ProductRecord]) -> Result<&'a ProductRecord> {
    rank_by(records, "most listings", |r| r.listings as f64)
}

// ---------------------------------------------------------------------------
// Generic grouping
// ---------------------------------------------------------------------------

/// Group `records` by `key` and reduce every group with `aggregate`.
///
/// Groups keep input order internally; the map iterates in key order.
pub fn group_and_aggregate<'a, K, T, KF, AF>(
    records: &[&'a ProductRecord],
    key: KF,
    aggregate: AF,
) -> BTreeMap<K, T>
where
    K: Ord,
    KF: Fn(&ProductRecord) -> K,
    AF: Fn(&[&'a ProductRecord]) -> T,
{
    let mut groups: BTreeMap<K, Vec<&'a ProductRecord>> = BTreeMap::new();
    for &r in records {
        groups.entry(key(r)).or_default().push(r);
    }
    groups
        .into_iter()
        .map(|(k, members)| {
            let value = aggregate(members.as_slice());
            (k, value)
        })
        .collect()
}

/// Capacity histogram bins, in lb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum CapacityBucket {
    /// [12, 14), and anything smaller
    Lb12To14,
    Lb14To16,
    Lb16To18,
    /// [18, 20), and anything larger
    Lb18To20,
}

impl CapacityBucket {
    pub const ALL: [CapacityBucket; 4] = [
        CapacityBucket::Lb12To14,
        CapacityBucket::Lb14To16,
        CapacityBucket::Lb16To18,
        CapacityBucket::Lb18To20,
    ];

    pub fn of(capacity_lb: f64) -> Self {
        if capacity_lb < 14.0 {
            CapacityBucket::Lb12To14
        } else if capacity_lb < 16.0 {
            CapacityBucket::Lb14To16
        } else if capacity_lb < 18.0 {
            CapacityBucket::Lb16To18
        } else {
            CapacityBucket::Lb18To20
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CapacityBucket::Lb12To14 => "12-14 lb",
            CapacityBucket::Lb14To16 => "14-16 lb",
            CapacityBucket::Lb16To18 => "16-18 lb",
            CapacityBucket::Lb18To20 => "18-20 lb",
        }
    }
}

/// Grouping dimensions addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Brand,
    FunctionType,
    Heater,
    CapacityBucket,
    /// Capacity rounded to the nearest whole lb, zero-padded to two digits so
    /// labels order numerically.
    Capacity,
}

impl GroupKey {
    /// The group label of one record under this key.
    pub fn label_of(self, r: &ProductRecord) -> String {
        match self {
            GroupKey::Brand => r.brand.clone(),
            GroupKey::FunctionType => r.function_type.clone(),
            GroupKey::Heater => r.has_heater.to_string(),
            GroupKey::CapacityBucket => CapacityBucket::of(r.capacity_lb).label().to_string(),
            GroupKey::Capacity => format!("{:02} lb", r.capacity_lb.round() as i64),
        }
    }
}

impl FromStr for GroupKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "brand" => Ok(GroupKey::Brand),
            "function_type" => Ok(GroupKey::FunctionType),
            "heater" | "has_heater" => Ok(GroupKey::Heater),
            "capacity_bucket" => Ok(GroupKey::CapacityBucket),
            "capacity_lb" => Ok(GroupKey::Capacity),
            other => Err(EngineError::UnknownGroupKey(other.to_string())),
        }
    }
}

/// Per-group reductions addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Count,
    TotalListings,
    MeanPrice,
    MeanRating,
}

impl Reducer {
    pub fn reduce(self, group: &[&ProductRecord]) -> f64 {
        match self {
            Reducer::Count => group.len() as f64,
            Reducer::TotalListings => group.iter().map(|r| r.listings as f64).sum(),
            Reducer::MeanPrice => mean(group.iter().map(|r| r.avg_price_usd)),
            Reducer::MeanRating => mean(group.iter().map(|r| r.rating)),
        }
    }
}

impl FromStr for Reducer {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "count" => Ok(Reducer::Count),
            "listings" => Ok(Reducer::TotalListings),
            "mean_price" => Ok(Reducer::MeanPrice),
            "mean_rating" => Ok(Reducer::MeanRating),
            other => Err(EngineError::UnknownReducer(other.to_string())),
        }
    }
}

/// Name-driven grouping, e.g. `group_by_name(view, "brand", "listings")`.
pub fn group_by_name(
    records: &[&ProductRecord],
    key: &str,
    reducer: &str,
) -> Result<BTreeMap<String, f64>> {
    let key: GroupKey = key.parse()?;
    let reducer: Reducer = reducer.parse()?;
    Ok(group_and_aggregate(
        records,
        |r| key.label_of(r),
        |g| reducer.reduce(g),
    ))
}

// ---------------------------------------------------------------------------
// Chart datasets
// ---------------------------------------------------------------------------

/// A labelled value, the unit of every bar/doughnut dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    pub label: String,
    pub value: f64,
}

impl Datum {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Order by value descending; equal values keep label order.
fn descending(map: BTreeMap<String, f64>) -> Vec<Datum> {
    let mut out: Vec<Datum> = map.into_iter().map(|(k, v)| Datum::new(k, v)).collect();
    out.sort_by(|a, b| b.value.total_cmp(&a.value));
    out
}

/// Total listings per brand, most listed first.
pub fn brand_listings(records: &[&ProductRecord]) -> Vec<Datum> {
    descending(group_and_aggregate(
        records,
        |r| r.brand.clone(),
        |g| Reducer::TotalListings.reduce(g),
    ))
}

/// Mean rating per brand, best rated first.
pub fn brand_mean_ratings(records: &[&ProductRecord]) -> Vec<Datum> {
    descending(group_and_aggregate(
        records,
        |r| r.brand.clone(),
        |g| Reducer::MeanRating.reduce(g),
    ))
}

/// Share of total listings per brand, in percent. Empty when there are no
/// listings at all.
pub fn market_share(records: &[&ProductRecord]) -> Vec<Datum> {
    let totals = brand_listings(records);
    let total: f64 = totals.iter().map(|d| d.value).sum();
    if total == 0.0 {
        return Vec::new();
    }
    totals
        .into_iter()
        .map(|d| Datum::new(d.label, d.value / total * 100.0))
        .collect()
}

/// Model count per capacity bucket; every bucket present, in bucket order.
pub fn capacity_distribution(records: &[&ProductRecord]) -> Vec<(CapacityBucket, usize)> {
    let counts = group_and_aggregate(records, |r| CapacityBucket::of(r.capacity_lb), |g| g.len());
    CapacityBucket::ALL
        .into_iter()
        .map(|b| (b, counts.get(&b).copied().unwrap_or(0)))
        .collect()
}

/// Mean price without and with a heater; an empty side reports 0.
pub fn heater_mean_price(records: &[&ProductRecord]) -> Vec<Datum> {
    let means = group_and_aggregate(records, |r| r.has_heater, |g| Reducer::MeanPrice.reduce(g));
    vec![
        Datum::new("Without Heater", means.get(&Heater::No).copied().unwrap_or(0.0)),
        Datum::new("With Heater", means.get(&Heater::Yes).copied().unwrap_or(0.0)),
    ]
}

/// Mean price per function type, in first-seen order of the types.
pub fn function_type_mean_price(records: &[&ProductRecord]) -> Vec<Datum> {
    let means = group_and_aggregate(
        records,
        |r| r.function_type.clone(),
        |g| Reducer::MeanPrice.reduce(g),
    );
    let mut seen: Vec<&str> = Vec::new();
    for r in records {
        if !seen.contains(&r.function_type.as_str()) {
            seen.push(&r.function_type);
        }
    }
    seen.into_iter()
        .filter_map(|t| means.get(t).map(|v| Datum::new(t, *v)))
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter series
// ---------------------------------------------------------------------------

/// Y axis of the price/performance scatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScatterAxis {
    #[default]
    Rating,
    SpinRpm,
    CapacityLb,
}

impl ScatterAxis {
    pub const ALL: [ScatterAxis; 3] = [
        ScatterAxis::Rating,
        ScatterAxis::SpinRpm,
        ScatterAxis::CapacityLb,
    ];

    pub fn value(self, r: &ProductRecord) -> f64 {
        match self {
            ScatterAxis::Rating => r.rating,
            ScatterAxis::SpinRpm => r.spin_rpm,
            ScatterAxis::CapacityLb => r.capacity_lb,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ScatterAxis::Rating => "Rating",
            ScatterAxis::SpinRpm => "Spin RPM",
            ScatterAxis::CapacityLb => "Capacity (lb)",
        }
    }

    /// Fixed axis window used by the chart.
    pub fn bounds(self) -> (f64, f64) {
        match self {
            ScatterAxis::Rating => (3.5, 5.0),
            ScatterAxis::SpinRpm => (500.0, 1500.0),
            ScatterAxis::CapacityLb => (10.0, 22.0),
        }
    }
}

impl fmt::Display for ScatterAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// `(price, y)` points per brand, brands in key order.
pub fn price_scatter(
    records: &[&ProductRecord],
    axis: ScatterAxis,
) -> BTreeMap<String, Vec<[f64; 2]>> {
    group_and_aggregate(
        records,
        |r| r.brand.clone(),
        |g| g.iter().map(|r| [r.avg_price_usd, axis.value(r)]).collect(),
    )
}

/// `(spin, price)` points for the whole view.
pub fn spin_price_points(records: &[&ProductRecord]) -> Vec<[f64; 2]> {
    records
        .iter()
        .map(|r| [r.spin_rpm, r.avg_price_usd])
        .collect()
}

/// Every bar/doughnut dataset the dashboard draws, computed in one pass per
/// chart over the same view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDatasets {
    pub brand_listings: Vec<Datum>,
    pub brand_mean_ratings: Vec<Datum>,
    pub market_share: Vec<Datum>,
    pub capacity_distribution: Vec<(CapacityBucket, usize)>,
    pub heater_mean_price: Vec<Datum>,
    pub function_type_mean_price: Vec<Datum>,
}

impl ChartDatasets {
    pub fn compute(records: &[&ProductRecord]) -> Self {
        Self {
            brand_listings: brand_listings(records),
            brand_mean_ratings: brand_mean_ratings(records),
            market_share: market_share(records),
            capacity_distribution: capacity_distribution(records),
            heater_mean_price: heater_mean_price(records),
            function_type_mean_price: function_type_mean_price(records),
        }
    }
}

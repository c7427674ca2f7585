//! Per-record derived metrics.
//!
//! Everything here is a pure function of a record and, for the brand
//! comparison, its peer group (same brand, current view). Zero denominators
//! produce `None` rather than NaN or infinity.

use crate::data::model::ProductRecord;

const LB_TO_KG: f64 = 0.453592;
/// Relative deltas smaller than this (in percent) count as "at brand average".
const BRAND_AVERAGE_BAND_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PriceCategory {
    /// ≤ $150
    Budget,
    /// $150 – $250
    MidRange,
    /// > $250
    Premium,
}

impl PriceCategory {
    pub fn of(price: f64) -> Self {
        if price > 250.0 {
            PriceCategory::Premium
        } else if price > 150.0 {
            PriceCategory::MidRange
        } else {
            PriceCategory::Budget
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceCategory::Budget => "Budget",
            PriceCategory::MidRange => "Mid-Range",
            PriceCategory::Premium => "Premium",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CapacityCategory {
    /// < 14 lb
    Compact,
    /// 14 – 17 lb
    Standard,
    /// ≥ 17 lb
    Large,
}

impl CapacityCategory {
    pub fn of(capacity_lb: f64) -> Self {
        if capacity_lb < 14.0 {
            CapacityCategory::Compact
        } else if capacity_lb < 17.0 {
            CapacityCategory::Standard
        } else {
            CapacityCategory::Large
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CapacityCategory::Compact => "Compact",
            CapacityCategory::Standard => "Standard",
            CapacityCategory::Large => "Large",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Highly,
    Widely,
    Limited,
}

impl Availability {
    pub fn of(listings: u32) -> Self {
        if listings > 40 {
            Availability::Highly
        } else if listings > 20 {
            Availability::Widely
        } else {
            Availability::Limited
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Availability::Highly => "Highly Available",
            Availability::Widely => "Widely Available",
            Availability::Limited => "Limited Availability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinClass {
    HighSpeed,
    Standard,
    Gentle,
}

impl SpinClass {
    pub fn of(spin_rpm: f64) -> Self {
        if spin_rpm > 1300.0 {
            SpinClass::HighSpeed
        } else if spin_rpm > 900.0 {
            SpinClass::Standard
        } else {
            SpinClass::Gentle
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SpinClass::HighSpeed => "High Speed",
            SpinClass::Standard => "Standard",
            SpinClass::Gentle => "Gentle",
        }
    }
}

/// Where a listing's price sits relative to its brand peers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrandComparison {
    AtAverage,
    /// Percent above the peer mean (positive).
    Above(f64),
    /// Percent below the peer mean (positive magnitude).
    Below(f64),
}

impl BrandComparison {
    pub fn from_delta_pct(delta: f64) -> Self {
        if delta.abs() < BRAND_AVERAGE_BAND_PCT {
            BrandComparison::AtAverage
        } else if delta > 0.0 {
            BrandComparison::Above(delta)
        } else {
            BrandComparison::Below(-delta)
        }
    }

    pub fn describe(self) -> String {
        match self {
            BrandComparison::AtAverage => "At brand average".to_string(),
            BrandComparison::Above(pct) => format!("+{pct:.0}% above average"),
            BrandComparison::Below(pct) => format!("{pct:.0}% below average"),
        }
    }
}

/// Derived, display-agnostic metrics for one listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetrics {
    pub value_score: Option<f64>,
    pub efficiency_rating: Option<f64>,
    pub price_category: PriceCategory,
    pub capacity_category: CapacityCategory,
    pub capacity_kg: f64,
    pub availability: Availability,
    pub spin_class: SpinClass,
    /// `None` when there are no peers or their mean price is zero.
    pub brand_price_delta_pct: Option<f64>,
}

impl DerivedMetrics {
    pub fn brand_comparison(&self) -> Option<BrandComparison> {
        self.brand_price_delta_pct
            .map(BrandComparison::from_delta_pct)
    }
}

/// Percent difference between `record`'s price and the mean price of the
/// records in `view` that share its brand.
pub fn brand_price_delta_pct(record: &ProductRecord, view: &[&ProductRecord]) -> Option<f64> {
    let (sum, n) = view
        .iter()
        .filter(|r| r.brand == record.brand)
        .fold((0.0, 0usize), |(s, n), r| (s + r.avg_price_usd, n + 1));
    if n == 0 {
        return None;
    }
    let mean = sum / n as f64;
    if mean == 0.0 {
        None
    } else {
        Some((record.avg_price_usd - mean) / mean * 100.0)
    }
}

/// Compute every derived metric for `record`; `view` supplies the brand peers.
pub fn compute_derived(record: &ProductRecord, view: &[&ProductRecord]) -> DerivedMetrics {
    DerivedMetrics {
        value_score: record.value_score(),
        efficiency_rating: record.efficiency_rating(),
        price_category: PriceCategory::of(record.avg_price_usd),
        capacity_category: CapacityCategory::of(record.capacity_lb),
        capacity_kg: record.capacity_lb * LB_TO_KG,
        availability: Availability::of(record.listings),
        spin_class: SpinClass::of(record.spin_rpm),
        brand_price_delta_pct: brand_price_delta_pct(record, view),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    #[test]
    fn price_category_boundaries() {
        assert_eq!(PriceCategory::of(150.0), PriceCategory::Budget);
        assert_eq!(PriceCategory::of(150.01), PriceCategory::MidRange);
        assert_eq!(PriceCategory::of(250.0), PriceCategory::MidRange);
        assert_eq!(PriceCategory::of(250.5), PriceCategory::Premium);
    }

    #[test]
    fn capacity_category_boundaries() {
        assert_eq!(CapacityCategory::of(13.9), CapacityCategory::Compact);
        assert_eq!(CapacityCategory::of(14.0), CapacityCategory::Standard);
        assert_eq!(CapacityCategory::of(16.9), CapacityCategory::Standard);
        assert_eq!(CapacityCategory::of(17.0), CapacityCategory::Large);
    }

    #[test]
    fn brand_delta_against_peer_mean() {
        let a = record("LG", "A", 120.0, 4.0);
        let b = record("LG", "B", 80.0, 4.0);
        let other = record("IFB", "C", 1000.0, 4.0);
        let view = vec![&a, &b, &other];

        let delta = brand_price_delta_pct(&a, &view).unwrap();
        assert!((delta - 20.0).abs() < 1e-9);
        assert_eq!(
            BrandComparison::from_delta_pct(delta).describe(),
            "+20% above average"
        );

        let delta = brand_price_delta_pct(&b, &view).unwrap();
        match BrandComparison::from_delta_pct(delta) {
            BrandComparison::Below(pct) => assert!((pct - 20.0).abs() < 1e-9),
            other => panic!("expected Below, got {other:?}"),
        }
    }

    #[test]
    fn small_delta_is_at_average() {
        assert_eq!(
            BrandComparison::from_delta_pct(4.9),
            BrandComparison::AtAverage
        );
        assert_eq!(
            BrandComparison::from_delta_pct(-4.9).describe(),
            "At brand average"
        );
    }

    #[test]
    fn brand_delta_without_peers_or_with_free_peers() {
        let a = record("LG", "A", 120.0, 4.0);
        assert_eq!(brand_price_delta_pct(&a, &[]), None);

        let free = record("LG", "Free", 0.0, 4.0);
        assert_eq!(brand_price_delta_pct(&free, &[&free]), None);
    }

    #[test]
    fn compute_derived_fills_every_field() {
        let mut r = record("SAMSUNG", "A", 100.0, 4.5);
        r.capacity_lb = 18.0;
        r.spin_rpm = 1400.0;
        r.listings = 45;
        let m = compute_derived(&r, &[&r]);
        assert!((m.value_score.unwrap() - 4.5).abs() < 1e-9);
        assert!((m.efficiency_rating.unwrap() - 77.777).abs() < 0.01);
        assert_eq!(m.price_category, PriceCategory::Budget);
        assert_eq!(m.capacity_category, CapacityCategory::Large);
        assert!((m.capacity_kg - 8.164656).abs() < 1e-6);
        assert_eq!(m.availability, Availability::Highly);
        assert_eq!(m.spin_class, SpinClass::HighSpeed);
        assert_eq!(m.brand_comparison(), Some(BrandComparison::AtAverage));
    }
}

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Heater – whether a machine has a built-in water heater
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Heater {
    Yes,
    No,
}

impl Heater {
    /// Lenient parse used by every loader: `Yes`, `yes`, `true`, `y`, `1` mean
    /// Yes, anything else (including an empty cell) means No.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "true" | "1" => Heater::Yes,
            _ => Heater::No,
        }
    }

    pub fn is_yes(self) -> bool {
        self == Heater::Yes
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Heater::Yes => "Yes",
            Heater::No => "No",
        }
    }
}

impl fmt::Display for Heater {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ProductRecord – one catalog listing
// ---------------------------------------------------------------------------

/// A single washing-machine listing. Never mutated after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub brand: String,
    pub model_name: String,
    pub avg_price_usd: f64,
    /// 0–5 stars.
    pub rating: f64,
    pub capacity_lb: f64,
    pub spin_rpm: f64,
    /// Free-form label such as "Fully Automatic Front Load".
    pub function_type: String,
    pub has_heater: Heater,
    pub listings: u32,
}

impl ProductRecord {
    /// Rating per $100, `None` when the price is zero.
    pub fn value_score(&self) -> Option<f64> {
        if self.avg_price_usd == 0.0 {
            None
        } else {
            Some(self.rating / self.avg_price_usd * 100.0)
        }
    }

    /// Spin RPM per lb of capacity, `None` when the capacity is zero.
    pub fn efficiency_rating(&self) -> Option<f64> {
        if self.capacity_lb == 0.0 {
            None
        } else {
            Some(self.spin_rpm / self.capacity_lb)
        }
    }

    /// Function type without the "Fully Automatic " prefix, for compact labels.
    pub fn short_function_type(&self) -> &str {
        short_function_type(&self.function_type)
    }
}

pub fn short_function_type(function_type: &str) -> &str {
    function_type
        .strip_prefix("Fully Automatic ")
        .unwrap_or(function_type)
}

// ---------------------------------------------------------------------------
// Catalog – the canonical loaded record set
// ---------------------------------------------------------------------------

/// The full parsed catalog with indices computed once at load.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// All listings, in file order.
    pub records: Vec<ProductRecord>,
    /// Distinct brands, sorted.
    pub brands: Vec<String>,
    /// Distinct function types in first-seen order.
    pub function_types: Vec<String>,
}

impl Catalog {
    /// Build the column indices from the loaded records.
    pub fn from_records(records: Vec<ProductRecord>) -> Self {
        let brands: BTreeSet<String> = records.iter().map(|r| r.brand.clone()).collect();

        let mut function_types: Vec<String> = Vec::new();
        for r in &records {
            if !function_types.contains(&r.function_type) {
                function_types.push(r.function_type.clone());
            }
        }

        Catalog {
            records,
            brands: brands.into_iter().collect(),
            function_types,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every record, borrowed, in file order.
    pub fn all(&self) -> Vec<&ProductRecord> {
        self.records.iter().collect()
    }

    /// Lowest and highest price, `None` for an empty catalog.
    pub fn price_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.records.iter().map(|r| r.avg_price_usd))
    }

    /// Lowest and highest capacity, `None` for an empty catalog.
    pub fn capacity_bounds(&self) -> Option<(f64, f64)> {
        bounds(self.records.iter().map(|r| r.capacity_lb))
    }
}

fn bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn record(brand: &str, model: &str, price: f64, rating: f64) -> ProductRecord {
        ProductRecord {
            brand: brand.to_string(),
            model_name: model.to_string(),
            avg_price_usd: price,
            rating,
            capacity_lb: 15.0,
            spin_rpm: 1000.0,
            function_type: "Fully Automatic Front Load".to_string(),
            has_heater: Heater::No,
            listings: 10,
        }
    }
}

//! Rule tables that turn a listing into use-case, edge and recommendation
//! labels. Rules are evaluated top to bottom; single-valued outputs take the
//! first match, tag lists accumulate in rule order.

use super::metrics::{CapacityCategory, PriceCategory};
use crate::data::model::ProductRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestUseCase {
    LargeFamilies,
    SmallHouseholds,
    DeepCleaning,
    QuickDrying,
    WaterEfficiency,
    GeneralHousehold,
}

impl BestUseCase {
    pub fn label(self) -> &'static str {
        match self {
            BestUseCase::LargeFamilies => "Large families, heavy loads",
            BestUseCase::SmallHouseholds => "Small households, budget-conscious",
            BestUseCase::DeepCleaning => "Deep cleaning, stain removal",
            BestUseCase::QuickDrying => "Quick drying, energy efficiency",
            BestUseCase::WaterEfficiency => "Water efficiency, gentle care",
            BestUseCase::GeneralHousehold => "General household use",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompetitiveEdge {
    HighlyRated,
    FastSpin,
    LargeCapacity,
    HotWash,
    GreatValue,
}

impl CompetitiveEdge {
    pub fn label(self) -> &'static str {
        match self {
            CompetitiveEdge::HighlyRated => "Highly rated",
            CompetitiveEdge::FastSpin => "Fast spin",
            CompetitiveEdge::LargeCapacity => "Large capacity",
            CompetitiveEdge::HotWash => "Hot wash",
            CompetitiveEdge::GreatValue => "Great value",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationTag {
    BestValue,
    TopRated,
    MostPopular,
    HighEfficiency,
    LargeCapacity,
    PremiumFeature,
}

impl RecommendationTag {
    pub fn label(self) -> &'static str {
        match self {
            RecommendationTag::BestValue => "Best Value",
            RecommendationTag::TopRated => "Top Rated",
            RecommendationTag::MostPopular => "Most Popular",
            RecommendationTag::HighEfficiency => "High Efficiency",
            RecommendationTag::LargeCapacity => "Large Capacity",
            RecommendationTag::PremiumFeature => "Premium Feature",
        }
    }
}

/// The headline argument for buying a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationPitch {
    ExceptionalValue,
    MarketFavorite,
    DeepClean,
    HighSpeedSpin,
    LargeCapacity,
    Everyday,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub price_category: PriceCategory,
    pub capacity_category: CapacityCategory,
    pub best_use_case: BestUseCase,
    pub competitive_edges: Vec<CompetitiveEdge>,
    pub recommendation_tags: Vec<RecommendationTag>,
    pub pitch: RecommendationPitch,
}

fn value_above(r: &ProductRecord, threshold: f64) -> bool {
    r.value_score().is_some_and(|v| v > threshold)
}

pub fn best_use_case(r: &ProductRecord) -> BestUseCase {
    if r.capacity_lb >= 17.0 && r.spin_rpm > 1200.0 {
        BestUseCase::LargeFamilies
    } else if r.capacity_lb < 14.0 && r.avg_price_usd < 150.0 {
        BestUseCase::SmallHouseholds
    } else if r.has_heater.is_yes() {
        BestUseCase::DeepCleaning
    } else if r.spin_rpm >= 1300.0 {
        BestUseCase::QuickDrying
    } else if r.function_type.contains("Front Load") {
        BestUseCase::WaterEfficiency
    } else {
        BestUseCase::GeneralHousehold
    }
}

pub fn competitive_edges(r: &ProductRecord) -> Vec<CompetitiveEdge> {
    let rules = [
        (r.rating >= 4.4, CompetitiveEdge::HighlyRated),
        (r.spin_rpm >= 1350.0, CompetitiveEdge::FastSpin),
        (r.capacity_lb >= 17.0, CompetitiveEdge::LargeCapacity),
        (r.has_heater.is_yes(), CompetitiveEdge::HotWash),
        (value_above(r, 2.5), CompetitiveEdge::GreatValue),
    ];
    rules
        .into_iter()
        .filter_map(|(hit, edge)| hit.then_some(edge))
        .collect()
}

pub fn recommendation_tags(r: &ProductRecord) -> Vec<RecommendationTag> {
    let rules = [
        (value_above(r, 2.8), RecommendationTag::BestValue),
        (r.rating >= 4.4, RecommendationTag::TopRated),
        (r.listings > 40, RecommendationTag::MostPopular),
        (r.spin_rpm >= 1350.0, RecommendationTag::HighEfficiency),
        (r.capacity_lb >= 17.0, RecommendationTag::LargeCapacity),
        (r.has_heater.is_yes(), RecommendationTag::PremiumFeature),
    ];
    rules
        .into_iter()
        .filter_map(|(hit, tag)| hit.then_some(tag))
        .collect()
}

pub fn recommendation_pitch(r: &ProductRecord) -> RecommendationPitch {
    if value_above(r, 3.0) && r.rating >= 4.3 {
        RecommendationPitch::ExceptionalValue
    } else if r.rating >= 4.4 && r.listings > 40 {
        RecommendationPitch::MarketFavorite
    } else if r.has_heater.is_yes() {
        RecommendationPitch::DeepClean
    } else if r.spin_rpm >= 1350.0 {
        RecommendationPitch::HighSpeedSpin
    } else if r.capacity_lb >= 17.0 {
        RecommendationPitch::LargeCapacity
    } else {
        RecommendationPitch::Everyday
    }
}

pub fn classify(r: &ProductRecord) -> Classification {
    Classification {
        price_category: PriceCategory::of(r.avg_price_usd),
        capacity_category: CapacityCategory::of(r.capacity_lb),
        best_use_case: best_use_case(r),
        competitive_edges: competitive_edges(r),
        recommendation_tags: recommendation_tags(r),
        pitch: recommendation_pitch(r),
    }
}

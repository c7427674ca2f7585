//! Leaderboard-style insight cards for the current view.

use super::aggregate::{best_value, group_and_aggregate, mean, most_listed, top_rated};
use crate::data::model::{Heater, ProductRecord};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub enum Insight<'a> {
    BestValue(&'a ProductRecord),
    TopRated(&'a ProductRecord),
    MostPopular(&'a ProductRecord),
    /// Mean price with a heater minus mean price without.
    HeaterPremium(f64),
    /// Most common capacity, rounded to whole lb, and how many models share it.
    PopularCapacity { capacity_lb: i64, models: usize },
    MarketLeader { brand: String, listings: u64 },
}

/// Every insight the view supports, in card order.
///
/// An empty view has no insights; the extremal picks are only attempted on a
/// non-empty view.
pub fn generate_insights<'a>(view: &[&'a ProductRecord]) -> Result<Vec<Insight<'a>>> {
    if view.is_empty() {
        return Ok(Vec::new());
    }

    let mut cards = vec![
        Insight::BestValue(best_value(view)?),
        Insight::TopRated(top_rated(view)?),
        Insight::MostPopular(most_listed(view)?),
    ];

    if let Some(premium) = heater_premium(view) {
        cards.push(Insight::HeaterPremium(premium));
    }
    if let Some((capacity_lb, models)) = popular_capacity(view) {
        cards.push(Insight::PopularCapacity {
            capacity_lb,
            models,
        });
    }
    if let Some((brand, listings)) = market_leader(view) {
        cards.push(Insight::MarketLeader { brand, listings });
    }
    Ok(cards)
}

/// `None` unless both heater groups are present.
pub fn heater_premium(view: &[&ProductRecord]) -> Option<f64> {
    let means = group_and_aggregate(view, |r| r.has_heater, |g| {
        mean(g.iter().map(|r| r.avg_price_usd))
    });
    Some(means.get(&Heater::Yes)? - means.get(&Heater::No)?)
}

/// Ties go to the smaller capacity.
pub fn popular_capacity(view: &[&ProductRecord]) -> Option<(i64, usize)> {
    let counts = group_and_aggregate(view, |r| r.capacity_lb.round() as i64, |g| g.len());
    counts
        .into_iter()
        .fold(None, |best: Option<(i64, usize)>, (cap, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((cap, n)),
        })
}

/// Ties go to the alphabetically first brand.
pub fn market_leader(view: &[&ProductRecord]) -> Option<(String, u64)> {
    let totals = group_and_aggregate(view, |r| r.brand.clone(), |g| {
        g.iter().map(|r| r.listings as u64).sum::<u64>()
    });
    totals
        .into_iter()
        .fold(None, |best: Option<(String, u64)>, (brand, n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((brand, n)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;

    #[test]
    fn empty_view_has_no_insights() {
        assert!(generate_insights(&[]).unwrap().is_empty());
    }

    #[test]
    fn full_card_set() {
        let mut a = record("SAMSUNG", "A", 100.0, 4.5);
        a.listings = 12;
        a.capacity_lb = 15.2;
        let mut b = record("LG", "B", 300.0, 4.6);
        b.has_heater = Heater::Yes;
        b.listings = 40;
        b.capacity_lb = 17.6;
        let mut c = record("LG", "C", 200.0, 4.0);
        c.listings = 5;
        c.capacity_lb = 14.8;

        let cards = generate_insights(&[&a, &b, &c]).unwrap();
        assert_eq!(cards.len(), 6);
        assert_eq!(cards[0], Insight::BestValue(&a));
        assert_eq!(cards[1], Insight::TopRated(&b));
        assert_eq!(cards[2], Insight::MostPopular(&b));
        assert_eq!(cards[3], Insight::HeaterPremium(150.0));
        assert_eq!(
            cards[4],
            Insight::PopularCapacity {
                capacity_lb: 15,
                models: 2
            }
        );
        assert_eq!(
            cards[5],
            Insight::MarketLeader {
                brand: "LG".to_string(),
                listings: 45
            }
        );
    }

    #[test]
    fn heater_premium_needs_both_groups() {
        let a = record("LG", "A", 100.0, 4.0);
        assert_eq!(heater_premium(&[&a]), None);
        let cards = generate_insights(&[&a]).unwrap();
        assert!(!cards
            .iter()
            .any(|c| matches!(c, Insight::HeaterPremium(_))));
    }

    #[test]
    fn ties_resolve_deterministically() {
        let mut a = record("SAMSUNG", "A", 100.0, 4.0);
        a.capacity_lb = 16.0;
        a.listings = 10;
        let mut b = record("IFB", "B", 100.0, 4.0);
        b.capacity_lb = 14.0;
        b.listings = 10;
        assert_eq!(popular_capacity(&[&a, &b]), Some((14, 1)));
        assert_eq!(market_leader(&[&a, &b]), Some(("IFB".to_string(), 10)));
    }
}

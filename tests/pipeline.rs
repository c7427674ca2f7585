use washer_insights::analytics::aggregate::{
    best_value, capacity_distribution, compute_kpis, group_by_name, market_share, CapacityBucket,
    ChartDatasets,
};
use washer_insights::analytics::insights::{generate_insights, Insight};
use washer_insights::analytics::metrics::compute_derived;
use washer_insights::data::export::{read_csv, write_csv};
use washer_insights::data::filter::{filter, sort, HeaterMode, Query, SortDirection, SortKey};
use washer_insights::data::loader::{load_csv, LoadOptions};
use washer_insights::data::model::{Catalog, Heater};
use washer_insights::error::EngineError;
use washer_insights::state::AppState;

const CATALOG_CSV: &str = "\
brand,model_name,avg_price_usd,rating,capacity_lb,spin_rpm,function_type,has_heater,listings
SAMSUNG,WW70T,$249.99,4.4,15.4,1400,Fully Automatic Front Load,Yes,52
SAMSUNG,WA65,139.50,4.1,14.3,700,Fully Automatic Top Load,No,38
LG,FHM1207,289.00,4.5,17.6,1200,Fully Automatic Front Load,Yes,61
LG,\"T70, Smart\",155.00,4.0,15.4,700,Fully Automatic Top Load,No,17
WHIRLPOOL,Ace 7.0,99.00,3.9,13.2,1300,Semi Automatic Top Load,No,25
IFB,Senator,330.00,4.6,19.8,1400,Fully Automatic Front Load,Yes,14
HAIER,HW70,150.00,4.0,15.4,800,Fully Automatic Top Load,No,3
IFB,Broken,n/a,4.2,15.4,1000,Fully Automatic Front Load,No,8
";

fn catalog() -> Catalog {
    let records = load_csv(CATALOG_CSV.as_bytes(), &LoadOptions::default()).unwrap();
    Catalog::from_records(records)
}

#[test]
fn loader_applies_default_allow_list_and_coerces_prices() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 7);
    assert!(!catalog.brands.contains(&"HAIER".to_string()));
    let broken = catalog
        .records
        .iter()
        .find(|r| r.model_name == "Broken")
        .unwrap();
    assert_eq!(broken.avg_price_usd, 0.0);
    assert_eq!(broken.value_score(), None);
}

#[test]
fn every_filtered_record_satisfies_the_query() {
    let catalog = catalog();
    let mut query = Query::all_of(&catalog);
    query.heater = HeaterMode::No;
    query.price.min = Some(100.0);

    let all = catalog.all();
    let view = filter(&all, &query);
    assert!(!view.is_empty());
    for r in &view {
        assert!(all.iter().any(|a| std::ptr::eq(*a, *r)));
        assert_eq!(r.has_heater, Heater::No);
        assert!(r.avg_price_usd >= 100.0);
    }

    query.brands.clear();
    assert!(filter(&all, &query).is_empty());
}

#[test]
fn sort_directions_mirror_each_other_without_ties() {
    let catalog = catalog();
    let all = catalog.all();
    let asc = sort(&all, SortKey::Price, SortDirection::Asc);
    let mut desc = sort(&all, SortKey::Price, SortDirection::Desc);
    desc.reverse();
    let asc: Vec<&str> = asc.iter().map(|r| r.model_name.as_str()).collect();
    let desc: Vec<&str> = desc.iter().map(|r| r.model_name.as_str()).collect();
    assert_eq!(asc, desc);
}

#[test]
fn dashboard_aggregates_over_the_view() {
    let catalog = catalog();
    let view = catalog.all();

    let kpis = compute_kpis(&view);
    assert_eq!(kpis.count, 7);
    assert_eq!(kpis.distinct_brands, 4);

    let buckets = capacity_distribution(&view);
    assert_eq!(buckets[0], (CapacityBucket::Lb12To14, 1));
    assert_eq!(buckets[3], (CapacityBucket::Lb18To20, 1));

    let share: f64 = market_share(&view).iter().map(|d| d.value).sum();
    assert!((share - 100.0).abs() < 1e-9);

    let charts = ChartDatasets::compute(&view);
    assert_eq!(charts.brand_listings[0].label, "SAMSUNG");
    assert_eq!(charts.heater_mean_price.len(), 2);

    let listings = group_by_name(&view, "brand", "listings").unwrap();
    assert_eq!(listings["SAMSUNG"], 90.0);
    assert_eq!(
        group_by_name(&view, "colour", "count").unwrap_err(),
        EngineError::UnknownGroupKey("colour".to_string())
    );
}

#[test]
fn insights_and_detail_metrics() {
    let catalog = catalog();
    let view = catalog.all();

    assert_eq!(best_value(&view).unwrap().model_name, "Ace 7.0");
    let cards = generate_insights(&view).unwrap();
    assert!(cards.contains(&Insight::MarketLeader {
        brand: "SAMSUNG".to_string(),
        listings: 90
    }));

    let senator = view.iter().find(|r| r.model_name == "Senator").unwrap();
    let metrics = compute_derived(senator, &view);
    // IFB peers: 330 and 0, mean 165
    assert_eq!(
        metrics.brand_comparison().map(|c| c.describe()),
        Some("+100% above average".to_string())
    );
}

#[test]
fn export_round_trips_the_view() {
    let catalog = catalog();
    let mut state = AppState::default();
    state.set_dataset(catalog);
    state.set_search("lg");

    let view = state.view();
    assert_eq!(view.len(), 2);

    let mut buf = Vec::new();
    write_csv(&mut buf, &view).unwrap();
    let text = String::from_utf8(buf.clone()).unwrap();
    assert!(text.contains("\"T70, Smart\""));

    let back = read_csv(buf.as_slice()).unwrap();
    assert_eq!(back.len(), view.len());
    for (a, b) in back.iter().zip(&view) {
        assert_eq!(a, *b);
    }
}

use eframe::egui::{self, RichText, Ui};

use washer_insights::analytics::aggregate::compute_kpis;
use washer_insights::analytics::insights::{generate_insights, Insight};
use washer_insights::state::AppState;

// ---------------------------------------------------------------------------
// KPI strip
// ---------------------------------------------------------------------------

pub fn kpi_strip(ui: &mut Ui, state: &AppState) {
    let kpis = compute_kpis(&state.view());
    ui.horizontal(|ui: &mut Ui| {
        kpi(ui, "Models", kpis.count.to_string());
        kpi(ui, "Avg rating", format!("{:.1}", kpis.mean_rating));
        kpi(ui, "Avg price", format!("${:.0}", kpis.mean_price));
        kpi(ui, "Brands", kpis.distinct_brands.to_string());
    });
}

fn kpi(ui: &mut Ui, title: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(120.0);
        ui.vertical(|ui: &mut Ui| {
            ui.label(RichText::new(title).small().weak());
            ui.label(RichText::new(value).size(22.0).strong());
        });
    });
}

// ---------------------------------------------------------------------------
// Insight cards
// ---------------------------------------------------------------------------

pub fn insight_cards(ui: &mut Ui, state: &AppState) {
    let view = state.view();
    let cards = match generate_insights(&view) {
        Ok(cards) => cards,
        Err(e) => {
            log::warn!("Insights unavailable: {e}");
            Vec::new()
        }
    };
    if cards.is_empty() {
        ui.label(RichText::new("No listings match the current filters.").italics());
        return;
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for card in &cards {
            let (title, body) = describe(card);
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_width(220.0);
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(title).strong());
                    ui.label(body);
                });
            });
        }
    });
}

fn describe(card: &Insight<'_>) -> (&'static str, String) {
    match card {
        Insight::BestValue(r) => (
            "Best value",
            format!(
                "{} {} – {:.2} rating points per $100",
                r.brand,
                r.model_name,
                r.value_score().unwrap_or(0.0)
            ),
        ),
        Insight::TopRated(r) => (
            "Top rated",
            format!("{} {} – {:.1}★", r.brand, r.model_name, r.rating),
        ),
        Insight::MostPopular(r) => (
            "Most popular",
            format!("{} {} – {} listings", r.brand, r.model_name, r.listings),
        ),
        Insight::HeaterPremium(premium) => (
            "Heater premium",
            if *premium >= 0.0 {
                format!("Heater models cost ${premium:.0} more on average")
            } else {
                format!("Heater models cost ${:.0} less on average", -premium)
            },
        ),
        Insight::PopularCapacity {
            capacity_lb,
            models,
        } => (
            "Popular capacity",
            format!("{capacity_lb} lb – {models} models"),
        ),
        Insight::MarketLeader { brand, listings } => (
            "Market leader",
            format!("{brand} – {listings} listings"),
        ),
    }
}

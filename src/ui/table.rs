use eframe::egui::{self, Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use washer_insights::analytics::classify::{classify, RecommendationPitch};
use washer_insights::analytics::metrics::compute_derived;
use washer_insights::data::filter::SortSpec;
use washer_insights::data::model::ProductRecord;
use washer_insights::state::AppState;

const HEADERS: [&str; 9] = [
    "Brand", "Model", "Price", "Rating", "Capacity", "Spin", "Type", "Heater", "Listings",
];

// ---------------------------------------------------------------------------
// Listing table
// ---------------------------------------------------------------------------

pub fn listing_table(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        let search = ui.add(
            egui::TextEdit::singleline(&mut state.search)
                .hint_text("Search brand or model…")
                .desired_width(240.0),
        );
        if search.changed() {
            state.refilter();
        }

        ui.label("Sort:");
        let current = sort_label(state.sort);
        egui::ComboBox::from_id_salt("sort_spec")
            .selected_text(current)
            .show_ui(ui, |ui: &mut Ui| {
                for (value, label) in SortSpec::CHOICES {
                    match value.parse::<SortSpec>() {
                        Ok(spec) => {
                            if ui.selectable_label(state.sort == spec, label).clicked() {
                                state.set_sort(spec);
                            }
                        }
                        Err(e) => log::error!("Bad sort choice '{value}': {e}"),
                    }
                }
            });
    });

    let Some(ds) = &state.dataset else {
        return;
    };

    let mut clicked = None;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(Layout::left_to_right(Align::Center))
        .columns(Column::auto(), HEADERS.len())
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .max_scroll_height(360.0)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui: &mut Ui| {
                    ui.strong(title);
                });
            }
            header.col(|_ui: &mut Ui| {});
        })
        .body(|mut body| {
            for &idx in &state.visible_indices {
                let r = &ds.records[idx];
                body.row(22.0, |mut row| {
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new(&r.brand).strong());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(&r.model_name);
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("${:.0}", r.avg_price_usd));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{} {:.1}", stars(r.rating), r.rating));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.1} lb", r.capacity_lb));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(format!("{:.0} rpm", r.spin_rpm));
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.short_function_type());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.has_heater.as_str());
                    });
                    row.col(|ui: &mut Ui| {
                        ui.label(r.listings.to_string());
                    });
                    row.col(|ui: &mut Ui| {
                        if ui.small_button("Details").clicked() {
                            clicked = Some(idx);
                        }
                    });
                });
            }
        });

    if clicked.is_some() {
        state.select(clicked);
    }
}

fn sort_label(sort: SortSpec) -> &'static str {
    SortSpec::CHOICES
        .iter()
        .find(|(value, _)| value.parse::<SortSpec>().ok() == Some(sort))
        .map(|(_, label)| *label)
        .unwrap_or("Custom")
}

fn stars(rating: f64) -> String {
    "★".repeat(rating.round().clamp(0.0, 5.0) as usize)
}

// ---------------------------------------------------------------------------
// Detail panel
// ---------------------------------------------------------------------------

/// Expanded view of the selected listing, below the table.
pub fn detail_panel(ui: &mut Ui, state: &mut AppState) {
    let Some(idx) = state.selected else {
        return;
    };
    let Some(record) = state.dataset.as_ref().and_then(|ds| ds.records.get(idx)) else {
        return;
    };

    let view = state.view();
    let metrics = compute_derived(record, &view);
    let class = classify(record);
    let mut close = false;

    ui.add_space(8.0);
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.heading(format!("{} {}", record.brand, record.model_name));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                if ui.button("Close").clicked() {
                    close = true;
                }
            });
        });

        ui.horizontal_wrapped(|ui: &mut Ui| {
            for tag in &class.recommendation_tags {
                ui.label(RichText::new(tag.label()).strong().color(egui::Color32::GOLD));
            }
        });
        ui.label(RichText::new(pitch_text(record, class.pitch)).italics());
        ui.separator();

        egui::Grid::new("detail_grid")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui: &mut Ui| {
                let price_vs_brand = metrics
                    .brand_comparison()
                    .map(|c| c.describe())
                    .unwrap_or_else(|| "–".to_string());
                let rows = [
                    ("Price", format!("${:.2}", record.avg_price_usd)),
                    ("Price category", class.price_category.label().to_string()),
                    ("Vs brand average", price_vs_brand),
                    ("Rating", format!("{:.1}", record.rating)),
                    (
                        "Value score",
                        metrics
                            .value_score
                            .map(|v| format!("{v:.2}"))
                            .unwrap_or_else(|| "–".to_string()),
                    ),
                    (
                        "Capacity",
                        format!(
                            "{:.1} lb ({:.1} kg), {}",
                            record.capacity_lb,
                            metrics.capacity_kg,
                            class.capacity_category.label()
                        ),
                    ),
                    (
                        "Spin",
                        format!("{:.0} rpm, {}", record.spin_rpm, metrics.spin_class.label()),
                    ),
                    ("Efficiency rating", efficiency_text(metrics.efficiency_rating)),
                    ("Type", record.function_type.clone()),
                    ("Heater", record.has_heater.as_str().to_string()),
                    (
                        "Availability",
                        format!("{} listings, {}", record.listings, metrics.availability.label()),
                    ),
                    ("Best for", class.best_use_case.label().to_string()),
                ];
                for (name, value) in rows {
                    ui.label(RichText::new(name).weak());
                    ui.label(value);
                    ui.end_row();
                }
            });

        ui.separator();
        ui.horizontal_wrapped(|ui: &mut Ui| {
            ui.label(RichText::new("Edges:").weak());
            if class.competitive_edges.is_empty() {
                ui.label("Standard features");
            }
            for edge in &class.competitive_edges {
                ui.label(edge.label());
            }
        });
    });

    if close {
        state.select(None);
    }
}

/// Spin RPM per lb of capacity.
fn efficiency_text(rating: Option<f64>) -> String {
    rating
        .map(|v| format!("{v:.0} rpm/lb"))
        .unwrap_or_else(|| "–".to_string())
}

fn pitch_text(r: &ProductRecord, pitch: RecommendationPitch) -> String {
    match pitch {
        RecommendationPitch::ExceptionalValue => format!(
            "Exceptional value: a {:.1}★ rating at ${:.0}.",
            r.rating, r.avg_price_usd
        ),
        RecommendationPitch::MarketFavorite => format!(
            "Market favorite: {} listings and a {:.1}★ rating.",
            r.listings, r.rating
        ),
        RecommendationPitch::DeepClean => {
            "Built-in heater for hot washes and tough stains.".to_string()
        }
        RecommendationPitch::HighSpeedSpin => format!(
            "{:.0} rpm spin leaves clothes drier and cuts drying time.",
            r.spin_rpm
        ),
        RecommendationPitch::LargeCapacity => format!(
            "{:.1} lb drum handles large family loads.",
            r.capacity_lb
        ),
        RecommendationPitch::Everyday => "A dependable choice for everyday laundry.".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_is_shown_as_rpm_per_lb() {
        assert_eq!(efficiency_text(Some(1400.0 / 15.4)), "91 rpm/lb");
        assert_eq!(efficiency_text(Some(1400.0 / 8.8)), "159 rpm/lb");
        assert_eq!(efficiency_text(None), "–");
    }
}

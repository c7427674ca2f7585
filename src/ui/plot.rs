use eframe::egui::{self, Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use washer_insights::analytics::aggregate::{
    price_scatter, spin_price_points, ChartDatasets, Datum, ScatterAxis,
};
use washer_insights::state::{AppState, BrandMetric};

use crate::color::{accent, BrandColors};

const CHART_HEIGHT: f32 = 240.0;

// ---------------------------------------------------------------------------
// Dashboard charts (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current view, two per row.
pub fn dashboard_charts(ui: &mut Ui, state: &mut AppState, colors: &BrandColors) {
    chart_controls(ui, state);

    let view = state.view();
    let charts = ChartDatasets::compute(&view);
    let scatter = price_scatter(&view, state.scatter_axis);
    let spin = spin_price_points(&view);
    let axis = state.scatter_axis;
    let brand_metric = state.brand_metric;

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Price vs performance");
        price_performance(&mut cols[0], &scatter, axis, colors);

        match brand_metric {
            BrandMetric::Listings => {
                chart_title(&mut cols[1], "Brand dominance (listings)");
                brand_bars(&mut cols[1], "brand_listings", &charts.brand_listings, colors);
            }
            BrandMetric::Rating => {
                chart_title(&mut cols[1], "Brand dominance (avg rating)");
                brand_bars(&mut cols[1], "brand_ratings", &charts.brand_mean_ratings, colors);
            }
        }
    });

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Market share (%)");
        brand_bars(&mut cols[0], "market_share", &charts.market_share, colors);

        chart_title(&mut cols[1], "Capacity distribution");
        let capacity: Vec<Datum> = charts
            .capacity_distribution
            .iter()
            .map(|(bucket, n)| Datum {
                label: bucket.label().to_string(),
                value: *n as f64,
            })
            .collect();
        accent_bars(&mut cols[1], "capacity_distribution", &capacity);
    });

    ui.columns(2, |cols| {
        chart_title(&mut cols[0], "Heater vs price");
        accent_bars(&mut cols[0], "heater_price", &charts.heater_mean_price);

        chart_title(&mut cols[1], "Average price by type");
        accent_bars(&mut cols[1], "type_price", &charts.function_type_mean_price);
    });

    chart_title(ui, "Spin speed vs price");
    spin_vs_price(ui, spin);
}

fn chart_controls(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label("Scatter Y axis:");
        egui::ComboBox::from_id_salt("scatter_axis")
            .selected_text(state.scatter_axis.title())
            .show_ui(ui, |ui: &mut Ui| {
                for axis in ScatterAxis::ALL {
                    ui.selectable_value(&mut state.scatter_axis, axis, axis.title());
                }
            });

        ui.separator();

        ui.label("Brand chart:");
        ui.selectable_value(&mut state.brand_metric, BrandMetric::Listings, "Listings");
        ui.selectable_value(&mut state.brand_metric, BrandMetric::Rating, "Rating");
    });
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).strong());
}

// ---------------------------------------------------------------------------
// Individual charts
// ---------------------------------------------------------------------------

fn price_performance(
    ui: &mut Ui,
    scatter: &std::collections::BTreeMap<String, Vec<[f64; 2]>>,
    axis: ScatterAxis,
    colors: &BrandColors,
) {
    let (lo, hi) = axis.bounds();
    Plot::new("price_performance")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Price (USD)")
        .y_axis_label(axis.title())
        .include_y(lo)
        .include_y(hi)
        .show(ui, |plot_ui| {
            for (brand, points) in scatter {
                plot_ui.points(
                    Points::new(PlotPoints::new(points.clone()))
                        .name(brand)
                        .color(colors.color_for(brand))
                        .radius(4.0),
                );
            }
        });
}

/// One bar per brand, in dataset order, coloured by brand.
fn brand_bars(ui: &mut Ui, id: &str, data: &[Datum], colors: &BrandColors) {
    bar_plot(ui, id, data, |d, _| colors.color_for(&d.label));
}

/// One bar per category, coloured from the accent cycle.
fn accent_bars(ui: &mut Ui, id: &str, data: &[Datum]) {
    bar_plot(ui, id, data, |_, i| accent(i));
}

fn bar_plot(ui: &mut Ui, id: &str, data: &[Datum], color: impl Fn(&Datum, usize) -> Color32) {
    let bars: Vec<Bar> = data
        .iter()
        .enumerate()
        .map(|(i, d)| {
            Bar::new(i as f64, d.value)
                .name(&d.label)
                .fill(color(d, i))
                .width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show_x(false)
        .include_y(0.0)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars));
        });

    // Category labels, since bar positions are plain indices.
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (i, d) in data.iter().enumerate() {
            ui.label(RichText::new(&d.label).small().color(color(d, i)));
        }
    });
}

fn spin_vs_price(ui: &mut Ui, points: Vec<[f64; 2]>) {
    Plot::new("spin_vs_price")
        .height(CHART_HEIGHT)
        .x_axis_label("Spin RPM")
        .y_axis_label("Price (USD)")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::new(points))
                    .name("Listings")
                    .color(accent(0))
                    .radius(3.5),
            );
        });
}

use eframe::egui;

use washer_insights::config::Config;
use washer_insights::state::AppState;

use crate::color::BrandColors;
use crate::ui::{cards, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct WasherInsightsApp {
    pub state: AppState,
    /// Rebuilt whenever the brand list of the loaded catalog changes.
    colors: BrandColors,
}

impl WasherInsightsApp {
    pub fn new(config: Config) -> Self {
        let mut state = AppState::with_load_options(config.load_options);
        if let Some(path) = &config.data_path {
            state.load_path(path);
        }
        let mut app = Self {
            state,
            colors: BrandColors::new(&[]),
        };
        app.sync_colors();
        app
    }

    fn sync_colors(&mut self) {
        let brands = self
            .state
            .dataset
            .as_ref()
            .map(|ds| ds.brands.as_slice())
            .unwrap_or_default();
        if !self.colors.covers(brands) {
            self.colors = BrandColors::new(brands);
        }
    }
}

impl eframe::App for WasherInsightsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });
        self.sync_colors();

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &self.colors);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.dataset.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a catalog to begin  (File → Open…)");
                });
                return;
            }

            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    cards::kpi_strip(ui, &self.state);
                    ui.add_space(6.0);
                    cards::insight_cards(ui, &self.state);
                    ui.separator();
                    plot::dashboard_charts(ui, &mut self.state, &self.colors);
                    ui.separator();
                    table::listing_table(ui, &mut self.state);
                    table::detail_panel(ui, &mut self.state);
                });
        });
    }
}

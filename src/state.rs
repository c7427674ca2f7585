use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Result;

use crate::analytics::aggregate::ScatterAxis;
use crate::data::export;
use crate::data::filter::{filtered_indices, HeaterMode, Preset, Query, SortSpec, ValueRange};
use crate::data::loader::{self, LoadOptions};
use crate::data::model::{Catalog, ProductRecord};

// ---------------------------------------------------------------------------
// Filter form
// ---------------------------------------------------------------------------

/// The filter panel's inputs, kept as typed so half-entered numbers survive
/// between frames. Turned into a fresh [`Query`] on every action.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterForm {
    pub brands: BTreeSet<String>,
    pub function_types: BTreeSet<String>,
    pub heater: HeaterMode,
    pub min_price: String,
    pub max_price: String,
    pub min_capacity: String,
    pub max_capacity: String,
}

impl FilterForm {
    /// Everything checked, no ranges.
    pub fn open(catalog: &Catalog) -> Self {
        Self {
            brands: catalog.brands.iter().cloned().collect(),
            function_types: catalog.function_types.iter().cloned().collect(),
            ..Default::default()
        }
    }

    pub fn price_range(&self) -> ValueRange {
        ValueRange::new(parse_bound(&self.min_price), parse_bound(&self.max_price))
    }

    pub fn capacity_range(&self) -> ValueRange {
        ValueRange::new(
            parse_bound(&self.min_capacity),
            parse_bound(&self.max_capacity),
        )
    }
}

/// Blank or unparsable input leaves the bound open.
fn parse_bound(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn format_bound(v: Option<f64>) -> String {
    v.map(|v| format!("{v}")).unwrap_or_default()
}

/// Which metric the brand bar chart shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrandMetric {
    #[default]
    Listings,
    Rating,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Canonical catalog (None until a file is loaded). Never mutated.
    pub dataset: Option<Catalog>,

    /// Brand allow-list used for every load.
    pub load_options: LoadOptions,

    /// Filter panel inputs.
    pub form: FilterForm,

    /// Table search box.
    pub search: String,

    pub sort: SortSpec,

    /// Active quick filter, if any.
    pub preset: Option<Preset>,

    /// Indices into the catalog of the filtered, sorted view (cached).
    pub visible_indices: Vec<usize>,

    /// Catalog index of the row whose detail panel is open.
    pub selected: Option<usize>,

    pub scatter_axis: ScatterAxis,

    pub brand_metric: BrandMetric,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Ingest a newly loaded catalog and reset every filter.
    pub fn set_dataset(&mut self, dataset: Catalog) {
        self.form = FilterForm::open(&dataset);
        self.search.clear();
        self.preset = None;
        self.selected = None;
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    pub fn with_load_options(load_options: LoadOptions) -> Self {
        Self {
            load_options,
            ..Default::default()
        }
    }

    /// Load `path` and make it the current catalog. Failures land in
    /// `status_message` and leave the previous catalog in place.
    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path, &self.load_options) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} listings, brands {:?}",
                    dataset.len(),
                    dataset.brands
                );
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// The query the current inputs describe.
    pub fn query(&self) -> Query {
        Query {
            brands: self.form.brands.clone(),
            function_types: self.form.function_types.clone(),
            heater: self.form.heater,
            price: self.form.price_range(),
            capacity: self.form.capacity_range(),
            search: self.search.clone(),
            preset: self.preset,
            sort: self.sort,
        }
    }

    /// Recompute `visible_indices` after any input change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        self.visible_indices = filtered_indices(ds, &self.query());
        if let Some(sel) = self.selected {
            if !self.visible_indices.contains(&sel) {
                self.selected = None;
            }
        }
        log::debug!(
            "View: {} of {} listings",
            self.visible_indices.len(),
            ds.len()
        );
    }

    /// Borrow the current view in table order.
    pub fn view(&self) -> Vec<&ProductRecord> {
        match &self.dataset {
            Some(ds) => self
                .visible_indices
                .iter()
                .map(|&i| &ds.records[i])
                .collect(),
            None => Vec::new(),
        }
    }

    /// Apply the filter panel. Manual filters replace any active preset.
    pub fn apply_filters(&mut self) {
        self.preset = None;
        self.refilter();
    }

    /// Everything checked, ranges cleared, no preset. Search and sort stay.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.dataset {
            self.form = FilterForm::open(ds);
        }
        self.preset = None;
        self.refilter();
    }

    /// Reset the form, then narrow with `preset` (pre-filling its ranges).
    pub fn apply_preset(&mut self, preset: Preset) {
        if let Some(ds) = &self.dataset {
            self.form = FilterForm::open(ds);
        }
        let price = preset.price_range();
        let capacity = preset.capacity_range();
        self.form.min_price = format_bound(price.min);
        self.form.max_price = format_bound(price.max);
        self.form.min_capacity = format_bound(capacity.min);
        self.form.max_capacity = format_bound(capacity.max);
        self.preset = Some(preset);
        self.refilter();
    }

    pub fn set_search(&mut self, search: &str) {
        self.search = search.to_string();
        self.refilter();
    }

    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.refilter();
    }

    /// Toggle a single brand checkbox. Takes effect on the next apply.
    pub fn toggle_brand(&mut self, brand: &str) {
        toggle(&mut self.form.brands, brand);
    }

    /// Toggle a single function-type checkbox. Takes effect on the next apply.
    pub fn toggle_function_type(&mut self, function_type: &str) {
        toggle(&mut self.form.function_types, function_type);
    }

    /// Check every brand.
    pub fn select_all_brands(&mut self) {
        if let Some(ds) = &self.dataset {
            self.form.brands = ds.brands.iter().cloned().collect();
        }
    }

    /// Uncheck every brand.
    pub fn select_no_brands(&mut self) {
        self.form.brands.clear();
    }

    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index;
    }

    /// Write the current view, in table order, to `path`.
    pub fn export_view(&mut self, path: &Path) -> Result<()> {
        let result = export::export_to_path(path, &self.view());
        match &result {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.status_message = Some(format!("Export failed: {e:#}"));
            }
        }
        result
    }
}

fn toggle(set: &mut BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::Heater;

    fn loaded() -> AppState {
        let mut big = record("IFB", "Senator", 330.0, 4.6);
        big.capacity_lb = 18.0;
        let mut heated = record("LG", "Steam", 260.0, 4.2);
        heated.has_heater = Heater::Yes;
        let catalog = Catalog::from_records(vec![
            record("SAMSUNG", "A", 100.0, 4.5),
            record("LG", "B", 300.0, 4.0),
            big,
            heated,
        ]);
        let mut state = AppState::default();
        state.set_dataset(catalog);
        state
    }

    #[test]
    fn new_dataset_shows_everything_sorted_by_rating() {
        let state = loaded();
        assert_eq!(state.visible_indices, vec![2, 0, 3, 1]);
        assert_eq!(state.view().len(), 4);
    }

    #[test]
    fn unchecking_every_brand_empties_the_view() {
        let mut state = loaded();
        state.select_no_brands();
        state.apply_filters();
        assert!(state.view().is_empty());

        state.select_all_brands();
        state.apply_filters();
        assert_eq!(state.view().len(), 4);
    }

    #[test]
    fn ranges_come_from_text_inputs() {
        let mut state = loaded();
        state.form.min_price = "150".to_string();
        state.form.max_price = "not a number".to_string();
        state.form.max_capacity = " 17 ".to_string();
        state.apply_filters();
        let models: Vec<&str> = state.view().iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(models, vec!["Steam", "B"]);
    }

    #[test]
    fn preset_prefills_and_manual_apply_clears_it() {
        let mut state = loaded();
        state.apply_preset(Preset::HighCapacity);
        assert_eq!(state.form.min_capacity, "17");
        assert_eq!(state.view().len(), 1);

        state.form.min_capacity.clear();
        state.apply_filters();
        assert_eq!(state.preset, None);
        assert_eq!(state.view().len(), 4);

        state.apply_preset(Preset::Budget);
        assert_eq!(state.form.max_price, "150");
        assert_eq!(state.view()[0].model_name, "A");
    }

    #[test]
    fn search_and_sort_apply_immediately() {
        let mut state = loaded();
        state.set_search("lg");
        assert_eq!(state.view().len(), 2);

        state.set_sort("price-asc".parse().unwrap());
        let prices: Vec<f64> = state.view().iter().map(|r| r.avg_price_usd).collect();
        assert_eq!(prices, vec![260.0, 300.0]);

        state.reset_filters();
        // reset keeps the search box
        assert_eq!(state.view().len(), 2);
    }

    #[test]
    fn selection_is_dropped_when_filtered_out() {
        let mut state = loaded();
        state.select(Some(0));
        state.toggle_brand("SAMSUNG");
        state.apply_filters();
        assert_eq!(state.selected, None);
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("washer-state-{}-{name}", std::process::id()))
    }

    #[test]
    fn load_path_replaces_catalog_and_resets_filters() {
        let path = temp_path("catalog.csv");
        std::fs::write(
            &path,
            "brand,model_name,avg_price_usd,rating,capacity_lb,spin_rpm,function_type,has_heater,listings\n\
             LG,FHM1207,289,4.5,17.6,1200,Fully Automatic Front Load,Yes,61\n\
             HAIER,HW70,150,4.0,15.4,800,Fully Automatic Top Load,No,3\n",
        )
        .unwrap();

        let mut state = loaded();
        state.set_search("senator");
        state.load_path(&path);
        std::fs::remove_file(&path).ok();

        assert_eq!(state.status_message, None);
        assert!(state.search.is_empty());
        let models: Vec<&str> = state.view().iter().map(|r| r.model_name.as_str()).collect();
        assert_eq!(models, vec!["FHM1207"]);
    }

    #[test]
    fn export_view_writes_rows_in_table_order() {
        let path = temp_path("export.csv");
        let mut state = loaded();
        state.set_sort("price-asc".parse().unwrap());
        state.export_view(&path).unwrap();

        let file = std::fs::File::open(&path).unwrap();
        let back = export::read_csv(file).unwrap();
        std::fs::remove_file(&path).ok();

        let prices: Vec<f64> = back.iter().map(|r| r.avg_price_usd).collect();
        assert_eq!(prices, vec![100.0, 260.0, 300.0, 330.0]);
        assert_eq!(state.status_message, None);
    }

    #[test]
    fn failed_export_reports_status() {
        let mut state = loaded();
        let path = temp_path("no-such-dir").join("export.csv");
        assert!(state.export_view(&path).is_err());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Export failed")));
    }

    #[test]
    fn failed_load_keeps_previous_catalog() {
        let mut state = loaded();
        state.load_path(Path::new("missing-catalog.csv"));
        assert!(state.status_message.is_some());
        assert_eq!(state.view().len(), 4);
    }
}

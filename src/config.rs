use std::path::PathBuf;

use crate::data::loader::LoadOptions;

/// Catalog opened at startup when set.
pub const DATA_PATH_VAR: &str = "WASHER_DATA_PATH";
/// Comma-separated brand allow-list; `*` keeps every brand.
pub const BRANDS_VAR: &str = "WASHER_BRANDS";

/// Startup configuration for the dashboard.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub data_path: Option<PathBuf>,
    pub load_options: LoadOptions,
}

impl Config {
    /// Read the environment; the first CLI argument, when present, overrides
    /// `WASHER_DATA_PATH`.
    pub fn from_env() -> Self {
        let brands = std::env::var(BRANDS_VAR).ok();
        let data_path = std::env::args_os()
            .nth(1)
            .map(PathBuf::from)
            .or_else(|| std::env::var_os(DATA_PATH_VAR).map(PathBuf::from));

        Self {
            data_path,
            load_options: parse_brands(brands.as_deref()),
        }
    }
}

/// Unset or blank → default brands, `*` → every brand.
fn parse_brands(raw: Option<&str>) -> LoadOptions {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return LoadOptions::default();
    };
    if raw == "*" {
        return LoadOptions::all_brands();
    }
    LoadOptions {
        allowed_brands: raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::DEFAULT_BRANDS;

    #[test]
    fn brand_list_parsing() {
        assert_eq!(parse_brands(None).allowed_brands, DEFAULT_BRANDS);
        assert_eq!(parse_brands(Some("  ")).allowed_brands, DEFAULT_BRANDS);
        assert!(parse_brands(Some("*")).allowed_brands.is_empty());
        assert_eq!(
            parse_brands(Some("LG, HAIER,,")).allowed_brands,
            vec!["LG", "HAIER"]
        );
    }
}

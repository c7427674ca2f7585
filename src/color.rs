use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

/// Manufacturer colours for the brands the catalog usually carries.
const BRAND_COLORS: [(&str, Color32); 9] = [
    ("LG", Color32::from_rgb(0xA5, 0x00, 0x34)),
    ("SAMSUNG", Color32::from_rgb(0x14, 0x28, 0xA0)),
    ("WHIRLPOOL", Color32::from_rgb(0x00, 0x51, 0xA0)),
    ("HAIER", Color32::from_rgb(0xE3, 0x06, 0x13)),
    ("IFB", Color32::from_rgb(0x00, 0xA0, 0xE3)),
    ("REALME TECHLIFE", Color32::from_rgb(0xF5, 0xC5, 0x18)),
    ("MARQ BY FLIPKART", Color32::from_rgb(0x28, 0x74, 0xF0)),
    ("ONIDA", Color32::from_rgb(0xFF, 0x6B, 0x00)),
    ("MIDEA", Color32::from_rgb(0x00, 0x66, 0xCC)),
];

// ---------------------------------------------------------------------------
// Color mapping: brand → Color32
// ---------------------------------------------------------------------------

/// Maps the catalog's brands to colours: manufacturer colours where known,
/// generated hues for the rest.
#[derive(Debug, Clone)]
pub struct BrandColors {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl BrandColors {
    pub fn new(brands: &[String]) -> Self {
        let unknown: Vec<&String> = brands
            .iter()
            .filter(|b| !BRAND_COLORS.iter().any(|(k, _)| k == b))
            .collect();
        let mut generated = generate_palette(unknown.len()).into_iter();

        let mapping = brands
            .iter()
            .map(|b| {
                let color = BRAND_COLORS
                    .iter()
                    .find(|(k, _)| k == b)
                    .map(|(_, c)| *c)
                    .or_else(|| generated.next())
                    .unwrap_or(Color32::GRAY);
                (b.clone(), color)
            })
            .collect();

        BrandColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// True when the mapping was built for exactly `brands`.
    pub fn covers(&self, brands: &[String]) -> bool {
        brands.len() == self.mapping.len() && brands.iter().all(|b| self.mapping.contains_key(b))
    }

    /// Look up the colour for a brand.
    pub fn color_for(&self, brand: &str) -> Color32 {
        self.mapping
            .get(brand)
            .copied()
            .unwrap_or(self.default_color)
    }
}

/// Accent colours for single-series bar charts, cycled by bar index.
pub fn accent(i: usize) -> Color32 {
    const ACCENTS: [Color32; 9] = [
        Color32::from_rgb(0x63, 0x66, 0xf1),
        Color32::from_rgb(0x8b, 0x5c, 0xf6),
        Color32::from_rgb(0xa8, 0x55, 0xf7),
        Color32::from_rgb(0xec, 0x48, 0x99),
        Color32::from_rgb(0xf4, 0x3f, 0x5e),
        Color32::from_rgb(0xf9, 0x73, 0x16),
        Color32::from_rgb(0xea, 0xb3, 0x08),
        Color32::from_rgb(0x22, 0xc5, 0x5e),
        Color32::from_rgb(0x14, 0xb8, 0xa6),
    ];
    ACCENTS[i % ACCENTS.len()]
}

use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use segment_lens::data::model::{AgeBracket, FilterOptions, Gender};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Hue step between consecutive colours, in degrees.
const GOLDEN_ANGLE: f32 = 137.507_76;

/// Generates `n` distinct colours by stepping the hue by the golden angle.
///
/// The first colours do not change when `n` grows. Odd entries are drawn a
/// little darker.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * GOLDEN_ANGLE) % 360.0;
            let lightness = if i % 2 == 0 { 0.58 } else { 0.46 };
            let rgb: Srgb = Hsl::new(hue, 0.62, lightness).into_color();
            let rgb: Srgb<u8> = rgb.into_format();
            Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category value → Color32
// ---------------------------------------------------------------------------

/// Maps the values of one filter dimension to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap<K: Ord> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Clone> ColorMap<K> {
    pub fn new<'a>(values: impl ExactSizeIterator<Item = &'a K>) -> Self
    where
        K: 'a,
    {
        let palette = generate_palette(values.len());
        ColorMap {
            mapping: values.cloned().zip(palette).collect(),
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given value.
    pub fn color_for(&self, value: &K) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.default_color)
    }
}

impl<K: Ord> Default for ColorMap<K> {
    fn default() -> Self {
        ColorMap {
            mapping: BTreeMap::new(),
            default_color: Color32::GRAY,
        }
    }
}

/// Colours for every filter dimension of the loaded dataset.
#[derive(Debug, Clone, Default)]
pub struct Palettes {
    pub marital: ColorMap<String>,
    pub bracket: ColorMap<AgeBracket>,
    pub gender: ColorMap<Gender>,
}

impl Palettes {
    pub fn new(options: &FilterOptions) -> Self {
        Palettes {
            marital: ColorMap::new(options.marital_statuses.iter()),
            bracket: ColorMap::new(options.age_brackets.iter()),
            // Fixed over both labels so colours do not shift with the data.
            gender: ColorMap::new(Gender::ALL.iter()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(6);
        assert_eq!(colors.len(), 6);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn palette_prefix_is_stable() {
        assert_eq!(generate_palette(3), generate_palette(8)[..3]);
    }

    #[test]
    fn brackets_get_distinct_colours() {
        let options = FilterOptions {
            age_brackets: [25, 35, 45, 55].into_iter().filter_map(AgeBracket::from_age).collect(),
            ..FilterOptions::default()
        };
        let palettes = Palettes::new(&options);
        let colors: Vec<Color32> = options
            .age_brackets
            .iter()
            .map(|b| palettes.bracket.color_for(b))
            .collect();
        assert!(colors.iter().all(|c| *c != Color32::GRAY));
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_value_uses_default() {
        let values = ["Married".to_string(), "Single".to_string()];
        let map = ColorMap::new(values.iter());
        assert_ne!(map.color_for(&values[0]), Color32::GRAY);
        assert_eq!(map.color_for(&"Widow".to_string()), Color32::GRAY);
    }
}

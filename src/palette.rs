//! Bubble-view palettes: the preset table, the custom slot and resolution.
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::{contrasting_text_color, derive_glow_colors, hex_to_hsl, HslColor, NotesError, Result};

/// Sentinel: use the ambient theme, no override styling.
pub const THEME_DEFAULT_PALETTE: &str = "default";
/// Sentinel: use the user's custom slot.
pub const CUSTOM_PALETTE: &str = "custom";

/// Four colours, each an `"H S% L%"` string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSet {
    pub background: String,
    pub text: String,
    pub glow1: String,
    pub glow2: String,
}

impl ColorSet {
    fn from_static(colors: &PresetColors) -> Self {
        ColorSet {
            background: colors.background.to_string(),
            text: colors.text.to_string(),
            glow1: colors.glow1.to_string(),
            glow2: colors.glow2.to_string(),
        }
    }

    /// Every field parses as an HSL triple.
    pub fn is_well_formed(&self) -> bool {
        [&self.background, &self.text, &self.glow1, &self.glow2]
            .iter()
            .all(|c| HslColor::parse(c).is_some())
    }
}

#[derive(Debug)]
pub struct PresetColors {
    pub background: &'static str,
    pub text: &'static str,
    pub glow1: &'static str,
    pub glow2: &'static str,
}

/// A named entry of the palette menu.
#[derive(Debug)]
pub struct PalettePreset {
    pub name: &'static str,
    pub label: &'static str,
    /// `None` for the two sentinel entries.
    pub colors: Option<PresetColors>,
}

pub static PALETTE_PRESETS: &[PalettePreset] = &[
    PalettePreset {
        name: THEME_DEFAULT_PALETTE,
        label: "Theme Default",
        colors: None,
    },
    PalettePreset {
        name: "ocean",
        label: "Ocean Breeze",
        colors: Some(PresetColors {
            background: "200 80% 45%",
            text: "0 0% 100%",
            glow1: "200 85% 55%",
            glow2: "220 70% 65%",
        }),
    },
    PalettePreset {
        name: "sunset",
        label: "Sunset Glow",
        colors: Some(PresetColors {
            background: "20 90% 55%",
            text: "0 0% 0%",
            glow1: "20 95% 45%",
            glow2: "40 80% 75%",
        }),
    },
    PalettePreset {
        name: "forest",
        label: "Forest Canopy",
        colors: Some(PresetColors {
            background: "140 50% 30%",
            text: "0 0% 100%",
            glow1: "140 55% 40%",
            glow2: "160 40% 50%",
        }),
    },
    PalettePreset {
        name: "lavender",
        label: "Lavender Haze",
        colors: Some(PresetColors {
            background: "270 60% 75%",
            text: "0 0% 0%",
            glow1: "270 65% 65%",
            glow2: "290 50% 95%",
        }),
    },
    PalettePreset {
        name: "midnight",
        label: "Midnight Neon",
        colors: Some(PresetColors {
            background: "240 40% 15%",
            text: "0 0% 100%",
            glow1: "240 45% 25%",
            glow2: "260 30% 35%",
        }),
    },
    PalettePreset {
        name: CUSTOM_PALETTE,
        label: "Custom",
        colors: None,
    },
];

/// Looks a preset up by name, sentinels included.
pub fn find_preset(name: &str) -> Option<&'static PalettePreset> {
    PALETTE_PRESETS.iter().find(|p| p.name == name)
}

/// Custom slot used until the user picks a colour.
pub fn default_custom_palette() -> ColorSet {
    ColorSet {
        background: "210 60% 50%".to_string(),
        text: "0 0% 100%".to_string(),
        glow1: "210 65% 60%".to_string(),
        glow2: "230 50% 70%".to_string(),
    }
}

/// Builds the custom slot from a single background colour in hex.
pub fn derive_custom_palette(background_hex: &str) -> Result<ColorSet> {
    let base = hex_to_hsl(background_hex).ok_or_else(|| NotesError::Validation {
        message: format!("'{}' is not a hex colour", background_hex),
    })?;
    let text = hex_to_hsl(contrasting_text_color(background_hex)).unwrap_or(HslColor::new(0, 0, 0));
    let (glow1, glow2) = derive_glow_colors(base);
    debug!("Derived custom palette from {}: base {}", background_hex, base);

    Ok(ColorSet {
        background: base.to_string(),
        text: text.to_string(),
        glow1: glow1.to_string(),
        glow2: glow2.to_string(),
    })
}

/// Resolves the selected name to concrete colours.
///
/// `None` means "no override, use the theme". Unknown names resolve the same
/// way as the theme-default sentinel.
pub fn resolve_palette(
    selected: &str,
    presets: &[PalettePreset],
    custom: &ColorSet,
) -> Option<ColorSet> {
    if selected == CUSTOM_PALETTE {
        return Some(custom.clone());
    }
    if selected == THEME_DEFAULT_PALETTE {
        return None;
    }
    match presets.iter().find(|p| p.name == selected) {
        Some(PalettePreset {
            colors: Some(colors),
            ..
        }) => Some(ColorSet::from_static(colors)),
        _ => {
            warn!("Unknown palette '{}', using theme default", selected);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_resolves_verbatim() {
        let set = resolve_palette("ocean", PALETTE_PRESETS, &default_custom_palette()).unwrap();
        assert_eq!(set.background, "200 80% 45%");
        assert_eq!(set.glow2, "220 70% 65%");
    }

    #[test]
    fn sentinels_and_unknown_names() {
        let custom = derive_custom_palette("#3366CC").unwrap();
        assert_eq!(resolve_palette(CUSTOM_PALETTE, PALETTE_PRESETS, &custom), Some(custom.clone()));
        assert_eq!(resolve_palette(THEME_DEFAULT_PALETTE, PALETTE_PRESETS, &custom), None);
        assert_eq!(resolve_palette("no-such-palette", PALETTE_PRESETS, &custom), None);
    }

    #[test]
    fn custom_palette_from_hex() {
        let custom = derive_custom_palette("#3366CC").unwrap();
        assert_eq!(custom.background, "220 60% 50%");
        assert_eq!(custom.text, "0 0% 100%");
        assert_eq!(custom.glow1, "220 65% 60%");
        assert_eq!(custom.glow2, "240 50% 70%");
        assert!(custom.is_well_formed());

        let light = derive_custom_palette("#ffffff").unwrap();
        assert_eq!(light.text, "0 0% 0%");
    }

    #[test]
    fn bad_hex_is_a_validation_error() {
        assert!(derive_custom_palette("blue").unwrap_err().is_validation());
    }

    #[test]
    fn every_preset_is_well_formed() {
        for preset in PALETTE_PRESETS {
            if let Some(colors) = &preset.colors {
                assert!(ColorSet::from_static(colors).is_well_formed(), "{}", preset.name);
            }
        }
        assert!(default_custom_palette().is_well_formed());
    }
}

//! HSL/HEX conversions and glow derivation used by the palette resolver.
use std::fmt;

/// An HSL colour with hue in degrees and saturation/lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HslColor {
    pub h: u16,
    pub s: u8,
    pub l: u8,
}

impl HslColor {
    pub fn new(h: u16, s: u8, l: u8) -> Self {
        HslColor {
            h: h % 360,
            s: s.min(100),
            l: l.min(100),
        }
    }

    /// Parses the `"H S% L%"` form, e.g. `"210 60% 50%"`.
    pub fn parse(input: &str) -> Option<Self> {
        let mut parts = input.split_whitespace();
        let h = parse_component(parts.next()?, false)?;
        let s = parse_component(parts.next()?, true)?;
        let l = parse_component(parts.next()?, true)?;
        if parts.next().is_some() || h > 360 || s > 100 || l > 100 {
            return None;
        }
        Some(HslColor::new(h, s as u8, l as u8))
    }
}

impl fmt::Display for HslColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

fn parse_component(part: &str, percent: bool) -> Option<u16> {
    let digits = if percent { part.strip_suffix('%')? } else { part };
    if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn parse_hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim().trim_start_matches('#');
    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return None,
    };
    if !expanded.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&expanded[0..2], 16).ok()?;
    let g = u8::from_str_radix(&expanded[2..4], 16).ok()?;
    let b = u8::from_str_radix(&expanded[4..6], 16).ok()?;
    Some((r, g, b))
}

/// Converts `#RRGGBB` to HSL. Short `#RGB` is accepted too.
pub fn hex_to_hsl(hex: &str) -> Option<HslColor> {
    let (r, g, b) = parse_hex_rgb(hex)?;
    let (r, g, b) = (
        f64::from(r) / 255.0,
        f64::from(g) / 255.0,
        f64::from(b) / 255.0,
    );

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    let (h, s) = if max == min {
        (0.0, 0.0)
    } else {
        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        (h / 6.0, s)
    };

    Some(HslColor::new(
        (h * 360.0).round() as u16,
        (s * 100.0).round() as u8,
        (l * 100.0).round() as u8,
    ))
}

/// Black or white, whichever reads better on the given background (YIQ).
pub fn contrasting_text_color(hex: &str) -> &'static str {
    match parse_hex_rgb(hex) {
        Some((r, g, b)) => {
            let yiq = (u32::from(r) * 299 + u32::from(g) * 587 + u32::from(b) * 114) / 1000;
            if yiq >= 128 {
                "#000000"
            } else {
                "#FFFFFF"
            }
        }
        None => "#000000",
    }
}

/// Two glow tones around a base colour.
pub fn derive_glow_colors(base: HslColor) -> (HslColor, HslColor) {
    let glow1_l = if base.l > 50 {
        base.l.saturating_sub(10)
    } else {
        (base.l + 10).min(100)
    };
    let glow1 = HslColor::new(base.h, (base.s + 5).min(100), glow1_l);

    let glow2 = HslColor::new(
        (base.h + 20) % 360,
        base.s.saturating_sub(10),
        (base.l + 20).min(100),
    );
    (glow1, glow2)
}

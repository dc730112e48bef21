//! Mark-count to color level mapping, shade palettes and gradient blending.

use compact_str::CompactString;
use rustc_hash::FxHashMap;
use std::fmt;

use super::config::HighlightConfig;

pub const SHADES: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#RRGGBB` or `#RGB`.
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.trim().strip_prefix('#')?;
        match hex.len() {
            6 => {
                let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
                let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
                let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
                Some(Self::new(r, g, b))
            }
            3 => {
                let mut channels = [0u8; 3];
                for (slot, ch) in channels.iter_mut().zip(hex.chars()) {
                    let v = ch.to_digit(16)? as u8;
                    *slot = v * 16 + v;
                }
                Some(Self::new(channels[0], channels[1], channels[2]))
            }
            _ => None,
        }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Relative luminance in `0.0..=1.0` (Rec. 601 weights).
    pub fn luminance(self) -> f32 {
        (0.299 * self.r as f32 + 0.587 * self.g as f32 + 0.114 * self.b as f32) / 255.0
    }

    /// Per-channel linear blend; `weight` is the share of `self`.
    pub fn mix(self, other: Self, weight: f32) -> Self {
        let w = weight.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 * w + b as f32 * (1.0 - w)).round() as u8;
        Self::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Blends two hex colors; `None` if either fails to parse.
pub fn mix_hex_colors(a: &str, b: &str, weight: f32) -> Option<String> {
    let a = Rgb::parse_hex(a)?;
    let b = Rgb::parse_hex(b)?;
    Some(a.mix(b, weight).to_hex())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GradientStop {
    pub color: Rgb,
    pub percent: u8,
}

/// Left-to-right foreground gradient for an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gradient {
    pub stops: [GradientStop; 3],
}

impl fmt::Display for Gradient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "linear-gradient(to right")?;
        for stop in &self.stops {
            write!(f, ", {} {}%", stop.color, stop.percent)?;
        }
        write!(f, ")")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelColor {
    pub level: u8,
    pub color: Rgb,
}

/// Everything a renderer needs to paint one annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyle {
    pub level: u8,
    pub color: Rgb,
    pub gradient: Gradient,
    pub dark_context: bool,
}

/// Shade tables for one base color. `dark` is used when the ambient text is
/// dark, `light` when it is light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShadeTable {
    pub dark: [Rgb; SHADES],
    pub light: [Rgb; SHADES],
}

impl ShadeTable {
    pub fn shades(&self, dark_context: bool) -> &[Rgb; SHADES] {
        if dark_context {
            &self.dark
        } else {
            &self.light
        }
    }

    pub fn mid(&self, dark_context: bool) -> Rgb {
        self.shades(dark_context)[SHADES / 2]
    }
}

const fn hex(v: u32) -> Rgb {
    Rgb::new((v >> 16) as u8, (v >> 8) as u8, v as u8)
}

const fn table(dark: [u32; SHADES], light: [u32; SHADES]) -> ShadeTable {
    ShadeTable {
        dark: [
            hex(dark[0]),
            hex(dark[1]),
            hex(dark[2]),
            hex(dark[3]),
            hex(dark[4]),
        ],
        light: [
            hex(light[0]),
            hex(light[1]),
            hex(light[2]),
            hex(light[3]),
            hex(light[4]),
        ],
    }
}

static BUILTIN: [(&str, ShadeTable); 6] = [
    (
        "yellow",
        table(
            [0xFFF59D, 0xFFEE58, 0xFDD835, 0xF9A825, 0xF57F17],
            [0x6B5E1A, 0x8A7A16, 0xA89312, 0xC7AD0C, 0xE6C606],
        ),
    ),
    (
        "green",
        table(
            [0xC5E1A5, 0xA5D6A7, 0x81C784, 0x4CAF50, 0x2E7D32],
            [0x2F5130, 0x3B6B3D, 0x4A874C, 0x5DA660, 0x74C777],
        ),
    ),
    (
        "blue",
        table(
            [0xBBDEFB, 0x90CAF9, 0x64B5F6, 0x2196F3, 0x1565C0],
            [0x23405E, 0x2C5580, 0x376BA3, 0x4484C7, 0x559FEB],
        ),
    ),
    (
        "pink",
        table(
            [0xF8BBD0, 0xF48FB1, 0xF06292, 0xE91E63, 0xAD1457],
            [0x5E2538, 0x7D2E49, 0x9E385B, 0xC0446F, 0xE35285],
        ),
    ),
    (
        "orange",
        table(
            [0xFFE0B2, 0xFFCC80, 0xFFB74D, 0xFF9800, 0xE65100],
            [0x5E3A14, 0x7F4C15, 0xA15F17, 0xC47319, 0xE8891B],
        ),
    ),
    (
        "purple",
        table(
            [0xE1BEE7, 0xCE93D8, 0xBA68C8, 0x9C27B0, 0x6A1B9A],
            [0x44285A, 0x583277, 0x6D3D95, 0x8349B5, 0x9A56D6],
        ),
    ),
];

#[derive(Debug, Clone)]
pub struct Palette {
    tables: FxHashMap<CompactString, ShadeTable>,
    default_id: CompactString,
}

impl Default for Palette {
    fn default() -> Self {
        Self::builtin("yellow")
    }
}

impl Palette {
    pub fn builtin(default_id: &str) -> Self {
        let tables = BUILTIN
            .iter()
            .map(|(id, table)| (CompactString::from(*id), *table))
            .collect::<FxHashMap<_, _>>();
        let default_id = if tables.contains_key(default_id) {
            default_id.into()
        } else {
            CompactString::from(BUILTIN[0].0)
        };
        Self { tables, default_id }
    }

    pub fn insert(&mut self, id: &str, table: ShadeTable) {
        self.tables.insert(id.into(), table);
    }

    pub fn get(&self, id: &str) -> Option<&ShadeTable> {
        self.tables.get(id)
    }

    pub fn default_id(&self) -> &str {
        &self.default_id
    }

    /// Table for `id`, falling back to the default base color.
    pub fn resolve(&self, id: &str) -> &ShadeTable {
        self.tables
            .get(id)
            .or_else(|| self.tables.get(self.default_id.as_str()))
            .unwrap_or(&BUILTIN[0].1)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(|k| k.as_str())
    }
}

/// `min(max_level, ceil(count / step))` with `count` clamped to `1..=max_count`.
pub fn level_for_count(count: u32, step: u32, max_level: u8, max_count: u32) -> u8 {
    let count = count.clamp(1, max_count.max(1));
    let step = step.max(1);
    let level = count.div_ceil(step).min(max_level as u32);
    level as u8
}

#[derive(Debug, Clone)]
pub struct ColorLevelCalculator {
    palette: Palette,
    level_step: u32,
    max_level: u8,
    max_mark_count: u32,
    dark_threshold: f32,
    gradient_weight: f32,
}

impl ColorLevelCalculator {
    pub fn new(palette: Palette, config: &HighlightConfig) -> Self {
        Self {
            palette,
            level_step: config.level_step,
            max_level: config.max_level.clamp(1, SHADES as u8),
            max_mark_count: config.max_mark_count,
            dark_threshold: config.dark_threshold,
            gradient_weight: config.gradient_weight,
        }
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_dark_threshold(&mut self, threshold: f32) {
        self.dark_threshold = threshold.clamp(0.0, 1.0);
    }

    pub fn level(&self, count: u32) -> u8 {
        level_for_count(count, self.level_step, self.max_level, self.max_mark_count)
    }

    pub fn is_dark_context(&self, ambient: Rgb) -> bool {
        ambient.luminance() < self.dark_threshold
    }

    pub fn calculate_highlight(&self, base_color: &str, count: u32, dark_context: bool) -> LevelColor {
        let level = self.level(count);
        let shades = self.palette.resolve(base_color).shades(dark_context);
        LevelColor {
            level,
            color: shades[level as usize - 1],
        }
    }

    /// Blends `primary` and the base color's mid shade against the ambient
    /// text color, stops at 0%, 60% and 100%.
    pub fn build_gradient(
        &self,
        primary: Rgb,
        base_color: &str,
        ambient: Rgb,
        dark_context: bool,
    ) -> Gradient {
        let mid = self.palette.resolve(base_color).mid(dark_context);
        let lead = primary.mix(ambient, self.gradient_weight);
        let tail = mid.mix(ambient, self.gradient_weight);
        Gradient {
            stops: [
                GradientStop {
                    color: lead,
                    percent: 0,
                },
                GradientStop {
                    color: tail,
                    percent: 60,
                },
                GradientStop {
                    color: tail,
                    percent: 100,
                },
            ],
        }
    }

    pub fn style_for(&self, base_color: &str, count: u32, ambient: Rgb) -> HighlightStyle {
        let dark_context = self.is_dark_context(ambient);
        let LevelColor { level, color } = self.calculate_highlight(base_color, count, dark_context);
        HighlightStyle {
            level,
            color,
            gradient: self.build_gradient(color, base_color, ambient, dark_context),
            dark_context,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/highlight/color.rs"]
mod tests;

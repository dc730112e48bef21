use super::color::Rgb;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

pub const MAX_MARK_COUNT: u32 = 10;
pub const LEVEL_STEP: u32 = 2;
pub const MAX_LEVEL: u8 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub max_mark_count: u32,
    pub level_step: u32,
    pub max_level: u8,
    /// Characters collected on each side of a cursor when expanding a selection.
    pub context_radius: usize,
    pub max_hops: usize,
    #[serde(with = "hex_color")]
    pub default_ambient: Rgb,
    pub default_base_color: CompactString,
    /// Ambient text below this luminance uses the dark shade table.
    pub dark_threshold: f32,
    pub gradient_weight: f32,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            max_mark_count: MAX_MARK_COUNT,
            level_step: LEVEL_STEP,
            max_level: MAX_LEVEL,
            context_radius: 50,
            max_hops: 500,
            default_ambient: Rgb::BLACK,
            default_base_color: CompactString::from("yellow"),
            dark_threshold: 0.5,
            gradient_weight: 0.7,
        }
    }
}

impl HighlightConfig {
    pub fn clamp_count(&self, count: u32) -> u32 {
        count.min(self.max_mark_count)
    }
}

mod hex_color {
    use super::Rgb;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Rgb, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&color.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rgb, D::Error> {
        let value = String::deserialize(deserializer)?;
        Rgb::parse_hex(&value)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color: {value}")))
    }
}

//! Highlight annotation engine.
//!
//! Leaf first: `boundary` and `color` are pure, `navigator` reads the tree,
//! `expander` grows selections, `mutator` changes the tree, `engine` ties
//! them to the persisted mark counts.

pub mod boundary;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod expander;
pub mod mutator;
pub mod navigator;

pub use boundary::{has_word_boundary, is_boundary, normalize_word};
pub use color::{
    mix_hex_colors, ColorLevelCalculator, Gradient, HighlightStyle, LevelColor, Palette, Rgb,
    ShadeTable,
};
pub use config::{HighlightConfig, LEVEL_STEP, MAX_LEVEL, MAX_MARK_COUNT};
pub use engine::{HighlightEngine, HighlightReport, ToggleTarget};
pub use error::HighlightError;
pub use expander::SelectionExpander;
pub use mutator::{annotations_for, AnnotationMutator, MarkSpec, ScanPolicy, WrapOutcome};
pub use navigator::ContextWindow;

//! Presentation layer for visual styling and color mapping.

pub mod color_mapping;

//! Built-in palettes

pub mod material;

//! Tessera Theme
//!
//! Palette tokens for the colour roles widgets are painted with, and the
//! shared theme state that picks the light or dark palette.
//!
//! ```rust
//! use tessera_theme::{ColorRole, ColorScheme, ThemeState};
//!
//! let theme = ThemeState::new(ColorScheme::Light);
//! let primary = theme.color(ColorRole::Primary);
//! assert_eq!(primary.main.to_hex(), "#1976d2");
//! ```

pub mod palette;
pub mod theme;
pub mod themes;

pub use palette::{ColorRole, Palette, PaletteColor};
pub use theme::{ColorScheme, SharedTheme, ThemeState};

//! Theme state shared by mounted widgets

use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::palette::{ColorRole, Palette, PaletteColor};
use crate::themes::material;
use tessera_core::Color;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// Current scheme plus the palette for each scheme
#[derive(Debug)]
pub struct ThemeState {
    scheme: Cell<ColorScheme>,
    light: RefCell<Palette>,
    dark: RefCell<Palette>,
}

/// Shared theme handle
pub type SharedTheme = Rc<ThemeState>;

impl ThemeState {
    pub fn new(scheme: ColorScheme) -> Self {
        Self::with_palettes(scheme, material::light(), material::dark())
    }

    pub fn with_palettes(scheme: ColorScheme, light: Palette, dark: Palette) -> Self {
        Self {
            scheme: Cell::new(scheme),
            light: RefCell::new(light),
            dark: RefCell::new(dark),
        }
    }

    pub fn shared(scheme: ColorScheme) -> SharedTheme {
        Rc::new(Self::new(scheme))
    }

    pub fn scheme(&self) -> ColorScheme {
        self.scheme.get()
    }

    pub fn set_scheme(&self, scheme: ColorScheme) {
        if self.scheme.replace(scheme) != scheme {
            tracing::debug!(?scheme, "colour scheme changed");
        }
    }

    pub fn toggle_scheme(&self) {
        self.set_scheme(match self.scheme() {
            ColorScheme::Light => ColorScheme::Dark,
            ColorScheme::Dark => ColorScheme::Light,
        });
    }

    /// Palette of the active scheme
    pub fn palette(&self) -> Palette {
        match self.scheme() {
            ColorScheme::Light => self.light.borrow().clone(),
            ColorScheme::Dark => self.dark.borrow().clone(),
        }
    }

    /// Shades of `role` in the active scheme
    pub fn color(&self, role: ColorRole) -> PaletteColor {
        match self.scheme() {
            ColorScheme::Light => *self.light.borrow().get(role),
            ColorScheme::Dark => *self.dark.borrow().get(role),
        }
    }

    /// Shades for a role name taken from a model field
    pub fn lookup(&self, name: &str) -> Option<PaletteColor> {
        name.parse().ok().map(|role| self.color(role))
    }

    /// Replace one role's shades in both schemes
    pub fn override_role(&self, role: ColorRole, main: Color) {
        for palette in [&self.light, &self.dark] {
            let mut palette = palette.borrow_mut();
            let contrast_text = palette.get(role).contrast_text;
            *palette.get_mut(role) = PaletteColor::from_main(main, contrast_text);
        }
    }
}

impl Default for ThemeState {
    fn default() -> Self {
        Self::new(ColorScheme::Light)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_switch_changes_palette() {
        let theme = ThemeState::default();
        let light_primary = theme.color(ColorRole::Primary);
        theme.toggle_scheme();
        assert_eq!(theme.scheme(), ColorScheme::Dark);
        assert_ne!(theme.color(ColorRole::Primary), light_primary);
    }

    #[test]
    fn test_lookup_by_name() {
        let theme = ThemeState::default();
        let primary = theme.lookup("primary").unwrap();
        assert_eq!(primary.dark.to_hex(), "#1565c0");
        assert!(theme.lookup("inherit").is_none());
    }

    #[test]
    fn test_override_role() {
        let theme = ThemeState::default();
        theme.override_role(ColorRole::Primary, Color::from_hex(0xFF0000));
        assert_eq!(theme.color(ColorRole::Primary).main.to_hex(), "#ff0000");
        theme.set_scheme(ColorScheme::Dark);
        assert_eq!(theme.color(ColorRole::Primary).main.to_hex(), "#ff0000");
    }
}

//! Palette tokens

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tessera_core::Color;

/// Named colour role a widget can be painted with
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorRole {
    Default,
    Primary,
    Secondary,
    Error,
    Warning,
    Info,
    Success,
}

impl ColorRole {
    pub const ALL: [ColorRole; 7] = [
        ColorRole::Default,
        ColorRole::Primary,
        ColorRole::Secondary,
        ColorRole::Error,
        ColorRole::Warning,
        ColorRole::Info,
        ColorRole::Success,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorRole::Default => "default",
            ColorRole::Primary => "primary",
            ColorRole::Secondary => "secondary",
            ColorRole::Error => "error",
            ColorRole::Warning => "warning",
            ColorRole::Info => "info",
            ColorRole::Success => "success",
        }
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColorRole::ALL
            .into_iter()
            .find(|role| role.as_str() == s)
            .ok_or_else(|| format!("unknown colour role '{s}'"))
    }
}

/// The four shades of one role
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaletteColor {
    pub main: Color,
    pub light: Color,
    pub dark: Color,
    pub contrast_text: Color,
}

impl PaletteColor {
    pub fn from_hex(main: u32, light: u32, dark: u32, contrast_text: Color) -> Self {
        Self {
            main: Color::from_hex(main),
            light: Color::from_hex(light),
            dark: Color::from_hex(dark),
            contrast_text,
        }
    }

    /// Derive light/dark shades from a single main colour
    pub fn from_main(main: Color, contrast_text: Color) -> Self {
        Self {
            main,
            light: main.lighten(0.2),
            dark: main.darken(0.3),
            contrast_text,
        }
    }
}

/// Shades for every role
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub default: PaletteColor,
    pub primary: PaletteColor,
    pub secondary: PaletteColor,
    pub error: PaletteColor,
    pub warning: PaletteColor,
    pub info: PaletteColor,
    pub success: PaletteColor,
}

impl Palette {
    pub fn get(&self, role: ColorRole) -> &PaletteColor {
        match role {
            ColorRole::Default => &self.default,
            ColorRole::Primary => &self.primary,
            ColorRole::Secondary => &self.secondary,
            ColorRole::Error => &self.error,
            ColorRole::Warning => &self.warning,
            ColorRole::Info => &self.info,
            ColorRole::Success => &self.success,
        }
    }

    pub fn get_mut(&mut self, role: ColorRole) -> &mut PaletteColor {
        match role {
            ColorRole::Default => &mut self.default,
            ColorRole::Primary => &mut self.primary,
            ColorRole::Secondary => &mut self.secondary,
            ColorRole::Error => &mut self.error,
            ColorRole::Warning => &mut self.warning,
            ColorRole::Info => &mut self.info,
            ColorRole::Success => &mut self.success,
        }
    }

    /// Look up a role by the name a model field carries
    ///
    /// Names that are not palette roles (`inherit`, custom colours) return `None`.
    pub fn lookup(&self, name: &str) -> Option<&PaletteColor> {
        name.parse().ok().map(|role| self.get(role))
    }
}

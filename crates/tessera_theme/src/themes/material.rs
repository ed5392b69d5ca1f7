//! Material palette

use crate::palette::{Palette, PaletteColor};
use tessera_core::Color;

const DARK_TEXT: Color = Color::rgba(0.0, 0.0, 0.0, 0.87);

/// Light-scheme palette
pub fn light() -> Palette {
    Palette {
        default: PaletteColor::from_hex(0x616161, 0x9E9E9E, 0x424242, Color::WHITE),
        primary: PaletteColor::from_hex(0x1976D2, 0x42A5F5, 0x1565C0, Color::WHITE),
        secondary: PaletteColor::from_hex(0x9C27B0, 0xBA68C8, 0x7B1FA2, Color::WHITE),
        error: PaletteColor::from_hex(0xD32F2F, 0xEF5350, 0xC62828, Color::WHITE),
        warning: PaletteColor::from_hex(0xED6C02, 0xFF9800, 0xE65100, Color::WHITE),
        info: PaletteColor::from_hex(0x0288D1, 0x03A9F4, 0x01579B, Color::WHITE),
        success: PaletteColor::from_hex(0x2E7D32, 0x4CAF50, 0x1B5E20, Color::WHITE),
    }
}

/// Dark-scheme palette
pub fn dark() -> Palette {
    Palette {
        default: PaletteColor::from_hex(0xBDBDBD, 0xE0E0E0, 0x9E9E9E, DARK_TEXT),
        primary: PaletteColor::from_hex(0x90CAF9, 0xE3F2FD, 0x42A5F5, DARK_TEXT),
        secondary: PaletteColor::from_hex(0xCE93D8, 0xF3E5F5, 0xAB47BC, DARK_TEXT),
        error: PaletteColor::from_hex(0xF44336, 0xE57373, 0xD32F2F, Color::WHITE),
        warning: PaletteColor::from_hex(0xFFA726, 0xFFB74D, 0xF57C00, DARK_TEXT),
        info: PaletteColor::from_hex(0x29B6F6, 0x4FC3F7, 0x0288D1, DARK_TEXT),
        success: PaletteColor::from_hex(0x66BB6A, 0x81C784, 0x388E3C, DARK_TEXT),
    }
}

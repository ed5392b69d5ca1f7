//! Icon descriptor resolution
//!
//! An icon descriptor is either inline vector markup (`<svg ...>...</svg>`) or
//! the name of a ligature glyph in an icon font (`"home"`, `"star_filled"`).
//! [`resolve`] classifies the descriptor and produces a [`RenderPlan`]:
//!
//! - markup becomes a monochrome mask: the markup is embedded as a base64
//!   data URI and painted with the current text colour, so it follows the
//!   widget's colour like a glyph would
//! - a glyph name becomes a font-ligature span
//! - empty, absent and malformed descriptors render nothing
//!
//! Resolution is pure and never fails.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{IconConfig, IconScale};
use crate::model::FieldValue;

/// Inline style declarations, in emission order
pub type InlineStyle = Vec<(&'static str, String)>;

/// Requested icon size
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum IconSize {
    /// Square size in pixels
    Px(f32),
    /// Any other CSS length (`1.5em`, `2rem`, ...)
    Css(String),
    Small,
    Medium,
    Large,
}

impl IconSize {
    /// Read a size from a model field: numbers are pixels, strings are parsed
    pub fn from_field(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Number(n) => n
                .as_f64()
                .map(|px| px as f32)
                .filter(|px| valid_px(*px))
                .map(IconSize::Px),
            FieldValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// One of the component's native size keywords
    pub fn is_keyword(&self) -> bool {
        matches!(self, IconSize::Small | IconSize::Medium | IconSize::Large)
    }

    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            IconSize::Small => Some("small"),
            IconSize::Medium => Some("medium"),
            IconSize::Large => Some("large"),
            _ => None,
        }
    }

    /// CSS length for explicit sizes; `None` for keywords
    pub fn css_length(&self) -> Option<String> {
        match self {
            IconSize::Px(px) => Some(format!("{px}px")),
            IconSize::Css(s) => Some(s.clone()),
            _ => None,
        }
    }

    /// CSS length, mapping keywords through `scale`
    pub fn scaled_length(&self, scale: &IconScale) -> String {
        match self {
            IconSize::Small => scale.small.clone(),
            IconSize::Medium => scale.medium.clone(),
            IconSize::Large => scale.large.clone(),
            IconSize::Px(px) => format!("{px}px"),
            IconSize::Css(s) => s.clone(),
        }
    }
}

fn valid_px(px: f32) -> bool {
    px.is_finite() && px >= 0.0
}

/// Error for size strings that are neither a keyword nor a length
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidIconSize(pub String);

impl fmt::Display for InvalidIconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid icon size '{}'", self.0)
    }
}

impl std::error::Error for InvalidIconSize {}

impl FromStr for IconSize {
    type Err = InvalidIconSize;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s {
            "small" => return Ok(IconSize::Small),
            "medium" => return Ok(IconSize::Medium),
            "large" => return Ok(IconSize::Large),
            "" => return Err(InvalidIconSize(s.to_string())),
            _ => {}
        }
        let number = s.strip_suffix("px").unwrap_or(s).trim();
        if let Ok(px) = number.parse::<f32>() {
            if valid_px(px) {
                return Ok(IconSize::Px(px));
            }
            return Err(InvalidIconSize(s.to_string()));
        }
        if s.starts_with(|c: char| c.is_ascii_digit() || c == '.') || s.starts_with("calc(") {
            Ok(IconSize::Css(s.to_string()))
        } else {
            Err(InvalidIconSize(s.to_string()))
        }
    }
}

impl fmt::Display for IconSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconSize::Px(px) => write!(f, "{px}px"),
            IconSize::Css(s) => f.write_str(s),
            other => f.write_str(other.keyword().unwrap_or_default()),
        }
    }
}

impl From<IconSize> for String {
    fn from(size: IconSize) -> Self {
        size.to_string()
    }
}

impl TryFrom<String> for IconSize {
    type Error = InvalidIconSize;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<f32> for IconSize {
    fn from(px: f32) -> Self {
        IconSize::Px(px)
    }
}

/// What an icon descriptor denotes
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IconKind {
    Markup,
    Glyph,
}

/// Classify a descriptor; `None` when there is nothing to render
pub fn classify(descriptor: &str) -> Option<IconKind> {
    let trimmed = descriptor.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.starts_with('<') {
        Some(IconKind::Markup)
    } else {
        Some(IconKind::Glyph)
    }
}

fn is_glyph_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == ' ')
}

/// Vector markup painted as a mask in the current colour
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MaskPlan {
    /// `data:image/svg+xml;base64,...`
    pub data_uri: String,
    pub size: Option<IconSize>,
}

impl MaskPlan {
    pub fn style(&self) -> InlineStyle {
        let mut style = vec![
            ("mask-image", format!("url(\"{}\")", self.data_uri)),
            ("background-color", "currentColor".to_string()),
            ("mask-repeat", "no-repeat".to_string()),
            ("mask-size", "contain".to_string()),
        ];
        if let Some(length) = self.size.as_ref().and_then(IconSize::css_length) {
            style.push(("width", length.clone()));
            style.push(("height", length));
        }
        style.push(("display", "inline-block".to_string()));
        style
    }
}

/// A ligature glyph from an icon font
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GlyphPlan {
    pub name: String,
    pub font_class: String,
    pub size: Option<IconSize>,
}

impl GlyphPlan {
    /// Keyword size handed to the component instead of a font size
    pub fn native_size(&self) -> Option<&'static str> {
        self.size.as_ref().and_then(IconSize::keyword)
    }

    pub fn style(&self) -> InlineStyle {
        self.size
            .as_ref()
            .and_then(IconSize::css_length)
            .map(|length| vec![("font-size", length)])
            .unwrap_or_default()
    }
}

/// How to draw an icon
#[derive(Clone, Debug, PartialEq, Default, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenderPlan {
    #[default]
    None,
    Mask(MaskPlan),
    Glyph(GlyphPlan),
}

impl RenderPlan {
    pub fn is_none(&self) -> bool {
        matches!(self, RenderPlan::None)
    }

    pub fn style(&self) -> InlineStyle {
        match self {
            RenderPlan::None => Vec::new(),
            RenderPlan::Mask(mask) => mask.style(),
            RenderPlan::Glyph(glyph) => glyph.style(),
        }
    }
}

/// Resolves descriptors with configured font classes
#[derive(Clone, Debug, PartialEq)]
pub struct IconResolver {
    glyph_font_class: String,
    outlined_font_class: String,
}

impl IconResolver {
    pub fn new(config: &IconConfig) -> Self {
        Self {
            glyph_font_class: config.glyph_font_class.clone(),
            outlined_font_class: config.outlined_font_class.clone(),
        }
    }

    pub fn resolve(&self, descriptor: Option<&str>, size: Option<&IconSize>) -> RenderPlan {
        self.resolve_with_class(descriptor, size, &self.glyph_font_class)
    }

    /// Like [`resolve`](Self::resolve), but glyphs use the outlined font
    pub fn resolve_outlined(&self, descriptor: Option<&str>, size: Option<&IconSize>) -> RenderPlan {
        self.resolve_with_class(descriptor, size, &self.outlined_font_class)
    }

    fn resolve_with_class(
        &self,
        descriptor: Option<&str>,
        size: Option<&IconSize>,
        font_class: &str,
    ) -> RenderPlan {
        let Some(descriptor) = descriptor else {
            return RenderPlan::None;
        };
        match classify(descriptor) {
            None => RenderPlan::None,
            Some(IconKind::Markup) => {
                if !descriptor.trim_end().ends_with('>') {
                    tracing::debug!("ignoring unterminated icon markup");
                    return RenderPlan::None;
                }
                RenderPlan::Mask(MaskPlan {
                    data_uri: format!("data:image/svg+xml;base64,{}", STANDARD.encode(descriptor)),
                    size: size.cloned(),
                })
            }
            Some(IconKind::Glyph) => {
                let name = descriptor.trim();
                if !is_glyph_name(name) {
                    tracing::debug!(name, "ignoring malformed glyph name");
                    return RenderPlan::None;
                }
                RenderPlan::Glyph(GlyphPlan {
                    name: name.to_string(),
                    font_class: font_class.to_string(),
                    size: size.cloned(),
                })
            }
        }
    }
}

impl Default for IconResolver {
    fn default() -> Self {
        Self::new(&IconConfig::default())
    }
}

/// Resolve with the default font classes
pub fn resolve(descriptor: Option<&str>, size: Option<&IconSize>) -> RenderPlan {
    IconResolver::default().resolve(descriptor, size)
}

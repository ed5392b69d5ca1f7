//! Render tree handed to the rendering surface
//!
//! Widgets produce a [`RenderNode`] tree naming the component primitives to
//! draw and their properties. The surface interprets it; nothing here does
//! layout or painting.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tessera_core::{FieldValue, GlyphPlan, MaskPlan, RenderPlan};

/// One node of the render tree
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RenderNode {
    /// Component primitive (`Button`, `Icon`, `span`, ...)
    pub kind: String,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub props: IndexMap<String, FieldValue>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub style: IndexMap<String, String>,
    /// Named sub-trees (`startIcon`, `control`, ...)
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, RenderNode>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<RenderNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl RenderNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Plain text leaf
    pub fn text_node(text: impl Into<String>) -> Self {
        Self::new("text").text(text)
    }

    pub fn prop(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.props.insert(name.into(), value.into());
        self
    }

    /// Set a prop only when `value` is present and not null
    pub fn prop_opt(self, name: impl Into<String>, value: Option<FieldValue>) -> Self {
        match value {
            Some(v) if !v.is_null() => self.prop(name, v),
            _ => self,
        }
    }

    pub fn style(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.style.insert(name.into(), value.into());
        self
    }

    pub fn styles<K: Into<String>>(mut self, declarations: impl IntoIterator<Item = (K, String)>) -> Self {
        for (name, value) in declarations {
            self.style.insert(name.into(), value);
        }
        self
    }

    pub fn slot(mut self, name: impl Into<String>, node: RenderNode) -> Self {
        self.slots.insert(name.into(), node);
        self
    }

    pub fn slot_opt(self, name: impl Into<String>, node: Option<RenderNode>) -> Self {
        match node {
            Some(node) => self.slot(name, node),
            None => self,
        }
    }

    pub fn child(mut self, node: RenderNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn child_opt(self, node: Option<RenderNode>) -> Self {
        match node {
            Some(node) => self.child(node),
            None => self,
        }
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = RenderNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get_prop(&self, name: &str) -> Option<&FieldValue> {
        self.props.get(name)
    }

    pub fn get_slot(&self, name: &str) -> Option<&RenderNode> {
        self.slots.get(name)
    }

    /// Depth-first search through children and slots
    pub fn find(&self, kind: &str) -> Option<&RenderNode> {
        if self.kind == kind {
            return Some(self);
        }
        self.slots
            .values()
            .chain(self.children.iter())
            .find_map(|node| node.find(kind))
    }

    /// Every node of `kind`, depth first
    pub fn find_all<'a>(&'a self, kind: &str) -> Vec<&'a RenderNode> {
        let mut found = Vec::new();
        self.collect(kind, &mut found);
        found
    }

    fn collect<'a>(&'a self, kind: &str, found: &mut Vec<&'a RenderNode>) {
        if self.kind == kind {
            found.push(self);
        }
        for node in self.slots.values().chain(self.children.iter()) {
            node.collect(kind, found);
        }
    }
}

/// Turn an icon render plan into a node; `None` renders nothing
pub fn icon_node(plan: &RenderPlan) -> Option<RenderNode> {
    match plan {
        RenderPlan::None => None,
        RenderPlan::Mask(mask) => Some(mask_node(mask)),
        RenderPlan::Glyph(glyph) => Some(glyph_node(glyph)),
    }
}

fn mask_node(mask: &MaskPlan) -> RenderNode {
    RenderNode::new("span").styles(mask.style())
}

fn glyph_node(glyph: &GlyphPlan) -> RenderNode {
    RenderNode::new("Icon")
        .prop("baseClassName", glyph.font_class.as_str())
        .prop_opt("fontSize", glyph.native_size().map(FieldValue::from))
        .styles(glyph.style())
        .text(glyph.name.as_str())
}

/// How the host sizes the widget's container
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMode {
    #[default]
    Fixed,
    StretchWidth,
    StretchHeight,
    StretchBoth,
    ScaleWidth,
    ScaleHeight,
    ScaleBoth,
}

impl SizingMode {
    pub fn stretches_width(&self) -> bool {
        matches!(self, SizingMode::StretchWidth | SizingMode::StretchBoth)
    }
}

/// Host-side rendering context
#[derive(Clone, Debug, Default)]
pub struct ViewContext {
    pub container_id: Option<String>,
    pub sizing_mode: SizingMode,
    /// Pre-rendered child trees, by child slot name (`objects`, ...)
    pub children: IndexMap<String, Vec<RenderNode>>,
}

impl ViewContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, id: impl Into<String>) -> Self {
        self.container_id = Some(id.into());
        self
    }

    pub fn with_sizing_mode(mut self, mode: SizingMode) -> Self {
        self.sizing_mode = mode;
        self
    }

    pub fn with_children(mut self, name: impl Into<String>, nodes: Vec<RenderNode>) -> Self {
        self.children.insert(name.into(), nodes);
        self
    }

    /// Child trees for `name`, empty when absent
    pub fn child(&self, name: &str) -> &[RenderNode] {
        self.children.get(name).map(Vec::as_slice).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tessera_core::{resolve, IconSize};

    #[test]
    fn test_builder_and_find() {
        let tree = RenderNode::new("Box")
            .slot("control", RenderNode::new("Switch").prop("checked", true))
            .child(RenderNode::text_node("Label"));

        let switch = tree.find("Switch").unwrap();
        assert_eq!(switch.get_prop("checked"), Some(&json!(true)));
        assert_eq!(tree.find_all("text").len(), 1);
        assert!(tree.find("Dialog").is_none());
    }

    #[test]
    fn test_prop_opt_skips_null() {
        let node = RenderNode::new("Button")
            .prop_opt("href", Some(FieldValue::Null))
            .prop_opt("target", None)
            .prop_opt("size", Some(json!("small")));
        assert_eq!(node.props.len(), 1);
    }

    #[test]
    fn test_glyph_icon_node() {
        let node = icon_node(&resolve(Some("home"), Some(&IconSize::Px(24.0)))).unwrap();
        assert_eq!(node.kind, "Icon");
        assert_eq!(node.text.as_deref(), Some("home"));
        assert_eq!(node.style.get("font-size").map(String::as_str), Some("24px"));
    }

    #[test]
    fn test_mask_icon_node() {
        let node = icon_node(&resolve(Some("<svg/>"), Some(&IconSize::Px(16.0)))).unwrap();
        assert_eq!(node.kind, "span");
        assert_eq!(node.style.get("width").map(String::as_str), Some("16px"));
        assert!(icon_node(&RenderPlan::None).is_none());
    }

    #[test]
    fn test_serialization_skips_empty() {
        let value = serde_json::to_value(RenderNode::new("Divider")).unwrap();
        assert_eq!(value, json!({ "kind": "Divider" }));
    }

    #[test]
    fn test_sizing_mode() {
        let mode: SizingMode = serde_json::from_value(json!("stretch_both")).unwrap();
        assert!(mode.stretches_width());
        assert!(!SizingMode::StretchHeight.stretches_width());
    }
}

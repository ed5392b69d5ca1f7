//! Toggle icon - a checkbox drawn with an icon pair
//!
//! Unchecked shows `icon` in the outlined font; checked shows `active_icon`,
//! or `icon` again when no active icon is set. Clicking flips `value`.

use serde_json::json;
use tessera_core::{FieldKind, FieldValue, IconSize, ModelSchema, PropertyBinding, SharedModel};

use crate::description::render_description;
use crate::error::Result;
use crate::view::{icon_node, RenderNode, ViewContext};
use crate::widget::{non_empty, Interaction, Widget, WidgetContext, WidgetCore};

pub struct ToggleIcon {
    core: WidgetCore,
    ctx: WidgetContext,
    active_icon: PropertyBinding<Option<String>>,
    color: PropertyBinding<String>,
    disabled: PropertyBinding<bool>,
    icon: PropertyBinding<String>,
    size: PropertyBinding<String>,
    label: PropertyBinding<Option<String>>,
    value: PropertyBinding<bool>,
    sx: PropertyBinding<FieldValue>,
    description: PropertyBinding<Option<String>>,
}

impl ToggleIcon {
    /// Flip `value`
    pub fn click(&self) -> Result<()> {
        self.core.ensure_mounted()?;
        if self.disabled.get() {
            tracing::debug!(widget = Self::NAME, "click ignored while disabled");
            return Ok(());
        }
        self.value.update(|v| !v)?;
        Ok(())
    }

    pub fn checked(&self) -> bool {
        self.value.get()
    }

    /// Icon shown in the checked state
    pub fn checked_icon(&self) -> String {
        non_empty(self.active_icon.get()).unwrap_or_else(|| self.icon.get())
    }
}

impl Widget for ToggleIcon {
    const NAME: &'static str = "ToggleIcon";
    const INTERACTIONS: &'static [&'static str] = &["click"];

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .nullable_field("active_icon", FieldKind::String, FieldValue::Null)
            .field("color", FieldKind::String, json!("primary"))
            .field("disabled", FieldKind::Bool, json!(false))
            .field("icon", FieldKind::String, json!("heart"))
            .field("size", FieldKind::String, json!("medium"))
            .nullable_field("label", FieldKind::String, FieldValue::Null)
            .field("value", FieldKind::Bool, json!(false))
            .field("sx", FieldKind::Any, FieldValue::Null)
            .nullable_field("description", FieldKind::String, FieldValue::Null)
            .build()
    }

    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self> {
        let mut core = WidgetCore::new(Self::NAME, model, ctx);
        Ok(Self {
            active_icon: core.bind("active_icon")?,
            color: core.bind("color")?,
            disabled: core.bind("disabled")?,
            icon: core.bind("icon")?,
            size: core.bind("size")?,
            label: core.bind("label")?,
            value: core.bind("value")?,
            sx: core.bind("sx")?,
            description: core.bind("description")?,
            ctx: ctx.clone(),
            core,
        })
    }

    fn render(&self, _view: &ViewContext) -> RenderNode {
        let size = self.size.get();
        let parsed = size.parse::<IconSize>().ok();
        let standard = parsed.as_ref().is_some_and(IconSize::is_keyword);
        // Glyphs only get an explicit font size for non-keyword sizes
        let font_size = parsed.clone().filter(|_| !standard);
        let text_size = parsed
            .as_ref()
            .map(|s| s.scaled_length(&self.ctx.config.icons.scale))
            .unwrap_or_else(|| size.clone());
        let mask_size = Some(IconSize::Css(text_size.clone()));

        let color_state = if self.disabled.get() {
            "disabled".to_string()
        } else {
            self.color.get()
        };

        let icons = self.ctx.icons();
        let icon = self.icon.get();
        let unchecked = if icon.trim_start().starts_with('<') {
            icons.resolve(Some(icon.as_str()), mask_size.as_ref())
        } else {
            icons.resolve_outlined(Some(icon.as_str()), font_size.as_ref())
        };
        let active = self.checked_icon();
        let checked = if active.trim_start().starts_with('<') {
            icons.resolve(Some(active.as_str()), mask_size.as_ref())
        } else {
            icons.resolve(Some(active.as_str()), font_size.as_ref())
        };
        let tint = |node: RenderNode| {
            if node.kind == "Icon" {
                node.prop("color", color_state.as_str())
            } else {
                node
            }
        };

        let checkbox = RenderNode::new("Checkbox")
            .prop("checked", self.value.get())
            .prop("selected", self.value.get())
            .prop("color", color_state.as_str())
            .prop("disabled", self.disabled.get())
            .prop("size", size.as_str())
            .prop_opt("sx", Some(self.sx.get()))
            .slot_opt("icon", icon_node(&unchecked).map(&tint))
            .slot_opt("checkedIcon", icon_node(&checked).map(&tint));

        let label = non_empty(self.label.get()).map(|label| {
            RenderNode::new("Typography")
                .prop(
                    "sx",
                    json!({
                        "color": "text.primary",
                        "fontSize": format!("calc({text_size} / 2)"),
                    }),
                )
                .child(RenderNode::text_node(label))
                .child_opt(render_description(self.description.get().as_deref()))
        });

        RenderNode::new("Box")
            .prop(
                "sx",
                json!({ "display": "flex", "alignItems": "center", "flexDirection": "row" }),
            )
            .child(checkbox)
            .child_opt(label)
    }

    fn interact(&self, interaction: &Interaction) -> Result<()> {
        match interaction.name.as_str() {
            "click" => self.click(),
            _ => Err(self.core.unknown(interaction)),
        }
    }

    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }
}

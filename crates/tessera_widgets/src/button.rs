//! Button - dispatches a `click` event to the backend
//!
//! The label is rendered as the button text; `icon` and `end_icon` accept
//! either a glyph name or inline vector markup.

use serde_json::{json, Map};
use tessera_core::{FieldKind, FieldValue, ModelSchema, PropertyBinding, SharedModel};

use crate::error::Result;
use crate::view::{icon_node, RenderNode, ViewContext};
use crate::widget::{merge_sx, non_empty, Interaction, Widget, WidgetContext, WidgetCore};

pub struct Button {
    core: WidgetCore,
    ctx: WidgetContext,
    color: PropertyBinding<String>,
    disable_elevation: PropertyBinding<bool>,
    disabled: PropertyBinding<bool>,
    end_icon: PropertyBinding<Option<String>>,
    href: PropertyBinding<Option<String>>,
    icon: PropertyBinding<Option<String>>,
    icon_size: PropertyBinding<FieldValue>,
    label: PropertyBinding<String>,
    loading: PropertyBinding<bool>,
    size: PropertyBinding<String>,
    variant: PropertyBinding<String>,
    sx: PropertyBinding<FieldValue>,
    target: PropertyBinding<Option<String>>,
}

impl Button {
    /// Send `click {}` unless the button is disabled or loading
    pub fn click(&self) -> Result<()> {
        self.core.ensure_mounted()?;
        if self.disabled.get() || self.loading.get() {
            tracing::debug!(widget = Self::NAME, "click ignored while inactive");
            return Ok(());
        }
        self.core.events().dispatch("click", json!({}))?;
        Ok(())
    }

    fn icon(&self, descriptor: Option<String>) -> Option<RenderNode> {
        let size = self.ctx.icon_size(&self.icon_size.get());
        let plan = self
            .ctx
            .icons()
            .resolve(non_empty(descriptor).as_deref(), size.as_ref());
        icon_node(&plan)
    }
}

impl Widget for Button {
    const NAME: &'static str = "Button";
    const INTERACTIONS: &'static [&'static str] = &["click"];

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .field("color", FieldKind::String, json!("primary"))
            .field("disable_elevation", FieldKind::Bool, json!(false))
            .field("disabled", FieldKind::Bool, json!(false))
            .nullable_field("end_icon", FieldKind::String, FieldValue::Null)
            .nullable_field("href", FieldKind::String, FieldValue::Null)
            .nullable_field("icon", FieldKind::String, FieldValue::Null)
            .nullable_field("icon_size", FieldKind::Any, json!("1em"))
            .field("label", FieldKind::String, json!(""))
            .field("loading", FieldKind::Bool, json!(false))
            .field("size", FieldKind::String, json!("medium"))
            .field("variant", FieldKind::String, json!("contained"))
            .field("sx", FieldKind::Any, FieldValue::Null)
            .nullable_field("target", FieldKind::String, FieldValue::Null)
            .build()
    }

    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self> {
        let mut core = WidgetCore::new(Self::NAME, model, ctx);
        Ok(Self {
            color: core.bind("color")?,
            disable_elevation: core.bind("disable_elevation")?,
            disabled: core.bind("disabled")?,
            end_icon: core.bind("end_icon")?,
            href: core.bind("href")?,
            icon: core.bind("icon")?,
            icon_size: core.bind("icon_size")?,
            label: core.bind("label")?,
            loading: core.bind("loading")?,
            size: core.bind("size")?,
            variant: core.bind("variant")?,
            sx: core.bind("sx")?,
            target: core.bind("target")?,
            ctx: ctx.clone(),
            core,
        })
    }

    fn render(&self, _view: &ViewContext) -> RenderNode {
        let mut base = Map::new();
        base.insert("height".into(), json!("100%"));

        RenderNode::new("Button")
            .prop("color", self.color.get())
            .prop("disableElevation", self.disable_elevation.get())
            .prop("disabled", self.disabled.get())
            .prop("fullWidth", true)
            .prop_opt("href", self.href.get().map(FieldValue::from))
            .prop("loading", self.loading.get())
            .prop("loadingPosition", "start")
            .prop("size", self.size.get())
            .prop("sx", merge_sx(base, &self.sx.get()))
            .prop_opt("target", self.target.get().map(FieldValue::from))
            .prop("variant", self.variant.get())
            .slot_opt("startIcon", self.icon(self.icon.get()))
            .slot_opt("endIcon", self.icon(self.end_icon.get()))
            .text(self.label.get())
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

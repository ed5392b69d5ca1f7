//! Switch bound to a boolean `value`

use serde_json::json;
use tessera_core::{FieldKind, FieldValue, ModelSchema, PropertyBinding, SharedModel};

use crate::description::label_with_description;
use crate::error::Result;
use crate::view::{RenderNode, ViewContext};
use crate::widget::{Interaction, Widget, WidgetContext, WidgetCore};

pub struct Switch {
    core: WidgetCore,
    color: PropertyBinding<String>,
    value: PropertyBinding<bool>,
    disabled: PropertyBinding<bool>,
    edge: PropertyBinding<FieldValue>,
    label: PropertyBinding<String>,
    size: PropertyBinding<String>,
    sx: PropertyBinding<FieldValue>,
    description: PropertyBinding<Option<String>>,
}

impl Switch {
    /// Write the new checked state to `value`
    pub fn toggle(&self, checked: bool) -> Result<()> {
        self.core.ensure_mounted()?;
        if self.disabled.get() {
            tracing::debug!(widget = Self::NAME, "toggle ignored while disabled");
            return Ok(());
        }
        self.value.set(checked)?;
        Ok(())
    }

    pub fn checked(&self) -> bool {
        self.value.get()
    }
}

impl Widget for Switch {
    const NAME: &'static str = "Switch";
    const INTERACTIONS: &'static [&'static str] = &["toggle"];

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .field("color", FieldKind::String, json!("primary"))
            .field("value", FieldKind::Bool, json!(false))
            .field("disabled", FieldKind::Bool, json!(false))
            .field("edge", FieldKind::Any, json!(false))
            .field("label", FieldKind::String, json!(""))
            .field("size", FieldKind::String, json!("medium"))
            .field("sx", FieldKind::Any, FieldValue::Null)
            .nullable_field("description", FieldKind::String, FieldValue::Null)
            .build()
    }

    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self> {
        let mut core = WidgetCore::new(Self::NAME, model, ctx);
        Ok(Self {
            color: core.bind("color")?,
            value: core.bind("value")?,
            disabled: core.bind("disabled")?,
            edge: core.bind("edge")?,
            label: core.bind("label")?,
            size: core.bind("size")?,
            sx: core.bind("sx")?,
            description: core.bind("description")?,
            core,
        })
    }

    fn render(&self, _view: &ViewContext) -> RenderNode {
        let control = RenderNode::new("Switch")
            .prop("color", self.color.get())
            .prop("checked", self.value.get())
            .prop("disabled", self.disabled.get())
            .prop("size", self.size.get())
            .prop("edge", self.edge.get())
            .prop_opt("sx", Some(self.sx.get()));

        RenderNode::new("FormControlLabel")
            .slot("control", control)
            .slot(
                "label",
                label_with_description(&self.label.get(), self.description.get().as_deref()),
            )
    }

    /// `toggle` takes the new checked state; without one it flips the switch
    fn interact(&self, interaction: &Interaction) -> Result<()> {
        match interaction.name.as_str() {
            "toggle" => {
                let checked = match &interaction.arg {
                    None => !self.checked(),
                    Some(FieldValue::Bool(b)) => *b,
                    Some(other) => {
                        return Err(self
                            .core
                            .invalid(interaction, format!("expected a bool, got {other}")))
                    }
                };
                self.toggle(checked)
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WidgetError;
    use crate::tests::Harness;
    use tessera_core::Model;

    #[test]
    fn test_toggle_writes_value_upstream() {
        let h = Harness::new();
        let (model, switch) = h.mount::<Switch>(&[("label", json!("Dark mode"))]);

        switch.toggle(true).unwrap();
        assert!(switch.checked());
        assert_eq!(model.get("value").unwrap(), json!(true));
        let outbound = model.drain_outbound();
        assert_eq!(outbound.len(), 1);
        assert_eq!(outbound[0].field, "value");
    }

    #[test]
    fn test_render_label_and_description() {
        let h = Harness::new();
        let (_model, switch) = h.mount::<Switch>(&[
            ("label", json!("Dark mode")),
            ("description", json!("Use the dark palette")),
        ]);
        let node = switch.render(&ViewContext::new());

        let control = node.get_slot("control").unwrap();
        assert_eq!(control.get_prop("checked"), Some(&json!(false)));
        assert!(node.get_slot("label").unwrap().find("Tooltip").is_some());
    }

    #[test]
    fn test_interaction_argument() {
        let h = Harness::new();
        let (_model, switch) = h.mount::<Switch>(&[]);
        switch.interact(&Interaction::parse("toggle:true")).unwrap();
        assert!(switch.checked());
        switch.interact(&Interaction::new("toggle")).unwrap();
        assert!(!switch.checked());

        let err = switch
            .interact(&Interaction::new("toggle").with_arg("yes"))
            .unwrap_err();
        assert!(matches!(err, WidgetError::InvalidArgument { .. }));
    }

    #[test]
    fn test_toggle_after_unmount_fails() {
        let h = Harness::new();
        let (model, mut switch) = h.mount::<Switch>(&[]);
        switch.unmount();
        assert_eq!(model.subscriber_count("value"), 0);
        assert!(matches!(switch.toggle(true), Err(WidgetError::Unmounted)));
    }
}

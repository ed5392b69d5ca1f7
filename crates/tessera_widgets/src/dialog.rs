//! Modal dialog around the host's `objects` children

use serde_json::json;
use tessera_core::{FieldKind, FieldValue, ModelSchema, PropertyBinding, SharedModel};

use crate::error::Result;
use crate::view::{RenderNode, ViewContext};
use crate::widget::{Interaction, Widget, WidgetContext, WidgetCore};

pub struct Dialog {
    core: WidgetCore,
    close_on_click: PropertyBinding<bool>,
    full_screen: PropertyBinding<bool>,
    open: PropertyBinding<bool>,
    title: PropertyBinding<String>,
    scroll: PropertyBinding<String>,
    show_close_button: PropertyBinding<bool>,
    sx: PropertyBinding<FieldValue>,
    width_option: PropertyBinding<String>,
}

impl Dialog {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    /// Backdrop click or escape; closes only when `close_on_click` is set
    pub fn request_close(&self) -> Result<()> {
        self.core.ensure_mounted()?;
        if self.close_on_click.get() {
            self.open.set(false)?;
        }
        Ok(())
    }

    /// Close button
    pub fn close(&self) -> Result<()> {
        self.core.ensure_mounted()?;
        self.open.set(false)?;
        Ok(())
    }
}

impl Widget for Dialog {
    const NAME: &'static str = "Dialog";
    const INTERACTIONS: &'static [&'static str] = &["request_close", "close"];

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .field("close_on_click", FieldKind::Bool, json!(false))
            .field("full_screen", FieldKind::Bool, json!(false))
            .field("open", FieldKind::Bool, json!(false))
            .field("title", FieldKind::String, json!(""))
            .field("scroll", FieldKind::String, json!("paper"))
            .field("show_close_button", FieldKind::Bool, json!(true))
            .field("sx", FieldKind::Any, FieldValue::Null)
            .field("width_option", FieldKind::String, json!("sm"))
            .build()
    }

    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self> {
        let mut core = WidgetCore::new(Self::NAME, model, ctx);
        Ok(Self {
            close_on_click: core.bind("close_on_click")?,
            full_screen: core.bind("full_screen")?,
            open: core.bind("open")?,
            title: core.bind("title")?,
            scroll: core.bind("scroll")?,
            show_close_button: core.bind("show_close_button")?,
            sx: core.bind("sx")?,
            width_option: core.bind("width_option")?,
            core,
        })
    }

    fn render(&self, view: &ViewContext) -> RenderNode {
        let close_button = self.show_close_button.get().then(|| {
            RenderNode::new("IconButton")
                .prop("aria-label", "close")
                .child(RenderNode::new("CloseIcon"))
        });

        let header = RenderNode::new("Box")
            .prop(
                "sx",
                json!({
                    "display": "flex",
                    "alignItems": "center",
                    "justifyContent": "space-between",
                }),
            )
            .child(RenderNode::new("DialogTitle").text(self.title.get()))
            .child_opt(close_button);

        let content = RenderNode::new("DialogContent")
            .prop("sx", json!({ "display": "flex", "flexDirection": "column" }))
            .children(view.child("objects").iter().cloned());

        RenderNode::new("Dialog")
            .prop_opt("container", view.container_id.clone().map(FieldValue::from))
            .prop("fullScreen", self.full_screen.get())
            .prop("fullWidth", view.sizing_mode.stretches_width())
            .prop("maxWidth", self.width_option.get())
            .prop("open", self.open.get())
            .prop("scroll", self.scroll.get())
            .prop_opt("sx", Some(self.sx.get()))
            .child(header)
            .child(content)
    }

    fn interact(&self, interaction: &Interaction) -> Result<()> {
        match interaction.name.as_str() {
            "request_close" => self.request_close(),
            "close" => self.close(),
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

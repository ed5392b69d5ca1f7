//! Icon button with flash feedback
//!
//! A click sends `click` to the backend and then flashes: when `active_icon`
//! is set the icon swaps to it for `toggle_duration` milliseconds, otherwise
//! the button colour switches to the palette's dark shade for that long.
//! Clicking again while flashing restarts the window.

use serde_json::{json, Map};
use tessera_core::{
    Color, FieldKind, FieldValue, FlashDuration, IconSize, ModelSchema, PropertyBinding,
    SharedModel, TransientPhase, TransientState,
};
use tessera_theme::SharedTheme;

use crate::error::Result;
use crate::view::{icon_node, RenderNode, ViewContext};
use crate::widget::{merge_sx, non_empty, Interaction, Widget, WidgetContext, WidgetCore};

pub struct IconButton {
    core: WidgetCore,
    ctx: WidgetContext,
    active_icon: PropertyBinding<Option<String>>,
    color: PropertyBinding<String>,
    disabled: PropertyBinding<bool>,
    edge: PropertyBinding<FieldValue>,
    size: PropertyBinding<String>,
    sx: PropertyBinding<FieldValue>,
    icon_flash: TransientState<String>,
    color_flash: TransientState<Option<Color>>,
}

fn dark_shade(theme: &SharedTheme, color: &str) -> Option<Color> {
    theme.lookup(color).map(|shades| shades.dark)
}

impl IconButton {
    /// Send `click` with `payload`, then flash
    pub fn click(&self, payload: FieldValue) -> Result<()> {
        self.core.ensure_mounted()?;
        if self.disabled.get() {
            tracing::debug!(widget = Self::NAME, "click ignored while disabled");
            return Ok(());
        }
        let sent = self.core.events().dispatch("click", payload);

        if non_empty(self.active_icon.get()).is_some() {
            self.icon_flash.trigger();
        } else if dark_shade(&self.ctx.theme, &self.color.get()).is_some() {
            self.color_flash.trigger();
        } else {
            tracing::debug!(color = %self.color.get(), "no palette shade to flash");
        }

        sent.map_err(Into::into)
    }

    /// Icon currently shown
    pub fn current_icon(&self) -> String {
        self.icon_flash.value()
    }

    /// Colour override while a colour flash is showing
    pub fn color_variant(&self) -> Option<Color> {
        self.color_flash.value()
    }

    pub fn phase(&self) -> TransientPhase {
        if self.icon_flash.is_flashing() || self.color_flash.is_flashing() {
            TransientPhase::Flashing
        } else {
            TransientPhase::Idle
        }
    }
}

impl Widget for IconButton {
    const NAME: &'static str = "IconButton";
    const INTERACTIONS: &'static [&'static str] = &["click"];

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .nullable_field("active_icon", FieldKind::String, FieldValue::Null)
            .field("color", FieldKind::String, json!("default"))
            .field("disabled", FieldKind::Bool, json!(false))
            .field("edge", FieldKind::Any, json!(false))
            .field("icon", FieldKind::String, json!("heart"))
            .field("size", FieldKind::String, json!("medium"))
            .field("sx", FieldKind::Any, FieldValue::Null)
            .nullable_field("toggle_duration", FieldKind::Integer, json!(1000))
            .build()
    }

    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self> {
        let mut core = WidgetCore::new(Self::NAME, model, ctx);
        let icon: PropertyBinding<String> = core.bind("icon")?;
        let active_icon: PropertyBinding<Option<String>> = core.bind("active_icon")?;
        let color: PropertyBinding<String> = core.bind("color")?;
        let toggle_duration: PropertyBinding<Option<i64>> = core.bind("toggle_duration")?;
        let duration = ctx.flash_duration(toggle_duration.get());

        let alternate = active_icon.clone();
        let icon_flash = core.adopt_transient(TransientState::new(
            ctx.scheduler.clone(),
            icon.get(),
            move || alternate.get().unwrap_or_default(),
            duration,
        ));

        let theme = ctx.theme.clone();
        let flash_color = color.clone();
        let color_flash = core.adopt_transient(TransientState::new(
            ctx.scheduler.clone(),
            None,
            move || dark_shade(&theme, &flash_color.get()),
            duration,
        ));

        // A new icon while flashing becomes the revert target
        let flash = icon_flash.clone();
        icon.on_change(move |icon| flash.set_base(icon.clone()));

        let (flash_icon, flash_color) = (icon_flash.clone(), color_flash.clone());
        let fallback = ctx.config.transient.default_duration_ms;
        toggle_duration.on_change(move |ms| {
            let duration = FlashDuration::from_millis_signed(ms.unwrap_or(fallback));
            flash_icon.set_duration(duration);
            flash_color.set_duration(duration);
        });

        Ok(Self {
            active_icon,
            color,
            disabled: core.bind("disabled")?,
            edge: core.bind("edge")?,
            size: core.bind("size")?,
            sx: core.bind("sx")?,
            icon_flash,
            color_flash,
            ctx: ctx.clone(),
            core,
        })
    }

    fn render(&self, _view: &ViewContext) -> RenderNode {
        let size = self.size.get();
        let font_size = match size.parse::<IconSize>() {
            Ok(parsed) if !parsed.is_keyword() => Some(parsed),
            _ => None,
        };

        let mut base = Map::new();
        if let Some(color) = self.color_variant() {
            base.insert("color".into(), json!(color.to_hex()));
        }
        base.insert("width".into(), json!("100%"));

        let plan = self
            .ctx
            .icons()
            .resolve(Some(self.current_icon().as_str()), font_size.as_ref());

        RenderNode::new("IconButton")
            .prop("color", self.color.get())
            .prop("disabled", self.disabled.get())
            .prop("edge", self.edge.get())
            .prop("size", size)
            .prop("sx", merge_sx(base, &self.sx.get()))
            .child_opt(icon_node(&plan))
    }

    fn interact(&self, interaction: &Interaction) -> Result<()> {
        match interaction.name.as_str() {
            "click" => self.click(interaction.arg.clone().unwrap_or_else(|| json!({}))),
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

//! Widget lookup by name

use tessera_core::{ModelSchema, SharedModel};

use crate::button::Button;
use crate::dialog::Dialog;
use crate::error::{Result, WidgetError};
use crate::icon_button::IconButton;
use crate::menu_button::MenuButton;
use crate::switch::Switch;
use crate::toggle_icon::ToggleIcon;
use crate::view::{RenderNode, ViewContext};
use crate::widget::{Interaction, Widget, WidgetContext};

/// Object-safe view of a mounted [`Widget`]
///
/// Method names differ from [`Widget`]'s so both traits can be in scope.
pub trait AnyWidget {
    fn widget_name(&self) -> &'static str;

    fn render_view(&self, view: &ViewContext) -> RenderNode;

    fn handle_interaction(&self, interaction: &Interaction) -> Result<()>;

    fn consume_dirty(&self) -> bool;

    fn teardown(&mut self);
}

impl<W: Widget> AnyWidget for W {
    fn widget_name(&self) -> &'static str {
        W::NAME
    }

    fn render_view(&self, view: &ViewContext) -> RenderNode {
        self.render(view)
    }

    fn handle_interaction(&self, interaction: &Interaction) -> Result<()> {
        self.interact(interaction)
    }

    fn consume_dirty(&self) -> bool {
        self.take_dirty()
    }

    fn teardown(&mut self) {
        self.unmount()
    }
}

/// Static description of a widget type
pub struct WidgetInfo {
    pub name: &'static str,
    pub interactions: &'static [&'static str],
    pub schema: fn() -> ModelSchema,
    mount: fn(&SharedModel, &WidgetContext) -> Result<Box<dyn AnyWidget>>,
}

impl WidgetInfo {
    pub fn mount(&self, model: &SharedModel, ctx: &WidgetContext) -> Result<Box<dyn AnyWidget>> {
        (self.mount)(model, ctx)
    }
}

fn mount_boxed<W: Widget + 'static>(
    model: &SharedModel,
    ctx: &WidgetContext,
) -> Result<Box<dyn AnyWidget>> {
    Ok(Box::new(W::mount(model, ctx)?))
}

macro_rules! widget_info {
    ($widget:ty) => {
        WidgetInfo {
            name: <$widget>::NAME,
            interactions: <$widget>::INTERACTIONS,
            schema: <$widget>::schema,
            mount: mount_boxed::<$widget>,
        }
    };
}

static WIDGETS: [WidgetInfo; 6] = [
    widget_info!(Button),
    widget_info!(IconButton),
    widget_info!(Switch),
    widget_info!(ToggleIcon),
    widget_info!(MenuButton),
    widget_info!(Dialog),
];

/// Every known widget
pub fn widgets() -> &'static [WidgetInfo] {
    &WIDGETS
}

/// Find a widget by name, ignoring case and `_`/`-` separators
pub fn lookup(name: &str) -> Result<&'static WidgetInfo> {
    let wanted = normalize(name);
    WIDGETS
        .iter()
        .find(|info| normalize(info.name) == wanted)
        .ok_or_else(|| WidgetError::UnknownWidget(name.to_string()))
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_is_lenient() {
        assert_eq!(lookup("IconButton").unwrap().name, "IconButton");
        assert_eq!(lookup("icon_button").unwrap().name, "IconButton");
        assert_eq!(lookup("toggle-icon").unwrap().name, "ToggleIcon");
        assert!(matches!(lookup("slider"), Err(WidgetError::UnknownWidget(_))));
    }

    #[test]
    fn test_every_widget_has_schema_and_interactions() {
        for info in widgets() {
            assert!(!(info.schema)().is_empty(), "{} has no fields", info.name);
            assert!(!info.interactions.is_empty(), "{} has no interactions", info.name);
        }
    }
}

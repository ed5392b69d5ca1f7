//! Menu button - a button that opens a list of items
//!
//! Selecting an item sends `{type: "click", item: index}` as a message to the
//! backend and closes the menu. A `null` item, or one labelled `---`, renders
//! as a divider.

use serde::Deserialize;
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;
use tessera_core::{FieldKind, FieldValue, ModelSchema, PropertyBinding, SharedModel};

use crate::error::Result;
use crate::view::{icon_node, RenderNode, ViewContext};
use crate::widget::{non_empty, Interaction, Widget, WidgetContext, WidgetCore};

/// One entry of the `items` field
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct MenuItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub target: Option<String>,
}

impl MenuItem {
    pub fn is_divider(&self) -> bool {
        self.label == "---"
    }
}

/// Decode `items`; entries that are null or not objects become dividers
pub fn parse_items(raw: &FieldValue) -> Vec<Option<MenuItem>> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };
    entries
        .iter()
        .map(|entry| match entry {
            FieldValue::Null => None,
            FieldValue::String(label) => Some(MenuItem {
                label: label.clone(),
                ..Default::default()
            }),
            other => serde_json::from_value::<MenuItem>(other.clone())
                .map_err(|err| tracing::warn!(%err, "unreadable menu item"))
                .ok(),
        })
        .map(|item| item.filter(|item| !item.is_divider()))
        .collect()
}

pub struct MenuButton {
    core: WidgetCore,
    ctx: WidgetContext,
    color: PropertyBinding<String>,
    disabled: PropertyBinding<bool>,
    icon: PropertyBinding<Option<String>>,
    icon_size: PropertyBinding<FieldValue>,
    items: PropertyBinding<FieldValue>,
    label: PropertyBinding<String>,
    loading: PropertyBinding<bool>,
    size: PropertyBinding<String>,
    variant: PropertyBinding<String>,
    sx: PropertyBinding<FieldValue>,
    open: Rc<Cell<bool>>,
}

impl MenuButton {
    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn toggle_menu(&self) -> Result<()> {
        self.core.ensure_mounted()?;
        if self.disabled.get() || self.loading.get() {
            return Ok(());
        }
        self.set_open(!self.open.get());
        Ok(())
    }

    pub fn close_menu(&self) -> Result<()> {
        self.core.ensure_mounted()?;
        self.set_open(false);
        Ok(())
    }

    /// Close the menu and report the selected item index
    pub fn select(&self, index: usize) -> Result<()> {
        self.core.ensure_mounted()?;
        match parse_items(&self.items.get()).get(index) {
            Some(Some(_)) => {}
            Some(None) => {
                return Err(self.core.invalid(
                    &Interaction::new("select"),
                    format!("item {index} is a divider"),
                ))
            }
            None => {
                return Err(self.core.invalid(
                    &Interaction::new("select"),
                    format!("no item at index {index}"),
                ))
            }
        }
        self.set_open(false);
        self.core
            .events()
            .send_message(json!({ "type": "click", "item": index }))?;
        Ok(())
    }

    fn set_open(&self, open: bool) {
        if self.open.replace(open) != open {
            self.core.mark_dirty();
        }
    }

    fn icon(&self, descriptor: Option<String>, padded: bool) -> Option<RenderNode> {
        let size = self.ctx.icon_size(&self.icon_size.get());
        let plan = self
            .ctx
            .icons()
            .resolve(non_empty(descriptor).as_deref(), size.as_ref());
        icon_node(&plan).map(|node| {
            if padded && node.kind == "Icon" {
                node.style("padding-right", "1.5em")
            } else {
                node
            }
        })
    }

    fn menu_item(&self, index: usize, item: Option<MenuItem>) -> RenderNode {
        match item {
            None => RenderNode::new("Divider"),
            Some(item) => RenderNode::new("MenuItem")
                .prop("key", format!("menu-item-{index}"))
                .prop_opt("href", item.href.map(FieldValue::from))
                .prop_opt("target", item.target.map(FieldValue::from))
                .child_opt(self.icon(item.icon, true))
                .child(RenderNode::text_node(item.label)),
        }
    }
}

impl Widget for MenuButton {
    const NAME: &'static str = "MenuButton";
    const INTERACTIONS: &'static [&'static str] = &["toggle_menu", "close_menu", "select"];

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .field("color", FieldKind::String, json!("primary"))
            .field("disabled", FieldKind::Bool, json!(false))
            .nullable_field("icon", FieldKind::String, FieldValue::Null)
            .nullable_field("icon_size", FieldKind::Any, json!("1em"))
            .field("items", FieldKind::Array, json!([]))
            .field("label", FieldKind::String, json!(""))
            .field("loading", FieldKind::Bool, json!(false))
            .field("size", FieldKind::String, json!("medium"))
            .field("variant", FieldKind::String, json!("contained"))
            .field("sx", FieldKind::Any, FieldValue::Null)
            .build()
    }

    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self> {
        let mut core = WidgetCore::new(Self::NAME, model, ctx);
        Ok(Self {
            color: core.bind("color")?,
            disabled: core.bind("disabled")?,
            icon: core.bind("icon")?,
            icon_size: core.bind("icon_size")?,
            items: core.bind("items")?,
            label: core.bind("label")?,
            loading: core.bind("loading")?,
            size: core.bind("size")?,
            variant: core.bind("variant")?,
            sx: core.bind("sx")?,
            open: Rc::new(Cell::new(false)),
            ctx: ctx.clone(),
            core,
        })
    }

    fn render(&self, _view: &ViewContext) -> RenderNode {
        let button = RenderNode::new("Button")
            .prop("color", self.color.get())
            .prop("disabled", self.disabled.get())
            .prop("loading", self.loading.get())
            .prop("size", self.size.get())
            .prop_opt("sx", Some(self.sx.get()))
            .prop("variant", self.variant.get())
            .slot_opt("startIcon", self.icon(self.icon.get(), false))
            .slot("endIcon", RenderNode::new("ArrowDropDownIcon"))
            .text(self.label.get());

        let items = parse_items(&self.items.get())
            .into_iter()
            .enumerate()
            .map(|(index, item)| self.menu_item(index, item));

        let menu = RenderNode::new("Menu")
            .prop("open", self.open.get())
            .children(items);

        RenderNode::new("fragment").child(button).child(menu)
    }

    fn interact(&self, interaction: &Interaction) -> Result<()> {
        match interaction.name.as_str() {
            "toggle_menu" | "click" => self.toggle_menu(),
            "close_menu" => self.close_menu(),
            "select" => {
                let index = interaction
                    .arg
                    .as_ref()
                    .and_then(FieldValue::as_u64)
                    .ok_or_else(|| self.core.invalid(interaction, "expected an item index"))?;
                self.select(index as usize)
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
    use tessera_core::EventKind;

    fn items() -> FieldValue {
        json!([
            { "label": "Open", "icon": "folder_open" },
            null,
            { "label": "---" },
            { "label": "Docs", "href": "https://example.com", "target": "_blank" },
        ])
    }

    #[test]
    fn test_parse_items_dividers() {
        let parsed = parse_items(&items());
        assert_eq!(parsed.len(), 4);
        assert!(parsed[0].is_some());
        assert!(parsed[1].is_none());
        assert!(parsed[2].is_none());
        assert_eq!(parsed[3].as_ref().unwrap().href.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_render_menu_items() {
        let h = Harness::new();
        let (_model, menu) = h.mount::<MenuButton>(&[("items", items()), ("label", json!("File"))]);
        let node = menu.render(&ViewContext::new());

        assert_eq!(node.find_all("Divider").len(), 2);
        assert_eq!(node.find_all("MenuItem").len(), 2);
        let open_icon = node.find("Menu").unwrap().find("Icon").unwrap();
        assert_eq!(open_icon.style.get("padding-right").map(String::as_str), Some("1.5em"));
        assert_eq!(node.find("Menu").unwrap().get_prop("open"), Some(&json!(false)));
    }

    #[test]
    fn test_select_sends_message_and_closes() {
        let mut h = Harness::new();
        let (_model, menu) = h.mount::<MenuButton>(&[("items", items())]);

        menu.toggle_menu().unwrap();
        assert!(menu.is_open());
        assert!(menu.take_dirty());

        menu.interact(&Interaction::parse("select:3")).unwrap();
        assert!(!menu.is_open());

        let events = h.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Message);
        assert_eq!(events[0].payload, json!({ "type": "click", "item": 3 }));
    }

    #[test]
    fn test_select_divider_or_missing_is_invalid() {
        let mut h = Harness::new();
        let (_model, menu) = h.mount::<MenuButton>(&[("items", items())]);
        assert!(matches!(menu.select(1), Err(WidgetError::InvalidArgument { .. })));
        assert!(matches!(menu.select(9), Err(WidgetError::InvalidArgument { .. })));
        assert!(h.events().is_empty());
    }

    #[test]
    fn test_close_menu() {
        let h = Harness::new();
        let (_model, menu) = h.mount::<MenuButton>(&[]);
        menu.toggle_menu().unwrap();
        menu.close_menu().unwrap();
        assert!(!menu.is_open());
    }
}

//! Tessera Widget Library
//!
//! Thin adapters between a host model and a component library. Each widget:
//!
//! 1. **Binds** the model fields it renders through
//!    [`PropertyBinding`](tessera_core::PropertyBinding)s owned by its mount
//!    scope, so every change marks the widget dirty.
//! 2. **Renders** a [`RenderNode`] tree naming component primitives and props.
//! 3. **Routes interactions** back as model writes (switch, toggle icon,
//!    dialog) or backend events (button, icon button, menu button).
//!
//! Unmounting releases every subscription and cancels pending flash timers.
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use serde_json::json;
//! use tessera_core::{ChannelTransport, SharedModel, TimerScheduler, WidgetModel};
//! use tessera_widgets::{Switch, ViewContext, Widget, WidgetContext};
//!
//! let scheduler = TimerScheduler::new();
//! let (transport, _events) = ChannelTransport::new();
//! let ctx = WidgetContext::new(scheduler.handle(), Rc::new(transport));
//!
//! let model: SharedModel = Rc::new(
//!     WidgetModel::with_values("switch-1", Switch::schema(), [("label", json!("Dark mode"))])
//!         .unwrap(),
//! );
//! let switch = Switch::mount(&model, &ctx).unwrap();
//! switch.toggle(true).unwrap();
//!
//! let tree = switch.render(&ViewContext::new());
//! assert_eq!(tree.get_slot("control").unwrap().get_prop("checked"), Some(&json!(true)));
//! ```

pub mod button;
pub mod description;
pub mod dialog;
pub mod error;
pub mod icon_button;
pub mod menu_button;
pub mod registry;
pub mod switch;
pub mod toggle_icon;
pub mod view;
pub mod widget;

#[cfg(test)]
mod tests;

pub use button::Button;
pub use dialog::Dialog;
pub use error::{Result, WidgetError};
pub use icon_button::IconButton;
pub use menu_button::{MenuButton, MenuItem};
pub use registry::{lookup, widgets, AnyWidget, WidgetInfo};
pub use switch::Switch;
pub use toggle_icon::ToggleIcon;
pub use view::{icon_node, RenderNode, SizingMode, ViewContext};
pub use widget::{Interaction, Widget, WidgetContext, WidgetCore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::registry::{lookup, AnyWidget};
    pub use crate::view::{RenderNode, SizingMode, ViewContext};
    pub use crate::widget::{Interaction, Widget, WidgetContext};
    pub use crate::{Button, Dialog, IconButton, MenuButton, Switch, ToggleIcon};
}

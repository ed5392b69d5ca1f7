//! Cross-widget tests and the shared mount harness
//!
//! Every widget module's tests mount through [`Harness`], which owns a virtual
//! clock and drains the backend event channel.

use std::rc::Rc;
use std::time::Duration;

use serde_json::json;
use tessera_core::{
    ChannelTransport, EventKind, EventReceiver, FieldValue, Model, SharedModel, TimerScheduler,
    WidgetEvent, WidgetModel,
};

use crate::registry::{lookup, AnyWidget};
use crate::view::ViewContext;
use crate::widget::{Interaction, Widget, WidgetContext};
use crate::{IconButton, Switch};

pub(crate) struct Harness {
    pub scheduler: TimerScheduler,
    pub ctx: WidgetContext,
    rx: EventReceiver,
}

impl Harness {
    pub fn new() -> Self {
        let scheduler = TimerScheduler::new();
        let (transport, rx) = ChannelTransport::new();
        let ctx = WidgetContext::new(scheduler.handle(), Rc::new(transport));
        Self { scheduler, ctx, rx }
    }

    pub fn model<W: Widget>(&self, values: &[(&str, FieldValue)]) -> Rc<WidgetModel> {
        let values = values.iter().map(|(k, v)| (*k, v.clone()));
        Rc::new(WidgetModel::with_values(format!("{}-1", W::NAME), W::schema(), values).unwrap())
    }

    pub fn mount<W: Widget>(&self, values: &[(&str, FieldValue)]) -> (Rc<WidgetModel>, W) {
        let model = self.model::<W>(values);
        let shared: SharedModel = model.clone();
        let widget = W::mount(&shared, &self.ctx).unwrap();
        (model, widget)
    }

    /// Drain every event sent so far
    pub fn events(&mut self) -> Vec<WidgetEvent> {
        let mut out = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            out.push(event);
        }
        out
    }

    pub fn advance_ms(&self, ms: u64) {
        self.scheduler.advance(Duration::from_millis(ms));
    }
}

fn star_button(h: &Harness) -> (Rc<WidgetModel>, IconButton) {
    h.mount::<IconButton>(&[
        ("icon", json!("star")),
        ("active_icon", json!("star_filled")),
        ("toggle_duration", json!(1000)),
    ])
}

#[test]
fn test_icon_flash_reverts_after_duration() {
    let mut h = Harness::new();
    let (_model, button) = star_button(&h);

    button.click(json!({})).unwrap();
    assert_eq!(button.current_icon(), "star_filled");

    h.advance_ms(999);
    assert_eq!(button.current_icon(), "star_filled");
    h.advance_ms(2);
    assert_eq!(button.current_icon(), "star");

    let events = h.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name, "click");
    assert_eq!(events[0].kind, EventKind::Event);
    assert_eq!(events[0].target, "IconButton-1");
}

#[test]
fn test_second_click_restarts_flash_window() {
    let h = Harness::new();
    let (_model, button) = star_button(&h);

    button.click(json!({})).unwrap();
    h.advance_ms(500);
    button.click(json!({})).unwrap();

    h.advance_ms(999);
    assert_eq!(button.current_icon(), "star_filled");
    h.advance_ms(1);
    assert_eq!(button.current_icon(), "star");
    assert_eq!(h.scheduler.now(), Duration::from_millis(1500));
    assert_eq!(h.scheduler.pending_count(), 0);
}

#[test]
fn test_icon_change_while_flashing_becomes_revert_target() {
    let h = Harness::new();
    let (model, button) = star_button(&h);

    button.click(json!({})).unwrap();
    model.apply_remote("icon", json!("bookmark")).unwrap();
    assert_eq!(button.current_icon(), "star_filled");

    h.advance_ms(1000);
    assert_eq!(button.current_icon(), "bookmark");
}

#[test]
fn test_backend_push_reaches_switch() {
    let h = Harness::new();
    let (model, switch) = h.mount::<Switch>(&[("value", json!(false))]);

    model.apply_remote("value", json!(true)).unwrap();
    assert!(switch.checked());
    assert!(switch.take_dirty());
    assert!(model.drain_outbound().is_empty());

    let node = switch.render(&ViewContext::new());
    assert_eq!(node.get_slot("control").unwrap().get_prop("checked"), Some(&json!(true)));
}

#[test]
fn test_clicks_arrive_in_order() {
    let mut h = Harness::new();
    let (_model, button) = h.mount::<IconButton>(&[]);

    for i in 0..3 {
        button.click(json!({ "seq": i })).unwrap();
    }

    let seqs: Vec<_> = h.events().into_iter().map(|e| e.payload["seq"].clone()).collect();
    assert_eq!(seqs, vec![json!(0), json!(1), json!(2)]);
}

#[test]
fn test_unmount_cancels_pending_flash() {
    let mut h = Harness::new();
    let (model, mut button) = star_button(&h);

    button.click(json!({})).unwrap();
    assert_eq!(h.scheduler.pending_count(), 1);

    button.unmount();
    assert_eq!(h.scheduler.pending_count(), 0);
    assert_eq!(model.subscriber_count("icon"), 0);
    assert_eq!(model.subscriber_count("toggle_duration"), 0);

    h.advance_ms(5000);
    assert_eq!(h.scheduler.fired_count(), 0);
    assert!(button.click(json!({})).is_err());
    assert_eq!(h.events().len(), 1);
}

#[test]
fn test_mount_through_registry() {
    let mut h = Harness::new();
    let info = lookup("menu_button").unwrap();
    let model: SharedModel = Rc::new(
        WidgetModel::with_values(
            "menu-1",
            (info.schema)(),
            [("items", json!([{ "label": "Open" }, { "label": "Save" }]))],
        )
        .unwrap(),
    );
    let mut widget = info.mount(&model, &h.ctx).unwrap();
    assert_eq!(widget.widget_name(), "MenuButton");

    widget.handle_interaction(&Interaction::new("toggle_menu")).unwrap();
    assert!(widget.consume_dirty());
    widget.handle_interaction(&Interaction::parse("select:1")).unwrap();
    assert_eq!(h.events()[0].payload, json!({ "type": "click", "item": 1 }));

    let tree = widget.render_view(&ViewContext::new());
    assert_eq!(tree.find_all("MenuItem").len(), 2);

    widget.teardown();
    assert_eq!(model.get("items").unwrap().as_array().unwrap().len(), 2);
    assert!(widget.handle_interaction(&Interaction::new("close_menu")).is_err());
}

#[test]
fn test_unknown_interaction_is_reported() {
    let h = Harness::new();
    let (_model, switch) = h.mount::<Switch>(&[]);
    let err = switch.interact(&Interaction::new("explode")).unwrap_err();
    assert_eq!(err.to_string(), "Switch has no interaction 'explode'");
}

//! Backend events
//!
//! Widgets report interactions through an [`EventDispatcher`]. A dispatch is
//! fire-and-forget: it hands a [`WidgetEvent`] to the [`Transport`] and
//! returns. Events from one dispatcher reach the transport in call order.

use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::model::FieldValue;

/// How the host routes an event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// A named interaction event (`click`, ...)
    Event,
    /// A free-form message to the backend component
    Message,
}

/// One interaction event on its way to the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetEvent {
    /// Model id of the widget that produced the event
    pub target: String,
    pub kind: EventKind,
    pub name: String,
    pub payload: FieldValue,
}

/// The channel towards the backend
pub trait Transport {
    /// Queue an event; must not block
    fn send(&self, event: WidgetEvent) -> Result<(), TransportError>;
}

/// Shared transport handle
pub type SharedTransport = Rc<dyn Transport>;

/// Receiving end of a [`ChannelTransport`]
pub type EventReceiver = mpsc::UnboundedReceiver<WidgetEvent>;

/// [`Transport`] over an unbounded tokio channel
///
/// The host's async side owns the receiver and forwards events upstream.
/// Sending fails once the receiver is dropped.
#[derive(Clone, Debug)]
pub struct ChannelTransport {
    tx: mpsc::UnboundedSender<WidgetEvent>,
}

impl ChannelTransport {
    pub fn new() -> (Self, EventReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl Transport for ChannelTransport {
    fn send(&self, event: WidgetEvent) -> Result<(), TransportError> {
        self.tx
            .send(event)
            .map_err(|e| TransportError::Unavailable(format!("receiver dropped ({})", e.0.name)))
    }
}

/// Sends interaction events for one widget
pub struct EventDispatcher {
    target: String,
    transport: SharedTransport,
    dispatched: Cell<u64>,
}

impl EventDispatcher {
    pub fn new(target: impl Into<String>, transport: SharedTransport) -> Self {
        Self {
            target: target.into(),
            transport,
            dispatched: Cell::new(0),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Send a named event with `payload`
    pub fn dispatch(&self, name: &str, payload: FieldValue) -> Result<(), TransportError> {
        self.send(EventKind::Event, name, payload)
    }

    /// Send a free-form message
    pub fn send_message(&self, payload: FieldValue) -> Result<(), TransportError> {
        self.send(EventKind::Message, "message", payload)
    }

    /// Number of events accepted by the transport
    pub fn dispatched(&self) -> u64 {
        self.dispatched.get()
    }

    fn send(&self, kind: EventKind, name: &str, payload: FieldValue) -> Result<(), TransportError> {
        let event = WidgetEvent {
            target: self.target.clone(),
            kind,
            name: name.to_string(),
            payload,
        };
        match self.transport.send(event) {
            Ok(()) => {
                self.dispatched.set(self.dispatched.get() + 1);
                tracing::trace!(widget = %self.target, name, "event dispatched");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(widget = %self.target, name, %err, "event dropped");
                Err(err)
            }
        }
    }
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("target", &self.target)
            .field("dispatched", &self.dispatched.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn drain(rx: &mut EventReceiver) -> Vec<WidgetEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn test_dispatch_preserves_order() {
        let (transport, mut rx) = ChannelTransport::new();
        let dispatcher = EventDispatcher::new("button-1", Rc::new(transport));

        for i in 0..3 {
            dispatcher.dispatch("click", json!({ "n": i })).unwrap();
        }
        assert_eq!(dispatcher.dispatched(), 3);

        let events = drain(&mut rx);
        let payloads: Vec<_> = events.iter().map(|e| e.payload["n"].clone()).collect();
        assert_eq!(payloads, vec![json!(0), json!(1), json!(2)]);
        assert!(events
            .iter()
            .all(|e| e.kind == EventKind::Event && e.name == "click" && e.target == "button-1"));
    }

    #[test]
    fn test_message_kind() {
        let (transport, mut rx) = ChannelTransport::new();
        let dispatcher = EventDispatcher::new("menu", Rc::new(transport));
        dispatcher
            .send_message(json!({ "type": "click", "item": 2 }))
            .unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::Message);
        assert_eq!(events[0].payload["item"], json!(2));
    }

    #[test]
    fn test_closed_channel_is_unavailable() {
        let (transport, rx) = ChannelTransport::new();
        drop(rx);
        assert!(transport.is_closed());

        let dispatcher = EventDispatcher::new("button-1", Rc::new(transport));
        let err = dispatcher.dispatch("click", json!({})).unwrap_err();
        assert!(matches!(err, TransportError::Unavailable(_)));
        assert_eq!(dispatcher.dispatched(), 0);
    }

    #[test]
    fn test_event_serializes_kind_lowercase() {
        let event = WidgetEvent {
            target: "t".into(),
            kind: EventKind::Message,
            name: "message".into(),
            payload: json!(null),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["kind"], json!("message"));
    }
}

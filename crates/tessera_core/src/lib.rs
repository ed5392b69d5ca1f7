//! Tessera Core Runtime
//!
//! State synchronization primitives shared by every Tessera widget:
//!
//! - **Model & Bindings**: typed, per-field views of a host-owned model
//! - **Event Dispatch**: fire-and-forget interaction events to the backend
//! - **Timer Scheduler**: cooperative timers on a virtual clock
//! - **Transient State**: flash an alternate value, then revert
//! - **Icon Resolution**: vector markup vs. font glyph render plans
//! - **Mount Scope**: ties subscriptions and timers to a widget's lifetime
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use std::time::Duration;
//! use serde_json::json;
//! use tessera_core::{
//!     FieldKind, FlashDuration, ModelSchema, PropertyBinding, SharedModel, TimerScheduler,
//!     TransientState, WidgetModel,
//! };
//!
//! let schema = ModelSchema::builder()
//!     .field("icon", FieldKind::String, json!("star"))
//!     .build();
//! let model: SharedModel = Rc::new(WidgetModel::new("icon-button", schema));
//! let icon = PropertyBinding::<String>::bind(&model, "icon").unwrap();
//!
//! let scheduler = TimerScheduler::new();
//! let flash = TransientState::new(
//!     scheduler.handle(),
//!     icon.get(),
//!     || "star_filled".to_string(),
//!     FlashDuration::from_millis_signed(1000),
//! );
//!
//! flash.trigger();
//! assert_eq!(flash.value(), "star_filled");
//! scheduler.advance(Duration::from_millis(1000));
//! assert_eq!(flash.value(), "star");
//! ```

pub mod binding;
pub mod color;
pub mod config;
pub mod error;
pub mod events;
pub mod icon;
pub mod model;
pub mod mount;
pub mod scheduler;
pub mod transient;

pub use binding::{BindableValue, BindingObserver, DirtyFlag, PropertyBinding};
pub use color::Color;
pub use config::{IconConfig, IconScale, TesseraConfig, TransientConfig};
pub use error::{BindingError, ConfigError, ModelError, Result, TesseraError, TransportError};
pub use events::{
    ChannelTransport, EventDispatcher, EventKind, EventReceiver, SharedTransport, Transport,
    WidgetEvent,
};
pub use icon::{
    classify, resolve, GlyphPlan, IconKind, IconResolver, IconSize, InlineStyle, MaskPlan,
    RenderPlan,
};
pub use model::{
    ChangeCallback, FieldKind, FieldSpec, FieldValue, Model, ModelSchema, ModelSchemaBuilder,
    PropertyChange, SharedModel, Subscription, SubscriptionId, WidgetModel,
};
pub use mount::{Disposable, MountScope};
pub use scheduler::{SchedulerHandle, TimerCallback, TimerId, TimerScheduler};
pub use transient::{FlashDuration, TransientPhase, TransientState};

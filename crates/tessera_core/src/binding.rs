//! Property bindings - one model field as a typed reactive value
//!
//! A [`PropertyBinding`] subscribes to a single named field. Every change
//! notification for that field updates the local slot, marks the owner's
//! [`DirtyFlag`] and runs the registered observers. Notifications for other
//! fields never touch it.
//!
//! Writes go through the model: [`PropertyBinding::set`] encodes the value,
//! hands it to [`Model::set`] (which queues it upstream) and returns the
//! model's verdict. A rejected write leaves the slot untouched.
//!
//! ```rust
//! use std::rc::Rc;
//! use serde_json::json;
//! use tessera_core::binding::PropertyBinding;
//! use tessera_core::model::{FieldKind, ModelSchema, SharedModel, WidgetModel};
//!
//! let schema = ModelSchema::builder()
//!     .field("value", FieldKind::Bool, json!(false))
//!     .build();
//! let model: SharedModel = Rc::new(WidgetModel::new("switch", schema));
//!
//! let checked = PropertyBinding::<bool>::bind(&model, "value").unwrap();
//! checked.set(true).unwrap();
//! assert!(checked.get());
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::BindingError;
use crate::model::{FieldValue, SharedModel, Subscription};
use crate::mount::Disposable;

/// Shared flag raised when a bound value changes and the owner must re-render
pub type DirtyFlag = Rc<Cell<bool>>;

/// Observer invoked with the new bound value
pub type BindingObserver<T> = Rc<dyn Fn(&T)>;

/// Values that can be bound to a model field
pub trait BindableValue: Clone + PartialEq + Serialize + DeserializeOwned + 'static {}

impl<T> BindableValue for T where T: Clone + PartialEq + Serialize + DeserializeOwned + 'static {}

struct BindingSlot<T> {
    value: T,
    /// Number of change notifications observed
    version: u64,
    dirty: Option<DirtyFlag>,
    observers: Vec<BindingObserver<T>>,
}

struct BindingInner<T> {
    field: String,
    model: SharedModel,
    slot: RefCell<BindingSlot<T>>,
    subscription: RefCell<Option<Subscription>>,
}

/// A typed, reactive view of one model field
///
/// Cloning is cheap; clones share the slot and the subscription, so disposing
/// any clone disposes all of them.
pub struct PropertyBinding<T> {
    inner: Rc<BindingInner<T>>,
}

impl<T> Clone for PropertyBinding<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

fn decode<T: DeserializeOwned>(field: &str, raw: FieldValue) -> Result<T, BindingError> {
    serde_json::from_value(raw).map_err(|e| BindingError::Decode {
        field: field.to_string(),
        message: e.to_string(),
    })
}

impl<T: BindableValue> PropertyBinding<T> {
    /// Bind to `field`, reading its current value from the model
    pub fn bind(model: &SharedModel, field: &str) -> Result<Self, BindingError> {
        let value: T = decode(field, model.get(field)?)?;

        let inner = Rc::new(BindingInner {
            field: field.to_string(),
            model: model.clone(),
            slot: RefCell::new(BindingSlot {
                value,
                version: 0,
                dirty: None,
                observers: Vec::new(),
            }),
            subscription: RefCell::new(None),
        });

        let weak = Rc::downgrade(&inner);
        let callback = Rc::new(move |raw: &FieldValue| {
            if let Some(inner) = weak.upgrade() {
                inner.receive(raw.clone());
            }
        });
        let subscription = Subscription::new(model, field, callback)?;
        *inner.subscription.borrow_mut() = Some(subscription);

        Ok(Self { inner })
    }

    /// Bind and mark `dirty` on every change
    pub fn bind_with_flag(
        model: &SharedModel,
        field: &str,
        dirty: &DirtyFlag,
    ) -> Result<Self, BindingError> {
        let binding = Self::bind(model, field)?;
        binding.inner.slot.borrow_mut().dirty = Some(dirty.clone());
        Ok(binding)
    }

    /// Bind and run `observer` after every change
    pub fn bind_with(
        model: &SharedModel,
        field: &str,
        observer: impl Fn(&T) + 'static,
    ) -> Result<Self, BindingError> {
        let binding = Self::bind(model, field)?;
        binding.on_change(observer);
        Ok(binding)
    }

    /// Current value
    pub fn get(&self) -> T {
        self.inner.slot.borrow().value.clone()
    }

    /// Borrow the current value without cloning
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.slot.borrow().value)
    }

    /// Write a new value through the model
    ///
    /// Returns immediately; the upstream push is the transport's job.
    pub fn set(&self, value: T) -> Result<(), BindingError> {
        if self.is_disposed() {
            return Err(BindingError::Disposed);
        }
        let raw = serde_json::to_value(&value).map_err(|e| BindingError::Encode(e.to_string()))?;
        self.inner.model.set(&self.inner.field, raw)?;
        self.inner.sync();
        Ok(())
    }

    /// Read-modify-write
    pub fn update(&self, f: impl FnOnce(&T) -> T) -> Result<(), BindingError> {
        let next = self.with(f);
        self.set(next)
    }

    /// Register an observer called after each change
    pub fn on_change(&self, observer: impl Fn(&T) + 'static) {
        self.inner
            .slot
            .borrow_mut()
            .observers
            .push(Rc::new(observer));
    }

    /// Number of change notifications received from the model
    pub fn version(&self) -> u64 {
        self.inner.slot.borrow().version
    }

    pub fn field(&self) -> &str {
        &self.inner.field
    }
}

impl<T: BindableValue> BindingInner<T> {
    fn receive(&self, raw: FieldValue) {
        match decode::<T>(&self.field, raw) {
            Ok(value) => {
                self.slot.borrow_mut().version += 1;
                self.apply(value);
            }
            Err(err) => {
                tracing::warn!(field = %self.field, %err, "ignoring undecodable notification");
            }
        }
    }

    /// Take the model's value after a write, which another subscriber may
    /// already have replaced
    fn sync(&self) {
        let current = self
            .model
            .get(&self.field)
            .map_err(BindingError::from)
            .and_then(|raw| decode::<T>(&self.field, raw));
        match current {
            Ok(value) => {
                if self.slot.borrow().value != value {
                    self.apply(value);
                }
            }
            Err(err) => {
                tracing::warn!(field = %self.field, %err, "cannot read back written value");
            }
        }
    }

    fn apply(&self, value: T) {
        let (observers, dirty) = {
            let mut slot = self.slot.borrow_mut();
            slot.value = value.clone();
            (slot.observers.clone(), slot.dirty.clone())
        };
        if let Some(dirty) = dirty {
            dirty.set(true);
        }
        for observer in observers {
            observer(&value);
        }
    }
}

impl<T> Disposable for PropertyBinding<T> {
    fn dispose(&self) {
        if let Some(mut subscription) = self.inner.subscription.borrow_mut().take() {
            tracing::trace!(field = %subscription.field(), "binding detached");
            subscription.unsubscribe();
        }
    }

    fn is_disposed(&self) -> bool {
        self.inner.subscription.borrow().is_none()
    }
}

impl<T: fmt::Debug> fmt::Debug for PropertyBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.slot.borrow();
        f.debug_struct("PropertyBinding")
            .field("field", &self.inner.field)
            .field("value", &slot.value)
            .field("version", &slot.version)
            .finish()
    }
}

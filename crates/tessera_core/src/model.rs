//! Widget model - the shared, addressable bag of named fields
//!
//! A model is owned by the host: the widget only reads and writes named
//! fields and listens for change notifications. Field names and their value
//! types are fixed by a [`ModelSchema`] declared up front.
//!
//! [`WidgetModel`] is the in-memory implementation used by the widgets and
//! the tests. Local writes are queued as outbound [`PropertyChange`]s for the
//! transport to push upstream; backend pushes arrive through
//! [`WidgetModel::apply_remote`].
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use serde_json::json;
//! use tessera_core::model::{FieldKind, Model, ModelSchema, WidgetModel};
//!
//! let schema = ModelSchema::builder()
//!     .field("value", FieldKind::Bool, json!(false))
//!     .build();
//! let model = Rc::new(WidgetModel::new("switch-1", schema));
//!
//! model.set("value", json!(true)).unwrap();
//! assert_eq!(model.get("value").unwrap(), json!(true));
//! assert!(model.set("value", json!("yes")).is_err());
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::error::ModelError;

/// Raw value of a model field
pub type FieldValue = serde_json::Value;

/// Declared value type of a field
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Bool,
    Integer,
    Number,
    String,
    Array,
    Object,
    /// Any JSON value (style dictionaries, event payload templates)
    Any,
}

impl FieldKind {
    /// Check a non-null value against this kind
    pub fn accepts(&self, value: &FieldValue) -> bool {
        match self {
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::Number => value.is_number(),
            FieldKind::String => value.is_string(),
            FieldKind::Array => value.is_array(),
            FieldKind::Object => value.is_object(),
            FieldKind::Any => true,
        }
    }

    /// Name of the JSON type of `value`, for error messages
    pub fn describe(value: &FieldValue) -> &'static str {
        match value {
            FieldValue::Null => "null",
            FieldValue::Bool(_) => "bool",
            FieldValue::Number(n) if n.is_f64() => "number",
            FieldValue::Number(_) => "integer",
            FieldValue::String(_) => "string",
            FieldValue::Array(_) => "array",
            FieldValue::Object(_) => "object",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Bool => "bool",
            FieldKind::Integer => "integer",
            FieldKind::Number => "number",
            FieldKind::String => "string",
            FieldKind::Array => "array",
            FieldKind::Object => "object",
            FieldKind::Any => "any",
        };
        f.write_str(name)
    }
}

/// Declaration of a single field
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldSpec {
    pub kind: FieldKind,
    /// Whether `null` is an accepted value
    pub nullable: bool,
    pub default: FieldValue,
}

impl FieldSpec {
    /// Validate `value` for the field `name`
    pub fn check(&self, name: &str, value: &FieldValue) -> Result<(), ModelError> {
        if value.is_null() && (self.nullable || self.kind == FieldKind::Any) {
            return Ok(());
        }
        if self.kind.accepts(value) {
            Ok(())
        } else {
            Err(ModelError::TypeMismatch {
                field: name.to_string(),
                expected: self.kind,
                found: FieldKind::describe(value).to_string(),
            })
        }
    }
}

/// Ordered set of field declarations
#[derive(Clone, Debug, Default)]
pub struct ModelSchema {
    fields: Vec<(String, FieldSpec)>,
    index: FxHashMap<String, usize>,
}

impl ModelSchema {
    pub fn builder() -> ModelSchemaBuilder {
        ModelSchemaBuilder::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.index.get(name).map(|&i| &self.fields[i].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`ModelSchema`]
#[derive(Default)]
pub struct ModelSchemaBuilder {
    schema: ModelSchema,
}

impl ModelSchemaBuilder {
    /// Declare a non-nullable field
    pub fn field(self, name: impl Into<String>, kind: FieldKind, default: FieldValue) -> Self {
        self.declare(name.into(), FieldSpec {
            kind,
            nullable: false,
            default,
        })
    }

    /// Declare a field that also accepts `null`
    pub fn nullable_field(
        self,
        name: impl Into<String>,
        kind: FieldKind,
        default: FieldValue,
    ) -> Self {
        self.declare(name.into(), FieldSpec {
            kind,
            nullable: true,
            default,
        })
    }

    fn declare(mut self, name: String, spec: FieldSpec) -> Self {
        // Redeclaring a field replaces its spec but keeps its position
        if let Some(&i) = self.schema.index.get(&name) {
            self.schema.fields[i].1 = spec;
        } else {
            self.schema.index.insert(name.clone(), self.schema.fields.len());
            self.schema.fields.push((name, spec));
        }
        self
    }

    pub fn build(self) -> ModelSchema {
        self.schema
    }
}

new_key_type! {
    /// Handle to a field-change subscription
    pub struct SubscriptionId;
}

/// Callback invoked with the new value of a field
pub type ChangeCallback = Rc<dyn Fn(&FieldValue)>;

/// The model interface consumed by bindings
///
/// Implementations must deliver notifications for a field in the order the
/// writes were applied, and must not hold internal borrows while invoking
/// callbacks (callbacks may write back into the model). When a callback
/// writes the field it is being notified for, subscribers not yet reached
/// see only the newer value.
pub trait Model {
    /// Identifier the backend uses to address this model
    fn id(&self) -> &str;

    fn schema(&self) -> &ModelSchema;

    fn get(&self, field: &str) -> Result<FieldValue, ModelError>;

    /// Apply a local write; rejected writes leave the field unchanged
    fn set(&self, field: &str, value: FieldValue) -> Result<(), ModelError>;

    fn subscribe(&self, field: &str, callback: ChangeCallback)
        -> Result<SubscriptionId, ModelError>;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Shared handle to a model
pub type SharedModel = Rc<dyn Model>;

/// RAII guard for a field subscription
///
/// Detaches from the model on [`unsubscribe`](Subscription::unsubscribe) or
/// when dropped, whichever comes first.
pub struct Subscription {
    model: Weak<dyn Model>,
    id: Option<SubscriptionId>,
    field: String,
}

impl Subscription {
    pub fn new(
        model: &SharedModel,
        field: &str,
        callback: ChangeCallback,
    ) -> Result<Self, ModelError> {
        let id = model.subscribe(field, callback)?;
        Ok(Self {
            model: Rc::downgrade(model),
            id: Some(id),
            field: field.to_string(),
        })
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn is_active(&self) -> bool {
        self.id.is_some()
    }

    pub fn unsubscribe(&mut self) {
        if let Some(id) = self.id.take() {
            if let Some(model) = self.model.upgrade() {
                model.unsubscribe(id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.unsubscribe();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("field", &self.field)
            .field("id", &self.id)
            .finish()
    }
}

/// A local write waiting to be pushed upstream
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PropertyChange {
    pub field: String,
    pub value: FieldValue,
}

struct SubscriberEntry {
    field: String,
    callback: ChangeCallback,
}

#[derive(Default)]
struct ModelState {
    values: FxHashMap<String, FieldValue>,
    subscribers: SlotMap<SubscriptionId, SubscriberEntry>,
    by_field: FxHashMap<String, SmallVec<[SubscriptionId; 4]>>,
    /// Applied writes per field
    revisions: FxHashMap<String, u64>,
    outbound: Vec<PropertyChange>,
}

/// In-memory [`Model`] implementation
pub struct WidgetModel {
    id: String,
    schema: ModelSchema,
    state: RefCell<ModelState>,
}

impl WidgetModel {
    /// Create a model with every field at its declared default
    pub fn new(id: impl Into<String>, schema: ModelSchema) -> Self {
        let values = schema
            .fields()
            .map(|(name, spec)| (name.to_string(), spec.default.clone()))
            .collect();
        Self {
            id: id.into(),
            schema,
            state: RefCell::new(ModelState {
                values,
                ..Default::default()
            }),
        }
    }

    /// Create a model and overlay initial values
    ///
    /// Unknown fields and type mismatches are rejected.
    pub fn with_values<I, K>(
        id: impl Into<String>,
        schema: ModelSchema,
        values: I,
    ) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = (K, FieldValue)>,
        K: Into<String>,
    {
        let model = Self::new(id, schema);
        {
            let mut state = model.state.borrow_mut();
            for (name, value) in values {
                let name = name.into();
                model.spec(&name)?.check(&name, &value)?;
                state.values.insert(name, value);
            }
        }
        Ok(model)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Apply a write coming from the backend
    ///
    /// Subscribers are notified, but nothing is queued for upstream.
    pub fn apply_remote(&self, field: &str, value: FieldValue) -> Result<(), ModelError> {
        self.write(field, value, false)
    }

    /// Take all local writes that have not been pushed upstream yet
    pub fn drain_outbound(&self) -> Vec<PropertyChange> {
        std::mem::take(&mut self.state.borrow_mut().outbound)
    }

    /// Number of live subscriptions on `field`
    pub fn subscriber_count(&self, field: &str) -> usize {
        self.state
            .borrow()
            .by_field
            .get(field)
            .map_or(0, |ids| ids.len())
    }

    /// Snapshot of all field values in schema order
    pub fn snapshot(&self) -> Vec<(String, FieldValue)> {
        let state = self.state.borrow();
        self.schema
            .fields()
            .map(|(name, _)| {
                let value = state.values.get(name).cloned().unwrap_or_default();
                (name.to_string(), value)
            })
            .collect()
    }

    fn spec(&self, field: &str) -> Result<&FieldSpec, ModelError> {
        self.schema
            .get(field)
            .ok_or_else(|| ModelError::UnknownField(field.to_string()))
    }

    fn write(&self, field: &str, value: FieldValue, local: bool) -> Result<(), ModelError> {
        if let Err(err) = self.spec(field).and_then(|spec| spec.check(field, &value)) {
            tracing::debug!(model = %self.id, field, %err, "rejected write");
            return Err(err);
        }

        let revision = {
            let mut state = self.state.borrow_mut();
            if state.values.get(field) == Some(&value) {
                return Ok(());
            }
            state.values.insert(field.to_string(), value.clone());
            if local {
                state.outbound.push(PropertyChange {
                    field: field.to_string(),
                    value: value.clone(),
                });
            }
            let revision = state.revisions.entry(field.to_string()).or_default();
            *revision += 1;
            *revision
        };

        self.notify(field, &value, revision);
        Ok(())
    }

    fn revision(&self, field: &str) -> u64 {
        self.state
            .borrow()
            .revisions
            .get(field)
            .copied()
            .unwrap_or_default()
    }

    /// Deliver `value` unless a callback has already written `field` again
    fn notify(&self, field: &str, value: &FieldValue, revision: u64) {
        let pending: SmallVec<[(SubscriptionId, ChangeCallback); 4]> = {
            let state = self.state.borrow();
            match state.by_field.get(field) {
                Some(ids) => ids
                    .iter()
                    .filter_map(|&id| state.subscribers.get(id).map(|s| (id, s.callback.clone())))
                    .collect(),
                None => return,
            }
        };

        for (id, callback) in pending {
            // A nested write has already delivered a newer value
            if self.revision(field) != revision {
                break;
            }
            // An earlier callback may have unsubscribed this one
            if !self.state.borrow().subscribers.contains_key(id) {
                continue;
            }
            callback(value);
        }
    }
}

impl Model for WidgetModel {
    fn id(&self) -> &str {
        &self.id
    }

    fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    fn get(&self, field: &str) -> Result<FieldValue, ModelError> {
        self.spec(field)?;
        Ok(self
            .state
            .borrow()
            .values
            .get(field)
            .cloned()
            .unwrap_or_default())
    }

    fn set(&self, field: &str, value: FieldValue) -> Result<(), ModelError> {
        self.write(field, value, true)
    }

    fn subscribe(
        &self,
        field: &str,
        callback: ChangeCallback,
    ) -> Result<SubscriptionId, ModelError> {
        self.spec(field)?;
        let mut state = self.state.borrow_mut();
        let id = state.subscribers.insert(SubscriberEntry {
            field: field.to_string(),
            callback,
        });
        state.by_field.entry(field.to_string()).or_default().push(id);
        Ok(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        let mut state = self.state.borrow_mut();
        if let Some(entry) = state.subscribers.remove(id) {
            if let Some(ids) = state.by_field.get_mut(&entry.field) {
                ids.retain(|s| *s != id);
            }
        }
    }
}

impl fmt::Debug for WidgetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetModel")
            .field("id", &self.id)
            .field("fields", &self.schema.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::Cell;

    fn schema() -> ModelSchema {
        ModelSchema::builder()
            .field("value", FieldKind::Bool, json!(false))
            .field("label", FieldKind::String, json!(""))
            .field("toggle_duration", FieldKind::Integer, json!(1000))
            .nullable_field("icon_size", FieldKind::String, FieldValue::Null)
            .field("sx", FieldKind::Any, json!({}))
            .build()
    }

    #[test]
    fn test_defaults_and_set() {
        let model = WidgetModel::new("m", schema());
        assert_eq!(model.get("value").unwrap(), json!(false));
        assert_eq!(model.get("toggle_duration").unwrap(), json!(1000));

        model.set("label", json!("Hello")).unwrap();
        assert_eq!(model.get("label").unwrap(), json!("Hello"));
    }

    #[test]
    fn test_type_mismatch_rejected() {
        let model = WidgetModel::new("m", schema());
        let err = model.set("value", json!("true")).unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
        assert_eq!(model.get("value").unwrap(), json!(false));

        // Floats are not integers
        assert!(model.set("toggle_duration", json!(1.5)).is_err());
        // Non-nullable fields reject null
        assert!(model.set("label", FieldValue::Null).is_err());
        // Nullable ones accept it
        model.set("icon_size", json!("24px")).unwrap();
        model.set("icon_size", FieldValue::Null).unwrap();
    }

    #[test]
    fn test_unknown_field() {
        let model = WidgetModel::new("m", schema());
        assert_eq!(
            model.get("nope"),
            Err(ModelError::UnknownField("nope".into()))
        );
        assert!(model.set("nope", json!(1)).is_err());
        assert!(model.subscribe("nope", Rc::new(|_: &FieldValue| {})).is_err());
    }

    #[test]
    fn test_with_values_validates() {
        let model = WidgetModel::with_values("m", schema(), [("value", json!(true))]).unwrap();
        assert_eq!(model.get("value").unwrap(), json!(true));

        assert!(WidgetModel::with_values("m", schema(), [("value", json!(3))]).is_err());
        assert!(WidgetModel::with_values("m", schema(), [("other", json!(3))]).is_err());
    }

    #[test]
    fn test_notifications_are_per_field() {
        let model = WidgetModel::new("m", schema());
        let value_calls = Rc::new(Cell::new(0));
        let label_calls = Rc::new(Cell::new(0));

        let v = value_calls.clone();
        model
            .subscribe("value", Rc::new(move |_: &FieldValue| v.set(v.get() + 1)))
            .unwrap();
        let l = label_calls.clone();
        model
            .subscribe("label", Rc::new(move |_: &FieldValue| l.set(l.get() + 1)))
            .unwrap();

        model.set("value", json!(true)).unwrap();
        assert_eq!(value_calls.get(), 1);
        assert_eq!(label_calls.get(), 0);
    }

    #[test]
    fn test_unchanged_write_is_silent() {
        let model = WidgetModel::new("m", schema());
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        model
            .subscribe("value", Rc::new(move |_: &FieldValue| c.set(c.get() + 1)))
            .unwrap();

        model.set("value", json!(false)).unwrap();
        assert_eq!(calls.get(), 0);
        assert!(model.drain_outbound().is_empty());
    }

    #[test]
    fn test_outbound_queue() {
        let model = WidgetModel::new("m", schema());
        model.set("value", json!(true)).unwrap();
        model.apply_remote("label", json!("from backend")).unwrap();
        model.set("label", json!("local")).unwrap();

        assert_eq!(
            model.drain_outbound(),
            vec![
                PropertyChange {
                    field: "value".into(),
                    value: json!(true)
                },
                PropertyChange {
                    field: "label".into(),
                    value: json!("local")
                },
            ]
        );
        assert!(model.drain_outbound().is_empty());
    }

    #[test]
    fn test_subscription_guard_detaches_on_drop() {
        let model: Rc<WidgetModel> = Rc::new(WidgetModel::new("m", schema()));
        let shared: SharedModel = model.clone();
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();

        let sub = Subscription::new(&shared, "value", Rc::new(move |_: &FieldValue| c.set(c.get() + 1))).unwrap();
        assert_eq!(model.subscriber_count("value"), 1);

        drop(sub);
        assert_eq!(model.subscriber_count("value"), 0);
        model.set("value", json!(true)).unwrap();
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_unsubscribe_during_notification() {
        let model: Rc<WidgetModel> = Rc::new(WidgetModel::new("m", schema()));
        let shared: SharedModel = model.clone();
        let second_calls = Rc::new(Cell::new(0));

        let second_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let slot = second_slot.clone();
        let _first = Subscription::new(
            &shared,
            "value",
            Rc::new(move |_: &FieldValue| {
                if let Some(mut sub) = slot.borrow_mut().take() {
                    sub.unsubscribe();
                }
            }),
        )
        .unwrap();
        let c = second_calls.clone();
        *second_slot.borrow_mut() =
            Some(Subscription::new(&shared, "value", Rc::new(move |_: &FieldValue| c.set(c.get() + 1))).unwrap());

        model.set("value", json!(true)).unwrap();
        assert_eq!(second_calls.get(), 0);
    }

    #[test]
    fn test_reentrant_write_from_callback() {
        let model: Rc<WidgetModel> = Rc::new(WidgetModel::new("m", schema()));
        let weak = Rc::downgrade(&model);
        model
            .subscribe(
                "value",
                Rc::new(move |v: &FieldValue| {
                    if let Some(model) = weak.upgrade() {
                        let label = if v.as_bool() == Some(true) { "on" } else { "off" };
                        model.set("label", json!(label)).unwrap();
                    }
                }),
            )
            .unwrap();

        model.set("value", json!(true)).unwrap();
        assert_eq!(model.get("label").unwrap(), json!("on"));
    }

    /// Forces `value` back to false whenever it becomes true
    fn clamp_to_false(model: &Rc<WidgetModel>) -> Rc<Cell<u32>> {
        let calls = Rc::new(Cell::new(0));
        let c = calls.clone();
        let weak = Rc::downgrade(model);
        model
            .subscribe(
                "value",
                Rc::new(move |v: &FieldValue| {
                    c.set(c.get() + 1);
                    if v.as_bool() == Some(true) {
                        if let Some(model) = weak.upgrade() {
                            model.set("value", json!(false)).unwrap();
                        }
                    }
                }),
            )
            .unwrap();
        calls
    }

    #[test]
    fn test_same_field_write_from_callback_wins() {
        let model: Rc<WidgetModel> = Rc::new(WidgetModel::new("m", schema()));
        let clamp_calls = clamp_to_false(&model);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        model
            .subscribe("value", Rc::new(move |v: &FieldValue| s.borrow_mut().push(v.clone())))
            .unwrap();

        model.apply_remote("value", json!(true)).unwrap();
        assert_eq!(model.get("value").unwrap(), json!(false));
        // The later subscriber never sees the overwritten `true`
        assert_eq!(*seen.borrow(), vec![json!(false)]);
        assert_eq!(clamp_calls.get(), 2);
    }

    #[test]
    fn test_redeclared_field_keeps_position() {
        let schema = ModelSchema::builder()
            .field("a", FieldKind::Bool, json!(false))
            .field("b", FieldKind::Bool, json!(false))
            .field("a", FieldKind::String, json!(""))
            .build();
        let names: Vec<_> = schema.fields().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(schema.get("a").unwrap().kind, FieldKind::String);
    }
}

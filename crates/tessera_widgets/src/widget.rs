//! Widget trait, mount context and shared per-widget plumbing

use serde_json::{Map, Value};
use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use tessera_core::{
    BindableValue, DirtyFlag, Disposable, EventDispatcher, FieldValue, FlashDuration,
    IconResolver, IconSize, Model, ModelSchema, MountScope, PropertyBinding, SchedulerHandle,
    SharedModel, SharedTransport, TesseraConfig, TransientState,
};
use tessera_theme::{SharedTheme, ThemeState};

use crate::error::{Result, WidgetError};
use crate::view::{RenderNode, ViewContext};

/// Everything a widget needs from the host while mounted
#[derive(Clone)]
pub struct WidgetContext {
    pub scheduler: SchedulerHandle,
    pub transport: SharedTransport,
    pub theme: SharedTheme,
    pub config: Rc<TesseraConfig>,
    icons: IconResolver,
}

impl WidgetContext {
    pub fn new(scheduler: SchedulerHandle, transport: SharedTransport) -> Self {
        Self {
            scheduler,
            transport,
            theme: Rc::new(ThemeState::default()),
            config: Rc::new(TesseraConfig::default()),
            icons: IconResolver::default(),
        }
    }

    pub fn with_theme(mut self, theme: SharedTheme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_config(mut self, config: TesseraConfig) -> Self {
        self.icons = IconResolver::new(&config.icons);
        self.config = Rc::new(config);
        self
    }

    pub fn icons(&self) -> &IconResolver {
        &self.icons
    }

    /// Flash duration from a nullable model value, falling back to the config
    pub fn flash_duration(&self, ms: Option<i64>) -> FlashDuration {
        FlashDuration::from_millis_signed(
            ms.unwrap_or(self.config.transient.default_duration_ms),
        )
    }

    /// Icon size from a nullable model value, falling back to the config
    pub fn icon_size(&self, raw: &FieldValue) -> Option<IconSize> {
        IconSize::from_field(raw).or_else(|| {
            self.config
                .icons
                .default_size
                .as_deref()
                .and_then(|s| s.parse().ok())
        })
    }
}

impl fmt::Debug for WidgetContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetContext")
            .field("scheduler", &self.scheduler)
            .field("scheme", &self.theme.scheme())
            .finish()
    }
}

/// A named user interaction, optionally with an argument
#[derive(Clone, Debug, PartialEq)]
pub struct Interaction {
    pub name: String,
    pub arg: Option<FieldValue>,
}

impl Interaction {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arg: None,
        }
    }

    pub fn with_arg(mut self, arg: impl Into<FieldValue>) -> Self {
        self.arg = Some(arg.into());
        self
    }

    /// Parse `name` or `name:arg`; the argument is read as JSON, else as a string
    pub fn parse(s: &str) -> Self {
        match s.split_once(':') {
            Some((name, arg)) => {
                let arg = arg.trim();
                let value = serde_json::from_str(arg).unwrap_or_else(|_| Value::from(arg));
                Self::new(name.trim()).with_arg(value)
            }
            None => Self::new(s.trim()),
        }
    }
}

/// Plumbing every widget shares: model, mount scope, dirty flag, dispatcher
pub struct WidgetCore {
    name: &'static str,
    model: SharedModel,
    scope: MountScope,
    dirty: DirtyFlag,
    events: EventDispatcher,
}

impl WidgetCore {
    pub fn new(name: &'static str, model: &SharedModel, ctx: &WidgetContext) -> Self {
        tracing::debug!(widget = name, model = model.id(), "mounting");
        Self {
            name,
            model: model.clone(),
            scope: MountScope::new(format!("{name}:{}", model.id())),
            dirty: Rc::new(Cell::new(false)),
            events: EventDispatcher::new(model.id(), ctx.transport.clone()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn model(&self) -> &SharedModel {
        &self.model
    }

    /// Bind a field; the binding marks this widget dirty and dies with it
    pub fn bind<T: BindableValue>(&mut self, field: &str) -> Result<PropertyBinding<T>> {
        let binding = PropertyBinding::bind_with_flag(&self.model, field, &self.dirty)?;
        Ok(self.scope.adopt(binding))
    }

    /// Register a transient state; its changes mark this widget dirty
    pub fn adopt_transient<T: Clone + PartialEq + 'static>(
        &mut self,
        state: TransientState<T>,
    ) -> TransientState<T> {
        let dirty = self.dirty.clone();
        state.on_change(move |_| dirty.set(true));
        self.scope.adopt(state)
    }

    pub fn adopt<D: Disposable + Clone + 'static>(&mut self, item: D) -> D {
        self.scope.adopt(item)
    }

    pub fn events(&self) -> &EventDispatcher {
        &self.events
    }

    pub fn mark_dirty(&self) {
        self.dirty.set(true);
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.replace(false)
    }

    pub fn is_mounted(&self) -> bool {
        !self.scope.is_unmounted()
    }

    pub fn ensure_mounted(&self) -> Result<()> {
        if self.is_mounted() {
            Ok(())
        } else {
            Err(WidgetError::Unmounted)
        }
    }

    pub fn unknown(&self, interaction: &Interaction) -> WidgetError {
        WidgetError::UnknownInteraction {
            widget: self.name,
            name: interaction.name.clone(),
        }
    }

    pub fn invalid(&self, interaction: &Interaction, message: impl Into<String>) -> WidgetError {
        WidgetError::InvalidArgument {
            widget: self.name,
            name: interaction.name.clone(),
            message: message.into(),
        }
    }

    pub fn unmount(&mut self) {
        self.scope.unmount();
    }
}

impl fmt::Debug for WidgetCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetCore")
            .field("name", &self.name)
            .field("model", &self.model.id())
            .field("scope", &self.scope)
            .finish()
    }
}

/// A widget adapter over a model
pub trait Widget {
    /// Widget name as the host knows it
    const NAME: &'static str;

    /// Interaction names accepted by [`interact`](Widget::interact)
    const INTERACTIONS: &'static [&'static str];

    /// Fields the model must declare
    fn schema() -> ModelSchema
    where
        Self: Sized;

    /// Bind to `model` and wire interactions
    fn mount(model: &SharedModel, ctx: &WidgetContext) -> Result<Self>
    where
        Self: Sized;

    fn render(&self, view: &ViewContext) -> RenderNode;

    /// Route a user interaction
    fn interact(&self, interaction: &Interaction) -> Result<()>;

    fn core(&self) -> &WidgetCore;

    fn core_mut(&mut self) -> &mut WidgetCore;

    /// Release every binding and pending timer
    fn unmount(&mut self) {
        self.core_mut().unmount();
    }

    fn take_dirty(&self) -> bool {
        self.core().take_dirty()
    }
}

/// `{base..., sx...}` with `sx` keys winning
pub(crate) fn merge_sx(base: Map<String, Value>, sx: &FieldValue) -> FieldValue {
    let mut merged = base;
    if let Value::Object(extra) = sx {
        for (k, v) in extra {
            merged.insert(k.clone(), v.clone());
        }
    }
    Value::Object(merged)
}

/// Text of a nullable string field, `None` when null or empty
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_interaction_parse() {
        assert_eq!(Interaction::parse("click"), Interaction::new("click"));
        assert_eq!(
            Interaction::parse("select:2"),
            Interaction::new("select").with_arg(2)
        );
        assert_eq!(
            Interaction::parse("toggle:true"),
            Interaction::new("toggle").with_arg(true)
        );
        assert_eq!(
            Interaction::parse("click:hello"),
            Interaction::new("click").with_arg("hello")
        );
    }

    #[test]
    fn test_merge_sx() {
        let mut base = Map::new();
        base.insert("height".into(), json!("100%"));
        base.insert("color".into(), json!(null));
        let merged = merge_sx(base, &json!({ "color": "red", "margin": 2 }));
        assert_eq!(merged, json!({ "height": "100%", "color": "red", "margin": 2 }));

        let untouched = merge_sx(Map::new(), &json!(null));
        assert_eq!(untouched, json!({}));
    }

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty(Some("  ".into())), None);
        assert_eq!(non_empty(Some("x".into())), Some("x".into()));
        assert_eq!(non_empty(None), None);
    }
}

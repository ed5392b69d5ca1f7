//! Error types for tessera_widgets

use thiserror::Error;
use tessera_core::{BindingError, TransportError};

/// Errors raised while mounting a widget or handling an interaction
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The widget has no interaction with this name
    #[error("{widget} has no interaction '{name}'")]
    UnknownInteraction { widget: &'static str, name: String },

    /// The interaction argument is missing or has the wrong shape
    #[error("invalid argument for {widget}.{name}: {message}")]
    InvalidArgument {
        widget: &'static str,
        name: String,
        message: String,
    },

    /// No widget is registered under this name
    #[error("unknown widget '{0}'")]
    UnknownWidget(String),

    /// The widget was unmounted
    #[error("widget has been unmounted")]
    Unmounted,
}

/// Result type for widget operations
pub type Result<T> = std::result::Result<T, WidgetError>;

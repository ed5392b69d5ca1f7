//! Error types for tessera_core

use thiserror::Error;

use crate::model::FieldKind;

/// Errors raised by a [`Model`](crate::model::Model) implementation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// The field is not declared in the model schema
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// The value does not match the declared field type
    #[error("field '{field}' expects {expected}, got {found}")]
    TypeMismatch {
        field: String,
        expected: FieldKind,
        found: String,
    },

    /// The model has been dropped
    #[error("model has been disposed")]
    Disposed,
}

/// Errors surfaced by a [`PropertyBinding`](crate::binding::PropertyBinding)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BindingError {
    /// The model refused the write; the bound value is unchanged
    #[error("write rejected: {0}")]
    WriteRejected(#[from] ModelError),

    /// The local value could not be encoded as a field value
    #[error("failed to encode value: {0}")]
    Encode(String),

    /// The model value could not be decoded as the bound type
    #[error("failed to decode field '{field}': {message}")]
    Decode { field: String, message: String },

    /// The binding was disposed (owning widget unmounted)
    #[error("binding has been disposed")]
    Disposed,
}

/// Errors surfaced by a backend [`Transport`](crate::events::Transport)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The backend channel cannot accept events
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised while loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error when reading the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Any error produced by tessera_core
#[derive(Error, Debug)]
pub enum TesseraError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for tessera_core operations
pub type Result<T> = std::result::Result<T, TesseraError>;

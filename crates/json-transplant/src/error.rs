//! The single error type surfaced by every transplant operation.

use thiserror::Error;

use crate::ordered_map::DuplicateKeyError;

/// Broad classification of a [`TransplantError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The container's declared shape is invalid. Payload independent.
    Schema,
    /// The JSON payload does not have the shape a container needs.
    Shape,
    /// A root property and a sibling field share a name.
    Collision,
    /// Delegated per-field (de)serialization failed.
    Conversion,
    /// Converter options could not be parsed or applied.
    Config,
}

#[derive(Debug, Error)]
pub enum TransplantError {
    // ── Schema ──────────────────────────────────────────────────────────────
    #[error("type '{type_name}' is not a transplant container")]
    NotContainer { type_name: &'static str },
    #[error("container type must have exactly one transplant root field: {type_name}")]
    MissingRoot { type_name: &'static str },
    #[error("container type must not have more than one transplant root field: {type_name}")]
    MultipleRoots { type_name: &'static str },
    #[error("container type must not have more than one designated constructor: {type_name}")]
    MultipleRecipes { type_name: &'static str },
    #[error("container type '{type_name}' declares clashing field or parameter names")]
    DuplicateField {
        type_name: &'static str,
        #[source]
        source: DuplicateKeyError,
    },
    #[error("designated constructor of '{type_name}' has no parameter for root field '{root}'")]
    UnboundRootParameter {
        type_name: &'static str,
        root: &'static str,
    },
    #[error(
        "constructor parameter '{param}' of '{type_name}' is declared as {expected} but binds field of type {found}"
    )]
    ParameterTypeMismatch {
        type_name: &'static str,
        param: &'static str,
        expected: &'static str,
        found: &'static str,
    },
    #[error("container type '{type_name}' has neither a designated constructor nor a default factory")]
    NotConstructible { type_name: &'static str },
    #[error("field '{field}' of '{type_name}' cannot be assigned")]
    ReadOnlyField {
        type_name: &'static str,
        field: &'static str,
    },
    #[error("constructor argument '{param}' was read as {expected}")]
    ArgumentType {
        param: &'static str,
        expected: &'static str,
    },

    // ── Shape ───────────────────────────────────────────────────────────────
    #[error("root-named property '{root}' required")]
    RootKeyMissing { root: String },
    #[error("duplicate occurrence of root-named property '{root}'")]
    DuplicateRootKey { root: String },
    #[error("property names clash while reading container type '{type_name}'")]
    DuplicateKey {
        type_name: &'static str,
        #[source]
        source: DuplicateKeyError,
    },
    #[error("did not expect token {token} (while reading container type '{type_name}')")]
    UnexpectedToken {
        type_name: &'static str,
        token: &'static str,
    },
    #[error("not expecting token type {token} (while serializing container type '{type_name}')")]
    UnexpectedRootShape {
        type_name: &'static str,
        token: &'static str,
    },

    // ── Collision ───────────────────────────────────────────────────────────
    #[error("property '{key}' can't exist on both container type '{type_name}' and root type")]
    Collision {
        key: String,
        type_name: &'static str,
        #[source]
        source: DuplicateKeyError,
    },

    // ── Conversion ──────────────────────────────────────────────────────────
    #[error("failed to serialize field '{field}' of '{type_name}'")]
    Encode {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to deserialize field '{field}' of '{type_name}'")]
    Decode {
        type_name: &'static str,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    // ── Config ──────────────────────────────────────────────────────────────
    #[error("unknown name comparer '{0}'")]
    UnknownComparer(String),
    #[error("invalid {format} converter options: {message}")]
    InvalidOptions {
        format: &'static str,
        message: String,
    },
}

impl TransplantError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotContainer { .. }
            | Self::MissingRoot { .. }
            | Self::MultipleRoots { .. }
            | Self::MultipleRecipes { .. }
            | Self::DuplicateField { .. }
            | Self::UnboundRootParameter { .. }
            | Self::ParameterTypeMismatch { .. }
            | Self::NotConstructible { .. }
            | Self::ReadOnlyField { .. }
            | Self::ArgumentType { .. } => ErrorKind::Schema,
            Self::RootKeyMissing { .. }
            | Self::DuplicateRootKey { .. }
            | Self::DuplicateKey { .. }
            | Self::UnexpectedToken { .. }
            | Self::UnexpectedRootShape { .. } => ErrorKind::Shape,
            Self::Collision { .. } => ErrorKind::Collision,
            Self::Encode { .. } | Self::Decode { .. } => ErrorKind::Conversion,
            Self::UnknownComparer(_) | Self::InvalidOptions { .. } => ErrorKind::Config,
        }
    }
}

/// Name of a JSON value's kind as used in error messages.
pub(crate) fn token_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Number(n) if n.is_f64() => "Float",
        Value::Number(_) => "Integer",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}

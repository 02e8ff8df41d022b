use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors that abort the construction or rendering of a bound fragment.
#[derive(Debug, Error)]
pub enum BindError {
    /// A toggle binding did not follow the `attribute.state.toggle` form.
    #[error("toggle binding `{attribute}` must have exactly 3 segments (attribute.state.toggle)")]
    ToggleArity { attribute: String },

    /// The attribute name does not end with a recognised binding suffix.
    #[error("`{0}` is not a binding attribute")]
    NotBinding(String),

    /// List rendering was attempted without a declared key field.
    #[error("list rendering requires a `data.key` attribute naming the key field")]
    MissingKeyField,

    /// A primitive of the host document failed.
    #[error("dom operation `{operation}` failed: {message}")]
    Dom {
        operation: &'static str,
        message: String,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl BindError {
    /// Helper to build a [`BindError::Dom`] for the named operation.
    pub fn dom<M>(operation: &'static str, message: M) -> Self
    where
        M: Into<String>,
    {
        Self::Dom {
            operation,
            message: message.into(),
        }
    }
}

impl From<BindError> for JsValue {
    fn from(error: BindError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

/// Failure to walk a dotted path through a data value. Never fatal: callers log it and carry on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An intermediate segment resolved to something that has no members.
    #[error("cannot read `{segment}` of a non-container value in `{path}`")]
    NotAContainer { path: String, segment: String },

    /// An intermediate segment does not exist.
    #[error("`{segment}` does not exist in `{path}`")]
    MissingSegment { path: String, segment: String },

    /// A segment used against an array is not a valid index.
    #[error("`{segment}` is not a valid index in `{path}`")]
    BadIndex { path: String, segment: String },
}

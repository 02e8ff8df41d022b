use crate::error::BindError;

/// Attribute written by a one segment `watch` binding.
pub const DEFAULT_WATCH_ATTRIBUTE: &str = "content";

/// Event listened to by a one segment `action` binding.
pub const DEFAULT_ACTION_EVENT: &str = "click";

/// Attribute written by a one segment `asset` binding.
pub const DEFAULT_ASSET_ATTRIBUTE: &str = "src";

/// The kind of binding encoded by the final segment of an attribute name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    Watch,
    Toggle,
    Action,
    Asset,
}

impl BindingKind {
    /// Match the suffix of an attribute name against the recognised kinds.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        use BindingKind::*;

        Some(match suffix {
            "watch" => Watch,
            "toggle" => Toggle,
            "action" => Action,
            "asset" => Asset,
            _ => return None,
        })
    }
}

/// The state a binding is scoped to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Applies whenever no binding exists for the data's current state.
    Global,

    /// Applies only while the data is in the named state.
    Named(String),
}

impl StateKey {
    /// Key for the state read from the data, where `None` means no state is present.
    pub fn current(state: Option<&str>) -> Self {
        state
            .map(|state| Self::Named(state.to_string()))
            .unwrap_or(Self::Global)
    }
}

/// A parsed binding attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    pub kind: BindingKind,

    /// The attribute name exactly as it appeared in the markup.
    pub raw_name: String,

    /// The attribute value: a data path for `watch`, a literal for `toggle`, an action type for
    /// `action`, and an asset path for `asset`.
    pub value: String,

    /// Event listened to. Only present for `action`.
    pub event: Option<String>,

    /// Attribute written to. Present for every kind except `action`.
    pub attribute: Option<String>,

    pub state: StateKey,
}

/// Whether an attribute name carries a binding.
pub fn is_binding(name: &str) -> bool {
    name.rsplit('.')
        .next()
        .and_then(BindingKind::from_suffix)
        .is_some()
}

/// Native events whose own name begins with `on`.
const ON_PREFIXED_EVENTS: [&str; 1] = ["online"];

/// Strip an optional leading `on` from an event name, so `onclick` and `click` bind the same
/// event. Events that are themselves named `on...` are left alone, unless written with a second
/// prefix (`ononline`).
pub fn normalize_event(event: &str) -> &str {
    if ON_PREFIXED_EVENTS.contains(&event) {
        return event;
    }

    match event.strip_prefix("on") {
        Some(rest) if !rest.is_empty() => rest,
        _ => event,
    }
}

/// Parse a binding attribute from its name and value.
///
/// The name is split on `.`. The final segment selects the [`BindingKind`], the first names the
/// attribute (or event) and anything in between names the state. Missing segments fall back to
/// the default attribute or event of the kind, and to [`StateKey::Global`].
pub fn parse(name: &str, value: &str) -> Result<BindingDescriptor, BindError> {
    let segments = name.split('.').collect::<Vec<_>>();
    let (suffix, head) = segments
        .split_last()
        .ok_or_else(|| BindError::NotBinding(name.to_string()))?;
    let kind =
        BindingKind::from_suffix(suffix).ok_or_else(|| BindError::NotBinding(name.to_string()))?;

    if kind == BindingKind::Toggle && segments.len() != 3 {
        return Err(BindError::ToggleArity {
            attribute: name.to_string(),
        });
    }

    let target = head.first().map(|segment| segment.to_string());
    let state = match head {
        [_, state @ ..] if !state.is_empty() && kind != BindingKind::Asset => {
            StateKey::Named(state.join("."))
        }
        _ => StateKey::Global,
    };

    let (event, attribute) = match kind {
        BindingKind::Action => {
            let event = target.unwrap_or_else(|| DEFAULT_ACTION_EVENT.to_string());
            (Some(normalize_event(&event).to_string()), None)
        }
        BindingKind::Watch => (
            None,
            Some(target.unwrap_or_else(|| DEFAULT_WATCH_ATTRIBUTE.to_string())),
        ),
        BindingKind::Asset => (
            None,
            Some(target.unwrap_or_else(|| DEFAULT_ASSET_ATTRIBUTE.to_string())),
        ),
        BindingKind::Toggle => (None, target),
    };

    Ok(BindingDescriptor {
        kind,
        raw_name: name.to_string(),
        value: value.to_string(),
        event,
        attribute,
        state,
    })
}

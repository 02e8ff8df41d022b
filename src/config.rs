use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;

use crate::error::BindError;

/// Settings shared by every component rendered from the same document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BindingConfig {
    /// Member of the data object holding the current state.
    pub state_field: String,

    /// Tag of the single-value component element.
    pub single_tag: String,

    /// Tag of the list component element.
    pub list_tag: String,

    /// Class applied to a component element until its first render has been painted.
    pub hidden_class: String,

    /// Attribute on a list component naming the data member used as the stable key.
    pub key_attribute: String,

    /// Prefix that `asset` bindings are resolved against.
    pub asset_base: String,

    /// Properties that `watch` bindings mirror directly onto nodes.
    pub properties: PropertyRegistry,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            state_field: "_state".to_string(),
            single_tag: "kinesis-state".to_string(),
            list_tag: "kinesis-list".to_string(),
            hidden_class: "kinesis-hidden".to_string(),
            key_attribute: "data.key".to_string(),
            asset_base: String::new(),
            properties: PropertyRegistry::default(),
        }
    }
}

impl BindingConfig {
    /// Parse a configuration from JSON. Missing fields take their default value.
    pub fn from_json(source: &str) -> Result<Self, BindError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Whether `tag` is one of the component tags, in which case scanning stops at it.
    pub fn is_component_tag(&self, tag: &str) -> bool {
        tag.eq_ignore_ascii_case(&self.single_tag) || tag.eq_ignore_ascii_case(&self.list_tag)
    }

    /// Join an asset path onto [`Self::asset_base`].
    pub fn resolve_asset(&self, path: &str) -> String {
        if self.asset_base.is_empty() || path.contains("://") || path.starts_with('/') {
            return path.to_string();
        }

        format!(
            "{}/{}",
            self.asset_base.trim_end_matches('/'),
            path.trim_start_matches("./")
        )
    }
}

/// Closed registry of node properties that can be assigned directly, rather than discovering
/// them at runtime. Properties listed under `global` apply to every tag.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PropertyRegistry {
    pub global: IndexSet<String>,
    pub tags: IndexMap<String, IndexSet<String>>,
}

impl Default for PropertyRegistry {
    fn default() -> Self {
        let mut registry = Self {
            global: ["hidden", "title", "id"].into_iter().map(String::from).collect(),
            tags: IndexMap::new(),
        };

        for tag in ["input", "textarea", "select"] {
            registry.register(tag, "value");
            registry.register(tag, "disabled");
        }
        registry.register("input", "checked");
        registry.register("button", "disabled");
        registry.register("option", "selected");

        // Component elements accept their data and reducer as properties
        for tag in ["kinesis-state", "kinesis-list"] {
            registry.register(tag, "data");
            registry.register(tag, "reducer");
        }

        registry
    }
}

impl PropertyRegistry {
    /// An empty registry, where no attribute is mirrored as a property.
    pub fn empty() -> Self {
        Self {
            global: IndexSet::new(),
            tags: IndexMap::new(),
        }
    }

    /// Register `property` as settable on elements with the given tag.
    pub fn register<T, P>(&mut self, tag: T, property: P)
    where
        T: AsRef<str>,
        P: Into<String>,
    {
        self.tags
            .entry(tag.as_ref().to_ascii_lowercase())
            .or_default()
            .insert(property.into());
    }

    /// Whether `property` is settable on an element with the given tag.
    pub fn contains(&self, tag: &str, property: &str) -> bool {
        self.global.contains(property)
            || self
                .tags
                .get(&tag.to_ascii_lowercase())
                .is_some_and(|properties| properties.contains(property))
    }
}

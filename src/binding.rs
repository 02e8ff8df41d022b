use indexmap::IndexMap;

use crate::{
    dom::Dom,
    error::BindError,
    grammar::{is_binding, parse, BindingDescriptor, BindingKind, StateKey},
};

/// State -> attribute -> data path.
pub type WatchTable = IndexMap<StateKey, IndexMap<String, String>>;

/// Attribute -> state -> value appended to the attribute.
pub type ToggleTable = IndexMap<String, IndexMap<StateKey, String>>;

/// Event -> state -> action type.
pub type ActionTable = IndexMap<String, IndexMap<StateKey, String>>;

/// Every binding declared on a single node, grouped into lookup tables. Built once when the
/// node's fragment is created, and never changed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeBindingSet {
    pub watch: WatchTable,
    pub toggle: ToggleTable,
    pub action: ActionTable,

    /// Attribute -> asset path.
    pub assets: IndexMap<String, String>,

    /// Every non-binding attribute of the node, as declared in the markup.
    pub defaults: IndexMap<String, String>,
}

impl NodeBindingSet {
    /// Group descriptors into tables. Descriptors are applied in order, so a later descriptor
    /// targeting the same coordinate replaces an earlier one.
    pub fn from_descriptors<I>(descriptors: I) -> Self
    where
        I: IntoIterator<Item = BindingDescriptor>,
    {
        let mut set = Self::default();

        for descriptor in descriptors {
            let BindingDescriptor {
                kind,
                value,
                event,
                attribute,
                state,
                ..
            } = descriptor;

            match kind {
                BindingKind::Watch => {
                    set.watch
                        .entry(state)
                        .or_default()
                        .insert(attribute.unwrap_or_default(), value);
                }
                BindingKind::Toggle => {
                    set.toggle
                        .entry(attribute.unwrap_or_default())
                        .or_default()
                        .insert(state, value);
                }
                BindingKind::Action => {
                    set.action
                        .entry(event.unwrap_or_default())
                        .or_default()
                        .insert(state, value);
                }
                BindingKind::Asset => {
                    set.assets.insert(attribute.unwrap_or_default(), value);
                }
            }
        }

        set
    }

    /// Read every binding attribute of `node`, build the tables, and strip the binding attributes
    /// from the node. Non-binding attributes are captured as defaults before anything is removed.
    ///
    /// A malformed binding fails the whole build, leaving the node untouched.
    pub fn build<D>(dom: &D, node: &D::Node) -> Result<Self, BindError>
    where
        D: Dom,
    {
        let mut descriptors = Vec::new();
        let mut defaults = IndexMap::new();

        for name in dom.attribute_names(node) {
            let value = dom.get_attribute(node, &name).unwrap_or_default();

            if is_binding(&name) {
                descriptors.push(parse(&name, &value)?);
            } else {
                defaults.insert(name, value);
            }
        }

        for descriptor in &descriptors {
            dom.remove_attribute(node, &descriptor.raw_name)?;
        }

        Ok(Self {
            defaults,
            ..Self::from_descriptors(descriptors)
        })
    }

    /// The watch bindings in effect for `state`, falling back to the global bindings.
    pub fn watch_for(&self, state: &StateKey) -> Option<&IndexMap<String, String>> {
        self.watch
            .get(state)
            .or_else(|| self.watch.get(&StateKey::Global))
    }

    /// The action type bound to `event` for `state`, falling back to the global binding.
    pub fn action_for(&self, event: &str, state: &StateKey) -> Option<&str> {
        let states = self.action.get(event)?;

        states
            .get(state)
            .or_else(|| states.get(&StateKey::Global))
            .map(String::as_str)
    }

    /// Compute the value of a toggled attribute for `state`: the default value of the attribute
    /// followed by the value bound to exactly that state, separated by a space.
    pub fn toggled_value(&self, attribute: &str, state: &StateKey) -> String {
        let specific = self
            .toggle
            .get(attribute)
            .and_then(|states| states.get(state));

        self.defaults
            .get(attribute)
            .into_iter()
            .chain(specific)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Every distinct event with an action bound to it.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.action.keys().map(String::as_str)
    }
}

use std::rc::Rc;

use indexmap::{map::Entry, IndexMap, IndexSet};
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::{
    config::BindingConfig,
    dom::{Dom, Location},
    error::BindError,
    path::{extract_value, stringify},
    renderer::Renderer,
    snapshot::{DataSnapshot, HostLink},
};

/// Renders a [`Renderer`] for each item of a list, keyed by a member of each item.
///
/// A renderer is created the first time its key is seen, and is kept (along with its nodes) for as
/// long as the key remains in the list. The registry holds the only reference to each renderer.
pub struct KeyedRendererRegistry<D>
where
    D: Dom,
{
    dom: D,

    /// Template that each new renderer is cloned from.
    template: Vec<D::Node>,

    config: Rc<BindingConfig>,
    link: HostLink<D::Event>,

    /// Member of each item used as its key.
    key_field: Option<String>,

    renderers: IndexMap<String, Renderer<D>>,
}

impl<D> KeyedRendererRegistry<D>
where
    D: Dom,
{
    pub fn new(
        dom: &D,
        template: Vec<D::Node>,
        config: &Rc<BindingConfig>,
        link: &HostLink<D::Event>,
        key_field: Option<String>,
    ) -> Self {
        Self {
            dom: dom.clone(),
            template,
            config: Rc::clone(config),
            link: link.clone(),
            key_field,
            renderers: IndexMap::new(),
        }
    }

    pub fn key_field(&self) -> Option<&str> {
        self.key_field.as_deref()
    }

    /// Change the member used as the key. Existing renderers are kept, and will be evicted on the
    /// next render if their keys no longer appear.
    pub fn set_key_field(&mut self, key_field: Option<String>) {
        self.key_field = key_field;
    }

    /// The key of `item`.
    pub fn key_of(&self, item: &Value) -> Result<String, BindError> {
        let key_field = self.key_field.as_ref().ok_or(BindError::MissingKeyField)?;

        Ok(stringify(&extract_value(item, key_field)))
    }

    pub fn get(&self, key: &str) -> Option<&Renderer<D>> {
        self.renderers.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.renderers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Reconcile the mounted fragments with `items`, mounting them at `location` in list order.
    ///
    /// Renderers whose key has disappeared are removed first. The remaining items are then
    /// visited in reverse, moving each fragment in front of the one after it. A fragment that is
    /// already in place is not touched.
    pub fn render(&mut self, items: &[Value], location: &Location<D>) -> Result<(), BindError> {
        let keys = items
            .iter()
            .map(|item| self.key_of(item))
            .collect::<Result<Vec<_>, _>>()?;

        // Position of the first occurrence of each key, which owns the key's renderer
        let mut first = IndexMap::<&str, usize>::new();
        for (index, key) in keys.iter().enumerate() {
            first.entry(key.as_str()).or_insert(index);
        }

        self.evict(&first.keys().copied().collect())?;

        let mut anchor = location.clone();
        for (index, (item, key)) in items.iter().zip(&keys).enumerate().rev() {
            if first.get(key.as_str()) != Some(&index) {
                warn!(%key, index, "duplicate key in list, skipping item");
                continue;
            }

            let renderer = match self.renderers.entry(key.clone()) {
                Entry::Occupied(entry) => entry.into_mut(),
                Entry::Vacant(entry) => {
                    debug!(%key, "creating renderer for new key");
                    entry.insert(Renderer::new(
                        &self.dom,
                        &self.template,
                        &self.config,
                        &self.link,
                    )?)
                }
            };

            for node in renderer.nodes().iter().rev() {
                if anchor.mount_if_moved(&self.dom, node)? {
                    trace!(%key, "moved node");
                }
                anchor.advance_to(node);
            }

            let snapshot = Rc::new(DataSnapshot::item(item.clone(), key.clone(), index));
            renderer.render(Rc::new(move || Rc::clone(&snapshot)))?;
        }

        Ok(())
    }

    /// Remove every renderer whose key is not within `keys`.
    fn evict(&mut self, keys: &IndexSet<&str>) -> Result<(), BindError> {
        let stale = self
            .renderers
            .keys()
            .filter(|key| !keys.contains(key.as_str()))
            .cloned()
            .collect::<Vec<_>>();

        for key in stale {
            if let Some(renderer) = self.renderers.shift_remove(&key) {
                debug!(%key, "evicting renderer");
                renderer.remove()?;
            }
        }

        Ok(())
    }

    /// Remove every renderer and its nodes.
    pub fn clear(&mut self) -> Result<(), BindError> {
        for (_, renderer) in self.renderers.drain(..) {
            renderer.remove()?;
        }

        Ok(())
    }
}

mod r#ref;

pub use self::r#ref::ComponentRef;

use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::{
    config::BindingConfig,
    dom::{Dom, Location},
    error::BindError,
    keyed::KeyedRendererRegistry,
    path::inject_value,
    renderer::Renderer,
    snapshot::{DataSnapshot, HostLink, Reducer, Transition},
};

/// How a component renders its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// The data is a single object, rendered once.
    Single,

    /// The data is an array, with the template rendered once per item.
    List,
}

impl Mode {
    /// The mode of the component with the provided tag, if it is a component tag.
    pub fn for_tag(config: &BindingConfig, tag: &str) -> Option<Self> {
        if tag.eq_ignore_ascii_case(&config.single_tag) {
            Some(Self::Single)
        } else if tag.eq_ignore_ascii_case(&config.list_tag) {
            Some(Self::List)
        } else {
            None
        }
    }
}

enum View<D>
where
    D: Dom,
{
    Single(Renderer<D>),
    List(KeyedRendererRegistry<D>),
}

/// A host element that owns some data and a reducer, and renders its own children as a template
/// for that data.
///
/// Each piece of state sits in its own cell, so that listeners and callbacks may re-enter the
/// component while another part of it is borrowed.
pub struct Component<D>
where
    D: Dom,
{
    dom: D,
    element: D::Node,
    mode: Mode,
    config: Rc<BindingConfig>,

    /// Reference to this component, handed to deferred callbacks.
    self_ref: ComponentRef<D>,

    /// Link shared with every renderer of this component.
    link: HostLink<D::Event>,

    data: RefCell<Value>,

    /// Member of each item used as its key, in list mode.
    key_field: RefCell<Option<String>>,

    /// Present once the component has mounted.
    view: RefCell<Option<View<D>>>,

    /// Children of the element captured on mount, restored on disconnect.
    template: RefCell<Vec<D::Node>>,

    /// Whether the first mount has been requested.
    connected: Cell<bool>,

    mounted: Cell<bool>,
    mounted_callbacks: RefCell<Vec<Box<dyn FnOnce()>>>,
    data_changed: RefCell<Option<Rc<dyn Fn(&Value)>>>,
}

impl<D> Component<D>
where
    D: Dom,
{
    /// Create a component for `element`. Nothing is rendered until [`Self::connect`] is called.
    pub fn new(dom: &D, element: D::Node, mode: Mode, config: &Rc<BindingConfig>) -> Rc<Self> {
        let self_ref = ComponentRef::new();

        let link = HostLink::new(
            {
                let self_ref = self_ref.clone();
                Rc::new(move |transition: Transition| {
                    self_ref.with("update", |component| component.update(transition))
                })
            },
            Rc::new(RefCell::new(None)),
            {
                let self_ref = self_ref.clone();
                Rc::new(move |index: Option<usize>, path: &str, value: Value| {
                    self_ref.with("write back", |component| {
                        component.write_back(index, path, value);
                        Ok(())
                    })
                })
            },
        );

        let data = match mode {
            Mode::Single => Value::Object(Map::new()),
            Mode::List => Value::Array(Vec::new()),
        };
        let key_field = dom.get_attribute(&element, &config.key_attribute);

        let component = Rc::new(Self {
            dom: dom.clone(),
            element,
            mode,
            config: Rc::clone(config),
            self_ref: self_ref.clone(),
            link,
            data: RefCell::new(data),
            key_field: RefCell::new(key_field),
            view: RefCell::new(None),
            template: RefCell::new(Vec::new()),
            connected: Cell::new(false),
            mounted: Cell::new(false),
            mounted_callbacks: RefCell::new(Vec::new()),
            data_changed: RefCell::new(None),
        });

        self_ref.replace_with(&component);

        component
    }

    /// Create a component for `element` if it carries one of the component tags.
    pub fn for_element(dom: &D, element: D::Node, config: &Rc<BindingConfig>) -> Option<Rc<Self>> {
        let mode = Mode::for_tag(config, &dom.tag(&element)?)?;

        Some(Self::new(dom, element, mode, config))
    }

    pub fn element(&self) -> &D::Node {
        &self.element
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.get()
    }

    pub fn key_field(&self) -> Option<String> {
        self.key_field.borrow().clone()
    }

    /// Hide the element, and schedule the first mount for the next frame.
    pub fn connect(&self) -> Result<(), BindError> {
        if self.mounted.get() || self.connected.replace(true) {
            return Ok(());
        }

        self.dom
            .add_class(&self.element, &self.config.hidden_class)?;

        let self_ref = self.self_ref.clone();
        self.dom
            .request_frame(Box::new(move || self_ref.with("mount", Self::mount)))
    }

    /// Capture the children of the element as the template, and render them for the first time.
    /// Does nothing if the element has since been detached, or if already mounted.
    pub fn mount(&self) -> Result<(), BindError> {
        if self.mounted.get() {
            return Ok(());
        }

        if !self.dom.is_attached(&self.element) {
            debug!("element detached before mounting, skipping");
            self.connected.set(false);
            return Ok(());
        }

        let template = self.dom.children(&self.element);
        for node in &template {
            self.dom.remove(node)?;
        }

        let view = match self.mode {
            Mode::Single => {
                let renderer = Renderer::new(&self.dom, &template, &self.config, &self.link)?;
                renderer.mount(&Location::parent(&self.element))?;
                View::Single(renderer)
            }
            Mode::List => View::List(KeyedRendererRegistry::new(
                &self.dom,
                template.clone(),
                &self.config,
                &self.link,
                self.key_field(),
            )),
        };
        *self.view.borrow_mut() = Some(view);
        *self.template.borrow_mut() = template;
        self.mounted.set(true);

        self.render()?;
        self.dom
            .remove_class(&self.element, &self.config.hidden_class)?;

        debug!(mode = ?self.mode, "mounted component");

        let callbacks = std::mem::take(&mut *self.mounted_callbacks.borrow_mut());
        callbacks.into_iter().for_each(|callback| callback());

        Ok(())
    }

    /// Tear down the rendered nodes and put the template back in the element, leaving the
    /// component ready to be connected again. The data and reducer are kept.
    pub fn disconnect(&self) -> Result<(), BindError> {
        self.connected.set(false);

        let Some(view) = self.view.borrow_mut().take() else {
            return Ok(());
        };
        self.mounted.set(false);

        match view {
            View::Single(renderer) => renderer.remove()?,
            View::List(mut registry) => registry.clear()?,
        }

        let location = Location::parent(&self.element);
        for node in self.template.take() {
            location.mount(&self.dom, &node)?;
        }

        debug!(mode = ?self.mode, "disconnected component");
        Ok(())
    }

    /// A copy of the current data.
    pub fn data(&self) -> Value {
        self.data.borrow().clone()
    }

    /// Replace the data, re-rendering if mounted.
    pub fn set_data(&self, data: Value) -> Result<(), BindError> {
        *self.data.borrow_mut() = data;

        self.render()
    }

    pub fn set_reducer(&self, reducer: Reducer<D::Event>) {
        *self.link.reducer.borrow_mut() = Some(reducer);
    }

    /// Run `callback` once the component has mounted, or immediately if it already has.
    pub fn on_mounted<F>(&self, callback: F)
    where
        F: FnOnce() + 'static,
    {
        if self.mounted.get() {
            callback();
        } else {
            self.mounted_callbacks.borrow_mut().push(Box::new(callback));
        }
    }

    /// Install a hook run with the new data after every update triggered by an action.
    pub fn on_data_changed<F>(&self, hook: F)
    where
        F: Fn(&Value) + 'static,
    {
        let hook: Rc<dyn Fn(&Value)> = Rc::new(hook);
        *self.data_changed.borrow_mut() = Some(hook);
    }

    /// Respond to an attribute of the element changing. Only the key attribute is observed.
    pub fn attribute_changed(&self, name: &str, value: Option<&str>) -> Result<(), BindError> {
        if name != self.config.key_attribute {
            return Ok(());
        }

        *self.key_field.borrow_mut() = value.map(String::from);

        match self.mode {
            Mode::List => self.render(),
            Mode::Single => Ok(()),
        }
    }

    /// Replace the data with the result of `transition`, re-render, and notify the data changed
    /// hook.
    pub fn update(&self, transition: Transition) -> Result<(), BindError> {
        let next = transition(&self.data.borrow());
        *self.data.borrow_mut() = next;

        self.render()?;

        let hook = self.data_changed.borrow().as_ref().map(Rc::clone);
        if let Some(hook) = hook {
            hook(&self.data());
        }

        Ok(())
    }

    /// Write `value` into the data at `path`, without re-rendering. `index` selects an item in
    /// list mode.
    pub fn write_back(&self, index: Option<usize>, path: &str, value: Value) {
        let mut data = self.data.borrow_mut();

        match index {
            Some(index) => match data.get_mut(index) {
                Some(item) => inject_value(item, path, value),
                None => warn!(index, path, "no item at index, dropping change"),
            },
            None => inject_value(&mut data, path, value),
        }
    }

    /// Bring the rendered nodes in line with the data. Does nothing before the first mount.
    fn render(&self) -> Result<(), BindError> {
        let mut view = self.view.borrow_mut();
        let Some(view) = view.as_mut() else {
            return Ok(());
        };

        match view {
            View::Single(renderer) => {
                let self_ref = self.self_ref.clone();
                renderer.render(Rc::new(move || {
                    let data = self_ref
                        .get_ref()
                        .map(|component| component.data())
                        .unwrap_or_default();

                    Rc::new(DataSnapshot::single(data))
                }))
            }
            View::List(registry) => {
                let items = match &*self.data.borrow() {
                    Value::Array(items) => items.clone(),
                    Value::Null => Vec::new(),
                    other => {
                        warn!(data = %other, "list data is not an array, rendering nothing");
                        Vec::new()
                    }
                };

                registry.set_key_field(self.key_field());
                registry.render(&items, &Location::parent(&self.element))
            }
        }
    }
}

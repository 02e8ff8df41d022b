use std::{cell::RefCell, rc::Rc};

use indexmap::IndexSet;
use tracing::debug;
use wasm_bindgen::prelude::*;

use crate::{
    component::Component,
    config::BindingConfig,
    dom::{web::WebDom, Dom},
    error::BindError,
    scanner,
};

thread_local! {
    /// Hidden classes that already have a style sheet.
    static INSTALLED_STYLES: RefCell<IndexSet<String>> = RefCell::new(IndexSet::new());

    /// Components created by [`start`], kept alive for the lifetime of the page.
    static PAGE_COMPONENTS: RefCell<Vec<Rc<Component<WebDom>>>> = const { RefCell::new(Vec::new()) };
}

/// Add the style sheet hiding components until their first render. Only the first call for a
/// given hidden class injects anything, returning whether it did.
pub fn install_styles<D>(dom: &D, config: &BindingConfig) -> Result<bool, BindError>
where
    D: Dom,
{
    let fresh = INSTALLED_STYLES.with(|installed| {
        installed
            .borrow_mut()
            .insert(config.hidden_class.clone())
    });
    if !fresh {
        return Ok(false);
    }

    let css = format!(".{} {{ visibility: hidden; }}", config.hidden_class);
    if let Err(error) = dom.inject_style(&css) {
        // Allow a later call to try again
        INSTALLED_STYLES.with(|installed| installed.borrow_mut().shift_remove(&config.hidden_class));
        return Err(error);
    }

    debug!(class = %config.hidden_class, "installed styles");
    Ok(true)
}

/// Create and connect a [`Component`] for every component element at or below `root`, in
/// document order. Components nested within another are left for their parent to render.
pub fn upgrade<D>(
    dom: &D,
    root: &D::Node,
    config: &Rc<BindingConfig>,
) -> Result<Vec<Rc<Component<D>>>, BindError>
where
    D: Dom,
{
    let components = scanner::components(dom, std::slice::from_ref(root), config)
        .into_iter()
        .filter_map(|element| Component::for_element(dom, element, config))
        .collect::<Vec<_>>();

    for component in &components {
        component.connect()?;
    }

    debug!(count = components.len(), "upgraded components");
    Ok(components)
}

/// Entry point on the web: install the panic hook and styles, and upgrade every component within
/// the document body using the default configuration.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    // Configure the panic hook to log to console.error
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));

    let dom = WebDom::global()?;
    let config = Rc::new(BindingConfig::default());

    install_styles(&dom, &config)?;
    let components = upgrade(&dom, &dom.body()?, &config)?;

    PAGE_COMPONENTS.with(|page| page.borrow_mut().extend(components));

    Ok(())
}

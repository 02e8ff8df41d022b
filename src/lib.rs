//! Declarative data binding for plain markup.
//!
//! A component element owns some data and a reducer. Its children act as a template, annotated
//! with binding attributes (`watch`, `toggle`, `action`, `asset`) that keep the rendered nodes in
//! sync with the data, and turn native events into actions for the reducer. List components
//! render the template once per item, keyed by a member of each item so that nodes survive
//! reordering.
//!
//! The document is reached through the [`dom::Dom`] trait, implemented for the browser by
//! [`dom::web::WebDom`] and in memory by [`dom::memory::MemoryDom`].

pub mod binding;
pub mod bootstrap;
pub mod component;
pub mod config;
pub mod dispatch;
pub mod dom;
pub mod error;
pub mod evaluator;
pub mod grammar;
pub mod keyed;
pub mod path;
pub mod renderer;
pub mod scanner;
pub mod snapshot;
pub mod sync;

pub use component::{Component, Mode};
pub use config::{BindingConfig, PropertyRegistry};
pub use error::{BindError, PathError};
pub use keyed::KeyedRendererRegistry;
pub use renderer::Renderer;
pub use snapshot::{Action, DataSnapshot, HostLink, Reducer};

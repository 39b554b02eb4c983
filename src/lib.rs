#[macro_use]
pub(crate) mod macros;

pub(crate) mod any;
pub(crate) mod binding;
pub(crate) mod container;
pub(crate) mod creator;
pub(crate) mod dependency_resolver;
pub(crate) mod errors;
pub(crate) mod inject;
pub(crate) mod registry;
pub(crate) mod service;
pub(crate) mod signature;
pub(crate) mod singleton;
pub(crate) mod trace;

pub mod utils;

pub use any::TypeInfo;
pub use binding::Binding;
pub use container::{Container, ContainerBuilder};
pub use creator::{Creator, Injectable, SyncCreator};
pub use dependency_resolver::DependencyResolver;
pub use errors::{BindingErrorKind, ConstructErrorKind, ProviderErrorKind, ResolveErrorKind};
pub use inject::Inject;
pub use registry::{Bind, Registry};
pub use signature::Signature;
pub use trace::ResolutionTrace;

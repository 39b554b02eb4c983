mod bind;
mod construct;
mod dependency_resolver;
mod provider;

pub use bind::BindingErrorKind;
pub use construct::ConstructErrorKind;
pub use dependency_resolver::ResolveErrorKind;
pub use provider::ProviderErrorKind;

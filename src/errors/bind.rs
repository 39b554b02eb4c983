use crate::any::TypeInfo;

/// Errors raised while modules register their bindings.
///
/// Any of them aborts the container construction.
#[derive(thiserror::Error, Debug)]
pub enum BindingErrorKind {
    #[error("Cannot bind creator without a declared provided type")]
    NoProvidedType,
    #[error("Cannot bind creator of {provides}: parameter {index} has no declared type")]
    UntypedParameter { provides: TypeInfo, index: usize },
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

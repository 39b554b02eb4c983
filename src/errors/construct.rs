use core::convert::Infallible;

/// Error raised by a creator itself.
#[derive(thiserror::Error, Debug)]
pub enum ConstructErrorKind {
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
}

impl From<Infallible> for ConstructErrorKind {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

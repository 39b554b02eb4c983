/// Stage of a provider that failed.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ProviderErrorKind<DepsErr, CreatorErr> {
    #[error("dependency resolution failed: {0}")]
    Deps(DepsErr),
    #[error("creator failed: {0}")]
    Creator(CreatorErr),
}

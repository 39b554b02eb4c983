use core::any::TypeId;
use std::sync::Arc;

use super::{construct::ConstructErrorKind, provider::ProviderErrorKind};
use crate::{any::TypeInfo, trace::ResolutionTrace};

/// Errors raised while resolving a type from the container.
///
/// The error is cheap to clone: a failed singleton hands the same error, sharing the same cause, to every caller.
#[derive(thiserror::Error, Debug, Clone)]
pub enum ResolveErrorKind {
    #[error("No binding for type {type_info}")]
    NoBinding { type_info: TypeInfo },
    #[error("Cyclic dependency detected: {trace}")]
    CyclicDependency { trace: ResolutionTrace },
    #[error("Incorrect provided type. Actual: {actual:?}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeId },
    #[error("Dependency {type_info} was not passed to the creator")]
    NotPassed { type_info: TypeInfo },
    #[error("Failed to provide {type_info}: {kind}")]
    Provider {
        type_info: TypeInfo,
        kind: ProviderErrorKind<Arc<ResolveErrorKind>, Arc<ConstructErrorKind>>,
    },
}

impl ResolveErrorKind {
    /// Returns the creator error at the bottom of the provider chain, if any.
    #[must_use]
    pub fn construct_cause(&self) -> Option<&Arc<ConstructErrorKind>> {
        match self {
            Self::Provider {
                kind: ProviderErrorKind::Creator(err),
                ..
            } => Some(err),
            Self::Provider {
                kind: ProviderErrorKind::Deps(err),
                ..
            } => err.construct_cause(),
            _ => None,
        }
    }
}

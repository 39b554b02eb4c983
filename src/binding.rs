use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, error};

use crate::{
    any::TypeInfo,
    container::ResolveRequest,
    creator::BoxedCloneCreator,
    errors::{ProviderErrorKind, ResolveErrorKind},
    service::{service_fn, BoxCloneService, Service as _},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety},
};

/// Zero-argument provider of one bound type. The request carries the container to resolve dependencies
/// from and the trace of the current resolution chain.
pub(crate) type BoxedCloneProvider = BoxCloneService<ResolveRequest, RcAnyThreadSafety, ResolveErrorKind>;

pub(crate) type Decorator = fn(BoxedCloneProvider) -> BoxedCloneProvider;

/// How to produce one type: what it depends on, how it is created and how its provider is decorated.
#[derive(Clone)]
pub struct Binding {
    pub(crate) type_info: TypeInfo,
    pub(crate) dependencies: RcThreadSafety<[TypeInfo]>,
    pub(crate) creator: BoxedCloneCreator,
    pub(crate) decorate: Decorator,
}

impl Binding {
    #[inline]
    #[must_use]
    pub(crate) fn new(type_info: TypeInfo, dependencies: Vec<TypeInfo>, creator: BoxedCloneCreator, decorate: Decorator) -> Self {
        Self {
            type_info,
            dependencies: dependencies.into(),
            creator,
            decorate,
        }
    }

    #[inline]
    #[must_use]
    pub const fn type_info(&self) -> TypeInfo {
        self.type_info
    }

    /// Types passed to the creator, in parameter order.
    #[inline]
    #[must_use]
    pub fn dependencies(&self) -> &[TypeInfo] {
        &self.dependencies
    }

    /// Builds the decorated provider of this binding.
    ///
    /// Calling the provider resolves all dependencies concurrently, failing on the first error,
    /// then passes them positionally to the creator.
    #[must_use]
    pub(crate) fn compile(&self) -> BoxedCloneProvider {
        let type_info = self.type_info;
        let dependencies = self.dependencies.clone();
        let creator = self.creator.clone();

        let provider = BoxCloneService::new(service_fn(move |ResolveRequest { container, trace }: ResolveRequest| {
            let dependencies = dependencies.clone();
            let mut creator = creator.clone();

            async move {
                let resolved = match try_join_all(
                    dependencies
                        .iter()
                        .map(|dependency| container.resolve(*dependency, trace.clone())),
                )
                .await
                {
                    Ok(resolved) => resolved,
                    Err(err) => {
                        debug!("Dependency resolution failed");
                        return Err(ResolveErrorKind::Provider {
                            type_info,
                            kind: ProviderErrorKind::Deps(Arc::new(err)),
                        });
                    }
                };

                let dependency = match creator.call(resolved).await {
                    Ok(dependency) => dependency,
                    Err(ProviderErrorKind::Deps(err)) => {
                        error!("{}", err);
                        return Err(ResolveErrorKind::Provider {
                            type_info,
                            kind: ProviderErrorKind::Deps(Arc::new(err)),
                        });
                    }
                    Err(ProviderErrorKind::Creator(err)) => {
                        error!("{}", err);
                        return Err(ResolveErrorKind::Provider {
                            type_info,
                            kind: ProviderErrorKind::Creator(Arc::new(err)),
                        });
                    }
                };

                let actual = (*dependency).type_id();
                if actual != type_info.id {
                    let err = ResolveErrorKind::IncorrectType {
                        expected: type_info,
                        actual,
                    };
                    error!("{}", err);
                    return Err(err);
                }

                Ok::<_, ResolveErrorKind>(dependency)
            }
        }));

        (self.decorate)(provider)
    }
}

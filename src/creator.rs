use core::future::Future;
use tracing::debug;

use crate::{
    dependency_resolver::DependencyResolver,
    errors::{ConstructErrorKind, ProviderErrorKind, ResolveErrorKind},
    service::{service_fn, BoxCloneService},
    utils::thread_safety::{RcAnyThreadSafety, RcThreadSafety, SendSafety, SyncSafety},
};

/// Asynchronous constructor of `Self::Provides` from its dependencies.
///
/// Implemented for closures and functions `Fn(D1, .., Dn) -> impl Future<Output = Result<T, E>>`
/// where every `Di` is a [`DependencyResolver`], usually [`crate::Inject`].
pub trait Creator<Deps>: Clone + SendSafety + SyncSafety + 'static
where
    Deps: DependencyResolver,
{
    type Provides: SendSafety + SyncSafety + 'static;
    type Error: Into<ConstructErrorKind>;

    fn create(&self, dependencies: Deps) -> impl Future<Output = Result<Self::Provides, Self::Error>> + SendSafety;
}

/// Synchronous constructor of `Self::Provides` from its dependencies.
///
/// Implemented for closures and functions `Fn(D1, .., Dn) -> Result<T, E>`.
pub trait SyncCreator<Deps>: Clone + SendSafety + SyncSafety + 'static
where
    Deps: DependencyResolver,
{
    type Provides: SendSafety + SyncSafety + 'static;
    type Error: Into<ConstructErrorKind>;

    fn create(&self, dependencies: Deps) -> Result<Self::Provides, Self::Error>;
}

/// Record type built directly from its dependencies.
///
/// ```rust
/// use syringe::{Inject, Injectable};
///
/// struct Engine;
///
/// struct Car {
///     engine: std::sync::Arc<Engine>,
/// }
///
/// impl Injectable for Car {
///     type Dependencies = (Inject<Engine>,);
///
///     fn inject((Inject(engine),): Self::Dependencies) -> Self {
///         Self { engine }
///     }
/// }
/// ```
pub trait Injectable: SendSafety + SyncSafety + Sized + 'static {
    type Dependencies: DependencyResolver;

    fn inject(dependencies: Self::Dependencies) -> Self;
}

pub(crate) type CreatorErrorKind = ProviderErrorKind<ResolveErrorKind, ConstructErrorKind>;

/// Creator with positional, type-erased arguments and result.
pub(crate) type BoxedCloneCreator = BoxCloneService<Vec<RcAnyThreadSafety>, RcAnyThreadSafety, CreatorErrorKind>;

#[must_use]
pub(crate) fn boxed_creator<C, Deps>(creator: C) -> BoxedCloneCreator
where
    C: Creator<Deps>,
    Deps: DependencyResolver,
{
    BoxCloneService::new(service_fn(move |resolved: Vec<RcAnyThreadSafety>| {
        let creator = creator.clone();

        async move {
            let dependencies = match Deps::from_resolved(&mut resolved.into_iter()) {
                Ok(dependencies) => dependencies,
                Err(err) => return Err(ProviderErrorKind::Deps(err)),
            };
            let dependency = match creator.create(dependencies).await {
                Ok(dependency) => dependency,
                Err(err) => return Err(ProviderErrorKind::Creator(err.into())),
            };

            debug!("Created");

            Ok::<_, CreatorErrorKind>(RcThreadSafety::new(dependency) as RcAnyThreadSafety)
        }
    }))
}

#[must_use]
pub(crate) fn boxed_sync_creator<C, Deps>(creator: C) -> BoxedCloneCreator
where
    C: SyncCreator<Deps>,
    Deps: DependencyResolver,
{
    boxed_fn_creator(move |dependencies: Deps| creator.create(dependencies).map_err(Into::into))
}

#[must_use]
pub(crate) fn boxed_injectable_creator<T: Injectable>() -> BoxedCloneCreator {
    boxed_fn_creator(|dependencies: T::Dependencies| Ok::<_, ConstructErrorKind>(T::inject(dependencies)))
}

#[must_use]
pub(crate) fn boxed_erased_creator<F, Fut>(creator: F) -> BoxedCloneCreator
where
    F: Fn(Vec<RcAnyThreadSafety>) -> Fut + Clone + SendSafety + SyncSafety + 'static,
    Fut: Future<Output = Result<RcAnyThreadSafety, ConstructErrorKind>> + SendSafety + 'static,
{
    BoxCloneService::new(service_fn(move |resolved: Vec<RcAnyThreadSafety>| {
        let creator = creator.clone();

        async move {
            let dependency = match creator(resolved).await {
                Ok(dependency) => dependency,
                Err(err) => return Err(ProviderErrorKind::Creator(err)),
            };

            debug!("Created");

            Ok::<_, CreatorErrorKind>(dependency)
        }
    }))
}

/// Adapts a synchronous constructor to the asynchronous creator interface.
/// The constructor runs inline on the first poll, without blocking isolation.
fn boxed_fn_creator<F, Deps, Provides>(creator: F) -> BoxedCloneCreator
where
    F: Fn(Deps) -> Result<Provides, ConstructErrorKind> + Clone + SendSafety + SyncSafety + 'static,
    Deps: DependencyResolver,
    Provides: SendSafety + SyncSafety + 'static,
{
    BoxCloneService::new(service_fn(move |resolved: Vec<RcAnyThreadSafety>| {
        let creator = creator.clone();

        async move {
            let dependencies = match Deps::from_resolved(&mut resolved.into_iter()) {
                Ok(dependencies) => dependencies,
                Err(err) => return Err(ProviderErrorKind::Deps(err)),
            };
            let dependency = match creator(dependencies) {
                Ok(dependency) => dependency,
                Err(err) => return Err(ProviderErrorKind::Creator(err)),
            };

            debug!("Created");

            Ok::<_, CreatorErrorKind>(RcThreadSafety::new(dependency) as RcAnyThreadSafety)
        }
    }))
}

macro_rules! impl_creator {
    (
        [$($ty:ident),*]
    ) => {
        #[allow(non_snake_case)]
        impl<F, Fut, Response, Err, $($ty,)*> Creator<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> Fut + Clone + SendSafety + SyncSafety + 'static,
            Fut: Future<Output = Result<Response, Err>> + SendSafety,
            Response: SendSafety + SyncSafety + 'static,
            Err: Into<ConstructErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            #[inline]
            fn create(&self, ($($ty,)*): ($($ty,)*)) -> impl Future<Output = Result<Self::Provides, Self::Error>> + SendSafety {
                self($($ty,)*)
            }
        }

        #[allow(non_snake_case)]
        impl<F, Response, Err, $($ty,)*> SyncCreator<($($ty,)*)> for F
        where
            F: Fn($($ty,)*) -> Result<Response, Err> + Clone + SendSafety + SyncSafety + 'static,
            Response: SendSafety + SyncSafety + 'static,
            Err: Into<ConstructErrorKind>,
            $( $ty: DependencyResolver, )*
        {
            type Provides = Response;
            type Error = Err;

            #[inline]
            fn create(&self, ($($ty,)*): ($($ty,)*)) -> Result<Self::Provides, Self::Error> {
                self($($ty,)*)
            }
        }
    };
}

all_the_tuples!(impl_creator);
